//! Manager modules for the viewer.
//!
//! - `file_dialogs`: receivers for native dialogs running on worker threads
//! - `notifications`: short-lived toast messages

pub mod file_dialogs;
pub mod notifications;

pub use file_dialogs::FileDialogManager;
pub use notifications::NotificationHandler;
