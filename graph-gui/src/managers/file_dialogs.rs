use figure::FigureId;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

/// Pending native dialogs. Each receiver yields once, when the user picks a
/// folder or cancels.
pub struct FileDialogManager {
    pub save_dialog_rx: Option<Receiver<(FigureId, Option<PathBuf>)>>,
    pub archive_location_rx: Option<Receiver<Option<PathBuf>>>,
}

impl FileDialogManager {
    pub fn new() -> Self {
        Self {
            save_dialog_rx: None,
            archive_location_rx: None,
        }
    }
}

impl Default for FileDialogManager {
    fn default() -> Self {
        Self::new()
    }
}
