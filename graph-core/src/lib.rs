pub mod archive;
pub mod error;
pub mod render;
pub mod settings;
pub mod store;

pub use archive::{ArchiveConfig, ArchiveEntry, ArchiveManager};
pub use error::{ArchiveError, GraphError, RenderError, SettingsError};
pub use render::{PlotRenderer, PlottersRenderer};
pub use settings::{GraphSettings, ImagePreset, SettingsStore};
pub use store::{FigureStore, FigureView, HistoryReport, PlotView, StoreView};
