use figure::PlotRuleError;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum GraphError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error(transparent)]
    Archive(#[from] ArchiveError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl GraphError {
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        GraphError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        GraphError::InvalidArgument(message.into())
    }
}

impl From<PlotRuleError> for GraphError {
    fn from(err: PlotRuleError) -> Self {
        GraphError::InvalidArgument(err.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ArchiveError {
    #[error("archive io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to export '{title}': {source}")]
    Export {
        title: String,
        #[source]
        source: RenderError,
    },
}

impl ArchiveError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ArchiveError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("image size {width}x{height} is too small")]
    InvalidSize { width: u32, height: u32 },
    #[error("drawing failed: {0}")]
    Draw(String),
}

impl RenderError {
    pub(crate) fn draw(err: impl std::fmt::Display) -> Self {
        RenderError::Draw(err.to_string())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("settings io error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("settings json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}
