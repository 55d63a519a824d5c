pub mod client;
pub mod daemon;
pub mod protocol;

pub use client::{ClientError, GraphClient};
pub use daemon::{run_service, run_service_at};
pub use protocol::{ErrorKind, ServiceRequest, ServiceResponse, DEFAULT_SOCKET_PATH};

#[derive(thiserror::Error, Debug)]
pub enum ServiceError {
    #[error("failed to bind service socket: {0}")]
    Bind(std::io::Error),
    #[error("service io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("service json error: {0}")]
    Json(#[from] serde_json::Error),
}
