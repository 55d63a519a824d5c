pub mod handle;
pub mod message_handler;
pub mod runtime;

pub use handle::HostHandle;
pub use message_handler::{HostMessage, HostView};
pub use runtime::{run_host, spawn_host};

#[derive(thiserror::Error, Debug)]
pub enum HostError {
    #[error(transparent)]
    Graph(#[from] graph_core::GraphError),
    #[error("host thread is not running")]
    Disconnected,
    #[error("failed to spawn host thread: {0}")]
    Spawn(std::io::Error),
}
