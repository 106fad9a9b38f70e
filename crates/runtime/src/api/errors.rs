//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and content loading so clients
//! can bubble them up with consistent context. Gameplay rejections are not
//! errors here; they come back inside tick reports.
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("failed to load content for maze {maze}")]
    Content {
        maze: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{provider} input provider failed: {reason}")]
    Input {
        provider: &'static str,
        reason: String,
    },
}
