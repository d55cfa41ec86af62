//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, content loading and the rules
//! so clients can bubble them up with consistent context.
use thiserror::Error;
use tokio::sync::oneshot;

use adrenaline_core::{ActionError, ErrorSeverity, GameError, SetupError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("game worker command channel closed")]
    CommandChannelClosed,

    #[error("game worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("game worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl RuntimeError {
    /// The rules error behind this failure, if the game refused the request.
    pub fn action_error(&self) -> Option<&ActionError> {
        match self {
            Self::Action(error) => Some(error),
            _ => None,
        }
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Action(error) => error.severity(),
            Self::Setup(error) => error.severity(),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) | Self::WorkerJoin(_) => {
                ErrorSeverity::Fatal
            }
            Self::Content(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Action(error) => error.error_code(),
            Self::Setup(error) => error.error_code(),
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CHANNEL_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CHANNEL_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::Content(_) => "RUNTIME_CONTENT",
        }
    }
}
