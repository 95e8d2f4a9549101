use thiserror::Error;

use facegate_session::SessionError;

/// Errors returned by realtime channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel: transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Session(#[from] SessionError),
}
