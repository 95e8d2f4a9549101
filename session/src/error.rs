use thiserror::Error;

/// Errors returned by session registry operations.
///
/// These signal client or orchestration misuse and are reported to the
/// calling side; they never terminate the process.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("session: duplicate session id: {0}")]
    Duplicate(String),

    #[error("session: unknown session id: {0}")]
    Unknown(String),
}
