use thiserror::Error;

/// Errors returned by embedding validation and decoding.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("embedding: dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("embedding: non-finite component at index {0}")]
    NonFinite(usize),

    #[error("embedding: zero-norm vector")]
    ZeroNorm,

    #[error("embedding: decode failed: {0}")]
    Decode(String),
}
