use thiserror::Error;

/// Errors returned by gallery stores.
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("gallery: store error: {0}")]
    Store(String),
}
