use crate::error::EmbeddingError;
use crate::vector::{FaceVector, EMBEDDING_DIM};

/// FaceEmbedder turns raw image bytes into a dense float32 vector.
///
/// This is the boundary to the inference collaborator (an external face
/// model); the output is unvalidated and must go through
/// [`FaceVector::normalize`] before any comparison.
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait FaceEmbedder: Send + Sync {
    /// Return the raw embedding vector for one face image.
    async fn embed(&self, image: &[u8]) -> Result<Vec<f32>, EmbeddingError>;

    /// Return the dimensionality of the output vectors.
    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}

/// Decodes an image into a validated, unit-norm [`FaceVector`].
///
/// Undecodable bytes, a wrong model dimension, and a zero-norm output
/// all fail with [`EmbeddingError::Decode`]: from the caller's point of
/// view the image simply could not be turned into a usable embedding.
pub async fn decode_image<E: FaceEmbedder + ?Sized>(
    embedder: &E,
    image: &[u8],
) -> Result<FaceVector, EmbeddingError> {
    let raw = embedder.embed(image).await?;
    FaceVector::normalize(&raw).map_err(|e| match e {
        EmbeddingError::Decode(msg) => EmbeddingError::Decode(msg),
        other => EmbeddingError::Decode(other.to_string()),
    })
}
