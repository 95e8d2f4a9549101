//! Face embedding vectors and the inference collaborator boundary.
//!
//! A face embedding is a fixed-length (512) float vector produced by an
//! external model. This crate owns the validation rules for those vectors:
//!
//! 1. [`FaceVector::normalize`]: raw floats -> unit-norm [`FaceVector`]
//! 2. [`cosine_similarity`]: similarity between two vectors in `[-1, 1]`
//! 3. [`decode_image`]: image bytes -> [`FaceVector`] via a [`FaceEmbedder`]
//!
//! The length contract (exactly [`EMBEDDING_DIM`] components) is enforced
//! before any comparison ever happens; the gallery relies on it.

mod embedder;
mod error;
mod remote;
mod vector;

pub use embedder::{decode_image, FaceEmbedder};
pub use error::EmbeddingError;
pub use remote::RemoteEmbedder;
pub use vector::{cosine_similarity, FaceVector, EMBEDDING_DIM};
