use crate::error::EmbeddingError;

/// Number of components in a face embedding. Hard contract with the
/// gallery: vectors of any other length are rejected before comparison.
pub const EMBEDDING_DIM: usize = 512;

/// A validated face embedding: exactly [`EMBEDDING_DIM`] finite floats
/// with unit L2 norm.
///
/// The only way to construct one is [`FaceVector::normalize`], so every
/// value of this type upholds the invariant.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceVector(Vec<f32>);

impl FaceVector {
    /// Validates and L2-normalizes a raw vector.
    ///
    /// Fails on wrong length, any NaN/infinite component, or a zero norm.
    /// The norm is accumulated in f64 to avoid drift over 512 components.
    pub fn normalize(raw: &[f32]) -> Result<Self, EmbeddingError> {
        if raw.len() != EMBEDDING_DIM {
            return Err(EmbeddingError::DimensionMismatch {
                expected: EMBEDDING_DIM,
                got: raw.len(),
            });
        }

        let mut sum_sq: f64 = 0.0;
        for (i, &v) in raw.iter().enumerate() {
            if !v.is_finite() {
                return Err(EmbeddingError::NonFinite(i));
            }
            sum_sq += (v as f64) * (v as f64);
        }

        if sum_sq == 0.0 {
            return Err(EmbeddingError::ZeroNorm);
        }

        let norm = sum_sq.sqrt();
        let unit = raw.iter().map(|&v| ((v as f64) / norm) as f32).collect();
        Ok(Self(unit))
    }

    /// Returns the components as a slice.
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl AsRef<[f32]> for FaceVector {
    fn as_ref(&self) -> &[f32] {
        &self.0
    }
}

/// Compute the cosine similarity between two vectors.
///
/// Returns a value in `[-1, 1]` where 1 means identical direction and
/// -1 means opposite direction.
///
/// Uses f64 intermediate precision. Returns -1.0 (worst similarity) for
/// zero vectors, dimension mismatches, and non-finite components, so a
/// degenerate gallery record can never win a scan.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return -1.0;
    }

    let mut dot: f64 = 0.0;
    let mut norm_a: f64 = 0.0;
    let mut norm_b: f64 = 0.0;

    for i in 0..a.len() {
        let ai = a[i] as f64;
        let bi = b[i] as f64;
        dot += ai * bi;
        norm_a += ai * ai;
        norm_b += bi * bi;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return -1.0;
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    // NaN components make the whole product NaN, which would otherwise
    // leak through clamp and poison comparisons downstream.
    if !similarity.is_finite() {
        return -1.0;
    }
    // Clamp to [-1, 1] to handle floating point errors.
    similarity.clamp(-1.0, 1.0) as f32
}
