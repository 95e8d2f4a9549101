use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One enrolled face embedding, as read from the storage collaborator.
///
/// Read-only in this crate: records are produced at enrollment time and
/// only scanned at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryRecord {
    /// Record identifier in the store.
    pub id: i64,

    /// Member profile this embedding belongs to.
    pub profile_id: i64,

    /// Raw embedding components. Expected length is 512 and unit norm,
    /// but the scan re-derives norms and never trusts this blindly.
    pub vector: Vec<f32>,

    /// Enrollment-time model confidence.
    #[serde(default = "default_confidence")]
    pub confidence: f32,

    /// When the embedding was enrolled.
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_confidence() -> f32 {
    1.0
}

impl GalleryRecord {
    /// Creates a record with the current time and full confidence.
    pub fn new(id: i64, profile_id: i64, vector: Vec<f32>) -> Self {
        Self {
            id,
            profile_id,
            vector,
            confidence: 1.0,
            created_at: Utc::now(),
        }
    }
}
