use parking_lot::RwLock;

use crate::error::GalleryError;
use crate::record::GalleryRecord;

/// Read boundary to the storage collaborator that owns enrolled
/// embeddings.
///
/// `read_all` returns an owned snapshot: the caller scans it without any
/// store mutation becoming visible mid-scan. The order of the returned
/// records is a contract — it is the tie-break order for equal
/// similarities — so implementations must return a stable order
/// (typically enrollment order).
///
/// Implementations must be safe for concurrent use (Send + Sync).
#[async_trait::async_trait]
pub trait GalleryStore: Send + Sync {
    /// Return all enrolled embeddings in stable store order.
    async fn read_all(&self) -> Result<Vec<GalleryRecord>, GalleryError>;
}

/// In-memory GalleryStore preserving insertion order.
/// Intended for testing and small-scale use (< 1000 records).
pub struct MemoryGallery {
    records: RwLock<Vec<GalleryRecord>>,
}

impl MemoryGallery {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// Builds a gallery from existing records, keeping their order.
    pub fn from_records(records: Vec<GalleryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    /// Appends a record. Enrollment order is scan order.
    pub fn enroll(&self, record: GalleryRecord) {
        self.records.write().push(record);
    }

    /// Returns the number of enrolled records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns true if nothing is enrolled.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl Default for MemoryGallery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl GalleryStore for MemoryGallery {
    async fn read_all(&self) -> Result<Vec<GalleryRecord>, GalleryError> {
        Ok(self.records.read().clone())
    }
}
