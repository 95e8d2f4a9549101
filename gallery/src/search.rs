use serde::{Deserialize, Serialize};

use facegate_embedding::{cosine_similarity, FaceVector};

use crate::record::GalleryRecord;

/// Minimum cosine similarity classified as an accepted match, unless the
/// process configures otherwise.
pub const DEFAULT_ACCEPT_THRESHOLD: f32 = 0.60;

/// Overall outcome of a login match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Success,
    Failed,
}

/// The accept/reject decision for one login attempt. Immutable once
/// produced; serializes to the wire shape consumed by realtime clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchDecision {
    pub status: MatchStatus,

    /// Profile of the nearest record, absent when the gallery is empty
    /// or the input never reached the scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<i64>,

    /// Cosine similarity of the best match, 0.0 when nothing was scanned.
    pub similarity: f32,

    pub accepted: bool,

    /// Failure reason: "no_data", "invalid_vector", "decode_error",
    /// "storage_error".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MatchDecision {
    /// A failed decision that never reached the gallery scan.
    pub fn failed(reason: &str) -> Self {
        Self {
            status: MatchStatus::Failed,
            profile_id: None,
            similarity: 0.0,
            accepted: false,
            reason: Some(reason.to_string()),
        }
    }
}

/// Returns the gallery record nearest to `query` by cosine similarity,
/// together with that similarity.
///
/// Linear scan. Strict `>` comparison means the first record at the
/// maximal similarity in snapshot order wins, so results are
/// deterministic given a stable store order. Returns `None` iff the
/// snapshot is empty.
pub fn nearest<'a>(
    query: &FaceVector,
    snapshot: &'a [GalleryRecord],
) -> Option<(&'a GalleryRecord, f32)> {
    let mut best: Option<(&GalleryRecord, f32)> = None;
    for record in snapshot {
        let sim = cosine_similarity(query.as_slice(), &record.vector);
        match best {
            Some((_, best_sim)) if sim <= best_sim => {}
            _ => best = Some((record, sim)),
        }
    }
    best
}

/// Turns the best scan result into an accept/reject decision.
///
/// Accepted iff similarity >= threshold (inclusive). An empty scan
/// (`best == None`) yields a failed decision with reason "no_data".
pub fn decide(best: Option<(&GalleryRecord, f32)>, threshold: f32) -> MatchDecision {
    let Some((record, similarity)) = best else {
        return MatchDecision::failed("no_data");
    };

    let accepted = similarity >= threshold;
    MatchDecision {
        status: if accepted {
            MatchStatus::Success
        } else {
            MatchStatus::Failed
        },
        profile_id: Some(record.profile_id),
        similarity,
        accepted,
        reason: None,
    }
}
