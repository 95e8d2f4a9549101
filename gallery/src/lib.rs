//! Enrolled face gallery and the login match decision.
//!
//! The gallery itself is owned by an external store; this crate defines
//! the read boundary ([`GalleryStore`]), a brute-force in-memory
//! implementation ([`MemoryGallery`]), and the pure decision pipeline:
//!
//! 1. [`nearest`]: linear cosine scan over a gallery snapshot
//! 2. [`decide`]: threshold comparison -> [`MatchDecision`]
//!
//! The store's iteration order is load-bearing: ties at the maximal
//! similarity resolve to the first record in snapshot order.

mod error;
mod record;
mod search;
mod store;

pub use error::GalleryError;
pub use record::GalleryRecord;
pub use search::{decide, nearest, MatchDecision, MatchStatus, DEFAULT_ACCEPT_THRESHOLD};
pub use store::{GalleryStore, MemoryGallery};
