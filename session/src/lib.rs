//! Per-session wait/notify registry.
//!
//! Joins two independently-timed interactions: a realtime channel that
//! opens a session and waits, and a submission arriving from an unrelated
//! task that publishes the session's result. Each session carries its own
//! notify primitive, so unrelated sessions never serialize each other.
//!
//! Lifecycle: open -> wait -> first of {publish, timeout, close}. Every
//! terminal path runs the same idempotent teardown.

mod error;
mod registry;

pub use error::SessionError;
pub use registry::{SessionRegistry, WaitOutcome};
