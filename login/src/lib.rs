//! Login match orchestration.
//!
//! Two decoupled entry points meet here:
//!
//! - A realtime client opens a session channel and waits
//!   ([`run_login_channel`]): the channel races the session's bounded
//!   result wait against incoming control messages, emits protocol
//!   events, and tears the session down on every exit path.
//! - A submission arrives from an unrelated context
//!   ([`LoginCoordinator::submit_vector`] /
//!   [`LoginCoordinator::submit_image`]): the coordinator evaluates the
//!   input against the gallery and publishes exactly one decision into
//!   the session registry.
//!
//! Malformed submissions never strand a waiting channel: every
//! evaluation failure is converted into a published "failed" decision.

mod channel;
mod coordinator;
mod error;
mod event;
mod pipe;
mod transport;

pub use channel::run_login_channel;
pub use coordinator::LoginCoordinator;
pub use error::ChannelError;
pub use event::ChannelEvent;
pub use pipe::{new_pipe, PipeClient, PipeTransport};
pub use transport::ChannelTransport;
