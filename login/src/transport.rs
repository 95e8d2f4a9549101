use async_trait::async_trait;

use crate::error::ChannelError;
use crate::event::ChannelEvent;

/// Duplex boundary between the channel loop and whatever carries it
/// (a WebSocket, an in-process pipe, ...).
///
/// `recv` returning `Ok(None)` means the client closed the connection
/// normally; an `Err` is an abnormal disconnect. Either way the channel
/// loop exits and tears the session down.
#[async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Sends one protocol event to the client.
    async fn send(&self, event: &ChannelEvent) -> Result<(), ChannelError>;

    /// Receives the next text control message from the client.
    /// Returns `Ok(None)` when the connection is closed normally.
    async fn recv(&self) -> Result<Option<String>, ChannelError>;
}
