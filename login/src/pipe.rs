//! In-memory pipe transport.
//!
//! Provides a connected transport/client pair for testing the channel
//! loop and for in-process use, without an actual network connection.

use async_trait::async_trait;
use tokio::sync::{mpsc, Mutex};

use crate::error::ChannelError;
use crate::event::ChannelEvent;
use crate::transport::ChannelTransport;

/// Creates a connected pair: the server-side transport the channel loop
/// drives, and the client handle a test uses to play the realtime client.
pub fn new_pipe() -> (PipeTransport, PipeClient) {
    let (event_tx, event_rx) = mpsc::channel::<ChannelEvent>(32);
    let (text_tx, text_rx) = mpsc::channel::<String>(32);

    let transport = PipeTransport {
        events: event_tx,
        texts: Mutex::new(text_rx),
    };
    let client = PipeClient {
        texts: text_tx,
        events: Mutex::new(event_rx),
    };
    (transport, client)
}

/// Server side of the pipe; implements [`ChannelTransport`].
pub struct PipeTransport {
    events: mpsc::Sender<ChannelEvent>,
    texts: Mutex<mpsc::Receiver<String>>,
}

#[async_trait]
impl ChannelTransport for PipeTransport {
    async fn send(&self, event: &ChannelEvent) -> Result<(), ChannelError> {
        self.events
            .send(event.clone())
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    async fn recv(&self) -> Result<Option<String>, ChannelError> {
        let mut rx = self.texts.lock().await;
        Ok(rx.recv().await)
    }
}

/// Client side of the pipe. Dropping it disconnects the transport.
pub struct PipeClient {
    texts: mpsc::Sender<String>,
    events: Mutex<mpsc::Receiver<ChannelEvent>>,
}

impl PipeClient {
    /// Sends one control message, as a realtime client would.
    pub async fn send_text(&self, text: &str) -> Result<(), ChannelError> {
        self.texts
            .send(text.to_string())
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))
    }

    /// Receives the next protocol event. Returns `None` once the channel
    /// loop has exited and dropped its transport.
    pub async fn recv_event(&self) -> Option<ChannelEvent> {
        self.events.lock().await.recv().await
    }
}
