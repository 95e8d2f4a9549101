use std::time::Duration;

use tracing::{debug, warn};

use facegate_gallery::MatchDecision;
use facegate_session::{SessionRegistry, WaitOutcome};

use crate::error::ChannelError;
use crate::event::ChannelEvent;
use crate::transport::ChannelTransport;

/// Drives one realtime login session over `transport` until a terminal
/// event, then tears the session down unconditionally.
///
/// Registers the session (a duplicate id is rejected to the caller
/// before any event is sent), emits `connected`, then races the bounded
/// result wait against incoming control messages:
///
/// - result published -> `result` event
/// - wait deadline elapses -> `timeout` event
/// - client sends "cancel" (trimmed, case-insensitive) -> `cancelled`
/// - any other text -> `echo`, and the loop continues; the pending
///   result wait is neither reset nor consumed
/// - client disconnect (orderly or not) -> loop exits silently
///
/// `registry.close` runs on every exit path, including transport errors.
pub async fn run_login_channel<T: ChannelTransport + ?Sized>(
    registry: &SessionRegistry<MatchDecision>,
    transport: &T,
    session_id: &str,
    wait_timeout: Duration,
) -> Result<(), ChannelError> {
    registry.open(session_id)?;
    let outcome = drive(registry, transport, session_id, wait_timeout).await;
    registry.close(session_id);
    if let Err(ref e) = outcome {
        warn!(session_id, error = %e, "login channel ended abnormally");
    } else {
        debug!(session_id, "login channel ended");
    }
    outcome
}

async fn drive<T: ChannelTransport + ?Sized>(
    registry: &SessionRegistry<MatchDecision>,
    transport: &T,
    session_id: &str,
    wait_timeout: Duration,
) -> Result<(), ChannelError> {
    transport.send(&ChannelEvent::connected(session_id)).await?;

    // One wait for the whole channel lifetime: echo traffic must not
    // reset the deadline or consume the pending result.
    let wait = registry.await_result(session_id, wait_timeout);
    tokio::pin!(wait);

    loop {
        tokio::select! {
            outcome = &mut wait => {
                let event = match outcome {
                    WaitOutcome::Ready(decision) => ChannelEvent::Result { decision },
                    WaitOutcome::TimedOut => ChannelEvent::Timeout,
                };
                transport.send(&event).await?;
                return Ok(());
            }
            msg = transport.recv() => {
                match msg? {
                    Some(text) => {
                        if text.trim().eq_ignore_ascii_case("cancel") {
                            transport.send(&ChannelEvent::Cancelled).await?;
                            return Ok(());
                        }
                        transport.send(&ChannelEvent::Echo { message: text }).await?;
                    }
                    // Client went away; nothing left to report to.
                    None => return Ok(()),
                }
            }
        }
    }
}
