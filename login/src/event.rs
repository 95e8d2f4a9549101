use serde::{Deserialize, Serialize};

use facegate_gallery::MatchDecision;

/// Wire events sent to the realtime client.
///
/// Serialized as JSON objects with a discriminant `event` field, the
/// decision fields flattened into the `result` event:
///
/// ```json
/// {"event":"connected","session_id":"abc12345","status":"waiting"}
/// {"event":"result","status":"success","profile_id":42,"similarity":0.82,"accepted":true}
/// {"event":"timeout"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ChannelEvent {
    Connected {
        session_id: String,
        status: String,
    },
    Result {
        #[serde(flatten)]
        decision: MatchDecision,
    },
    Timeout,
    Cancelled,
    Echo {
        message: String,
    },
}

impl ChannelEvent {
    /// The event sent once right after the channel registers its session.
    pub fn connected(session_id: &str) -> Self {
        Self::Connected {
            session_id: session_id.to_string(),
            status: "waiting".to_string(),
        }
    }
}
