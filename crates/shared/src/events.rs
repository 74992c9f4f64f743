//! Events passed from background services to the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unsolicited message emitted by the background notifier after sustained
/// inactivity. Carried over a plain channel polled by the chat screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProactiveMessage {
    pub text: String,
    pub generated_at: DateTime<Utc>,
}

impl ProactiveMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generated_at: Utc::now(),
        }
    }
}

pub type ProactiveSender = std::sync::mpsc::Sender<ProactiveMessage>;
pub type ProactiveReceiver = std::sync::mpsc::Receiver<ProactiveMessage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_round_trips_through_json() {
        let msg = ProactiveMessage::new("Need help with anything?");
        let json = serde_json::to_string(&msg).unwrap();
        let back: ProactiveMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, msg.text);
    }
}
