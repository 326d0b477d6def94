//! Input relayed from remote participants.
//!
//! The transport broadcasts every participant's key events to every peer. Each
//! relayed channel belongs to one participant and drops messages addressed to
//! anyone else.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Clock, InputBuffer, InputChannel, InputConfig};
use crate::error::InputError;
use crate::player::PlayerId;

/// Press or release.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Key pressed
    Down,
    /// Key released
    Up,
}

/// A key event delivered by the transport.
///
/// Wire form: `{"participantId": "...", "code": "ArrowLeft", "kind": "down"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteInput {
    /// Participant the event originated from
    pub participant_id: PlayerId,
    /// Device code as captured on the sender's machine
    pub code: String,
    /// Press or release
    pub kind: InputKind,
}

impl RemoteInput {
    /// A key press from `participant`.
    #[must_use]
    pub fn down(participant: impl Into<PlayerId>, code: impl Into<String>) -> Self {
        Self {
            participant_id: participant.into(),
            code: code.into(),
            kind: InputKind::Down,
        }
    }

    /// A key release from `participant`.
    #[must_use]
    pub fn up(participant: impl Into<PlayerId>, code: impl Into<String>) -> Self {
        Self {
            participant_id: participant.into(),
            code: code.into(),
            kind: InputKind::Up,
        }
    }

    /// Decodes the wire form.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Malformed`] if the payload does not describe a
    /// key event.
    pub fn from_json(payload: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Channel fed by relayed network events for one participant.
#[derive(Debug, Clone)]
pub struct RelayedInputChannel {
    participant: PlayerId,
    buffer: InputBuffer,
}

impl RelayedInputChannel {
    /// Creates a channel for `participant` on wall-clock time.
    #[must_use]
    pub fn new(participant: impl Into<PlayerId>, config: InputConfig) -> Self {
        Self {
            participant: participant.into(),
            buffer: InputBuffer::new(config),
        }
    }

    /// Creates a channel for `participant` on the given clock.
    #[must_use]
    pub fn with_clock(
        participant: impl Into<PlayerId>,
        config: InputConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            participant: participant.into(),
            buffer: InputBuffer::with_clock(config, clock),
        }
    }

    /// Participant this channel listens for.
    #[must_use]
    pub fn participant(&self) -> &PlayerId {
        &self.participant
    }

    /// Decodes and handles a wire message.
    ///
    /// # Errors
    ///
    /// Returns [`InputError::Malformed`] if the payload cannot be decoded.
    pub fn receive_json(&mut self, payload: &str) -> Result<bool, InputError> {
        let input = RemoteInput::from_json(payload)?;
        Ok(self.receive(&input))
    }
}

impl InputChannel for RelayedInputChannel {
    fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }

    fn receive(&mut self, input: &RemoteInput) -> bool {
        if input.participant_id != self.participant {
            return false;
        }
        let symbol = match input.kind {
            InputKind::Down => self.on_down(&input.code),
            InputKind::Up => self.on_up(&input.code),
        };
        trace!(participant = %self.participant, kind = ?input.kind, %symbol, "relayed input");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ManualClock, Symbol, Turn};

    fn channel() -> RelayedInputChannel {
        RelayedInputChannel::with_clock(
            "p1",
            InputConfig::standard_arrows(),
            Arc::new(ManualClock::new()),
        )
    }

    #[test]
    fn accepts_own_participant() {
        let mut channel = channel();
        assert!(channel.receive(&RemoteInput::down("p1", "ArrowRight")));
        assert_eq!(channel.turn(), Some(Turn::Right));
        assert!(channel.is_active(&Symbol::new("right")));

        assert!(channel.receive(&RemoteInput::up("p1", "ArrowRight")));
        assert!(!channel.is_active(&Symbol::new("right")));
    }

    #[test]
    fn ignores_other_participants() {
        let mut channel = channel();
        assert!(!channel.receive(&RemoteInput::down("p2", "ArrowRight")));
        assert!(channel.peek().is_none());
    }

    #[test]
    fn decodes_wire_form() {
        let mut channel = channel();
        let handled = channel
            .receive_json(r#"{"participantId":"p1","code":"ArrowDown","kind":"down"}"#)
            .unwrap();
        assert!(handled);
        assert_eq!(channel.turn(), Some(Turn::Down));
    }

    #[test]
    fn rejects_malformed_payload() {
        let mut channel = channel();
        let err = channel
            .receive_json(r#"{"participantId":"p1","kind":"sideways"}"#)
            .unwrap_err();
        assert!(matches!(err, InputError::Malformed(_)));
    }

    #[test]
    fn wire_form_round_trips() {
        let input = RemoteInput::up("p9", "ArrowUp");
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"participantId\":\"p9\""));
        assert!(json.contains("\"kind\":\"up\""));
        assert_eq!(RemoteInput::from_json(&json).unwrap(), input);
    }
}
