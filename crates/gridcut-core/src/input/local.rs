//! Input fed by a device on this machine.

use std::sync::Arc;

use tracing::trace;

use super::{Clock, InputBuffer, InputChannel, InputConfig, Symbol};

/// Channel fed by local device key codes.
///
/// Codes rejected by the mapping filter are ignored, so several local
/// channels can share one keyboard with disjoint mappings.
#[derive(Debug, Clone)]
pub struct LocalInputChannel {
    buffer: InputBuffer,
}

impl LocalInputChannel {
    /// Creates a channel on wall-clock time.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self {
            buffer: InputBuffer::new(config),
        }
    }

    /// Creates a channel on the given clock.
    #[must_use]
    pub fn with_clock(config: InputConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            buffer: InputBuffer::with_clock(config, clock),
        }
    }

    /// Handles a device key press. Returns the symbol if the code is accepted.
    pub fn key_down(&mut self, code: &str) -> Option<Symbol> {
        if !self.allow_input(code) {
            return None;
        }
        let symbol = self.on_down(code);
        trace!(code, %symbol, "key down");
        Some(symbol)
    }

    /// Handles a device key release. Returns the symbol if the code is accepted.
    pub fn key_up(&mut self, code: &str) -> Option<Symbol> {
        if !self.allow_input(code) {
            return None;
        }
        Some(self.on_up(code))
    }
}

impl InputChannel for LocalInputChannel {
    fn buffer(&self) -> &InputBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut InputBuffer {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{ManualClock, RemoteInput, Turn};
    use std::time::Duration;

    fn arrows() -> (LocalInputChannel, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (
            LocalInputChannel::with_clock(InputConfig::standard_arrows(), clock.clone()),
            clock,
        )
    }

    #[test]
    fn mapped_key_becomes_turn() {
        let (mut channel, _) = arrows();
        assert_eq!(channel.key_down("ArrowLeft"), Some(Symbol::new("left")));
        assert_eq!(channel.turn(), Some(Turn::Left));
        assert!(channel.is_active(&Symbol::new("left")));
    }

    #[test]
    fn unmapped_keys_are_ignored() {
        let (mut channel, _) = arrows();
        assert_eq!(channel.key_down("KeyW"), None);
        assert!(channel.peek().is_none());
    }

    #[test]
    fn release_keeps_buffered_symbol() {
        let (mut channel, clock) = arrows();
        channel.key_down("ArrowUp");
        clock.advance(Duration::from_millis(120));
        assert_eq!(
            channel.pressed_duration(&Symbol::new("up")),
            Some(Duration::from_millis(120))
        );
        channel.key_up("ArrowUp");
        assert!(!channel.is_active(&Symbol::new("up")));
        assert_eq!(channel.turn(), Some(Turn::Up));
    }

    #[test]
    fn empty_mapping_passes_codes_through() {
        let mut channel = LocalInputChannel::new(InputConfig::default());
        assert_eq!(channel.key_down("Space"), Some(Symbol::new("Space")));
        assert_eq!(channel.turn(), None);
    }

    #[test]
    fn relayed_messages_are_not_for_local_channels() {
        let (mut channel, _) = arrows();
        let input = RemoteInput::down("p1", "ArrowLeft");
        assert!(!channel.receive(&input));
        assert!(channel.peek().is_none());
    }
}
