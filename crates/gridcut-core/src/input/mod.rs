//! Buffered, time-decaying player input.
//!
//! Motion never talks to a device. It asks the player's [`InputChannel`] for
//! the most recent logical [`Symbol`] and turns if that symbol names a
//! [`Turn`]. Where the symbol came from is the channel's business:
//!
//! - [`LocalInputChannel`]: fed by device key codes on this machine
//! - [`RelayedInputChannel`]: fed by [`RemoteInput`] messages tagged with a
//!   participant id
//!
//! # Buffering
//!
//! Each channel owns an [`InputBuffer`]: a bounded queue of the most recent
//! symbols (oldest evicted first) that empties itself once no symbol has been
//! pushed for the configured timeout. Expiry is evaluated against a [`Clock`]
//! whenever the buffer is read, so there are no timers to cancel.

mod clock;
mod local;
mod relay;

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use lattice::Side;
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use local::LocalInputChannel;
pub use relay::{InputKind, RelayedInputChannel, RemoteInput};

// =============================================================================
// Symbols
// =============================================================================

/// A logical input name such as `"left"` or `"Space"`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol.
    #[must_use]
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// The symbol's name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(symbol: &str) -> Self {
        Self::new(symbol)
    }
}

impl From<Turn> for Symbol {
    fn from(turn: Turn) -> Self {
        Self::new(turn.as_str())
    }
}

/// The four steering symbols motion understands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    /// Toward smaller `h`
    Left,
    /// Toward larger `h`
    Right,
    /// Toward smaller `v`
    Up,
    /// Toward larger `v`
    Down,
}

impl Turn {
    /// Every turn.
    pub const ALL: [Turn; 4] = [Turn::Left, Turn::Right, Turn::Up, Turn::Down];

    /// Symbol name of the turn.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    /// Parses a symbol; anything that is not a steering symbol is `None`.
    #[must_use]
    pub fn from_symbol(symbol: &Symbol) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|turn| turn.as_str() == symbol.as_str())
    }

    /// Vertex slot a traveller leaves through when taking this turn.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Left => Side::Prev,
            Self::Right => Side::Next,
            Self::Up => Side::Above,
            Self::Down => Side::Below,
        }
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Buffering and mapping settings for one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Symbols retained (most recent wins)
    pub buffer_size: usize,
    /// Inactivity after which the buffer empties, in milliseconds
    pub timeout_ms: u64,
    /// Device code to symbol mapping; empty accepts every code unchanged
    pub mapping: BTreeMap<String, Symbol>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1,
            timeout_ms: 3000,
            mapping: BTreeMap::new(),
        }
    }
}

impl InputConfig {
    /// Arrow keys mapped to the four turns.
    #[must_use]
    pub fn standard_arrows() -> Self {
        Self::default().with_mapping([
            ("ArrowLeft", Turn::Left),
            ("ArrowRight", Turn::Right),
            ("ArrowUp", Turn::Up),
            ("ArrowDown", Turn::Down),
        ])
    }

    /// Replaces the mapping.
    #[must_use]
    pub fn with_mapping<C, S>(mut self, mapping: impl IntoIterator<Item = (C, S)>) -> Self
    where
        C: Into<String>,
        S: Into<Symbol>,
    {
        self.mapping = mapping
            .into_iter()
            .map(|(code, symbol)| (code.into(), symbol.into()))
            .collect();
        self
    }

    /// Buffer inactivity timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Whether a device code passes the mapping filter.
    #[must_use]
    pub fn allows(&self, code: &str) -> bool {
        self.mapping.is_empty() || self.mapping.contains_key(code)
    }

    /// Logical symbol for a device code; unmapped codes stand for themselves.
    #[must_use]
    pub fn symbol_for(&self, code: &str) -> Symbol {
        self.mapping
            .get(code)
            .cloned()
            .unwrap_or_else(|| Symbol::new(code))
    }
}

// =============================================================================
// Buffer
// =============================================================================

/// Bounded symbol queue with inactivity decay and held-input tracking.
#[derive(Debug, Clone)]
pub struct InputBuffer {
    config: InputConfig,
    symbols: VecDeque<Symbol>,
    last_push: Option<Duration>,
    held: BTreeMap<Symbol, Duration>,
    clock: Arc<dyn Clock>,
}

impl InputBuffer {
    /// Creates a buffer reading wall-clock time.
    #[must_use]
    pub fn new(config: InputConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Creates a buffer reading time from `clock`.
    #[must_use]
    pub fn with_clock(config: InputConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            symbols: VecDeque::new(),
            last_push: None,
            held: BTreeMap::new(),
            clock,
        }
    }

    /// Channel settings.
    #[must_use]
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    fn expired(&self) -> bool {
        self.last_push
            .is_some_and(|at| self.clock.now().saturating_sub(at) >= self.config.timeout())
    }

    fn expire(&mut self) {
        if self.expired() {
            self.symbols.clear();
            self.last_push = None;
        }
    }

    /// Appends a symbol, evicting the oldest beyond capacity, and restarts
    /// the decay timer.
    pub fn push(&mut self, symbol: Symbol) {
        self.expire();
        self.symbols.push_back(symbol);
        while self.symbols.len() > self.config.buffer_size {
            self.symbols.pop_front();
        }
        self.last_push = Some(self.clock.now());
    }

    /// Most recent live symbol.
    #[must_use]
    pub fn peek(&self) -> Option<&Symbol> {
        if self.expired() {
            None
        } else {
            self.symbols.back()
        }
    }

    /// Removes and returns the most recent live symbol.
    pub fn pop(&mut self) -> Option<Symbol> {
        self.expire();
        self.symbols.pop_back()
    }

    /// Number of live symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.expired() {
            0
        } else {
            self.symbols.len()
        }
    }

    /// True if no live symbol is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the queue.
    pub fn clear(&mut self) {
        self.symbols.clear();
        self.last_push = None;
    }

    /// Marks a symbol as held from now.
    pub fn activate(&mut self, symbol: Symbol) {
        let now = self.clock.now();
        self.held.insert(symbol, now);
    }

    /// Releases a held symbol.
    pub fn deactivate(&mut self, symbol: &Symbol) {
        self.held.remove(symbol);
    }

    /// Whether a symbol is currently held.
    #[must_use]
    pub fn is_active(&self, symbol: &Symbol) -> bool {
        self.held.contains_key(symbol)
    }

    /// How long a held symbol has been held; `None` if it is not held.
    #[must_use]
    pub fn pressed_duration(&self, symbol: &Symbol) -> Option<Duration> {
        self.held
            .get(symbol)
            .map(|since| self.clock.now().saturating_sub(*since))
    }

    /// Symbols currently held, in name order.
    pub fn held(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.held.keys()
    }
}

// =============================================================================
// Channel contract
// =============================================================================

/// Source-agnostic input contract consumed by motion.
///
/// Implementors expose their [`InputBuffer`]; every operation is provided on
/// top of it. Variants differ only in how device or network events reach
/// [`InputChannel::on_down`] and [`InputChannel::on_up`].
pub trait InputChannel: fmt::Debug + Send {
    /// Shared buffer state.
    fn buffer(&self) -> &InputBuffer;

    /// Shared buffer state, mutably.
    fn buffer_mut(&mut self) -> &mut InputBuffer;

    /// Offers a relayed message to the channel. Returns `true` if it was
    /// consumed. Channels that are not fed by the relay ignore it.
    fn receive(&mut self, _input: &RemoteInput) -> bool {
        false
    }

    /// Appends a symbol to the buffer.
    fn push(&mut self, symbol: Symbol) {
        self.buffer_mut().push(symbol);
    }

    /// Most recent buffered symbol.
    fn peek(&self) -> Option<&Symbol> {
        self.buffer().peek()
    }

    /// Removes the most recent buffered symbol.
    fn pop(&mut self) -> Option<Symbol> {
        self.buffer_mut().pop()
    }

    /// Marks a symbol as held.
    fn activate(&mut self, symbol: Symbol) {
        self.buffer_mut().activate(symbol);
    }

    /// Releases a held symbol.
    fn deactivate(&mut self, symbol: &Symbol) {
        self.buffer_mut().deactivate(symbol);
    }

    /// Whether a symbol is held.
    fn is_active(&self, symbol: &Symbol) -> bool {
        self.buffer().is_active(symbol)
    }

    /// How long a symbol has been held.
    fn pressed_duration(&self, symbol: &Symbol) -> Option<Duration> {
        self.buffer().pressed_duration(symbol)
    }

    /// Whether a device code passes the channel's mapping filter.
    fn allow_input(&self, code: &str) -> bool {
        self.buffer().config().allows(code)
    }

    /// Pending steering request, if the most recent symbol is one.
    fn turn(&self) -> Option<Turn> {
        self.peek().and_then(Turn::from_symbol)
    }

    /// Handles a press of `code`: maps it, marks it held and buffers it.
    fn on_down(&mut self, code: &str) -> Symbol {
        let symbol = self.buffer().config().symbol_for(code);
        self.activate(symbol.clone());
        self.push(symbol.clone());
        symbol
    }

    /// Handles a release of `code`.
    fn on_up(&mut self, code: &str) -> Symbol {
        let symbol = self.buffer().config().symbol_for(code);
        self.deactivate(&symbol);
        symbol
    }
}
