//! The game capability contract.

use crate::display::Display;
use crate::events::Event;
use crate::types::Score;

/// Result of feeding one event to a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Play continues.
    Continue,
    /// The game finished this tick; the score is available via
    /// [`Game::score`]. The runtime emits the end-of-game signal but keeps
    /// the loop running so another game or a restart can be selected.
    Over,
}

/// A game module hosted by the core runtime.
///
/// Exactly one game is active at a time. Games receive the translated
/// [`Event`] stream - never backend-native events and never the reserved
/// control tags - and render through whichever [`Display`] is currently
/// active, so a game works unchanged across every backend.
pub trait Game {
    /// Resets the game to its initial state. Called once after
    /// instantiation, before the first update.
    fn init(&mut self);

    /// Advances the game by one event (possibly just a [`Event::Tick`]).
    fn update(&mut self, event: &Event) -> UpdateOutcome;

    /// Renders the current state through the active display. The display
    /// is handed in per call and must not be retained: it may be swapped
    /// out between ticks.
    fn render(&mut self, display: &mut dyn Display);

    /// True once the game has ended (won or lost).
    fn is_over(&self) -> bool;

    /// The score to report when the game ends.
    fn score(&self) -> Score;

    /// Human-readable game name (e.g. "minesweeper").
    fn name(&self) -> &str;
}
