//! The display capability contract.

use crate::error::PluginError;
use crate::events::RawEvent;
use crate::types::{Cell, Position, TextStyle};
use std::time::Duration;

/// A rendering backend hosted by the core runtime.
///
/// Exactly one display is active at a time; the runtime `open`s it when it
/// becomes active and `close`s it before the backing plugin is unloaded.
/// All drawing happens between a `clear` and a `present`, driven by the
/// active game's render pass - the core never interprets the content.
///
/// # Lifecycle
///
/// 1. **Creation** - instance produced by the plugin factory
/// 2. **Open** - acquire the surface (window, raw-mode terminal, ...)
/// 3. **Operation** - poll/clear/draw/present once per tick
/// 4. **Close** - release the surface; must be safe to call twice
pub trait Display {
    /// Acquires the backend surface. Called once before the first frame.
    fn open(&mut self) -> Result<(), PluginError>;

    /// Clears the frame under construction.
    fn clear(&mut self);

    /// Draws one cell at a position.
    fn draw_cell(&mut self, position: Position, cell: Cell);

    /// Draws a text run starting at a position.
    fn draw_text(&mut self, position: Position, text: &str, style: TextStyle);

    /// Presents the constructed frame.
    fn present(&mut self);

    /// Polls the backend's native event queue.
    ///
    /// Blocks at most `timeout`, never indefinitely: the core loop relies
    /// on the bound to stay responsive to swap and quit requests. Returns
    /// `None` when no event arrived within the timeout.
    fn poll_event(&mut self, timeout: Duration) -> Option<RawEvent>;

    /// Releases the backend surface. Idempotent.
    fn close(&mut self);

    /// Human-readable backend name (e.g. "terminal").
    fn name(&self) -> &str;
}
