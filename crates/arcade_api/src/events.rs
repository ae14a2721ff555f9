//! Input event model.
//!
//! Two layers cross the plugin boundary:
//!
//! * [`RawEvent`] - what a display backend reports from its native event
//!   queue, already normalized onto the shared [`Key`] and [`MouseButton`]
//!   enumerations but not yet interpreted.
//! * [`Event`] - the uniform stream the core feeds to games after
//!   translation, including the reserved control tags for live plugin
//!   cycling that the core intercepts before they ever reach a game.

use serde::{Deserialize, Serialize};

/// Keyboard keys shared by every display backend.
///
/// Each backend maps its own key codes onto this enumeration when building
/// [`RawEvent`]s, so games and key-binding configuration never depend on a
/// specific backend's encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Num0, Num1, Num2, Num3, Num4, Num5, Num6, Num7, Num8, Num9,

    // Function keys
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    // Navigation and editing
    Up, Down, Left, Right,
    Home, End, PageUp, PageDown, Insert, Delete,

    // Specials
    Escape, Enter, Space, Backspace, Tab,
    LeftShift, RightShift, LeftCtrl, RightCtrl, LeftAlt, RightAlt,

    // Punctuation
    Minus, Plus, Comma, Period, Slash, Semicolon,
    Apostrophe, Backslash, Grave, LeftBracket, RightBracket,
}

/// Mouse buttons, wheel steps included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    WheelUp,
    WheelDown,
}

/// A backend-native event as reported by [`crate::Display::poll_event`].
///
/// Backends normalize their key codes onto [`Key`] but perform no further
/// interpretation; the core's translator decides what each raw event means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawEvent {
    KeyDown(Key),
    KeyUp(Key),
    MouseDown { button: MouseButton, x: i32, y: i32 },
    MouseUp { button: MouseButton, x: i32, y: i32 },
    Resized { width: u16, height: u16 },
    /// The backend's surface was closed (window close button, terminal hangup).
    Closed,
}

/// The uniform event stream consumed by games.
///
/// The four cycle tags plus [`Event::Quit`] are reserved for the core
/// runtime: the translator produces them from the configured control
/// bindings and the runtime intercepts them, so a game implementation never
/// has to special-case plugin switching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    KeyPress(Key),
    MouseClick { x: i32, y: i32, button: MouseButton },
    Resize { width: u16, height: u16 },
    /// No input arrived this tick; games use it to advance animations.
    Tick,
    Quit,
    PreviousDisplay,
    NextDisplay,
    PreviousGame,
    NextGame,
}

impl Event {
    /// True for the reserved tags the core runtime intercepts before the
    /// active game sees the event.
    pub fn is_control(&self) -> bool {
        matches!(
            self,
            Event::Quit
                | Event::PreviousDisplay
                | Event::NextDisplay
                | Event::PreviousGame
                | Event::NextGame
        )
    }
}
