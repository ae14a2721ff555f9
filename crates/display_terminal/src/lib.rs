//! Terminal display backend.
//!
//! Renders through crossterm on an alternate raw-mode screen. One game cell
//! maps to one terminal character cell; colors are passed through as 24-bit
//! RGB and degrade however the terminal emulator decides.
//!
//! Event polling uses crossterm's bounded `event::poll`, so the host loop's
//! timeout contract holds even when the user touches nothing.

use arcade_api::{
    export_display_plugin, Cell, Display, Key, MouseButton, PluginError, Position, RawEvent,
    TextStyle,
};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind,
    MouseButton as TermMouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::{cursor, execute, queue};
use std::io::{self, Write};
use std::time::Duration;

/// Crossterm-backed display plugin.
pub struct TerminalDisplay {
    stdout: io::Stdout,
    opened: bool,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            opened: false,
        }
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TerminalDisplay {
    fn open(&mut self) -> Result<(), PluginError> {
        enable_raw_mode().map_err(PluginError::backend)?;
        execute!(
            self.stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )
        .map_err(PluginError::backend)?;
        self.opened = true;
        Ok(())
    }

    fn clear(&mut self) {
        queue!(self.stdout, Clear(ClearType::All)).ok();
    }

    fn draw_cell(&mut self, position: Position, cell: Cell) {
        if position.x < 0 || position.y < 0 {
            return;
        }
        queue!(
            self.stdout,
            cursor::MoveTo(position.x as u16, position.y as u16),
            SetForegroundColor(to_term_color(cell.fg)),
            SetBackgroundColor(to_term_color(cell.bg)),
            Print(cell.glyph),
            SetAttribute(Attribute::Reset)
        )
        .ok();
    }

    fn draw_text(&mut self, position: Position, text: &str, style: TextStyle) {
        if position.x < 0 || position.y < 0 {
            return;
        }
        let attribute = if style.bold {
            Attribute::Bold
        } else {
            Attribute::NormalIntensity
        };
        queue!(
            self.stdout,
            cursor::MoveTo(position.x as u16, position.y as u16),
            SetForegroundColor(to_term_color(style.fg)),
            SetAttribute(attribute),
            Print(text),
            SetAttribute(Attribute::Reset)
        )
        .ok();
    }

    fn present(&mut self) {
        self.stdout.flush().ok();
    }

    fn poll_event(&mut self, timeout: Duration) -> Option<RawEvent> {
        match crossterm::event::poll(timeout) {
            Ok(true) => match crossterm::event::read() {
                Ok(event) => map_event(event),
                Err(_) => None,
            },
            _ => None,
        }
    }

    fn close(&mut self) {
        if !self.opened {
            return;
        }
        execute!(
            self.stdout,
            cursor::Show,
            DisableMouseCapture,
            LeaveAlternateScreen
        )
        .ok();
        disable_raw_mode().ok();
        self.opened = false;
    }

    fn name(&self) -> &str {
        "terminal"
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        // The surface must not survive the instance, whatever the host did
        self.close();
    }
}

fn to_term_color(color: arcade_api::Color) -> Color {
    Color::Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
    }
}

/// Maps one crossterm event onto the shared raw-event model.
///
/// Returns `None` for events the platform has no representation for
/// (focus changes, paste, unmapped keys, mouse drags).
fn map_event(event: TermEvent) -> Option<RawEvent> {
    match event {
        TermEvent::Key(key_event) => map_key_event(key_event),
        TermEvent::Mouse(mouse_event) => map_mouse_event(mouse_event),
        TermEvent::Resize(width, height) => Some(RawEvent::Resized { width, height }),
        _ => None,
    }
}

fn map_key_event(event: KeyEvent) -> Option<RawEvent> {
    let key = map_key_code(event.code)?;
    match event.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => Some(RawEvent::KeyDown(key)),
        // Release events only arrive under the kitty keyboard protocol
        KeyEventKind::Release => Some(RawEvent::KeyUp(key)),
    }
}

fn map_mouse_event(event: MouseEvent) -> Option<RawEvent> {
    let x = i32::from(event.column);
    let y = i32::from(event.row);
    match event.kind {
        MouseEventKind::Down(button) => Some(RawEvent::MouseDown {
            button: map_mouse_button(button),
            x,
            y,
        }),
        MouseEventKind::Up(button) => Some(RawEvent::MouseUp {
            button: map_mouse_button(button),
            x,
            y,
        }),
        MouseEventKind::ScrollUp => Some(RawEvent::MouseDown {
            button: MouseButton::WheelUp,
            x,
            y,
        }),
        MouseEventKind::ScrollDown => Some(RawEvent::MouseDown {
            button: MouseButton::WheelDown,
            x,
            y,
        }),
        _ => None,
    }
}

fn map_mouse_button(button: TermMouseButton) -> MouseButton {
    match button {
        TermMouseButton::Left => MouseButton::Left,
        TermMouseButton::Right => MouseButton::Right,
        TermMouseButton::Middle => MouseButton::Middle,
    }
}

fn map_key_code(code: KeyCode) -> Option<Key> {
    let key = match code {
        KeyCode::Char(c) => return map_char(c),
        KeyCode::F(1) => Key::F1,
        KeyCode::F(2) => Key::F2,
        KeyCode::F(3) => Key::F3,
        KeyCode::F(4) => Key::F4,
        KeyCode::F(5) => Key::F5,
        KeyCode::F(6) => Key::F6,
        KeyCode::F(7) => Key::F7,
        KeyCode::F(8) => Key::F8,
        KeyCode::F(9) => Key::F9,
        KeyCode::F(10) => Key::F10,
        KeyCode::F(11) => Key::F11,
        KeyCode::F(12) => Key::F12,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        _ => return None,
    };
    Some(key)
}

fn map_char(c: char) -> Option<Key> {
    let key = match c.to_ascii_lowercase() {
        'a' => Key::A,
        'b' => Key::B,
        'c' => Key::C,
        'd' => Key::D,
        'e' => Key::E,
        'f' => Key::F,
        'g' => Key::G,
        'h' => Key::H,
        'i' => Key::I,
        'j' => Key::J,
        'k' => Key::K,
        'l' => Key::L,
        'm' => Key::M,
        'n' => Key::N,
        'o' => Key::O,
        'p' => Key::P,
        'q' => Key::Q,
        'r' => Key::R,
        's' => Key::S,
        't' => Key::T,
        'u' => Key::U,
        'v' => Key::V,
        'w' => Key::W,
        'x' => Key::X,
        'y' => Key::Y,
        'z' => Key::Z,
        '0' => Key::Num0,
        '1' => Key::Num1,
        '2' => Key::Num2,
        '3' => Key::Num3,
        '4' => Key::Num4,
        '5' => Key::Num5,
        '6' => Key::Num6,
        '7' => Key::Num7,
        '8' => Key::Num8,
        '9' => Key::Num9,
        ' ' => Key::Space,
        '-' => Key::Minus,
        '+' => Key::Plus,
        ',' => Key::Comma,
        '.' => Key::Period,
        '/' => Key::Slash,
        ';' => Key::Semicolon,
        '\'' => Key::Apostrophe,
        '\\' => Key::Backslash,
        '`' => Key::Grave,
        '[' => Key::LeftBracket,
        ']' => Key::RightBracket,
        _ => return None,
    };
    Some(key)
}

export_display_plugin!(TerminalDisplay, "terminal");

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn letters_map_case_insensitively() {
        assert_eq!(map_char('a'), Some(Key::A));
        assert_eq!(map_char('A'), Some(Key::A));
        assert_eq!(map_char('z'), Some(Key::Z));
    }

    #[test]
    fn function_and_navigation_keys_map() {
        assert_eq!(map_key_code(KeyCode::F(2)), Some(Key::F2));
        assert_eq!(map_key_code(KeyCode::Esc), Some(Key::Escape));
        assert_eq!(map_key_code(KeyCode::Up), Some(Key::Up));
        assert_eq!(map_key_code(KeyCode::PageDown), Some(Key::PageDown));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(map_key_code(KeyCode::CapsLock), None);
        assert_eq!(map_char('€'), None);
    }

    #[test]
    fn key_presses_become_key_down_events() {
        assert_eq!(map_event(press(KeyCode::Char('q'))), Some(RawEvent::KeyDown(Key::Q)));
        assert_eq!(map_event(press(KeyCode::Enter)), Some(RawEvent::KeyDown(Key::Enter)));
    }

    #[test]
    fn mouse_buttons_and_wheel_map() {
        let click = MouseEvent {
            kind: MouseEventKind::Down(TermMouseButton::Left),
            column: 7,
            row: 3,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            map_mouse_event(click),
            Some(RawEvent::MouseDown { button: MouseButton::Left, x: 7, y: 3 })
        );

        let scroll = MouseEvent {
            kind: MouseEventKind::ScrollUp,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(
            map_mouse_event(scroll),
            Some(RawEvent::MouseDown { button: MouseButton::WheelUp, x: 0, y: 0 })
        );
    }

    #[test]
    fn drags_and_moves_are_dropped() {
        let drag = MouseEvent {
            kind: MouseEventKind::Drag(TermMouseButton::Left),
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(map_mouse_event(drag), None);
    }

    #[test]
    fn resize_passes_through() {
        assert_eq!(
            map_event(TermEvent::Resize(120, 40)),
            Some(RawEvent::Resized { width: 120, height: 40 })
        );
    }

    #[test]
    fn close_before_open_is_a_no_op() {
        let mut display = TerminalDisplay::new();
        // Never opened, so close must not touch the terminal state
        display.close();
        display.close();
        assert_eq!(display.name(), "terminal");
    }
}
