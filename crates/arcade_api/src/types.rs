//! Value types crossing the display/game boundary.
//!
//! These are plain data carriers: the core marshals them between the active
//! game and the active display without interpreting their content.

use serde::{Deserialize, Serialize};

/// A cell coordinate on the render surface.
///
/// Games address the surface in abstract cells; each display backend decides
/// how a cell maps to its own geometry (a terminal character, a texture
/// quad, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };
    pub const WHITE: Color = Color { r: 255, g: 255, b: 255 };
    pub const RED: Color = Color { r: 220, g: 40, b: 40 };
    pub const GREEN: Color = Color { r: 40, g: 200, b: 80 };
    pub const BLUE: Color = Color { r: 60, g: 120, b: 230 };
    pub const YELLOW: Color = Color { r: 230, g: 200, b: 40 };
    pub const GREY: Color = Color { r: 128, g: 128, b: 128 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One renderable cell: a glyph plus foreground/background colors.
///
/// Graphical backends are free to substitute sprites for glyphs; the glyph
/// is the lowest common denominator every backend can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    pub fn new(glyph: char, fg: Color, bg: Color) -> Self {
        Self { glyph, fg, bg }
    }
}

/// Styling for text drawn through [`crate::Display::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextStyle {
    pub fg: Color,
    pub bold: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self { fg: Color::WHITE, bold: false }
    }
}

/// A score reported by a game when it ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub points: f32,
    pub player: String,
}

impl Score {
    pub fn new(points: f32, player: impl Into<String>) -> Self {
        Self { points, player: player.into() }
    }
}

/// The two plugin kinds the platform knows about.
///
/// The discriminants are part of the plugin ABI: the registry reads them
/// through the `arcade_plugin_kind` export to categorize a binary without
/// instantiating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PluginKind {
    Display,
    Game,
}

impl PluginKind {
    /// Raw discriminant exported across the FFI boundary.
    pub const fn as_raw(self) -> u32 {
        match self {
            PluginKind::Display => 0,
            PluginKind::Game => 1,
        }
    }

    /// Decodes a raw discriminant, rejecting anything unrecognized.
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(PluginKind::Display),
            1 => Some(PluginKind::Game),
            _ => None,
        }
    }
}

impl std::fmt::Display for PluginKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PluginKind::Display => write!(f, "display"),
            PluginKind::Game => write!(f, "game"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_kind_raw_round_trip() {
        assert_eq!(PluginKind::from_raw(PluginKind::Display.as_raw()), Some(PluginKind::Display));
        assert_eq!(PluginKind::from_raw(PluginKind::Game.as_raw()), Some(PluginKind::Game));
        assert_eq!(PluginKind::from_raw(42), None);
    }
}
