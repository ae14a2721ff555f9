//! Emergency menu: a statically linked fallback game.
//!
//! Used when no game plugin can be loaded at startup so the session still
//! has an active game instance. It lists whatever the registry discovered
//! and points at the configured cycle keys; actual switching happens
//! through the same reserved control events as everywhere else.

use crate::translate::ControlBindings;
use arcade_api::{Cell, Color, Display, Event, Game, Position, Score, TextStyle, UpdateOutcome};

pub struct EmergencyMenu {
    games: Vec<String>,
    bindings: ControlBindings,
}

impl EmergencyMenu {
    pub fn new(games: Vec<String>, bindings: ControlBindings) -> Self {
        Self { games, bindings }
    }
}

impl Game for EmergencyMenu {
    fn init(&mut self) {}

    fn update(&mut self, _event: &Event) -> UpdateOutcome {
        UpdateOutcome::Continue
    }

    fn render(&mut self, display: &mut dyn Display) {
        let title_style = TextStyle { fg: Color::YELLOW, bold: true };
        let text_style = TextStyle::default();

        display.draw_text(Position::new(2, 1), "ARCADE", title_style);
        display.draw_cell(Position::new(1, 1), Cell::new('*', Color::YELLOW, Color::BLACK));

        if self.games.is_empty() {
            display.draw_text(
                Position::new(2, 3),
                "No game plugins could be loaded.",
                text_style,
            );
            display.draw_text(
                Position::new(2, 4),
                "Add game libraries to the plugin directory and restart.",
                text_style,
            );
        } else {
            display.draw_text(Position::new(2, 3), "Available games:", text_style);
            for (i, name) in self.games.iter().enumerate() {
                display.draw_text(Position::new(4, 5 + i as i32), name, text_style);
            }
            display.draw_text(
                Position::new(2, 6 + self.games.len() as i32),
                &format!(
                    "Cycle games with {:?}/{:?}, displays with {:?}/{:?}",
                    self.bindings.previous_game,
                    self.bindings.next_game,
                    self.bindings.previous_display,
                    self.bindings.next_display,
                ),
                text_style,
            );
        }

        display.draw_text(
            Position::new(2, 8 + self.games.len() as i32),
            &format!("Quit with {:?}", self.bindings.quit),
            text_style,
        );
    }

    fn is_over(&self) -> bool {
        false
    }

    fn score(&self) -> Score {
        Score::new(0.0, "menu")
    }

    fn name(&self) -> &str {
        "emergency-menu"
    }
}
