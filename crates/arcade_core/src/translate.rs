//! Event translator: backend-native events to the uniform game stream.

use arcade_api::{Event, Key, RawEvent};
use serde::{Deserialize, Serialize};

/// The reserved control key bindings.
///
/// Exact key codes are a configuration concern: they are loaded from the
/// TOML config and handed to the translator, never hard-coded in games or
/// display backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlBindings {
    pub previous_display: Key,
    pub next_display: Key,
    pub previous_game: Key,
    pub next_game: Key,
    pub quit: Key,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            previous_display: Key::F1,
            next_display: Key::F2,
            previous_game: Key::F3,
            next_game: Key::F4,
            quit: Key::Escape,
        }
    }
}

/// Pure translation of [`RawEvent`]s into [`Event`]s.
///
/// One native event maps to exactly one `Event`, or to nothing for events
/// the platform ignores (key releases, mouse releases, keys bound to no
/// action and no game meaning). Translation is deterministic: the same raw
/// sequence always yields the same event sequence.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    bindings: ControlBindings,
}

impl Translator {
    pub fn new(bindings: ControlBindings) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &ControlBindings {
        &self.bindings
    }

    /// Translates one backend-native event.
    ///
    /// The reserved control combinations become the dedicated swap/quit
    /// tags, intercepted by the runtime before reaching the active game;
    /// everything else becomes ordinary game input.
    pub fn translate(&self, raw: &RawEvent) -> Option<Event> {
        match *raw {
            RawEvent::KeyDown(key) => Some(self.translate_key(key)),
            // Releases carry no meaning on this platform
            RawEvent::KeyUp(_) => None,
            RawEvent::MouseDown { button, x, y } => Some(Event::MouseClick { x, y, button }),
            RawEvent::MouseUp { .. } => None,
            RawEvent::Resized { width, height } => Some(Event::Resize { width, height }),
            RawEvent::Closed => Some(Event::Quit),
        }
    }

    fn translate_key(&self, key: Key) -> Event {
        let b = &self.bindings;
        if key == b.quit {
            Event::Quit
        } else if key == b.previous_display {
            Event::PreviousDisplay
        } else if key == b.next_display {
            Event::NextDisplay
        } else if key == b.previous_game {
            Event::PreviousGame
        } else if key == b.next_game {
            Event::NextGame
        } else {
            Event::KeyPress(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_api::MouseButton;

    #[test]
    fn control_bindings_translate_to_reserved_tags() {
        let translator = Translator::default();

        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::F1)), Some(Event::PreviousDisplay));
        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::F2)), Some(Event::NextDisplay));
        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::F3)), Some(Event::PreviousGame));
        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::F4)), Some(Event::NextGame));
        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::Escape)), Some(Event::Quit));
    }

    #[test]
    fn ordinary_keys_become_key_presses() {
        let translator = Translator::default();
        assert_eq!(
            translator.translate(&RawEvent::KeyDown(Key::Space)),
            Some(Event::KeyPress(Key::Space))
        );
    }

    #[test]
    fn rebinding_moves_the_reserved_tags() {
        let translator = Translator::new(ControlBindings {
            next_display: Key::D,
            ..ControlBindings::default()
        });

        assert_eq!(translator.translate(&RawEvent::KeyDown(Key::D)), Some(Event::NextDisplay));
        // F2 is no longer bound to anything special
        assert_eq!(
            translator.translate(&RawEvent::KeyDown(Key::F2)),
            Some(Event::KeyPress(Key::F2))
        );
    }

    #[test]
    fn releases_are_ignored() {
        let translator = Translator::default();
        assert_eq!(translator.translate(&RawEvent::KeyUp(Key::Space)), None);
        assert_eq!(
            translator.translate(&RawEvent::MouseUp { button: MouseButton::Left, x: 3, y: 4 }),
            None
        );
    }

    #[test]
    fn mouse_resize_and_close_map_one_to_one() {
        let translator = Translator::default();
        assert_eq!(
            translator.translate(&RawEvent::MouseDown { button: MouseButton::Left, x: 7, y: 2 }),
            Some(Event::MouseClick { x: 7, y: 2, button: MouseButton::Left })
        );
        assert_eq!(
            translator.translate(&RawEvent::Resized { width: 80, height: 24 }),
            Some(Event::Resize { width: 80, height: 24 })
        );
        assert_eq!(translator.translate(&RawEvent::Closed), Some(Event::Quit));
    }

    #[test]
    fn translation_is_deterministic_over_a_scripted_sequence() {
        let translator = Translator::default();
        let script = [
            RawEvent::KeyDown(Key::Up),
            RawEvent::KeyUp(Key::Up),
            RawEvent::MouseDown { button: MouseButton::Right, x: 1, y: 1 },
            RawEvent::KeyDown(Key::F2),
            RawEvent::Resized { width: 120, height: 40 },
            RawEvent::KeyDown(Key::Escape),
        ];

        let first: Vec<_> = script.iter().map(|raw| translator.translate(raw)).collect();
        for _ in 0..10 {
            let again: Vec<_> = script.iter().map(|raw| translator.translate(raw)).collect();
            assert_eq!(first, again);
        }
    }
}
