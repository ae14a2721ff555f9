//! Minesweeper game plugin.
//!
//! Pure game logic against the capability contracts: all state lives in the
//! plugin, all drawing goes through whatever display the host hands in, so
//! the same binary plays identically on every backend.
//!
//! Controls: arrows move the cursor, Space or Enter reveals, M toggles a
//! flag, R restarts. Left click reveals, right click flags.

use arcade_api::{
    export_game_plugin, Cell, Color, Display, Event, Game, Key, MouseButton, Position, Score,
    TextStyle, UpdateOutcome,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const WIDTH: i32 = 16;
const HEIGHT: i32 = 12;
const MINE_COUNT: usize = 24;

// Board placement on the render surface
const BOARD_X: i32 = 2;
const BOARD_Y: i32 = 3;

const REVEAL_POINTS: f32 = 10.0;
const WIN_BONUS: f32 = 500.0;

#[derive(Debug, Clone, Copy, Default)]
struct Tile {
    mine: bool,
    revealed: bool,
    flagged: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Playing,
    Won,
    Lost,
}

/// The minesweeper game state.
pub struct Minesweeper {
    tiles: Vec<Tile>,
    cursor: Position,
    phase: Phase,
    /// Mines are placed on the first reveal so it can never hit one
    mines_placed: bool,
    revealed_safe: usize,
    player: String,
    rng: StdRng,
}

impl Minesweeper {
    pub fn new() -> Self {
        let player = std::env::var("USER").unwrap_or_else(|_| "player".to_string());
        Self::with_rng(StdRng::from_entropy(), player)
    }

    fn with_rng(rng: StdRng, player: String) -> Self {
        Self {
            tiles: vec![Tile::default(); (WIDTH * HEIGHT) as usize],
            cursor: Position::new(WIDTH / 2, HEIGHT / 2),
            phase: Phase::Playing,
            mines_placed: false,
            revealed_safe: 0,
            player,
            rng,
        }
    }

    fn index(x: i32, y: i32) -> Option<usize> {
        if (0..WIDTH).contains(&x) && (0..HEIGHT).contains(&y) {
            Some((y * WIDTH + x) as usize)
        } else {
            None
        }
    }

    fn place_mines(&mut self, safe: usize) {
        let mut placed = 0;
        while placed < MINE_COUNT {
            let candidate = self.rng.gen_range(0..self.tiles.len());
            if candidate == safe || self.tiles[candidate].mine {
                continue;
            }
            self.tiles[candidate].mine = true;
            placed += 1;
        }
        self.mines_placed = true;
    }

    fn adjacent_mines(&self, x: i32, y: i32) -> u8 {
        let mut count = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if let Some(i) = Self::index(x + dx, y + dy) {
                    if self.tiles[i].mine {
                        count += 1;
                    }
                }
            }
        }
        count
    }

    fn reveal(&mut self, x: i32, y: i32) {
        let Some(start) = Self::index(x, y) else {
            return;
        };
        if self.phase != Phase::Playing || self.tiles[start].revealed || self.tiles[start].flagged {
            return;
        }
        if !self.mines_placed {
            self.place_mines(start);
        }
        if self.tiles[start].mine {
            self.tiles[start].revealed = true;
            self.phase = Phase::Lost;
            return;
        }

        // Flood fill outward from zero-adjacency tiles
        let mut stack = vec![(x, y)];
        while let Some((cx, cy)) = stack.pop() {
            let Some(i) = Self::index(cx, cy) else {
                continue;
            };
            if self.tiles[i].revealed || self.tiles[i].flagged || self.tiles[i].mine {
                continue;
            }
            self.tiles[i].revealed = true;
            self.revealed_safe += 1;
            if self.adjacent_mines(cx, cy) == 0 {
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx != 0 || dy != 0 {
                            stack.push((cx + dx, cy + dy));
                        }
                    }
                }
            }
        }

        if self.revealed_safe == self.tiles.len() - MINE_COUNT {
            self.phase = Phase::Won;
        }
    }

    fn toggle_flag(&mut self, x: i32, y: i32) {
        if self.phase != Phase::Playing {
            return;
        }
        if let Some(i) = Self::index(x, y) {
            if !self.tiles[i].revealed {
                self.tiles[i].flagged = !self.tiles[i].flagged;
            }
        }
    }

    fn move_cursor(&mut self, dx: i32, dy: i32) {
        let x = (self.cursor.x + dx).clamp(0, WIDTH - 1);
        let y = (self.cursor.y + dy).clamp(0, HEIGHT - 1);
        self.cursor = Position::new(x, y);
    }

    fn flags(&self) -> usize {
        self.tiles.iter().filter(|t| t.flagged).count()
    }

    fn handle_key(&mut self, key: Key) {
        match key {
            Key::Up => self.move_cursor(0, -1),
            Key::Down => self.move_cursor(0, 1),
            Key::Left => self.move_cursor(-1, 0),
            Key::Right => self.move_cursor(1, 0),
            Key::Space | Key::Enter => self.reveal(self.cursor.x, self.cursor.y),
            Key::M => self.toggle_flag(self.cursor.x, self.cursor.y),
            Key::R => self.init(),
            _ => {}
        }
    }

    fn handle_click(&mut self, x: i32, y: i32, button: MouseButton) {
        let bx = x - BOARD_X;
        let by = y - BOARD_Y;
        if Self::index(bx, by).is_none() {
            return;
        }
        self.cursor = Position::new(bx, by);
        match button {
            MouseButton::Left => self.reveal(bx, by),
            MouseButton::Right => self.toggle_flag(bx, by),
            _ => {}
        }
    }

    fn tile_cell(&self, x: i32, y: i32) -> Cell {
        let tile = self.tiles[Self::index(x, y).unwrap_or(0)];
        let show_mines = self.phase == Phase::Lost;

        if tile.revealed || (show_mines && tile.mine) {
            if tile.mine {
                return Cell::new('*', Color::WHITE, Color::RED);
            }
            return match self.adjacent_mines(x, y) {
                0 => Cell::new(' ', Color::WHITE, Color::BLACK),
                n @ 1 => Cell::new(digit(n), Color::BLUE, Color::BLACK),
                n @ 2 => Cell::new(digit(n), Color::GREEN, Color::BLACK),
                n @ 3 => Cell::new(digit(n), Color::RED, Color::BLACK),
                n => Cell::new(digit(n), Color::YELLOW, Color::BLACK),
            };
        }
        if tile.flagged {
            return Cell::new('F', Color::YELLOW, Color::GREY);
        }
        Cell::new('#', Color::WHITE, Color::GREY)
    }
}

fn digit(n: u8) -> char {
    (b'0' + n) as char
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for Minesweeper {
    fn init(&mut self) {
        let player = std::mem::take(&mut self.player);
        let rng = StdRng::from_rng(&mut self.rng).unwrap_or_else(|_| StdRng::from_entropy());
        *self = Self::with_rng(rng, player);
    }

    fn update(&mut self, event: &Event) -> UpdateOutcome {
        match *event {
            Event::KeyPress(key) => self.handle_key(key),
            Event::MouseClick { x, y, button } => self.handle_click(x, y, button),
            // Nothing animates between inputs
            Event::Tick | Event::Resize { .. } => {}
            _ => {}
        }
        if self.is_over() {
            UpdateOutcome::Over
        } else {
            UpdateOutcome::Continue
        }
    }

    fn render(&mut self, display: &mut dyn Display) {
        let header = format!(
            "MINESWEEPER   mines: {}   flags: {}",
            MINE_COUNT,
            self.flags()
        );
        display.draw_text(
            Position::new(BOARD_X, 1),
            &header,
            TextStyle { fg: Color::WHITE, bold: true },
        );

        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let mut cell = self.tile_cell(x, y);
                if self.phase == Phase::Playing && self.cursor == Position::new(x, y) {
                    cell = Cell::new(cell.glyph, Color::BLACK, Color::WHITE);
                }
                display.draw_cell(Position::new(BOARD_X + x, BOARD_Y + y), cell);
            }
        }

        let footer_y = BOARD_Y + HEIGHT + 1;
        match self.phase {
            Phase::Playing => display.draw_text(
                Position::new(BOARD_X, footer_y),
                "arrows: move  space: reveal  m: flag  r: restart",
                TextStyle { fg: Color::GREY, bold: false },
            ),
            Phase::Won => display.draw_text(
                Position::new(BOARD_X, footer_y),
                "YOU WIN - press R to play again",
                TextStyle { fg: Color::GREEN, bold: true },
            ),
            Phase::Lost => display.draw_text(
                Position::new(BOARD_X, footer_y),
                "BOOM - press R to try again",
                TextStyle { fg: Color::RED, bold: true },
            ),
        }
    }

    fn is_over(&self) -> bool {
        self.phase != Phase::Playing
    }

    fn score(&self) -> Score {
        let bonus = if self.phase == Phase::Won { WIN_BONUS } else { 0.0 };
        Score::new(self.revealed_safe as f32 * REVEAL_POINTS + bonus, self.player.clone())
    }

    fn name(&self) -> &str {
        "minesweeper"
    }
}

export_game_plugin!(Minesweeper, "minesweeper");

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Minesweeper {
        Minesweeper::with_rng(StdRng::seed_from_u64(7), "tester".to_string())
    }

    fn first_mine(game: &Minesweeper) -> (i32, i32) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if game.tiles[Minesweeper::index(x, y).unwrap()].mine {
                    return (x, y);
                }
            }
        }
        panic!("no mines placed");
    }

    fn first_safe_hidden(game: &Minesweeper) -> (i32, i32) {
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let tile = game.tiles[Minesweeper::index(x, y).unwrap()];
                if !tile.mine && !tile.revealed {
                    return (x, y);
                }
            }
        }
        panic!("no hidden safe tiles");
    }

    #[test]
    fn first_reveal_is_always_safe() {
        // Whatever the seed, the first revealed tile never holds a mine
        for seed in 0..20 {
            let mut game = Minesweeper::with_rng(StdRng::seed_from_u64(seed), "t".to_string());
            game.reveal(0, 0);
            assert_eq!(game.phase, Phase::Playing, "seed {seed} lost on first reveal");
            assert!(game.revealed_safe > 0);
        }
    }

    #[test]
    fn mine_placement_count_is_exact() {
        let mut game = seeded();
        game.reveal(0, 0);
        let mines = game.tiles.iter().filter(|t| t.mine).count();
        assert_eq!(mines, MINE_COUNT);
    }

    #[test]
    fn revealing_a_mine_loses() {
        let mut game = seeded();
        game.reveal(0, 0);
        let (mx, my) = first_mine(&game);

        game.reveal(mx, my);
        assert_eq!(game.phase, Phase::Lost);
        assert!(game.is_over());
    }

    #[test]
    fn flagged_tiles_cannot_be_revealed() {
        let mut game = seeded();
        game.reveal(0, 0);
        let (x, y) = first_safe_hidden(&game);

        game.toggle_flag(x, y);
        let revealed_before = game.revealed_safe;
        game.reveal(x, y);
        assert_eq!(game.revealed_safe, revealed_before);

        game.toggle_flag(x, y);
        game.reveal(x, y);
        assert!(game.revealed_safe > revealed_before);
    }

    #[test]
    fn revealing_every_safe_tile_wins() {
        let mut game = seeded();
        game.reveal(0, 0);
        // Cheat from inside the crate: reveal all non-mine tiles directly
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                if !game.tiles[Minesweeper::index(x, y).unwrap()].mine {
                    game.reveal(x, y);
                }
            }
        }
        assert_eq!(game.phase, Phase::Won);
        assert!(game.score().points >= WIN_BONUS);
    }

    #[test]
    fn score_reports_the_player_name() {
        let mut game = seeded();
        game.reveal(0, 0);
        let score = game.score();
        assert_eq!(score.player, "tester");
        assert_eq!(score.points, game.revealed_safe as f32 * REVEAL_POINTS);
    }

    #[test]
    fn cursor_stays_on_the_board() {
        let mut game = seeded();
        for _ in 0..100 {
            game.update(&Event::KeyPress(Key::Left));
            game.update(&Event::KeyPress(Key::Up));
        }
        assert_eq!(game.cursor, Position::new(0, 0));

        for _ in 0..100 {
            game.update(&Event::KeyPress(Key::Right));
            game.update(&Event::KeyPress(Key::Down));
        }
        assert_eq!(game.cursor, Position::new(WIDTH - 1, HEIGHT - 1));
    }

    #[test]
    fn mouse_clicks_translate_to_board_coordinates() {
        let mut game = seeded();
        game.update(&Event::MouseClick {
            x: BOARD_X + 4,
            y: BOARD_Y + 2,
            button: MouseButton::Left,
        });
        assert_eq!(game.cursor, Position::new(4, 2));
        assert!(game.revealed_safe > 0);

        // Clicks outside the board are ignored
        let revealed = game.revealed_safe;
        game.update(&Event::MouseClick { x: 0, y: 0, button: MouseButton::Left });
        assert_eq!(game.revealed_safe, revealed);
    }

    #[test]
    fn restart_resets_the_board_but_keeps_the_player() {
        let mut game = seeded();
        game.reveal(0, 0);
        let (mx, my) = first_mine(&game);
        game.reveal(mx, my);
        assert!(game.is_over());

        game.update(&Event::KeyPress(Key::R));
        assert!(!game.is_over());
        assert_eq!(game.revealed_safe, 0);
        assert_eq!(game.score().player, "tester");
    }

    #[test]
    fn update_reports_over_exactly_when_the_game_ended() {
        let mut game = seeded();
        assert_eq!(game.update(&Event::Tick), UpdateOutcome::Continue);

        game.reveal(0, 0);
        let (mx, my) = first_mine(&game);
        game.cursor = Position::new(mx, my);
        assert_eq!(
            game.update(&Event::KeyPress(Key::Space)),
            UpdateOutcome::Over
        );
    }
}
