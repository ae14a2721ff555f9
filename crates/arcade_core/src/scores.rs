//! Score persistence.
//!
//! One plain-text file per game under the score directory, keeping each
//! player's best result, sorted best-first. I/O failures here are logged
//! by the caller and never fatal - losing a score must not kill a session.

use arcade_api::Score;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Line format shared with the reader: "Player: NAME - Score: VALUE".
const PLAYER_PREFIX: &str = "Player: ";
const SCORE_SEPARATOR: &str = " - Score: ";

/// Reads and writes per-game score files.
#[derive(Debug, Clone)]
pub struct ScoreBook {
    directory: PathBuf,
}

impl ScoreBook {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self { directory: directory.into() }
    }

    /// Records a finished game's score, keeping the best per player.
    pub fn record(&self, game: &str, score: &Score) -> std::io::Result<()> {
        fs::create_dir_all(&self.directory)?;

        let path = self.file_for(game);
        let mut scores = self.load(game)?;
        merge(&mut scores, score);

        let mut file = fs::File::create(&path)?;
        for entry in &scores {
            writeln!(file, "{}{}{}{}", PLAYER_PREFIX, entry.player, SCORE_SEPARATOR, entry.points)?;
        }
        Ok(())
    }

    /// Loads the recorded scores for a game, best-first. A missing file is
    /// an empty list, not an error.
    pub fn load(&self, game: &str) -> std::io::Result<Vec<Score>> {
        let path = self.file_for(game);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut scores = Vec::new();
        for line in fs::read_to_string(&path)?.lines() {
            if let Some(score) = parse_line(line) {
                scores.push(score);
            }
        }
        Ok(scores)
    }

    fn file_for(&self, game: &str) -> PathBuf {
        self.directory.join(format!("{game}.txt"))
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

fn parse_line(line: &str) -> Option<Score> {
    let rest = line.strip_prefix(PLAYER_PREFIX)?;
    let (player, points) = rest.split_once(SCORE_SEPARATOR)?;
    let points: f32 = points.trim().parse().ok()?;
    Some(Score::new(points, player))
}

fn merge(scores: &mut Vec<Score>, new: &Score) {
    match scores.iter_mut().find(|entry| entry.player == new.player) {
        Some(entry) => {
            if new.points > entry.points {
                entry.points = new.points;
            }
        }
        None => scores.push(new.clone()),
    }
    scores.sort_by(|a, b| b.points.partial_cmp(&a.points).unwrap_or(std::cmp::Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_and_load_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let book = ScoreBook::new(dir.path());

        book.record("minesweeper", &Score::new(120.0, "alice")).expect("record");
        book.record("minesweeper", &Score::new(80.0, "bob")).expect("record");

        let scores = book.load("minesweeper").expect("load");
        assert_eq!(scores.len(), 2);
        assert_eq!(scores[0].player, "alice");
        assert_eq!(scores[1].player, "bob");
    }

    #[test]
    fn keeps_the_best_score_per_player() {
        let dir = tempfile::tempdir().expect("tempdir");
        let book = ScoreBook::new(dir.path());

        book.record("snake", &Score::new(50.0, "alice")).expect("record");
        book.record("snake", &Score::new(30.0, "alice")).expect("record");
        book.record("snake", &Score::new(90.0, "alice")).expect("record");

        let scores = book.load("snake").expect("load");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].points, 90.0);
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let book = ScoreBook::new(dir.path());
        assert!(book.load("jumpman").expect("load").is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let book = ScoreBook::new(dir.path());
        std::fs::write(
            dir.path().join("snake.txt"),
            "Player: alice - Score: 10\ngarbage line\nPlayer: bob - Score: not_a_number\n",
        )
        .expect("write");

        let scores = book.load("snake").expect("load");
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].player, "alice");
    }
}
