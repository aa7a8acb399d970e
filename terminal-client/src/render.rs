use std::fmt::Write;
use std::time::Duration;

use chrono::{DateTime, Local};
use common::games::snake::{
    HighScoreEntry, PlayMode, Point, RunPhase, Skin, SnakeGameState,
};
use rand::Rng;

/// Transient horizontal jitter applied to the whole board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenShake {
    pub until: Duration,
    pub magnitude: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Effects {
    pub shake: Option<ScreenShake>,
}

impl Effects {
    pub fn trigger_shake(&mut self, now: Duration, duration: Duration, magnitude: usize) {
        self.shake = Some(ScreenShake {
            until: now + duration,
            magnitude,
        });
    }

    pub fn is_shaking(&self, now: Duration) -> bool {
        self.shake.is_some_and(|shake| now < shake.until)
    }

    fn offset(&self, now: Duration) -> usize {
        match self.shake {
            Some(shake) if now < shake.until && shake.magnitude > 0 => {
                rand::rng().random_range(0..=shake.magnitude)
            }
            _ => 0,
        }
    }
}

fn body_glyph(skin: Skin) -> char {
    match skin {
        Skin::Emerald => 'o',
        Skin::Cyan => '=',
        Skin::Amber => '+',
        Skin::Violet => '~',
    }
}

fn cell_glyph(game: &SnakeGameState, point: Point) -> char {
    if game.snake().head() == point {
        '@'
    } else if game.snake().contains(point) {
        body_glyph(game.config().skin)
    } else if game.food() == Some(point) {
        '*'
    } else if game.obstacles().contains(&point) {
        '#'
    } else {
        '.'
    }
}

fn status_line(game: &SnakeGameState) -> String {
    match game.phase() {
        RunPhase::NotStarted => "Press <enter> or a direction to start".to_string(),
        RunPhase::Running => String::new(),
        RunPhase::Paused => "Paused, 'p' to resume".to_string(),
        RunPhase::GameOver(reason) => format!("Game over: the snake {}. 'r' to restart", reason),
    }
}

pub fn render(game: &SnakeGameState, effects: &Effects, now: Duration) -> String {
    let config = game.config();
    let size = game.grid().size();
    let padding = " ".repeat(effects.offset(now));
    let mut out = String::new();

    let _ = write!(
        out,
        "Score: {}  Speed: {:.2}x  {} / {}  {}x{}",
        game.score(),
        game.speed_factor(),
        config.play_mode,
        config.boundary_mode,
        size,
        size
    );
    if config.play_mode == PlayMode::Time {
        let _ = write!(out, "  Time: {:.1}s", game.time_left().as_secs_f32());
    }
    out.push('\n');

    let border = format!("{}+{}+\n", padding, "-".repeat(size));
    out.push_str(&border);
    for y in 0..size as i32 {
        out.push_str(&padding);
        out.push('|');
        for x in 0..size as i32 {
            out.push(cell_glyph(game, Point::new(x, y)));
        }
        out.push_str("|\n");
    }
    out.push_str(&border);

    let status = status_line(game);
    if !status.is_empty() {
        out.push_str(&status);
        out.push('\n');
    }
    out
}

pub fn format_high_scores(mode: PlayMode, entries: &[HighScoreEntry]) -> String {
    let mut out = format!("High scores ({})\n", mode);
    if entries.is_empty() {
        out.push_str("  none yet\n");
        return out;
    }

    for (rank, entry) in entries.iter().enumerate() {
        let date = DateTime::from_timestamp_millis(entry.date)
            .map(|date| date.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        let _ = writeln!(
            out,
            "  {}. {:>5}  {}  {}x{} {} {}",
            rank + 1,
            entry.score,
            date,
            entry.cells,
            entry.cells,
            entry.boundary_mode,
            entry.skin
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::games::SessionRng;
    use common::games::snake::{BoundaryMode, EngineSettings, WorldConfig};

    fn small_game(play_mode: PlayMode) -> SnakeGameState {
        let config = WorldConfig {
            board_size: 8,
            play_mode,
            ..WorldConfig::default()
        };
        SnakeGameState::new(config, EngineSettings::default(), &mut SessionRng::new(3))
    }

    #[test]
    fn test_render_draws_board_and_hud() {
        let game = small_game(PlayMode::Classic);
        let frame = render(&game, &Effects::default(), Duration::ZERO);
        let lines: Vec<&str> = frame.lines().collect();

        assert!(lines[0].starts_with("Score: 0  Speed: 1.00x  classic / normal  8x8"));
        assert_eq!(lines[1], "+--------+");
        assert_eq!(&lines[6][..4], "|oo@");
        assert_eq!(lines[10], "+--------+");
        assert_eq!(lines[11], "Press <enter> or a direction to start");
        assert_eq!(frame.matches('*').count(), 1);
    }

    #[test]
    fn test_timed_mode_shows_countdown() {
        let game = small_game(PlayMode::Time);
        let frame = render(&game, &Effects::default(), Duration::ZERO);
        assert!(frame.lines().next().unwrap().ends_with("Time: 60.0s"));
    }

    #[test]
    fn test_shake_offsets_board_only_while_active() {
        let game = small_game(PlayMode::Classic);
        let mut effects = Effects::default();
        effects.trigger_shake(Duration::from_secs(1), Duration::from_millis(300), 3);

        assert!(effects.is_shaking(Duration::from_millis(1200)));
        let shaken = render(&game, &effects, Duration::from_millis(1200));
        for line in shaken.lines().skip(1).take(10) {
            let indent = line.len() - line.trim_start().len();
            assert!(indent <= 3);
        }

        assert!(!effects.is_shaking(Duration::from_millis(1300)));
        let settled = render(&game, &effects, Duration::from_millis(1300));
        assert_eq!(settled.lines().nth(1), Some("+--------+"));
    }

    #[test]
    fn test_high_score_table() {
        let entries = vec![
            HighScoreEntry {
                score: 120,
                date: 1_700_000_000_000,
                cells: 24,
                boundary_mode: BoundaryMode::Wrap,
                skin: Skin::Cyan,
            },
            HighScoreEntry {
                score: 40,
                date: 1_700_000_100_000,
                cells: 16,
                boundary_mode: BoundaryMode::Normal,
                skin: Skin::Emerald,
            },
        ];

        let table = format_high_scores(PlayMode::Classic, &entries);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "High scores (classic)");
        assert!(lines[1].starts_with("  1.   120  "));
        assert!(lines[1].ends_with("24x24 wrap cyan"));
        assert!(lines[2].starts_with("  2.    40  "));
        assert_eq!(
            format_high_scores(PlayMode::Time, &[]),
            "High scores (time)\n  none yet\n"
        );
    }
}
