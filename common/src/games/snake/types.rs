use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "Point")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn is_opposite(&self, other: &Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
                | (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
        )
    }

    /// Unit step on the grid; y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (-1, 0) => Some(Direction::Left),
            (1, 0) => Some(Direction::Right),
            (0, -1) => Some(Direction::Up),
            (0, 1) => Some(Direction::Down),
            _ => None,
        }
    }

    /// Negates the horizontal component.
    pub fn reflected_x(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            other => *other,
        }
    }

    /// Negates the vertical component.
    pub fn reflected_y(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            other => *other,
        }
    }
}

impl From<Direction> for Point {
    fn from(direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Point::new(dx, dy)
    }
}

macro_rules! keyword_enum {
    ($name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("Unknown {}: {:?}", $label, other)),
                }
            }
        }
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryMode {
    #[default]
    Normal,
    Wrap,
    Bounce,
}

keyword_enum!(BoundaryMode, "boundary mode" {
    Normal => "normal",
    Wrap => "wrap",
    Bounce => "bounce",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Classic,
    Time,
    Endless,
}

keyword_enum!(PlayMode, "play mode" {
    Classic => "classic",
    Time => "time",
    Endless => "endless",
});

/// Cosmetic only; carried so high scores remember what the run looked like.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skin {
    #[default]
    Emerald,
    Cyan,
    Amber,
    Violet,
}

keyword_enum!(Skin, "skin" {
    Emerald => "emerald",
    Cyan => "cyan",
    Amber => "amber",
    Violet => "violet",
});

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
    Neon,
}

keyword_enum!(Theme, "theme" {
    Dark => "dark",
    Light => "light",
    Neon => "neon",
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeathReason {
    WallCollision,
    SelfCollision,
    ObstacleCollision,
    TimeUp,
}

impl fmt::Display for DeathReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DeathReason::WallCollision => "hit the wall",
            DeathReason::SelfCollision => "bit itself",
            DeathReason::ObstacleCollision => "hit an obstacle",
            DeathReason::TimeUp => "ran out of time",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    NotStarted,
    Running,
    Paused,
    GameOver(DeathReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Continuing,
    Ate,
    GameOver(DeathReason),
}

/// Player input after keyboard, pad or swipe decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    Turn(Direction),
    TogglePause,
    Restart,
    Start,
}

/// Player-selected world shape; survives restarts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    pub board_size: usize,
    pub boundary_mode: BoundaryMode,
    pub play_mode: PlayMode,
    pub skin: Skin,
}

pub const MIN_BOARD_SIZE: usize = 8;
pub const MAX_BOARD_SIZE: usize = 64;
pub const DEFAULT_BOARD_SIZE: usize = 24;

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            board_size: DEFAULT_BOARD_SIZE,
            boundary_mode: BoundaryMode::default(),
            play_mode: PlayMode::default(),
            skin: Skin::default(),
        }
    }
}

pub fn is_valid_board_size(size: usize) -> bool {
    (MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(&Direction::Down));
        assert!(Direction::Left.is_opposite(&Direction::Right));
        assert!(!Direction::Up.is_opposite(&Direction::Left));
        assert!(!Direction::Right.is_opposite(&Direction::Right));
    }

    #[test]
    fn test_delta_and_from_delta_agree() {
        for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let (dx, dy) = direction.delta();
            assert_eq!(Direction::from_delta(dx, dy), Some(direction));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn test_reflection_only_touches_one_axis() {
        assert_eq!(Direction::Right.reflected_x(), Direction::Left);
        assert_eq!(Direction::Up.reflected_x(), Direction::Up);
        assert_eq!(Direction::Down.reflected_y(), Direction::Up);
        assert_eq!(Direction::Left.reflected_y(), Direction::Left);
    }

    #[test]
    fn test_keyword_enums_parse_case_insensitively() {
        assert_eq!("WRAP".parse::<BoundaryMode>(), Ok(BoundaryMode::Wrap));
        assert_eq!(" time ".parse::<PlayMode>(), Ok(PlayMode::Time));
        assert_eq!("violet".parse::<Skin>(), Ok(Skin::Violet));
        assert!("sideways".parse::<BoundaryMode>().is_err());
        assert_eq!(Theme::Neon.to_string(), "neon");
    }

    #[test]
    fn test_direction_serializes_as_vector() {
        let yaml = serde_yaml_ng::to_string(&Direction::Up).unwrap();
        assert!(yaml.contains("x: 0"));
        assert!(yaml.contains("y: -1"));
    }

    #[test]
    fn test_board_size_bounds() {
        assert!(is_valid_board_size(DEFAULT_BOARD_SIZE));
        assert!(!is_valid_board_size(MIN_BOARD_SIZE - 1));
        assert!(!is_valid_board_size(MAX_BOARD_SIZE + 1));
    }
}
