use serde::Serialize;
use serde_yaml_ng::Value;

use crate::log;
use crate::storage::KeyValueStore;
use super::game_state::SnakeGameState;
use super::grid::Grid;
use super::placement::CellSampler;
use super::snake::Snake;
use super::types::{
    BoundaryMode, Direction, PlayMode, Point, RunPhase, Skin, WorldConfig, is_valid_board_size,
};

/// Saves written before the version field existed are read as version 1.
pub const SNAPSHOT_VERSION: u32 = 2;
pub const SAVE_KEY: &str = "snake.save";

#[derive(Debug)]
pub enum SnapshotError {
    YamlError(serde_yaml_ng::Error),
    NotAMapping,
    UnsupportedVersion { found: u64, expected: u32 },
    MissingSnake,
    EmptySnake,
    InvalidSegment { index: usize },
    SegmentOutOfBounds { index: usize, board_size: usize },
    NoSave,
    StoreError(String),
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::YamlError(e) => write!(f, "YAML error: {}", e),
            SnapshotError::NotAMapping => write!(f, "Snapshot is not a mapping"),
            SnapshotError::UnsupportedVersion { found, expected } => {
                write!(
                    f,
                    "Unsupported snapshot version: found {}, expected at most {}",
                    found, expected
                )
            }
            SnapshotError::MissingSnake => write!(f, "Snapshot has no snake"),
            SnapshotError::EmptySnake => write!(f, "Snapshot snake is empty"),
            SnapshotError::InvalidSegment { index } => {
                write!(f, "Snake segment {} has no integer coordinates", index)
            }
            SnapshotError::SegmentOutOfBounds { index, board_size } => {
                write!(
                    f,
                    "Snake segment {} lies outside a {}x{} board",
                    index, board_size, board_size
                )
            }
            SnapshotError::NoSave => write!(f, "No saved game"),
            SnapshotError::StoreError(e) => write!(f, "Store error: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_yaml_ng::Error> for SnapshotError {
    fn from(e: serde_yaml_ng::Error) -> Self {
        SnapshotError::YamlError(e)
    }
}

/// Restorable copy of a world. Decoded snapshots are already validated and repaired.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub version: u32,
    pub snake: Vec<Point>,
    pub direction: Direction,
    pub food: Option<Point>,
    pub score: u32,
    pub tick_ms: u32,
    pub cells: usize,
    pub boundary_mode: BoundaryMode,
    pub game_mode: PlayMode,
    pub skin: Skin,
    pub time_left_ms: u64,
    pub obstacles: Vec<Point>,
    pub foods_eaten: u32,
    pub is_running: bool,
    pub is_game_over: bool,
}

/// In-memory values used for optional fields a snapshot lacks or garbles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotDefaults {
    pub config: WorldConfig,
    pub time_left_ms: u64,
    pub tick_ms: u32,
}

impl SnapshotDefaults {
    pub fn from_game(game: &SnakeGameState) -> Self {
        Self {
            config: *game.config(),
            time_left_ms: game.time_left().as_millis() as u64,
            tick_ms: game.settings().base_tick_ms,
        }
    }
}

impl Snapshot {
    pub fn capture(game: &SnakeGameState) -> Self {
        let config = game.config();
        Self {
            version: SNAPSHOT_VERSION,
            snake: game.snake().segments().copied().collect(),
            direction: game.snake().direction,
            food: game.food(),
            score: game.score(),
            tick_ms: game.tick_ms(),
            cells: config.board_size,
            boundary_mode: config.boundary_mode,
            game_mode: config.play_mode,
            skin: config.skin,
            time_left_ms: game.time_left().as_millis() as u64,
            obstacles: game.obstacles().to_vec(),
            foods_eaten: game.foods_eaten(),
            is_running: false,
            is_game_over: false,
        }
    }

    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            board_size: self.cells,
            boundary_mode: self.boundary_mode,
            play_mode: self.game_mode,
            skin: self.skin,
        }
    }

    pub fn encode(&self) -> Result<String, SnapshotError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    pub fn decode(text: &str, defaults: &SnapshotDefaults) -> Result<Self, SnapshotError> {
        let root: Value = serde_yaml_ng::from_str(text)?;
        if !root.is_mapping() {
            return Err(SnapshotError::NotAMapping);
        }

        let version = root.get("version").and_then(Value::as_u64).unwrap_or(1);
        if version > SNAPSHOT_VERSION as u64 {
            return Err(SnapshotError::UnsupportedVersion {
                found: version,
                expected: SNAPSHOT_VERSION,
            });
        }

        let cells = root
            .get("cells")
            .and_then(Value::as_u64)
            .map(|cells| cells as usize)
            .filter(|cells| is_valid_board_size(*cells))
            .unwrap_or(defaults.config.board_size);

        let snake = decode_segments(root.get("snake"), Grid::new(cells))?;

        let direction = root
            .get("direction")
            .and_then(|value| {
                let x = value.get("x")?.as_i64()?;
                let y = value.get("y")?.as_i64()?;
                Direction::from_delta(x as i32, y as i32)
            })
            .unwrap_or(Direction::Right);

        Ok(Self {
            version: SNAPSHOT_VERSION,
            snake,
            direction,
            food: root.get("food").and_then(decode_point),
            score: decode_u32(&root, "score").unwrap_or(0),
            tick_ms: decode_u32(&root, "tick_ms").unwrap_or(defaults.tick_ms),
            cells,
            boundary_mode: decode_keyword(&root, "boundary_mode")
                .unwrap_or(defaults.config.boundary_mode),
            game_mode: decode_keyword(&root, "game_mode").unwrap_or(defaults.config.play_mode),
            skin: decode_keyword(&root, "skin").unwrap_or(defaults.config.skin),
            time_left_ms: root
                .get("time_left_ms")
                .and_then(Value::as_u64)
                .filter(|ms| *ms > 0)
                .unwrap_or(defaults.time_left_ms),
            obstacles: root
                .get("obstacles")
                .and_then(Value::as_sequence)
                .map(|items| items.iter().filter_map(decode_point).collect())
                .unwrap_or_default(),
            foods_eaten: decode_u32(&root, "foods_eaten").unwrap_or(0),
            is_running: false,
            is_game_over: false,
        })
    }
}

fn decode_segments(value: Option<&Value>, grid: Grid) -> Result<Vec<Point>, SnapshotError> {
    let items = value
        .and_then(Value::as_sequence)
        .ok_or(SnapshotError::MissingSnake)?;
    if items.is_empty() {
        return Err(SnapshotError::EmptySnake);
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let point = decode_point(item).ok_or(SnapshotError::InvalidSegment { index })?;
            if !grid.contains(point) {
                return Err(SnapshotError::SegmentOutOfBounds {
                    index,
                    board_size: grid.size(),
                });
            }
            Ok(point)
        })
        .collect()
}

fn decode_point(value: &Value) -> Option<Point> {
    let x = i32::try_from(value.get("x")?.as_i64()?).ok()?;
    let y = i32::try_from(value.get("y")?.as_i64()?).ok()?;
    Some(Point::new(x, y))
}

fn decode_u32(root: &Value, key: &str) -> Option<u32> {
    root.get(key)
        .and_then(Value::as_u64)
        .and_then(|value| u32::try_from(value).ok())
}

fn decode_keyword<T: std::str::FromStr>(root: &Value, key: &str) -> Option<T> {
    root.get(key)
        .and_then(Value::as_str)
        .and_then(|text| text.parse().ok())
}

pub fn save_snapshot(
    store: &dyn KeyValueStore,
    game: &SnakeGameState,
) -> Result<(), SnapshotError> {
    let encoded = Snapshot::capture(game).encode()?;
    store
        .set(SAVE_KEY, &encoded)
        .map_err(SnapshotError::StoreError)?;
    log!("Saved game with score {}", game.score());
    Ok(())
}

pub fn load_snapshot(
    store: &dyn KeyValueStore,
    defaults: &SnapshotDefaults,
) -> Result<Snapshot, SnapshotError> {
    let encoded = store
        .get(SAVE_KEY)
        .map_err(SnapshotError::StoreError)?
        .ok_or(SnapshotError::NoSave)?;
    Snapshot::decode(&encoded, defaults)
}

pub fn clear_snapshot(store: &dyn KeyValueStore) -> Result<(), SnapshotError> {
    store.remove(SAVE_KEY).map_err(SnapshotError::StoreError)
}

impl SnakeGameState {
    /// Replaces the whole world with a decoded snapshot. The run always resumes paused.
    pub fn restore(&mut self, snapshot: &Snapshot, sampler: &mut dyn CellSampler) {
        let grid = Grid::new(snapshot.cells);
        let Some(snake) = Snake::from_segments(snapshot.snake.clone(), snapshot.direction) else {
            return;
        };

        let food = snapshot
            .food
            .filter(|food| grid.contains(*food) && !snake.contains(*food));

        let mut obstacles: Vec<Point> = Vec::with_capacity(snapshot.obstacles.len());
        for obstacle in &snapshot.obstacles {
            if grid.contains(*obstacle)
                && !snake.contains(*obstacle)
                && food != Some(*obstacle)
                && !obstacles.contains(obstacle)
            {
                obstacles.push(*obstacle);
            }
        }

        self.grid = grid;
        self.config = snapshot.world_config();
        self.snake = snake;
        self.obstacles = obstacles;
        self.food = food;
        self.score = snapshot.score;
        self.tick_ms = self.settings.clamp_tick_ms(snapshot.tick_ms);
        self.foods_eaten = snapshot.foods_eaten;
        self.time_left = std::time::Duration::from_millis(snapshot.time_left_ms);
        self.phase = RunPhase::Paused;

        if self.food.is_none() {
            self.place_food(sampler);
        }

        log!(
            "Restored game: score {}, length {}, {} obstacles",
            self.score,
            self.snake.len(),
            self.obstacles.len()
        );
    }
}
