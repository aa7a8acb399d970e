mod game_state;
mod grid;
mod high_scores;
mod placement;
mod preferences;
mod scheduler;
mod session;
mod settings;
mod snake;
mod snapshot;
mod types;

pub use game_state::{INITIAL_SNAKE_LENGTH, SnakeGameState, start_position};
pub use grid::Grid;
pub use high_scores::{HighScoreEntry, HighScoreLedger, MAX_HIGH_SCORES};
pub use placement::{CellSampler, Occupancy, place_free};
pub use preferences::Preferences;
pub use scheduler::{FrameReport, TickScheduler};
pub use session::GameSession;
pub use settings::EngineSettings;
pub use snake::Snake;
pub use snapshot::{
    SAVE_KEY, SNAPSHOT_VERSION, Snapshot, SnapshotDefaults, SnapshotError, clear_snapshot,
    load_snapshot, save_snapshot,
};
pub use types::{
    BoundaryMode, DEFAULT_BOARD_SIZE, DeathReason, Direction, Intent, MAX_BOARD_SIZE,
    MIN_BOARD_SIZE, PlayMode, Point, RunPhase, Skin, StepOutcome, Theme, WorldConfig,
    is_valid_board_size,
};
