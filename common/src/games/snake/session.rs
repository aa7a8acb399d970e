use std::time::Duration;

use chrono::Utc;

use crate::games::SessionRng;
use crate::log;
use crate::storage::KeyValueStore;
use super::game_state::SnakeGameState;
use super::high_scores::{HighScoreEntry, HighScoreLedger};
use super::preferences::Preferences;
use super::scheduler::{FrameReport, TickScheduler};
use super::settings::EngineSettings;
use super::snapshot::{
    SnapshotDefaults, SnapshotError, clear_snapshot, load_snapshot, save_snapshot,
};
use super::types::{BoundaryMode, Intent, PlayMode, RunPhase, Skin, Theme};

/// One player's game: the world, its timing, and everything persisted around it.
pub struct GameSession<S: KeyValueStore> {
    store: S,
    preferences: Preferences,
    game: SnakeGameState,
    scheduler: TickScheduler,
    rng: SessionRng,
    last_frame_at: Duration,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Resumes the saved game if there is a usable one, otherwise keeps the fresh world.
    pub fn boot(store: S, settings: EngineSettings, mut rng: SessionRng) -> Self {
        let preferences = Preferences::load(&store);
        let game = SnakeGameState::new(preferences.world_config(), settings.clone(), &mut rng);
        let mut session = Self {
            store,
            preferences,
            game,
            scheduler: TickScheduler::new(settings.frame_delta()),
            rng,
            last_frame_at: Duration::ZERO,
        };

        match session.load_saved_game() {
            Ok(()) => {}
            Err(SnapshotError::NoSave) => log!("No saved game, starting fresh"),
            Err(e) => log!("Discarding saved game: {}", e),
        }
        session
    }

    pub fn game(&self) -> &SnakeGameState {
        &self.game
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Turn(direction) => {
                if self.game.is_game_over() {
                    return;
                }
                self.game.enqueue_direction(direction);
                if self.game.start() {
                    self.scheduler.rearm(self.last_frame_at);
                }
            }
            Intent::TogglePause => self.game.toggle_pause(),
            Intent::Restart => self.restart(),
            Intent::Start => {
                if self.game.start() {
                    self.scheduler.rearm(self.last_frame_at);
                }
            }
        }
    }

    /// Drives the scheduler. Records a high score on the frame that ends the run.
    pub fn frame(&mut self, now: Duration) -> FrameReport {
        self.last_frame_at = now;
        let report = self.scheduler.frame(&mut self.game, &mut self.rng, now);
        if report.game_over_reason().is_some() {
            self.record_high_score();
        }
        report
    }

    pub fn restart(&mut self) {
        self.game.reset(self.preferences.world_config(), &mut self.rng);
        self.scheduler.rearm(self.last_frame_at);
    }

    pub fn save(&self) -> Result<(), SnapshotError> {
        save_snapshot(&self.store, &self.game)
    }

    /// Replaces the current world with the stored one; on failure nothing changes.
    pub fn load_saved_game(&mut self) -> Result<(), SnapshotError> {
        let snapshot = load_snapshot(&self.store, &SnapshotDefaults::from_game(&self.game))?;
        self.game.restore(&snapshot, &mut self.rng);
        self.preferences.sync_world(self.game.config());
        self.scheduler.rearm(self.last_frame_at);
        Ok(())
    }

    pub fn clear_save(&self) -> Result<(), SnapshotError> {
        clear_snapshot(&self.store)?;
        log!("Cleared saved game");
        Ok(())
    }

    pub fn set_board_size(&mut self, board_size: usize) -> Result<(), String> {
        self.preferences.set_board_size(&self.store, board_size)?;
        log!("Board size set to {}", board_size);
        self.restart();
        Ok(())
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) -> Result<(), String> {
        self.preferences.set_boundary_mode(&self.store, mode)?;
        log!("Boundary mode set to {}", mode);
        self.restart();
        Ok(())
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) -> Result<(), String> {
        self.preferences.set_play_mode(&self.store, mode)?;
        log!("Play mode set to {}", mode);
        self.restart();
        Ok(())
    }

    pub fn set_skin(&mut self, skin: Skin) -> Result<(), String> {
        self.preferences.set_skin(&self.store, skin)?;
        self.game.config.skin = skin;
        log!("Skin set to {}", skin);
        Ok(())
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<(), String> {
        self.preferences.set_theme(&self.store, theme)?;
        log!("Theme set to {}", theme);
        Ok(())
    }

    pub fn toggle_sound(&mut self) -> Result<bool, String> {
        let enabled = !self.preferences.sound_enabled;
        self.preferences.set_sound_enabled(&self.store, enabled)?;
        log!("Sound {}", if enabled { "on" } else { "off" });
        Ok(enabled)
    }

    pub fn high_scores(&self, mode: PlayMode) -> Vec<HighScoreEntry> {
        HighScoreLedger::new(&self.store).list(mode)
    }

    /// Best-effort save on exit. A finished run is not saved.
    pub fn shutdown(&self) {
        if self.game.is_game_over() || self.game.phase() == RunPhase::NotStarted {
            return;
        }
        if let Err(e) = self.save() {
            log!("Failed to save game on shutdown: {}", e);
        }
    }

    fn record_high_score(&self) {
        let config = self.game.config();
        let entry = HighScoreEntry {
            score: self.game.score(),
            date: Utc::now().timestamp_millis(),
            cells: config.board_size,
            boundary_mode: config.boundary_mode,
            skin: config.skin,
        };
        if let Err(e) = HighScoreLedger::new(&self.store).record(config.play_mode, entry) {
            log!("Failed to record high score: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::snake::types::{DeathReason, Direction, Point};
    use crate::games::snake::snapshot::SAVE_KEY;
    use crate::storage::MemoryKeyValueStore;

    fn boot(store: &MemoryKeyValueStore) -> GameSession<&MemoryKeyValueStore> {
        GameSession::boot(store, EngineSettings::default(), SessionRng::new(42))
    }

    #[test]
    fn test_boot_without_save_starts_fresh() {
        let store = MemoryKeyValueStore::new();
        let session = boot(&store);

        assert_eq!(session.game().phase(), RunPhase::NotStarted);
        assert_eq!(session.game().snake().head(), Point::new(8, 12));
        assert_eq!(session.seed(), 42);
    }

    #[test]
    fn test_turn_intent_starts_run() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);

        session.handle_intent(Intent::Turn(Direction::Up));
        assert!(session.game().is_running());

        session.frame(Duration::from_millis(140));
        assert_eq!(session.game().snake().head(), Point::new(8, 11));
    }

    #[test]
    fn test_pause_and_restart_intents() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);

        session.handle_intent(Intent::Start);
        session.handle_intent(Intent::TogglePause);
        assert_eq!(session.game().phase(), RunPhase::Paused);

        session.frame(Duration::from_secs(5));
        assert_eq!(session.game().snake().head(), Point::new(8, 12));

        session.handle_intent(Intent::Restart);
        assert_eq!(session.game().phase(), RunPhase::NotStarted);
    }

    #[test]
    fn test_save_then_boot_resumes_paused() {
        let store = MemoryKeyValueStore::new();
        {
            let mut session = boot(&store);
            session.handle_intent(Intent::Turn(Direction::Down));
            session.frame(Duration::from_millis(140));
            session.frame(Duration::from_millis(280));
            session.shutdown();
        }

        let resumed = boot(&store);

        assert_eq!(resumed.game().phase(), RunPhase::Paused);
        assert_eq!(resumed.game().snake().head(), Point::new(8, 14));
        assert_eq!(resumed.game().snake().direction, Direction::Down);
    }

    #[test]
    fn test_corrupt_save_falls_back_to_fresh_game() {
        let store = MemoryKeyValueStore::new();
        store.set(SAVE_KEY, "snake: []\n").unwrap();

        let session = boot(&store);

        assert_eq!(session.game().phase(), RunPhase::NotStarted);
        assert_eq!(session.game().snake().len(), 3);
    }

    #[test]
    fn test_rejected_save_leaves_running_game_untouched() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.handle_intent(Intent::Turn(Direction::Down));
        session.frame(Duration::from_millis(140));
        session.frame(Duration::from_millis(280));
        session.game.score = 20;

        let snake_before = session.game().snake().clone();
        let food_before = session.game().food();
        let scheduler_before = session.scheduler.clone();
        let preferences_before = *session.preferences();
        store.set(SAVE_KEY, "snake: []\nscore: 900\ncells: 16\n").unwrap();

        let result = session.load_saved_game();

        assert!(matches!(result, Err(SnapshotError::EmptySnake)));
        assert_eq!(session.game().snake(), &snake_before);
        assert_eq!(session.game().food(), food_before);
        assert_eq!(session.game().score(), 20);
        assert_eq!(session.game().grid().size(), 24);
        assert_eq!(session.game().phase(), RunPhase::Running);
        assert_eq!(session.scheduler, scheduler_before);
        assert_eq!(*session.preferences(), preferences_before);
    }

    #[test]
    fn test_restored_world_shape_updates_preferences() {
        let store = MemoryKeyValueStore::new();
        store
            .set(SAVE_KEY, "snake:\n  - {x: 2, y: 2}\ncells: 16\nboundary_mode: wrap\n")
            .unwrap();

        let session = boot(&store);

        assert_eq!(session.preferences().board_size, 16);
        assert_eq!(session.preferences().boundary_mode, BoundaryMode::Wrap);
        assert_eq!(store.get("snake.cells").unwrap(), None);
    }

    #[test]
    fn test_game_over_records_high_score() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.handle_intent(Intent::Start);
        session.game.score = 70;
        session.game.obstacles.push(Point::new(9, 12));

        let report = session.frame(Duration::from_secs(1));

        assert_eq!(report.game_over_reason(), Some(DeathReason::ObstacleCollision));
        let scores = session.high_scores(PlayMode::Classic);
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 70);
        assert_eq!(scores[0].cells, 24);

        session.frame(Duration::from_secs(2));
        assert_eq!(session.high_scores(PlayMode::Classic).len(), 1);
    }

    #[test]
    fn test_mode_changes_persist_and_restart() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.handle_intent(Intent::Start);
        session.game.score = 30;

        session.set_board_size(16).unwrap();
        assert_eq!(session.game().score(), 0);
        assert_eq!(session.game().grid().size(), 16);
        assert!(session.set_board_size(100).is_err());
        assert_eq!(session.game().grid().size(), 16);

        session.set_play_mode(PlayMode::Time).unwrap();
        session.set_boundary_mode(BoundaryMode::Bounce).unwrap();
        assert_eq!(session.game().config().play_mode, PlayMode::Time);
        assert_eq!(session.game().config().boundary_mode, BoundaryMode::Bounce);

        let reloaded = Preferences::load(&store);
        assert_eq!(reloaded.board_size, 16);
        assert_eq!(reloaded.play_mode, PlayMode::Time);
    }

    #[test]
    fn test_cosmetic_changes_keep_run() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.handle_intent(Intent::Start);
        session.game.score = 30;

        session.set_skin(Skin::Amber).unwrap();
        session.set_theme(Theme::Light).unwrap();
        assert!(!session.toggle_sound().unwrap());

        assert_eq!(session.game().score(), 30);
        assert_eq!(session.game().config().skin, Skin::Amber);
        assert!(session.game().is_running());
    }

    #[test]
    fn test_clear_save() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.save().unwrap();

        session.clear_save().unwrap();

        assert!(matches!(session.load_saved_game(), Err(SnapshotError::NoSave)));
    }

    #[test]
    fn test_shutdown_skips_finished_run() {
        let store = MemoryKeyValueStore::new();
        let mut session = boot(&store);
        session.handle_intent(Intent::Start);
        session.game.obstacles.push(Point::new(9, 12));
        session.frame(Duration::from_secs(1));

        session.shutdown();

        assert_eq!(store.get(SAVE_KEY).unwrap(), None);
    }
}
