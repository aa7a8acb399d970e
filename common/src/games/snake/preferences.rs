use std::str::FromStr;

use crate::log;
use crate::storage::KeyValueStore;
use super::types::{
    BoundaryMode, DEFAULT_BOARD_SIZE, PlayMode, Skin, Theme, WorldConfig, is_valid_board_size,
};

const BOUNDARY_KEY: &str = "snake.boundary";
const MODE_KEY: &str = "snake.mode";
const SKIN_KEY: &str = "snake.skin";
const THEME_KEY: &str = "snake.theme";
const SOUND_KEY: &str = "snake.sound";
const CELLS_KEY: &str = "snake.cells";

/// Player choices, each persisted under its own key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub boundary_mode: BoundaryMode,
    pub play_mode: PlayMode,
    pub skin: Skin,
    pub theme: Theme,
    pub sound_enabled: bool,
    pub board_size: usize,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            boundary_mode: BoundaryMode::default(),
            play_mode: PlayMode::default(),
            skin: Skin::default(),
            theme: Theme::default(),
            sound_enabled: true,
            board_size: DEFAULT_BOARD_SIZE,
        }
    }
}

fn read_value<T: FromStr>(store: &dyn KeyValueStore, key: &str, default: T) -> T {
    match store.get(key) {
        Ok(Some(text)) => text.parse().unwrap_or(default),
        Ok(None) => default,
        Err(e) => {
            log!("Failed to read preference {}: {}", key, e);
            default
        }
    }
}

impl Preferences {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        let sound = read_value(store, SOUND_KEY, String::from("on"));
        let board_size = read_value(store, CELLS_KEY, defaults.board_size);

        Self {
            boundary_mode: read_value(store, BOUNDARY_KEY, defaults.boundary_mode),
            play_mode: read_value(store, MODE_KEY, defaults.play_mode),
            skin: read_value(store, SKIN_KEY, defaults.skin),
            theme: read_value(store, THEME_KEY, defaults.theme),
            sound_enabled: sound.trim() != "off",
            board_size: if is_valid_board_size(board_size) {
                board_size
            } else {
                defaults.board_size
            },
        }
    }

    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            board_size: self.board_size,
            boundary_mode: self.boundary_mode,
            play_mode: self.play_mode,
            skin: self.skin,
        }
    }

    /// Adopts the shape of a restored world without persisting it.
    pub fn sync_world(&mut self, config: &WorldConfig) {
        self.board_size = config.board_size;
        self.boundary_mode = config.boundary_mode;
        self.play_mode = config.play_mode;
        self.skin = config.skin;
    }

    pub fn set_boundary_mode(
        &mut self,
        store: &dyn KeyValueStore,
        mode: BoundaryMode,
    ) -> Result<(), String> {
        store.set(BOUNDARY_KEY, mode.as_str())?;
        self.boundary_mode = mode;
        Ok(())
    }

    pub fn set_play_mode(
        &mut self,
        store: &dyn KeyValueStore,
        mode: PlayMode,
    ) -> Result<(), String> {
        store.set(MODE_KEY, mode.as_str())?;
        self.play_mode = mode;
        Ok(())
    }

    pub fn set_skin(&mut self, store: &dyn KeyValueStore, skin: Skin) -> Result<(), String> {
        store.set(SKIN_KEY, skin.as_str())?;
        self.skin = skin;
        Ok(())
    }

    pub fn set_theme(&mut self, store: &dyn KeyValueStore, theme: Theme) -> Result<(), String> {
        store.set(THEME_KEY, theme.as_str())?;
        self.theme = theme;
        Ok(())
    }

    pub fn set_sound_enabled(
        &mut self,
        store: &dyn KeyValueStore,
        enabled: bool,
    ) -> Result<(), String> {
        store.set(SOUND_KEY, if enabled { "on" } else { "off" })?;
        self.sound_enabled = enabled;
        Ok(())
    }

    pub fn set_board_size(
        &mut self,
        store: &dyn KeyValueStore,
        board_size: usize,
    ) -> Result<(), String> {
        if !is_valid_board_size(board_size) {
            return Err(format!("Unsupported board size: {}", board_size));
        }
        store.set(CELLS_KEY, &board_size.to_string())?;
        self.board_size = board_size;
        Ok(())
    }
}
