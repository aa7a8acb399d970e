use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;

/// Tuning constants of the simulation; part of the client config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    pub base_tick_ms: u32,
    pub min_tick_ms: u32,
    pub speed_step_ms: u32,
    pub food_reward: u32,
    pub obstacle_every_foods: u32,
    pub food_placement_attempts: u32,
    pub obstacle_placement_attempts: u32,
    pub time_budget_ms: u64,
    /// Nominal time between scheduler frames; also what one frame drains from the countdown.
    pub frame_delta_us: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            base_tick_ms: 140,
            min_tick_ms: 60,
            speed_step_ms: 5,
            food_reward: 10,
            obstacle_every_foods: 3,
            food_placement_attempts: 400,
            obstacle_placement_attempts: 50,
            time_budget_ms: 60_000,
            frame_delta_us: 16_700,
        }
    }
}

impl EngineSettings {
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.time_budget_ms)
    }

    pub fn frame_delta(&self) -> Duration {
        Duration::from_micros(self.frame_delta_us)
    }

    /// One speed step faster, never below the floor.
    pub fn next_tick_ms(&self, current: u32) -> u32 {
        current.saturating_sub(self.speed_step_ms).max(self.min_tick_ms)
    }

    pub fn clamp_tick_ms(&self, tick_ms: u32) -> u32 {
        tick_ms.clamp(self.min_tick_ms, self.base_tick_ms)
    }
}

impl Validate for EngineSettings {
    fn validate(&self) -> Result<(), String> {
        if self.min_tick_ms == 0 {
            return Err("min_tick_ms must be greater than 0".to_string());
        }
        if self.min_tick_ms > self.base_tick_ms {
            return Err("min_tick_ms must not exceed base_tick_ms".to_string());
        }
        if self.base_tick_ms > 1000 {
            return Err("base_tick_ms must not exceed 1000".to_string());
        }
        if self.speed_step_ms == 0 {
            return Err("speed_step_ms must be greater than 0".to_string());
        }
        if self.obstacle_every_foods == 0 {
            return Err("obstacle_every_foods must be at least 1".to_string());
        }
        if self.food_placement_attempts < 50 || self.obstacle_placement_attempts < 50 {
            return Err("placement attempts must be at least 50".to_string());
        }
        if self.time_budget_ms == 0 {
            return Err("time_budget_ms must be greater than 0".to_string());
        }
        if self.frame_delta_us == 0 {
            return Err("frame_delta_us must be greater than 0".to_string());
        }
        Ok(())
    }
}
