use std::time::Duration;

use super::game_state::SnakeGameState;
use super::placement::CellSampler;
use super::types::{DeathReason, StepOutcome};

/// What a single frame did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub step: Option<StepOutcome>,
    pub timed_out: bool,
}

impl FrameReport {
    pub fn game_over_reason(&self) -> Option<DeathReason> {
        if self.timed_out {
            return Some(DeathReason::TimeUp);
        }
        match self.step {
            Some(StepOutcome::GameOver(reason)) => Some(reason),
            _ => None,
        }
    }
}

/// Decouples the frame cadence from the tick cadence.
///
/// Called once per frame with a monotonic timestamp. A step happens only when at least the
/// current tick interval has passed since the last committed tick; the timed-mode countdown
/// drains by a fixed nominal delta every frame regardless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickScheduler {
    last_tick_at: Duration,
    frame_delta: Duration,
}

impl TickScheduler {
    pub fn new(frame_delta: Duration) -> Self {
        Self {
            last_tick_at: Duration::ZERO,
            frame_delta,
        }
    }

    pub fn frame_delta(&self) -> Duration {
        self.frame_delta
    }

    /// Restarts tick timing from `now`, e.g. after a reset or restore.
    pub fn rearm(&mut self, now: Duration) {
        self.last_tick_at = now;
    }

    pub fn frame(
        &mut self,
        game: &mut SnakeGameState,
        sampler: &mut dyn CellSampler,
        now: Duration,
    ) -> FrameReport {
        let mut report = FrameReport::default();
        if !game.is_running() {
            return report;
        }

        if now.saturating_sub(self.last_tick_at) >= game.tick_interval() {
            self.last_tick_at = now;
            report.step = Some(game.step(sampler));
        }

        report.timed_out = game.drain_countdown(self.frame_delta);
        report
    }
}
