use std::time::Duration;

use crate::log;
use super::grid::Grid;
use super::placement::{CellSampler, place_free};
use super::settings::EngineSettings;
use super::snake::Snake;
use super::types::{
    BoundaryMode, DeathReason, Direction, PlayMode, Point, RunPhase, StepOutcome, WorldConfig,
};

pub const INITIAL_SNAKE_LENGTH: usize = 3;

/// Canonical world plus run state. Only `step`, the intent handlers and `reset` mutate it.
#[derive(Clone, Debug)]
pub struct SnakeGameState {
    pub(crate) snake: Snake,
    pub(crate) food: Option<Point>,
    pub(crate) obstacles: Vec<Point>,
    pub(crate) grid: Grid,
    pub(crate) config: WorldConfig,
    pub(crate) score: u32,
    pub(crate) tick_ms: u32,
    pub(crate) foods_eaten: u32,
    pub(crate) time_left: Duration,
    pub(crate) phase: RunPhase,
    pub(crate) settings: EngineSettings,
}

impl SnakeGameState {
    pub fn new(
        config: WorldConfig,
        settings: EngineSettings,
        sampler: &mut dyn CellSampler,
    ) -> Self {
        let grid = Grid::new(config.board_size);
        let mut state = Self {
            snake: Snake::new(start_position(grid), Direction::Right, INITIAL_SNAKE_LENGTH),
            food: None,
            obstacles: Vec::new(),
            grid,
            config,
            score: 0,
            tick_ms: settings.base_tick_ms,
            foods_eaten: 0,
            time_left: settings.time_budget(),
            phase: RunPhase::NotStarted,
            settings,
        };
        state.place_food(sampler);
        state
    }

    pub fn reset(&mut self, config: WorldConfig, sampler: &mut dyn CellSampler) {
        *self = Self::new(config, self.settings.clone(), sampler);
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Option<Point> {
        self.food
    }

    pub fn obstacles(&self) -> &[Point] {
        &self.obstacles
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }

    pub fn foods_eaten(&self) -> u32 {
        self.foods_eaten
    }

    pub fn time_left(&self) -> Duration {
        self.time_left
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, RunPhase::GameOver(_))
    }

    /// How much faster than the starting pace the snake moves, for the HUD.
    pub fn speed_factor(&self) -> f32 {
        self.settings.base_tick_ms as f32 / self.tick_ms.max(1) as f32
    }

    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        if self.is_game_over() {
            return false;
        }
        self.snake.enqueue_direction(direction)
    }

    pub fn start(&mut self) -> bool {
        match self.phase {
            RunPhase::NotStarted | RunPhase::Paused => {
                self.phase = RunPhase::Running;
                true
            }
            RunPhase::Running | RunPhase::GameOver(_) => false,
        }
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            RunPhase::Running => RunPhase::Paused,
            RunPhase::NotStarted | RunPhase::Paused => RunPhase::Running,
            game_over @ RunPhase::GameOver(_) => game_over,
        };
    }

    /// Advances the world by exactly one cell of movement.
    pub fn step(&mut self, sampler: &mut dyn CellSampler) -> StepOutcome {
        if let RunPhase::GameOver(reason) = self.phase {
            return StepOutcome::GameOver(reason);
        }

        self.snake.apply_pending_direction();

        let next_head = match self.calculate_next_head_position() {
            Ok(point) => point,
            Err(reason) => return self.game_over(reason),
        };

        if self.snake.collides_with_body(next_head) {
            return self.game_over(DeathReason::SelfCollision);
        }
        if self.obstacles.contains(&next_head) {
            return self.game_over(DeathReason::ObstacleCollision);
        }

        self.snake.push_head(next_head);

        if self.food != Some(next_head) {
            self.snake.pop_tail();
            if self.food.is_none() {
                self.try_place_food(sampler);
            }
            return StepOutcome::Continuing;
        }

        self.score = self.score.saturating_add(self.settings.food_reward);
        self.tick_ms = self.settings.next_tick_ms(self.tick_ms);
        self.foods_eaten = self.foods_eaten.saturating_add(1);
        self.food = None;
        self.place_food(sampler);

        if self.foods_eaten % self.settings.obstacle_every_foods == 0 {
            self.add_obstacle(sampler);
        }

        StepOutcome::Ate
    }

    /// Drains the timed-mode countdown. Returns true when this call ended the run.
    pub fn drain_countdown(&mut self, delta: Duration) -> bool {
        if self.config.play_mode != PlayMode::Time || !self.is_running() {
            return false;
        }

        self.time_left = self.time_left.saturating_sub(delta);
        if self.time_left.is_zero() {
            self.game_over(DeathReason::TimeUp);
            return true;
        }
        false
    }

    fn calculate_next_head_position(&mut self) -> Result<Point, DeathReason> {
        let head = self.snake.head();
        let candidate = head.moved_in_direction(self.snake.direction);

        match self.config.boundary_mode {
            BoundaryMode::Normal => {
                if self.grid.contains(candidate) {
                    Ok(candidate)
                } else {
                    Err(DeathReason::WallCollision)
                }
            }
            BoundaryMode::Wrap => Ok(self.grid.wrap_point(candidate)),
            BoundaryMode::Bounce => {
                let mut candidate = candidate;
                if !self.grid.contains_coord(candidate.x) {
                    self.snake.direction = self.snake.direction.reflected_x();
                    candidate = head.moved_in_direction(self.snake.direction);
                }
                if !self.grid.contains_coord(candidate.y) {
                    self.snake.direction = self.snake.direction.reflected_y();
                    candidate = head.moved_in_direction(self.snake.direction);
                }
                Ok(self.grid.clamp_point(candidate))
            }
        }
    }

    fn game_over(&mut self, reason: DeathReason) -> StepOutcome {
        self.phase = RunPhase::GameOver(reason);
        log!(
            "Game over: snake {} with score {} ({} food eaten)",
            reason,
            self.score,
            self.foods_eaten
        );
        StepOutcome::GameOver(reason)
    }

    /// Retried on every later tick while the board has no food.
    fn try_place_food(&mut self, sampler: &mut dyn CellSampler) -> bool {
        self.food = place_free(
            sampler,
            self.grid,
            &[&self.snake, &self.obstacles],
            self.settings.food_placement_attempts,
        );
        self.food.is_some()
    }

    pub(crate) fn place_food(&mut self, sampler: &mut dyn CellSampler) {
        if !self.try_place_food(sampler) {
            log!(
                "No free cell for food after {} attempts",
                self.settings.food_placement_attempts
            );
        }
    }

    fn add_obstacle(&mut self, sampler: &mut dyn CellSampler) {
        let placed = place_free(
            sampler,
            self.grid,
            &[&self.snake, &self.obstacles, &self.food],
            self.settings.obstacle_placement_attempts,
        );
        match placed {
            Some(point) => {
                self.obstacles.push(point);
                log!("Obstacle spawned at ({}, {})", point.x, point.y);
            }
            None => log!("Obstacle spawn skipped, board too crowded"),
        }
    }
}

/// Head of the starting chain; the body trails to the left of it.
pub fn start_position(grid: Grid) -> Point {
    let size = grid.size() as i32;
    Point::new(size / 3, size / 2)
}
