use crate::games::SessionRng;
use super::grid::Grid;
use super::snake::Snake;
use super::types::Point;

/// Source of uniformly distributed candidate cells.
pub trait CellSampler {
    fn sample_cell(&mut self, grid: Grid) -> Point;
}

impl CellSampler for SessionRng {
    fn sample_cell(&mut self, grid: Grid) -> Point {
        let size = grid.size() as i32;
        Point::new(self.random_range(0..size), self.random_range(0..size))
    }
}

pub trait Occupancy {
    fn is_occupied(&self, point: Point) -> bool;
}

impl Occupancy for Snake {
    fn is_occupied(&self, point: Point) -> bool {
        self.contains(point)
    }
}

impl Occupancy for Vec<Point> {
    fn is_occupied(&self, point: Point) -> bool {
        self.contains(&point)
    }
}

impl Occupancy for Option<Point> {
    fn is_occupied(&self, point: Point) -> bool {
        *self == Some(point)
    }
}

/// Rejection-samples a cell outside every occupied set, giving up after `max_attempts`.
pub fn place_free(
    sampler: &mut dyn CellSampler,
    grid: Grid,
    occupied: &[&dyn Occupancy],
    max_attempts: u32,
) -> Option<Point> {
    for _ in 0..max_attempts {
        let candidate = sampler.sample_cell(grid);
        if !occupied.iter().any(|set| set.is_occupied(candidate)) {
            return Some(candidate);
        }
    }
    None
}

/// Replays a fixed list of cells, cycling when exhausted.
#[cfg(test)]
pub(crate) struct ScriptedSampler {
    points: Vec<Point>,
    next: usize,
    calls: usize,
}

#[cfg(test)]
impl ScriptedSampler {
    pub(crate) fn new(points: Vec<Point>) -> Self {
        assert!(!points.is_empty());
        Self {
            points,
            next: 0,
            calls: 0,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls
    }
}

#[cfg(test)]
impl CellSampler for ScriptedSampler {
    fn sample_cell(&mut self, _grid: Grid) -> Point {
        let point = self.points[self.next % self.points.len()];
        self.next += 1;
        self.calls += 1;
        point
    }
}
