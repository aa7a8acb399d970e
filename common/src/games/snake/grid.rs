use super::types::Point;

/// Square N×N coordinate space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn contains_coord(&self, coord: i32) -> bool {
        coord >= 0 && (coord as usize) < self.size
    }

    pub fn contains(&self, point: Point) -> bool {
        self.contains_coord(point.x) && self.contains_coord(point.y)
    }

    /// Folds a coordinate that left the board by one step back onto the opposite edge.
    pub fn wrap(&self, coord: i32) -> i32 {
        let size = self.size as i32;
        if coord < 0 {
            size - 1
        } else if coord >= size {
            0
        } else {
            coord
        }
    }

    pub fn wrap_point(&self, point: Point) -> Point {
        Point::new(self.wrap(point.x), self.wrap(point.y))
    }

    pub fn clamp_point(&self, point: Point) -> Point {
        let max = self.size as i32 - 1;
        Point::new(point.x.clamp(0, max), point.y.clamp(0, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_folds_to_opposite_edge() {
        let grid = Grid::new(24);
        assert_eq!(grid.wrap(-1), 23);
        assert_eq!(grid.wrap(24), 0);
        assert_eq!(grid.wrap(11), 11);
        assert_eq!(grid.wrap_point(Point::new(24, -1)), Point::new(0, 23));
    }

    #[test]
    fn test_bounds_checking() {
        let grid = Grid::new(20);
        assert!(grid.contains(Point::new(0, 0)));
        assert!(grid.contains(Point::new(19, 19)));
        assert!(!grid.contains(Point::new(-1, 0)));
        assert!(!grid.contains(Point::new(20, 0)));
        assert!(!grid.contains(Point::new(0, 20)));
    }

    #[test]
    fn test_clamp_keeps_points_on_board() {
        let grid = Grid::new(1);
        assert_eq!(grid.clamp_point(Point::new(-1, 1)), Point::new(0, 0));
        assert_eq!(Grid::new(10).clamp_point(Point::new(12, 4)), Point::new(9, 4));
    }
}
