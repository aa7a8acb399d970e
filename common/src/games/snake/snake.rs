use std::collections::VecDeque;

use super::types::{Direction, Point};

/// Segment chain plus its heading and buffered turns.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Point>,
    pub direction: Direction,
    pending_directions: VecDeque<Direction>,
}

impl Snake {
    /// Lays `length` segments out behind `head`, opposite to `direction`.
    pub fn new(head: Point, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self {
            body,
            direction,
            pending_directions: VecDeque::new(),
        }
    }

    /// `None` for an empty chain; a snake always has a head.
    pub fn from_segments(segments: Vec<Point>, direction: Direction) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Self {
            body: segments.into(),
            direction,
            pending_directions: VecDeque::new(),
        })
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Point> {
        self.body.iter()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.body.contains(&point)
    }

    /// Any segment except the current head.
    pub fn collides_with_body(&self, point: Point) -> bool {
        self.body.iter().skip(1).any(|segment| *segment == point)
    }

    pub fn push_head(&mut self, point: Point) {
        self.body.push_front(point);
    }

    pub fn pop_tail(&mut self) -> Option<Point> {
        if self.body.len() > 1 {
            self.body.pop_back()
        } else {
            None
        }
    }

    /// Drops a turn that would reverse the most recent queued (or live) heading.
    pub fn enqueue_direction(&mut self, direction: Direction) -> bool {
        let last = self.pending_directions.back().unwrap_or(&self.direction);
        if last.is_opposite(&direction) {
            return false;
        }
        self.pending_directions.push_back(direction);
        true
    }

    /// Consumes at most one queued turn, re-checking it against the live heading.
    pub fn apply_pending_direction(&mut self) {
        if let Some(next) = self.pending_directions.pop_front()
            && !self.direction.is_opposite(&next)
        {
            self.direction = next;
        }
    }

    pub fn pending_directions(&self) -> impl Iterator<Item = &Direction> {
        self.pending_directions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Point::new(8, 12), Direction::Right, 3);
        let segments: Vec<Point> = snake.segments().copied().collect();
        assert_eq!(
            segments,
            vec![Point::new(8, 12), Point::new(7, 12), Point::new(6, 12)]
        );
        assert_eq!(snake.tail(), Point::new(6, 12));
    }

    #[test]
    fn test_collision_excludes_head() {
        let snake = Snake::new(Point::new(5, 5), Direction::Right, 3);
        assert!(!snake.collides_with_body(Point::new(5, 5)));
        assert!(snake.collides_with_body(Point::new(4, 5)));
        assert!(snake.collides_with_body(Point::new(3, 5)));
        assert!(!snake.collides_with_body(Point::new(9, 9)));
    }

    #[test]
    fn test_from_segments_rejects_empty() {
        assert!(Snake::from_segments(vec![], Direction::Right).is_none());
        let snake = Snake::from_segments(vec![Point::new(1, 1)], Direction::Up).unwrap();
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_pop_tail_never_empties_snake() {
        let mut snake = Snake::from_segments(vec![Point::new(1, 1)], Direction::Up).unwrap();
        assert_eq!(snake.pop_tail(), None);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_enqueue_rejects_reversal_of_queue_tail() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right, 3);
        assert!(!snake.enqueue_direction(Direction::Left));
        assert!(snake.enqueue_direction(Direction::Up));
        assert!(!snake.enqueue_direction(Direction::Down));
        assert!(snake.enqueue_direction(Direction::Left));
        let queued: Vec<Direction> = snake.pending_directions().copied().collect();
        assert_eq!(queued, vec![Direction::Up, Direction::Left]);
    }

    #[test]
    fn test_apply_consumes_one_turn_per_call() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right, 3);
        snake.enqueue_direction(Direction::Up);
        snake.enqueue_direction(Direction::Left);
        snake.apply_pending_direction();
        assert_eq!(snake.direction, Direction::Up);
        snake.apply_pending_direction();
        assert_eq!(snake.direction, Direction::Left);
    }

    #[test]
    fn test_apply_drops_stale_reversal() {
        let mut snake = Snake::new(Point::new(5, 5), Direction::Right, 3);
        snake.enqueue_direction(Direction::Up);
        // Heading changed underneath the queue, e.g. by a bounce.
        snake.direction = Direction::Down;
        snake.apply_pending_direction();
        assert_eq!(snake.direction, Direction::Down);
        assert_eq!(snake.pending_directions().count(), 0);
    }
}
