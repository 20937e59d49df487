use super::action::Direction;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake of `length` segments trailing behind `head`
    ///
    /// Storage for `capacity` segments is reserved up front so that growing
    /// never reallocates during a step.
    pub fn new(head: Position, direction: Direction, length: usize, capacity: usize) -> Self {
        let mut body = Vec::with_capacity(capacity.max(length));
        body.push(head);

        let (dx, dy) = direction.delta();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_by(-dx, -dy));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if any segment, head included, covers `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Shift every segment onto its predecessor, tail first, then place the head
    pub fn shift_to(&mut self, new_head: Position) {
        for i in (1..self.body.len()).rev() {
            self.body[i] = self.body[i - 1];
        }
        self.body[0] = new_head;
    }

    /// Append one segment at `tail`
    pub fn grow(&mut self, tail: Position) {
        self.body.push(tail);
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Lifecycle phase of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the player to press start
    Menu,
    Playing,
    /// Collided; waits for a restart
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub phase: Phase,
    pub score: u32,
    /// Grid steps taken this game
    pub steps: u32,
    /// Seconds accumulated since the last grid step
    pub move_timer: f64,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl GameState {
    /// Create a new game state in the `Playing` phase
    pub fn new(snake: Snake, food: Position, grid_width: usize, grid_height: usize) -> Self {
        Self {
            snake,
            food,
            phase: Phase::Playing,
            score: 0,
            steps: 0,
            move_timer: 0.0,
            grid_width,
            grid_height,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x < self.grid_width as i32
            && pos.y >= 0
            && pos.y < self.grid_height as i32
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Read-only view handed to the renderer and overlay
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            body: &self.snake.body,
            food: self.is_playing().then_some(self.food),
            phase: self.phase,
            score: self.score,
            steps: self.steps,
            grid_width: self.grid_width,
            grid_height: self.grid_height,
        }
    }
}

/// Borrowed view of a [`GameState`] for drawing
///
/// The head is `body[0]`. `food` is only present while playing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot<'a> {
    pub body: &'a [Position],
    pub food: Option<Position>,
    pub phase: Phase,
    pub score: u32,
    pub steps: u32,
    pub grid_width: usize,
    pub grid_height: usize,
}

impl Snapshot<'_> {
    pub fn head(&self) -> Option<Position> {
        self.body.first().copied()
    }

    /// Whether the snake should be drawn at all
    pub fn shows_snake(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_in_direction(Direction::Left), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 4));
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(10, 15), Direction::Right, 4, 1200);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(10, 15));
        assert_eq!(snake.tail(), Position::new(7, 15));
        assert!(snake.body.capacity() >= 1200);
    }

    #[test]
    fn test_shift_keeps_length() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 100);
        snake.shift_to(Position::new(6, 5));

        assert_eq!(
            snake.body,
            vec![Position::new(6, 5), Position::new(5, 5), Position::new(4, 5)]
        );
    }

    #[test]
    fn test_grow_appends_tail() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 100);
        let old_tail = snake.tail();
        snake.shift_to(Position::new(6, 5));
        snake.grow(old_tail);

        assert_eq!(snake.len(), 4);
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_occupancy() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3, 100);
        assert!(snake.occupies(Position::new(5, 5))); // head
        assert!(snake.occupies(Position::new(3, 5)));
        assert!(!snake.occupies(Position::new(10, 10)));
        assert_eq!(snake.body_segments(), &[Position::new(4, 5), Position::new(3, 5)]);
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3, 400),
            Position::new(10, 10),
            20,
            15,
        );

        assert!(state.is_in_bounds(Position::new(0, 0)));
        assert!(state.is_in_bounds(Position::new(19, 14)));
        assert!(!state.is_in_bounds(Position::new(-1, 0)));
        assert!(!state.is_in_bounds(Position::new(20, 0)));
        assert!(!state.is_in_bounds(Position::new(0, 15)));
        assert!(!state.is_in_bounds(Position::new(0, -1)));
    }

    #[test]
    fn test_snapshot_hides_food_outside_play() {
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3, 100),
            Position::new(8, 8),
            10,
            10,
        );
        let snap = state.snapshot();
        assert_eq!(snap.food, Some(Position::new(8, 8)));
        assert_eq!(snap.head(), Some(Position::new(5, 5)));
        assert!(snap.shows_snake());

        state.phase = Phase::GameOver;
        let snap = state.snapshot();
        assert_eq!(snap.food, None);
        assert!(snap.shows_snake());

        state.phase = Phase::Menu;
        assert!(!state.snapshot().shows_snake());
    }
}
