use super::{
    action::Direction,
    config::GameConfig,
    state::{CollisionType, GameState, Phase, Position, Snake},
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// What happened during one call to [`GameEngine::advance`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepInfo {
    /// Whether a grid step was taken (false for sub-tick calls)
    pub stepped: bool,
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// The game engine that handles all game logic
///
/// The engine holds the configuration and the random source; the state it
/// operates on is owned by the caller.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from OS entropy
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create an engine whose food placement is reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Initialize a fresh game, ready to play
    pub fn reset(&mut self) -> GameState {
        let head = Position::new(
            (self.config.grid_width / 4) as i32,
            (self.config.grid_height / 2) as i32,
        );

        let snake = Snake::new(
            head,
            Direction::Right,
            self.config.initial_snake_length,
            self.config.cell_count(),
        );

        // A validated config always leaves a free cell
        let food = self.place_food(&snake).unwrap_or(head);

        GameState::new(snake, food, self.config.grid_width, self.config.grid_height)
    }

    /// Initialize a game that waits in the menu for a start action
    pub fn new_session(&mut self) -> GameState {
        let mut state = self.reset();
        state.phase = Phase::Menu;
        state
    }

    /// Start from the menu or restart after a game over
    ///
    /// Returns false, leaving the state untouched, while a game is running.
    pub fn start(&mut self, state: &mut GameState) -> bool {
        if state.is_playing() {
            return false;
        }
        *state = self.reset();
        log::info!(
            "game started on a {}x{} grid",
            self.config.grid_width,
            self.config.grid_height
        );
        true
    }

    /// Request a new heading; ignored outside play and for 180-degree turns
    pub fn set_direction(&self, state: &mut GameState, direction: Direction) {
        if !state.is_playing() {
            return;
        }
        if state.snake.len() > 1 && state.snake.direction.is_opposite(direction) {
            return;
        }
        state.snake.direction = direction;
    }

    /// Accumulate `delta_time` seconds and take at most one grid step
    pub fn advance(&mut self, state: &mut GameState, delta_time: f64) -> StepInfo {
        if !state.is_playing() {
            return StepInfo::default();
        }

        state.move_timer += delta_time.max(0.0);
        if state.move_timer < self.config.move_interval_secs {
            return StepInfo::default();
        }
        state.move_timer = 0.0;

        let mut info = StepInfo {
            stepped: true,
            ..StepInfo::default()
        };

        let old_tail = state.snake.tail();
        let new_head = state.snake.head().moved_in_direction(state.snake.direction);
        state.snake.shift_to(new_head);
        state.steps += 1;

        // Only segments that existed before this step can be hit
        let checked_len = state.snake.len();

        if new_head == state.food {
            if state.snake.len() < self.config.cell_count() {
                state.snake.grow(old_tail);
                state.score += self.config.food_reward;
                info.ate_food = true;
            }
            match self.place_food(&state.snake) {
                Some(food) => state.food = food,
                None => log::warn!("no free cell left for food"),
            }
        }

        if let Some(collision) = Self::check_collision(state, checked_len) {
            state.phase = Phase::GameOver;
            info.collision_type = Some(collision);
            log::info!(
                "game over ({:?}) with score {} after {} steps",
                collision,
                state.score,
                state.steps
            );
        }

        info
    }

    /// Check the head against the walls, then against the first
    /// `checked_len - 1` segments behind it
    fn check_collision(state: &GameState, checked_len: usize) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.body_segments()[..checked_len - 1].contains(&head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Pick a random cell not covered by the snake
    ///
    /// Rejection sampling is tried for as many attempts as there are cells;
    /// after that the free cells are enumerated so placement stays bounded on
    /// a crowded grid. Returns `None` when the snake covers every cell.
    pub fn place_food(&mut self, snake: &Snake) -> Option<Position> {
        let width = self.config.grid_width;
        let height = self.config.grid_height;

        for _ in 0..self.config.cell_count() {
            let x = self.rng.gen_range(0..width) as i32;
            let y = self.rng.gen_range(0..height) as i32;
            let pos = Position::new(x, y);

            if !snake.occupies(pos) {
                return Some(pos);
            }
        }

        log::debug!(
            "food sampling exhausted with {} of {} cells occupied",
            snake.len(),
            self.config.cell_count()
        );

        let free: Vec<Position> = (0..height as i32)
            .flat_map(|y| (0..width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !snake.occupies(*pos))
            .collect();

        free.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f64 = 0.15;

    fn engine() -> GameEngine {
        GameEngine::with_seed(GameConfig::default(), 7)
    }

    fn state_with(body: &[(i32, i32)], direction: Direction, food: (i32, i32)) -> GameState {
        let mut snake = Snake::new(Position::new(body[0].0, body[0].1), direction, 1, 1200);
        snake.body = body.iter().map(|&(x, y)| Position::new(x, y)).collect();
        GameState::new(snake, Position::new(food.0, food.1), 40, 30)
    }

    #[test]
    fn test_reset() {
        let mut engine = engine();
        let state = engine.reset();

        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.move_timer, 0.0);
        assert_eq!(state.snake.direction, Direction::Right);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(10, 15),
                Position::new(9, 15),
                Position::new(8, 15),
                Position::new(7, 15),
            ]
        );
        assert!(!state.snake.occupies(state.food));
        assert!(state.is_in_bounds(state.food));
    }

    #[test]
    fn test_new_session_waits_in_menu() {
        let mut engine = engine();
        let mut state = engine.new_session();
        assert_eq!(state.phase, Phase::Menu);

        let before = state.clone();
        let info = engine.advance(&mut state, 10.0);
        assert!(!info.stepped);
        assert_eq!(state, before);

        engine.set_direction(&mut state, Direction::Up);
        assert_eq!(state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_start_transitions() {
        let mut engine = engine();
        let mut state = engine.new_session();

        assert!(engine.start(&mut state));
        assert_eq!(state.phase, Phase::Playing);

        // no restart while playing
        state.score = 30;
        assert!(!engine.start(&mut state));
        assert_eq!(state.score, 30);

        state.phase = Phase::GameOver;
        assert!(engine.start(&mut state));
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_sub_tick_accumulates() {
        let mut engine = engine();
        let mut state = engine.reset();
        let body = state.snake.body.clone();

        for _ in 0..2 {
            let info = engine.advance(&mut state, 0.0625);
            assert!(!info.stepped);
        }
        assert_eq!(state.snake.body, body);
        assert_eq!(state.move_timer, 0.125);

        let info = engine.advance(&mut state, 0.0625);
        assert!(info.stepped);
        assert_eq!(state.move_timer, 0.0);
        assert_eq!(state.snake.head(), Position::new(11, 15));
    }

    #[test]
    fn test_one_step_per_call() {
        let mut engine = engine();
        let mut state = engine.reset();

        // a long frame still moves a single cell
        engine.advance(&mut state, 1.0);
        assert_eq!(state.snake.head(), Position::new(11, 15));
        assert_eq!(state.steps, 1);
    }

    #[test]
    fn test_zero_delta_is_idempotent() {
        let mut engine = engine();
        let mut state = engine.reset();
        let before = state.clone();

        for _ in 0..100 {
            engine.advance(&mut state, 0.0);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = state_with(
            &[(10, 15), (9, 15), (8, 15), (7, 15)],
            Direction::Right,
            (11, 15),
        );

        let info = engine.advance(&mut state, STEP);

        assert!(info.ate_food);
        assert_eq!(info.collision_type, None);
        assert_eq!(state.score, 10);
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(11, 15),
                Position::new(10, 15),
                Position::new(9, 15),
                Position::new(8, 15),
                Position::new(7, 15),
            ]
        );
        assert!(!state.snake.occupies(state.food));
        assert_eq!(state.phase, Phase::Playing);
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = state_with(&[(39, 15), (38, 15), (37, 15)], Direction::Right, (0, 0));

        let info = engine.advance(&mut state, STEP);

        assert!(info.stepped);
        assert_eq!(info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.phase, Phase::GameOver);
        assert_eq!(state.snake.head(), Position::new(40, 15));

        // frozen after game over
        let before = state.clone();
        engine.advance(&mut state, STEP);
        assert_eq!(state, before);
    }

    #[test]
    fn test_wall_collision_top() {
        let mut engine = engine();
        let mut state = state_with(&[(5, 0), (5, 1)], Direction::Up, (0, 0));

        let info = engine.advance(&mut state, STEP);
        assert_eq!(info.collision_type, Some(CollisionType::Wall));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        // head turns down into its own body
        let mut state = state_with(
            &[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)],
            Direction::Left,
            (0, 0),
        );
        engine.set_direction(&mut state, Direction::Down);

        let info = engine.advance(&mut state, STEP);

        assert_eq!(info.collision_type, Some(CollisionType::SelfCollision));
        assert_eq!(state.phase, Phase::GameOver);
    }

    #[test]
    fn test_chasing_tail_is_safe() {
        let mut engine = engine();
        // 2x2 loop: the head moves into the cell the tail just left
        let mut state = state_with(&[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Right, (0, 0));

        let info = engine.advance(&mut state, STEP);

        assert_eq!(info.collision_type, None);
        assert_eq!(state.snake.head(), Position::new(6, 5));
    }

    #[test]
    fn test_eating_into_vacated_tail_cell_grows() {
        let mut engine = engine();
        // the food sits where the tail is about to leave
        let mut state = state_with(&[(5, 5), (5, 6), (6, 6), (6, 5)], Direction::Right, (6, 5));

        let info = engine.advance(&mut state, STEP);

        assert!(info.ate_food);
        assert_eq!(info.collision_type, None);
        assert_eq!(state.phase, Phase::Playing);
        assert_eq!(state.score, 10);
        assert_eq!(state.snake.len(), 5);
        assert_eq!(state.snake.head(), Position::new(6, 5));
        // the new last segment keeps the cell the tail had before the step
        assert_eq!(state.snake.tail(), Position::new(6, 5));
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(6, 5),
                Position::new(5, 5),
                Position::new(5, 6),
                Position::new(6, 6),
                Position::new(6, 5),
            ]
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = engine.reset();

        engine.set_direction(&mut state, Direction::Left);
        assert_eq!(state.snake.direction, Direction::Right);

        engine.set_direction(&mut state, Direction::Up);
        assert_eq!(state.snake.direction, Direction::Up);
    }

    #[test]
    fn test_single_segment_may_reverse() {
        let engine = engine();
        let mut state = state_with(&[(5, 5)], Direction::Right, (0, 0));

        engine.set_direction(&mut state, Direction::Left);
        assert_eq!(state.snake.direction, Direction::Left);
    }

    #[test]
    fn test_last_direction_wins() {
        let mut engine = engine();
        let mut state = engine.reset();

        engine.set_direction(&mut state, Direction::Up);
        engine.set_direction(&mut state, Direction::Right);
        engine.advance(&mut state, STEP);

        assert_eq!(state.snake.head(), Position::new(11, 15));
    }

    #[test]
    fn test_place_food_on_crowded_grid() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(3, 3)
        };
        let mut engine = GameEngine::with_seed(config, 1);

        // every cell but (2, 2)
        let mut snake = Snake::new(Position::new(0, 0), Direction::Right, 1, 9);
        snake.body = (0..3)
            .flat_map(|y| (0..3).map(move |x| Position::new(x, y)))
            .filter(|p| *p != Position::new(2, 2))
            .collect();

        for _ in 0..20 {
            assert_eq!(engine.place_food(&snake), Some(Position::new(2, 2)));
        }

        snake.body.push(Position::new(2, 2));
        assert_eq!(engine.place_food(&snake), None);
    }

    #[test]
    fn test_growth_stops_at_capacity() {
        let config = GameConfig {
            initial_snake_length: 1,
            ..GameConfig::new(2, 1)
        };
        let mut engine = GameEngine::with_seed(config, 3);
        let mut snake = Snake::new(Position::new(1, 0), Direction::Down, 1, 2);
        snake.body = vec![Position::new(1, 0), Position::new(0, 0)];

        // the snake already covers the grid: reaching food neither grows nor scores
        let mut state = GameState::new(snake, Position::new(1, 1), 2, 1);
        let info = engine.advance(&mut state, 1.0);

        assert!(!info.ate_food);
        assert_eq!(info.collision_type, Some(CollisionType::Wall));
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_same_seed_same_food() {
        let mut a = GameEngine::with_seed(GameConfig::default(), 42);
        let mut b = GameEngine::with_seed(GameConfig::default(), 42);
        assert_eq!(a.reset().food, b.reset().food);
    }
}
