use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, info};

use super::{
    action::{Direction, ExitRequest, Player, TickInput},
    collision::{detect_collision, CollisionType},
    config::Difficulty,
    food::place_food,
    obstacles::generate_obstacles,
    state::{Board, Cell, Snake, MIN_SNAKE_LEN},
};

/// Cells ahead of each spawning head that are kept free of obstacles
const SPAWN_CLEARANCE: i32 = 3;

/// Food items needed to finish a level
pub fn required_food(level: u32) -> u32 {
    3 + level
}

/// Points for one food item on a level
pub fn points_per_food(level: u32) -> u32 {
    10 * level
}

/// Why a round stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A snake crashed into a wall, itself, the other snake or an obstacle
    SelfOrBorderCollision {
        player: Player,
        kind: CollisionType,
    },
    /// Enough food was eaten to finish the level
    LevelComplete,
    /// The player pressed `m`
    UserQuitToMenu,
    /// The player pressed `q`
    UserQuit,
}

/// Where a round stands after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    Paused,
    Ended(EndReason),
}

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub status: RoundStatus,
    /// Which players ate food this tick
    pub ate_food: [bool; 2],
}

impl TickResult {
    fn from_status(status: RoundStatus) -> Self {
        Self {
            status,
            ate_food: [false; 2],
        }
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.status {
            RoundStatus::Ended(reason) => Some(reason),
            _ => None,
        }
    }
}

/// Final numbers of a finished round, handed back to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOutcome {
    pub reason: EndReason,
    pub score: u32,
    pub level: u32,
    pub food_eaten: u32,
}

/// Parameters a round is started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSetup {
    pub board: Board,
    pub level: u32,
    pub difficulty: Difficulty,
    pub multiplayer: bool,
    /// Score the round begins at, 0 unless scores carry across levels
    pub starting_score: u32,
}

impl RoundSetup {
    pub fn new(board: Board, level: u32, difficulty: Difficulty, multiplayer: bool) -> Self {
        Self {
            board,
            level: level.max(1),
            difficulty,
            multiplayer,
            starting_score: 0,
        }
    }
}

/// State of one round, from spawn to outcome
#[derive(Debug, Clone, PartialEq)]
pub struct RoundState {
    pub board: Board,
    pub level: u32,
    /// Player one's snake first; a second snake only in multiplayer
    pub snakes: Vec<Snake>,
    pub obstacles: HashSet<Cell>,
    pub food: Cell,
    pub score: u32,
    pub food_eaten: u32,
    pub required_food: u32,
    pub paused: bool,
    pub end_reason: Option<EndReason>,
}

impl RoundState {
    pub fn snake(&self, player: Player) -> Option<&Snake> {
        self.snakes.get(player.index())
    }

    pub fn is_multiplayer(&self) -> bool {
        self.snakes.len() > 1
    }

    pub fn status(&self) -> RoundStatus {
        match self.end_reason {
            Some(reason) => RoundStatus::Ended(reason),
            None if self.paused => RoundStatus::Paused,
            None => RoundStatus::Running,
        }
    }

    /// Summary of the round once it has ended
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.end_reason.map(|reason| RoundOutcome {
            reason,
            score: self.score,
            level: self.level,
            food_eaten: self.food_eaten,
        })
    }

    /// True if a snake or an obstacle covers the cell
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell) || self.snakes.iter().any(|s| s.occupies(cell))
    }
}

/// Runs rounds: spawns snakes, obstacles and food, then advances one tick
/// at a time
pub struct RoundEngine<R: Rng = StdRng> {
    rng: R,
}

impl RoundEngine<StdRng> {
    /// Create an engine, seeded when a seed is given
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(rng)
    }
}

impl<R: Rng> RoundEngine<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Lay out a fresh round
    pub fn start(&mut self, setup: &RoundSetup) -> RoundState {
        let board = setup.board;
        let row = (board.top + board.bottom) / 2;
        let span = board.right - board.left;

        let mut snakes = vec![Snake::new(
            Cell::new(row, board.left + span / 4),
            Direction::Right,
            MIN_SNAKE_LEN,
        )];
        if setup.multiplayer {
            snakes.push(Snake::new(
                Cell::new(row, board.left + 3 * span / 4),
                Direction::Left,
                MIN_SNAKE_LEN,
            ));
        }

        let mut obstacles = generate_obstacles(setup.level, setup.difficulty, &board, &mut self.rng);
        clear_spawn_lanes(&mut obstacles, &snakes, &board);

        let food = place_food(&mut self.rng, &board, |cell| {
            obstacles.contains(&cell) || snakes.iter().any(|s| s.occupies(cell))
        });

        info!(
            level = setup.level,
            difficulty = %setup.difficulty,
            multiplayer = setup.multiplayer,
            obstacles = obstacles.len(),
            ?board,
            "round started"
        );

        RoundState {
            board,
            level: setup.level,
            snakes,
            obstacles,
            food,
            score: setup.starting_score,
            food_eaten: 0,
            required_food: required_food(setup.level),
            paused: false,
            end_reason: None,
        }
    }

    /// Advance the round by one tick
    pub fn tick(&mut self, state: &mut RoundState, input: TickInput) -> TickResult {
        if state.end_reason.is_some() {
            return TickResult::from_status(state.status());
        }

        if input.toggle_pause {
            state.paused = !state.paused;
            debug!(paused = state.paused, "pause toggled");
            return TickResult::from_status(state.status());
        }
        if state.paused {
            return TickResult::from_status(RoundStatus::Paused);
        }

        for (index, snake) in state.snakes.iter_mut().enumerate() {
            if let Some(direction) = input.steer[index] {
                snake.steer(direction);
            }
        }

        let heads: Vec<Cell> = state.snakes.iter().map(Snake::next_head).collect();

        // Checked against the bodies before anyone moves, so a snake cannot
        // eat its way through a crash
        for (index, &head) in heads.iter().enumerate() {
            let other = state.snakes.get(1 - index).map(|snake| snake.body.as_slice());
            let crash = detect_collision(
                head,
                &state.snakes[index].body,
                other,
                &state.obstacles,
                &state.board,
            );
            if let Some(kind) = crash {
                let player = if index == 0 { Player::One } else { Player::Two };
                return self.finish(state, EndReason::SelfOrBorderCollision { player, kind });
            }
        }
        if heads.len() == 2 && heads[0] == heads[1] {
            return self.finish(
                state,
                EndReason::SelfOrBorderCollision {
                    player: Player::One,
                    kind: CollisionType::Opponent,
                },
            );
        }

        let mut ate_food = [false; 2];
        for (index, &head) in heads.iter().enumerate() {
            let eats = head == state.food;
            state.snakes[index].advance(head, eats);

            if eats {
                ate_food[index] = true;
                state.score += points_per_food(state.level);
                state.food_eaten += 1;
                state.food = place_food(&mut self.rng, &state.board, |cell| state.is_occupied(cell));
                debug!(score = state.score, food_eaten = state.food_eaten, "food eaten");
            }
        }

        let status = if state.food_eaten >= state.required_food {
            self.finish(state, EndReason::LevelComplete).status
        } else {
            match input.exit {
                Some(ExitRequest::Menu) => self.finish(state, EndReason::UserQuitToMenu).status,
                Some(ExitRequest::Quit) => self.finish(state, EndReason::UserQuit).status,
                None => RoundStatus::Running,
            }
        };

        TickResult { status, ate_food }
    }

    fn finish(&mut self, state: &mut RoundState, reason: EndReason) -> TickResult {
        state.end_reason = Some(reason);
        info!(?reason, score = state.score, level = state.level, "round ended");
        TickResult::from_status(RoundStatus::Ended(reason))
    }
}

/// Keep the spawn cells and a short run ahead of each head open so no level
/// pattern or random block ends the round before the player can react
fn clear_spawn_lanes(obstacles: &mut HashSet<Cell>, snakes: &[Snake], board: &Board) {
    for snake in snakes {
        let (d_row, d_col) = snake.direction.delta();
        let ahead = (1..=SPAWN_CLEARANCE).map(|step| snake.head().moved_by(d_row * step, d_col * step));
        for cell in snake.body.iter().copied().chain(ahead) {
            if board.is_interior(cell) {
                obstacles.remove(&cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(level: u32, multiplayer: bool) -> RoundSetup {
        RoundSetup::new(Board::default(), level, Difficulty::Normal, multiplayer)
    }

    fn engine() -> RoundEngine {
        RoundEngine::new(Some(42))
    }

    /// Move food out of the way so plain movement never eats by accident
    fn park_food(state: &mut RoundState) {
        state.food = Cell::new(state.board.bottom - 1, state.board.right - 1);
    }

    #[test]
    fn test_start_single_player() {
        let mut engine = engine();
        let state = engine.start(&setup(1, false));

        assert_eq!(state.snakes.len(), 1);
        assert!(!state.is_multiplayer());
        let snake = state.snake(Player::One).unwrap();
        assert_eq!(snake.body, vec![Cell::new(10, 10), Cell::new(10, 9), Cell::new(10, 8)]);
        assert_eq!(snake.direction, Direction::Right);
        assert_eq!(state.score, 0);
        assert_eq!(state.food_eaten, 0);
        assert_eq!(state.required_food, 4);
        assert_eq!(state.status(), RoundStatus::Running);
        assert!(!state.is_occupied(state.food));
        assert!(state.board.is_interior(state.food));
    }

    #[test]
    fn test_start_multiplayer() {
        let mut engine = engine();
        let state = engine.start(&setup(1, true));

        let second = state.snake(Player::Two).unwrap();
        assert_eq!(second.body, vec![Cell::new(10, 28), Cell::new(10, 29), Cell::new(10, 30)]);
        assert_eq!(second.direction, Direction::Left);
    }

    #[test]
    fn test_spawn_lane_is_clear_on_cross_level() {
        let mut engine = engine();
        let state = engine.start(&setup(2, true));

        for snake in &state.snakes {
            let mut cell = snake.head();
            for _ in 0..SPAWN_CLEARANCE {
                cell = cell.moved_in_direction(snake.direction);
                assert!(!state.obstacles.contains(&cell));
            }
            assert!(snake.body.iter().all(|c| !state.obstacles.contains(c)));
        }
        assert!(state.board.border_cells().all(|c| state.obstacles.contains(&c)));
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);

        let result = engine.tick(&mut state, TickInput::default());

        assert_eq!(result.status, RoundStatus::Running);
        assert_eq!(result.ate_food, [false, false]);
        let snake = state.snake(Player::One).unwrap();
        assert_eq!(snake.head(), Cell::new(10, 11));
        assert_eq!(snake.len(), 3);
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = engine();
        let mut state = engine.start(&setup(2, false));
        state.food = state.snakes[0].next_head();

        let result = engine.tick(&mut state, TickInput::default());

        assert_eq!(result.ate_food, [true, false]);
        assert_eq!(state.score, 20);
        assert_eq!(state.food_eaten, 1);
        assert_eq!(state.snakes[0].len(), 4);
        assert!(!state.is_occupied(state.food));
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);

        engine.tick(&mut state, TickInput::from(Direction::Left));

        assert_eq!(state.snakes[0].direction, Direction::Right);
        assert_eq!(state.snakes[0].head(), Cell::new(10, 11));
    }

    #[test]
    fn test_turn_applies_before_move() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);

        engine.tick(&mut state, TickInput::from(Direction::Up));

        assert_eq!(state.snakes[0].head(), Cell::new(9, 10));
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        state.snakes[0] = Snake::new(Cell::new(4, 20), Direction::Up, 3);

        let result = engine.tick(&mut state, TickInput::default());

        assert_eq!(
            result.end_reason(),
            Some(EndReason::SelfOrBorderCollision {
                player: Player::One,
                kind: CollisionType::Wall,
            })
        );
        assert_eq!(state.snakes[0].head(), Cell::new(4, 20));
    }

    #[test]
    fn test_self_collision() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        // Body bends back on itself: the cell above the head is a later segment
        state.snakes[0] = Snake {
            body: vec![
                Cell::new(10, 10),
                Cell::new(10, 11),
                Cell::new(9, 11),
                Cell::new(9, 10),
                Cell::new(9, 9),
            ],
            direction: Direction::Left,
        };

        let result = engine.tick(&mut state, TickInput::from(Direction::Up));

        assert_eq!(
            result.end_reason(),
            Some(EndReason::SelfOrBorderCollision {
                player: Player::One,
                kind: CollisionType::SelfCollision,
            })
        );
    }

    #[test]
    fn test_cannot_eat_through_a_crash() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        state.snakes[0] = Snake::new(Cell::new(10, 12), Direction::Right, 3);
        state.obstacles.insert(Cell::new(10, 13));
        state.food = Cell::new(10, 13);

        let result = engine.tick(&mut state, TickInput::default());

        assert!(result.end_reason().is_some());
        assert_eq!(state.score, 0);
        assert_eq!(state.food_eaten, 0);
    }

    #[test]
    fn test_pause_freezes_round() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        let before = state.snakes[0].clone();

        let mut pause = TickInput::default();
        pause.toggle_pause();
        assert_eq!(engine.tick(&mut state, pause).status, RoundStatus::Paused);
        assert_eq!(state.snakes[0], before);

        // Steering and exit requests are ignored while paused
        let mut input = TickInput::from(Direction::Up);
        input.request_exit(ExitRequest::Menu);
        assert_eq!(engine.tick(&mut state, input).status, RoundStatus::Paused);
        assert_eq!(state.snakes[0], before);

        // Unpausing consumes its tick too
        assert_eq!(engine.tick(&mut state, pause).status, RoundStatus::Running);
        assert_eq!(state.snakes[0], before);

        engine.tick(&mut state, TickInput::default());
        assert_eq!(state.snakes[0].head(), before.head().moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_exit_requests() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        let mut input = TickInput::default();
        input.request_exit(ExitRequest::Menu);
        assert_eq!(
            engine.tick(&mut state, input).end_reason(),
            Some(EndReason::UserQuitToMenu)
        );

        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        let mut input = TickInput::default();
        input.request_exit(ExitRequest::Quit);
        assert_eq!(engine.tick(&mut state, input).end_reason(), Some(EndReason::UserQuit));
    }

    #[test]
    fn test_ended_round_does_not_change() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        state.end_reason = Some(EndReason::UserQuit);
        let before = state.clone();

        let result = engine.tick(&mut state, TickInput::from(Direction::Up));

        assert_eq!(result.end_reason(), Some(EndReason::UserQuit));
        assert_eq!(state, before);
    }

    #[test]
    fn test_level_complete_after_four_foods_on_level_one() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));

        for eaten in 1..=4 {
            state.food = state.snakes[0].next_head();
            let result = engine.tick(&mut state, TickInput::default());
            assert_eq!(state.food_eaten, eaten);
            if eaten < 4 {
                assert_eq!(result.status, RoundStatus::Running);
            } else {
                assert_eq!(result.end_reason(), Some(EndReason::LevelComplete));
            }
        }

        assert_eq!(state.score, 40);
        assert_eq!(state.snakes[0].len(), 7);
        let outcome = state.outcome().unwrap();
        assert_eq!(outcome.reason, EndReason::LevelComplete);
        assert_eq!(outcome.score, 40);
    }

    #[test]
    fn test_level_complete_beats_exit_request() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        state.food_eaten = 3;
        state.food = state.snakes[0].next_head();
        let mut input = TickInput::default();
        input.request_exit(ExitRequest::Menu);

        let result = engine.tick(&mut state, input);

        assert_eq!(result.end_reason(), Some(EndReason::LevelComplete));
    }

    #[test]
    fn test_carried_score_keeps_accumulating() {
        let mut engine = engine();
        let mut setup = setup(3, false);
        setup.starting_score = 70;
        let mut state = engine.start(&setup);
        state.food = state.snakes[0].next_head();

        engine.tick(&mut state, TickInput::default());

        assert_eq!(state.score, 100);
    }

    #[test]
    fn test_multiplayer_body_hit_ends_round_for_player_one() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, true));
        park_food(&mut state);
        state.snakes[0] = Snake::new(Cell::new(8, 20), Direction::Down, 3);
        // Player two lies across row 9; player one's next head is its second segment
        state.snakes[1] = Snake::new(Cell::new(9, 19), Direction::Left, 3);

        let result = engine.tick(&mut state, TickInput::default());

        assert_eq!(
            result.end_reason(),
            Some(EndReason::SelfOrBorderCollision {
                player: Player::One,
                kind: CollisionType::Opponent,
            })
        );
    }

    #[test]
    fn test_multiplayer_player_two_crash() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, true));
        park_food(&mut state);
        state.snakes[1] = Snake::new(Cell::new(10, 2), Direction::Left, 3);

        let result = engine.tick(&mut state, TickInput::default());

        assert_eq!(
            result.end_reason(),
            Some(EndReason::SelfOrBorderCollision {
                player: Player::Two,
                kind: CollisionType::Wall,
            })
        );
    }

    #[test]
    fn test_head_on_crash() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, true));
        park_food(&mut state);
        state.snakes[0] = Snake::new(Cell::new(10, 17), Direction::Right, 3);
        state.snakes[1] = Snake::new(Cell::new(10, 19), Direction::Left, 3);

        let result = engine.tick(&mut state, TickInput::default());

        assert!(matches!(
            result.end_reason(),
            Some(EndReason::SelfOrBorderCollision { .. })
        ));
    }

    #[test]
    fn test_player_two_steering() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, true));
        park_food(&mut state);
        let mut input = TickInput::default();
        input.steer(Player::Two, Direction::Up);
        input.steer(Player::One, Direction::Down);

        engine.tick(&mut state, input);

        assert_eq!(state.snakes[0].head(), Cell::new(11, 10));
        assert_eq!(state.snakes[1].head(), Cell::new(9, 28));
    }

    #[test]
    fn test_second_player_input_ignored_in_single_player() {
        let mut engine = engine();
        let mut state = engine.start(&setup(1, false));
        park_food(&mut state);
        let mut input = TickInput::default();
        input.steer(Player::Two, Direction::Up);

        let result = engine.tick(&mut state, input);

        assert_eq!(result.status, RoundStatus::Running);
        assert_eq!(state.snakes.len(), 1);
        assert_eq!(state.snakes[0].head(), Cell::new(10, 11));
    }
}
