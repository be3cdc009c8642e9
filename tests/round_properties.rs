//! Property-based tests for the round engine.
//!
//! Random steering is fed into seeded rounds on every level, difficulty and
//! terminal size from the fallback upwards. The round invariants are checked
//! after every tick.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;

use grid_snake::game::{
    engine::points_per_food, Board, Difficulty, Direction, Player, RoundEngine, RoundSetup,
    RoundStatus, Snake, TickInput,
};

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

fn steering() -> impl Strategy<Value = Option<Direction>> {
    prop::option::of(prop::sample::select(DIRECTIONS.to_vec()))
}

fn setup(rows: u16, cols: u16, level: u32, difficulty: usize, multiplayer: bool) -> RoundSetup {
    let board = Board::from_terminal(rows, cols);
    RoundSetup::new(board, level, Difficulty::ALL[difficulty], multiplayer)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Snakes never shrink below three cells and score only grows in
    /// whole food portions.
    #[test]
    fn prop_length_and_score(
        seed in any::<u64>(),
        rows in 20u16..60,
        cols in 40u16..120,
        level in 1u32..=6,
        difficulty in 0usize..4,
        multiplayer in any::<bool>(),
        moves in prop::collection::vec((steering(), steering()), 1..200)
    ) {
        let mut engine = RoundEngine::new(Some(seed));
        let mut state = engine.start(&setup(rows, cols, level, difficulty, multiplayer));
        let mut last_score = state.score;

        for (first, second) in moves {
            let mut input = TickInput::default();
            if let Some(direction) = first {
                input.steer(Player::One, direction);
            }
            if let Some(direction) = second {
                input.steer(Player::Two, direction);
            }

            let result = engine.tick(&mut state, input);

            prop_assert!(state.snakes.iter().all(|s| s.len() >= 3));
            prop_assert!(state.score >= last_score);
            prop_assert_eq!(state.score % points_per_food(level), 0);
            prop_assert_eq!(state.score, state.food_eaten * points_per_food(level));
            last_score = state.score;

            if matches!(result.status, RoundStatus::Ended(_)) {
                break;
            }
        }
    }

    /// Food never sits on a snake or an obstacle while the round runs.
    #[test]
    fn prop_food_on_free_cell(
        seed in any::<u64>(),
        rows in 20u16..60,
        cols in 40u16..120,
        level in 1u32..=6,
        difficulty in 0usize..4,
        multiplayer in any::<bool>(),
        moves in prop::collection::vec((steering(), steering()), 1..200)
    ) {
        let mut engine = RoundEngine::new(Some(seed));
        let mut state = engine.start(&setup(rows, cols, level, difficulty, multiplayer));
        prop_assert!(!state.is_occupied(state.food));

        for (first, second) in moves {
            let input = TickInput {
                steer: [first, second],
                ..Default::default()
            };
            if engine.tick(&mut state, input).status != RoundStatus::Running {
                break;
            }
            prop_assert!(!state.is_occupied(state.food));
            prop_assert!(state.board.is_interior(state.food));
        }
    }

    /// A reversal request never changes where the snake goes.
    #[test]
    fn prop_reversal_is_ignored(
        direction in prop::sample::select(DIRECTIONS.to_vec())
    ) {
        let board = Board::default();
        let mut snake = Snake::new(board.center(), direction, 3);
        let reverse = DIRECTIONS
            .into_iter()
            .find(|d| d.is_opposite(direction))
            .unwrap();

        let before = snake.next_head();
        prop_assert!(!snake.steer(reverse));
        prop_assert_eq!(snake.next_head(), before);
        prop_assert_eq!(snake.direction, direction);
    }
}
