//! Obstacle layouts for each level.
//!
//! Every level is walled in by the board border. Levels 2-5 add a fixed
//! interior pattern, and HARD/EXPERT sprinkle random blocks on top of it
//! from level 2 onwards.

use rand::Rng;
use std::collections::HashSet;

use super::config::Difficulty;
use super::state::{Board, Cell};

/// Build the obstacle set for a round
pub fn generate_obstacles<R: Rng + ?Sized>(
    level: u32,
    difficulty: Difficulty,
    board: &Board,
    rng: &mut R,
) -> HashSet<Cell> {
    let mut obstacles: HashSet<Cell> = board.border_cells().collect();

    match level {
        0 | 1 => {}
        2 => add_cross(board, &mut obstacles),
        3 => add_horizontal_bars(board, &mut obstacles),
        4 => add_vertical_bars(board, &mut obstacles),
        _ => add_grid_with_block(board, &mut obstacles),
    }

    if level > 1 {
        add_random_blocks(difficulty.extra_obstacles(board), board, rng, &mut obstacles);
    }

    obstacles
}

/// A plus through the center. Each arm is cut next to the center and next
/// to the border so both halves of the board stay reachable.
fn add_cross(board: &Board, obstacles: &mut HashSet<Cell>) {
    let Cell { row: cy, col: cx } = board.center();

    for col in (board.left + 5..cx - 2).chain(cx + 3..board.right - 4) {
        obstacles.insert(Cell::new(cy, col));
    }
    for row in (board.top + 5..cy - 2).chain(cy + 3..board.bottom - 4) {
        obstacles.insert(Cell::new(row, cx));
    }
}

/// Two bars at a quarter and three quarters of the height, open on every
/// sixth column
fn add_horizontal_bars(board: &Board, obstacles: &mut HashSet<Cell>) {
    let height = board.playable_height();
    let rows = [board.top + height / 4, board.top + 3 * height / 4];

    for col in (board.left + 1..board.right).filter(|col| col.rem_euclid(6) != 0) {
        for &row in rows.iter().filter(|&&row| row < board.bottom) {
            obstacles.insert(Cell::new(row, col));
        }
    }
}

/// Three bars at a quarter, half and three quarters of the width, open on
/// every fifth row
fn add_vertical_bars(board: &Board, obstacles: &mut HashSet<Cell>) {
    let width = board.playable_width();
    let cols = [
        board.left + width / 4,
        board.left + 2 * width / 4,
        board.left + 3 * width / 4,
    ];

    for row in (board.top + 1..board.bottom).filter(|row| row.rem_euclid(5) != 0) {
        for &col in cols.iter().filter(|&&col| col < board.right) {
            obstacles.insert(Cell::new(row, col));
        }
    }
}

/// Sparse grid over the whole board plus a solid 5x7 block in the middle.
/// The block leaves its own center open; a grid cell there stays.
fn add_grid_with_block(board: &Board, obstacles: &mut HashSet<Cell>) {
    for row in (board.top + 3..board.bottom - 2).step_by(2) {
        for col in (board.left + 3..board.right - 2).step_by(3) {
            if (row + col).rem_euclid(4) != 0 {
                obstacles.insert(Cell::new(row, col));
            }
        }
    }

    let center = board.center();
    for row in center.row - 2..=center.row + 2 {
        for col in center.col - 3..=center.col + 3 {
            let cell = Cell::new(row, col);
            if cell != center {
                obstacles.insert(cell);
            }
        }
    }
}

fn add_random_blocks<R: Rng + ?Sized>(
    count: usize,
    board: &Board,
    rng: &mut R,
    obstacles: &mut HashSet<Cell>,
) {
    for _ in 0..count {
        let cell = Cell::new(
            rng.gen_range(board.top + 1..board.bottom),
            rng.gen_range(board.left + 1..board.right),
        );
        obstacles.insert(cell);
    }
}
