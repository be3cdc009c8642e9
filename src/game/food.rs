use rand::Rng;
use tracing::warn;

use super::state::{Board, Cell};

/// Random draws tried before giving up and using the board center
pub const MAX_PLACEMENT_ATTEMPTS: usize = 100;

/// Pick a random free interior cell for the next food item.
///
/// Falls back to the board center when no free cell turns up within
/// [`MAX_PLACEMENT_ATTEMPTS`] draws, even if the center is occupied.
pub fn place_food<R, F>(rng: &mut R, board: &Board, is_occupied: F) -> Cell
where
    R: Rng + ?Sized,
    F: Fn(Cell) -> bool,
{
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        let cell = Cell::new(
            rng.gen_range(board.top + 1..board.bottom),
            rng.gen_range(board.left + 1..board.right),
        );
        if !is_occupied(cell) {
            return cell;
        }
    }

    let fallback = board.center();
    warn!(?fallback, "no free cell for food, using board center");
    fallback
}
