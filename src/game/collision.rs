use std::collections::HashSet;
use std::fmt;

use super::state::{Board, Cell};

/// What a snake's head ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Head reached the border
    Wall,
    /// Head hit the snake's own body
    SelfCollision,
    /// Head hit the other player's snake
    Opponent,
    /// Head hit an obstacle
    Obstacle,
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Wall => "hit a wall",
            Self::SelfCollision => "hit itself",
            Self::Opponent => "hit the other snake",
            Self::Obstacle => "hit an obstacle",
        })
    }
}

/// Find out whether moving a snake's head to `head` crashes it.
///
/// `own_body` is the snake before the move, head first; its current head is
/// skipped. `other_body` is the whole other snake in multiplayer rounds.
/// The border counts as a wall even though it is also in `obstacles`.
pub fn detect_collision(
    head: Cell,
    own_body: &[Cell],
    other_body: Option<&[Cell]>,
    obstacles: &HashSet<Cell>,
    board: &Board,
) -> Option<CollisionType> {
    if head.row <= board.top
        || head.row >= board.bottom
        || head.col <= board.left
        || head.col >= board.right
    {
        return Some(CollisionType::Wall);
    }

    if own_body.iter().skip(1).any(|&segment| segment == head) {
        return Some(CollisionType::SelfCollision);
    }

    if other_body.is_some_and(|body| body.contains(&head)) {
        return Some(CollisionType::Opponent);
    }

    if obstacles.contains(&head) {
        return Some(CollisionType::Obstacle);
    }

    None
}

/// Boolean form of [`detect_collision`]
pub fn collides(
    head: Cell,
    own_body: &[Cell],
    other_body: Option<&[Cell]>,
    obstacles: &HashSet<Cell>,
    board: &Board,
) -> bool {
    detect_collision(head, own_body, other_body, obstacles, board).is_some()
}
