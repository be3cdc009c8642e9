/// Direction a snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the (row, column) delta for one step in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Which of the two snakes an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

/// How the player asked to leave a running round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitRequest {
    /// `m`: back to the main menu
    Menu,
    /// `q`: quit the round
    Quit,
}

/// Everything the round engine reads in one tick.
///
/// Steering keeps only the most recent request per player; the driver folds
/// every key that arrived since the previous tick into one of these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steer: [Option<Direction>; 2],
    pub toggle_pause: bool,
    pub exit: Option<ExitRequest>,
}

impl TickInput {
    /// Record a steering request, replacing any earlier one for that player
    pub fn steer(&mut self, player: Player, direction: Direction) {
        self.steer[player.index()] = Some(direction);
    }

    pub fn steering(&self, player: Player) -> Option<Direction> {
        self.steer[player.index()]
    }

    /// Pressing pause twice before a tick cancels out
    pub fn toggle_pause(&mut self) {
        self.toggle_pause = !self.toggle_pause;
    }

    pub fn request_exit(&mut self, exit: ExitRequest) {
        self.exit = Some(exit);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<Direction> for TickInput {
    fn from(direction: Direction) -> Self {
        let mut input = Self::default();
        input.steer(Player::One, direction);
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_directions() {
        assert!(Direction::Up.is_opposite(Direction::Down));
        assert!(Direction::Down.is_opposite(Direction::Up));
        assert!(Direction::Left.is_opposite(Direction::Right));
        assert!(Direction::Right.is_opposite(Direction::Left));

        assert!(!Direction::Up.is_opposite(Direction::Left));
        assert!(!Direction::Up.is_opposite(Direction::Right));
        assert!(!Direction::Up.is_opposite(Direction::Up));
    }

    #[test]
    fn test_direction_delta_is_row_col() {
        assert_eq!(Direction::Up.delta(), (-1, 0));
        assert_eq!(Direction::Down.delta(), (1, 0));
        assert_eq!(Direction::Left.delta(), (0, -1));
        assert_eq!(Direction::Right.delta(), (0, 1));
    }

    #[test]
    fn test_latest_steer_wins() {
        let mut input = TickInput::default();
        input.steer(Player::One, Direction::Up);
        input.steer(Player::One, Direction::Left);
        input.steer(Player::Two, Direction::Down);

        assert_eq!(input.steering(Player::One), Some(Direction::Left));
        assert_eq!(input.steering(Player::Two), Some(Direction::Down));
    }

    #[test]
    fn test_double_pause_cancels() {
        let mut input = TickInput::default();
        input.toggle_pause();
        assert!(input.toggle_pause);
        input.toggle_pause();
        assert!(!input.toggle_pause);
        assert!(input.is_empty());
    }
}
