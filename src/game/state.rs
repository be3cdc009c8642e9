use super::action::Direction;

/// Minimum terminal size the board is laid out for; smaller terminals get
/// this size instead
pub const FALLBACK_ROWS: u16 = 20;
pub const FALLBACK_COLS: u16 = 40;

/// Rows reserved above the board for the HUD
const HUD_ROWS: i32 = 3;

/// Shortest a snake is ever allowed to be
pub const MIN_SNAKE_LEN: usize = 3;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: i32,
    pub col: i32,
}

impl Cell {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move cell by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move cell one step in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }
}

/// The playing field. `top`, `bottom`, `left` and `right` are the border
/// coordinates themselves; everything strictly inside is playable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

impl Board {
    /// Lay the board out for a terminal of the given size
    pub fn from_terminal(rows: u16, cols: u16) -> Self {
        let (rows, cols) = if rows < FALLBACK_ROWS || cols < FALLBACK_COLS {
            (FALLBACK_ROWS, FALLBACK_COLS)
        } else {
            (rows, cols)
        };

        Self {
            top: HUD_ROWS,
            bottom: i32::from(rows) - 3,
            left: 1,
            right: i32::from(cols) - 2,
        }
    }

    pub fn playable_height(&self) -> i32 {
        self.bottom - self.top - 1
    }

    pub fn playable_width(&self) -> i32 {
        self.right - self.left - 1
    }

    pub fn playable_area(&self) -> i32 {
        self.playable_height() * self.playable_width()
    }

    /// True if the cell is strictly inside the border
    pub fn is_interior(&self, cell: Cell) -> bool {
        cell.row > self.top && cell.row < self.bottom && cell.col > self.left && cell.col < self.right
    }

    /// Geometric center, also the food fallback cell
    pub fn center(&self) -> Cell {
        Cell::new((self.top + self.bottom) / 2, (self.left + self.right) / 2)
    }

    /// Every border cell, row by row
    pub fn border_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let horizontal = (self.left..=self.right)
            .flat_map(move |col| [Cell::new(self.top, col), Cell::new(self.bottom, col)]);
        let vertical = (self.top + 1..self.bottom)
            .flat_map(move |row| [Cell::new(row, self.left), Cell::new(row, self.right)]);
        horizontal.chain(vertical)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::from_terminal(FALLBACK_ROWS, FALLBACK_COLS)
    }
}

/// A snake on the board
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Cell>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a snake whose body trails behind the head, opposite to
    /// `direction`
    pub fn new(head: Cell, direction: Direction, length: usize) -> Self {
        let length = length.max(MIN_SNAKE_LEN);
        let (d_row, d_col) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-d_row * i, -d_col * i))
            .collect();

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Cell the head moves into on the next step
    pub fn next_head(&self) -> Cell {
        self.head().moved_in_direction(self.direction)
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Change direction unless that would reverse the snake onto itself.
    /// Returns whether the turn was applied.
    pub fn steer(&mut self, direction: Direction) -> bool {
        if self.direction.is_opposite(direction) {
            return false;
        }
        self.direction = direction;
        true
    }

    /// Push `new_head` onto the snake. Without growth the tail is dropped,
    /// but never below the minimum length.
    pub fn advance(&mut self, new_head: Cell, grow: bool) {
        self.body.insert(0, new_head);

        if !grow && self.body.len() > MIN_SNAKE_LEN {
            self.body.pop();
        }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}
