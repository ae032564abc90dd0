use core::fmt;

/// A grid coordinate. Cells are never allocated on their own, they only address a position in a
/// [Grid](crate::Grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry), the heuristic used
    /// by A* and greedy best-first search.
    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    /// True if both cells share an edge.
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan_distance(other) == 1
    }

    /// Offsets the cell by a (row, col) delta, returning [None] on underflow.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell::new(
            self.row.checked_add_signed(d_row)?,
            self.col.checked_add_signed(d_col)?,
        ))
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell::new(row, col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Classification of a single grid position.
///
/// `Visited`, `Frontier` and `Path` are transient: a search writes them and
/// [clear_transient](crate::Grid::clear_transient) removes them again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    #[default]
    Open,
    Obstacle,
    Start,
    Goal,
    Visited,
    Frontier,
    Path,
}

impl CellState {
    pub fn is_transient(self) -> bool {
        matches!(self, CellState::Visited | CellState::Frontier | CellState::Path)
    }

    pub fn is_passable(self) -> bool {
        self != CellState::Obstacle
    }

    pub fn is_marker(self) -> bool {
        matches!(self, CellState::Start | CellState::Goal)
    }

    /// Character used by the ascii map format and [Display](core::fmt::Display) of a grid.
    pub fn symbol(self) -> char {
        match self {
            CellState::Open => '.',
            CellState::Obstacle => '#',
            CellState::Start => 'S',
            CellState::Goal => 'G',
            CellState::Visited => 'v',
            CellState::Frontier => 'f',
            CellState::Path => '*',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<CellState> {
        match symbol {
            '.' => Some(CellState::Open),
            '#' => Some(CellState::Obstacle),
            'S' => Some(CellState::Start),
            'G' => Some(CellState::Goal),
            'v' => Some(CellState::Visited),
            'f' => Some(CellState::Frontier),
            '*' => Some(CellState::Path),
            _ => None,
        }
    }
}
