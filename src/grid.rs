use core::fmt;

use itertools::Itertools;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, CellState};
use crate::costs::{load_costs, WeightMatrix};
use crate::error::{Result, SearchError};

/// Cost of entering a cell on a grid without a weight layer.
pub const DEFAULT_WEIGHT: u32 = 1;

/// Up, right, down, left. Every strategy expands neighbours in this order, which makes it the
/// tie-breaker for all of them.
pub const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

pub type Neighbors = SmallVec<[Cell; 4]>;

/// [Grid] stores one [CellState] per cell plus an optional [WeightMatrix]. It also maintains
/// connected components of passable cells using a [UnionFind] structure, which are joined
/// incrementally when obstacles are removed and flagged as dirty when obstacles are placed.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    states: Vec<CellState>,
    weights: Option<WeightMatrix>,
    start: Option<Cell>,
    goal: Option<Cell>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// Creates a grid with every cell [CellState::Open] and no weights.
    pub fn new(rows: usize, cols: usize) -> Result<Grid> {
        if rows == 0 || cols == 0 {
            return Err(SearchError::InvalidDimensions { rows, cols });
        }
        let mut grid = Grid {
            rows,
            cols,
            states: vec![CellState::Open; rows * cols],
            weights: None,
            start: None,
            goal: None,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        info!("Created {}x{} grid", rows, cols);
        Ok(grid)
    }

    /// Parses a character map with one row per line: `.` open, `#` obstacle, `S` start and
    /// `G` goal. Leading and trailing whitespace on each line is ignored.
    pub fn from_ascii(map: &str) -> Result<Grid> {
        let lines = map
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<&str>>();
        let rows = lines.len();
        let cols = lines.first().map_or(0, |l| l.chars().count());
        if lines.iter().any(|l| l.chars().count() != cols) {
            return Err(SearchError::InvalidDimensions { rows, cols });
        }
        let mut grid = Grid::new(rows, cols)?;
        for (row, line) in lines.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let cell = Cell::new(row, col);
                let malformed = |reason: String| SearchError::MalformedInput {
                    line: row + 1,
                    reason,
                };
                match CellState::from_symbol(symbol) {
                    Some(CellState::Open) => {}
                    Some(CellState::Obstacle) => grid.set_obstacle(cell, true)?,
                    Some(CellState::Start) if grid.start.is_some() => {
                        return Err(malformed("more than one start".to_owned()))
                    }
                    Some(CellState::Goal) if grid.goal.is_some() => {
                        return Err(malformed("more than one goal".to_owned()))
                    }
                    Some(CellState::Start) => grid.set_start(cell)?,
                    Some(CellState::Goal) => grid.set_goal(cell)?,
                    _ => return Err(malformed(format!("unexpected symbol {symbol:?}"))),
                }
            }
        }
        grid.update();
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    pub(crate) fn ix(&self, cell: Cell) -> usize {
        cell.row * self.cols + cell.col
    }

    fn checked_ix(&self, cell: Cell) -> Result<usize> {
        if self.in_bounds(cell) {
            Ok(self.ix(cell))
        } else {
            Err(SearchError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (0..cols).map(move |col| Cell::new(row, col)))
    }

    pub fn state(&self, cell: Cell) -> Option<CellState> {
        self.in_bounds(cell).then(|| self.states[self.ix(cell)])
    }

    pub fn is_obstacle(&self, cell: Cell) -> bool {
        self.state(cell) == Some(CellState::Obstacle)
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn goal(&self) -> Option<Cell> {
        self.goal
    }

    /// Places or removes an obstacle. Does nothing on the start or goal cell.
    pub fn set_obstacle(&mut self, cell: Cell, on: bool) -> Result<()> {
        let ix = self.checked_ix(cell)?;
        let current = self.states[ix];
        if current.is_marker() {
            return Ok(());
        }
        if on {
            if current != CellState::Obstacle {
                self.states[ix] = CellState::Obstacle;
                // Placing an obstacle may split a component
                self.components_dirty = true;
            }
        } else if current == CellState::Obstacle {
            self.states[ix] = CellState::Open;
            for n in self.passable_neighbors(cell) {
                let n_ix = self.ix(n);
                self.components.union(ix, n_ix);
            }
        }
        Ok(())
    }

    /// Moves the start marker to `cell`. The previous start cell reverts to open. Placing the
    /// start on the goal cell removes the goal. Obstacles are not cleared implicitly:
    /// [SearchError::OccupiedByObstacle] is returned and the grid is left untouched.
    pub fn set_start(&mut self, cell: Cell) -> Result<()> {
        self.place_marker(cell, CellState::Start)
    }

    /// Counterpart of [set_start](Self::set_start) for the goal marker.
    pub fn set_goal(&mut self, cell: Cell) -> Result<()> {
        self.place_marker(cell, CellState::Goal)
    }

    fn place_marker(&mut self, cell: Cell, marker: CellState) -> Result<()> {
        let ix = self.checked_ix(cell)?;
        if self.states[ix] == CellState::Obstacle {
            return Err(SearchError::OccupiedByObstacle(cell));
        }
        let (slot, other) = match marker {
            CellState::Start => (self.start.take(), &mut self.goal),
            _ => (self.goal.take(), &mut self.start),
        };
        if *other == Some(cell) {
            *other = None;
        }
        if let Some(previous) = slot {
            let p_ix = self.ix(previous);
            self.states[p_ix] = CellState::Open;
        }
        self.states[ix] = marker;
        match marker {
            CellState::Start => self.start = Some(cell),
            _ => self.goal = Some(cell),
        }
        Ok(())
    }

    /// Removes the start marker, leaving its cell open.
    pub fn clear_start(&mut self) {
        if let Some(cell) = self.start.take() {
            let ix = self.ix(cell);
            self.states[ix] = CellState::Open;
        }
    }

    /// Removes the goal marker, leaving its cell open.
    pub fn clear_goal(&mut self) {
        if let Some(cell) = self.goal.take() {
            let ix = self.ix(cell);
            self.states[ix] = CellState::Open;
        }
    }

    /// The in-bounds 4-neighbourhood of `cell` in [NEIGHBOR_OFFSETS] order, obstacles included.
    pub fn neighbors(&self, cell: Cell) -> Neighbors {
        if !self.in_bounds(cell) {
            return Neighbors::new();
        }
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(d_row, d_col)| cell.offset(d_row, d_col))
            .filter(|n| self.in_bounds(*n))
            .collect()
    }

    /// [neighbors](Self::neighbors) without obstacles.
    pub fn passable_neighbors(&self, cell: Cell) -> Neighbors {
        let mut neighbors = self.neighbors(cell);
        neighbors.retain(|n| !self.is_obstacle(*n));
        neighbors
    }

    /// Cost of entering `cell`.
    pub fn weight(&self, cell: Cell) -> u32 {
        self.weights
            .as_ref()
            .and_then(|w| w.get(cell))
            .unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn weights(&self) -> Option<&WeightMatrix> {
        self.weights.as_ref()
    }

    pub fn is_weighted(&self) -> bool {
        self.weights.is_some()
    }

    /// Replaces the weight layer. The matrix must match the grid dimensions exactly.
    pub fn set_weights(&mut self, weights: WeightMatrix) -> Result<()> {
        if weights.dimensions() != (self.rows, self.cols) {
            return Err(SearchError::DimensionMismatch {
                expected: (self.rows, self.cols),
                found: weights.dimensions(),
            });
        }
        info!("Applied {}x{} weight layer", self.rows, self.cols);
        self.weights = Some(weights);
        Ok(())
    }

    /// Parses a cost file against this grid's dimensions. On any error the previous weights are
    /// kept.
    pub fn load_costs(&mut self, source: &str) -> Result<()> {
        let weights = load_costs(source, self.rows, self.cols)?;
        self.set_weights(weights)
    }

    pub fn clear_weights(&mut self) {
        self.weights = None;
    }

    /// Removes search annotations (visited, frontier, path). Obstacles, markers and weights
    /// stay.
    pub fn clear_transient(&mut self) {
        for state in self.states.iter_mut().filter(|s| s.is_transient()) {
            *state = CellState::Open;
        }
    }

    /// Resets to a freshly created grid: no obstacles, weights, start or goal.
    pub fn clear_all(&mut self) {
        self.states.fill(CellState::Open);
        self.weights = None;
        self.start = None;
        self.goal = None;
        self.generate_components();
        debug!("Fully reset {}x{} grid", self.rows, self.cols);
    }

    /// Writes a search annotation. Obstacles and markers are never overwritten.
    pub(crate) fn annotate(&mut self, cell: Cell, state: CellState) {
        let ix = self.ix(cell);
        let current = self.states[ix];
        if current.is_passable() && !current.is_marker() {
            self.states[ix] = state;
        }
    }

    /// Rewrites the obstacle layer from `open`, which holds one flag per cell in row-major
    /// order. Markers on cells that become obstacles are dropped; callers re-place them.
    pub(crate) fn replace_layout(&mut self, open: &[bool]) {
        debug_assert_eq!(open.len(), self.states.len());
        for (state, &is_open) in self.states.iter_mut().zip(open) {
            *state = if is_open {
                CellState::Open
            } else {
                CellState::Obstacle
            };
        }
        self.start = None;
        self.goal = None;
        self.generate_components();
    }

    /// Sum of the entering weights along a path. The first cell is free. Summed as `u64` so
    /// paths over weights near `u32::MAX` do not overflow.
    pub fn path_cost(&self, path: &[Cell]) -> u64 {
        path.iter().skip(1).map(|c| u64::from(self.weight(*c))).sum()
    }

    /// Checks that `path` runs from the start to the goal over adjacent passable cells.
    pub fn is_valid_path(&self, path: &[Cell]) -> bool {
        match (path.first(), path.last(), self.start, self.goal) {
            (Some(first), Some(last), Some(start), Some(goal)) => {
                *first == start
                    && *last == goal
                    && path
                        .iter()
                        .all(|c| self.in_bounds(*c) && !self.is_obstacle(*c))
                    && path.iter().tuple_windows().all(|(a, b)| a.is_adjacent(b))
            }
            _ => false,
        }
    }

    /// Checks if `a` and `b` are on the same connected component, regenerating the components
    /// first if obstacles were placed since the last check.
    pub fn reachable(&mut self, a: Cell, b: Cell) -> bool {
        if !self.in_bounds(a) || !self.in_bounds(b) || self.is_obstacle(a) || self.is_obstacle(b)
        {
            return false;
        }
        self.update();
        self.components.equiv(self.ix(a), self.ix(b))
    }

    /// Retrieves the component id a given [Cell] belongs to, or [None] if it lies outside the
    /// grid.
    pub fn component(&self, cell: Cell) -> Option<usize> {
        self.checked_ix(cell).ok().map(|ix| self.components.find(ix))
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for cell in self.cells() {
            if self.is_obstacle(cell) {
                continue;
            }
            let ix = self.ix(cell);
            for n in [cell.offset(0, 1), cell.offset(1, 0)].into_iter().flatten() {
                if self.in_bounds(n) && !self.is_obstacle(n) {
                    let n_ix = self.ix(n);
                    self.components.union(ix, n_ix);
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.states.chunks(self.cols) {
            writeln!(f, "{}", row.iter().map(|s| s.symbol()).collect::<String>())?;
        }
        Ok(())
    }
}
