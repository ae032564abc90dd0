use crate::cell::Cell;
use crate::error::{Result, SearchError};
use crate::grid::Grid;

/// Side length of the plain grid.
pub const DEFAULT_GRID_SIZE: usize = 29;
/// Side length of the weighted grid and of generated cost files.
pub const DEFAULT_WEIGHTED_GRID_SIZE: usize = 19;
pub const DEFAULT_MIN_COST: u32 = 1;
pub const DEFAULT_MAX_COST: u32 = 9;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    pub rows: usize,
    pub cols: usize,
}

impl GridConfig {
    pub fn unweighted() -> GridConfig {
        GridConfig {
            rows: DEFAULT_GRID_SIZE,
            cols: DEFAULT_GRID_SIZE,
        }
    }

    pub fn weighted() -> GridConfig {
        GridConfig {
            rows: DEFAULT_WEIGHTED_GRID_SIZE,
            cols: DEFAULT_WEIGHTED_GRID_SIZE,
        }
    }

    pub fn build(&self) -> Result<Grid> {
        Grid::new(self.rows, self.cols)
    }
}

impl Default for GridConfig {
    fn default() -> GridConfig {
        GridConfig::unweighted()
    }
}

/// Parameters for [generate_costs](crate::costs::generate_costs).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostConfig {
    pub rows: usize,
    pub cols: usize,
    pub min_cost: u32,
    pub max_cost: u32,
}

impl CostConfig {
    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SearchError::InvalidConfig("cost matrix must not be empty"));
        }
        if !(1..100).contains(&self.min_cost) {
            return Err(SearchError::InvalidConfig("min_cost must be > 0 and < 100"));
        }
        if !(1..100).contains(&self.max_cost) {
            return Err(SearchError::InvalidConfig("max_cost must be > 0 and < 100"));
        }
        if self.min_cost >= self.max_cost {
            return Err(SearchError::InvalidConfig("min_cost must be less than max_cost"));
        }
        Ok(())
    }
}

impl Default for CostConfig {
    fn default() -> CostConfig {
        CostConfig {
            rows: DEFAULT_WEIGHTED_GRID_SIZE,
            cols: DEFAULT_WEIGHTED_GRID_SIZE,
            min_cost: DEFAULT_MIN_COST,
            max_cost: DEFAULT_MAX_COST,
        }
    }
}

/// Parameters for [MazeGenerator](crate::maze::MazeGenerator). The same origin and seed always
/// carve the same maze.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MazeConfig {
    pub origin: Cell,
    pub seed: u64,
}
