//! # grid_search
//!
//! Step-by-step path search on 4-connected grids. Five strategies share one steppable engine:
//! [breadth-first](https://en.wikipedia.org/wiki/Breadth-first_search),
//! [depth-first](https://en.wikipedia.org/wiki/Depth-first_search),
//! [Dijkstra](https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm),
//! [A*](https://en.wikipedia.org/wiki/A*_search_algorithm) and greedy best-first search, the
//! last two guided by the Manhattan distance to the goal. Each call to
//! [SearchEngine::step] visits one cell, so callers can animate a run at their own pace.
//!
//! Grids can carry a weight layer loaded from a plain-text cost file (see [costs]) and can be
//! filled with a perfect maze using randomized Prim's algorithm (see [maze]).
//!
//! ```
//! use grid_search::{Cell, Grid, Strategy};
//!
//! let mut grid = Grid::from_ascii("S.#\n..#\n#.G").unwrap();
//! let result = grid.search(Strategy::AStar).unwrap();
//! assert!(result.found);
//! assert_eq!(result.path.first(), Some(&Cell::new(0, 0)));
//! assert_eq!(result.path_len(), 4);
//! ```
pub mod cell;
pub mod config;
pub mod costs;
pub mod error;
pub mod grid;
pub mod maze;
pub mod search;

pub use cell::{Cell, CellState};
pub use config::{CostConfig, GridConfig, MazeConfig};
pub use costs::{generate_costs, load_costs, read_costs, write_costs, WeightMatrix};
pub use error::{Result, SearchError};
pub use grid::{Grid, DEFAULT_WEIGHT};
pub use maze::MazeGenerator;
pub use search::{SearchEngine, SearchEvent, SearchResult, SearchState, Step, Strategy};
