//! Maze carving with randomized [Prim's algorithm](https://en.wikipedia.org/wiki/Maze_generation_algorithm#Iterative_randomized_Prim's_algorithm_(without_stack,_without_sets)).
//! Passages are carved on the cells sharing the origin's row and column parity; the cells in
//! between are walls unless carved to join two passages. The result is a perfect maze: every
//! open cell is reachable from the origin along exactly one simple route.
//!
//! A frontier cell is joined to a carved cell two steps away by opening the wall between them.
//! When it has exactly one carved neighbour at that distance, that one is used; when it has
//! several, one of them is picked at random with the generator's seed. The cell is carved
//! either way, so every cell of the origin's parity ends up open and connected once.
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use log::{debug, info, warn};
use rand::prelude::*;
use smallvec::SmallVec;

use crate::cell::Cell;
use crate::config::MazeConfig;
use crate::error::{Result, SearchError};
use crate::grid::{Grid, NEIGHBOR_OFFSETS};

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Seeded maze generator. Two generators created with the same seed carve identical mazes for
/// the same grid size and origin.
#[derive(Clone, Debug)]
pub struct MazeGenerator {
    seed: u64,
    rng: StdRng,
}

impl MazeGenerator {
    pub fn new(seed: u64) -> MazeGenerator {
        MazeGenerator {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Replaces the obstacle layer of `grid` with a maze grown from `origin` and returns the
    /// number of open cells. Weights are kept and search annotations cleared.
    ///
    /// If the start or goal ends up on a wall it is moved to the nearest open cell (ties go to
    /// the lowest row, then column). If no open cell is left for the goal besides the start, the
    /// goal is removed.
    pub fn carve(&mut self, grid: &mut Grid, origin: Cell) -> Result<usize> {
        if !grid.in_bounds(origin) {
            return Err(SearchError::OutOfBounds {
                cell: origin,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        let (rows, cols) = (grid.rows(), grid.cols());
        let ix = |c: Cell| c.row * cols + c.col;
        let jumps = |c: Cell| -> SmallVec<[Cell; 4]> {
            NEIGHBOR_OFFSETS
                .iter()
                .filter_map(|&(d_row, d_col)| c.offset(2 * d_row, 2 * d_col))
                .filter(|n| n.row < rows && n.col < cols)
                .collect()
        };

        let mut open = vec![false; rows * cols];
        let mut frontier = FxIndexSet::default();
        open[ix(origin)] = true;
        frontier.extend(jumps(origin));

        while !frontier.is_empty() {
            let pick = self.rng.gen_range(0..frontier.len());
            let Some(cell) = frontier.swap_remove_index(pick) else {
                break;
            };
            let carved = jumps(cell)
                .into_iter()
                .filter(|n| open[ix(*n)])
                .collect::<SmallVec<[Cell; 4]>>();
            // One carved neighbour is the usual case; ties are broken by the seeded rng
            let Some(&via) = carved.choose(&mut self.rng) else {
                continue;
            };
            let wall = Cell::new((cell.row + via.row) / 2, (cell.col + via.col) / 2);
            open[ix(cell)] = true;
            open[ix(wall)] = true;
            frontier.extend(jumps(cell).into_iter().filter(|n| !open[ix(*n)]));
        }

        let (start, goal) = (grid.start(), grid.goal());
        grid.clear_transient();
        grid.replace_layout(&open);
        if let Some(start) = start {
            if let Some(cell) = nearest_open(grid, start, None) {
                if cell != start {
                    debug!("Moved start from {} to {}", start, cell);
                }
                grid.set_start(cell)?;
            }
        }
        if let Some(goal) = goal {
            match nearest_open(grid, goal, grid.start()) {
                Some(cell) => {
                    if cell != goal {
                        debug!("Moved goal from {} to {}", goal, cell);
                    }
                    grid.set_goal(cell)?;
                }
                None => warn!("No open cell left for the goal, removing it"),
            }
        }

        let open_count = open.iter().filter(|&&o| o).count();
        info!(
            "Carved maze from {} with seed {}: {} of {} cells open",
            origin,
            self.seed,
            open_count,
            open.len()
        );
        Ok(open_count)
    }
}

/// The closest open cell to `target` other than `exclude`, `target` itself if possible.
fn nearest_open(grid: &Grid, target: Cell, exclude: Option<Cell>) -> Option<Cell> {
    grid.cells()
        .filter(|c| !grid.is_obstacle(*c) && Some(*c) != exclude)
        .min_by_key(|c| (c.manhattan_distance(&target), c.row, c.col))
}

/// Carves a maze into `grid` from `origin` using a fresh generator seeded with `seed`.
pub fn generate(grid: &mut Grid, origin: Cell, seed: u64) -> Result<usize> {
    MazeGenerator::new(seed).carve(grid, origin)
}

/// [generate] driven by a [MazeConfig].
pub fn generate_with(grid: &mut Grid, config: &MazeConfig) -> Result<usize> {
    generate(grid, config.origin, config.seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellState;

    fn open_cells(grid: &Grid) -> Vec<Cell> {
        grid.cells().filter(|c| !grid.is_obstacle(*c)).collect()
    }

    #[test]
    fn origin_out_of_bounds() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(matches!(
            generate(&mut grid, Cell::new(5, 0), 1),
            Err(SearchError::OutOfBounds { .. })
        ));
        assert!(open_cells(&grid).len() == 25);
    }

    #[test]
    fn carves_every_junction_on_odd_grid() {
        let mut grid = Grid::new(7, 7).unwrap();
        let open = generate(&mut grid, Cell::new(0, 0), 42).unwrap();
        // 16 junctions joined by 15 carved walls
        assert_eq!(open, 31);
        for row in (0..7).step_by(2) {
            for col in (0..7).step_by(2) {
                assert!(!grid.is_obstacle(Cell::new(row, col)));
            }
        }
        for row in (1..7).step_by(2) {
            for col in (1..7).step_by(2) {
                assert!(grid.is_obstacle(Cell::new(row, col)));
            }
        }
    }

    #[test]
    fn maze_is_connected_and_loop_free() {
        for seed in 0..20 {
            let mut grid = Grid::new(11, 14).unwrap();
            let origin = Cell::new(3, 5);
            let open = generate(&mut grid, origin, seed).unwrap();
            let cells = open_cells(&grid);
            assert_eq!(cells.len(), open);
            for cell in &cells {
                assert!(grid.reachable(origin, *cell));
            }
            let edges: usize = cells
                .iter()
                .map(|c| {
                    [c.offset(0, 1), c.offset(1, 0)]
                        .into_iter()
                        .flatten()
                        .filter(|n| grid.in_bounds(*n) && !grid.is_obstacle(*n))
                        .count()
                })
                .sum();
            // A connected graph with one edge fewer than nodes is a tree
            assert_eq!(edges, cells.len() - 1);
        }
    }

    #[test]
    fn same_seed_same_maze() {
        let mut a = Grid::new(15, 15).unwrap();
        let mut b = Grid::new(15, 15).unwrap();
        let mut c = Grid::new(15, 15).unwrap();
        generate(&mut a, Cell::new(0, 0), 7).unwrap();
        generate(&mut b, Cell::new(0, 0), 7).unwrap();
        generate(&mut c, Cell::new(0, 0), 8).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert_ne!(a.to_string(), c.to_string());
    }

    #[test]
    fn relocates_buried_markers() {
        let mut grid = Grid::new(9, 9).unwrap();
        grid.set_start(Cell::new(1, 1)).unwrap();
        grid.set_goal(Cell::new(7, 7)).unwrap();
        generate(&mut grid, Cell::new(0, 0), 3).unwrap();
        let start = grid.start().unwrap();
        let goal = grid.goal().unwrap();
        assert!(start.manhattan_distance(&Cell::new(1, 1)) <= 2);
        assert!(goal.manhattan_distance(&Cell::new(7, 7)) <= 2);
        assert_eq!(grid.state(start), Some(CellState::Start));
        assert_eq!(grid.state(goal), Some(CellState::Goal));
        let result = grid.search(crate::Strategy::BreadthFirst).unwrap();
        assert!(result.found);
    }

    #[test]
    fn goal_removed_without_room() {
        let mut grid = Grid::new(2, 2).unwrap();
        grid.set_start(Cell::new(1, 1)).unwrap();
        grid.set_goal(Cell::new(0, 1)).unwrap();
        assert_eq!(generate(&mut grid, Cell::new(0, 0), 0).unwrap(), 1);
        assert_eq!(grid.start(), Some(Cell::new(0, 0)));
        assert_eq!(grid.goal(), None);
    }

    #[test]
    fn keeps_weights() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.load_costs("1 2 3\n4 5 6\n7 8 9").unwrap();
        generate_with(
            &mut grid,
            &MazeConfig {
                origin: Cell::new(1, 1),
                seed: 5,
            },
        )
        .unwrap();
        assert_eq!(grid.weight(Cell::new(2, 2)), 9);
    }
}
