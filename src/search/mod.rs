//! Steppable search over a [Grid]. A [SearchEngine] borrows the grid mutably for the length of a
//! run, so the grid cannot be edited while a search is in progress. Each call to
//! [step](SearchEngine::step) visits exactly one cell and hands control back to the caller,
//! which decides the pacing.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::{debug, info};

use crate::cell::{Cell, CellState};
use crate::error::{Result, SearchError};
use crate::grid::Grid;

mod frontier;
mod strategy;

use frontier::{Frontier, FrontierEntry};
pub use strategy::Strategy;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Marks the start node, which has no predecessor.
const NO_PARENT: usize = usize::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchState {
    /// Start and goal are set, nothing visited yet.
    Ready,
    Running,
    /// The goal was visited.
    Found,
    /// The frontier ran empty before reaching the goal.
    Exhausted,
}

impl SearchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SearchState::Found | SearchState::Exhausted)
    }
}

/// A single visit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub cell: Cell,
    /// The cell this one was reached from, [None] for the start.
    pub parent: Option<Cell>,
    pub is_goal: bool,
}

/// Outcome of a finished run, owned by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub strategy: Strategy,
    /// Cells in the order they were visited.
    pub visited: Vec<Cell>,
    /// Start to goal inclusive, empty if the goal was not found.
    pub path: Vec<Cell>,
    pub found: bool,
    /// Sum of the grid weights entered along `path`.
    pub cost: u64,
}

impl SearchResult {
    /// Number of moves in the path.
    pub fn path_len(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchEvent {
    Visited(Step),
    Finished(SearchResult),
}

/// Runs one [Strategy] over a borrowed [Grid]. Discovered cells are annotated
/// [CellState::Frontier], visited cells [CellState::Visited] and, once the goal is found, the
/// path [CellState::Path]. Iterating the engine yields a [SearchEvent::Visited] per step
/// followed by exactly one [SearchEvent::Finished].
#[derive(Debug)]
pub struct SearchEngine<'g> {
    grid: &'g mut Grid,
    strategy: Strategy,
    start: Cell,
    goal: Cell,
    state: SearchState,
    frontier: Frontier,
    /// Discovered cells with (predecessor index, accumulated cost)
    nodes: FxIndexMap<Cell, (usize, u64)>,
    closed: Vec<bool>,
    visited: Vec<Cell>,
    seq: u64,
    result: Option<SearchResult>,
    reported: bool,
}

impl<'g> SearchEngine<'g> {
    /// Prepares a run from the grid's start to its goal, clearing annotations left by earlier
    /// runs. Fails with [SearchError::InvalidStartOrGoal] if either marker is missing.
    pub fn new(grid: &'g mut Grid, strategy: Strategy) -> Result<SearchEngine<'g>> {
        let (start, goal) = match (grid.start(), grid.goal()) {
            (Some(start), Some(goal)) => (start, goal),
            _ => return Err(SearchError::InvalidStartOrGoal),
        };
        grid.clear_transient();
        debug!("Preparing {} search from {} to {}", strategy, start, goal);
        let mut nodes = FxIndexMap::default();
        nodes.insert(start, (NO_PARENT, 0));
        let mut frontier = strategy.frontier();
        frontier.push(FrontierEntry {
            priority: strategy.priority(0, heuristic(start, goal)),
            cost: 0,
            seq: 0,
            index: 0,
        });
        Ok(SearchEngine {
            closed: vec![false; grid.len()],
            grid,
            strategy,
            start,
            goal,
            state: SearchState::Ready,
            frontier,
            nodes,
            visited: Vec::new(),
            seq: 1,
            result: None,
            reported: false,
        })
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn grid(&self) -> &Grid {
        self.grid
    }

    pub fn start(&self) -> Cell {
        self.start
    }

    pub fn goal(&self) -> Cell {
        self.goal
    }

    /// Cells visited so far, in order.
    pub fn visited(&self) -> &[Cell] {
        &self.visited
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    /// Available once the run is [Found](SearchState::Found) or
    /// [Exhausted](SearchState::Exhausted).
    pub fn result(&self) -> Option<&SearchResult> {
        self.result.as_ref()
    }

    pub fn into_result(self) -> Option<SearchResult> {
        self.result
    }

    /// Visits the next cell. Returns [None] once the run is terminal, including the call that
    /// discovers the frontier holds nothing but superseded entries.
    pub fn step(&mut self) -> Option<Step> {
        if self.state.is_terminal() {
            return None;
        }
        let (cell, entry) = loop {
            let Some(entry) = self.frontier.pop() else {
                self.finish(false);
                return None;
            };
            let Some((&cell, &(_, best))) = self.nodes.get_index(entry.index) else {
                continue;
            };
            // A cell may be in the heap several times if a cheaper route was found later;
            // only the cheapest entry of an unvisited cell counts
            if self.closed[self.grid.ix(cell)] || entry.cost > best {
                continue;
            }
            break (cell, entry);
        };

        let cell_ix = self.grid.ix(cell);
        self.closed[cell_ix] = true;
        self.visited.push(cell);
        self.grid.annotate(cell, CellState::Visited);
        self.state = SearchState::Running;
        let parent = self
            .nodes
            .get_index(entry.index)
            .and_then(|(_, &(parent, _))| self.nodes.get_index(parent))
            .map(|(&p, _)| p);

        if cell == self.goal {
            self.finish(true);
            return Some(Step {
                cell,
                parent,
                is_goal: true,
            });
        }
        self.expand(cell, entry);
        if self.frontier.is_empty() {
            self.finish(false);
        }
        Some(Step {
            cell,
            parent,
            is_goal: false,
        })
    }

    fn expand(&mut self, cell: Cell, entry: FrontierEntry) {
        for n in self.grid.passable_neighbors(cell) {
            if self.closed[self.grid.ix(n)] {
                continue;
            }
            let move_cost = if self.strategy.uses_weights() {
                u64::from(self.grid.weight(n))
            } else {
                1
            };
            let new_cost = entry.cost + move_cost;
            let index = match self.nodes.entry(n) {
                Vacant(e) => {
                    let index = e.index();
                    e.insert((entry.index, new_cost));
                    index
                }
                Occupied(mut e) => {
                    if self.strategy.relaxes() && e.get().1 > new_cost {
                        e.insert((entry.index, new_cost));
                        e.index()
                    } else {
                        continue;
                    }
                }
            };
            self.frontier.push(FrontierEntry {
                priority: self.strategy.priority(new_cost, heuristic(n, self.goal)),
                cost: new_cost,
                seq: self.seq,
                index,
            });
            self.seq += 1;
            self.grid.annotate(n, CellState::Frontier);
        }
    }

    fn finish(&mut self, found: bool) {
        let path = match self.nodes.get_index_of(&self.goal) {
            Some(goal_ix) if found => reverse_path(&self.nodes, goal_ix),
            _ => Vec::new(),
        };
        for cell in &path {
            self.grid.annotate(*cell, CellState::Path);
        }
        let cost = self.grid.path_cost(&path);
        self.state = if found {
            SearchState::Found
        } else {
            SearchState::Exhausted
        };
        info!(
            "{} search finished: found={}, visited={}, path length={}, cost={}",
            self.strategy,
            found,
            self.visited.len(),
            path.len(),
            cost
        );
        self.result = Some(SearchResult {
            strategy: self.strategy,
            visited: self.visited.clone(),
            path,
            found,
            cost,
        });
    }

    /// Steps until the run is terminal and returns the result.
    pub fn run(mut self) -> SearchResult {
        loop {
            if let Some(result) = self.result.take() {
                return result;
            }
            self.step();
        }
    }
}

impl Iterator for SearchEngine<'_> {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<SearchEvent> {
        if let Some(step) = self.step() {
            return Some(SearchEvent::Visited(step));
        }
        if self.reported {
            return None;
        }
        self.reported = true;
        self.result.clone().map(SearchEvent::Finished)
    }
}

fn heuristic(cell: Cell, goal: Cell) -> u64 {
    cell.manhattan_distance(&goal) as u64
}

/// Follows predecessor links from `from` back to the start.
fn reverse_path(nodes: &FxIndexMap<Cell, (usize, u64)>, from: usize) -> Vec<Cell> {
    let mut next = from;
    let mut path = std::iter::from_fn(|| {
        let (cell, &(parent, _)) = nodes.get_index(next)?;
        next = parent;
        Some(*cell)
    })
    .collect::<Vec<Cell>>();
    path.reverse();
    path
}

impl Grid {
    /// Runs `strategy` to completion from the start to the goal.
    pub fn search(&mut self, strategy: Strategy) -> Result<SearchResult> {
        Ok(SearchEngine::new(self, strategy)?.run())
    }
}
