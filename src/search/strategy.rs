use core::fmt;
use core::str::FromStr;

use crate::error::SearchError;
use crate::search::frontier::Frontier;

/// The five search strategies. They share a single stepping loop and differ only in the frontier
/// structure, the priority they assign and whether they read the grid weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// FIFO queue, unit edge costs.
    BreadthFirst,
    /// LIFO stack, unit edge costs.
    DepthFirst,
    /// Priority queue on accumulated cost.
    Dijkstra,
    /// Priority queue on accumulated cost plus Manhattan distance to the goal.
    AStar,
    /// Priority queue on Manhattan distance to the goal only.
    GreedyBestFirst,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::Dijkstra,
        Strategy::AStar,
        Strategy::GreedyBestFirst,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::BreadthFirst => "bfs",
            Strategy::DepthFirst => "dfs",
            Strategy::Dijkstra => "dijkstra",
            Strategy::AStar => "astar",
            Strategy::GreedyBestFirst => "greedy",
        }
    }

    /// Whether edge costs come from the grid weights instead of being 1.
    pub fn uses_weights(self) -> bool {
        matches!(self, Strategy::Dijkstra | Strategy::AStar)
    }

    /// Whether a frontier cell may get a cheaper predecessor before it is visited.
    pub fn relaxes(self) -> bool {
        matches!(self, Strategy::Dijkstra | Strategy::AStar)
    }

    /// Returns true if the strategy always returns a cheapest path.
    pub fn is_exact(self) -> bool {
        !matches!(self, Strategy::DepthFirst | Strategy::GreedyBestFirst)
    }

    /// Frontier key from accumulated cost `g` and heuristic `h`. Ignored by the queue and
    /// stack.
    pub(crate) fn priority(self, g: u64, h: u64) -> u64 {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst => 0,
            Strategy::Dijkstra => g,
            Strategy::AStar => g + h,
            Strategy::GreedyBestFirst => h,
        }
    }

    pub(crate) fn frontier(self) -> Frontier {
        match self {
            Strategy::BreadthFirst => Frontier::queue(),
            Strategy::DepthFirst => Frontier::stack(),
            Strategy::Dijkstra | Strategy::AStar | Strategy::GreedyBestFirst => Frontier::heap(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Strategy, SearchError> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name().eq_ignore_ascii_case(s.trim()))
            .ok_or(SearchError::InvalidConfig("unknown search strategy"))
    }
}
