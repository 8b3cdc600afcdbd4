mod cheat;
mod dijkstra;
mod reconstruct;

pub use cheat::{baseline_path, count_cheats, distance_map, SavingRule};
pub use dijkstra::shortest_cost;
pub use reconstruct::{all_optimal_cells, construct_path, count_optimal_paths};

use std::collections::{HashMap, HashSet};

use crate::common::{Cell, Direction, SearchState};

pub type BestCost = HashMap<SearchState, usize>;
pub type Predecessors = HashMap<SearchState, HashSet<SearchState>>;

/// Everything a single search produced. `cost` is `None` when the end cell
/// was never reached.
#[derive(Debug, Clone, Default)]
pub struct SearchOutcome {
    pub cost: Option<usize>,
    pub best_cost: BestCost,
    pub predecessors: Predecessors,
}

// Cheapest cost over every facing at `end`, if any facing was reached.
fn min_cost_at(best_cost: &BestCost, end: Cell) -> Option<usize> {
    Direction::ALL
        .iter()
        .filter_map(|&direction| best_cost.get(&SearchState::new(end, direction)))
        .min()
        .copied()
}

// End states whose cost equals the overall minimum at `end`.
fn optimal_end_states(best_cost: &BestCost, end: Cell) -> Vec<SearchState> {
    let Some(min_cost) = min_cost_at(best_cost, end) else {
        return Vec::new();
    };
    Direction::ALL
        .iter()
        .map(|&direction| SearchState::new(end, direction))
        .filter(|state| best_cost.get(state) == Some(&min_cost))
        .collect()
}
