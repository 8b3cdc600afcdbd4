use super::{min_cost_at, BestCost, Predecessors, SearchOutcome};
use crate::common::{Cell, Direction, FrontierNode, SearchState};
use crate::map::Map;
use crate::stat::Stats;

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use tracing::{debug, instrument, trace};

/// Lowest cost from `(start, start_direction)` to `end`, where every step
/// costs 1 and every change of facing costs `turn_penalty` on top.
///
/// The search runs until the frontier is exhausted, so the returned
/// [`BestCost`] covers every reachable state and [`Predecessors`] keeps every
/// predecessor that ties for a state's best cost.
#[instrument(skip_all, name = "shortest_cost", fields(start = format!("{:?}", start), start_direction = %start_direction, end = format!("{:?}", end)), level = "debug")]
pub fn shortest_cost(
    map: &Map,
    start: Cell,
    start_direction: Direction,
    end: Cell,
    turn_penalty: usize,
    stats: &mut Stats,
) -> SearchOutcome {
    let mut open_list = BinaryHeap::new();
    let mut closed_list = HashSet::new();
    let mut best_cost = BestCost::new();
    let mut predecessors = Predecessors::new();

    let start_state = SearchState::new(start, start_direction);
    best_cost.insert(start_state, 0);
    open_list.push(FrontierNode {
        state: start_state,
        cost: 0,
    });

    while let Some(current) = open_list.pop() {
        // Superseded entries from decrease-key by reinsertion.
        if current.cost > best_cost[&current.state] || !closed_list.insert(current.state) {
            stats.stale_pops += 1;
            continue;
        }
        trace!("expand state: {current:?}");
        stats.expanded_states += 1;

        let (x, y) = current.state.position;
        for (direction, neighbor) in map.get_neighbors(x, y) {
            let tentative_cost = if direction == current.state.direction {
                current.cost + 1
            } else {
                current.cost + 1 + turn_penalty
            };
            let next = SearchState::new(neighbor, direction);

            let ordering = best_cost
                .get(&next)
                .map_or(Ordering::Less, |&known| tentative_cost.cmp(&known));
            match ordering {
                Ordering::Less => {
                    best_cost.insert(next, tentative_cost);
                    predecessors.insert(next, HashSet::from([current.state]));
                    open_list.push(FrontierNode {
                        state: next,
                        cost: tentative_cost,
                    });
                    stats.improvements += 1;
                }
                Ordering::Equal => {
                    // Both routes are optimal so far; keep both.
                    if predecessors.entry(next).or_default().insert(current.state) {
                        stats.tie_merges += 1;
                    }
                }
                Ordering::Greater => {}
            }
        }
    }

    let cost = min_cost_at(&best_cost, end);
    match cost {
        Some(cost) => debug!("reached end with cost {cost}"),
        None => debug!("end is unreachable"),
    }

    SearchOutcome {
        cost,
        best_cost,
        predecessors,
    }
}
