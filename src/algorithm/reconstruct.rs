use super::{optimal_end_states, BestCost, Predecessors};
use crate::common::{Cell, Path, SearchState};

use std::collections::{HashMap, HashSet, VecDeque};
use tracing::{debug, instrument};

/// Cells lying on at least one optimal path to `end`.
///
/// Walks the predecessor graph backwards from every optimal end state. Tied
/// routes reconverge, so states are only queued once.
#[instrument(skip_all, name = "all_optimal_cells", fields(end = format!("{:?}", end)), level = "debug")]
pub fn all_optimal_cells(
    end: Cell,
    best_cost: &BestCost,
    predecessors: &Predecessors,
) -> HashSet<Cell> {
    let end_states = optimal_end_states(best_cost, end);
    let mut seen: HashSet<SearchState> = end_states.iter().copied().collect();
    let mut queue: VecDeque<SearchState> = end_states.into_iter().collect();

    while let Some(state) = queue.pop_front() {
        for pred in predecessors.get(&state).into_iter().flatten() {
            if seen.insert(*pred) {
                queue.push_back(*pred);
            }
        }
    }

    let cells: HashSet<Cell> = seen.into_iter().map(|state| state.position).collect();
    debug!("{} cells on optimal paths", cells.len());
    cells
}

/// One optimal path from the start to `end`, following the smallest
/// predecessor at each step so repeated calls agree.
pub fn construct_path(
    end: Cell,
    best_cost: &BestCost,
    predecessors: &Predecessors,
) -> Option<Path> {
    let mut current = *optimal_end_states(best_cost, end).first()?;
    let mut steps = vec![current];
    while let Some(pred) = predecessors.get(&current).and_then(|preds| preds.iter().min()) {
        steps.push(*pred);
        current = *pred;
    }
    steps.reverse();
    Some(Path { steps })
}

/// Number of distinct optimal state sequences ending at `end`, saturating at
/// `u64::MAX`.
pub fn count_optimal_paths(end: Cell, best_cost: &BestCost, predecessors: &Predecessors) -> u64 {
    let end_states = optimal_end_states(best_cost, end);
    if end_states.is_empty() {
        return 0;
    }

    // Only states that can reach an optimal end state matter.
    let mut relevant: HashSet<SearchState> = end_states.iter().copied().collect();
    let mut stack = end_states.clone();
    while let Some(state) = stack.pop() {
        for pred in predecessors.get(&state).into_iter().flatten() {
            if relevant.insert(*pred) {
                stack.push(*pred);
            }
        }
    }

    // Predecessors always cost strictly less, so ascending cost is a
    // topological order of the predecessor graph.
    let mut ordered: Vec<SearchState> = relevant.into_iter().collect();
    ordered.sort_by_key(|state| (best_cost[state], *state));

    let mut paths: HashMap<SearchState, u64> = HashMap::with_capacity(ordered.len());
    for state in ordered {
        let count = match predecessors.get(&state) {
            None => 1,
            Some(preds) => preds
                .iter()
                .map(|pred| paths[pred])
                .fold(0u64, u64::saturating_add),
        };
        paths.insert(state, count);
    }

    end_states
        .iter()
        .map(|state| paths[state])
        .fold(0, u64::saturating_add)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::brute_force::{random_map, simple_paths};
    use crate::algorithm::shortest_cost;
    use crate::common::Direction;
    use crate::map::Map;
    use crate::stat::Stats;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    fn search(map: &Map, turn_penalty: usize) -> (BestCost, Predecessors) {
        let outcome = shortest_cost(
            map,
            map.start,
            Direction::Right,
            map.end,
            turn_penalty,
            &mut Stats::default(),
        );
        (outcome.best_cost, outcome.predecessors)
    }

    #[test_case("map_file/test/reindeer-small.txt", 45 ; "small maze")]
    #[test_case("map_file/test/reindeer-large.txt", 64 ; "large maze")]
    fn test_reindeer_best_tiles(path: &str, expected: usize) {
        let map = Map::from_file(path).unwrap();
        let (best_cost, predecessors) = search(&map, 1000);
        let cells = all_optimal_cells(map.end, &best_cost, &predecessors);
        assert_eq!(cells.len(), expected);
        assert!(cells.contains(&map.start));
        assert!(cells.contains(&map.end));
    }

    #[test]
    fn test_open_grid_has_one_optimal_path() {
        let map: Map = "S...\n....\n....\n...E\n".parse().unwrap();
        let (best_cost, predecessors) = search(&map, 1000);
        let cells = all_optimal_cells(map.end, &best_cost, &predecessors);
        let expected = HashSet::from([(0, 0), (0, 1), (0, 2), (0, 3), (1, 3), (2, 3), (3, 3)]);
        assert_eq!(cells, expected);
        assert_eq!(count_optimal_paths(map.end, &best_cost, &predecessors), 1);
    }

    // Two mirrored routes around the centre wall tie exactly.
    #[test]
    fn test_tied_paths_are_both_collected() {
        let input = indoc::indoc! { "
            #####
            #...#
            #S#E#
            #...#
            #####
        " };
        let map: Map = input.parse().unwrap();
        let (best_cost, predecessors) = search(&map, 1000);
        let cells = all_optimal_cells(map.end, &best_cost, &predecessors);
        assert_eq!(cells.len(), 8);
        assert!(cells.contains(&(1, 2)));
        assert!(cells.contains(&(3, 2)));
        assert_eq!(count_optimal_paths(map.end, &best_cost, &predecessors), 2);
    }

    #[test]
    fn test_tie_at_end_across_facings() {
        // With no penalty both facings into E cost 2.
        let map: Map = "S.\n.E\n".parse().unwrap();
        let (best_cost, predecessors) = search(&map, 0);
        let cells = all_optimal_cells(map.end, &best_cost, &predecessors);
        assert_eq!(cells.len(), 4);
        assert_eq!(count_optimal_paths(map.end, &best_cost, &predecessors), 2);
    }

    #[test]
    fn test_unreachable_end_yields_nothing() {
        let map = Map::from_file("map_file/test/enclosed.txt").unwrap();
        let (best_cost, predecessors) = search(&map, 1000);
        assert!(all_optimal_cells(map.end, &best_cost, &predecessors).is_empty());
        assert!(construct_path(map.end, &best_cost, &predecessors).is_none());
        assert_eq!(count_optimal_paths(map.end, &best_cost, &predecessors), 0);
    }

    #[test]
    fn test_construct_path_is_optimal() {
        let map = Map::from_file("map_file/test/reindeer-large.txt").unwrap();
        let (best_cost, predecessors) = search(&map, 1000);
        let path = construct_path(map.end, &best_cost, &predecessors).unwrap();
        assert_eq!(path.steps.first().unwrap().position, map.start);
        assert_eq!(path.steps.last().unwrap().position, map.end);
        assert!(path.verify(&map));
        assert_eq!(path.cost(1000), 11048);
    }

    #[test]
    fn test_optimal_cells_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(11);
        for turn_penalty in [0, 2, 1000] {
            for _ in 0..30 {
                let map = random_map(&mut rng, 4, 4);
                let paths = simple_paths(&map, Direction::Right, turn_penalty);
                let (best_cost, predecessors) = search(&map, turn_penalty);

                let min_cost = paths.iter().map(|(cost, _)| *cost).min();
                let expected: HashSet<Cell> = paths
                    .iter()
                    .filter(|(cost, _)| Some(*cost) == min_cost)
                    .flat_map(|(_, cells)| cells.iter().copied())
                    .collect();
                assert_eq!(
                    all_optimal_cells(map.end, &best_cost, &predecessors),
                    expected,
                    "map:\n{map}"
                );
            }
        }
    }
}
