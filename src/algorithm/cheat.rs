use crate::common::Cell;
use crate::map::Map;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, instrument};

/// How a cheat's saving is compared against the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingRule {
    AtLeast,
    Exactly,
}

impl SavingRule {
    fn accepts(self, saving: usize, threshold: usize) -> bool {
        match self {
            SavingRule::AtLeast => saving >= threshold,
            SavingRule::Exactly => saving == threshold,
        }
    }
}

/// Step distance from `from` to every cell, ignoring facing. Unreachable cells
/// and walls hold `usize::MAX`.
pub fn distance_map(map: &Map, from: Cell) -> Vec<Vec<usize>> {
    let mut distances = vec![vec![usize::MAX; map.width]; map.height];
    let mut heap = BinaryHeap::new();

    distances[from.0][from.1] = 0;
    heap.push((Reverse(0), from));

    while let Some((Reverse(cost), (x, y))) = heap.pop() {
        if cost > distances[x][y] {
            continue;
        }

        for (_, (new_x, new_y)) in map.get_neighbors(x, y) {
            let next_cost = cost + 1;
            if next_cost < distances[new_x][new_y] {
                heap.push((Reverse(next_cost), (new_x, new_y)));
                distances[new_x][new_y] = next_cost;
            }
        }
    }

    distances
}

/// One shortest path to `end`, recovered from a [`distance_map`] by stepping
/// to a neighbour exactly one closer each time.
pub fn baseline_path(map: &Map, distances: &[Vec<usize>], end: Cell) -> Option<Vec<Cell>> {
    if distances[end.0][end.1] == usize::MAX {
        return None;
    }

    let mut path = vec![end];
    let mut current = end;
    while distances[current.0][current.1] > 0 {
        let remaining = distances[current.0][current.1];
        current = map
            .get_neighbors(current.0, current.1)
            .into_iter()
            .map(|(_, cell)| cell)
            .find(|&(x, y)| distances[x][y] == remaining - 1)?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

/// Counts `(cheat start, cheat end)` pairs that save enough steps.
///
/// Cheat starts are the cells of `path`; a cheat end is any reachable,
/// passable cell at Manhattan distance `1..=budget`, walls in between
/// ignored. The saving is the baseline distance gained minus the cheat's own
/// length.
#[instrument(skip_all, name = "count_cheats", fields(budget = budget, threshold = threshold, rule = ?rule), level = "debug")]
pub fn count_cheats(
    map: &Map,
    distances: &[Vec<usize>],
    path: &[Cell],
    budget: usize,
    threshold: usize,
    rule: SavingRule,
) -> usize {
    let count: usize = path
        .par_iter()
        .map(|&cheat_start| cheats_from(map, distances, cheat_start, budget, threshold, rule))
        .sum();
    debug!("{count} cheats from {} starts", path.len());
    count
}

fn cheats_from(
    map: &Map,
    distances: &[Vec<usize>],
    (x, y): Cell,
    budget: usize,
    threshold: usize,
    rule: SavingRule,
) -> usize {
    let start_distance = distances[x][y];
    let mut count = 0;

    for end_x in x.saturating_sub(budget)..=x.saturating_add(budget).min(map.height - 1) {
        let reach = budget - x.abs_diff(end_x);
        for end_y in y.saturating_sub(reach)..=y.saturating_add(reach).min(map.width - 1) {
            let cheat_length = x.abs_diff(end_x) + y.abs_diff(end_y);
            if cheat_length == 0 || !map.is_passable(end_x, end_y) {
                continue;
            }
            let end_distance = distances[end_x][end_y];
            if end_distance == usize::MAX {
                continue;
            }
            // Negative savings never pass a threshold.
            let Some(saving) = end_distance.checked_sub(start_distance + cheat_length) else {
                continue;
            };
            if rule.accepts(saving, threshold) {
                count += 1;
            }
        }
    }

    count
}
