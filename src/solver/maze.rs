use super::{Report, Solver};
use crate::algorithm::{all_optimal_cells, construct_path, count_optimal_paths, shortest_cost};
use crate::common::Cell;
use crate::config::Config;
use crate::map::Map;
use crate::stat::Stats;

use anyhow::{ensure, Context};
use std::collections::HashSet;
use std::time::Instant;
use tracing::{debug, info};

pub struct MazeSolver<'a> {
    map: &'a Map,
    stats: Stats,
    optimal_cells: HashSet<Cell>,
}

impl<'a> MazeSolver<'a> {
    pub fn new(map: &'a Map) -> Self {
        MazeSolver {
            map,
            stats: Stats::default(),
            optimal_cells: HashSet::new(),
        }
    }
}

// Upper bound on any state's cost: every state entered once, each entry
// paying a step and a turn.
fn max_search_cost(map: &Map, turn_penalty: usize) -> Option<usize> {
    map.height
        .checked_mul(map.width)?
        .checked_mul(4)?
        .checked_mul(turn_penalty.checked_add(1)?)
}

impl Solver for MazeSolver<'_> {
    fn solve(&mut self, config: &Config) -> anyhow::Result<Report> {
        let total_solve_start_time = Instant::now();
        let map = self.map;
        self.stats = Stats::default();
        ensure!(
            max_search_cost(map, config.turn_penalty).is_some(),
            "turn penalty {} is too large for a {}x{} map",
            config.turn_penalty,
            map.height,
            map.width
        );

        let outcome = shortest_cost(
            map,
            map.start,
            config.start_direction,
            map.end,
            config.turn_penalty,
            &mut self.stats,
        );

        let report = match outcome.cost {
            Some(cost) => {
                // Sanity check one concrete route against the reported cost.
                let path = construct_path(map.end, &outcome.best_cost, &outcome.predecessors)
                    .context("end reached but no predecessor chain leads to it")?;
                ensure!(
                    path.verify(map) && path.cost(config.turn_penalty) == cost,
                    "reconstructed path does not achieve cost {cost}"
                );
                debug!("one optimal path: {:?}", path.cells().collect::<Vec<_>>());

                self.optimal_cells =
                    all_optimal_cells(map.end, &outcome.best_cost, &outcome.predecessors);
                Report::Maze {
                    cost: Some(cost),
                    optimal_cells: self.optimal_cells.len(),
                    optimal_paths: count_optimal_paths(
                        map.end,
                        &outcome.best_cost,
                        &outcome.predecessors,
                    ),
                }
            }
            None => {
                info!("end {:?} is unreachable from {:?}", map.end, map.start);
                self.optimal_cells.clear();
                Report::Maze {
                    cost: None,
                    optimal_cells: 0,
                    optimal_paths: 0,
                }
            }
        };

        self.stats.time_us = total_solve_start_time.elapsed().as_micros();
        self.stats.costs = outcome.cost;
        self.stats.print();
        Ok(report)
    }

    fn highlighted(&self) -> &HashSet<Cell> {
        &self.optimal_cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Direction;
    use crate::config::Cli;

    use clap::Parser;

    #[test]
    fn test_maze_solver_small() {
        let map = Map::from_file("map_file/test/reindeer-small.txt").unwrap();
        let mut solver = MazeSolver::new(&map);
        let report = solver.solve(&Config::default()).unwrap();
        assert_eq!(
            report,
            Report::Maze {
                cost: Some(7036),
                optimal_cells: 45,
                optimal_paths: 3,
            }
        );
        assert_eq!(solver.highlighted().len(), 45);
    }

    #[test]
    fn test_maze_solver_large() {
        let map = Map::from_file("map_file/test/reindeer-large.txt").unwrap();
        let report = MazeSolver::new(&map).solve(&Config::default()).unwrap();
        assert_eq!(
            report,
            Report::Maze {
                cost: Some(11048),
                optimal_cells: 64,
                optimal_paths: 2,
            }
        );
    }

    #[test]
    fn test_maze_solver_unreachable() {
        let map = Map::from_file("map_file/test/enclosed.txt").unwrap();
        let mut solver = MazeSolver::new(&map);
        let report = solver.solve(&Config::default()).unwrap();
        assert_eq!(
            report,
            Report::Maze {
                cost: None,
                optimal_cells: 0,
                optimal_paths: 0,
            }
        );
        assert!(solver.highlighted().is_empty());
    }

    #[test]
    fn test_maze_solver_start_direction() {
        // Facing down, the open grid is solved by going down first.
        let map: Map = "S...\n....\n....\n...E\n".parse().unwrap();
        let config = Config {
            start_direction: Direction::Down,
            ..Config::default()
        };
        let mut solver = MazeSolver::new(&map);
        let report = solver.solve(&config).unwrap();
        assert_eq!(
            report,
            Report::Maze {
                cost: Some(1006),
                optimal_cells: 7,
                optimal_paths: 1,
            }
        );
        assert!(solver.highlighted().contains(&(3, 0)));
    }

    #[test]
    fn test_maze_solver_rejects_overflowing_penalty() {
        let map = Map::from_file("map_file/test/reindeer-small.txt").unwrap();
        let cli = Cli::parse_from(["maze_search", "--turn-penalty", "18446744073709551615"]);
        let config = Config::default().override_from_command_line(&cli).unwrap();
        assert_eq!(config.turn_penalty, usize::MAX);
        assert!(MazeSolver::new(&map).solve(&config).is_err());
    }

    #[test]
    fn test_maze_solver_largest_penalty() {
        // 15x15 map: 900 states, so this is the largest penalty that fits.
        let map = Map::from_file("map_file/test/reindeer-small.txt").unwrap();
        let turn_penalty = usize::MAX / 900 - 1;
        let config = Config {
            turn_penalty,
            ..Config::default()
        };
        let report = MazeSolver::new(&map).solve(&config).unwrap();
        assert_eq!(
            report,
            Report::Maze {
                cost: Some(36 + 7 * turn_penalty),
                optimal_cells: 45,
                optimal_paths: 3,
            }
        );
    }

    #[test]
    fn test_maze_solver_stats_reset_between_solves() {
        let map = Map::from_file("map_file/test/reindeer-small.txt").unwrap();
        let mut solver = MazeSolver::new(&map);
        solver.solve(&Config::default()).unwrap();
        let first = solver.stats.clone();
        solver.solve(&Config::default()).unwrap();

        assert_eq!(solver.stats.expanded_states, first.expanded_states);
        assert_eq!(solver.stats.stale_pops, first.stale_pops);
        assert_eq!(solver.stats.improvements, first.improvements);
        assert_eq!(solver.stats.tie_merges, first.tie_merges);
        assert_eq!(solver.stats.costs, Some(7036));
    }
}
