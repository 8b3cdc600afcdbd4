use super::{Report, Solver};
use crate::algorithm::{baseline_path, count_cheats, distance_map};
use crate::common::Cell;
use crate::config::Config;
use crate::map::Map;
use crate::stat::Stats;

use std::collections::HashSet;
use std::time::Instant;
use tracing::info;

pub struct RaceSolver<'a> {
    map: &'a Map,
    stats: Stats,
    track: HashSet<Cell>,
}

impl<'a> RaceSolver<'a> {
    pub fn new(map: &'a Map) -> Self {
        RaceSolver {
            map,
            stats: Stats::default(),
            track: HashSet::new(),
        }
    }
}

impl Solver for RaceSolver<'_> {
    fn solve(&mut self, config: &Config) -> anyhow::Result<Report> {
        let total_solve_start_time = Instant::now();
        let map = self.map;
        self.stats = Stats::default();

        let distances = distance_map(map, map.start);
        let report = match baseline_path(map, &distances, map.end) {
            Some(path) => {
                let baseline = path.len() - 1;
                info!("baseline path takes {baseline} steps");

                let cheats = count_cheats(
                    map,
                    &distances,
                    &path,
                    config.cheat_budget,
                    config.cheat_threshold,
                    config.saving_rule,
                );
                self.stats.cheat_starts = path.len();
                self.stats.costs = Some(baseline);
                self.track = path.into_iter().collect();
                Report::Race {
                    baseline: Some(baseline),
                    cheats,
                }
            }
            None => {
                info!("end {:?} is unreachable from {:?}", map.end, map.start);
                self.track.clear();
                Report::Race {
                    baseline: None,
                    cheats: 0,
                }
            }
        };

        self.stats.time_us = total_solve_start_time.elapsed().as_micros();
        self.stats.print();
        Ok(report)
    }

    fn highlighted(&self) -> &HashSet<Cell> {
        &self.track
    }
}
