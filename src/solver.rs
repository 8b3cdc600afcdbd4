mod maze;
mod race;

pub use maze::MazeSolver;
pub use race::RaceSolver;

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::common::Cell;
use crate::config::Config;

pub trait Solver {
    fn solve(&mut self, config: &Config) -> anyhow::Result<Report>;

    /// Cells worth highlighting once `solve` has run.
    fn highlighted(&self) -> &HashSet<Cell>;
}

/// Answers for one grid. A `None` cost means the end cannot be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "puzzle", rename_all = "snake_case")]
pub enum Report {
    Maze {
        cost: Option<usize>,
        optimal_cells: usize,
        optimal_paths: u64,
    },
    Race {
        baseline: Option<usize>,
        cheats: usize,
    },
}

struct Cost(Option<usize>);

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(cost) => write!(f, "{cost}"),
            None => f.write_str("unreachable"),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Maze {
                cost,
                optimal_cells,
                ..
            } => {
                writeln!(f, "{}", Cost(*cost))?;
                write!(f, "{optimal_cells}")
            }
            Report::Race { baseline, cheats } => {
                writeln!(f, "{}", Cost(*baseline))?;
                write!(f, "{cheats}")
            }
        }
    }
}
