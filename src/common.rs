mod lowlevel;

pub(crate) use lowlevel::FrontierNode;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::map::Map;

/// Grid coordinate as `(row, column)`.
pub type Cell = (usize, usize);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// One step from `cell`, or `None` when it would leave a `height` x `width` grid.
    pub fn step(self, cell: Cell, height: usize, width: usize) -> Option<Cell> {
        let (dx, dy) = self.delta();
        let x = cell.0.checked_add_signed(dx)?;
        let y = cell.1.checked_add_signed(dy)?;
        (x < height && y < width).then_some((x, y))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// Unit of exploration: where we are and which way we are facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SearchState {
    pub position: Cell,
    pub direction: Direction,
}

impl SearchState {
    pub fn new(position: Cell, direction: Direction) -> Self {
        SearchState {
            position,
            direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub steps: Vec<SearchState>,
}

impl Path {
    /// Cost of walking the path: one per step plus `turn_penalty` for every
    /// change of facing between consecutive states.
    pub fn cost(&self, turn_penalty: usize) -> usize {
        self.steps
            .windows(2)
            .map(|pair| {
                if pair[0].direction == pair[1].direction {
                    1
                } else {
                    1 + turn_penalty
                }
            })
            .sum()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.steps.iter().map(|state| state.position)
    }

    /// Every state must sit on a passable cell, and each step must move one
    /// cell in the direction recorded on the state it enters.
    pub fn verify(&self, map: &Map) -> bool {
        if self
            .steps
            .iter()
            .any(|state| !map.is_passable(state.position.0, state.position.1))
        {
            return false;
        }

        self.steps.windows(2).all(|pair| {
            pair[1].direction.step(pair[0].position, map.height, map.width)
                == Some(pair[1].position)
        })
    }
}
