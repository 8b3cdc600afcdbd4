use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::common::{Cell, Direction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Open,
    Wall,
    Start,
    End,
}

impl Terrain {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '.' => Some(Terrain::Open),
            '#' => Some(Terrain::Wall),
            'S' => Some(Terrain::Start),
            'E' => Some(Terrain::End),
            _ => None,
        }
    }

    fn as_char(self) -> char {
        match self {
            Terrain::Open => '.',
            Terrain::Wall => '#',
            Terrain::Start => 'S',
            Terrain::End => 'E',
        }
    }

    pub fn is_passable(self) -> bool {
        self != Terrain::Wall
    }
}

/// Rectangular maze with exactly one start and one end marker.
#[derive(Debug, Clone)]
pub struct Map {
    pub height: usize,
    pub width: usize,
    pub grid: Vec<Vec<Terrain>>,
    pub start: Cell,
    pub end: Cell,
}

impl Map {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read map file {path}"))?;
        content
            .parse()
            .with_context(|| format!("malformed map file {path}"))
    }

    pub fn terrain(&self, x: usize, y: usize) -> Terrain {
        self.grid[x][y]
    }

    pub fn is_passable(&self, x: usize, y: usize) -> bool {
        self.grid[x][y].is_passable()
    }

    /// Passable cells one step away, tagged with the direction of the move.
    pub fn get_neighbors(&self, x: usize, y: usize) -> Vec<(Direction, Cell)> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| {
                direction
                    .step((x, y), self.height, self.width)
                    .map(|cell| (direction, cell))
            })
            .filter(|&(_, (nx, ny))| self.is_passable(nx, ny))
            .collect()
    }

    /// Draws the grid with every cell of `marked` shown as `O`.
    pub fn render_marked(&self, marked: &HashSet<Cell>) -> String {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for (x, row) in self.grid.iter().enumerate() {
            for (y, terrain) in row.iter().enumerate() {
                if marked.contains(&(x, y)) && *terrain == Terrain::Open {
                    out.push('O');
                } else {
                    out.push(terrain.as_char());
                }
            }
            out.push('\n');
        }
        out
    }
}

impl FromStr for Map {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut grid: Vec<Vec<Terrain>> = Vec::new();
        let mut start = None;
        let mut end = None;

        for (x, line) in s.lines().map(|line| line.trim_end_matches('\r')).enumerate() {
            if line.is_empty() {
                // Only trailing blank lines are tolerated.
                if s.lines().skip(x).all(|rest| rest.trim().is_empty()) {
                    break;
                }
                bail!("line {}: empty row inside the grid", x + 1);
            }

            let mut row = Vec::with_capacity(line.len());
            for (y, ch) in line.chars().enumerate() {
                let terrain = Terrain::from_char(ch).with_context(|| {
                    format!("line {}, column {}: unexpected character {ch:?}", x + 1, y + 1)
                })?;
                let marker = match terrain {
                    Terrain::Start => Some((&mut start, "start")),
                    Terrain::End => Some((&mut end, "end")),
                    _ => None,
                };
                if let Some((slot, name)) = marker {
                    if slot.is_some() {
                        bail!("line {}, column {}: duplicate {name} marker", x + 1, y + 1);
                    }
                    *slot = Some((x, y));
                }
                row.push(terrain);
            }

            if let Some(first) = grid.first() {
                if first.len() != row.len() {
                    bail!(
                        "line {}: expected {} columns, found {}",
                        x + 1,
                        first.len(),
                        row.len()
                    );
                }
            }
            grid.push(row);
        }

        if grid.is_empty() {
            bail!("grid has no rows");
        }
        let start = start.context("grid has no start marker 'S'")?;
        let end = end.context("grid has no end marker 'E'")?;

        Ok(Map {
            height: grid.len(),
            width: grid[0].len(),
            grid,
            start,
            end,
        })
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_marked(&HashSet::new()))
    }
}
