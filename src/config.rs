use anyhow::{ensure, Context};
use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::algorithm::SavingRule;
use crate::common::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Puzzle {
    /// Lowest score through the maze and the tiles on any best path.
    Maze,
    /// Shortcuts through the race track walls.
    Race,
}

#[derive(Parser, Debug)]
#[command(
    name = "Maze Search",
    about = "Turn-penalty maze search and race track cheat counting.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the grid file")]
    pub map_path: Option<String>,

    #[arg(long, value_enum, help = "Puzzle to solve")]
    pub puzzle: Option<Puzzle>,

    #[arg(long, help = "Extra cost for every change of facing")]
    pub turn_penalty: Option<usize>,

    #[arg(long, value_enum, help = "Facing at the start cell")]
    pub start_direction: Option<Direction>,

    #[arg(long, help = "Maximum cheat length, in steps")]
    pub cheat_budget: Option<usize>,

    #[arg(long, help = "Minimum steps a cheat must save")]
    pub cheat_threshold: Option<usize>,

    #[arg(
        long,
        help = "Count cheats saving exactly the threshold",
        default_value_t = false
    )]
    pub exact_saving: bool,

    #[arg(
        long,
        help = "Print the grid with the optimal cells marked",
        default_value_t = false
    )]
    pub render: bool,

    #[arg(long, help = "Write the report as JSON to this file")]
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub map_path: String,
    pub puzzle: Puzzle,
    pub turn_penalty: usize,
    pub start_direction: Direction,
    pub cheat_budget: usize,
    pub cheat_threshold: usize,
    pub saving_rule: SavingRule,
    pub render: bool,
    pub output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            map_path: "input.txt".to_string(),
            puzzle: Puzzle::Maze,
            turn_penalty: 1000,
            start_direction: Direction::Right,
            cheat_budget: 2,
            cheat_threshold: 100,
            saving_rule: SavingRule::AtLeast,
            render: false,
            output_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse YAML config")
    }

    /// Values given on the command line win over the file and the defaults.
    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(map_path) = &cli.map_path {
            self.map_path = map_path.clone();
        }
        if let Some(puzzle) = cli.puzzle {
            self.puzzle = puzzle;
        }
        if let Some(turn_penalty) = cli.turn_penalty {
            self.turn_penalty = turn_penalty;
        }
        if let Some(start_direction) = cli.start_direction {
            self.start_direction = start_direction;
        }
        if let Some(cheat_budget) = cli.cheat_budget {
            self.cheat_budget = cheat_budget;
        }
        if let Some(cheat_threshold) = cli.cheat_threshold {
            self.cheat_threshold = cheat_threshold;
        }
        if cli.exact_saving {
            self.saving_rule = SavingRule::Exactly;
        }
        if cli.render {
            self.render = true;
        }
        if let Some(output_path) = &cli.output_path {
            self.output_path = Some(output_path.clone());
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.map_path.is_empty(), "Map path must not be empty");
        if self.puzzle == Puzzle::Race {
            ensure!(
                self.cheat_budget > 0,
                "Cheat budget must be at least 1, got {}",
                self.cheat_budget
            );
        }
        Ok(())
    }
}
