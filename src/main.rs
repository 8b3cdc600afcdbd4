use maze_search::config::{Cli, Config, Puzzle};
use maze_search::map::Map;
use maze_search::solver::{MazeSolver, RaceSolver, Solver};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        let config_str = std::fs::read_to_string(config_file)
            .with_context(|| format!("failed to read config file: {config_file}"))?;
        Config::from_yaml_str(&config_str)
            .with_context(|| format!("error with config file: {config_file}"))?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let map = Map::from_file(&config.map_path)?;
    info!(
        "Loaded {}x{} map, start {:?}, end {:?}",
        map.height, map.width, map.start, map.end
    );

    let mut solver: Box<dyn Solver + '_> = match config.puzzle {
        Puzzle::Maze => Box::new(MazeSolver::new(&map)),
        Puzzle::Race => Box::new(RaceSolver::new(&map)),
    };
    let report = solver.solve(&config)?;

    if config.render {
        print!("{}", map.render_marked(solver.highlighted()));
    }
    println!("{report}");

    if let Some(output_path) = &config.output_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(output_path, json)
            .with_context(|| format!("failed to write report to {output_path}"))?;
        info!("Report written to {output_path}");
    }

    Ok(())
}
