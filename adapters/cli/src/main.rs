#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that inspects Frostmaul maze layouts.

mod layout_transfer;
mod map;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use frostmaul_core::{CellCoord, Command, Event, GridConfig, Mobility, UnitId};
use frostmaul_system_movement::{Movement, Walker};
use frostmaul_world::{self as world, query, World};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::layout_transfer::LayoutSnapshot;

const SIMULATION_TICK: Duration = Duration::from_millis(100);
const DEFAULT_LOG_FILTER: &str = "warn,frostmaul=info";

/// Inspect a maze layout: place and remove obstacles, then print the route
/// ground units will take from the entry to the exit.
#[derive(Debug, Parser)]
#[command(name = "frostmaul", version)]
struct CliArgs {
    /// TOML file describing the grid dimensions, entry, exit and blocked cells.
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,
    /// Layout string produced by `--export` whose obstacles are placed first.
    #[arg(long, value_name = "STRING")]
    import: Option<String>,
    /// Places an obstacle on the cell. May be repeated.
    #[arg(long = "place", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    placements: Vec<CellCoord>,
    /// Removes the obstacle on the cell after all placements. May be repeated.
    #[arg(long = "remove", value_name = "COLUMN,ROW", value_parser = parse_cell)]
    removals: Vec<CellCoord>,
    /// Sends a ground unit and a flier from the entry and reports their travel time.
    #[arg(long)]
    simulate: bool,
    /// Prints a layout string capturing the resulting obstacles.
    #[arg(long)]
    export: bool,
}

/// Entry point for the Frostmaul command-line interface.
fn main() -> Result<()> {
    init_logging();
    let args = CliArgs::parse();

    let config = load_config(args.layout.as_deref())?;
    let mut world = World::new(&config).context("invalid grid layout")?;

    let mut commands = Vec::new();
    if let Some(encoded) = args.import.as_deref() {
        let snapshot = LayoutSnapshot::decode(encoded).context("failed to import layout")?;
        ensure!(
            snapshot.columns == config.columns && snapshot.rows == config.rows,
            "imported layout is {}x{} but the grid is {}x{}",
            snapshot.columns,
            snapshot.rows,
            config.columns,
            config.rows
        );
        commands.extend(
            snapshot
                .obstacles
                .into_iter()
                .map(|cell| Command::PlaceObstacle { cell }),
        );
    }
    commands.extend(
        args.placements
            .iter()
            .map(|cell| Command::PlaceObstacle { cell: *cell }),
    );
    commands.extend(
        args.removals
            .iter()
            .map(|cell| Command::RemoveObstacle { cell: *cell }),
    );

    let mut events = Vec::new();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    report(&events);

    print!("{}", map::render(&world));
    println!("Path: {} tiles", query::path_length(&world));

    if args.simulate {
        simulate(&world);
    }

    if args.export {
        let encoded = LayoutSnapshot::capture(&world)
            .encode()
            .context("failed to export layout")?;
        println!("{encoded}");
    }

    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<GridConfig> {
    let Some(path) = path else {
        info!("no layout file given, using the default grid");
        return Ok(GridConfig::default());
    };

    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout file {}", path.display()))?;
    let config: GridConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse layout file {}", path.display()))?;
    info!(
        columns = config.columns,
        rows = config.rows,
        blocked = config.blocked.len(),
        "loaded layout from {}",
        path.display()
    );
    Ok(config)
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::ObstaclePlaced { cell } => info!(?cell, "obstacle placed"),
            Event::ObstacleRemoved { cell } => info!(?cell, "obstacle removed"),
            Event::PlacementRejected { cell, reason } => {
                warn!(?cell, ?reason, "placement rejected");
            }
            Event::RemovalRejected { cell, reason } => {
                warn!(?cell, ?reason, "removal rejected");
            }
            Event::CellStateChanged { .. } | Event::FlowFieldUpdated { .. } => {}
        }
    }
}

fn simulate(world: &World) {
    let movement = Movement::default();
    let grid = query::grid(world);
    let start = query::cell_to_world(world, query::entry(world));
    let speed = grid.cell_size();
    let mut walkers = vec![
        Walker::new(UnitId::new(0), start, speed, Mobility::Ground),
        Walker::new(UnitId::new(1), start, speed, Mobility::Flying),
    ];
    let tick_budget = grid.cell_count().saturating_mul(20);
    let mut arrived = Vec::new();

    for tick in 1..=tick_budget {
        movement.advance(world, SIMULATION_TICK, &mut walkers, &mut arrived);
        for id in arrived.drain(..) {
            let elapsed = SIMULATION_TICK.as_secs_f32() * tick as f32;
            if let Some(walker) = walkers.iter().find(|walker| walker.id == id) {
                println!(
                    "{} reached the exit after {elapsed:.1}s",
                    unit_label(walker.mobility)
                );
            }
            walkers.retain(|walker| walker.id != id);
        }
        if walkers.is_empty() {
            return;
        }
    }

    for walker in &walkers {
        println!("{} never reached the exit", unit_label(walker.mobility));
    }
}

fn unit_label(mobility: Mobility) -> &'static str {
    match mobility {
        Mobility::Ground => "ground unit",
        Mobility::Flying => "flier",
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but got '{value}'"))?;
    let column = column
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid column '{column}': {error}"))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|error| format!("invalid row '{row}': {error}"))?;
    Ok(CellCoord::new(column, row))
}
