#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid and navigation state for Frostmaul.
//!
//! The world owns three pieces: the [`Grid`] store holding per-cell
//! occupancy, the [`FlowField`] derived from it, and the connectivity check
//! in [`is_placement_valid`]. Adapters and systems mutate the world only by
//! submitting commands to [`apply`], and read it only through [`query`].

mod grid;
mod navigation;
mod validator;

use frostmaul_core::{
    CellCoord, CellState, Command, Event, GridConfig, PlacementError, RemovalError,
};
use tracing::debug;

pub use grid::{Grid, GridConfigError};
pub use navigation::{FlowField, UNREACHABLE};
pub use validator::is_placement_valid;

/// Represents the authoritative Frostmaul world state for a single match.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    flow_field: FlowField,
}

impl World {
    /// Creates the world described by the layout and computes its initial
    /// flow field.
    ///
    /// The initial field is revision 0 and produces no
    /// [`Event::FlowFieldUpdated`]; the first notification a listener sees is
    /// revision 1, after the first accepted command.
    pub fn new(config: &GridConfig) -> Result<Self, GridConfigError> {
        let grid = Grid::new(config)?;
        let flow_field = FlowField::new(&grid);
        Ok(Self { grid, flow_field })
    }

    fn check_placement(&self, cell: CellCoord) -> Result<(), PlacementError> {
        if !self.grid.is_in_bounds(cell) {
            return Err(PlacementError::OutOfBounds);
        }

        if cell == self.grid.entry() || cell == self.grid.exit() {
            return Err(PlacementError::ReservedCell);
        }

        match self.grid.state(cell) {
            CellState::Occupied => return Err(PlacementError::AlreadyOccupied),
            CellState::Blocked => return Err(PlacementError::NotBuildable),
            CellState::Open => {}
        }

        if !is_placement_valid(&self.grid, cell) {
            return Err(PlacementError::WouldBlockPath);
        }

        Ok(())
    }

    fn check_removal(&self, cell: CellCoord) -> Result<(), RemovalError> {
        if !self.grid.is_in_bounds(cell) {
            return Err(RemovalError::OutOfBounds);
        }

        if self.grid.state(cell) != CellState::Occupied {
            return Err(RemovalError::NoObstacle);
        }

        Ok(())
    }

    fn commit(&mut self, cell: CellCoord, state: CellState, out_events: &mut Vec<Event>) {
        let mut changes = Vec::new();
        self.grid.set_state(cell, state, &mut changes);

        let mut updates = Vec::new();
        self.flow_field.handle(&changes, &self.grid, &mut updates);

        out_events.append(&mut changes);
        out_events.append(&mut updates);
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Rejected commands leave the grid untouched and are reported as events.
/// When a command changes occupancy the flow field is rebuilt before this
/// function returns, so every query issued afterwards observes the new field.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::PlaceObstacle { cell } => {
            if let Err(reason) = world.check_placement(cell) {
                debug!(?cell, ?reason, "obstacle placement rejected");
                out_events.push(Event::PlacementRejected { cell, reason });
                return;
            }

            world.commit(cell, CellState::Occupied, out_events);
            out_events.push(Event::ObstaclePlaced { cell });
        }
        Command::RemoveObstacle { cell } => {
            if let Err(reason) = world.check_removal(cell) {
                debug!(?cell, ?reason, "obstacle removal rejected");
                out_events.push(Event::RemovalRejected { cell, reason });
                return;
            }

            world.commit(cell, CellState::Open, out_events);
            out_events.push(Event::ObstacleRemoved { cell });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use frostmaul_core::{CellCoord, CellState, PlacementError};
    use glam::Vec2;

    use super::{FlowField, Grid, World};

    /// Provides read-only access to the grid store.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to the current flow field.
    #[must_use]
    pub fn flow_field(world: &World) -> &FlowField {
        &world.flow_field
    }

    /// State of the provided cell; anything off the grid reads as `Blocked`.
    #[must_use]
    pub fn state(world: &World, cell: CellCoord) -> CellState {
        world.grid.state(cell)
    }

    /// Reports whether the cell is in bounds and `Open`.
    #[must_use]
    pub fn is_buildable(world: &World, cell: CellCoord) -> bool {
        world.grid.is_buildable(cell)
    }

    /// Runs the connectivity check for a hypothetical obstacle on `cell`.
    ///
    /// The entry and exit must not be passed; use [`placement_error`] for a
    /// complete verdict on arbitrary cells.
    #[must_use]
    pub fn is_placement_valid(world: &World, cell: CellCoord) -> bool {
        super::is_placement_valid(&world.grid, cell)
    }

    /// Reason a placement on `cell` would be rejected right now, if any.
    #[must_use]
    pub fn placement_error(world: &World, cell: CellCoord) -> Option<PlacementError> {
        world.check_placement(cell).err()
    }

    /// Cell where units enter the maze.
    #[must_use]
    pub fn entry(world: &World) -> CellCoord {
        world.grid.entry()
    }

    /// Cell units try to reach.
    #[must_use]
    pub fn exit(world: &World) -> CellCoord {
        world.grid.exit()
    }

    /// World position of the exit cell's centre.
    #[must_use]
    pub fn exit_position(world: &World) -> Vec2 {
        world.grid.cell_to_world(world.grid.exit())
    }

    /// World position of the cell's centre.
    #[must_use]
    pub fn cell_to_world(world: &World, cell: CellCoord) -> Vec2 {
        world.grid.cell_to_world(cell)
    }

    /// Cell containing the world position, or `None` off the grid.
    #[must_use]
    pub fn world_to_cell(world: &World, position: Vec2) -> Option<CellCoord> {
        world.grid.world_to_cell(position)
    }

    /// Movement guidance for a ground unit standing at `position`.
    ///
    /// Returns [`Vec2::ZERO`] off the grid and wherever the field has no
    /// heading.
    #[must_use]
    pub fn direction_at(world: &World, position: Vec2) -> Vec2 {
        world
            .grid
            .world_to_cell(position)
            .map_or(Vec2::ZERO, |cell| world.flow_field.direction(cell))
    }

    /// Cells visited when following the field from the entry.
    #[must_use]
    pub fn trace_path(world: &World) -> Vec<CellCoord> {
        world.flow_field.trace_path()
    }

    /// Number of cells on the traced path, entry and exit included.
    #[must_use]
    pub fn path_length(world: &World) -> usize {
        world.flow_field.trace_path().len()
    }

    /// Cells currently holding obstacles in row-major order.
    #[must_use]
    pub fn occupied_cells(world: &World) -> Vec<CellCoord> {
        world.grid.occupied_cells().collect()
    }
}
