//! Grid store that owns per-cell occupancy and the grid-to-world mapping.

use frostmaul_core::{CellCoord, CellState, Event, GridConfig};
use glam::Vec2;
use thiserror::Error;
use tracing::{debug, warn};

/// Reasons a [`GridConfig`] cannot be turned into a grid.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GridConfigError {
    /// One of the grid dimensions is zero.
    #[error("grid dimensions {columns}x{rows} must both be non-zero")]
    EmptyGrid {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The grid is too large for signed cell coordinates.
    #[error("grid dimensions {columns}x{rows} exceed the addressable range")]
    TooLarge {
        /// Requested column count.
        columns: u32,
        /// Requested row count.
        rows: u32,
    },
    /// The cell size is zero, negative, or not finite.
    #[error("cell size {0} must be a positive finite number")]
    InvalidCellSize(f32),
    /// The entry cell lies outside the grid.
    #[error("entry cell {0:?} lies outside the grid")]
    EntryOutOfBounds(CellCoord),
    /// The exit cell lies outside the grid.
    #[error("exit cell {0:?} lies outside the grid")]
    ExitOutOfBounds(CellCoord),
    /// The entry and exit were configured on the same cell.
    #[error("entry and exit share cell {0:?}")]
    EntryIsExit(CellCoord),
    /// A designer-blocked cell lies outside the grid.
    #[error("blocked cell {0:?} lies outside the grid")]
    BlockedOutOfBounds(CellCoord),
}

/// Dense table of cell states for a single match.
///
/// The grid is the only owner of occupancy state. Every write goes through
/// [`Grid::set_state`], which reports the change as an
/// [`Event::CellStateChanged`] so observers such as the flow field can react
/// before control returns to the caller.
#[derive(Clone, Debug)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cell_size: f32,
    origin: Vec2,
    entry: CellCoord,
    exit: CellCoord,
    cells: Vec<CellState>,
}

impl Grid {
    /// Allocates the grid described by `config`.
    ///
    /// All cells start `Open`; the entry, the exit, and every designer cell
    /// are then marked `Blocked`.
    pub fn new(config: &GridConfig) -> Result<Self, GridConfigError> {
        let GridConfig {
            columns,
            rows,
            cell_size,
            ..
        } = *config;

        if columns == 0 || rows == 0 {
            return Err(GridConfigError::EmptyGrid { columns, rows });
        }

        if i32::try_from(columns).is_err() || i32::try_from(rows).is_err() {
            return Err(GridConfigError::TooLarge { columns, rows });
        }
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows))
            .map_err(|_| GridConfigError::TooLarge { columns, rows })?;

        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GridConfigError::InvalidCellSize(cell_size));
        }

        let mut grid = Self {
            columns,
            rows,
            cell_size,
            origin: config.origin(),
            entry: config.entry,
            exit: config.exit,
            cells: vec![CellState::Open; cell_count],
        };

        if !grid.is_in_bounds(config.entry) {
            return Err(GridConfigError::EntryOutOfBounds(config.entry));
        }
        if !grid.is_in_bounds(config.exit) {
            return Err(GridConfigError::ExitOutOfBounds(config.exit));
        }
        if config.entry == config.exit {
            return Err(GridConfigError::EntryIsExit(config.entry));
        }
        if let Some(cell) = config.blocked.iter().find(|cell| !grid.is_in_bounds(**cell)) {
            return Err(GridConfigError::BlockedOutOfBounds(*cell));
        }

        let reserved = [config.entry, config.exit];
        for cell in reserved.iter().chain(config.blocked.iter()) {
            if let Some(index) = grid.index(*cell) {
                grid.cells[index] = CellState::Blocked;
            }
        }

        debug!(
            columns,
            rows,
            blocked = config.blocked.len(),
            "grid initialised"
        );
        Ok(grid)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a cell in world units.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// World position of the grid's top-left corner.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Cell where units enter the maze.
    #[must_use]
    pub fn entry(&self) -> CellCoord {
        self.entry
    }

    /// Cell units try to reach.
    #[must_use]
    pub fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Dense cell states stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    /// Reports whether the cell lies within the grid.
    #[must_use]
    pub fn is_in_bounds(&self, cell: CellCoord) -> bool {
        let column_ok = u32::try_from(cell.column()).map_or(false, |column| column < self.columns);
        let row_ok = u32::try_from(cell.row()).map_or(false, |row| row < self.rows);
        column_ok && row_ok
    }

    /// State of the provided cell; anything off the grid reads as `Blocked`.
    #[must_use]
    pub fn state(&self, cell: CellCoord) -> CellState {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(CellState::Blocked)
    }

    /// Reports whether an obstacle could be placed on the cell right now.
    ///
    /// This only inspects the cell itself. Whether the placement keeps the
    /// maze solvable is answered by the connectivity validator.
    #[must_use]
    pub fn is_buildable(&self, cell: CellCoord) -> bool {
        self.is_in_bounds(cell) && self.state(cell) == CellState::Open
    }

    /// Writes a new state into the cell and reports the change.
    ///
    /// Writes outside the grid are ignored. The entry and exit never accept
    /// `Occupied`.
    pub fn set_state(&mut self, cell: CellCoord, state: CellState, out_events: &mut Vec<Event>) {
        let Some(index) = self.index(cell) else {
            return;
        };

        if state == CellState::Occupied && (cell == self.entry || cell == self.exit) {
            warn!(?cell, "refusing to occupy the entry or exit cell");
            return;
        }

        let Some(slot) = self.cells.get_mut(index) else {
            return;
        };
        let previous = std::mem::replace(slot, state);
        out_events.push(Event::CellStateChanged {
            cell,
            previous,
            state,
        });
    }

    /// Iterator over every cell currently holding an obstacle.
    pub fn occupied_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, state)| **state == CellState::Occupied)
            .filter_map(|(index, _)| self.coord(index))
    }

    /// World position of the cell's centre.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        let half = self.cell_size * 0.5;
        Vec2::new(
            self.origin.x + cell.column() as f32 * self.cell_size + half,
            self.origin.y - cell.row() as f32 * self.cell_size - half,
        )
    }

    /// Cell containing the world position, or `None` when the position lies
    /// off the grid.
    #[must_use]
    pub fn world_to_cell(&self, position: Vec2) -> Option<CellCoord> {
        let column = ((position.x - self.origin.x) / self.cell_size).floor();
        let row = ((self.origin.y - position.y) / self.cell_size).floor();

        let inside = column >= 0.0
            && column < self.columns as f32
            && row >= 0.0
            && row < self.rows as f32;
        if !inside {
            return None;
        }

        let cell = CellCoord::new(column as i32, row as i32);
        self.is_in_bounds(cell).then_some(cell)
    }

    pub(crate) fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.is_in_bounds(cell) {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    pub(crate) fn coord(&self, index: usize) -> Option<CellCoord> {
        let width = usize::try_from(self.columns).ok()?;
        if width == 0 || index >= self.cells.len() {
            return None;
        }
        let column = i32::try_from(index % width).ok()?;
        let row = i32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }
}
