#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Frostmaul navigation engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! requesting obstacle placement or removal, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing every grid mutation and flow field recomputation. Systems
//! consume event streams, query the world through read-only accessors, and
//! respond exclusively with new command batches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Number of columns in the default match layout.
pub const DEFAULT_COLUMNS: u32 = 9;

/// Number of rows in the default match layout.
pub const DEFAULT_ROWS: u32 = 16;

/// Side length of a single cell in world units for the default layout.
pub const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that an obstacle be placed on the provided cell.
    PlaceObstacle {
        /// Cell the obstacle should occupy.
        cell: CellCoord,
    },
    /// Requests that the obstacle occupying the provided cell be removed.
    RemoveObstacle {
        /// Cell currently holding the obstacle.
        cell: CellCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Reports that a grid cell changed state.
    CellStateChanged {
        /// Cell whose state was written.
        cell: CellCoord,
        /// State held by the cell before the write.
        previous: CellState,
        /// State held by the cell after the write.
        state: CellState,
    },
    /// Announces that the distance and direction fields were rebuilt.
    FlowFieldUpdated {
        /// Monotonic counter identifying the rebuilt field.
        revision: u64,
    },
    /// Confirms that an obstacle was placed into the grid.
    ObstaclePlaced {
        /// Cell now occupied by the obstacle.
        cell: CellCoord,
    },
    /// Confirms that an obstacle was removed from the grid.
    ObstacleRemoved {
        /// Cell previously occupied by the obstacle.
        cell: CellCoord,
    },
    /// Reports that an obstacle placement request was rejected.
    PlacementRejected {
        /// Cell named by the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that an obstacle removal request was rejected.
    RemovalRejected {
        /// Cell named by the removal request.
        cell: CellCoord,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
///
/// Coordinates are signed so neighbor offsets and off-grid queries remain
/// representable; the grid decides which coordinates are in bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Returns the adjacent cell in the provided direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        let (column, row) = direction.offset();
        Self {
            column: self.column.saturating_add(column),
            row: self.row.saturating_add(row),
        }
    }

    /// Returns the four orthogonal neighbors in [`Direction::NEIGHBOR_ORDER`].
    #[must_use]
    pub fn neighbors(self) -> [(Direction, CellCoord); 4] {
        Direction::NEIGHBOR_ORDER.map(|direction| (direction, self.step(direction)))
    }
}

/// Occupancy state of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Free terrain that may receive an obstacle.
    #[default]
    Open,
    /// Terrain that can never be built on but remains walkable.
    ///
    /// Entry, exit, and designer-specified cells carry this state.
    Blocked,
    /// Cell holding a placed obstacle; the only state that stops traversal.
    Occupied,
}

impl CellState {
    /// Reports whether ground units may move through a cell in this state.
    #[must_use]
    pub const fn is_traversable(self) -> bool {
        !matches!(self, Self::Occupied)
    }
}

/// Cardinal movement directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing column indices.
    East,
    /// Movement toward decreasing column indices.
    West,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing row indices.
    North,
}

impl Direction {
    /// Fixed neighbor iteration order used by every grid traversal.
    ///
    /// Direction selection breaks ties in favour of the earlier entry, so
    /// this order determines which of several equally short routes units
    /// follow.
    pub const NEIGHBOR_ORDER: [Direction; 4] = [
        Direction::East,
        Direction::West,
        Direction::South,
        Direction::North,
    ];

    /// Column and row delta produced by stepping in this direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::South => (0, 1),
            Self::North => (0, -1),
        }
    }

    /// Unit vector pointing in this direction in world space.
    ///
    /// World space has its y axis pointing up while rows grow downward, so
    /// `South` maps to negative y.
    #[must_use]
    pub const fn unit_vector(self) -> Vec2 {
        match self {
            Self::East => Vec2::new(1.0, 0.0),
            Self::West => Vec2::new(-1.0, 0.0),
            Self::South => Vec2::new(0.0, -1.0),
            Self::North => Vec2::new(0.0, 1.0),
        }
    }
}

/// Reasons an obstacle placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell is the entry or the exit.
    ReservedCell,
    /// The requested cell already holds an obstacle.
    AlreadyOccupied,
    /// The requested cell is permanently blocked terrain.
    NotBuildable,
    /// Placing the obstacle would leave no route from entry to exit.
    WouldBlockPath,
}

/// Reasons an obstacle removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The requested cell lies outside the grid.
    OutOfBounds,
    /// The requested cell does not hold an obstacle.
    NoObstacle,
}

/// Match layout supplied once when the grid is created.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of columns in the grid.
    pub columns: u32,
    /// Number of rows in the grid.
    pub rows: u32,
    /// Side length of a single square cell in world units.
    pub cell_size: f32,
    /// World position of the grid's top-left corner.
    pub origin: [f32; 2],
    /// Cell where units enter the maze.
    pub entry: CellCoord,
    /// Cell units try to reach.
    pub exit: CellCoord,
    /// Designer-specified cells that can never be built on.
    pub blocked: Vec<CellCoord>,
}

impl GridConfig {
    /// Creates a layout whose entry and exit sit at the centre of the top and
    /// bottom rows respectively.
    #[must_use]
    pub fn centered(columns: u32, rows: u32) -> Self {
        let center = i32::try_from(columns / 2).unwrap_or(i32::MAX);
        let last_row = i32::try_from(rows.saturating_sub(1)).unwrap_or(i32::MAX);
        Self {
            columns,
            rows,
            cell_size: DEFAULT_CELL_SIZE,
            origin: [0.0, 0.0],
            entry: CellCoord::new(center, 0),
            exit: CellCoord::new(center, last_row),
            blocked: Vec::new(),
        }
    }

    /// World position of the grid's top-left corner as a vector.
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        Vec2::from_array(self.origin)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::centered(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

/// Describes how a unit traverses the maze.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mobility {
    /// Walks along the flow field around obstacles.
    #[default]
    Ground,
    /// Ignores the flow field and flies straight at the exit.
    Flying,
}

/// Unique identifier assigned to a moving unit by its owner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}
