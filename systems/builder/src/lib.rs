#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system responsible for emitting obstacle placement and removal commands.
//!
//! Placement takes two taps: the first selects a buildable cell and the
//! second, on the same cell, requests the obstacle. The system never decides
//! whether a placement keeps the maze solvable; it forwards the request and
//! lets the world accept or reject it.

use frostmaul_core::{CellCoord, CellState, Command, Event};

/// Pointer interaction resolved against the grid by the adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tap {
    /// The pointer landed on the provided cell.
    Cell(CellCoord),
    /// The pointer landed outside the grid.
    OffGrid,
}

impl Tap {
    /// Builds a tap from the result of a world-to-cell conversion.
    #[must_use]
    pub const fn from_cell(cell: Option<CellCoord>) -> Self {
        match cell {
            Some(cell) => Self::Cell(cell),
            None => Self::OffGrid,
        }
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuilderInput {
    /// Pointer tap registered on this frame, if any.
    pub tap: Option<Tap>,
    /// Indicates whether the player confirmed the current selection.
    pub confirm_action: bool,
    /// Indicates whether the player dismissed the current selection.
    pub cancel_action: bool,
    /// Cell whose obstacle the player asked to remove on this frame.
    pub remove_cell: Option<CellCoord>,
}

/// Builder system that translates taps into placement and removal commands.
#[derive(Clone, Debug, Default)]
pub struct Builder {
    selection: Option<CellCoord>,
    inspected: Option<CellCoord>,
}

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selection: None,
            inspected: None,
        }
    }

    /// Cell currently selected for placement.
    #[must_use]
    pub const fn selection(&self) -> Option<CellCoord> {
        self.selection
    }

    /// Obstacle cell most recently tapped, used to offer removal.
    #[must_use]
    pub const fn inspected(&self) -> Option<CellCoord> {
        self.inspected
    }

    /// Consumes world events and adapter-derived input to emit builder commands.
    ///
    /// The `state_at` closure should mirror the world's `query::state`
    /// helper so the system can tell buildable cells from obstacles.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: BuilderInput,
        state_at: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(CellCoord) -> CellState,
    {
        for event in events {
            match *event {
                Event::ObstaclePlaced { cell } if self.selection == Some(cell) => {
                    self.selection = None;
                }
                Event::ObstacleRemoved { cell } if self.inspected == Some(cell) => {
                    self.inspected = None;
                }
                _ => {}
            }
        }

        if input.cancel_action {
            self.selection = None;
        }

        match input.tap {
            Some(Tap::Cell(cell)) => self.tap_cell(cell, &state_at, out),
            Some(Tap::OffGrid) => {
                self.selection = None;
                self.inspected = None;
            }
            None => {}
        }

        if input.confirm_action {
            if let Some(cell) = self.selection {
                out.push(Command::PlaceObstacle { cell });
            }
        }

        if let Some(cell) = input.remove_cell {
            out.push(Command::RemoveObstacle { cell });
        }
    }

    fn tap_cell<F>(&mut self, cell: CellCoord, state_at: &F, out: &mut Vec<Command>)
    where
        F: Fn(CellCoord) -> CellState,
    {
        if self.selection == Some(cell) {
            out.push(Command::PlaceObstacle { cell });
            return;
        }

        match state_at(cell) {
            CellState::Open => {
                self.selection = Some(cell);
                self.inspected = None;
            }
            CellState::Occupied => {
                self.selection = None;
                self.inspected = Some(cell);
            }
            CellState::Blocked => {
                self.selection = None;
            }
        }
    }
}
