//! Flow field that guides every ground unit from the entry to the exit.

use std::collections::VecDeque;

use frostmaul_core::{CellCoord, CellState, Direction, Event};
use glam::Vec2;
use tracing::debug;

use crate::Grid;

/// Distance recorded for cells that cannot reach the exit.
pub const UNREACHABLE: u32 = u32::MAX;

/// Dense hop-count and heading tables seeded from the exit cell.
///
/// Distances come from a breadth-first search that starts at the exit and
/// expands through every cell that does not hold an obstacle. Designer-blocked
/// cells, the entry, and the exit are walkable and therefore carry distances.
/// Each reachable cell then points at the neighbor with the strictly smallest
/// distance, scanning neighbors in [`Direction::NEIGHBOR_ORDER`] so that ties
/// resolve identically for identical grids.
///
/// Both tables are rebuilt wholesale whenever occupancy changes; they are
/// never patched in place.
#[derive(Clone, Debug)]
pub struct FlowField {
    columns: u32,
    rows: u32,
    entry: CellCoord,
    exit: CellCoord,
    distances: Vec<u32>,
    headings: Vec<Option<Direction>>,
    revision: u64,
}

impl FlowField {
    /// Computes the initial field for the provided grid.
    #[must_use]
    pub fn new(grid: &Grid) -> Self {
        let mut field = Self {
            columns: grid.columns(),
            rows: grid.rows(),
            entry: grid.entry(),
            exit: grid.exit(),
            distances: Vec::new(),
            headings: Vec::new(),
            revision: 0,
        };
        field.compute(grid);
        field
    }

    /// Reacts to grid change notifications, rebuilding the field when an
    /// obstacle was placed or removed.
    ///
    /// Changes that only toggle `Open` and `Blocked` leave traversal untouched
    /// and are ignored. A rebuild is announced through
    /// [`Event::FlowFieldUpdated`].
    pub fn handle(&mut self, events: &[Event], grid: &Grid, out_events: &mut Vec<Event>) {
        let occupancy_changed = events.iter().any(|event| {
            matches!(
                event,
                Event::CellStateChanged { previous, state, .. }
                    if *previous == CellState::Occupied || *state == CellState::Occupied
            )
        });

        if !occupancy_changed {
            return;
        }

        self.rebuild(grid);
        out_events.push(Event::FlowFieldUpdated {
            revision: self.revision,
        });
    }

    /// Recomputes distances and headings from scratch.
    pub fn rebuild(&mut self, grid: &Grid) {
        self.compute(grid);
        self.revision = self.revision.saturating_add(1);
    }

    /// Counter incremented on every rebuild after construction.
    ///
    /// The field computed by [`FlowField::new`] carries revision 0 and is
    /// never announced; only rebuilds emit [`Event::FlowFieldUpdated`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Dense distances stored in row-major order, [`UNREACHABLE`] marking
    /// cells cut off from the exit.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.distances
    }

    /// Hop count from the cell to the exit.
    ///
    /// Returns `None` for cells outside the field and for cells that cannot
    /// reach the exit.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.distances.get(index).copied())
            .filter(|distance| *distance != UNREACHABLE)
    }

    /// Reports whether the exit can be reached from the cell.
    #[must_use]
    pub fn is_reachable(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Cardinal step that brings a unit on the cell closer to the exit.
    #[must_use]
    pub fn heading(&self, cell: CellCoord) -> Option<Direction> {
        self.index(cell)
            .and_then(|index| self.headings.get(index).copied())
            .flatten()
    }

    /// Unit movement vector for the cell in world space.
    ///
    /// Returns [`Vec2::ZERO`] when the cell offers no guidance: off the grid,
    /// unreachable, occupied, or the exit itself.
    #[must_use]
    pub fn direction(&self, cell: CellCoord) -> Vec2 {
        self.heading(cell).map_or(Vec2::ZERO, Direction::unit_vector)
    }

    /// Walks the headings from the entry toward the exit.
    ///
    /// The walk stops at the exit, at the first cell without a heading, or
    /// after one step per grid cell, and returns whatever was visited so far.
    /// Each call starts over from the entry.
    #[must_use]
    pub fn trace_path(&self) -> Vec<CellCoord> {
        let budget = self.distances.len();
        let mut path = Vec::new();
        let mut current = self.entry;

        for _ in 0..budget {
            path.push(current);
            if current == self.exit {
                break;
            }

            let Some(direction) = self.heading(current) else {
                break;
            };
            current = current.step(direction);
        }

        path
    }

    fn compute(&mut self, grid: &Grid) {
        let cell_count = grid.cell_count();
        self.columns = grid.columns();
        self.rows = grid.rows();
        self.entry = grid.entry();
        self.exit = grid.exit();

        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
            self.headings = vec![None; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
            self.headings.fill(None);
        }

        self.integrate(grid);
        self.orient(grid);

        debug!(
            revision = self.revision,
            reachable = self
                .distances
                .iter()
                .filter(|distance| **distance != UNREACHABLE)
                .count(),
            "flow field computed"
        );
    }

    fn integrate(&mut self, grid: &Grid) {
        let Some(exit_index) = grid.index(self.exit) else {
            return;
        };

        self.distances[exit_index] = 0;
        let mut queue = VecDeque::with_capacity(self.distances.len());
        queue.push_back(self.exit);

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = grid.index(cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for (_, neighbor) in cell.neighbors() {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }

                if !grid.state(neighbor).is_traversable() {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    fn orient(&mut self, grid: &Grid) {
        for index in 0..self.distances.len() {
            let own_distance = self.distances[index];
            let Some(cell) = grid.coord(index) else {
                continue;
            };

            if own_distance == UNREACHABLE || !grid.state(cell).is_traversable() {
                continue;
            }

            let mut best: Option<Direction> = None;
            let mut best_distance = own_distance;

            for (direction, neighbor) in cell.neighbors() {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };

                let distance = self.distances[neighbor_index];
                if distance < best_distance {
                    best_distance = distance;
                    best = Some(direction);
                }
            }

            self.headings[index] = best;
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.column()).ok()?;
        let row = u32::try_from(cell.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }

        let width = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(column).ok()?;
        let row = usize::try_from(row).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
