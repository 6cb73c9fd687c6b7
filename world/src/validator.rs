//! Connectivity check that guards obstacle placement.

use std::collections::VecDeque;

use frostmaul_core::CellCoord;

use crate::Grid;

/// Reports whether an obstacle on `candidate` would still leave a route from
/// the entry to the exit.
///
/// Runs a breadth-first search from the exit in which obstacles and the
/// candidate cell are impassable. The grid is never modified and nothing is
/// cached between calls, so repeated checks against the same grid agree.
///
/// Callers must not pass the entry or exit cell; those are never offered as
/// placement targets.
#[must_use]
pub fn is_placement_valid(grid: &Grid, candidate: CellCoord) -> bool {
    let exit = grid.exit();
    let entry = grid.entry();
    let Some(exit_index) = grid.index(exit) else {
        return false;
    };

    let mut visited = vec![false; grid.cell_count()];
    let mut queue = VecDeque::new();
    visited[exit_index] = true;
    queue.push_back(exit);

    while let Some(cell) = queue.pop_front() {
        if cell == entry {
            return true;
        }

        for (_, neighbor) in cell.neighbors() {
            let Some(index) = grid.index(neighbor) else {
                continue;
            };

            if visited[index] || neighbor == candidate {
                continue;
            }

            if !grid.state(neighbor).is_traversable() {
                continue;
            }

            visited[index] = true;
            queue.push_back(neighbor);
        }
    }

    false
}
