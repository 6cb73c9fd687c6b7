//! Plain-text rendering of the maze and the traced path.

use std::collections::HashSet;

use frostmaul_core::{CellCoord, CellState};
use frostmaul_world::{query, World};

const ENTRY: char = 'S';
const EXIT: char = 'X';
const OBSTACLE: char = '#';
const TERRAIN: char = '%';
const PATH: char = '*';
const OPEN: char = '.';
const STRANDED: char = '~';

/// Renders one line per grid row, top row first.
pub(crate) fn render(world: &World) -> String {
    let grid = query::grid(world);
    let field = query::flow_field(world);
    let path: HashSet<CellCoord> = query::trace_path(world).into_iter().collect();
    let rows = i32::try_from(grid.rows()).unwrap_or(i32::MAX);
    let columns = i32::try_from(grid.columns()).unwrap_or(i32::MAX);

    let mut output = String::new();
    for row in 0..rows {
        for column in 0..columns {
            let cell = CellCoord::new(column, row);
            let glyph = if cell == grid.entry() {
                ENTRY
            } else if cell == grid.exit() {
                EXIT
            } else if path.contains(&cell) {
                PATH
            } else {
                match grid.state(cell) {
                    CellState::Occupied => OBSTACLE,
                    CellState::Blocked => TERRAIN,
                    CellState::Open if field.is_reachable(cell) => OPEN,
                    CellState::Open => STRANDED,
                }
            };
            output.push(glyph);
        }
        output.push('\n');
    }
    output
}
