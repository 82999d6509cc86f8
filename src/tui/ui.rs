use crate::core::config::Glyphs;
use crate::core::grid::{Cell, GridSnapshot};

/// Cursor home, then erase the whole screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";

pub const BANNER: &str =
    "Move the marker: [W,S,A,D] == [UP,DOWN,LEFT,RIGHT]  [R] reset  [Q] quit";

/// Gap between adjacent cells on a row.
pub const CELL_SEPARATOR: &str = "  ";

/// Lay out one complete frame. The caller writes it in a single call so the
/// terminal never shows a half-drawn grid.
pub fn render_frame(grid: &GridSnapshot, glyphs: &Glyphs, line_ending: &str) -> String {
    let row_width = grid.size() * (1 + CELL_SEPARATOR.len());
    let mut frame = String::with_capacity(
        CLEAR_SCREEN.len() + BANNER.len() + (grid.size() + 1) * (row_width + line_ending.len()),
    );

    frame.push_str(CLEAR_SCREEN);
    frame.push_str(BANNER);
    frame.push_str(line_ending);

    for row in grid.rows() {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                frame.push_str(CELL_SEPARATOR);
            }
            frame.push(match cell {
                Cell::Background => glyphs.background,
                Cell::Marker => glyphs.marker,
            });
        }
        frame.push_str(line_ending);
    }
    frame
}
