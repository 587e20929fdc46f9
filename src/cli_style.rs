/*!
 * nodectl CLI Style System
 *
 * Colours, icons and table construction shared by every command.
 */

use crate::node::{TableData, Tone};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use console::{style, StyledObject};

// ============================================================================
// THEME COLORS
// ============================================================================

/// Brand colors for consistent styling
pub struct Theme;

impl Theme {
    /// Success color (green)
    pub fn success<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).green()
    }

    /// Error color (red)
    pub fn error<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).red()
    }

    /// Muted/secondary text (dim)
    pub fn muted<D: std::fmt::Display>(text: D) -> StyledObject<D> {
        style(text).dim()
    }
}

// ============================================================================
// ICONS
// ============================================================================

pub struct Icons;

impl Icons {
    pub const ERROR: &'static str = "✗";
    pub const ARROW_RIGHT: &'static str = "→";
}

// ============================================================================
// TABLES
// ============================================================================

/// Create a styled table with UTF-8 borders
pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Foreground colour for a cell tone; `None` keeps the terminal default
pub fn tone_color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Positive => Some(Color::Green),
        Tone::Negative => Some(Color::Red),
        Tone::Owned => Some(Color::Magenta),
        Tone::Shared => Some(Color::Yellow),
    }
}

/// Lay out projected node rows as a table.
///
/// With `color` off the table carries no styling at all, which keeps it
/// byte-for-byte predictable when piped or captured.
pub fn node_table(data: &TableData, color: bool) -> Table {
    let mut table = create_table();

    if !color {
        table.force_no_tty();
    }

    table.set_header(data.header.iter().map(|h| {
        let cell = Cell::new(h);
        if color {
            cell.fg(Color::Cyan).add_attribute(Attribute::Bold)
        } else {
            cell
        }
    }));

    for row in &data.rows {
        table.add_row(row.iter().map(|c| {
            let cell = Cell::new(&c.text);
            match tone_color(c.tone) {
                Some(fg) if color => cell.fg(fg),
                _ => cell,
            }
        }));
    }

    table
}

// ============================================================================
// TESTS
// ============================================================================
