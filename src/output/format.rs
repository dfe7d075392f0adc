//! Cell styling for the two-column record views.

use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

/// Explanations are long; wrap them instead of producing one huge line.
const MAX_TABLE_WIDTH: u16 = 100;

/// Hands out colors only when color output is on.
#[derive(Debug, Clone, Copy)]
pub(super) struct Palette {
    enabled: bool,
}

impl Palette {
    pub(super) fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub(super) fn paint(self, color: Color) -> Option<Color> {
        self.enabled.then_some(color)
    }
}

pub(super) fn label_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

pub(super) fn value_cell(text: &str, color: Option<Color>, emphasized: bool) -> Cell {
    let mut cell = Cell::new(text);
    if let Some(color) = color {
        cell = cell.fg(color);
    }
    if emphasized {
        cell = cell.add_attribute(Attribute::Bold);
    }
    cell
}

/// `Field | <caption>` table that wraps at a fixed width.
pub(super) fn field_table(caption: &str, palette: Palette) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(MAX_TABLE_WIDTH)
        .set_header(vec![
            label_cell("Field"),
            value_cell(caption, palette.paint(Color::Cyan), true),
        ]);
    table
}
