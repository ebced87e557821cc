//! Format picker rows and selections as text.

use crate::selection::CheckState;
use crate::tree::Node;
use crate::visible::VisibleRow;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str, color: bool) -> String {
    if color {
        format!("{}", title.bold().underline())
    } else {
        title.to_string()
    }
}

/// One line per row: focus marker, indentation, disclosure arrow, checkbox, label.
pub fn format_rows_text(rows: &[VisibleRow], color: bool) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = if row.focused { ">" } else { " " };
        let arrow = match (row.node.has_children, row.expanded) {
            (true, true) => "▾",
            (true, false) => "▸",
            (false, _) => " ",
        };
        let checkbox = if row.enabled {
            row.state.glyph().to_string()
        } else {
            format!("({})", &row.state.glyph()[1..2])
        };
        let label = if color && row.focused {
            format!("{}", row.node.label.reversed())
        } else if color && row.state == CheckState::Checked {
            format!("{}", row.node.label.green())
        } else {
            row.node.label.clone()
        };
        out.push_str(&format!(
            "{} {}{} {} {}\n",
            marker,
            "  ".repeat(row.depth),
            arrow,
            checkbox,
            label
        ));
    }
    if rows.is_empty() {
        out.push_str("  (nothing to show)\n");
    }
    out
}

/// Table of checked leaves, or a note when nothing is checked.
pub fn format_checked_table(checked: &[Node]) -> String {
    if checked.is_empty() {
        return "No items checked\n".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Id", "Label"]);
    for node in checked {
        table.add_row(vec![node.id.clone(), node.label.clone()]);
    }
    format!("{}\n", table)
}
