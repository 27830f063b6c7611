use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use crossterm::style::Stylize;

use column_customizer::columns::derive::project_rows;
use column_customizer::{ColumnCustomizer, DragState, Notice, NoticeLevel};

use crate::leads::{render_cell, Lead, LeadColumn};

pub fn display_leads(
    engine: &ColumnCustomizer<LeadColumn>,
    leads: &[Lead],
    show_row_numbers: bool,
    max_rows: usize,
    use_color: bool,
) {
    let columns = engine.visible_columns();
    let shown = &leads[..leads.len().min(max_rows)];

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut headers: Vec<Cell> = Vec::with_capacity(columns.len() + 1);
    if show_row_numbers {
        headers.push(header_cell("#", use_color));
    }
    headers.extend(columns.iter().map(|c| header_cell(&c.header, use_color)));
    table.set_header(headers);

    let rows = project_rows(&columns, shown, |lead, _, column| render_cell(lead, column));
    for (idx, cells) in rows.into_iter().enumerate() {
        let mut row: Vec<String> = Vec::with_capacity(cells.len() + 1);
        if show_row_numbers {
            row.push((idx + 1).to_string());
        }
        row.extend(cells);
        table.add_row(row);
    }

    println!("{table}");
    println!(
        "{} of {} leads, {} of {} columns",
        shown.len(),
        leads.len(),
        columns.len(),
        engine.catalog().len()
    );
}

/// The customization panel: every column with its visibility and position
pub fn display_panel(engine: &ColumnCustomizer<LeadColumn>, use_color: bool) {
    let visible = engine.visible_columns();

    let mut table = Table::new();
    table.set_header(
        ["Shown", "Pos", "Key", "Header"]
            .iter()
            .map(|h| header_cell(h, use_color))
            .collect::<Vec<_>>(),
    );

    for column in engine.catalog().columns() {
        let position = visible.iter().position(|c| c.key == column.key);
        table.add_row(vec![
            if position.is_some() { "[x]" } else { "[ ]" }.to_string(),
            position.map(|p| (p + 1).to_string()).unwrap_or_default(),
            column.key.to_string(),
            column.header.clone(),
        ]);
    }

    println!("{table}");

    if let DragState::Dragging(session) = engine.drag_state() {
        let hovered = session
            .hovered
            .map(|k| k.to_string())
            .unwrap_or_else(|| "nothing".to_string());
        println!("Dragging '{}' over {}", session.dragged, hovered);
    }
}

fn header_cell(text: &str, use_color: bool) -> Cell {
    let cell = Cell::new(text).add_attribute(Attribute::Bold);
    if use_color {
        cell.fg(Color::Cyan)
    } else {
        cell
    }
}

pub fn print_notice(notice: &Notice, use_color: bool) {
    let text = format!("[{}] {}", notice.level, notice.message);
    if !use_color {
        println!("{}", text);
        return;
    }
    match notice.level {
        NoticeLevel::Warning => println!("{}", text.yellow()),
        NoticeLevel::Confirmation => println!("{}", text.green()),
        NoticeLevel::Info => println!("{}", text.cyan()),
    }
}

/// Bold the characters of `text` at the given char positions
pub fn highlight_matches(text: &str, indices: &[usize], use_color: bool) -> String {
    if !use_color || indices.is_empty() {
        return text.to_string();
    }
    text.chars()
        .enumerate()
        .map(|(i, ch)| {
            if indices.contains(&i) {
                ch.to_string().yellow().bold().to_string()
            } else {
                ch.to_string()
            }
        })
        .collect()
}
