use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::helpers::{clamp_name, window_start};
use super::theme::Theme;
use crate::section::DataSection;

/// Renders one data section as aligned columns. `max_rows` bounds the number
/// of record lines so the cursor row always stays in view.
pub fn build_table_text(section: &DataSection, max_rows: usize) -> Text<'_> {
    let mut lines = Vec::new();

    let mode = if section.is_edit_mode() {
        Span::styled(
            " EDIT ",
            Style::default()
                .fg(Theme::warn())
                .add_modifier(Modifier::BOLD | Modifier::REVERSED),
        )
    } else {
        Span::styled(" VIEW ", Style::default().fg(Theme::dim()))
    };
    let mut status = vec![
        mode,
        Span::raw(" "),
        Span::styled(
            format!("{} of {} rows", section.visible_len(), section.rows().len()),
            Style::default().fg(Theme::accent()),
        ),
    ];
    if !section.filters().is_empty() {
        let filters = section
            .filters()
            .iter()
            .map(|(label, value)| format!("{label}~{value}"))
            .collect::<Vec<_>>()
            .join(", ");
        status.push(Span::styled(
            format!("  Filtered: {filters}"),
            Style::default().fg(Theme::warn()),
        ));
    }
    lines.push(Line::from(status));
    lines.push(Line::from(""));

    let columns = section.columns();
    let mut header = vec![Span::raw("    ")];
    for column in columns {
        header.push(Span::styled(
            format!("{} ", clamp_name(column.label, column.width as usize)),
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ));
    }
    lines.push(Line::from(header));

    if section.visible_len() == 0 {
        let message = if section.filters().is_empty() {
            "No records. Press 'n' to add one."
        } else {
            "No records match the filter. Press 'c' to clear it."
        };
        lines.push(Line::from(Span::styled(
            format!("  {message}"),
            Style::default().fg(Theme::dim()),
        )));
        return Text::from(lines);
    }

    let start = window_start(section.selected_row, section.visible_len(), max_rows);
    let active_edit = section.active_edit();
    for (index, row) in section
        .visible_rows()
        .enumerate()
        .skip(start)
        .take(max_rows.max(1))
    {
        let selected = index == section.selected_row;
        let marked = section.is_marked(&row.id);
        let marker_style = if selected {
            Style::default()
                .fg(Theme::selection_marker())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        let mut spans = vec![
            Span::styled(if selected { "> " } else { "  " }, marker_style),
            Span::styled(
                if marked { "* " } else { "  " },
                Style::default().fg(Theme::warn()),
            ),
        ];
        for (column_index, (column, value)) in columns.iter().zip(&row.values).enumerate() {
            let width = column.width as usize;
            let editing = active_edit
                .filter(|edit| edit.row_id == row.id && edit.column == column_index);
            let (text, style) = match editing {
                Some(edit) => (
                    clamp_name(&format!("{}_", edit.text), width),
                    Style::default()
                        .fg(Theme::warn())
                        .add_modifier(Modifier::BOLD),
                ),
                None if selected && column_index == section.selected_column => (
                    clamp_name(value, width),
                    Style::default()
                        .fg(Theme::highlight())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                ),
                None if selected => (
                    clamp_name(value, width),
                    Style::default()
                        .fg(Theme::highlight())
                        .add_modifier(Modifier::BOLD),
                ),
                None => (clamp_name(value, width), Style::default().fg(Theme::text())),
            };
            spans.push(Span::styled(format!("{text} "), style));
        }
        lines.push(Line::from(spans));
    }

    Text::from(lines)
}
