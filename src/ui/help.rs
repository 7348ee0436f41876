use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;

pub fn build_help_text() -> Text<'static> {
    let mut lines = Vec::new();

    lines.push(Line::from(Span::styled(
        "Key bindings",
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    lines.push(section_title("Global"));
    lines.extend(section_lines(&[
        "q: Quit (tab bar or table focus)",
        "?: Toggle help",
        "Tab: Toggle focus (tab bar / content)",
        "1-8: Jump to tab",
        "Left/Right: Navigate tabs (tab bar focus)",
        "Enter/Down: Activate tab (tab bar focus)",
        "R: Reload every table from the data source",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Tables"));
    lines.extend(section_lines(&[
        "Up/Down: Move row  Left/Right: Move column",
        "space: Mark row for deletion",
        "e: Enter edit mode",
        "Enter: Edit cell (edit mode); list cells open a picker",
        "s: Save all edits  x: Discard edits",
        "n: Add record  d/Delete: Delete marked or current rows",
        "/ or f: Filter by column  c: Clear filter  r: Refresh",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("New shift"));
    lines.extend(section_lines(&[
        "Up/Down: Move between fields",
        "Dates: Left/Right move a day, [/] a week, PgUp/PgDn a month",
        "Dates: space/Enter toggles a date, Delete clears all dates",
        "Choices: Left/Right cycle values",
        "Lists: Enter opens, space toggles, a all, n none, Enter/Esc close",
        "F2: Create one shift per selected date  F3: Clear form",
        "Tab/Esc: Back to the tab bar",
    ]));

    lines.push(Line::from(""));
    lines.push(section_title("Popups"));
    lines.extend(section_lines(&[
        "Add/Filter: Up/Down or Tab switch field, Enter save, Esc cancel",
        "Add: Left/Right cycle values of constrained fields",
        "Confirm: y to confirm, n/Esc to cancel",
    ]));

    Text::from(lines)
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(Theme::secondary())
            .add_modifier(Modifier::BOLD),
    ))
}

fn section_lines(items: &[&str]) -> Vec<Line<'static>> {
    items
        .iter()
        .map(|item| {
            Line::from(Span::styled(
                format!("  - {item}"),
                Style::default().fg(Theme::text()),
            ))
        })
        .collect()
}
