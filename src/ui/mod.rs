mod form;
mod help;
mod helpers;
mod table;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    prelude::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{
    AddPopup, App, AppView, ConfirmPopup, FilterPopup, FocusMode, MultiSelectPopup, NoticePopup,
    TABS,
};
use theme::Theme;

use helpers::window_start;

/// Lines above and below the record rows: tabs, title, table status, header,
/// separator, keybinds and borders.
const TABLE_CHROME: u16 = 14;

/// Renders the entire UI for a single frame.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(area);

    let header_lines = vec![Line::from(vec![
        Span::styled(
            "  Shiftplan  ",
            Style::default().fg(Color::Black).bg(Theme::primary()),
        ),
        Span::raw(" "),
        Span::styled(
            "shift planner",
            Style::default()
                .fg(Theme::secondary())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    let header = Paragraph::new(Text::from(header_lines))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(header, layout[0]);

    let max_rows = layout[1].height.saturating_sub(TABLE_CHROME) as usize;
    let body_text = match app.view {
        AppView::NewShift => form::build_form_text(&app.form),
        AppView::Table(kind) => match app.section(kind) {
            Some(section) => table::build_table_text(section, max_rows),
            None => Text::from("Table not loaded. Press 'R' to reload."),
        },
        AppView::Help => help::build_help_text(),
    };

    let mut body_lines = vec![
        tabs_line(app),
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}", app.view.title()),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    body_lines.extend(body_text.lines);
    let keybinds = keybinds_lines(app);

    // The form can outgrow the body; scroll so the focused field stays visible.
    let visible = layout[1]
        .height
        .saturating_sub(2 + keybinds.len() as u16 + 2) as usize;
    let scroll = match app.view {
        AppView::NewShift => {
            let focus_line = focused_form_line(&body_lines);
            window_start(focus_line, body_lines.len(), visible)
        }
        _ => 0,
    };
    let mut lines = body_lines
        .into_iter()
        .skip(scroll)
        .take(visible)
        .collect::<Vec<_>>();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "----------------------------------------",
        Style::default().fg(Theme::dim()),
    )));
    lines.extend(keybinds);
    let body = Paragraph::new(Text::from(lines))
        .style(Style::default().fg(Theme::text()))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(body, layout[1]);

    let footer = Paragraph::new(Text::from(status_line(app)))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .style(Style::default().fg(Theme::secondary())),
        );
    frame.render_widget(footer, layout[2]);

    if let Some(popup) = &app.add_popup {
        render_add_popup(frame, popup);
    }
    if let Some(popup) = &app.filter_popup {
        render_filter_popup(frame, popup);
    }
    if let Some(popup) = &app.multi_popup {
        render_multi_popup(frame, popup);
    }
    if let Some(popup) = &app.confirm_popup {
        render_confirm_popup(frame, popup);
    }
    if let Some(popup) = &app.notice {
        render_notice_popup(frame, popup);
    }
}

/// Index of the line carrying the focus arrow, or of the last expanded entry
/// under the cursor.
fn focused_form_line(lines: &[Line<'_>]) -> usize {
    lines
        .iter()
        .rposition(|line| {
            line.spans
                .iter()
                .any(|span| span.content.as_ref() == "> ")
        })
        .unwrap_or(0)
}

fn input_styles(active: bool) -> (Style, Style) {
    if active {
        let style = Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD);
        (style, style)
    } else {
        (
            Style::default().fg(Theme::dim()),
            Style::default().fg(Theme::text()),
        )
    }
}

fn popup_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Theme::accent())
            .add_modifier(Modifier::BOLD),
    ))
}

fn popup_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Theme::secondary()))
        .title(format!(" {title} "))
}

fn render_add_popup(frame: &mut Frame, popup: &AddPopup) {
    let area = centered_rect(60, 60, frame.area());
    frame.render_widget(Clear, area);

    let arrow_style = Style::default()
        .fg(Theme::selection_marker())
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![popup_title(&format!("New {}", popup.kind)), Line::from("")];
    for (index, input) in popup.inputs.iter().enumerate() {
        let active = index == popup.focus;
        let (title_style, value_style) = input_styles(active);
        let value = match &input.choice {
            Some(choice) => format!("< {} >", choice.value().unwrap_or("-")),
            None if active => format!("{}_", input.text),
            None => input.text.clone(),
        };
        lines.push(Line::from(vec![
            Span::styled(if active { "> " } else { "  " }, arrow_style),
            Span::styled(format!("{}: ", input.column.label), title_style),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Type to edit. Tab: switch field. Left/Right: cycle values. Enter: save. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(popup_block("Add"));
    frame.render_widget(widget, area);
}

fn render_filter_popup(frame: &mut Frame, popup: &FilterPopup) {
    let area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, area);

    let arrow_style = Style::default()
        .fg(Theme::selection_marker())
        .add_modifier(Modifier::BOLD);
    let mut lines = vec![
        popup_title(&format!("Filter {}", popup.kind)),
        Line::from(""),
    ];
    for (index, (label, value)) in popup.entries.iter().enumerate() {
        let active = index == popup.focus;
        let (title_style, value_style) = input_styles(active);
        let shown = if active {
            format!("{value}_")
        } else {
            value.clone()
        };
        lines.push(Line::from(vec![
            Span::styled(if active { "> " } else { "  " }, arrow_style),
            Span::styled(format!("{label}: "), title_style),
            Span::styled(shown, value_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Rows must contain every filled-in value. Enter: apply. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .block(popup_block("Filter"));
    frame.render_widget(widget, area);
}

fn render_multi_popup(frame: &mut Frame, popup: &MultiSelectPopup) {
    let area = centered_rect(50, 70, frame.area());
    frame.render_widget(Clear, area);

    let control = &popup.control;
    let mut lines = vec![popup_title(popup.label), Line::from("")];
    if control.candidates().is_empty() {
        lines.push(Line::from(Span::styled(
            "No entries available.",
            Style::default().fg(Theme::dim()),
        )));
    }
    let height = area.height.saturating_sub(7) as usize;
    let start = window_start(control.cursor(), control.candidates().len(), height);
    for (index, candidate) in control
        .candidates()
        .iter()
        .enumerate()
        .skip(start)
        .take(height.max(1))
    {
        let under_cursor = index == control.cursor();
        let marker_style = if under_cursor {
            Style::default()
                .fg(Theme::selection_marker())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::dim())
        };
        let name_style = if under_cursor {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Theme::text())
        };
        lines.push(Line::from(vec![
            Span::styled(if under_cursor { "> " } else { "  " }, marker_style),
            Span::styled(
                if control.is_selected(candidate) {
                    "[x] "
                } else {
                    "[ ] "
                },
                Style::default().fg(Theme::success()),
            ),
            Span::styled(candidate.as_str(), name_style),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "space: toggle. a: all. n: none. Enter: apply. Esc: cancel.",
        Style::default().fg(Theme::dim()),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Left)
        .block(popup_block("Select"));
    frame.render_widget(widget, area);
}

fn render_notice_popup(frame: &mut Frame, popup: &NoticePopup) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![popup_title(&popup.title), Line::from("")];
    lines.extend(popup.message.lines().map(|line| {
        Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(Theme::text()),
        ))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter to close",
        Style::default().fg(Theme::dim()),
    )));

    let widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(popup_block(&popup.title));
    frame.render_widget(widget, area);
}

fn render_confirm_popup(frame: &mut Frame, popup: &ConfirmPopup) {
    let area = centered_rect(60, 30, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    lines.push(popup_title("Confirm Action"));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        &popup.message,
        Style::default().fg(Theme::text()),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Press ", Style::default().fg(Theme::dim())),
        Span::styled(
            "Y",
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to confirm or ", Style::default().fg(Theme::dim())),
        Span::styled(
            "N",
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("/", Style::default().fg(Theme::dim())),
        Span::styled(
            "ESC",
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" to cancel", Style::default().fg(Theme::dim())),
    ]));

    let popup_widget = Paragraph::new(Text::from(lines))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(popup_block("Confirm"));
    frame.render_widget(popup_widget, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn tabs_line(app: &App) -> Line<'_> {
    let mut spans = Vec::new();
    for (index, view) in TABS.iter().enumerate() {
        if index > 0 {
            spans.push(Span::raw(" "));
        }
        let active = *view == app.view;
        let focused = app.focus_mode == FocusMode::TabBar && app.selected_tab_index == index;
        let style = if active {
            Style::default()
                .fg(Color::Black)
                .bg(Theme::highlight())
                .add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default()
                .fg(Theme::highlight())
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!(" {}:{} ", index + 1, view.title()), style));
    }

    Line::from(spans)
}

fn status_line(app: &App) -> Line<'_> {
    let color = if app.session.is_connected() {
        Theme::success()
    } else {
        Theme::warn()
    };
    let mut spans = vec![
        Span::styled(
            "● ",
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            app.session.describe(),
            Style::default()
                .fg(Theme::text())
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled("  |  ", Style::default().fg(Theme::dim())));
        spans.push(Span::styled(
            status.as_str(),
            Style::default().fg(Theme::accent()),
        ));
    }
    Line::from(spans)
}

fn keybinds_lines(app: &App) -> Vec<Line<'static>> {
    let focus_hint = if app.focus_mode == FocusMode::TabBar {
        "Tab: Switch to content  ←/→: Navigate tabs  Enter: Select"
    } else {
        "Tab: Switch to tab bar  1-8: Jump to tab"
    };

    let editing = app
        .current_kind()
        .and_then(|kind| app.section(kind))
        .is_some_and(|section| section.is_edit_mode());
    let (primary, secondary) = match app.view {
        AppView::NewShift => (
            "Up/Down: Field  space: Toggle date/entry  Left/Right: Cycle",
            "F2: Create shifts  F3: Clear  Tab: Tab bar",
        ),
        AppView::Table(_) if editing => (
            "Enter: Edit cell  Arrows: Move  s: Save all  x: Discard",
            "?: Help",
        ),
        AppView::Table(_) => (
            "Arrows: Move  space: Mark  e: Edit  n: Add  d: Delete",
            "/: Filter  c: Clear filter  r: Refresh  R: Reload all  ?: Help  q: Quit",
        ),
        AppView::Help => ("Press ? or ESC to close this help screen", ""),
    };
    vec![
        Line::from(Span::styled(
            focus_hint,
            Style::default().fg(Theme::highlight()),
        )),
        Line::from(Span::styled(primary, Style::default().fg(Theme::dim()))),
        Line::from(Span::styled(secondary, Style::default().fg(Theme::dim()))),
    ]
}
