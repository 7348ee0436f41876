use chrono::{Datelike, Months, NaiveDate};
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span, Text},
};

use super::theme::Theme;
use crate::form::{FormField, ShiftForm};
use crate::multiselect::MultiSelect;

pub fn build_form_text(form: &ShiftForm) -> Text<'_> {
    let mut lines = Vec::new();
    lines.extend(calendar_lines(form));
    lines.push(Line::from(""));

    for field in FormField::ALL.into_iter().skip(1) {
        let focused = form.focus == field;
        lines.push(field_line(form, field, focused));
        if let Some(control) = form.multi(field)
            && control.is_expanded()
        {
            lines.extend(candidate_lines(control));
        }
    }

    Text::from(lines)
}

fn label_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(Theme::highlight())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::dim())
    }
}

fn arrow(focused: bool) -> Span<'static> {
    Span::styled(
        if focused { "> " } else { "  " },
        Style::default()
            .fg(Theme::selection_marker())
            .add_modifier(Modifier::BOLD),
    )
}

fn field_line(form: &ShiftForm, field: FormField, focused: bool) -> Line<'_> {
    let mut spans = vec![
        arrow(focused),
        Span::styled(format!("{:<22}", format!("{}:", field.label())), label_style(focused)),
    ];
    if let Some(text) = form.text(field) {
        spans.push(Span::styled(text, Style::default().fg(Theme::text())));
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Theme::highlight())));
        }
    } else if let Some(choice) = form.choice(field) {
        let value = choice.value().unwrap_or("(choose with Left/Right)");
        let style = if choice.value().is_some() {
            Style::default().fg(Theme::text())
        } else {
            Style::default().fg(Theme::dim())
        };
        spans.push(Span::styled(format!("< {value} >"), style));
    } else if let Some(control) = form.multi(field) {
        let style = if control.selection().is_empty() {
            Style::default().fg(Theme::dim())
        } else {
            Style::default().fg(Theme::text())
        };
        spans.push(Span::styled(control.summary(), style));
    }
    Line::from(spans)
}

fn candidate_lines(control: &MultiSelect) -> Vec<Line<'_>> {
    if control.candidates().is_empty() {
        return vec![Line::from(Span::styled(
            "      (no entries)",
            Style::default().fg(Theme::dim()),
        ))];
    }
    control
        .candidates()
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            let under_cursor = index == control.cursor();
            let checked = control.is_selected(candidate);
            let style = if under_cursor {
                Style::default()
                    .fg(Theme::highlight())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Theme::text())
            };
            Line::from(vec![
                Span::raw("    "),
                arrow(under_cursor),
                Span::styled(
                    if checked { "[x] " } else { "[ ] " },
                    Style::default().fg(Theme::success()),
                ),
                Span::styled(candidate.as_str(), style),
            ])
        })
        .collect()
}

fn calendar_lines(form: &ShiftForm) -> Vec<Line<'static>> {
    let focused = form.focus == FormField::Dates;
    let month = form.calendar_month();
    let mut lines = vec![Line::from(vec![
        arrow(focused),
        Span::styled(format!("{:<22}", "Dates:"), label_style(focused)),
        Span::styled(
            month.format("%B %Y").to_string(),
            Style::default()
                .fg(Theme::accent())
                .add_modifier(Modifier::BOLD),
        ),
    ])];
    lines.push(Line::from(Span::styled(
        "    Mo  Tu  We  Th  Fr  Sa  Su",
        Style::default().fg(Theme::secondary()),
    )));

    let next_month = month.checked_add_months(Months::new(1));
    let leading = month.weekday().num_days_from_monday() as usize;
    let mut week: Vec<Span<'static>> = vec![Span::raw("    "), Span::raw("    ".repeat(leading))];
    let mut column = leading;
    for day in month.iter_days().take_while(|day| Some(*day) != next_month) {
        week.push(day_span(form, day, focused));
        week.push(Span::raw("  "));
        column += 1;
        if column == 7 {
            lines.push(Line::from(std::mem::replace(&mut week, vec![Span::raw("    ")])));
            column = 0;
        }
    }
    if column > 0 {
        lines.push(Line::from(week));
    }

    let selected = form
        .dates()
        .iter()
        .map(|date| date.format("%d.%m.%Y").to_string())
        .collect::<Vec<_>>();
    let summary = if selected.is_empty() {
        "No dates selected".to_string()
    } else {
        format!("Selected ({}): {}", selected.len(), selected.join(", "))
    };
    lines.push(Line::from(Span::styled(
        format!("    {summary}"),
        Style::default().fg(Theme::dim()),
    )));
    lines
}

fn day_span(form: &ShiftForm, day: NaiveDate, focused: bool) -> Span<'static> {
    let mut style = if form.dates().contains(&day) {
        Style::default()
            .fg(Theme::success())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Theme::text())
    };
    if day == form.calendar_cursor {
        style = if focused {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style.add_modifier(Modifier::UNDERLINED)
        };
    }
    Span::styled(format!("{:>2}", day.day()), style)
}
