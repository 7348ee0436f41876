use std::collections::BTreeMap;

use chrono::NaiveDate;
use crossterm::event::KeyCode;
use tracing::{info, warn};

use crate::dropdowns::DropdownData;
use crate::errors::SectionError;
use crate::form::{FormField, ShiftForm};
use crate::schema::{ColumnKind, schema_for};
use crate::section::DataSection;
use crate::session::Session;
use crate::types::{Record, RecordKind, ReferenceData};

use super::{
    AddPopup, AppEvent, AppView, ConfirmPopup, FilterPopup, FocusMode, MultiSelectPopup,
    NoticePopup, TABS,
};

/// The top-level application state.
pub struct App {
    pub running: bool,
    pub session: Session,
    pub view: AppView,
    view_before_help: AppView,
    pub focus_mode: FocusMode,
    pub selected_tab_index: usize,
    pub sections: BTreeMap<RecordKind, DataSection>,
    pub form: ShiftForm,
    pub dropdowns: DropdownData,
    pub status: Option<String>,
    pub notice: Option<NoticePopup>,
    pub confirm_popup: Option<ConfirmPopup>,
    pub add_popup: Option<AddPopup>,
    pub filter_popup: Option<FilterPopup>,
    pub multi_popup: Option<MultiSelectPopup>,
}

impl App {
    pub fn new(session: Session, today: NaiveDate) -> Self {
        let mut app = Self {
            running: true,
            session,
            view: AppView::NewShift,
            view_before_help: AppView::NewShift,
            focus_mode: FocusMode::Content,
            selected_tab_index: 0,
            sections: BTreeMap::new(),
            form: ShiftForm::new(today, &DropdownData::fallback()),
            dropdowns: DropdownData::fallback(),
            status: None,
            notice: None,
            confirm_popup: None,
            add_popup: None,
            filter_popup: None,
            multi_popup: None,
        };
        app.load_everything();
        app
    }

    /// Central update function - process an event and mutate state.
    pub fn update(&mut self, event: AppEvent) {
        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::KeyPress(key) => self.handle_key(key),
        }
    }

    pub fn section(&self, kind: RecordKind) -> Option<&DataSection> {
        self.sections.get(&kind)
    }

    pub fn current_kind(&self) -> Option<RecordKind> {
        match self.view {
            AppView::Table(kind) => Some(kind),
            AppView::NewShift | AppView::Help => None,
        }
    }

    /// Reload every table from the store and rebuild candidate lists. Falls
    /// back to offline data when the store cannot be reached.
    pub fn load_everything(&mut self) {
        let loaded = self.session.load_all();
        let store = self.session.store();
        for (kind, records) in &loaded {
            let section = self
                .sections
                .entry(*kind)
                .or_insert_with(|| DataSection::new(schema_for(*kind), store.clone()));
            section.set_store(store.clone());
            section.load(records);
        }
        self.refresh_dropdowns();
        let warnings = self.session.take_warnings();
        if !warnings.is_empty() {
            self.show_notice("Warning", warnings.join("\n"));
        }
        self.status = Some(format!("Data source: {}", self.session.describe()));
        info!(source = %self.session.describe(), "tables loaded");
    }

    fn local_reference(&self) -> ReferenceData {
        let records = self
            .sections
            .iter()
            .filter(|(kind, _)| kind.is_reference())
            .map(|(kind, section)| (*kind, section.records()))
            .collect::<BTreeMap<RecordKind, Vec<Record>>>();
        ReferenceData::from_loaded(&records)
    }

    /// Rebuilds the candidate cache wholesale and hands it to the form.
    pub fn refresh_dropdowns(&mut self) {
        self.dropdowns = self.session.dropdowns(&self.local_reference());
        self.form.update_candidates(&self.dropdowns);
    }

    pub fn show_notice(&mut self, title: &str, message: impl Into<String>) {
        self.notice = Some(NoticePopup {
            title: title.to_string(),
            message: message.into(),
        });
    }

    fn report_error(&mut self, context: &str, err: &SectionError) {
        warn!("{context}: {err}");
        self.show_notice("Error", format!("{context}: {err}"));
    }

    fn handle_key(&mut self, key: KeyCode) {
        if self.notice.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.notice = None;
            }
            return;
        }
        if self.confirm_popup.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.add_popup.is_some() {
            self.handle_add_key(key);
            return;
        }
        if self.filter_popup.is_some() {
            self.handle_filter_key(key);
            return;
        }
        if self.multi_popup.is_some() {
            self.handle_multi_key(key);
            return;
        }
        if self.is_cell_editing() {
            self.handle_cell_edit_key(key);
            return;
        }
        if self.view == AppView::NewShift && self.focus_mode == FocusMode::Content {
            self.handle_form_key(key);
            return;
        }

        match key {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => {
                if self.view == AppView::Help {
                    self.view = self.view_before_help;
                } else {
                    self.view_before_help = self.view;
                    self.view = AppView::Help;
                }
            }
            KeyCode::Char('R') => self.reload_all(),
            KeyCode::Tab => self.toggle_focus(),
            KeyCode::Char(ch @ '1'..='8') => {
                let index = ch as usize - '1' as usize;
                self.selected_tab_index = index;
                self.activate_selected_tab();
            }
            _ if self.focus_mode == FocusMode::TabBar => self.handle_tab_bar_key(key),
            KeyCode::Esc if self.view == AppView::Help => self.view = self.view_before_help,
            _ => {
                if let Some(kind) = self.current_kind() {
                    self.handle_table_key(kind, key);
                }
            }
        }
    }

    fn toggle_focus(&mut self) {
        self.focus_mode = match self.focus_mode {
            FocusMode::TabBar => FocusMode::Content,
            FocusMode::Content => FocusMode::TabBar,
        };
    }

    fn handle_tab_bar_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Left => {
                if self.selected_tab_index == 0 {
                    self.selected_tab_index = TABS.len() - 1;
                } else {
                    self.selected_tab_index -= 1;
                }
            }
            KeyCode::Right => {
                self.selected_tab_index = (self.selected_tab_index + 1) % TABS.len();
            }
            KeyCode::Enter | KeyCode::Down => self.activate_selected_tab(),
            _ => {}
        }
    }

    fn activate_selected_tab(&mut self) {
        let Some(target) = TABS.get(self.selected_tab_index).copied() else {
            return;
        };
        self.navigate_to(target);
        self.focus_mode = FocusMode::Content;
    }

    fn navigate_to(&mut self, view: AppView) {
        if let AppView::Table(kind) = self.view
            && self.section(kind).is_some_and(DataSection::is_edit_mode)
            && self.view != view
        {
            self.status = Some(format!(
                "{} is still in edit mode.",
                schema_for(kind).title
            ));
        }
        self.form.focus_lost();
        self.view = view;
        if let Some(index) = TABS.iter().position(|tab| *tab == view) {
            self.selected_tab_index = index;
        }
    }

    fn reload_all(&mut self) {
        if self.sections.values().any(DataSection::is_edit_mode) {
            self.report_error("Reload", &SectionError::EditModeActive);
            return;
        }
        self.load_everything();
    }

    fn is_cell_editing(&self) -> bool {
        self.current_kind()
            .and_then(|kind| self.section(kind))
            .is_some_and(|section| section.active_edit().is_some())
    }

    fn handle_table_key(&mut self, kind: RecordKind, key: KeyCode) {
        let Some(section) = self.sections.get_mut(&kind) else {
            return;
        };
        match key {
            KeyCode::Up => section.move_up(),
            KeyCode::Down => section.move_down(),
            KeyCode::Left => section.move_left(),
            KeyCode::Right => section.move_right(),
            KeyCode::Char(' ') => section.toggle_mark(),
            KeyCode::Char('e') => {
                if section.enter_edit_mode() {
                    self.status = Some("Edit mode: Enter edits a cell, s saves, x discards.".into());
                }
            }
            KeyCode::Enter => self.begin_cell_edit(kind),
            KeyCode::Char('s') => self.save_section(kind),
            KeyCode::Char('x') => {
                if section.is_edit_mode() {
                    section.exit_edit_mode(true);
                    self.status = Some("Edits discarded.".into());
                }
            }
            KeyCode::Char('n') => self.open_add_popup(kind),
            KeyCode::Char('d') | KeyCode::Delete => self.open_confirm_delete(kind),
            KeyCode::Char('/') | KeyCode::Char('f') => {
                self.filter_popup = Some(FilterPopup::new(section.schema(), section.filters()));
            }
            KeyCode::Char('c') => {
                section.clear_filter();
                self.status = Some("Filter cleared.".into());
            }
            KeyCode::Char('r') => {
                if section.is_edit_mode() {
                    self.report_error("Refresh", &SectionError::EditModeActive);
                } else if let Err(err) = section.refresh() {
                    self.report_error("Refresh failed", &err);
                }
            }
            _ => {}
        }
    }

    fn begin_cell_edit(&mut self, kind: RecordKind) {
        let Some(section) = self.sections.get_mut(&kind) else {
            return;
        };
        let Some(row_id) = section.current_row().map(|row| row.id.clone()) else {
            return;
        };
        let column_index = section.selected_column;
        if let Err(err) = section.begin_cell_edit(&row_id, column_index) {
            self.show_notice("Info", err.to_string());
            return;
        }
        let column = &section.columns()[column_index];
        if column.kind != ColumnKind::List {
            return;
        }
        let cell = section.active_edit().map(|edit| edit.text.clone()).unwrap_or_default();
        let candidates = column
            .candidates
            .map(|source| self.dropdowns.candidates(source))
            .unwrap_or_default();
        self.multi_popup = Some(MultiSelectPopup::new(kind, column, candidates, &cell));
    }

    fn handle_cell_edit_key(&mut self, key: KeyCode) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let Some(section) = self.sections.get_mut(&kind) else {
            return;
        };
        match key {
            KeyCode::Esc => section.cancel_cell_edit(),
            KeyCode::Enter => {
                if let Err(err) = section.commit_cell_edit() {
                    self.report_error("Edit", &err);
                }
            }
            KeyCode::Backspace => {
                if let Some(text) = section.edit_text_mut() {
                    text.pop();
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(text) = section.edit_text_mut() {
                    text.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_multi_key(&mut self, key: KeyCode) {
        let Some(popup) = self.multi_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Up => popup.control.cursor_up(),
            KeyCode::Down => popup.control.cursor_down(),
            KeyCode::Char(' ') => popup.control.toggle_cursor(),
            KeyCode::Char('a') => popup.control.select_all(),
            KeyCode::Char('n') => popup.control.select_none(),
            KeyCode::Enter => {
                let kind = popup.kind;
                let joined = popup.control.selection().join(", ");
                self.multi_popup = None;
                if let Some(section) = self.sections.get_mut(&kind) {
                    if let Some(text) = section.edit_text_mut() {
                        *text = joined;
                    }
                    if let Err(err) = section.commit_cell_edit() {
                        self.report_error("Edit", &err);
                    }
                }
            }
            KeyCode::Esc => {
                let kind = popup.kind;
                self.multi_popup = None;
                if let Some(section) = self.sections.get_mut(&kind) {
                    section.cancel_cell_edit();
                }
            }
            _ => {}
        }
    }

    fn save_section(&mut self, kind: RecordKind) {
        let Some(section) = self.sections.get_mut(&kind) else {
            return;
        };
        if !section.is_edit_mode() {
            return;
        }
        match section.save_all_edits() {
            Ok(report) => {
                self.status = Some(format!("{} row(s) saved.", report.saved));
                if report.dropdowns_stale {
                    self.refresh_dropdowns();
                }
            }
            Err(err) => {
                let stored_some = matches!(
                    &err,
                    SectionError::Save(failure) if !failure.persisted.is_empty()
                );
                let stale = stored_some && section.schema().feeds_dropdowns();
                self.report_error("Save failed", &err);
                if stale {
                    self.refresh_dropdowns();
                }
            }
        }
    }

    fn open_add_popup(&mut self, kind: RecordKind) {
        if kind == RecordKind::Shift {
            self.navigate_to(AppView::NewShift);
            return;
        }
        let Some(section) = self.section(kind) else {
            return;
        };
        if section.is_edit_mode() {
            self.report_error("Add", &SectionError::EditModeActive);
            return;
        }
        let popup = AddPopup::new(section.schema(), &self.dropdowns);
        self.add_popup = Some(popup);
    }

    fn handle_add_key(&mut self, key: KeyCode) {
        let Some(popup) = self.add_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.add_popup = None,
            KeyCode::Enter => self.apply_add_popup(),
            KeyCode::Tab | KeyCode::Down => popup.focus_next(),
            KeyCode::BackTab | KeyCode::Up => popup.focus_prev(),
            KeyCode::Left => {
                if let Some(choice) = popup.focused_mut().and_then(|input| input.choice.as_mut()) {
                    choice.prev();
                }
            }
            KeyCode::Right => {
                if let Some(choice) = popup.focused_mut().and_then(|input| input.choice.as_mut()) {
                    choice.next();
                }
            }
            KeyCode::Backspace => {
                if let Some(input) = popup.focused_mut() {
                    input.text.pop();
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(input) = popup.focused_mut()
                    && input.choice.is_none()
                {
                    input.text.push(ch);
                }
            }
            _ => {}
        }
    }

    fn apply_add_popup(&mut self) {
        let Some(popup) = self.add_popup.as_ref() else {
            return;
        };
        let kind = popup.kind;
        let values = popup.values();
        let missing = popup
            .inputs
            .first()
            .filter(|_| values.first().is_none_or(String::is_empty))
            .map(|input| input.column.label);
        if let Some(label) = missing {
            let err = SectionError::MissingField(label.to_string());
            self.show_notice("Info", err.to_string());
            return;
        }
        self.add_popup = None;
        let Some(section) = self.sections.get_mut(&kind) else {
            return;
        };
        match section.add_record(values) {
            Ok(_) => {
                self.status = Some(format!("{} added.", kind));
                if section.schema().feeds_dropdowns() {
                    self.refresh_dropdowns();
                }
            }
            Err(err) => self.report_error("Add failed", &err),
        }
    }

    fn open_confirm_delete(&mut self, kind: RecordKind) {
        let Some(section) = self.section(kind) else {
            return;
        };
        if section.is_edit_mode() {
            self.report_error("Delete", &SectionError::EditModeActive);
            return;
        }
        let ids = section.delete_targets();
        if ids.is_empty() {
            return;
        }
        self.confirm_popup = Some(ConfirmPopup {
            kind,
            message: format!("Delete {} {} record(s)?", ids.len(), kind),
            ids,
        });
    }

    fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Some(popup) = self.confirm_popup.take() else {
                    return;
                };
                let Some(section) = self.sections.get_mut(&popup.kind) else {
                    return;
                };
                match section.delete_selected(&popup.ids) {
                    Ok(report) => {
                        let stale = report.dropdowns_stale;
                        if report.failed.is_empty() {
                            self.status = Some(report.summary());
                        } else {
                            self.show_notice("Delete", report.summary());
                        }
                        if stale {
                            self.refresh_dropdowns();
                        }
                    }
                    Err(err) => self.report_error("Delete failed", &err),
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_popup = None;
            }
            _ => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyCode) {
        let Some(popup) = self.filter_popup.as_mut() else {
            return;
        };
        match key {
            KeyCode::Esc => self.filter_popup = None,
            KeyCode::Enter => {
                let kind = popup.kind;
                let filters = popup.filters();
                self.filter_popup = None;
                if let Some(section) = self.sections.get_mut(&kind) {
                    section.apply_filter(filters);
                    self.status = Some(format!("{} row(s) shown.", section.visible_len()));
                }
            }
            KeyCode::Tab | KeyCode::Down => popup.focus_next(),
            KeyCode::BackTab | KeyCode::Up => popup.focus_prev(),
            KeyCode::Backspace => {
                if let Some(value) = popup.focused_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                if let Some(value) = popup.focused_mut() {
                    value.push(ch);
                }
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let focus = self.form.focus;
        if let Some(control) = self.form.multi_mut(focus)
            && control.is_expanded()
        {
            match key {
                KeyCode::Up => control.cursor_up(),
                KeyCode::Down => control.cursor_down(),
                KeyCode::Char(' ') => control.toggle_cursor(),
                KeyCode::Char('a') => control.select_all(),
                KeyCode::Char('n') => control.select_none(),
                KeyCode::Enter | KeyCode::Esc => control.done(),
                KeyCode::Tab => {
                    control.focus_lost();
                    self.focus_mode = FocusMode::TabBar;
                }
                _ => {}
            }
            return;
        }

        match key {
            KeyCode::Tab | KeyCode::Esc => self.focus_mode = FocusMode::TabBar,
            KeyCode::F(2) => self.submit_form(),
            KeyCode::F(3) => {
                self.form.clear();
                self.status = Some("Form cleared.".into());
            }
            KeyCode::Up => self.form.focus_prev(),
            KeyCode::Down => self.form.focus_next(),
            _ => self.handle_form_field_key(focus, key),
        }
    }

    fn handle_form_field_key(&mut self, focus: FormField, key: KeyCode) {
        if focus == FormField::Dates {
            match key {
                KeyCode::Left => self.form.move_cursor_days(-1),
                KeyCode::Right => self.form.move_cursor_days(1),
                KeyCode::PageUp => self.form.move_cursor_months(-1),
                KeyCode::PageDown => self.form.move_cursor_months(1),
                KeyCode::Char('[') => self.form.move_cursor_days(-7),
                KeyCode::Char(']') => self.form.move_cursor_days(7),
                KeyCode::Char(' ') | KeyCode::Enter => self.form.toggle_cursor_date(),
                KeyCode::Delete | KeyCode::Backspace => self.form.clear_dates(),
                _ => {}
            }
            return;
        }
        if let Some(choice) = self.form.choice_mut(focus) {
            match key {
                KeyCode::Left => choice.prev(),
                KeyCode::Right | KeyCode::Char(' ') => choice.next(),
                _ => {}
            }
            return;
        }
        if let Some(control) = self.form.multi_mut(focus) {
            if matches!(key, KeyCode::Enter | KeyCode::Char(' ')) {
                control.expand();
            }
            return;
        }
        if let Some(text) = self.form.text_mut(focus) {
            match key {
                KeyCode::Backspace => {
                    text.pop();
                }
                KeyCode::Char(ch) if !ch.is_control() => text.push(ch),
                _ => {}
            }
        }
    }

    fn submit_form(&mut self) {
        let Some(shifts) = self.sections.get_mut(&RecordKind::Shift) else {
            return;
        };
        match self.form.submit(shifts) {
            Ok(report) => self.show_notice("New shifts", report.summary()),
            Err(err) => self.report_error("Shifts not saved", &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::schema::keys;
    use crate::store::{SqliteStore, Store};
    use crate::types::{FieldValue, Fields};

    fn offline_app() -> App {
        App::new(Session::new(None, None), NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
    }

    fn press(app: &mut App, keys: &[KeyCode]) {
        for key in keys {
            app.update(AppEvent::KeyPress(*key));
        }
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.update(AppEvent::KeyPress(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn offline_start_shows_demo_rows() {
        let app = offline_app();
        assert_eq!(app.section(RecordKind::Section).unwrap().rows().len(), 3);
        assert_eq!(app.section(RecordKind::Shift).unwrap().rows().len(), 3);
        assert_eq!(app.dropdowns.sections.len(), 3);
        assert_eq!(app.session.describe(), "offline");
    }

    #[test]
    fn number_keys_switch_tabs() {
        let mut app = offline_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('3')]);
        assert_eq!(app.view, AppView::Table(RecordKind::Section));
        assert_eq!(app.selected_tab_index, 2);
    }

    #[test]
    fn adding_a_section_refreshes_form_candidates() {
        let mut app = offline_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('3'), KeyCode::Char('n')]);
        assert!(app.add_popup.is_some());
        type_text(&mut app, "Abschnitt 9");
        press(&mut app, &[KeyCode::Enter]);
        assert!(app.add_popup.is_none());
        assert!(app.dropdowns.sections.contains(&"Abschnitt 9".to_string()));
        assert!(app.form.section.candidates().contains(&"Abschnitt 9".to_string()));
    }

    #[test]
    fn submitting_the_form_fans_out_per_date() {
        let mut app = offline_app();
        app.form.toggle_date(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());
        app.form.toggle_date(NaiveDate::from_ymd_opt(2024, 1, 17).unwrap());
        app.form.title = "Gleisbau".into();
        app.form.shift_time.next();
        app.form.section.next();
        press(&mut app, &[KeyCode::F(2)]);

        let shifts = app.section(RecordKind::Shift).unwrap();
        assert_eq!(shifts.rows().len(), 5);
        let notice = app.notice.as_ref().unwrap();
        assert!(notice.message.starts_with("2 of 2 shifts created."));
        assert!(app.form.dates().is_empty());
        assert!(app.form.title.is_empty());
        let dates = shifts.records().into_iter().map(|record| record.fields["datum_von"].clone());
        assert!(dates.into_iter().any(|date| date == FieldValue::text("2024-01-17")));
    }

    #[test]
    fn list_cells_are_edited_through_the_picker() {
        let mut app = offline_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('2'), KeyCode::Char('e')]);
        press(&mut app, &[KeyCode::Right; 4]);
        press(&mut app, &[KeyCode::Enter]);

        let popup = app.multi_popup.as_ref().unwrap();
        assert_eq!(popup.label, "Constr. leaders");
        assert_eq!(popup.control.selection(), ["Bauführer 1"]);

        press(&mut app, &[KeyCode::Char('a'), KeyCode::Enter, KeyCode::Char('s')]);

        let shifts = app.section(RecordKind::Shift).unwrap();
        assert!(app.multi_popup.is_none());
        assert!(!shifts.is_edit_mode());
        assert_eq!(
            shifts.rows()[0].values[5],
            "Bauführer 1, Bauführer 2, Bauführer 3"
        );
    }

    #[test]
    fn delete_asks_for_confirmation() {
        let mut app = offline_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('3'), KeyCode::Char('d')]);
        assert!(app.confirm_popup.is_some());
        press(&mut app, &[KeyCode::Char('n')]);
        assert_eq!(app.section(RecordKind::Section).unwrap().rows().len(), 3);

        press(&mut app, &[KeyCode::Char('d'), KeyCode::Char('y')]);
        assert!(app.confirm_popup.is_none());
        assert_eq!(app.section(RecordKind::Section).unwrap().rows().len(), 2);
        assert_eq!(app.dropdowns.sections, ["Abschnitt 2", "Abschnitt 3"]);
    }

    #[test]
    fn reload_is_refused_while_editing() {
        let mut app = offline_app();
        press(&mut app, &[KeyCode::Tab, KeyCode::Char('3'), KeyCode::Char('e')]);
        press(&mut app, &[KeyCode::Char('R')]);
        let notice = app.notice.as_ref().unwrap();
        assert!(notice.message.contains("edit mode"));
    }

    #[test]
    fn partial_save_refreshes_candidate_lists() {
        let store = Rc::new(SqliteStore::open_in_memory().unwrap());
        let section_fields = |name: &str| {
            Fields::from([
                (keys::SECTION_NAME.to_string(), FieldValue::text(name)),
                (keys::SECTION_DESCRIPTION.to_string(), FieldValue::text("")),
            ])
        };
        let a = store.create(RecordKind::Section, &section_fields("Alt A")).unwrap();
        let b = store.create(RecordKind::Section, &section_fields("Alt B")).unwrap();

        let shared: Rc<dyn Store> = store.clone();
        let mut app = App::new(
            Session::new(Some(shared), None),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );
        assert_eq!(app.dropdowns.sections, ["Alt A", "Alt B"]);

        let section = app.sections.get_mut(&RecordKind::Section).unwrap();
        section.enter_edit_mode();
        section.begin_cell_edit(&a.id, 1).unwrap();
        *section.edit_text_mut().unwrap() = "Neu A".to_string();
        section.commit_cell_edit().unwrap();
        store.delete(RecordKind::Section, &b.id).unwrap();

        app.save_section(RecordKind::Section);

        assert!(app.notice.is_some());
        assert!(app.section(RecordKind::Section).unwrap().is_edit_mode());
        assert_eq!(app.dropdowns.sections, ["Neu A"]);
        assert!(app.form.section.candidates().contains(&"Neu A".to_string()));
    }
}
