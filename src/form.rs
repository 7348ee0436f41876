/// The shift-entry form: a set of calendar dates plus one value per shift field.
use std::collections::BTreeSet;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::{info, warn};

use crate::dropdowns::DropdownData;
use crate::errors::{SectionError, SectionResult};
use crate::multiselect::MultiSelect;
use crate::schema::Candidates;
use crate::section::DataSection;
use crate::types::{RecordId, Shift};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormField {
    Dates,
    Title,
    ShiftTime,
    Section,
    ConstructionLeaders,
    WorkLeaders,
    Activity,
    StaffGroup,
    Logistics,
    Coordinator,
    SafetyOfficer,
    SiteSafety,
    TrackMachines,
    Machines,
    Comments,
}

impl FormField {
    pub const ALL: [FormField; 15] = [
        FormField::Dates,
        FormField::Title,
        FormField::ShiftTime,
        FormField::Section,
        FormField::ConstructionLeaders,
        FormField::WorkLeaders,
        FormField::Activity,
        FormField::StaffGroup,
        FormField::Logistics,
        FormField::Coordinator,
        FormField::SafetyOfficer,
        FormField::SiteSafety,
        FormField::TrackMachines,
        FormField::Machines,
        FormField::Comments,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Dates => "Dates",
            FormField::Title => "Title",
            FormField::ShiftTime => "Shift time",
            FormField::Section => "Section",
            FormField::ConstructionLeaders => "Construction leaders",
            FormField::WorkLeaders => "Work leaders",
            FormField::Activity => "Activity",
            FormField::StaffGroup => "Staff group",
            FormField::Logistics => "Logistics",
            FormField::Coordinator => "Coordinator",
            FormField::SafetyOfficer => "Safety officer",
            FormField::SiteSafety => "Site safety",
            FormField::TrackMachines => "Track machines",
            FormField::Machines => "Machines",
            FormField::Comments => "Comments",
        }
    }

    fn candidates(self) -> Option<Candidates> {
        match self {
            FormField::ShiftTime => Some(Candidates::ShiftTimes),
            FormField::Section => Some(Candidates::Sections),
            FormField::ConstructionLeaders => Some(Candidates::ConstructionLeaders),
            FormField::WorkLeaders => Some(Candidates::WorkLeaders),
            FormField::StaffGroup => Some(Candidates::Staff),
            FormField::Logistics => Some(Candidates::LogisticsStaff),
            FormField::Coordinator => Some(Candidates::Coordinators),
            FormField::SafetyOfficer => Some(Candidates::SafetyOfficers),
            FormField::SiteSafety => Some(Candidates::SiteSafety),
            FormField::TrackMachines => Some(Candidates::TrackMachines),
            FormField::Machines => Some(Candidates::Machines),
            FormField::Dates | FormField::Title | FormField::Activity | FormField::Comments => None,
        }
    }

    pub fn is_text(self) -> bool {
        matches!(
            self,
            FormField::Title | FormField::Activity | FormField::Comments
        )
    }

    pub fn is_choice(self) -> bool {
        matches!(self, FormField::ShiftTime | FormField::Section)
    }
}

/// Single-value choice out of a candidate list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Choice {
    candidates: Vec<String>,
    index: Option<usize>,
}

impl Choice {
    pub fn new(candidates: &[String]) -> Self {
        Self {
            candidates: candidates.to_vec(),
            index: None,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn value(&self) -> Option<&str> {
        self.index
            .and_then(|index| self.candidates.get(index))
            .map(String::as_str)
    }

    pub fn select(&mut self, value: &str) -> bool {
        self.index = self.candidates.iter().position(|candidate| candidate == value);
        self.index.is_some()
    }

    /// Keeps the current value if it is still offered.
    pub fn set_candidates(&mut self, candidates: &[String]) {
        let current = self.value().map(str::to_string);
        self.candidates = candidates.to_vec();
        self.index = current.and_then(|value| {
            self.candidates
                .iter()
                .position(|candidate| *candidate == value)
        });
    }

    pub fn next(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(index) => (index + 1) % self.candidates.len(),
            None => 0,
        });
    }

    pub fn prev(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.index = Some(match self.index {
            Some(0) | None => self.candidates.len() - 1,
            Some(index) => index - 1,
        });
    }

    pub fn clear(&mut self) {
        self.index = None;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitReport {
    pub created: Vec<(NaiveDate, RecordId)>,
    pub failed: Vec<(NaiveDate, String)>,
}

impl SubmitReport {
    pub fn total(&self) -> usize {
        self.created.len() + self.failed.len()
    }

    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} of {} shifts created.",
            self.created.len(),
            self.total()
        );
        for (date, message) in &self.failed {
            text.push_str(&format!("\n{}: {message}", date.format("%d.%m.%Y")));
        }
        text
    }
}

pub struct ShiftForm {
    dates: BTreeSet<NaiveDate>,
    pub calendar_cursor: NaiveDate,
    pub focus: FormField,
    pub title: String,
    pub shift_time: Choice,
    pub section: Choice,
    pub construction_leaders: MultiSelect,
    pub work_leaders: MultiSelect,
    pub activity: String,
    pub staff_group: MultiSelect,
    pub logistics: MultiSelect,
    pub coordinator: MultiSelect,
    pub safety_officer: MultiSelect,
    pub site_safety: MultiSelect,
    pub track_machines: MultiSelect,
    pub machines: MultiSelect,
    pub comments: String,
}

impl ShiftForm {
    pub fn new(today: NaiveDate, dropdowns: &DropdownData) -> Self {
        let multi = |field: FormField, placeholder: &str| {
            let candidates = field
                .candidates()
                .map(|source| dropdowns.candidates(source))
                .unwrap_or_default();
            MultiSelect::with_candidates(placeholder, candidates)
        };
        Self {
            dates: BTreeSet::new(),
            calendar_cursor: today,
            focus: FormField::Dates,
            title: String::new(),
            shift_time: Choice::new(&dropdowns.shift_times),
            section: Choice::new(&dropdowns.sections),
            construction_leaders: multi(FormField::ConstructionLeaders, "Select leaders..."),
            work_leaders: multi(FormField::WorkLeaders, "Select leaders..."),
            activity: String::new(),
            staff_group: multi(FormField::StaffGroup, "Select staff..."),
            logistics: multi(FormField::Logistics, "Select logistics staff..."),
            coordinator: multi(FormField::Coordinator, "Select coordinator..."),
            safety_officer: multi(FormField::SafetyOfficer, "Select safety officer..."),
            site_safety: multi(FormField::SiteSafety, "Select site safety..."),
            track_machines: multi(FormField::TrackMachines, "Select track machines..."),
            machines: multi(FormField::Machines, "Select machines..."),
            comments: String::new(),
        }
    }

    pub fn dates(&self) -> &BTreeSet<NaiveDate> {
        &self.dates
    }

    pub fn toggle_date(&mut self, date: NaiveDate) {
        if !self.dates.remove(&date) {
            self.dates.insert(date);
        }
    }

    pub fn toggle_cursor_date(&mut self) {
        self.toggle_date(self.calendar_cursor);
    }

    pub fn clear_dates(&mut self) {
        self.dates.clear();
    }

    /// Moves the calendar cursor by whole days; negative moves back.
    pub fn move_cursor_days(&mut self, days: i64) {
        let step = Days::new(days.unsigned_abs());
        let moved = if days < 0 {
            self.calendar_cursor.checked_sub_days(step)
        } else {
            self.calendar_cursor.checked_add_days(step)
        };
        if let Some(date) = moved {
            self.calendar_cursor = date;
        }
    }

    pub fn move_cursor_months(&mut self, months: i32) {
        let step = Months::new(months.unsigned_abs());
        let moved = if months < 0 {
            self.calendar_cursor.checked_sub_months(step)
        } else {
            self.calendar_cursor.checked_add_months(step)
        };
        if let Some(date) = moved {
            self.calendar_cursor = date;
        }
    }

    /// First day of the month shown by the calendar.
    pub fn calendar_month(&self) -> NaiveDate {
        self.calendar_cursor
            .with_day(1)
            .unwrap_or(self.calendar_cursor)
    }

    pub fn focus_next(&mut self) {
        self.focus_lost();
        let index = FormField::ALL
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        self.focus = FormField::ALL[(index + 1) % FormField::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        self.focus_lost();
        let index = FormField::ALL
            .iter()
            .position(|field| *field == self.focus)
            .unwrap_or(0);
        self.focus = FormField::ALL[(index + FormField::ALL.len() - 1) % FormField::ALL.len()];
    }

    /// Collapses the focused multi-select, if any.
    pub fn focus_lost(&mut self) {
        if let Some(control) = self.multi_mut(self.focus) {
            control.focus_lost();
        }
    }

    pub fn text_mut(&mut self, field: FormField) -> Option<&mut String> {
        match field {
            FormField::Title => Some(&mut self.title),
            FormField::Activity => Some(&mut self.activity),
            FormField::Comments => Some(&mut self.comments),
            _ => None,
        }
    }

    pub fn text(&self, field: FormField) -> Option<&str> {
        match field {
            FormField::Title => Some(&self.title),
            FormField::Activity => Some(&self.activity),
            FormField::Comments => Some(&self.comments),
            _ => None,
        }
    }

    pub fn choice_mut(&mut self, field: FormField) -> Option<&mut Choice> {
        match field {
            FormField::ShiftTime => Some(&mut self.shift_time),
            FormField::Section => Some(&mut self.section),
            _ => None,
        }
    }

    pub fn choice(&self, field: FormField) -> Option<&Choice> {
        match field {
            FormField::ShiftTime => Some(&self.shift_time),
            FormField::Section => Some(&self.section),
            _ => None,
        }
    }

    pub fn multi(&self, field: FormField) -> Option<&MultiSelect> {
        match field {
            FormField::ConstructionLeaders => Some(&self.construction_leaders),
            FormField::WorkLeaders => Some(&self.work_leaders),
            FormField::StaffGroup => Some(&self.staff_group),
            FormField::Logistics => Some(&self.logistics),
            FormField::Coordinator => Some(&self.coordinator),
            FormField::SafetyOfficer => Some(&self.safety_officer),
            FormField::SiteSafety => Some(&self.site_safety),
            FormField::TrackMachines => Some(&self.track_machines),
            FormField::Machines => Some(&self.machines),
            _ => None,
        }
    }

    pub fn multi_mut(&mut self, field: FormField) -> Option<&mut MultiSelect> {
        match field {
            FormField::ConstructionLeaders => Some(&mut self.construction_leaders),
            FormField::WorkLeaders => Some(&mut self.work_leaders),
            FormField::StaffGroup => Some(&mut self.staff_group),
            FormField::Logistics => Some(&mut self.logistics),
            FormField::Coordinator => Some(&mut self.coordinator),
            FormField::SafetyOfficer => Some(&mut self.safety_officer),
            FormField::SiteSafety => Some(&mut self.site_safety),
            FormField::TrackMachines => Some(&mut self.track_machines),
            FormField::Machines => Some(&mut self.machines),
            _ => None,
        }
    }

    /// Push fresh candidate lists into every input. Selections that are no
    /// longer offered are dropped.
    pub fn update_candidates(&mut self, dropdowns: &DropdownData) {
        for field in FormField::ALL {
            let Some(source) = field.candidates() else {
                continue;
            };
            let candidates = dropdowns.candidates(source);
            if let Some(choice) = self.choice_mut(field) {
                choice.set_candidates(candidates);
            } else if let Some(control) = self.multi_mut(field) {
                control.set_candidates(candidates);
            }
        }
    }

    /// Checks required inputs and builds the shift for one date.
    fn shift_for(&self, date: NaiveDate) -> SectionResult<Shift> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(SectionError::MissingField(FormField::Title.label().to_string()));
        }
        let shift_time = self.shift_time.value().ok_or_else(|| {
            SectionError::MissingField(FormField::ShiftTime.label().to_string())
        })?;
        let section = self
            .section
            .value()
            .ok_or_else(|| SectionError::MissingField(FormField::Section.label().to_string()))?;

        Ok(Shift {
            date,
            title: title.to_string(),
            shift_time: shift_time.to_string(),
            section: section.to_string(),
            construction_leaders: self.construction_leaders.selection(),
            work_leaders: self.work_leaders.selection(),
            activity: self.activity.trim().to_string(),
            staff_group: self.staff_group.selection(),
            coordinator: self.coordinator.selection(),
            safety_officer: self.safety_officer.selection(),
            site_safety: self.site_safety.selection(),
            logistics_staff: self.logistics.selection(),
            track_machines: self.track_machines.selection(),
            machines: self.machines.selection(),
            comments: self.comments.trim().to_string(),
        })
    }

    /// Create one shift per selected date, earliest first. A failed date does
    /// not stop the others. The form is cleared once anything was created.
    pub fn submit(&mut self, shifts: &mut DataSection) -> SectionResult<SubmitReport> {
        let Some(first) = self.dates.first().copied() else {
            return Err(SectionError::NoDatesSelected);
        };
        self.shift_for(first)?;

        let mut report = SubmitReport::default();
        for date in self.dates.clone() {
            let fields = self.shift_for(date)?.to_fields();
            match shifts.insert_fields(fields) {
                Ok(id) => report.created.push((date, id)),
                Err(err) => {
                    warn!(%date, "shift not created: {err}");
                    report.failed.push((date, err.to_string()));
                }
            }
        }
        info!(
            created = report.created.len(),
            failed = report.failed.len(),
            "shift form submitted"
        );
        if !report.created.is_empty() {
            self.clear();
        }
        Ok(report)
    }

    pub fn clear(&mut self) {
        self.dates.clear();
        self.title.clear();
        self.activity.clear();
        self.comments.clear();
        self.shift_time.clear();
        self.section.clear();
        for field in FormField::ALL {
            if let Some(control) = self.multi_mut(field) {
                control.clear();
                control.collapse();
            }
        }
    }
}
