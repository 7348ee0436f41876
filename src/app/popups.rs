use std::collections::BTreeMap;

use crate::dropdowns::DropdownData;
use crate::form::Choice;
use crate::multiselect::MultiSelect;
use crate::schema::{Column, ColumnKind, TableSchema};
use crate::types::{RecordId, RecordKind};

#[derive(Clone, Debug)]
pub struct NoticePopup {
    pub title: String,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ConfirmPopup {
    pub kind: RecordKind,
    pub ids: Vec<RecordId>,
    pub message: String,
}

/// One input of the add popup. Columns backed by a candidate list get a
/// choice instead of free text.
#[derive(Clone, Debug)]
pub struct AddInput {
    pub column: &'static Column,
    pub text: String,
    pub choice: Option<Choice>,
}

impl AddInput {
    pub fn value(&self) -> String {
        match &self.choice {
            Some(choice) => choice.value().unwrap_or_default().to_string(),
            None => self.text.trim().to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AddPopup {
    pub kind: RecordKind,
    pub inputs: Vec<AddInput>,
    pub focus: usize,
}

impl AddPopup {
    pub fn new(schema: &'static TableSchema, dropdowns: &DropdownData) -> Self {
        let inputs = schema
            .input_columns()
            .iter()
            .map(|column| AddInput {
                column,
                text: String::new(),
                choice: match (column.kind, column.candidates) {
                    (ColumnKind::Choice, Some(source)) => {
                        let mut choice = Choice::new(dropdowns.candidates(source));
                        choice.next();
                        Some(choice)
                    }
                    _ => None,
                },
            })
            .collect();
        Self {
            kind: schema.kind,
            inputs,
            focus: 0,
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut AddInput> {
        self.inputs.get_mut(self.focus)
    }

    pub fn focus_next(&mut self) {
        if !self.inputs.is_empty() {
            self.focus = (self.focus + 1) % self.inputs.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.inputs.is_empty() {
            return;
        }
        if self.focus == 0 {
            self.focus = self.inputs.len() - 1;
        } else {
            self.focus -= 1;
        }
    }

    pub fn values(&self) -> Vec<String> {
        self.inputs.iter().map(AddInput::value).collect()
    }
}

/// One substring entry per column (the id column included).
#[derive(Clone, Debug)]
pub struct FilterPopup {
    pub kind: RecordKind,
    pub entries: Vec<(&'static str, String)>,
    pub focus: usize,
}

impl FilterPopup {
    pub fn new(schema: &'static TableSchema, current: &BTreeMap<String, String>) -> Self {
        let entries = schema
            .columns
            .iter()
            .map(|column| {
                let value = current.get(column.label).cloned().unwrap_or_default();
                (column.label, value)
            })
            .collect();
        Self {
            kind: schema.kind,
            entries,
            focus: 0,
        }
    }

    pub fn focused_mut(&mut self) -> Option<&mut String> {
        self.entries.get_mut(self.focus).map(|(_, value)| value)
    }

    pub fn focus_next(&mut self) {
        if !self.entries.is_empty() {
            self.focus = (self.focus + 1) % self.entries.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        if self.focus == 0 {
            self.focus = self.entries.len() - 1;
        } else {
            self.focus -= 1;
        }
    }

    pub fn filters(&self) -> BTreeMap<String, String> {
        self.entries
            .iter()
            .map(|(label, value)| (label.to_string(), value.clone()))
            .collect()
    }
}

/// Editing a list-valued cell through a multi-select control.
#[derive(Clone, Debug)]
pub struct MultiSelectPopup {
    pub kind: RecordKind,
    pub label: &'static str,
    pub control: MultiSelect,
}

impl MultiSelectPopup {
    /// Names already in the cell stay offered even when they are no longer
    /// in the reference tables.
    pub fn new(kind: RecordKind, column: &'static Column, candidates: &[String], cell: &str) -> Self {
        let current = crate::types::split_list(cell);
        let mut offered = candidates.to_vec();
        for name in &current {
            if !offered.contains(name) {
                offered.push(name.clone());
            }
        }
        let mut control = MultiSelect::with_candidates("(none)", &offered);
        control.set_selection(&current);
        control.expand();
        Self {
            kind,
            label: column.label,
            control,
        }
    }
}
