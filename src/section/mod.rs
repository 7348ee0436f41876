/// Generic table controller: row cache, filtering, edit mode and store calls for one record kind.
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::errors::{SaveFailure, SectionError, SectionResult};
use crate::ids;
use crate::schema::{Column, TableSchema};
use crate::store::Store;
use crate::types::{Fields, Record, RecordId};

pub mod convert;

/// One displayed row. `values[0]` is always the identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: RecordId,
    pub values: Vec<String>,
}

/// A pending inline edit of a single cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellEdit {
    pub row_id: RecordId,
    pub column: usize,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveReport {
    pub saved: usize,
    pub dropdowns_stale: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub deleted: Vec<RecordId>,
    pub failed: Vec<(RecordId, String)>,
    pub dropdowns_stale: bool,
}

impl DeleteReport {
    pub fn summary(&self) -> String {
        if self.failed.is_empty() {
            return format!("{} record(s) deleted.", self.deleted.len());
        }
        let failures = self
            .failed
            .iter()
            .map(|(id, message)| format!("{id}: {message}"))
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "{} record(s) deleted, {} failed:\n{failures}",
            self.deleted.len(),
            self.failed.len()
        )
    }
}

pub struct DataSection {
    schema: &'static TableSchema,
    store: Option<Rc<dyn Store>>,
    rows: Vec<Row>,
    /// Rows as of the last load or successful save.
    snapshot: Vec<Row>,
    /// Indices into `rows` currently shown.
    visible: Vec<usize>,
    filters: BTreeMap<String, String>,
    edit_mode: bool,
    active_edit: Option<CellEdit>,
    marked: BTreeSet<RecordId>,
    pub selected_row: usize,
    pub selected_column: usize,
}

impl DataSection {
    pub fn new(schema: &'static TableSchema, store: Option<Rc<dyn Store>>) -> Self {
        Self {
            schema,
            store,
            rows: Vec::new(),
            snapshot: Vec::new(),
            visible: Vec::new(),
            filters: BTreeMap::new(),
            edit_mode: false,
            active_edit: None,
            marked: BTreeSet::new(),
            selected_row: 0,
            selected_column: 1,
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    pub fn columns(&self) -> &'static [Column] {
        self.schema.columns
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    /// Swap the backing store, e.g. when falling back to offline mode.
    pub fn set_store(&mut self, store: Option<Rc<dyn Store>>) {
        self.store = store;
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.visible.iter().map(|&index| &self.rows[index])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn active_edit(&self) -> Option<&CellEdit> {
        self.active_edit.as_ref()
    }

    /// Text of the pending cell edit, for keyboard input.
    pub fn edit_text_mut(&mut self) -> Option<&mut String> {
        self.active_edit.as_mut().map(|edit| &mut edit.text)
    }

    /// Rows as plain records, for deriving candidate lists offline.
    pub fn records(&self) -> Vec<Record> {
        self.rows
            .iter()
            .map(|row| Record {
                id: row.id.clone(),
                fields: convert::lenient_fields_from_row(self.schema, row),
            })
            .collect()
    }

    /// Replace all rows from backend records. Always a full replace.
    pub fn load(&mut self, records: &[Record]) {
        self.rows = records
            .iter()
            .map(|record| convert::row_from_record(self.schema, record))
            .collect();
        self.snapshot = self.rows.clone();
        self.active_edit = None;
        let ids = self.rows.iter().map(|row| row.id.clone()).collect::<BTreeSet<_>>();
        self.marked.retain(|id| ids.contains(id));
        self.rebuild_visible();
        debug!(table = self.schema.table, rows = self.rows.len(), "rows loaded");
    }

    /// Re-read all rows from the store. Offline this keeps the cache.
    pub fn refresh(&mut self) -> SectionResult<usize> {
        let Some(store) = self.store.clone() else {
            return Ok(self.rows.len());
        };
        let records = store.list(self.schema.kind).map_err(|err| {
            warn!(table = self.schema.table, "refresh failed: {err}");
            err
        })?;
        self.load(&records);
        Ok(self.rows.len())
    }

    /// Show rows whose every filtered column contains its substring,
    /// case-insensitively. Unknown column names are ignored.
    pub fn apply_filter(&mut self, filters: BTreeMap<String, String>) {
        self.filters = filters
            .into_iter()
            .map(|(column, value)| (column, value.trim().to_string()))
            .filter(|(_, value)| !value.is_empty())
            .collect();
        self.rebuild_visible();
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(BTreeMap::new());
    }

    fn matches(&self, row: &Row) -> bool {
        self.filters.iter().all(|(column, needle)| {
            let Some(index) = self.schema.column_index(column) else {
                return true;
            };
            row.values
                .get(index)
                .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false)
        })
    }

    fn rebuild_visible(&mut self) {
        self.visible = (0..self.rows.len())
            .filter(|&index| self.matches(&self.rows[index]))
            .collect();
        if self.selected_row >= self.visible.len() {
            self.selected_row = self.visible.len().saturating_sub(1);
        }
    }

    /// Returns false if already editing.
    pub fn enter_edit_mode(&mut self) -> bool {
        if self.edit_mode {
            return false;
        }
        self.edit_mode = true;
        debug!(table = self.schema.table, "edit mode entered");
        true
    }

    pub fn begin_cell_edit(&mut self, row_id: &str, column: usize) -> SectionResult<()> {
        if !self.edit_mode {
            return Err(SectionError::NotInEditMode);
        }
        if column == 0 {
            return Err(SectionError::IdColumnNotEditable);
        }
        if column >= self.schema.columns.len() {
            return Err(SectionError::ColumnOutOfRange(column));
        }
        if self.row(row_id).is_none() {
            return Err(SectionError::UnknownRow(row_id.to_string()));
        }
        if self.active_edit.is_some() {
            self.commit_cell_edit()?;
        }
        let text = self
            .row(row_id)
            .and_then(|row| row.values.get(column))
            .cloned()
            .unwrap_or_default();
        self.active_edit = Some(CellEdit {
            row_id: row_id.to_string(),
            column,
            text,
        });
        Ok(())
    }

    /// Write the pending text into the cached row. Nothing is sent to the
    /// store until `save_all_edits`.
    pub fn commit_cell_edit(&mut self) -> SectionResult<()> {
        let Some(edit) = self.active_edit.take() else {
            return Err(SectionError::NoActiveEdit);
        };
        let Some(row) = self.rows.iter_mut().find(|row| row.id == edit.row_id) else {
            return Err(SectionError::UnknownRow(edit.row_id));
        };
        if let Some(cell) = row.values.get_mut(edit.column) {
            *cell = edit.text;
        }
        Ok(())
    }

    pub fn cancel_cell_edit(&mut self) {
        self.active_edit = None;
    }

    /// Leave edit mode. With `discard`, every row reverts to the snapshot.
    pub fn exit_edit_mode(&mut self, discard: bool) {
        self.active_edit = None;
        if discard {
            self.rows = self.snapshot.clone();
            self.rebuild_visible();
        }
        self.edit_mode = false;
        debug!(table = self.schema.table, discard, "edit mode left");
    }

    /// Send every row to the store, one update per row.
    ///
    /// All rows are converted first, so a malformed cell aborts the batch
    /// before any store call. A rejected update stops the batch: earlier rows
    /// stay stored, later rows stay edited in memory only, and edit mode
    /// remains active.
    pub fn save_all_edits(&mut self) -> SectionResult<SaveReport> {
        if !self.edit_mode {
            return Err(SectionError::NotInEditMode);
        }
        if self.active_edit.is_some() {
            self.commit_cell_edit()?;
        }

        let mut payloads = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            payloads.push((row.id.clone(), convert::fields_from_row(self.schema, row)?));
        }

        if let Some(store) = self.store.clone() {
            for (index, (id, fields)) in payloads.iter().enumerate() {
                if let Err(source) = store.update(self.schema.kind, id, fields) {
                    let persisted = payloads[..index]
                        .iter()
                        .map(|(id, _)| id.clone())
                        .collect::<Vec<_>>();
                    self.mark_persisted(&persisted);
                    warn!(
                        table = self.schema.table,
                        row = %id,
                        persisted = persisted.len(),
                        "batch save aborted: {source}"
                    );
                    return Err(SaveFailure {
                        failed: id.clone(),
                        persisted,
                        source,
                    }
                    .into());
                }
            }
        }

        self.snapshot = self.rows.clone();
        self.edit_mode = false;
        info!(table = self.schema.table, rows = payloads.len(), "edits saved");
        Ok(SaveReport {
            saved: payloads.len(),
            dropdowns_stale: self.schema.feeds_dropdowns(),
        })
    }

    /// Stored rows become part of the known-good snapshot.
    fn mark_persisted(&mut self, ids: &[RecordId]) {
        for id in ids {
            let Some(row) = self.rows.iter().find(|row| &row.id == id) else {
                continue;
            };
            if let Some(slot) = self.snapshot.iter_mut().find(|slot| &slot.id == id) {
                *slot = row.clone();
            }
        }
    }

    /// Add a record from its input column values (every column but the id).
    pub fn add_record(&mut self, values: Vec<String>) -> SectionResult<RecordId> {
        if self.edit_mode {
            return Err(SectionError::EditModeActive);
        }
        let inputs = self.schema.input_columns();
        if values.len() < inputs.len() {
            return Err(SectionError::MissingField(
                inputs[values.len()].label.to_string(),
            ));
        }
        let draft = Row {
            id: String::new(),
            values: std::iter::once(String::new())
                .chain(values.into_iter().take(inputs.len()))
                .collect(),
        };
        let fields = convert::fields_from_row(self.schema, &draft)?;
        self.insert_fields(fields)
    }

    /// Create a record from wire fields and append it to the cache. Offline,
    /// the identifier is generated locally and no store call is made.
    pub fn insert_fields(&mut self, fields: Fields) -> SectionResult<RecordId> {
        let record = match &self.store {
            Some(store) => store.create(self.schema.kind, &fields).map_err(|err| {
                warn!(table = self.schema.table, "create failed: {err}");
                err
            })?,
            None => Record {
                id: ids::generate(),
                fields,
            },
        };
        let row = convert::row_from_record(self.schema, &record);
        let id = row.id.clone();
        self.snapshot.push(row.clone());
        self.rows.push(row);
        self.visible.push(self.rows.len() - 1);
        info!(table = self.schema.table, id = %id, "record added");
        Ok(id)
    }

    /// Delete the given rows one by one. Failures are collected, not fatal;
    /// only rows the store confirmed are removed from the cache.
    pub fn delete_selected(&mut self, ids: &[RecordId]) -> SectionResult<DeleteReport> {
        if self.edit_mode {
            return Err(SectionError::EditModeActive);
        }
        let mut report = DeleteReport::default();
        for id in ids {
            if self.row(id).is_none() {
                report
                    .failed
                    .push((id.clone(), SectionError::UnknownRow(id.clone()).to_string()));
                continue;
            }
            let result = match &self.store {
                Some(store) => store.delete(self.schema.kind, id),
                None => Ok(()),
            };
            match result {
                Ok(()) => report.deleted.push(id.clone()),
                Err(err) => {
                    warn!(table = self.schema.table, id = %id, "delete failed: {err}");
                    report.failed.push((id.clone(), err.to_string()));
                }
            }
        }

        let deleted = report.deleted.iter().collect::<BTreeSet<_>>();
        self.rows.retain(|row| !deleted.contains(&row.id));
        self.snapshot.retain(|row| !deleted.contains(&row.id));
        self.marked.retain(|id| !deleted.contains(id));
        self.rebuild_visible();

        report.dropdowns_stale = self.schema.feeds_dropdowns() && !report.deleted.is_empty();
        Ok(report)
    }

    pub fn current_row(&self) -> Option<&Row> {
        self.visible
            .get(self.selected_row)
            .map(|&index| &self.rows[index])
    }

    pub fn move_up(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected_row == 0 {
            self.selected_row = self.visible.len() - 1;
        } else {
            self.selected_row -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected_row = (self.selected_row + 1) % self.visible.len();
    }

    pub fn move_left(&mut self) {
        if self.selected_column > 1 {
            self.selected_column -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.selected_column + 1 < self.schema.columns.len() {
            self.selected_column += 1;
        }
    }

    pub fn is_marked(&self, id: &str) -> bool {
        self.marked.contains(id)
    }

    pub fn toggle_mark(&mut self) {
        let Some(id) = self.current_row().map(|row| row.id.clone()) else {
            return;
        };
        if !self.marked.remove(&id) {
            self.marked.insert(id);
        }
    }

    /// Marked rows, or the row under the cursor when nothing is marked.
    pub fn delete_targets(&self) -> Vec<RecordId> {
        if !self.marked.is_empty() {
            return self.marked.iter().cloned().collect();
        }
        self.current_row()
            .map(|row| vec![row.id.clone()])
            .unwrap_or_default()
    }
}
