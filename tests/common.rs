#![allow(dead_code)]
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use shiftplan::errors::{StoreError, StoreResult};
use shiftplan::schema::schema_for;
use shiftplan::section::DataSection;
use shiftplan::store::Store;
use shiftplan::types::{FieldValue, Fields, Record, RecordKind};

/// One store call as seen by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    List(RecordKind),
    Create(RecordKind),
    Update(RecordKind, String),
    Delete(RecordKind, String),
}

/// In-memory store that records every call and rejects configured ids.
#[derive(Default)]
pub struct MockStore {
    pub records: RefCell<BTreeMap<RecordKind, Vec<Record>>>,
    pub calls: RefCell<Vec<Call>>,
    pub failing: RefCell<BTreeSet<String>>,
    pub offline: bool,
    next_id: RefCell<usize>,
}

impl MockStore {
    pub fn with_records(kind: RecordKind, records: Vec<Record>) -> Rc<Self> {
        let store = Self::default();
        store.records.borrow_mut().insert(kind, records);
        Rc::new(store)
    }

    /// A store whose every call fails as if the network were down.
    pub fn unreachable() -> Rc<Self> {
        Rc::new(Self {
            offline: true,
            ..Self::default()
        })
    }

    pub fn fail_on(&self, id: &str) {
        self.failing.borrow_mut().insert(id.to_string());
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn stored(&self, kind: RecordKind, id: &str) -> Option<Record> {
        self.records
            .borrow()
            .get(&kind)
            .and_then(|records| records.iter().find(|record| record.id == id).cloned())
    }

    fn check(&self, id: &str) -> StoreResult<()> {
        if self.offline {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        if self.failing.borrow().contains(id) {
            return Err(StoreError::Rejected {
                status: 409,
                message: format!("row {id} is locked"),
            });
        }
        Ok(())
    }
}

impl Store for MockStore {
    fn list(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        self.calls.borrow_mut().push(Call::List(kind));
        self.check("")?;
        Ok(self.records.borrow().get(&kind).cloned().unwrap_or_default())
    }

    fn create(&self, kind: RecordKind, fields: &Fields) -> StoreResult<Record> {
        self.calls.borrow_mut().push(Call::Create(kind));
        // Shift creates can be rejected per date.
        let date = fields
            .get("datum_von")
            .map(FieldValue::as_text)
            .unwrap_or_default();
        self.check(&date)?;
        let mut next = self.next_id.borrow_mut();
        *next += 1;
        let record = Record::new(format!("mock-{next}"), fields.clone());
        self.records
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    fn update(&self, kind: RecordKind, id: &str, fields: &Fields) -> StoreResult<Record> {
        self.calls
            .borrow_mut()
            .push(Call::Update(kind, id.to_string()));
        self.check(id)?;
        let mut records = self.records.borrow_mut();
        let Some(record) = records
            .get_mut(&kind)
            .and_then(|records| records.iter_mut().find(|record| record.id == id))
        else {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        };
        record.fields.extend(fields.clone());
        Ok(record.clone())
    }

    fn delete(&self, kind: RecordKind, id: &str) -> StoreResult<()> {
        self.calls
            .borrow_mut()
            .push(Call::Delete(kind, id.to_string()));
        self.check(id)?;
        if let Some(records) = self.records.borrow_mut().get_mut(&kind) {
            records.retain(|record| record.id != id);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

pub fn text_fields(pairs: &[(&str, &str)]) -> Fields {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), FieldValue::text(*value)))
        .collect()
}

pub fn section_record(id: &str, name: &str, description: &str) -> Record {
    Record::new(
        id,
        text_fields(&[("abschnitt", name), ("beschreibung", description)]),
    )
}

/// A section table over the given store, already loaded from it.
pub fn connected_section(store: &Rc<MockStore>, kind: RecordKind) -> DataSection {
    let shared: Rc<dyn Store> = store.clone();
    let mut section = DataSection::new(schema_for(kind), Some(shared));
    let records = store.records.borrow().get(&kind).cloned().unwrap_or_default();
    section.load(&records);
    section
}

/// Unique path inside the system temp dir; any previous file is removed.
pub fn temp_path(name: &str, ext: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("shiftplan_{}_{}.{}", name, std::process::id(), ext));
    fs::remove_file(&path).ok();
    path
}
