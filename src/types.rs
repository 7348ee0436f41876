use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::errors::{StoreError, StoreResult};
use crate::schema::keys;

/// Opaque record identifier, generated by the store (or locally when offline).
pub type RecordId = String;

/// Wire-level field values keyed by column key.
pub type Fields = BTreeMap<String, FieldValue>;

pub const FUNCTION_CONSTRUCTION_WORKER: &str = "Bauarbeiter";
pub const FUNCTION_COORDINATOR: &str = "AKO";
pub const FUNCTION_SAFETY_OFFICER: &str = "SC";
pub const FUNCTION_SITE_SAFETY: &str = "SIWA";
pub const FUNCTION_LOGISTICS: &str = "Logistik";
pub const FUNCTION_LOCO_DRIVER: &str = "Lokfuhrer";
pub const FUNCTION_ESCORT: &str = "Begleiter";

/// Functions whose holders are offered as logistics staff.
pub const LOGISTICS_FUNCTIONS: [&str; 3] =
    [FUNCTION_LOGISTICS, FUNCTION_LOCO_DRIVER, FUNCTION_ESCORT];

pub const MACHINE_TRACK: &str = "GBM";
pub const MACHINE_TRANSFER: &str = "ZW-Fahrzeug";
pub const MACHINE_MISC: &str = "Diverses";

pub const DEFAULT_FUNCTIONS: [&str; 7] = [
    FUNCTION_CONSTRUCTION_WORKER,
    FUNCTION_COORDINATOR,
    FUNCTION_SAFETY_OFFICER,
    FUNCTION_SITE_SAFETY,
    FUNCTION_LOGISTICS,
    FUNCTION_LOCO_DRIVER,
    FUNCTION_ESCORT,
];

pub const DEFAULT_MACHINE_TYPES: [&str; 3] = [MACHINE_TRACK, MACHINE_TRANSFER, MACHINE_MISC];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, clap::ValueEnum)]
pub enum RecordKind {
    Section,
    ShiftTime,
    WorkLeader,
    ConstructionLeader,
    Staff,
    Inventory,
    Shift,
}

impl RecordKind {
    /// The six lookup tables that feed candidate lists elsewhere.
    pub const REFERENCE: [RecordKind; 6] = [
        RecordKind::Section,
        RecordKind::ShiftTime,
        RecordKind::WorkLeader,
        RecordKind::ConstructionLeader,
        RecordKind::Staff,
        RecordKind::Inventory,
    ];

    pub fn is_reference(self) -> bool {
        self != RecordKind::Shift
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Section => "Section",
            RecordKind::ShiftTime => "Shift time",
            RecordKind::WorkLeader => "Work leader",
            RecordKind::ConstructionLeader => "Construction leader",
            RecordKind::Staff => "Staff",
            RecordKind::Inventory => "Inventory",
            RecordKind::Shift => "Shift",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Null,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::String(s) => FieldValue::Text(s.clone()),
            Value::Array(items) => FieldValue::List(
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::Null => None,
                        Value::String(s) => Some(s.clone()),
                        other => Some(other.to_string()),
                    })
                    .collect(),
            ),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
            FieldValue::Null => Value::Null,
        }
    }

    /// Plain text view; lists are joined, null is empty.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
            FieldValue::Null => String::new(),
        }
    }
}

/// A store record: identifier plus wire fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub id: RecordId,
    pub fields: Fields,
}

impl Record {
    pub fn new(id: impl Into<RecordId>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn text(&self, key: &str) -> String {
        self.fields
            .get(key)
            .map(FieldValue::as_text)
            .unwrap_or_default()
    }

    pub fn list(&self, key: &str) -> Vec<String> {
        match self.fields.get(key) {
            Some(FieldValue::List(items)) => items.clone(),
            Some(FieldValue::Text(s)) => split_list(s),
            _ => Vec::new(),
        }
    }

    pub fn from_json(value: &Value) -> StoreResult<Self> {
        let Value::Object(object) = value else {
            return Err(StoreError::Malformed(format!("expected an object, got {value}")));
        };
        let id = match object.get(keys::ID) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(StoreError::Malformed("record without id".to_string())),
        };
        let fields = object
            .iter()
            .filter(|(key, _)| key.as_str() != keys::ID)
            .map(|(key, value)| (key.clone(), FieldValue::from_json(value)))
            .collect();
        Ok(Self { id, fields })
    }
}

pub fn fields_to_json(fields: &Fields) -> Value {
    let object: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect();
    Value::Object(object)
}

/// Splits a comma-joined display string into trimmed, non-empty names.
/// Repeated names are kept once, at their first position.
pub fn split_list(value: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for item in value.split(',').map(str::trim) {
        if !item.is_empty() && !names.iter().any(|name| name == item) {
            names.push(item.to_string());
        }
    }
    names
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub id: RecordId,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftTime {
    pub id: RecordId,
    pub label: String,
    pub start: String,
    pub end: String,
}

/// Work leaders and construction leaders share one shape.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leader {
    pub id: RecordId,
    pub name: String,
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Staff {
    pub id: RecordId,
    pub name: String,
    pub function: String,
    pub phone: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub id: RecordId,
    pub name: String,
    pub company: String,
    pub machine_type: String,
}

impl From<&Record> for Section {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(keys::SECTION_NAME),
            description: record.text(keys::SECTION_DESCRIPTION),
        }
    }
}

impl From<&Section> for Record {
    fn from(section: &Section) -> Self {
        let mut fields = Fields::new();
        fields.insert(keys::SECTION_NAME.into(), FieldValue::text(&section.name));
        fields.insert(
            keys::SECTION_DESCRIPTION.into(),
            FieldValue::text(&section.description),
        );
        Record::new(section.id.clone(), fields)
    }
}

impl From<&Record> for ShiftTime {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            label: record.text(keys::SHIFT_TIME_LABEL),
            start: record.text(keys::SHIFT_TIME_START),
            end: record.text(keys::SHIFT_TIME_END),
        }
    }
}

impl From<&ShiftTime> for Record {
    fn from(time: &ShiftTime) -> Self {
        let mut fields = Fields::new();
        fields.insert(keys::SHIFT_TIME_LABEL.into(), FieldValue::text(&time.label));
        fields.insert(keys::SHIFT_TIME_START.into(), FieldValue::text(&time.start));
        fields.insert(keys::SHIFT_TIME_END.into(), FieldValue::text(&time.end));
        Record::new(time.id.clone(), fields)
    }
}

impl From<&Record> for Leader {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(keys::NAME),
            phone: record.text(keys::PHONE),
            email: record.text(keys::EMAIL),
        }
    }
}

impl From<&Leader> for Record {
    fn from(leader: &Leader) -> Self {
        let mut fields = Fields::new();
        fields.insert(keys::NAME.into(), FieldValue::text(&leader.name));
        fields.insert(keys::PHONE.into(), FieldValue::text(&leader.phone));
        fields.insert(keys::EMAIL.into(), FieldValue::text(&leader.email));
        Record::new(leader.id.clone(), fields)
    }
}

impl From<&Record> for Staff {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(keys::NAME),
            function: record.text(keys::STAFF_FUNCTION),
            phone: record.text(keys::PHONE),
            email: record.text(keys::EMAIL),
        }
    }
}

impl From<&Staff> for Record {
    fn from(staff: &Staff) -> Self {
        let mut fields = Fields::new();
        fields.insert(keys::NAME.into(), FieldValue::text(&staff.name));
        fields.insert(keys::STAFF_FUNCTION.into(), FieldValue::text(&staff.function));
        fields.insert(keys::PHONE.into(), FieldValue::text(&staff.phone));
        fields.insert(keys::EMAIL.into(), FieldValue::text(&staff.email));
        Record::new(staff.id.clone(), fields)
    }
}

impl From<&Record> for Machine {
    fn from(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(keys::MACHINE_NAME),
            company: record.text(keys::MACHINE_COMPANY),
            machine_type: record.text(keys::MACHINE_TYPE),
        }
    }
}

impl From<&Machine> for Record {
    fn from(machine: &Machine) -> Self {
        let mut fields = Fields::new();
        fields.insert(keys::MACHINE_NAME.into(), FieldValue::text(&machine.name));
        fields.insert(keys::MACHINE_COMPANY.into(), FieldValue::text(&machine.company));
        fields.insert(keys::MACHINE_TYPE.into(), FieldValue::text(&machine.machine_type));
        Record::new(machine.id.clone(), fields)
    }
}

///A single planned shift on one calendar day
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Shift {
    pub date: NaiveDate,
    pub title: String,
    pub shift_time: String,
    pub section: String,
    pub construction_leaders: Vec<String>,
    pub work_leaders: Vec<String>,
    pub activity: String,
    pub staff_group: Vec<String>,
    pub coordinator: Vec<String>,
    pub safety_officer: Vec<String>,
    pub site_safety: Vec<String>,
    pub logistics_staff: Vec<String>,
    pub track_machines: Vec<String>,
    pub machines: Vec<String>,
    pub comments: String,
}

impl Shift {
    pub fn to_fields(&self) -> Fields {
        let list = |items: &Vec<String>| FieldValue::List(items.clone());
        let mut fields = Fields::new();
        fields.insert(
            keys::SHIFT_DATE.into(),
            FieldValue::Text(self.date.format("%Y-%m-%d").to_string()),
        );
        fields.insert(keys::SHIFT_TITLE.into(), FieldValue::text(&self.title));
        fields.insert(keys::SHIFT_TIME.into(), FieldValue::text(&self.shift_time));
        fields.insert(keys::SHIFT_SECTION.into(), FieldValue::text(&self.section));
        fields.insert(
            keys::SHIFT_CONSTRUCTION_LEADERS.into(),
            list(&self.construction_leaders),
        );
        fields.insert(keys::SHIFT_WORK_LEADERS.into(), list(&self.work_leaders));
        fields.insert(keys::SHIFT_ACTIVITY.into(), FieldValue::text(&self.activity));
        fields.insert(keys::SHIFT_STAFF_GROUP.into(), list(&self.staff_group));
        fields.insert(keys::SHIFT_COORDINATOR.into(), list(&self.coordinator));
        fields.insert(keys::SHIFT_SAFETY_OFFICER.into(), list(&self.safety_officer));
        fields.insert(keys::SHIFT_SITE_SAFETY.into(), list(&self.site_safety));
        fields.insert(keys::SHIFT_LOGISTICS.into(), list(&self.logistics_staff));
        fields.insert(keys::SHIFT_TRACK_MACHINES.into(), list(&self.track_machines));
        fields.insert(keys::SHIFT_MACHINES.into(), list(&self.machines));
        fields.insert(keys::SHIFT_COMMENTS.into(), FieldValue::text(&self.comments));
        fields
    }
}

/// The six reference lists, as loaded from a store, a spreadsheet or sample data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub sections: Vec<Section>,
    pub shift_times: Vec<ShiftTime>,
    pub work_leaders: Vec<Leader>,
    pub construction_leaders: Vec<Leader>,
    pub staff: Vec<Staff>,
    pub inventory: Vec<Machine>,
}

impl ReferenceData {
    /// Builds the reference lists from rows loaded per kind.
    pub fn from_loaded(loaded: &BTreeMap<RecordKind, Vec<Record>>) -> Self {
        let mut data = Self::default();
        for (kind, records) in loaded {
            data.set_records(*kind, records);
        }
        data
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
            && self.shift_times.is_empty()
            && self.work_leaders.is_empty()
            && self.construction_leaders.is_empty()
            && self.staff.is_empty()
            && self.inventory.is_empty()
    }

    /// Replaces the list of one kind from raw records. Shifts are ignored.
    pub fn set_records(&mut self, kind: RecordKind, records: &[Record]) {
        match kind {
            RecordKind::Section => self.sections = records.iter().map(Section::from).collect(),
            RecordKind::ShiftTime => {
                self.shift_times = records.iter().map(ShiftTime::from).collect()
            }
            RecordKind::WorkLeader => {
                self.work_leaders = records.iter().map(Leader::from).collect()
            }
            RecordKind::ConstructionLeader => {
                self.construction_leaders = records.iter().map(Leader::from).collect()
            }
            RecordKind::Staff => self.staff = records.iter().map(Staff::from).collect(),
            RecordKind::Inventory => {
                self.inventory = records.iter().map(Machine::from).collect()
            }
            RecordKind::Shift => {}
        }
    }

    pub fn records(&self, kind: RecordKind) -> Vec<Record> {
        match kind {
            RecordKind::Section => self.sections.iter().map(Record::from).collect(),
            RecordKind::ShiftTime => self.shift_times.iter().map(Record::from).collect(),
            RecordKind::WorkLeader => self.work_leaders.iter().map(Record::from).collect(),
            RecordKind::ConstructionLeader => {
                self.construction_leaders.iter().map(Record::from).collect()
            }
            RecordKind::Staff => self.staff.iter().map(Record::from).collect(),
            RecordKind::Inventory => self.inventory.iter().map(Record::from).collect(),
            RecordKind::Shift => Vec::new(),
        }
    }
}
