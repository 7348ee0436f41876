/// Static column schemas, one per record kind.
use crate::types::RecordKind;

/// Wire keys as used by the hosted backend tables.
pub mod keys {
    pub const ID: &str = "id";

    pub const SECTION_NAME: &str = "abschnitt";
    pub const SECTION_DESCRIPTION: &str = "beschreibung";

    pub const SHIFT_TIME_LABEL: &str = "schicht";
    pub const SHIFT_TIME_START: &str = "zeit_von";
    pub const SHIFT_TIME_END: &str = "zeit_bis";

    pub const NAME: &str = "name";
    pub const PHONE: &str = "telefonnummer";
    pub const EMAIL: &str = "email";
    pub const STAFF_FUNCTION: &str = "funktion";

    pub const MACHINE_NAME: &str = "maschine";
    pub const MACHINE_COMPANY: &str = "firma";
    pub const MACHINE_TYPE: &str = "type";

    pub const SHIFT_DATE: &str = "datum_von";
    pub const SHIFT_TITLE: &str = "titel";
    pub const SHIFT_TIME: &str = "schichtzeit";
    pub const SHIFT_SECTION: &str = "abschnitt";
    pub const SHIFT_CONSTRUCTION_LEADERS: &str = "baufuhrer";
    pub const SHIFT_WORK_LEADERS: &str = "arbeitsleiter";
    pub const SHIFT_ACTIVITY: &str = "tatigkeit";
    pub const SHIFT_STAFF_GROUP: &str = "baugruppe";
    pub const SHIFT_COORDINATOR: &str = "ako";
    pub const SHIFT_SAFETY_OFFICER: &str = "sc_1";
    pub const SHIFT_SITE_SAFETY: &str = "siwa_1";
    pub const SHIFT_LOGISTICS: &str = "logistikpersonal";
    pub const SHIFT_TRACK_MACHINES: &str = "gleisbaumaschine";
    pub const SHIFT_MACHINES: &str = "diverse_maschinen";
    pub const SHIFT_COMMENTS: &str = "kommentare";
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    /// The record identifier. Always column 0, never editable.
    Id,
    Text,
    /// Displayed as DD.MM.YYYY, stored as YYYY-MM-DD.
    Date,
    /// Zero or more names, displayed comma-joined.
    List,
    /// One value out of a candidate list.
    Choice,
}

/// Which candidate list backs a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Candidates {
    Sections,
    ShiftTimes,
    ConstructionLeaders,
    WorkLeaders,
    Staff,
    LogisticsStaff,
    Coordinators,
    SafetyOfficers,
    SiteSafety,
    Machines,
    TrackMachines,
    FunctionTypes,
    MachineTypes,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: &'static str,
    pub key: &'static str,
    pub kind: ColumnKind,
    pub candidates: Option<Candidates>,
    pub width: u16,
}

const fn column(label: &'static str, key: &'static str, kind: ColumnKind, width: u16) -> Column {
    Column {
        label,
        key,
        kind,
        candidates: None,
        width,
    }
}

const fn picked(
    label: &'static str,
    key: &'static str,
    kind: ColumnKind,
    candidates: Candidates,
    width: u16,
) -> Column {
    Column {
        label,
        key,
        kind,
        candidates: Some(candidates),
        width,
    }
}

const ID_COLUMN: Column = column("ID", keys::ID, ColumnKind::Id, 10);

#[derive(Debug, PartialEq, Eq)]
pub struct TableSchema {
    pub kind: RecordKind,
    pub table: &'static str,
    pub title: &'static str,
    pub columns: &'static [Column],
}

impl TableSchema {
    /// Mutations of this table change candidate lists shown elsewhere.
    pub fn feeds_dropdowns(&self) -> bool {
        self.kind.is_reference()
    }

    /// Columns the user fills in when adding a record (everything but the id).
    pub fn input_columns(&self) -> &'static [Column] {
        &self.columns[1..]
    }

    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.label == label)
    }
}

pub static SECTIONS: TableSchema = TableSchema {
    kind: RecordKind::Section,
    table: "abschnitte",
    title: "Sections",
    columns: &[
        ID_COLUMN,
        column("Name", keys::SECTION_NAME, ColumnKind::Text, 20),
        column("Description", keys::SECTION_DESCRIPTION, ColumnKind::Text, 36),
    ],
};

pub static SHIFT_TIMES: TableSchema = TableSchema {
    kind: RecordKind::ShiftTime,
    table: "schichtzeiten",
    title: "Shift times",
    columns: &[
        ID_COLUMN,
        column("Shift", keys::SHIFT_TIME_LABEL, ColumnKind::Text, 16),
        column("From", keys::SHIFT_TIME_START, ColumnKind::Text, 8),
        column("To", keys::SHIFT_TIME_END, ColumnKind::Text, 8),
    ],
};

pub static WORK_LEADERS: TableSchema = TableSchema {
    kind: RecordKind::WorkLeader,
    table: "arbeitsleiter",
    title: "Work leaders",
    columns: &[
        ID_COLUMN,
        column("Name", keys::NAME, ColumnKind::Text, 20),
        column("Phone", keys::PHONE, ColumnKind::Text, 16),
        column("Email", keys::EMAIL, ColumnKind::Text, 26),
    ],
};

pub static CONSTRUCTION_LEADERS: TableSchema = TableSchema {
    kind: RecordKind::ConstructionLeader,
    table: "baufuhrer",
    title: "Construction leaders",
    columns: &[
        ID_COLUMN,
        column("Name", keys::NAME, ColumnKind::Text, 20),
        column("Phone", keys::PHONE, ColumnKind::Text, 16),
        column("Email", keys::EMAIL, ColumnKind::Text, 26),
    ],
};

pub static STAFF: TableSchema = TableSchema {
    kind: RecordKind::Staff,
    table: "personal",
    title: "Staff",
    columns: &[
        ID_COLUMN,
        column("Name", keys::NAME, ColumnKind::Text, 20),
        picked(
            "Function",
            keys::STAFF_FUNCTION,
            ColumnKind::Choice,
            Candidates::FunctionTypes,
            12,
        ),
        column("Phone", keys::PHONE, ColumnKind::Text, 16),
        column("Email", keys::EMAIL, ColumnKind::Text, 26),
    ],
};

pub static INVENTORY: TableSchema = TableSchema {
    kind: RecordKind::Inventory,
    table: "inventar",
    title: "Inventory",
    columns: &[
        ID_COLUMN,
        column("Machine", keys::MACHINE_NAME, ColumnKind::Text, 20),
        column("Company", keys::MACHINE_COMPANY, ColumnKind::Text, 16),
        picked(
            "Type",
            keys::MACHINE_TYPE,
            ColumnKind::Choice,
            Candidates::MachineTypes,
            12,
        ),
    ],
};

pub static SHIFTS: TableSchema = TableSchema {
    kind: RecordKind::Shift,
    table: "schichtplanung",
    title: "Shifts",
    columns: &[
        ID_COLUMN,
        column("Date", keys::SHIFT_DATE, ColumnKind::Date, 10),
        column("Title", keys::SHIFT_TITLE, ColumnKind::Text, 16),
        picked("Time", keys::SHIFT_TIME, ColumnKind::Text, Candidates::ShiftTimes, 8),
        picked(
            "Section",
            keys::SHIFT_SECTION,
            ColumnKind::Text,
            Candidates::Sections,
            12,
        ),
        picked(
            "Constr. leaders",
            keys::SHIFT_CONSTRUCTION_LEADERS,
            ColumnKind::List,
            Candidates::ConstructionLeaders,
            16,
        ),
        picked(
            "Work leaders",
            keys::SHIFT_WORK_LEADERS,
            ColumnKind::List,
            Candidates::WorkLeaders,
            16,
        ),
        column("Activity", keys::SHIFT_ACTIVITY, ColumnKind::Text, 16),
        picked(
            "Staff group",
            keys::SHIFT_STAFF_GROUP,
            ColumnKind::List,
            Candidates::Staff,
            16,
        ),
        picked(
            "Coordinator",
            keys::SHIFT_COORDINATOR,
            ColumnKind::List,
            Candidates::Coordinators,
            12,
        ),
        picked(
            "Safety officer",
            keys::SHIFT_SAFETY_OFFICER,
            ColumnKind::List,
            Candidates::SafetyOfficers,
            12,
        ),
        picked(
            "Site safety",
            keys::SHIFT_SITE_SAFETY,
            ColumnKind::List,
            Candidates::SiteSafety,
            12,
        ),
        picked(
            "Logistics",
            keys::SHIFT_LOGISTICS,
            ColumnKind::List,
            Candidates::LogisticsStaff,
            14,
        ),
        picked(
            "Track machines",
            keys::SHIFT_TRACK_MACHINES,
            ColumnKind::List,
            Candidates::TrackMachines,
            16,
        ),
        picked(
            "Machines",
            keys::SHIFT_MACHINES,
            ColumnKind::List,
            Candidates::Machines,
            16,
        ),
        column("Comments", keys::SHIFT_COMMENTS, ColumnKind::Text, 20),
    ],
};

pub fn schema_for(kind: RecordKind) -> &'static TableSchema {
    match kind {
        RecordKind::Section => &SECTIONS,
        RecordKind::ShiftTime => &SHIFT_TIMES,
        RecordKind::WorkLeader => &WORK_LEADERS,
        RecordKind::ConstructionLeader => &CONSTRUCTION_LEADERS,
        RecordKind::Staff => &STAFF,
        RecordKind::Inventory => &INVENTORY,
        RecordKind::Shift => &SHIFTS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_schema_starts_with_the_id_column() {
        for kind in RecordKind::REFERENCE.iter().chain([RecordKind::Shift].iter()) {
            let schema = schema_for(*kind);
            assert_eq!(schema.kind, *kind);
            assert_eq!(schema.columns[0].kind, ColumnKind::Id);
            assert!(
                schema.columns[1..]
                    .iter()
                    .all(|column| column.kind != ColumnKind::Id)
            );
        }
    }

    #[test]
    fn shift_schema_has_all_sixteen_columns() {
        assert_eq!(SHIFTS.columns.len(), 16);
        assert_eq!(SHIFTS.column_index("Date"), Some(1));
        assert!(!SHIFTS.feeds_dropdowns());
        assert!(STAFF.feeds_dropdowns());
    }
}
