/// Backing store boundary: four operations per record kind.
mod migrations;
mod rest;
mod sqlite;

use tracing::info;

use crate::errors::StoreResult;
use crate::types::{Fields, Record, RecordKind, ReferenceData};

pub use rest::RestStore;
pub use sqlite::SqliteStore;

/// A relational backend holding one table per record kind.
///
/// Calls are synchronous and have no retry policy; callers surface failures
/// verbatim.
pub trait Store {
    fn list(&self, kind: RecordKind) -> StoreResult<Vec<Record>>;

    /// Insert a record; the store assigns the identifier.
    fn create(&self, kind: RecordKind, fields: &Fields) -> StoreResult<Record>;

    fn update(&self, kind: RecordKind, id: &str, fields: &Fields) -> StoreResult<Record>;

    fn delete(&self, kind: RecordKind, id: &str) -> StoreResult<()>;

    /// Short human-readable description for the status bar.
    fn describe(&self) -> String;
}

/// Load all six reference tables.
pub fn load_reference_data(store: &dyn Store) -> StoreResult<ReferenceData> {
    let mut data = ReferenceData::default();
    for kind in RecordKind::REFERENCE {
        let records = store.list(kind)?;
        data.set_records(kind, &records);
    }
    info!(
        sections = data.sections.len(),
        staff = data.staff.len(),
        inventory = data.inventory.len(),
        "reference data loaded from {}",
        store.describe()
    );
    Ok(data)
}
