/// Application context handed to every section: the optional store and the spreadsheet fallback.
use std::collections::BTreeMap;
use std::rc::Rc;

use tracing::{info, warn};

use crate::config::{Backend, Config};
use crate::dropdowns::DropdownData;
use crate::errors::StoreResult;
use crate::store::{RestStore, SqliteStore, Store, load_reference_data};
use crate::types::{Record, RecordKind, ReferenceData};
use crate::{sample, spreadsheet};

pub struct Session {
    store: Option<Rc<dyn Store>>,
    imported: Option<ReferenceData>,
    warnings: Vec<String>,
}

impl Session {
    pub fn new(store: Option<Rc<dyn Store>>, imported: Option<ReferenceData>) -> Self {
        Self {
            store,
            imported,
            warnings: Vec::new(),
        }
    }

    /// Builds the store named by the config. Failures degrade to offline mode
    /// and are kept as warnings for the user.
    pub fn open(config: &Config) -> Self {
        let mut session = Self::new(None, None);
        let store = match &config.backend {
            Backend::Remote { url, key } => {
                Some(Rc::new(RestStore::new(url, key)) as Rc<dyn Store>)
            }
            Backend::Local(path) => match SqliteStore::open(path) {
                Ok(store) => Some(Rc::new(store) as Rc<dyn Store>),
                Err(err) => {
                    session.warn(format!(
                        "Could not open {}: {err}. Working offline.",
                        path.display()
                    ));
                    None
                }
            },
            Backend::Offline => None,
        };
        session.store = store;
        if let Some(path) = &config.import {
            match spreadsheet::import(path) {
                Ok(data) if data.is_empty() => {
                    session.warn(format!("{} contains no usable data.", path.display()))
                }
                Ok(data) => session.imported = Some(data),
                Err(err) => session.warn(format!("Import failed: {err}")),
            }
        }
        session
    }

    fn warn(&mut self, message: String) {
        warn!("{message}");
        self.warnings.push(message);
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub fn store(&self) -> Option<Rc<dyn Store>> {
        self.store.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.store.is_some()
    }

    pub fn describe(&self) -> String {
        match &self.store {
            Some(store) => store.describe(),
            None => "offline".to_string(),
        }
    }

    /// Reference data for offline sections: the import if present,
    /// otherwise the demo set.
    fn offline_reference(&self) -> ReferenceData {
        self.imported
            .clone()
            .unwrap_or_else(sample::reference_data)
    }

    /// Rows of every kind. When the store cannot be reached the session goes
    /// offline and demo rows are returned instead.
    pub fn load_all(&mut self) -> BTreeMap<RecordKind, Vec<Record>> {
        if let Some(store) = self.store.clone() {
            match list_all(store.as_ref()) {
                Ok(loaded) => {
                    info!(store = %store.describe(), "all tables loaded");
                    return loaded;
                }
                Err(err) => {
                    self.warn(format!(
                        "Could not reach {}: {err}. Local data will be used.",
                        store.describe()
                    ));
                    self.store = None;
                }
            }
        }

        let reference = self.offline_reference();
        let mut loaded = RecordKind::REFERENCE
            .into_iter()
            .map(|kind| (kind, reference.records(kind)))
            .collect::<BTreeMap<_, _>>();
        loaded.insert(RecordKind::Shift, sample::shifts());
        loaded
    }

    /// Rebuild every candidate list. Connected: read the reference tables
    /// from the store; offline: use the rows held locally. Empty sources fall
    /// back to the import and then to hardcoded defaults.
    pub fn dropdowns(&self, local: &ReferenceData) -> DropdownData {
        let reference = match &self.store {
            Some(store) => load_reference_data(store.as_ref()).unwrap_or_else(|err| {
                warn!("candidate lists from local rows: {err}");
                local.clone()
            }),
            None => local.clone(),
        };
        if !reference.is_empty() {
            return DropdownData::from_reference(&reference);
        }
        match &self.imported {
            Some(imported) => DropdownData::from_reference(imported),
            None => DropdownData::fallback(),
        }
    }
}

fn list_all(store: &dyn Store) -> StoreResult<BTreeMap<RecordKind, Vec<Record>>> {
    let mut loaded = BTreeMap::new();
    for kind in RecordKind::REFERENCE.into_iter().chain([RecordKind::Shift]) {
        loaded.insert(kind, store.list(kind)?);
    }
    Ok(loaded)
}
