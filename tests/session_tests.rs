use std::path::PathBuf;
use std::rc::Rc;

use shiftplan::config::{Backend, Config};
use shiftplan::session::Session;
use shiftplan::store::Store;
use shiftplan::types::{RecordKind, ReferenceData};

mod common;
use common::{MockStore, section_record, temp_path};

#[test]
fn offline_session_serves_demo_rows() {
    let mut session = Session::new(None, None);
    let loaded = session.load_all();

    assert_eq!(session.describe(), "offline");
    assert_eq!(loaded.len(), 7);
    assert_eq!(loaded[&RecordKind::Section].len(), 3);
    assert_eq!(loaded[&RecordKind::Shift].len(), 3);
    assert!(session.take_warnings().is_empty());
}

#[test]
fn unreachable_store_falls_back_to_offline() {
    let store: Rc<dyn Store> = MockStore::unreachable();
    let mut session = Session::new(Some(store), None);
    assert!(session.is_connected());

    let loaded = session.load_all();

    assert!(!session.is_connected());
    assert!(!loaded[&RecordKind::Staff].is_empty());
    let warnings = session.take_warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("connection refused"));
}

#[test]
fn connected_session_reads_every_table() {
    let mock = MockStore::with_records(
        RecordKind::Section,
        vec![section_record("s1", "Abschnitt Ost", "")],
    );
    let store: Rc<dyn Store> = mock.clone();
    let mut session = Session::new(Some(store), None);

    let loaded = session.load_all();

    assert_eq!(loaded[&RecordKind::Section].len(), 1);
    assert!(loaded[&RecordKind::Shift].is_empty());
    assert_eq!(mock.calls().len(), 7);
    assert_eq!(session.describe(), "mock");
}

#[test]
fn dropdowns_prefer_store_then_import_then_defaults() {
    let mock = MockStore::with_records(
        RecordKind::Section,
        vec![section_record("s1", "Abschnitt Ost", "")],
    );
    let store: Rc<dyn Store> = mock.clone();
    let session = Session::new(Some(store), None);
    let dropdowns = session.dropdowns(&ReferenceData::default());
    assert_eq!(dropdowns.sections, ["Abschnitt Ost"]);

    let imported = ReferenceData {
        sections: shiftplan::sample::reference_data().sections[..1].to_vec(),
        ..ReferenceData::default()
    };
    let session = Session::new(None, Some(imported));
    let dropdowns = session.dropdowns(&ReferenceData::default());
    assert_eq!(dropdowns.sections, ["Abschnitt 1"]);

    let session = Session::new(None, None);
    let dropdowns = session.dropdowns(&ReferenceData::default());
    assert_eq!(dropdowns.shift_times, ["Tag", "Nacht", "Spät"]);
}

#[test]
fn open_degrades_on_bad_paths() {
    let config = Config {
        backend: Backend::Local(PathBuf::from("/nonexistent-dir/for/shiftplan.db")),
        import: Some(temp_path("session_missing", "xlsx")),
    };
    let mut session = Session::open(&config);

    assert!(!session.is_connected());
    let warnings = session.take_warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[1].starts_with("Import failed"));
}

#[test]
fn open_local_database() {
    let path = temp_path("session_local", "db");
    let config = Config {
        backend: Backend::Local(path.clone()),
        import: None,
    };
    let mut session = Session::open(&config);

    assert!(session.is_connected());
    let loaded = session.load_all();
    assert!(loaded.values().all(Vec::is_empty));
    // An empty store still yields usable candidate lists.
    let dropdowns = session.dropdowns(&ReferenceData::default());
    assert_eq!(dropdowns.sections.len(), 3);
    std::fs::remove_file(&path).ok();
}
