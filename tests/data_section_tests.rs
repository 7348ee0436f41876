use std::collections::BTreeMap;

use shiftplan::errors::SectionError;
use shiftplan::ids;
use shiftplan::schema::schema_for;
use shiftplan::section::DataSection;
use shiftplan::types::{FieldValue, RecordKind};

mod common;
use common::{Call, MockStore, connected_section, section_record, text_fields};

fn sections_store() -> std::rc::Rc<MockStore> {
    MockStore::with_records(
        RecordKind::Section,
        vec![
            section_record("s1", "Abschnitt 1", "Nordkopf"),
            section_record("s2", "Abschnitt 2", "Südkopf"),
            section_record("s3", "Brücke", "nord-ost Rampe"),
        ],
    )
}

fn visible_ids(section: &DataSection) -> Vec<String> {
    section.visible_rows().map(|row| row.id.clone()).collect()
}

fn filters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(label, value)| (label.to_string(), value.to_string()))
        .collect()
}

fn edit_cell(section: &mut DataSection, id: &str, column: usize, text: &str) {
    section.begin_cell_edit(id, column).expect("begin edit");
    let buffer = section.edit_text_mut().expect("edit buffer");
    buffer.clear();
    buffer.push_str(text);
    section.commit_cell_edit().expect("commit edit");
}

fn name_of(section: &DataSection, id: &str) -> String {
    section.row(id).expect("row").values[1].clone()
}

#[test]
fn filter_matches_every_column_case_insensitively() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    section.apply_filter(filters(&[("Name", "ABSCHNITT")]));
    assert_eq!(visible_ids(&section), ["s1", "s2"]);

    section.apply_filter(filters(&[("Name", "abschnitt"), ("Description", "NORD")]));
    assert_eq!(visible_ids(&section), ["s1"]);

    section.apply_filter(filters(&[("Description", "nord")]));
    assert_eq!(visible_ids(&section), ["s1", "s3"]);

    section.apply_filter(filters(&[("Name", "xyz")]));
    assert!(visible_ids(&section).is_empty());
}

#[test]
fn empty_filter_shows_all_rows() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    section.apply_filter(filters(&[("Name", "Brücke")]));
    assert_eq!(section.visible_len(), 1);

    section.apply_filter(BTreeMap::new());
    assert_eq!(visible_ids(&section), ["s1", "s2", "s3"]);

    section.apply_filter(filters(&[("Name", "   "), ("No such column", "x")]));
    assert_eq!(section.visible_len(), 3);
    assert_eq!(section.filters().len(), 1);

    section.apply_filter(filters(&[("Name", "2")]));
    section.clear_filter();
    assert_eq!(section.visible_len(), 3);
}

#[test]
fn id_column_is_filterable() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);
    section.apply_filter(filters(&[("ID", "S3")]));
    assert_eq!(visible_ids(&section), ["s3"]);
}

#[test]
fn cancel_cell_edit_leaves_row_untouched() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);
    let before = section.row("s2").cloned();

    assert!(section.enter_edit_mode());
    section.begin_cell_edit("s2", 2).unwrap();
    section.edit_text_mut().unwrap().push_str(" und mehr");
    section.cancel_cell_edit();

    assert_eq!(section.row("s2").cloned(), before);
    assert!(section.active_edit().is_none());
    assert!(section.is_edit_mode());
}

#[test]
fn cell_edit_requires_edit_mode_and_a_data_column() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    assert!(matches!(
        section.begin_cell_edit("s1", 1),
        Err(SectionError::NotInEditMode)
    ));
    section.enter_edit_mode();
    assert!(!section.enter_edit_mode());
    assert!(matches!(
        section.begin_cell_edit("s1", 0),
        Err(SectionError::IdColumnNotEditable)
    ));
    assert!(matches!(
        section.begin_cell_edit("s1", 7),
        Err(SectionError::ColumnOutOfRange(7))
    ));
    assert!(matches!(
        section.begin_cell_edit("nope", 1),
        Err(SectionError::UnknownRow(_))
    ));
    assert!(matches!(
        section.commit_cell_edit(),
        Err(SectionError::NoActiveEdit)
    ));
}

#[test]
fn discard_restores_initial_load() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);
    let loaded = section.rows().to_vec();

    section.enter_edit_mode();
    edit_cell(&mut section, "s1", 1, "Umbenannt");
    edit_cell(&mut section, "s3", 2, "");
    section.exit_edit_mode(true);

    assert_eq!(section.rows(), loaded.as_slice());
    assert!(!section.is_edit_mode());
    assert!(store.calls().iter().all(|call| matches!(call, Call::List(_))));
}

#[test]
fn discard_restores_last_successful_save() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    section.enter_edit_mode();
    edit_cell(&mut section, "s1", 1, "Gespeichert");
    let report = section.save_all_edits().unwrap();
    assert_eq!(report.saved, 3);
    assert!(report.dropdowns_stale);
    assert!(!section.is_edit_mode());

    section.enter_edit_mode();
    edit_cell(&mut section, "s1", 1, "Verworfen");
    section.exit_edit_mode(true);

    assert_eq!(name_of(&section, "s1"), "Gespeichert");
}

#[test]
fn shift_dates_round_trip_between_display_and_wire() {
    let mut fields = text_fields(&[("titel", "Gleisumbau"), ("datum_von", "2024-01-05")]);
    fields.insert(
        "baufuhrer".to_string(),
        FieldValue::List(vec!["Bauführer 1".into(), "Bauführer 2".into()]),
    );
    let store = MockStore::with_records(
        RecordKind::Shift,
        vec![shiftplan::types::Record::new("sh1", fields)],
    );
    let mut section = connected_section(&store, RecordKind::Shift);

    let row = section.row("sh1").unwrap().clone();
    assert_eq!(row.values[1], "05.01.2024");
    assert_eq!(row.values[5], "Bauführer 1, Bauführer 2");

    section.enter_edit_mode();
    edit_cell(&mut section, "sh1", 2, "Weichenumbau");
    section.save_all_edits().unwrap();

    let stored = store.stored(RecordKind::Shift, "sh1").unwrap();
    assert_eq!(stored.fields["datum_von"], FieldValue::text("2024-01-05"));
    assert_eq!(
        stored.fields["baufuhrer"],
        FieldValue::List(vec!["Bauführer 1".into(), "Bauführer 2".into()])
    );

    section.refresh().unwrap();
    assert_eq!(section.row("sh1").unwrap().values[1], "05.01.2024");
    assert_eq!(section.row("sh1").unwrap().values[2], "Weichenumbau");
}

#[test]
fn malformed_date_aborts_save_before_any_store_call() {
    let store = MockStore::with_records(
        RecordKind::Shift,
        vec![shiftplan::types::Record::new(
            "sh1",
            text_fields(&[("datum_von", "2024-03-01")]),
        )],
    );
    let mut section = connected_section(&store, RecordKind::Shift);

    section.enter_edit_mode();
    edit_cell(&mut section, "sh1", 1, "31.02.2024");
    let err = section.save_all_edits().unwrap_err();

    assert!(matches!(err, SectionError::InvalidDate(_)));
    assert!(section.is_edit_mode());
    assert!(
        !store
            .calls()
            .iter()
            .any(|call| matches!(call, Call::Update(..)))
    );
}

#[test]
fn offline_add_generates_an_id_without_a_store() {
    let mut section = DataSection::new(schema_for(RecordKind::Section), None);
    assert!(!section.is_connected());

    let id = section
        .add_record(vec!["Abschnitt 9".to_string(), String::new()])
        .unwrap();

    assert!(!id.is_empty());
    assert!(ids::is_valid(&id));
    let row = section.row(&id).unwrap();
    assert_eq!(row.values, vec![id.clone(), "Abschnitt 9".into(), String::new()]);
    assert_eq!(section.visible_len(), 1);
}

#[test]
fn connected_add_uses_the_store_id() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    let id = section
        .add_record(vec!["Abschnitt 9".to_string(), "Neu".to_string()])
        .unwrap();

    assert_eq!(id, "mock-1");
    assert_eq!(section.rows().len(), 4);
    assert!(store.calls().contains(&Call::Create(RecordKind::Section)));
    assert_eq!(
        store.stored(RecordKind::Section, "mock-1").unwrap().text("abschnitt"),
        "Abschnitt 9"
    );
}

#[test]
fn add_is_rejected_while_editing_or_incomplete() {
    let mut section = DataSection::new(schema_for(RecordKind::Section), None);
    assert!(matches!(
        section.add_record(vec!["Nur Name".to_string()]),
        Err(SectionError::MissingField(label)) if label == "Description"
    ));

    section.enter_edit_mode();
    assert!(matches!(
        section.add_record(vec!["A".to_string(), "B".to_string()]),
        Err(SectionError::EditModeActive)
    ));
    assert!(section.rows().is_empty());
}

#[test]
fn failed_create_leaves_the_cache_alone() {
    let store = MockStore::unreachable();
    let mut section = connected_section(&store, RecordKind::Section);
    let err = section
        .add_record(vec!["Abschnitt 9".to_string(), String::new()])
        .unwrap_err();
    assert!(matches!(err, SectionError::Store(_)));
    assert!(section.rows().is_empty());
}

#[test]
fn delete_is_best_effort_per_row() {
    let store = MockStore::with_records(
        RecordKind::Section,
        vec![
            section_record("a", "Abschnitt A", ""),
            section_record("b", "Abschnitt B", ""),
        ],
    );
    store.fail_on("b");
    let mut section = connected_section(&store, RecordKind::Section);

    let report = section
        .delete_selected(&["a".to_string(), "b".to_string()])
        .unwrap();

    assert_eq!(report.deleted, ["a"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "b");
    assert!(report.failed[0].1.contains("locked"));
    assert!(report.dropdowns_stale);
    assert!(section.row("a").is_none());
    assert!(section.row("b").is_some());
    assert!(report.summary().starts_with("1 record(s) deleted, 1 failed"));
}

#[test]
fn delete_targets_marked_rows_first() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    assert_eq!(section.delete_targets(), ["s1"]);
    section.toggle_mark();
    section.move_down();
    section.move_down();
    section.toggle_mark();
    assert_eq!(section.delete_targets(), ["s1", "s3"]);

    let targets = section.delete_targets();
    let report = section.delete_selected(&targets).unwrap();
    assert_eq!(report.summary(), "2 record(s) deleted.");
    assert_eq!(visible_ids(&section), ["s2"]);
    assert!(!section.is_marked("s1"));
}

#[test]
fn delete_while_editing_is_rejected() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);
    section.enter_edit_mode();
    assert!(matches!(
        section.delete_selected(&["s1".to_string()]),
        Err(SectionError::EditModeActive)
    ));
    assert_eq!(section.rows().len(), 3);
}

#[test]
fn save_stops_at_the_first_rejected_row() {
    let store = sections_store();
    store.fail_on("s2");
    let mut section = connected_section(&store, RecordKind::Section);

    section.enter_edit_mode();
    edit_cell(&mut section, "s1", 1, "Eins");
    edit_cell(&mut section, "s2", 1, "Zwei");
    edit_cell(&mut section, "s3", 1, "Drei");

    let failure = match section.save_all_edits() {
        Err(SectionError::Save(failure)) => failure,
        other => panic!("expected a save failure, got {other:?}"),
    };
    assert_eq!(failure.failed, "s2");
    assert_eq!(failure.persisted, ["s1"]);

    assert!(section.is_edit_mode());
    assert_eq!(store.stored(RecordKind::Section, "s1").unwrap().text("abschnitt"), "Eins");
    assert_eq!(
        store.stored(RecordKind::Section, "s2").unwrap().text("abschnitt"),
        "Abschnitt 2"
    );
    assert_eq!(store.stored(RecordKind::Section, "s3").unwrap().text("abschnitt"), "Brücke");
    assert_eq!(name_of(&section, "s2"), "Zwei");
    assert_eq!(name_of(&section, "s3"), "Drei");
    assert!(
        !store
            .calls()
            .contains(&Call::Update(RecordKind::Section, "s3".to_string()))
    );

    // The stored row survives a discard; the rest reverts.
    section.exit_edit_mode(true);
    assert_eq!(name_of(&section, "s1"), "Eins");
    assert_eq!(name_of(&section, "s2"), "Abschnitt 2");
    assert_eq!(name_of(&section, "s3"), "Brücke");
}

#[test]
fn offline_refresh_keeps_the_cache() {
    let mut section = DataSection::new(schema_for(RecordKind::Section), None);
    section.add_record(vec!["A".into(), "B".into()]).unwrap();
    assert_eq!(section.refresh().unwrap(), 1);
}

#[test]
fn cursor_wraps_and_skips_the_id_column() {
    let store = sections_store();
    let mut section = connected_section(&store, RecordKind::Section);

    section.move_up();
    assert_eq!(section.current_row().unwrap().id, "s3");
    section.move_down();
    assert_eq!(section.current_row().unwrap().id, "s1");

    section.move_left();
    assert_eq!(section.selected_column, 1);
    section.move_right();
    section.move_right();
    assert_eq!(section.selected_column, 2);
}
