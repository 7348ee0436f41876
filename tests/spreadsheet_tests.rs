use rust_xlsxwriter::{Workbook, XlsxError};

use shiftplan::dropdowns::DropdownData;
use shiftplan::errors::SpreadsheetError;
use shiftplan::spreadsheet;

mod common;
use common::temp_path;

fn write_sheet(workbook: &mut Workbook, name: &str, rows: &[&[&str]]) -> Result<(), XlsxError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(name)?;
    for (row, cells) in rows.iter().enumerate() {
        for (column, value) in cells.iter().enumerate() {
            sheet.write_string(row as u32, column as u16, *value)?;
        }
    }
    Ok(())
}

#[test]
fn imports_every_reference_sheet() {
    let path = temp_path("import_full", "xlsx");
    let mut workbook = Workbook::new();
    write_sheet(
        &mut workbook,
        "Abschnitte",
        &[
            &["Abschnitt", "Beschreibung"],
            &["Abschnitt 1", "Nordkopf"],
            &["", "ohne Namen"],
            &["Abschnitt 2", ""],
        ],
    )
    .unwrap();
    write_sheet(
        &mut workbook,
        "Schichtzeiten",
        &[&["Schicht", "Zeit von", "Zeit bis"], &["Nacht", "22:00", "06:00"]],
    )
    .unwrap();
    write_sheet(
        &mut workbook,
        "Bauführer",
        &[&["Name", "Telefon", "Email"], &["Bauführer 1", "0170 1", "bf1@example.org"]],
    )
    .unwrap();
    write_sheet(
        &mut workbook,
        "personal",
        &[
            &["Email", "Funktion", "Name"],
            &["a@example.org", "SIWA", "Anna"],
            &["", "Lokfuhrer", "Ben"],
            &["", "AKO", "Carla"],
        ],
    )
    .unwrap();
    write_sheet(
        &mut workbook,
        "Inventar",
        &[
            &["Maschine", "Firma", "Type"],
            &["Stopfmaschine", "Firma A", "GBM"],
            &["Bagger", "Firma B", "Diverses"],
        ],
    )
    .unwrap();
    workbook.save(&path).unwrap();

    let data = spreadsheet::import(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let sections = data
        .sections
        .iter()
        .map(|section| (section.name.as_str(), section.description.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(sections, [("Abschnitt 1", "Nordkopf"), ("Abschnitt 2", "")]);
    assert!(data.sections.iter().all(|section| !section.id.is_empty()));

    assert_eq!(data.shift_times.len(), 1);
    assert_eq!(data.shift_times[0].start, "22:00");
    assert!(data.work_leaders.is_empty());
    assert_eq!(data.construction_leaders[0].email, "bf1@example.org");

    assert_eq!(data.staff.len(), 3);
    assert_eq!(data.staff[0].name, "Anna");
    assert_eq!(data.staff[0].function, "SIWA");
    assert_eq!(data.staff[0].phone, "");

    let dropdowns = DropdownData::from_reference(&data);
    assert_eq!(dropdowns.site_safety, ["Anna"]);
    assert_eq!(dropdowns.logistics_staff, ["Ben"]);
    assert_eq!(dropdowns.coordinators, ["Carla"]);
    assert_eq!(dropdowns.track_machines, ["Stopfmaschine"]);
    assert_eq!(dropdowns.machines, ["Stopfmaschine", "Bagger"]);
}

#[test]
fn workbook_without_known_sheets_is_empty() {
    let path = temp_path("import_empty", "xlsx");
    let mut workbook = Workbook::new();
    write_sheet(&mut workbook, "Notizen", &[&["Irgendwas"], &["Text"]]).unwrap();
    workbook.save(&path).unwrap();

    let data = spreadsheet::import(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert!(data.is_empty());
}

#[test]
fn missing_file_is_reported() {
    let path = temp_path("import_missing", "xlsx");
    assert!(matches!(
        spreadsheet::import(&path),
        Err(SpreadsheetError::NotFound(_))
    ));
}

#[test]
fn unreadable_file_is_reported() {
    let path = temp_path("import_garbage", "xlsx");
    std::fs::write(&path, b"not a workbook").unwrap();
    let result = spreadsheet::import(&path);
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(SpreadsheetError::Open(_))));
}
