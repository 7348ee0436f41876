/// Spreadsheet import of the reference tables (`.xlsx`, `.xls`, `.ods`).
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use tracing::{debug, info};

use crate::errors::SpreadsheetError;
use crate::ids;
use crate::types::{Leader, Machine, ReferenceData, Section, ShiftTime, Staff};

/// One worksheet with its header row resolved to column indices.
struct Sheet {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    fn from_range(range: &Range<Data>) -> Self {
        let mut rows = range.rows().map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string().trim().to_string(),
                })
                .collect::<Vec<_>>()
        });
        let headers = rows
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(|header| header.to_lowercase())
            .collect();
        let rows = rows
            .filter(|row| row.iter().any(|cell| !cell.is_empty()))
            .collect();
        Self { headers, rows }
    }

    /// First header matching one of the aliases, case-insensitively.
    fn column(&self, aliases: Aliases) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            let alias = alias.to_lowercase();
            self.headers.iter().position(|header| *header == alias)
        })
    }

    /// Values of one column per row; a missing column yields empty strings.
    fn values(&self, aliases: Aliases) -> Vec<String> {
        let index = self.column(aliases);
        self.rows
            .iter()
            .map(|row| {
                index
                    .and_then(|index| row.get(index))
                    .cloned()
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Rows as tuples of the requested columns, skipping rows whose first
    /// requested column is blank.
    fn records<const N: usize>(&self, columns: [Aliases; N]) -> Vec<[String; N]> {
        let values = columns.map(|aliases| self.values(aliases));
        (0..self.rows.len())
            .map(|row| std::array::from_fn(|column| values[column][row].clone()))
            .filter(|record: &[String; N]| record.first().is_some_and(|first| !first.is_empty()))
            .collect()
    }
}

type Aliases = &'static [&'static str];

const SECTION_NAME: Aliases = &["Abschnitt", "Name", "Bezeichnung"];
const SECTION_DESCRIPTION: Aliases = &["Beschreibung"];
const SHIFT_LABEL: Aliases = &["Schicht"];
const SHIFT_START: Aliases = &["Zeit von"];
const SHIFT_END: Aliases = &["Zeit bis"];
const NAME: Aliases = &["Name"];
const PHONE: Aliases = &["Telefon", "Telefonnummer"];
const EMAIL: Aliases = &["Email", "E-Mail"];
const FUNCTION: Aliases = &["Funktion"];
const MACHINE: Aliases = &["Maschine"];
const COMPANY: Aliases = &["Firma"];
const MACHINE_TYPE: Aliases = &["Type", "Typ"];

fn find_sheet(workbook: &mut Sheets<BufReader<File>>, aliases: Aliases) -> Option<Sheet> {
    let names = workbook.sheet_names();
    let name = aliases.iter().find_map(|alias| {
        names
            .iter()
            .find(|name| name.to_lowercase() == alias.to_lowercase())
            .cloned()
    })?;
    match workbook.worksheet_range(&name) {
        Ok(range) => Some(Sheet::from_range(&range)),
        Err(err) => {
            debug!(sheet = %name, "sheet skipped: {err}");
            None
        }
    }
}

/// Read every reference table the workbook has. Missing sheets and columns
/// are not errors; they leave the corresponding list or field empty.
pub fn import(path: &Path) -> Result<ReferenceData, SpreadsheetError> {
    if !path.exists() {
        return Err(SpreadsheetError::NotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path)?;
    let mut data = ReferenceData::default();

    if let Some(sheet) = find_sheet(&mut workbook, &["Abschnitte"]) {
        data.sections = sheet
            .records([SECTION_NAME, SECTION_DESCRIPTION])
            .into_iter()
            .map(|[name, description]| Section {
                id: ids::generate(),
                name,
                description,
            })
            .collect();
    }

    if let Some(sheet) = find_sheet(&mut workbook, &["Schichtzeiten"]) {
        data.shift_times = sheet
            .records([SHIFT_LABEL, SHIFT_START, SHIFT_END])
            .into_iter()
            .map(|[label, start, end]| ShiftTime {
                id: ids::generate(),
                label,
                start,
                end,
            })
            .collect();
    }

    let leaders = |sheet: Sheet| {
        sheet
            .records([NAME, PHONE, EMAIL])
            .into_iter()
            .map(|[name, phone, email]| Leader {
                id: ids::generate(),
                name,
                phone,
                email,
            })
            .collect::<Vec<_>>()
    };
    if let Some(sheet) = find_sheet(&mut workbook, &["Arbeitsleiter"]) {
        data.work_leaders = leaders(sheet);
    }
    if let Some(sheet) = find_sheet(&mut workbook, &["Bauführer", "Baufuhrer"]) {
        data.construction_leaders = leaders(sheet);
    }

    if let Some(sheet) = find_sheet(&mut workbook, &["Personal", "Mitarbeiter"]) {
        data.staff = sheet
            .records([NAME, FUNCTION, PHONE, EMAIL])
            .into_iter()
            .map(|[name, function, phone, email]| Staff {
                id: ids::generate(),
                name,
                function,
                phone,
                email,
            })
            .collect();
    }

    if let Some(sheet) = find_sheet(&mut workbook, &["Inventar"]) {
        data.inventory = sheet
            .records([MACHINE, COMPANY, MACHINE_TYPE])
            .into_iter()
            .map(|[name, company, machine_type]| Machine {
                id: ids::generate(),
                name,
                company,
                machine_type,
            })
            .collect();
    }

    info!(
        path = %path.display(),
        sections = data.sections.len(),
        staff = data.staff.len(),
        inventory = data.inventory.len(),
        "spreadsheet imported"
    );
    Ok(data)
}
