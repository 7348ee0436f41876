/// Conversion between store records and on-screen row tuples.
use chrono::NaiveDate;

use crate::errors::{SectionError, SectionResult};
use crate::schema::{ColumnKind, TableSchema};
use crate::types::{FieldValue, Fields, Record, split_list};

use super::Row;

const DISPLAY_DATE: &str = "%d.%m.%Y";
const ISO_DATE: &str = "%Y-%m-%d";

/// `2024-01-05` (or a timestamp starting with it) to `05.01.2024`.
pub fn iso_to_display(value: &str) -> Option<String> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, ISO_DATE)
        .ok()
        .map(|date| date.format(DISPLAY_DATE).to_string())
}

/// `05.01.2024` to `2024-01-05`.
pub fn display_to_iso(value: &str) -> SectionResult<String> {
    parse_display_date(value).map(|date| date.format(ISO_DATE).to_string())
}

pub fn parse_display_date(value: &str) -> SectionResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DISPLAY_DATE)
        .map_err(|_| SectionError::InvalidDate(value.to_string()))
}

pub fn format_display_date(date: NaiveDate) -> String {
    date.format(DISPLAY_DATE).to_string()
}

/// Cell text for one wire value. Unparseable dates are shown raw.
pub fn display_value(kind: ColumnKind, value: Option<&FieldValue>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    match (kind, value) {
        (ColumnKind::Date, FieldValue::Text(raw)) => {
            iso_to_display(raw).unwrap_or_else(|| raw.clone())
        }
        _ => value.as_text(),
    }
}

/// Wire value for one cell text.
pub fn wire_value(kind: ColumnKind, text: &str) -> SectionResult<FieldValue> {
    match kind {
        ColumnKind::Date => display_to_iso(text).map(FieldValue::Text),
        ColumnKind::List => Ok(FieldValue::List(split_list(text))),
        ColumnKind::Id | ColumnKind::Text | ColumnKind::Choice => {
            Ok(FieldValue::Text(text.to_string()))
        }
    }
}

pub fn row_from_record(schema: &TableSchema, record: &Record) -> Row {
    let values = schema
        .columns
        .iter()
        .map(|column| match column.kind {
            ColumnKind::Id => record.id.clone(),
            kind => display_value(kind, record.fields.get(column.key)),
        })
        .collect();
    Row {
        id: record.id.clone(),
        values,
    }
}

/// Wire fields for a row; the id column is not part of the payload.
pub fn fields_from_row(schema: &TableSchema, row: &Row) -> SectionResult<Fields> {
    let mut fields = Fields::new();
    for (column, text) in schema.columns.iter().zip(row.values.iter()) {
        if column.kind == ColumnKind::Id {
            continue;
        }
        fields.insert(column.key.to_string(), wire_value(column.kind, text)?);
    }
    Ok(fields)
}

/// Like `fields_from_row`, but keeps unparseable cells as raw text.
pub fn lenient_fields_from_row(schema: &TableSchema, row: &Row) -> Fields {
    schema
        .columns
        .iter()
        .zip(row.values.iter())
        .filter(|(column, _)| column.kind != ColumnKind::Id)
        .map(|(column, text)| {
            let value = wire_value(column.kind, text)
                .unwrap_or_else(|_| FieldValue::Text(text.clone()));
            (column.key.to_string(), value)
        })
        .collect()
}
