/// Store backed by a local SQLite database file.
use std::path::Path;

use rusqlite::{Connection, params_from_iter};

use crate::errors::{StoreError, StoreResult};
use crate::ids;
use crate::schema::{ColumnKind, TableSchema, schema_for};
use crate::types::{FieldValue, Fields, Record, RecordKind};

use super::{Store, migrations};

pub struct SqliteStore {
    conn: Connection,
    location: String,
}

impl SqliteStore {
    /// Opens (or creates) the database and runs migrations.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            location: path.display().to_string(),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn,
            location: ":memory:".to_string(),
        })
    }

    fn fetch(&self, schema: &TableSchema, id: &str) -> StoreResult<Record> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_list(schema),
            schema.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            read_record(schema, row)
        } else {
            Err(StoreError::NotFound {
                kind: schema.kind,
                id: id.to_string(),
            })
        }
    }
}

fn select_list(schema: &TableSchema) -> String {
    schema
        .columns
        .iter()
        .map(|column| column.key)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lists are stored as JSON arrays in TEXT columns.
fn encode(value: &FieldValue) -> StoreResult<Option<String>> {
    Ok(match value {
        FieldValue::Text(s) => Some(s.clone()),
        FieldValue::List(items) => Some(serde_json::to_string(items)?),
        FieldValue::Null => None,
    })
}

fn decode(kind: ColumnKind, raw: Option<String>) -> StoreResult<FieldValue> {
    Ok(match (kind, raw) {
        (_, None) => FieldValue::Null,
        (ColumnKind::List, Some(raw)) => FieldValue::List(serde_json::from_str(&raw)?),
        (_, Some(raw)) => FieldValue::Text(raw),
    })
}

fn read_record(schema: &TableSchema, row: &rusqlite::Row<'_>) -> StoreResult<Record> {
    let mut id = String::new();
    let mut fields = Fields::new();
    for (index, column) in schema.columns.iter().enumerate() {
        let raw: Option<String> = row.get(index)?;
        if column.kind == ColumnKind::Id {
            id = raw.unwrap_or_default();
            continue;
        }
        fields.insert(column.key.to_string(), decode(column.kind, raw)?);
    }
    Ok(Record { id, fields })
}

/// Only keys known to the schema are written; anything else is dropped.
fn known_fields(
    schema: &TableSchema,
    fields: &Fields,
) -> StoreResult<Vec<(&'static str, Option<String>)>> {
    let mut columns = Vec::new();
    for column in schema.columns {
        if column.kind == ColumnKind::Id {
            continue;
        }
        if let Some(value) = fields.get(column.key) {
            columns.push((column.key, encode(value)?));
        }
    }
    Ok(columns)
}

impl Store for SqliteStore {
    fn list(&self, kind: RecordKind) -> StoreResult<Vec<Record>> {
        let schema = schema_for(kind);
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            select_list(schema),
            schema.table
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(read_record(schema, row)?);
        }
        Ok(records)
    }

    fn create(&self, kind: RecordKind, fields: &Fields) -> StoreResult<Record> {
        let schema = schema_for(kind);
        let id = ids::generate();
        let columns = known_fields(schema, fields)?;

        let names = std::iter::once("id")
            .chain(columns.iter().map(|(key, _)| *key))
            .collect::<Vec<_>>();
        let placeholders = (1..=names.len())
            .map(|index| format!("?{index}"))
            .collect::<Vec<_>>();
        let values = std::iter::once(Some(id.clone()))
            .chain(columns.into_iter().map(|(_, value)| value))
            .collect::<Vec<_>>();

        self.conn.execute(
            &format!(
                "INSERT INTO {} ({}) VALUES ({})",
                schema.table,
                names.join(", "),
                placeholders.join(", ")
            ),
            params_from_iter(values),
        )?;
        self.fetch(schema, &id)
    }

    fn update(&self, kind: RecordKind, id: &str, fields: &Fields) -> StoreResult<Record> {
        let schema = schema_for(kind);
        let columns = known_fields(schema, fields)?;
        if columns.is_empty() {
            return self.fetch(schema, id);
        }

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(index, (key, _))| format!("{key} = ?{}", index + 1))
            .collect::<Vec<_>>();
        let id_param = columns.len() + 1;
        let values = columns
            .into_iter()
            .map(|(_, value)| value)
            .chain(std::iter::once(Some(id.to_string())))
            .collect::<Vec<_>>();

        let changed = self.conn.execute(
            &format!(
                "UPDATE {} SET {} WHERE id = ?{id_param}",
                schema.table,
                assignments.join(", ")
            ),
            params_from_iter(values),
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        self.fetch(schema, id)
    }

    fn delete(&self, kind: RecordKind, id: &str) -> StoreResult<()> {
        let schema = schema_for(kind);
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", schema.table), [id])?;
        if changed == 0 {
            return Err(StoreError::NotFound {
                kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("local {}", self.location)
    }
}
