/// Local database schema management.
use rusqlite::Connection;

use crate::errors::StoreResult;
use crate::schema::{ColumnKind, schema_for};
use crate::types::RecordKind;

/// Creates the initial schema if it doesn't exist yet.
pub fn run_migrations(conn: &Connection) -> StoreResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS abschnitte (
            id           TEXT PRIMARY KEY,
            abschnitt    TEXT NOT NULL,
            beschreibung TEXT
        );

        CREATE TABLE IF NOT EXISTS schichtzeiten (
            id       TEXT PRIMARY KEY,
            schicht  TEXT NOT NULL,
            zeit_von TEXT,
            zeit_bis TEXT
        );

        CREATE TABLE IF NOT EXISTS arbeitsleiter (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            telefonnummer TEXT,
            email         TEXT
        );

        CREATE TABLE IF NOT EXISTS baufuhrer (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            telefonnummer TEXT,
            email         TEXT
        );

        CREATE TABLE IF NOT EXISTS personal (
            id            TEXT PRIMARY KEY,
            name          TEXT NOT NULL,
            funktion      TEXT,
            telefonnummer TEXT,
            email         TEXT
        );

        CREATE TABLE IF NOT EXISTS inventar (
            id       TEXT PRIMARY KEY,
            maschine TEXT NOT NULL,
            firma    TEXT,
            type     TEXT
        );

        CREATE TABLE IF NOT EXISTS schichtplanung (
            id        TEXT PRIMARY KEY,
            datum_von TEXT NOT NULL,
            titel     TEXT
        );
        ",
    )?;
    for kind in RecordKind::REFERENCE.into_iter().chain([RecordKind::Shift]) {
        add_missing_columns(kind, conn)?;
    }
    Ok(())
}

/// Brings older databases up to the current column set of a table.
fn add_missing_columns(kind: RecordKind, conn: &Connection) -> StoreResult<()> {
    let schema = schema_for(kind);
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", schema.table))?;
    let rows = stmt.query_map([], |row| {
        let name: String = row.get(1)?;
        Ok(name)
    })?;
    let mut existing = Vec::new();
    for row in rows {
        existing.push(row?);
    }

    for column in schema.columns {
        if column.kind == ColumnKind::Id || existing.iter().any(|name| name == column.key) {
            continue;
        }
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} TEXT", schema.table, column.key),
            [],
        )?;
    }
    Ok(())
}
