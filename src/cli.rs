/// CLI argument parsing and command handling.
use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::{self, Config};
use crate::schema::schema_for;
use crate::section::convert;
use crate::session::Session;
use crate::types::{Record, RecordKind, ReferenceData};

#[derive(Parser, Debug)]
#[command(
    name = "shiftplan",
    version,
    about = "Shiftplan - A terminal-based shift planner for construction crews"
)]
pub struct Cli {
    /// Use a local SQLite database file instead of the hosted backend
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Use the local database in the user data directory
    #[arg(long, global = true, conflicts_with = "db")]
    pub local: bool,

    /// Work without any store, on demo data
    #[arg(long, global = true)]
    pub offline: bool,

    /// Spreadsheet with reference tables, used when the store has none
    #[arg(long, global = true, value_name = "PATH")]
    pub import: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    pub fn config(&self) -> Config {
        let db = self
            .db
            .clone()
            .or_else(|| self.local.then(config::default_db_path));
        Config::from_env(self.offline, db, self.import.clone())
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print all records of one kind
    List {
        #[arg(value_enum)]
        kind: RecordKind,
    },
    /// Print the current candidate lists
    Dropdowns {
        /// Print as JSON instead of one line per list
        #[arg(long)]
        json: bool,
    },
}

/// Execute a CLI command against the resolved store.
pub fn run(command: Command, session: &mut Session) -> Result<()> {
    let loaded = session.load_all();
    for warning in session.take_warnings() {
        eprintln!("{warning}");
    }
    match command {
        Command::List { kind } => handle_list(kind, &loaded),
        Command::Dropdowns { json } => handle_dropdowns(session, &loaded, json)?,
    }
    Ok(())
}

fn clamp(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return format!("{value:<width$}");
    }
    let trimmed = value
        .chars()
        .take(width.saturating_sub(2))
        .collect::<String>();
    format!("{trimmed}..")
}

fn handle_list(kind: RecordKind, loaded: &BTreeMap<RecordKind, Vec<Record>>) {
    let schema = schema_for(kind);
    let records = loaded.get(&kind).map(Vec::as_slice).unwrap_or_default();

    let header = schema
        .columns
        .iter()
        .map(|column| clamp(column.label, column.width as usize))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{header}");
    println!("{}", "-".repeat(header.chars().count()));
    for record in records {
        let row = convert::row_from_record(schema, record);
        let line = schema
            .columns
            .iter()
            .zip(row.values.iter())
            .map(|(column, value)| clamp(value, column.width as usize))
            .collect::<Vec<_>>()
            .join(" | ");
        println!("{line}");
    }
    println!("{} {}(s)", records.len(), schema.title.to_lowercase());
}

fn handle_dropdowns(
    session: &Session,
    loaded: &BTreeMap<RecordKind, Vec<Record>>,
    json: bool,
) -> Result<()> {
    let dropdowns = session.dropdowns(&ReferenceData::from_loaded(loaded));
    if json {
        println!("{}", serde_json::to_string_pretty(&dropdowns)?);
        return Ok(());
    }
    let lists: [(&str, &[String]); 13] = [
        ("Sections", &dropdowns.sections),
        ("Shift times", &dropdowns.shift_times),
        ("Construction leaders", &dropdowns.construction_leaders),
        ("Work leaders", &dropdowns.work_leaders),
        ("Staff", &dropdowns.staff),
        ("Logistics staff", &dropdowns.logistics_staff),
        ("Coordinators", &dropdowns.coordinators),
        ("Safety officers", &dropdowns.safety_officers),
        ("Site safety", &dropdowns.site_safety),
        ("Machines", &dropdowns.machines),
        ("Track machines", &dropdowns.track_machines),
        ("Function types", &dropdowns.function_types),
        ("Machine types", &dropdowns.machine_types),
    ];
    for (label, values) in lists {
        if values.is_empty() {
            println!("{label}: -");
        } else {
            println!("{label}: {}", values.join(", "));
        }
    }
    Ok(())
}
