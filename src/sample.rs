/// Demo data shown when no store is configured or reachable.
use chrono::NaiveDate;

use crate::ids;
use crate::types::{
    DEFAULT_FUNCTIONS, DEFAULT_MACHINE_TYPES, Leader, Machine, Record, ReferenceData, Section,
    Shift, ShiftTime, Staff,
};

fn leaders(prefix: &str, phone: &str, mail: &str) -> Vec<Leader> {
    (1..=3)
        .map(|i| Leader {
            id: ids::generate(),
            name: format!("{prefix} {i}"),
            phone: format!("{phone}{i}"),
            email: format!("{mail}{i}@example.com"),
        })
        .collect()
}

pub fn reference_data() -> ReferenceData {
    let sections = (1..=3)
        .map(|i| Section {
            id: ids::generate(),
            name: format!("Abschnitt {i}"),
            description: format!("Beschreibung für Abschnitt {i}"),
        })
        .collect();

    let shift_times = [("Früh", "06:00", "14:00"), ("Spät", "14:00", "22:00"), ("Nacht", "22:00", "06:00")]
        .into_iter()
        .map(|(label, start, end)| ShiftTime {
            id: ids::generate(),
            label: label.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        })
        .collect();

    let staff = (1..=5)
        .map(|i| Staff {
            id: ids::generate(),
            name: format!("Mitarbeiter {i}"),
            function: DEFAULT_FUNCTIONS[i % DEFAULT_FUNCTIONS.len()].to_string(),
            phone: format!("+49 345 678{i}"),
            email: format!("mitarbeiter{i}@example.com"),
        })
        .collect();

    let companies = ["Firma A", "Firma B", "Firma C"];
    let inventory = ["Bagger", "Kran", "Betonmischer", "Radlader"]
        .into_iter()
        .enumerate()
        .map(|(index, name)| {
            let i = index + 1;
            Machine {
                id: ids::generate(),
                name: name.to_string(),
                company: companies[i % companies.len()].to_string(),
                machine_type: DEFAULT_MACHINE_TYPES[i % DEFAULT_MACHINE_TYPES.len()].to_string(),
            }
        })
        .collect();

    ReferenceData {
        sections,
        shift_times,
        work_leaders: leaders("Arbeitsleiter", "+49 123 456", "arbeitsleiter"),
        construction_leaders: leaders("Bauführer", "+49 234 567", "baufuhrer"),
        staff,
        inventory,
    }
}

/// A few planned shifts referring to the sample reference names.
pub fn shifts() -> Vec<Record> {
    [
        ((2023, 5, 1), "Gleisbau West", "Früh", "Abschnitt 1", "Bauführer 1", "Arbeitsleiter 1", "Schienen verlegen"),
        ((2023, 5, 2), "Signaltechnik Ost", "Nacht", "Abschnitt 2", "Bauführer 2", "Arbeitsleiter 2", "Signale installieren"),
        ((2023, 5, 3), "Instandhaltung", "Früh", "Abschnitt 3", "Bauführer 1", "Arbeitsleiter 3", "Wartungsarbeiten"),
    ]
    .into_iter()
    .filter_map(|((y, m, d), title, time, section, constr, work, activity)| {
        let shift = Shift {
            date: NaiveDate::from_ymd_opt(y, m, d)?,
            title: title.to_string(),
            shift_time: time.to_string(),
            section: section.to_string(),
            construction_leaders: vec![constr.to_string()],
            work_leaders: vec![work.to_string()],
            activity: activity.to_string(),
            ..Shift::default()
        };
        Some(Record::new(ids::generate(), shift.to_fields()))
    })
    .collect()
}
