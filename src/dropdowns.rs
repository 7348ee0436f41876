/// Candidate lists for choice and multi-select inputs, derived from the
/// reference tables.
use serde::Serialize;

use crate::schema::Candidates;
use crate::types::{
    DEFAULT_FUNCTIONS, DEFAULT_MACHINE_TYPES, FUNCTION_COORDINATOR, FUNCTION_SAFETY_OFFICER,
    FUNCTION_SITE_SAFETY, LOGISTICS_FUNCTIONS, MACHINE_TRACK, ReferenceData,
};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DropdownData {
    pub sections: Vec<String>,
    pub shift_times: Vec<String>,
    pub construction_leaders: Vec<String>,
    pub work_leaders: Vec<String>,
    pub staff: Vec<String>,
    pub logistics_staff: Vec<String>,
    pub coordinators: Vec<String>,
    pub safety_officers: Vec<String>,
    pub site_safety: Vec<String>,
    pub machines: Vec<String>,
    pub track_machines: Vec<String>,
    pub function_types: Vec<String>,
    pub machine_types: Vec<String>,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn numbered(prefix: &str, count: usize) -> Vec<String> {
    (1..=count).map(|index| format!("{prefix} {index}")).collect()
}

impl DropdownData {
    /// Rebuilds every list from the reference tables. Never patched in place.
    pub fn from_reference(data: &ReferenceData) -> Self {
        let staff_with = |functions: &[&str]| {
            data.staff
                .iter()
                .filter(|staff| functions.contains(&staff.function.as_str()))
                .map(|staff| staff.name.clone())
                .collect::<Vec<_>>()
        };
        Self {
            sections: data.sections.iter().map(|s| s.name.clone()).collect(),
            shift_times: data.shift_times.iter().map(|t| t.label.clone()).collect(),
            construction_leaders: data
                .construction_leaders
                .iter()
                .map(|l| l.name.clone())
                .collect(),
            work_leaders: data.work_leaders.iter().map(|l| l.name.clone()).collect(),
            staff: data.staff.iter().map(|s| s.name.clone()).collect(),
            logistics_staff: staff_with(&LOGISTICS_FUNCTIONS),
            coordinators: staff_with(&[FUNCTION_COORDINATOR]),
            safety_officers: staff_with(&[FUNCTION_SAFETY_OFFICER]),
            site_safety: staff_with(&[FUNCTION_SITE_SAFETY]),
            machines: data.inventory.iter().map(|m| m.name.clone()).collect(),
            track_machines: data
                .inventory
                .iter()
                .filter(|m| m.machine_type == MACHINE_TRACK)
                .map(|m| m.name.clone())
                .collect(),
            function_types: owned(&DEFAULT_FUNCTIONS),
            machine_types: owned(&DEFAULT_MACHINE_TYPES),
        }
    }

    /// Hardcoded lists used when neither a store nor a spreadsheet is available.
    pub fn fallback() -> Self {
        Self {
            sections: numbered("Abschnitt", 3),
            shift_times: owned(&["Tag", "Nacht", "Spät"]),
            construction_leaders: numbered("Bauführer", 3),
            work_leaders: numbered("Arbeitsleiter", 3),
            staff: numbered("Mitarbeiter", 3),
            function_types: owned(&DEFAULT_FUNCTIONS),
            machine_types: owned(&DEFAULT_MACHINE_TYPES),
            ..Self::default()
        }
    }

    pub fn candidates(&self, source: Candidates) -> &[String] {
        match source {
            Candidates::Sections => &self.sections,
            Candidates::ShiftTimes => &self.shift_times,
            Candidates::ConstructionLeaders => &self.construction_leaders,
            Candidates::WorkLeaders => &self.work_leaders,
            Candidates::Staff => &self.staff,
            Candidates::LogisticsStaff => &self.logistics_staff,
            Candidates::Coordinators => &self.coordinators,
            Candidates::SafetyOfficers => &self.safety_officers,
            Candidates::SiteSafety => &self.site_safety,
            Candidates::Machines => &self.machines,
            Candidates::TrackMachines => &self.track_machines,
            Candidates::FunctionTypes => &self.function_types,
            Candidates::MachineTypes => &self.machine_types,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Machine, Staff};

    fn staff(name: &str, function: &str) -> Staff {
        Staff {
            id: name.to_string(),
            name: name.to_string(),
            function: function.to_string(),
            phone: String::new(),
            email: String::new(),
        }
    }

    #[test]
    fn staff_is_split_by_function() {
        let data = ReferenceData {
            staff: vec![
                staff("Anna", "AKO"),
                staff("Ben", "SC"),
                staff("Cem", "Lokfuhrer"),
                staff("Dora", "Bauarbeiter"),
            ],
            inventory: vec![Machine {
                id: "m1".into(),
                name: "Stopfmaschine".into(),
                company: "Firma A".into(),
                machine_type: "GBM".into(),
            }],
            ..ReferenceData::default()
        };
        let dropdowns = DropdownData::from_reference(&data);
        assert_eq!(dropdowns.staff.len(), 4);
        assert_eq!(dropdowns.coordinators, vec!["Anna"]);
        assert_eq!(dropdowns.safety_officers, vec!["Ben"]);
        assert_eq!(dropdowns.logistics_staff, vec!["Cem"]);
        assert!(dropdowns.site_safety.is_empty());
        assert_eq!(dropdowns.track_machines, vec!["Stopfmaschine"]);
        assert_eq!(dropdowns.candidates(Candidates::Machines), ["Stopfmaschine"]);
    }

    #[test]
    fn fallback_offers_numbered_defaults() {
        let dropdowns = DropdownData::fallback();
        assert_eq!(dropdowns.sections[2], "Abschnitt 3");
        assert_eq!(dropdowns.shift_times, vec!["Tag", "Nacht", "Spät"]);
        assert!(dropdowns.machines.is_empty());
        assert_eq!(dropdowns.candidates(Candidates::MachineTypes).len(), 3);
    }
}
