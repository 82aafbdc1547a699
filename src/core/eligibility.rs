use std::collections::HashSet;

use crate::models::{HospitalRecord, PatientProfile};

/// Response size cap on eligible schemes
pub const MAX_ELIGIBLE_SCHEMES: usize = 6;

/// Age from which senior-citizen schemes apply
pub const SENIOR_CITIZEN_AGE: u32 = 60;

const DISABILITY_SCHEMES: [&str; 4] = ["AB-PMJAY", "NHM", "NRHM", "NUHM"];
const SENIOR_SCHEMES: [&str; 3] = ["CGHS", "AB-PMJAY", "NHA"];
const BASELINE_SCHEMES: [&str; 3] = ["CGHS", "AIIMS", "OPD"];

/// Collect the distinct schemes offered by a set of hospitals
///
/// Order is the order of first appearance while walking the hospitals
/// and each hospital's scheme list.
pub fn collect_schemes<'a, I>(hospitals: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a HospitalRecord>,
{
    let mut seen = HashSet::new();
    let mut schemes = Vec::new();

    for hospital in hospitals {
        for scheme in &hospital.schemes {
            if seen.insert(scheme.as_str()) {
                schemes.push(scheme.clone());
            }
        }
    }

    schemes
}

/// Check whether a single scheme is open to the patient
///
/// Rules are disjunctive: BPL status opens everything, otherwise the
/// disability list, the senior list and the baseline list are tried in turn.
#[inline]
pub fn is_scheme_eligible(scheme: &str, below_poverty_line: bool, disabled: bool, age: u32) -> bool {
    if below_poverty_line {
        return true;
    }
    if disabled && DISABILITY_SCHEMES.contains(&scheme) {
        return true;
    }
    if age >= SENIOR_CITIZEN_AGE && SENIOR_SCHEMES.contains(&scheme) {
        return true;
    }
    BASELINE_SCHEMES.contains(&scheme)
}

/// Schemes the patient can use at the given hospitals, at most six
///
/// The cap keeps discovery order; nothing is re-sorted before truncation.
pub fn eligible_schemes<'a, I>(hospitals: I, below_poverty_line: bool, disabled: bool, age: u32) -> Vec<String>
where
    I: IntoIterator<Item = &'a HospitalRecord>,
{
    collect_schemes(hospitals)
        .into_iter()
        .filter(|scheme| is_scheme_eligible(scheme, below_poverty_line, disabled, age))
        .take(MAX_ELIGIBLE_SCHEMES)
        .collect()
}

/// [`eligible_schemes`] driven by a patient profile
pub fn eligible_schemes_for<'a, I>(hospitals: I, patient: &PatientProfile) -> Vec<String>
where
    I: IntoIterator<Item = &'a HospitalRecord>,
{
    eligible_schemes(hospitals, patient.below_poverty_line, patient.disabled, patient.age)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hospital(id: &str, schemes: &str) -> HospitalRecord {
        HospitalRecord::new(id, 14.0, 77.0).with_schemes(schemes)
    }

    #[test]
    fn test_collect_schemes_dedupes_in_discovery_order() {
        let hospitals = vec![
            hospital("1", "NHM, CGHS"),
            hospital("2", "CGHS, AB-PMJAY, NHM"),
            hospital("3", "OPD"),
        ];

        let schemes = collect_schemes(&hospitals);

        assert_eq!(schemes, vec!["NHM", "CGHS", "AB-PMJAY", "OPD"]);
    }

    #[test]
    fn test_bpl_unlocks_everything_capped_at_six() {
        let hospitals = vec![
            hospital("1", "Star Health, NHM, CGHS, ESIC"),
            hospital("2", "New India, United Health, AIIMS, OPD"),
        ];

        let schemes = eligible_schemes(&hospitals, true, false, 30);

        assert_eq!(
            schemes,
            vec!["Star Health", "NHM", "CGHS", "ESIC", "New India", "United Health"]
        );
    }

    #[test]
    fn test_disability_schemes() {
        let hospitals = vec![hospital("1", "NRHM, Star Health, NUHM, NHA")];

        assert_eq!(eligible_schemes(&hospitals, false, true, 30), vec!["NRHM", "NUHM"]);
        assert!(eligible_schemes(&hospitals, false, false, 30).is_empty());
    }

    #[test]
    fn test_senior_schemes() {
        let hospitals = vec![hospital("1", "NHA, AB-PMJAY, NHM")];

        assert_eq!(eligible_schemes(&hospitals, false, false, 60), vec!["NHA", "AB-PMJAY"]);
        assert!(eligible_schemes(&hospitals, false, false, 59).is_empty());
    }

    #[test]
    fn test_baseline_schemes_always_open() {
        let hospitals = vec![hospital("1", "Star Health, AIIMS, OPD, CGHS")];

        assert_eq!(eligible_schemes(&hospitals, false, false, 25), vec!["AIIMS", "OPD", "CGHS"]);
    }

    #[test]
    fn test_scheme_names_are_case_sensitive() {
        assert!(!is_scheme_eligible("cghs", false, false, 70));
        assert!(is_scheme_eligible("CGHS", false, false, 20));
    }

    #[test]
    fn test_empty_subset() {
        let none: Vec<HospitalRecord> = Vec::new();
        assert!(eligible_schemes(&none, false, false, 40).is_empty());
        assert!(eligible_schemes(&none, true, true, 70).is_empty());
    }

    #[test]
    fn test_profile_driven() {
        let hospitals = vec![hospital("1", "NHM, CGHS")];
        let patient = PatientProfile::from_labels("Neurology", "above", "yes", 35, None);

        assert_eq!(eligible_schemes_for(&hospitals, &patient), vec!["NHM", "CGHS"]);
    }
}
