use crate::core::distance::distance_between;
use crate::models::{Coordinate, HospitalRecord, ScoringWeights};

/// Composite score for one hospital, with the distance it was computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HospitalScore {
    pub score: f64,
    pub distance_km: Option<f64>,
}

/// Calculate a match score (0-1) for a hospital against a referral
///
/// Scoring formula:
/// score = (
///     rating / 5 * 0.5 +                # Published rating
///     specialisation_match * 0.3 +      # 1 if a tag and the condition overlap
///     distance_score * 0.2              # Linear decay to zero at 500 km, 0.5 if no location
/// )
pub fn calculate_hospital_score(
    hospital: &HospitalRecord,
    condition: &str,
    coordinate: Option<Coordinate>,
    weights: &ScoringWeights,
) -> HospitalScore {
    let distance_km = coordinate.map(|patient| distance_between(patient, hospital.coordinate()));

    let rating_score = calculate_rating_score(hospital.rating);
    let specialisation_score = calculate_specialisation_score(&hospital.specialisation_tags, condition);
    let distance_score = match distance_km {
        Some(km) => calculate_distance_score(km, weights.distance_horizon_km),
        None => weights.neutral_distance,
    };

    let total_score = rating_score * weights.rating
        + specialisation_score * weights.specialisation
        + distance_score * weights.distance;

    HospitalScore {
        score: total_score.clamp(0.0, 1.0),
        distance_km,
    }
}

/// Rating on the 0-5 scale mapped to 0-1
#[inline]
fn calculate_rating_score(rating: f64) -> f64 {
    rating / 5.0
}

/// 1.0 when any tag contains the condition or the condition contains a tag
///
/// Tags are expected lower-cased and trimmed; the condition is lower-cased here.
/// Matching runs both ways so "Cardio" and "Interventional Cardiology" both
/// hit a "cardiology" tag.
#[inline]
pub fn calculate_specialisation_score(tags: &[String], condition: &str) -> f64 {
    let condition = condition.to_lowercase();
    let matched = tags
        .iter()
        .any(|tag| condition.contains(tag.as_str()) || tag.contains(condition.as_str()));

    if matched {
        1.0
    } else {
        0.0
    }
}

/// Linear decay from 1 at the patient's location to 0 at the horizon
#[inline]
fn calculate_distance_score(distance_km: f64, horizon_km: f64) -> f64 {
    if horizon_km <= 0.0 {
        return 0.0;
    }
    (1.0 - distance_km / horizon_km).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::distance::haversine_distance;

    fn cardiology_hospital() -> HospitalRecord {
        HospitalRecord::new("H-1", 14.6819, 77.6006)
            .with_rating(4.0)
            .with_specialisation("Cardiology")
    }

    /// A point due north of `from` at roughly `km` kilometers
    fn point_north_of(from: Coordinate, km: f64) -> Coordinate {
        Coordinate::new(from.lat + km / 6371.0 * 180.0 / std::f64::consts::PI, from.lon)
    }

    #[test]
    fn test_worked_example_with_location() {
        let hospital = cardiology_hospital();
        let patient = point_north_of(hospital.coordinate(), 10.0);
        let weights = ScoringWeights::default();

        let result = calculate_hospital_score(&hospital, "Cardiology", Some(patient), &weights);

        let distance = result.distance_km.unwrap();
        assert!((distance - 10.0).abs() < 1e-6, "Expected 10km, got {}", distance);
        assert!((result.score - 0.896).abs() < 1e-6, "Expected 0.896, got {}", result.score);
    }

    #[test]
    fn test_worked_example_without_location() {
        let hospital = cardiology_hospital();
        let weights = ScoringWeights::default();

        let result = calculate_hospital_score(&hospital, "Cardiology", None, &weights);

        assert_eq!(result.distance_km, None);
        assert!((result.score - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_specialisation_match_is_bidirectional() {
        let tags = vec!["cardiology".to_string(), "neurology".to_string()];

        // Condition contains the tag
        assert_eq!(calculate_specialisation_score(&tags, "Paediatric Cardiology"), 1.0);
        // Tag contains the condition
        assert_eq!(calculate_specialisation_score(&tags, "Neuro"), 1.0);
        // Neither
        assert_eq!(calculate_specialisation_score(&tags, "Dermatology"), 0.0);
    }

    #[test]
    fn test_no_tags_never_match() {
        assert_eq!(calculate_specialisation_score(&[], "Cardiology"), 0.0);
    }

    #[test]
    fn test_distance_score() {
        assert_eq!(calculate_distance_score(0.0, 500.0), 1.0);
        assert!((calculate_distance_score(250.0, 500.0) - 0.5).abs() < 1e-12);
        assert_eq!(calculate_distance_score(500.0, 500.0), 0.0);
        assert_eq!(calculate_distance_score(1200.0, 500.0), 0.0);
    }

    #[test]
    fn test_missing_rating_scores_zero() {
        let hospital = HospitalRecord::new("H-2", 14.0, 77.0);
        let weights = ScoringWeights::default();

        let result = calculate_hospital_score(&hospital, "Oncology", None, &weights);

        // Only the neutral distance component contributes
        assert!((result.score - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_score_bounded() {
        let weights = ScoringWeights::default();
        let hospital = HospitalRecord::new("H-3", 14.0, 77.0)
            .with_rating(5.0)
            .with_specialisation("Oncology");
        let same_spot = Some(hospital.coordinate());

        let best = calculate_hospital_score(&hospital, "Oncology", same_spot, &weights);
        assert!(best.score <= 1.0001);
        assert!((best.score - 1.0).abs() < 1e-9);

        let inflated = hospital.clone().with_rating(9.0);
        let capped = calculate_hospital_score(&inflated, "Oncology", same_spot, &weights);
        assert!(capped.score <= 1.0);
    }

    #[test]
    fn test_distance_retained_for_display() {
        let hospital = cardiology_hospital();
        let patient = Coordinate::new(13.0827, 80.2707);
        let weights = ScoringWeights::default();

        let result = calculate_hospital_score(&hospital, "Cardiology", Some(patient), &weights);

        let expected = haversine_distance(patient.lat, patient.lon, hospital.latitude, hospital.longitude);
        assert_eq!(result.distance_km, Some(expected));
    }
}
