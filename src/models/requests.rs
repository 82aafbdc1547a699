use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::lenient;
use crate::models::domain::{Coordinate, PatientProfile};

/// Patient location as sent by the referral form
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RequestLocation {
    #[serde(default, deserialize_with = "lenient::json_number")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient::json_number")]
    pub lng: Option<f64>,
}

/// Request to create a referral
///
/// Every field is optional at the serde level and wrongly typed values
/// read as missing, so the client gets a validation message instead of a
/// JSON parse failure. `age` stays raw because its type is part of the
/// validation rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReferralRequest {
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(required(message = "name is required"))]
    pub name: Option<String>,
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(
        required(message = "gender is required"),
        length(min = 1, message = "gender is required")
    )]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(required(message = "hospital is required"))]
    pub hospital: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(
        required(message = "disease/condition is required"),
        length(min = 1, message = "disease/condition is required")
    )]
    pub disease: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub other_disease: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(
        required(message = "bplStatus is required"),
        length(min = 1, message = "bplStatus is required")
    )]
    pub bpl_status: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    #[validate(
        required(message = "disabled status is required"),
        length(min = 1, message = "disabled status is required")
    )]
    pub disabled: Option<String>,
    #[serde(default, deserialize_with = "lenient::object")]
    pub location: Option<RequestLocation>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub timestamp: Option<String>,
}

const AGE_MESSAGE: &str = "age must be a whole number between 1 and 120";

impl ReferralRequest {
    /// Collect every validation problem as a client-facing message
    ///
    /// Combines the derived field rules with the cross-field rules
    /// (blank strings, age type and range, `otherDisease` for "other").
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if let Err(errors) = self.validate() {
            let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
            fields.sort_by(|a, b| a.0.cmp(&b.0));
            for (_, field_errors) in fields {
                for error in field_errors {
                    if let Some(message) = &error.message {
                        push_unique(&mut problems, message.to_string());
                    }
                }
            }
        }

        if is_blank(self.name.as_deref()) {
            push_unique(&mut problems, "name is required".to_string());
        }
        if self.valid_age().is_none() {
            push_unique(&mut problems, AGE_MESSAGE.to_string());
        }
        if is_blank(self.hospital.as_deref()) {
            push_unique(&mut problems, "hospital is required".to_string());
        }
        if self.disease.as_deref() == Some("other") && is_blank(self.other_disease.as_deref()) {
            push_unique(
                &mut problems,
                "otherDisease is required when disease is 'other'".to_string(),
            );
        }

        problems
    }

    /// Human-readable condition label, e.g. "cardiology" -> "Cardiology"
    pub fn disease_label(&self) -> String {
        let disease = self.disease.as_deref().unwrap_or_default();
        if disease == "other" {
            return match self.other_disease.as_deref() {
                Some(other) if !other.is_empty() => other.to_string(),
                _ => "Other".to_string(),
            };
        }

        let mut chars = disease.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Patient coordinate, present only when both components were sent
    ///
    /// Zero is a real latitude or longitude, not a missing one.
    pub fn coordinate(&self) -> Option<Coordinate> {
        let location = self.location?;
        match (location.lat, location.lng) {
            (Some(lat), Some(lng)) if lat.is_finite() && lng.is_finite() => {
                Some(Coordinate::new(lat, lng))
            }
            _ => None,
        }
    }

    /// Age when the body carried a JSON whole number in 1..=120
    pub fn valid_age(&self) -> Option<u32> {
        let age = self.age.as_ref()?.as_f64()?;
        (age.fract() == 0.0 && (1.0..=120.0).contains(&age)).then_some(age as u32)
    }

    /// Whole-year age; only meaningful after [`Self::problems`] came back empty
    pub fn age_years(&self) -> u32 {
        self.valid_age().unwrap_or(0)
    }

    pub fn patient_profile(&self) -> PatientProfile {
        PatientProfile::from_labels(
            self.disease_label(),
            self.bpl_status.as_deref().unwrap_or_default(),
            self.disabled.as_deref().unwrap_or_default(),
            self.age_years(),
            self.coordinate(),
        )
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|v| v.trim().is_empty()).unwrap_or(true)
}

fn push_unique(problems: &mut Vec<String>, message: String) {
    if !problems.contains(&message) {
        problems.push(message);
    }
}

/// Query parameters for the nearby hospitals endpoint
///
/// Kept as raw strings so unparsable numbers get a 400 with a useful message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub condition: Option<String>,
    pub radius: Option<String>,
}

impl NearbyQuery {
    pub fn coordinate(&self) -> Option<Coordinate> {
        let lat = self.lat.as_deref()?.trim().parse::<f64>().ok()?;
        let lon = self.lon.as_deref()?.trim().parse::<f64>().ok()?;
        if lat.is_finite() && lon.is_finite() {
            Some(Coordinate::new(lat, lon))
        } else {
            None
        }
    }

    /// Search radius in km, falling back to `default_km` when absent, unparsable or zero
    pub fn radius_km(&self, default_km: u32) -> u32 {
        self.radius
            .as_deref()
            .and_then(|r| r.trim().parse::<u32>().ok())
            .filter(|r| *r > 0)
            .unwrap_or(default_km)
    }

    pub fn condition(&self) -> &str {
        self.condition.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_request() -> ReferralRequest {
        ReferralRequest {
            name: Some("Asha".to_string()),
            age: Some(json!(42)),
            gender: Some("female".to_string()),
            hospital: Some("District Hospital".to_string()),
            disease: Some("cardiology".to_string()),
            other_disease: None,
            bpl_status: Some("below".to_string()),
            disabled: Some("no".to_string()),
            location: Some(RequestLocation { lat: Some(14.68), lng: Some(77.6) }),
            address: None,
            timestamp: None,
        }
    }

    #[test]
    fn test_valid_request_has_no_problems() {
        assert!(valid_request().problems().is_empty());
    }

    #[test]
    fn test_missing_fields_reported() {
        let problems = ReferralRequest::default().problems();

        assert!(problems.contains(&"name is required".to_string()));
        assert!(problems.contains(&AGE_MESSAGE.to_string()));
        assert!(problems.contains(&"gender is required".to_string()));
        assert!(problems.contains(&"hospital is required".to_string()));
        assert!(problems.contains(&"disease/condition is required".to_string()));
        assert!(problems.contains(&"bplStatus is required".to_string()));
        assert!(problems.contains(&"disabled status is required".to_string()));
    }

    #[test]
    fn test_age_rules() {
        let mut request = valid_request();
        for bad_age in [json!(42.5), json!(0), json!(121), json!(-3), json!("42"), json!(null), json!([42])] {
            request.age = Some(bad_age.clone());
            assert_eq!(request.problems(), vec![AGE_MESSAGE.to_string()], "age {}", bad_age);
        }

        request.age = Some(json!(120));
        assert!(request.problems().is_empty());
        assert_eq!(request.age_years(), 120);
    }

    #[test]
    fn test_wrongly_typed_fields_read_as_missing() {
        let request: ReferralRequest = serde_json::from_value(json!({
            "name": 123,
            "age": "42",
            "gender": "female",
            "hospital": "PHC",
            "disease": "cardiology",
            "bplStatus": "below",
            "disabled": "no",
            "location": { "lat": "14.68", "lng": 77.6 },
        }))
        .unwrap();

        let problems = request.problems();
        assert_eq!(problems.len(), 2);
        assert!(problems.contains(&"name is required".to_string()));
        assert!(problems.contains(&AGE_MESSAGE.to_string()));
        assert_eq!(request.coordinate(), None);

        let request: ReferralRequest = serde_json::from_value(json!({ "location": "Anantapur" })).unwrap();
        assert!(request.location.is_none());
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut request = valid_request();
        request.name = Some("   ".to_string());
        assert_eq!(request.problems(), vec!["name is required".to_string()]);
    }

    #[test]
    fn test_other_disease_required() {
        let mut request = valid_request();
        request.disease = Some("other".to_string());
        assert_eq!(
            request.problems(),
            vec!["otherDisease is required when disease is 'other'".to_string()]
        );

        request.other_disease = Some("Rheumatology".to_string());
        assert!(request.problems().is_empty());
        assert_eq!(request.disease_label(), "Rheumatology");
    }

    #[test]
    fn test_disease_label_capitalized() {
        let request = valid_request();
        assert_eq!(request.disease_label(), "Cardiology");
    }

    #[test]
    fn test_coordinate_requires_both_components() {
        let mut request = valid_request();
        assert_eq!(request.coordinate(), Some(Coordinate::new(14.68, 77.6)));

        request.location = Some(RequestLocation { lat: Some(14.68), lng: None });
        assert_eq!(request.coordinate(), None);

        request.location = None;
        assert_eq!(request.coordinate(), None);
    }

    #[test]
    fn test_zero_coordinate_is_a_location() {
        let mut request = valid_request();

        request.location = Some(RequestLocation { lat: Some(0.0), lng: Some(0.0) });
        assert_eq!(request.coordinate(), Some(Coordinate::new(0.0, 0.0)));

        request.location = Some(RequestLocation { lat: Some(0.0), lng: Some(77.6) });
        assert_eq!(request.coordinate(), Some(Coordinate::new(0.0, 77.6)));
        assert_eq!(request.patient_profile().coordinate, Some(Coordinate::new(0.0, 77.6)));
    }

    #[test]
    fn test_camel_case_body() {
        let request: ReferralRequest = serde_json::from_value(serde_json::json!({
            "name": "Ravi",
            "age": 67,
            "gender": "male",
            "hospital": "PHC",
            "disease": "other",
            "otherDisease": "Geriatrics",
            "bplStatus": "above",
            "disabled": "yes",
        }))
        .unwrap();

        assert!(request.problems().is_empty());
        let patient = request.patient_profile();
        assert_eq!(patient.condition, "Geriatrics");
        assert_eq!(patient.age, 67);
        assert!(patient.disabled);
        assert!(!patient.below_poverty_line);
        assert!(patient.coordinate.is_none());
    }

    #[test]
    fn test_nearby_query_parsing() {
        let query = NearbyQuery {
            lat: Some("14.68".to_string()),
            lon: Some("77.6".to_string()),
            condition: None,
            radius: Some("0".to_string()),
        };

        assert_eq!(query.coordinate(), Some(Coordinate::new(14.68, 77.6)));
        assert_eq!(query.radius_km(50), 50);
        assert_eq!(query.condition(), "");

        let query = NearbyQuery {
            lat: Some("abc".to_string()),
            ..query
        };
        assert_eq!(query.coordinate(), None);
    }
}
