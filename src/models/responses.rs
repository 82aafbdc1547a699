use serde::{Deserialize, Serialize};

use crate::models::domain::{Coordinate, NearbyFacility, PriorityTier, ScoredHospital};

/// Round to a fixed number of decimals for display
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Recommended hospital as rendered in a referral record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedHospital {
    pub id: String,
    pub city: String,
    pub state: String,
    pub district: String,
    pub rating: f64,
    pub reviews: u32,
    pub specialisation: String,
    pub beds: u32,
    pub schemes: String,
    pub coordinates: Coordinate,
    pub distance_km: Option<f64>,
    pub score: f64,
}

impl From<&ScoredHospital> for RecommendedHospital {
    fn from(scored: &ScoredHospital) -> Self {
        let h = &scored.hospital;
        Self {
            id: h.id.clone(),
            city: h.city.clone(),
            state: h.state.clone(),
            district: h.district.clone(),
            rating: h.rating,
            reviews: h.reviews,
            specialisation: h.specialisation.clone(),
            beds: h.beds,
            schemes: h.insurance_schemes.clone(),
            coordinates: h.coordinate(),
            distance_km: scored.distance_km.map(|d| round_to(d, 2)),
            score: round_to(scored.score, 3),
        }
    }
}

/// Stored and returned referral
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralRecord {
    pub referral_id: String,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub current_hospital: String,
    pub disease_label: String,
    pub priority: PriorityTier,
    pub bpl_status: String,
    pub disabled: String,
    pub location: Option<Coordinate>,
    pub address: Option<String>,
    pub received_at: String,
    pub recommended_hospitals: Vec<RecommendedHospital>,
    pub nearby_osm_hospitals: Vec<NearbyFacility>,
    pub ai_explanation: String,
    pub schemes_eligible: Vec<String>,
}

/// Catalog hospital in the nearby listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseHospital {
    pub source: String,
    pub id: String,
    pub city: String,
    pub state: String,
    pub specialisation: String,
    pub rating: f64,
    pub beds: u32,
    pub schemes: String,
    pub coordinates: Coordinate,
    pub distance_km: Option<f64>,
}

impl From<&ScoredHospital> for DatabaseHospital {
    fn from(scored: &ScoredHospital) -> Self {
        let h = &scored.hospital;
        Self {
            source: "database".to_string(),
            id: h.id.clone(),
            city: h.city.clone(),
            state: h.state.clone(),
            specialisation: h.specialisation.clone(),
            rating: h.rating,
            beds: h.beds,
            schemes: h.insurance_schemes.clone(),
            coordinates: h.coordinate(),
            distance_km: scored.distance_km.map(|d| round_to(d, 2)),
        }
    }
}

/// OpenStreetMap facility in the nearby listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsmHospital {
    pub source: String,
    #[serde(flatten)]
    pub facility: NearbyFacility,
}

impl From<NearbyFacility> for OsmHospital {
    fn from(facility: NearbyFacility) -> Self {
        Self {
            source: "openstreetmap".to_string(),
            facility,
        }
    }
}

/// Echo of the nearby query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyQueryEcho {
    pub lat: f64,
    pub lon: f64,
    pub condition: String,
    pub radius_km: u32,
}

/// Response for the nearby hospitals endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyHospitalsResponse {
    pub query: NearbyQueryEcho,
    pub database_hospitals: Vec<DatabaseHospital>,
    pub osm_hospitals: Vec<OsmHospital>,
    pub total: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub hospitals_loaded: usize,
    pub version: String,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: serde_json::Value,
}
