use serde::{Deserialize, Serialize};

use super::lenient;

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Raw hospital row as it appears in the catalog JSON file
///
/// Every optional field is resolved to a default in
/// [`HospitalRecord::from`], so scoring never sees a missing value.
/// Optional cells of the wrong type are read as missing.
#[derive(Debug, Clone, Deserialize)]
pub struct HospitalRow {
    pub id: String,
    #[serde(rename = "City", default, deserialize_with = "lenient::text")]
    pub city: Option<String>,
    #[serde(rename = "State", default, deserialize_with = "lenient::text")]
    pub state: Option<String>,
    #[serde(rename = "District", default, deserialize_with = "lenient::text")]
    pub district: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "Rating", default, deserialize_with = "lenient::number")]
    pub rating: Option<f64>,
    #[serde(rename = "Specialisation", default, deserialize_with = "lenient::text")]
    pub specialisation: Option<String>,
    #[serde(rename = "No of Beds", default, deserialize_with = "lenient::count")]
    pub beds: Option<u32>,
    #[serde(rename = "Insurance Schemes", default, deserialize_with = "lenient::text")]
    pub insurance_schemes: Option<String>,
    #[serde(rename = "Number of Reviews", default, deserialize_with = "lenient::count")]
    pub reviews: Option<u32>,
}

/// Immutable catalog entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalRecord {
    pub id: String,
    pub city: String,
    pub state: String,
    pub district: String,
    pub latitude: f64,
    pub longitude: f64,
    pub rating: f64,
    /// Specialisation list as published, for display
    pub specialisation: String,
    /// Lower-cased, trimmed specialisation tags used for matching
    #[serde(skip)]
    pub specialisation_tags: Vec<String>,
    pub beds: u32,
    /// Scheme list as published, for display
    pub insurance_schemes: String,
    /// Trimmed scheme names in published order
    #[serde(skip)]
    pub schemes: Vec<String>,
    pub reviews: u32,
}

impl From<HospitalRow> for HospitalRecord {
    fn from(row: HospitalRow) -> Self {
        let specialisation = row.specialisation.unwrap_or_default();
        let insurance_schemes = row.insurance_schemes.unwrap_or_default();

        Self {
            id: row.id,
            city: row.city.unwrap_or_default(),
            state: row.state.unwrap_or_default(),
            district: row.district.unwrap_or_default(),
            latitude: row.latitude,
            longitude: row.longitude,
            rating: row.rating.filter(|r| r.is_finite()).unwrap_or(0.0),
            specialisation_tags: split_list(&specialisation)
                .map(|tag| tag.to_lowercase())
                .collect(),
            specialisation,
            beds: row.beds.unwrap_or(0),
            schemes: split_list(&insurance_schemes).map(str::to_string).collect(),
            insurance_schemes,
            reviews: row.reviews.unwrap_or(0),
        }
    }
}

/// Split a comma-separated catalog field into trimmed, non-empty entries
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|entry| !entry.is_empty())
}

impl HospitalRecord {
    /// Build a record with every optional field at its default
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            id: id.into(),
            city: String::new(),
            state: String::new(),
            district: String::new(),
            latitude,
            longitude,
            rating: 0.0,
            specialisation: String::new(),
            specialisation_tags: Vec::new(),
            beds: 0,
            insurance_schemes: String::new(),
            schemes: Vec::new(),
            reviews: 0,
        }
    }

    pub fn with_location(mut self, city: &str, district: &str, state: &str) -> Self {
        self.city = city.to_string();
        self.district = district.to_string();
        self.state = state.to_string();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_specialisation(mut self, specialisation: &str) -> Self {
        self.specialisation = specialisation.to_string();
        self.specialisation_tags = split_list(specialisation)
            .map(|tag| tag.to_lowercase())
            .collect();
        self
    }

    pub fn with_schemes(mut self, schemes: &str) -> Self {
        self.insurance_schemes = schemes.to_string();
        self.schemes = split_list(schemes).map(str::to_string).collect();
        self
    }

    pub fn with_capacity(mut self, beds: u32, reviews: u32) -> Self {
        self.beds = beds;
        self.reviews = reviews;
        self
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// A catalog entry scored against one referral request
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredHospital {
    pub hospital: HospitalRecord,
    /// Kilometers from the patient, `None` when no coordinate was supplied
    pub distance_km: Option<f64>,
    pub score: f64,
}

/// Patient attributes the core consumes
#[derive(Debug, Clone, PartialEq)]
pub struct PatientProfile {
    /// Normalized condition label, e.g. "Cardiology"
    pub condition: String,
    pub below_poverty_line: bool,
    pub disabled: bool,
    pub age: u32,
    pub coordinate: Option<Coordinate>,
}

impl PatientProfile {
    /// Build a profile from the raw form labels used by referral clients
    ///
    /// Only the exact values "below" and "yes" set their flags.
    pub fn from_labels(
        condition: impl Into<String>,
        bpl_status: &str,
        disabled: &str,
        age: u32,
        coordinate: Option<Coordinate>,
    ) -> Self {
        Self {
            condition: condition.into(),
            below_poverty_line: bpl_status == "below",
            disabled: disabled == "yes",
            age,
            coordinate,
        }
    }
}

/// Clinical urgency tier, ordered `Normal < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityTier {
    Normal,
    Medium,
    High,
}

impl PriorityTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTier::High => "HIGH",
            PriorityTier::Medium => "MEDIUM",
            PriorityTier::Normal => "NORMAL",
        }
    }
}

impl std::fmt::Display for PriorityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring weights and distance shaping
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    pub rating: f64,
    pub specialisation: f64,
    pub distance: f64,
    /// Distance at which the distance component reaches zero
    pub distance_horizon_km: f64,
    /// Distance component used when the patient gave no coordinate
    pub neutral_distance: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            rating: 0.5,
            specialisation: 0.3,
            distance: 0.2,
            distance_horizon_km: 500.0,
            neutral_distance: 0.5,
        }
    }
}

/// A real-world facility returned by the geodata lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyFacility {
    pub osm_id: i64,
    pub name: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub distance_km: Option<f64>,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub emergency: Option<String>,
}
