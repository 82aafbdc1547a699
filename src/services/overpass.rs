use crate::core::distance::haversine_distance;
use crate::models::responses::round_to;
use crate::models::{Coordinate, NearbyFacility};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when querying the geodata service
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Capability that finds real-world hospitals around a point
#[async_trait]
pub trait NearbyFacilityLookup: Send + Sync {
    async fn nearby(&self, center: Coordinate, radius_km: u32) -> Result<Vec<NearbyFacility>, LookupError>;
}

/// OpenStreetMap Overpass API client
///
/// Finds `amenity=hospital` nodes and ways within a radius and returns at
/// most ten of them, each with its distance from the query point.
pub struct OverpassClient {
    endpoint: String,
    client: Client,
}

impl OverpassClient {
    pub fn new(endpoint: String, timeout_secs: u64) -> Result<Self, LookupError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { endpoint, client })
    }
}

#[async_trait]
impl NearbyFacilityLookup for OverpassClient {
    async fn nearby(&self, center: Coordinate, radius_km: u32) -> Result<Vec<NearbyFacility>, LookupError> {
        let query = build_query(center, radius_km);
        let body = format!("data={}", urlencoding::encode(&query));

        tracing::debug!("Querying Overpass for hospitals within {}km of {:?}", radius_km, center);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LookupError::ApiError(format!(
                "Overpass query failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        parse_elements(&json, center)
    }
}

/// Overpass QL for hospitals around a point
pub fn build_query(center: Coordinate, radius_km: u32) -> String {
    let radius_m = u64::from(radius_km) * 1000;
    format!(
        "[out:json][timeout:10];\n\
         (\n\
         node[\"amenity\"=\"hospital\"](around:{r},{lat},{lon});\n\
         way[\"amenity\"=\"hospital\"](around:{r},{lat},{lon});\n\
         );\n\
         out center 10;\n",
        r = radius_m,
        lat = center.lat,
        lon = center.lon,
    )
}

/// Map Overpass elements to facilities
///
/// Nodes carry `lat`/`lon`; ways carry a `center` object instead.
pub fn parse_elements(json: &Value, center: Coordinate) -> Result<Vec<NearbyFacility>, LookupError> {
    let elements = match json.get("elements") {
        Some(Value::Array(elements)) => elements,
        Some(_) => return Err(LookupError::InvalidResponse("elements is not an array".into())),
        None => return Ok(Vec::new()),
    };

    Ok(elements.iter().map(|el| parse_element(el, center)).collect())
}

fn parse_element(el: &Value, center: Coordinate) -> NearbyFacility {
    let lat = el
        .get("lat")
        .and_then(Value::as_f64)
        .or_else(|| el.pointer("/center/lat").and_then(Value::as_f64));
    let lon = el
        .get("lon")
        .and_then(Value::as_f64)
        .or_else(|| el.pointer("/center/lon").and_then(Value::as_f64));

    let tag = |key: &str| -> Option<String> {
        el.get("tags")
            .and_then(|tags| tags.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let distance_km = match (lat, lon) {
        (Some(lat), Some(lon)) => Some(round_to(haversine_distance(center.lat, center.lon, lat, lon), 2)),
        _ => None,
    };

    let address = ["addr:street", "addr:city", "addr:state"]
        .iter()
        .filter_map(|key| tag(*key))
        .collect::<Vec<_>>()
        .join(", ");

    NearbyFacility {
        osm_id: el.get("id").and_then(Value::as_i64).unwrap_or_default(),
        name: tag("name").unwrap_or_else(|| "Unnamed Hospital".to_string()),
        lat,
        lon,
        distance_km,
        address,
        phone: tag("phone").or_else(|| tag("contact:phone")),
        website: tag("website"),
        emergency: tag("emergency"),
    }
}
