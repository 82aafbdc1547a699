use actix_web::{web, HttpResponse};

use super::{lookup_nearby, AppState};
use crate::error::{json_response, ApiError};
use crate::models::{DatabaseHospital, NearbyHospitalsResponse, NearbyQuery, NearbyQueryEcho, OsmHospital};

/// Configure hospital lookup routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/hospitals/nearby", web::get().to(nearby_hospitals));
}

/// Catalog and OpenStreetMap hospitals around a point
///
/// GET /api/hospitals/nearby?lat={lat}&lon={lon}&condition={condition}&radius={km}
async fn nearby_hospitals(
    state: web::Data<AppState>,
    query: web::Query<NearbyQuery>,
) -> Result<HttpResponse, ApiError> {
    let center = query
        .coordinate()
        .ok_or_else(|| ApiError::BadRequest("lat and lon are required query params".to_string()))?;
    let condition = query.condition();
    let radius_km = query.radius_km(state.limits.default_radius_km);

    let database_hospitals: Vec<DatabaseHospital> = state
        .ranker
        .rank(state.catalog.hospitals(), Some(center), condition, state.limits.nearby_top_n)
        .iter()
        .map(DatabaseHospital::from)
        .collect();

    let osm_hospitals: Vec<OsmHospital> = lookup_nearby(state.lookup.as_ref(), center, radius_km)
        .await
        .into_iter()
        .map(OsmHospital::from)
        .collect();

    tracing::info!(
        "Nearby lookup at ({}, {}) within {}km: {} catalog, {} OSM",
        center.lat,
        center.lon,
        radius_km,
        database_hospitals.len(),
        osm_hospitals.len()
    );

    let total = database_hospitals.len() + osm_hospitals.len();
    json_response(&NearbyHospitalsResponse {
        query: NearbyQueryEcho {
            lat: center.lat,
            lon: center.lon,
            condition: condition.to_string(),
            radius_km,
        },
        database_hospitals,
        osm_hospitals,
        total,
    })
}
