// Route exports
pub mod hospitals;
pub mod referrals;

use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;

use crate::core::Ranker;
use crate::error::ApiError;
use crate::models::{Coordinate, HealthResponse, NearbyFacility};
use crate::services::{HospitalCatalog, NearbyFacilityLookup, ReferralStore, TextExplainer};

/// Result counts and radii used by the handlers
#[derive(Debug, Clone, Copy)]
pub struct RouteLimits {
    pub referral_top_n: usize,
    pub nearby_top_n: usize,
    pub referral_radius_km: u32,
    pub default_radius_km: u32,
}

impl Default for RouteLimits {
    fn default() -> Self {
        Self {
            referral_top_n: 5,
            nearby_top_n: 10,
            referral_radius_km: 30,
            default_radius_km: 50,
        }
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: HospitalCatalog,
    pub ranker: Ranker,
    pub explainer: Arc<dyn TextExplainer>,
    pub lookup: Arc<dyn NearbyFacilityLookup>,
    pub referrals: Arc<dyn ReferralStore>,
    pub limits: RouteLimits,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .configure(referrals::configure)
                .configure(hospitals::configure),
        );
}

/// Welcome message
async fn index() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to Jeevan-Setu API",
        "status": "active",
        "documentation": "/health",
    }))
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        hospitals_loaded: state.catalog.len(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Route not found".to_string()))
}

/// Query the geodata collaborator, degrading to an empty list on failure
pub(crate) async fn lookup_nearby(
    lookup: &dyn NearbyFacilityLookup,
    center: Coordinate,
    radius_km: u32,
) -> Vec<NearbyFacility> {
    match lookup.nearby(center, radius_km).await {
        Ok(facilities) => facilities,
        Err(e) => {
            tracing::warn!("Nearby facility lookup failed, continuing without it: {}", e);
            Vec::new()
        }
    }
}
