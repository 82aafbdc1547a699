use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;

use super::{lookup_nearby, AppState};
use crate::core::{classify_priority, eligible_schemes_for};
use crate::error::{json_response, ApiError};
use crate::models::{RecommendedHospital, ReferralRecord, ReferralRequest};
use crate::services::{fallback_explanation, ExplainerError, ReferralPatient};

/// Configure referral routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/referral", web::post().to(create_referral))
        .route("/referral/{id}", web::get().to(get_referral));
}

/// Create a referral
///
/// POST /api/referral
///
/// Request body:
/// ```json
/// {
///   "name": "string",
///   "age": 42,
///   "gender": "string",
///   "hospital": "string",
///   "disease": "cardiology|...|other",
///   "otherDisease": "string",
///   "bplStatus": "below|above",
///   "disabled": "yes|no",
///   "location": { "lat": 14.68, "lng": 77.60 },
///   "address": "string",
///   "timestamp": "RFC 3339"
/// }
/// ```
async fn create_referral(
    state: web::Data<AppState>,
    req: web::Json<ReferralRequest>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    let problems = req.problems();
    if !problems.is_empty() {
        tracing::info!("Rejected referral request: {:?}", problems);
        return Err(ApiError::Validation(problems));
    }

    let patient = ReferralPatient {
        name: req.name.clone().unwrap_or_default(),
        gender: req.gender.clone().unwrap_or_default(),
        current_hospital: req.hospital.clone().unwrap_or_default(),
        profile: req.patient_profile(),
    };
    let profile = &patient.profile;

    let top_hospitals = state.ranker.rank(
        state.catalog.hospitals(),
        profile.coordinate,
        &profile.condition,
        state.limits.referral_top_n,
    );

    tracing::debug!(
        "Ranked {} hospitals for condition {:?}, top {}",
        state.catalog.len(),
        profile.condition,
        top_hospitals.len()
    );

    // Both collaborators are independent of each other and of the ranking
    let nearby = async {
        match profile.coordinate {
            Some(center) => lookup_nearby(state.lookup.as_ref(), center, state.limits.referral_radius_km).await,
            None => Vec::new(),
        }
    };
    let explanation = state.explainer.explain(&patient, &top_hospitals);
    let (nearby_osm_hospitals, explanation) = tokio::join!(nearby, explanation);

    let ai_explanation = match explanation {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(ExplainerError::NotConfigured) => fallback_explanation(&top_hospitals, &profile.condition),
        Err(e) => {
            tracing::warn!("Explainer failed, using fallback text: {}", e);
            fallback_explanation(&top_hospitals, &profile.condition)
        }
    };

    let priority = classify_priority(&profile.condition);
    let schemes_eligible = eligible_schemes_for(top_hospitals.iter().map(|s| &s.hospital), profile);

    let record = ReferralRecord {
        referral_id: new_referral_id(),
        patient_name: patient.name.clone(),
        age: profile.age,
        gender: patient.gender.clone(),
        current_hospital: patient.current_hospital.clone(),
        disease_label: profile.condition.clone(),
        priority,
        bpl_status: req.bpl_status.clone().unwrap_or_default(),
        disabled: req.disabled.clone().unwrap_or_default(),
        location: profile.coordinate,
        address: req.address.clone().filter(|a| !a.is_empty()),
        received_at: req
            .timestamp
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        recommended_hospitals: top_hospitals.iter().map(RecommendedHospital::from).collect(),
        nearby_osm_hospitals,
        ai_explanation,
        schemes_eligible,
    };

    tracing::info!(
        "Created referral {} ({} priority, {} hospitals, {} schemes)",
        record.referral_id,
        record.priority,
        record.recommended_hospitals.len(),
        record.schemes_eligible.len()
    );

    let response = json_response(&record)?;
    state.referrals.insert(record).await;

    Ok(response)
}

/// Fetch a stored referral
///
/// GET /api/referral/{id}
async fn get_referral(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let referral_id = path.into_inner();

    match state.referrals.get(&referral_id).await {
        Some(record) => json_response(&record),
        None => {
            tracing::debug!("Referral {} not found", referral_id);
            Err(ApiError::NotFound("Referral not found".to_string()))
        }
    }
}

/// `REF-` followed by eight upper-case hex digits
fn new_referral_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("REF-{}", id[..8].to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referral_id_format() {
        let id = new_referral_id();

        assert_eq!(id.len(), 12);
        assert!(id.starts_with("REF-"));
        assert!(id[4..].chars().all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)));
    }

    #[test]
    fn test_referral_ids_differ() {
        assert_ne!(new_referral_id(), new_referral_id());
    }
}
