use crate::models::{PatientProfile, ScoredHospital};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while producing a referral explanation
#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Explainer returned no text")]
    EmptyResponse,

    #[error("Explainer is not configured")]
    NotConfigured,
}

/// Patient details shown to the explainer
#[derive(Debug, Clone)]
pub struct ReferralPatient {
    pub name: String,
    pub gender: String,
    pub current_hospital: String,
    pub profile: PatientProfile,
}

/// Capability that turns a ranking into human-readable prose
#[async_trait]
pub trait TextExplainer: Send + Sync {
    async fn explain(
        &self,
        patient: &ReferralPatient,
        hospitals: &[ScoredHospital],
    ) -> Result<String, ExplainerError>;
}

/// Explainer used when no generative-AI key is configured
#[derive(Debug, Clone, Default)]
pub struct DisabledExplainer;

#[async_trait]
impl TextExplainer for DisabledExplainer {
    async fn explain(
        &self,
        _patient: &ReferralPatient,
        _hospitals: &[ScoredHospital],
    ) -> Result<String, ExplainerError> {
        Err(ExplainerError::NotConfigured)
    }
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    model: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        timeout_secs: u64,
    ) -> Result<Self, ExplainerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            endpoint,
            api_key,
            model,
            client,
        })
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TextExplainer for GeminiClient {
    async fn explain(
        &self,
        patient: &ReferralPatient,
        hospitals: &[ScoredHospital],
    ) -> Result<String, ExplainerError> {
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(patient, hospitals) }] }]
        });

        tracing::debug!("Requesting explanation from model {}", self.model);

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ExplainerError::ApiError(format!(
                "generateContent failed: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        extract_text(&json)
    }
}

/// Pull the first candidate's text out of a `generateContent` response
fn extract_text(json: &Value) -> Result<String, ExplainerError> {
    let parts = json
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .ok_or_else(|| ExplainerError::InvalidResponse("Missing candidates[0].content.parts".into()))?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    let text = text.trim();
    if text.is_empty() {
        return Err(ExplainerError::EmptyResponse);
    }
    Ok(text.to_string())
}

/// Prompt listing the patient and the ranked hospitals
pub fn build_prompt(patient: &ReferralPatient, hospitals: &[ScoredHospital]) -> String {
    let profile = &patient.profile;

    let mut hospital_list = String::new();
    for (i, scored) in hospitals.iter().enumerate() {
        let h = &scored.hospital;
        let distance = scored
            .distance_km
            .map(|d| format!("{:.1} km", d))
            .unwrap_or_else(|| "N/A".to_string());
        let _ = writeln!(
            hospital_list,
            "{}. {} - {}, {} | Rating: {} | Specialisation: {} | Beds: {} | Distance: {} | Schemes: {}",
            i + 1,
            h.id,
            h.city,
            h.state,
            h.rating,
            h.specialisation,
            h.beds,
            distance,
            h.insurance_schemes
        );
    }

    let location = profile
        .coordinate
        .map(|c| format!("{:.4}, {:.4}", c.lat, c.lon))
        .unwrap_or_else(|| "Not provided".to_string());

    format!(
        "You are a medical referral assistant for India's public healthcare system.\n\
         \n\
         Patient Profile:\n\
         - Name: {name}\n\
         - Age: {age}, Gender: {gender}\n\
         - Condition requiring referral: {condition}\n\
         - Income: {income}\n\
         - Disability: {disability}\n\
         - Current Hospital: {current}\n\
         - Location: {location}\n\
         \n\
         Top Recommended Hospitals (ranked by score):\n\
         {hospital_list}\n\
         Task:\n\
         1. In 2-3 sentences, explain why these hospitals were recommended for this patient.\n\
         2. Name the most relevant hospital and its key strengths (specialisation, rating, proximity if known).\n\
         3. Note any insurance schemes the patient may benefit from given their profile.\n\
         4. Keep the tone professional, concise and human-readable.\n\
         \n\
         Do not use bullet points. Write in clear prose.\n",
        name = patient.name,
        age = profile.age,
        gender = patient.gender,
        condition = profile.condition,
        income = if profile.below_poverty_line { "Below BPL" } else { "Above BPL" },
        disability = if profile.disabled { "Yes" } else { "No" },
        current = patient.current_hospital,
        location = location,
        hospital_list = hospital_list,
    )
}

/// Deterministic explanation used when the explainer fails
pub fn fallback_explanation(hospitals: &[ScoredHospital], condition: &str) -> String {
    match hospitals.first() {
        Some(top) => {
            let h = &top.hospital;
            format!(
                "{} in {} is recommended based on its rating of {} and specialisation in {}, \
                 making it well-suited for {} cases.",
                h.id, h.city, h.rating, h.specialisation, condition
            )
        }
        None => format!("No catalog hospital could be recommended for {} cases.", condition),
    }
}
