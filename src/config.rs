use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub ranking: RankingSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub overpass: OverpassSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { path: default_catalog_path() }
    }
}

fn default_catalog_path() -> String { "hospital.json".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct RankingSettings {
    #[serde(default = "default_referral_top_n")]
    pub referral_top_n: usize,
    #[serde(default = "default_nearby_top_n")]
    pub nearby_top_n: usize,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for RankingSettings {
    fn default() -> Self {
        Self {
            referral_top_n: default_referral_top_n(),
            nearby_top_n: default_nearby_top_n(),
            weights: WeightsConfig::default(),
        }
    }
}

fn default_referral_top_n() -> usize { 5 }
fn default_nearby_top_n() -> usize { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_specialisation_weight")]
    pub specialisation: f64,
    #[serde(default = "default_distance_weight")]
    pub distance: f64,
    #[serde(default = "default_distance_horizon_km")]
    pub distance_horizon_km: f64,
    #[serde(default = "default_neutral_distance")]
    pub neutral_distance: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            specialisation: default_specialisation_weight(),
            distance: default_distance_weight(),
            distance_horizon_km: default_distance_horizon_km(),
            neutral_distance: default_neutral_distance(),
        }
    }
}

fn default_rating_weight() -> f64 { 0.5 }
fn default_specialisation_weight() -> f64 { 0.3 }
fn default_distance_weight() -> f64 { 0.2 }
fn default_distance_horizon_km() -> f64 { 500.0 }
fn default_neutral_distance() -> f64 { 0.5 }

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        Self {
            rating: config.rating,
            specialisation: config.specialisation,
            distance: config.distance,
            distance_horizon_km: config.distance_horizon_km,
            neutral_distance: config.neutral_distance,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_gemini_model")]
    pub model: String,
    /// Empty disables AI explanations; the fallback sentence is used instead
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_gemini_timeout")]
    pub timeout_secs: u64,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            model: default_gemini_model(),
            api_key: String::new(),
            timeout_secs: default_gemini_timeout(),
        }
    }
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com".to_string() }
fn default_gemini_model() -> String { "gemini-2.0-flash".to_string() }
fn default_gemini_timeout() -> u64 { 20 }

#[derive(Debug, Clone, Deserialize)]
pub struct OverpassSettings {
    #[serde(default = "default_overpass_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_overpass_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_referral_radius_km")]
    pub referral_radius_km: u32,
    #[serde(default = "default_nearby_radius_km")]
    pub default_radius_km: u32,
}

impl Default for OverpassSettings {
    fn default() -> Self {
        Self {
            endpoint: default_overpass_endpoint(),
            timeout_secs: default_overpass_timeout(),
            referral_radius_km: default_referral_radius_km(),
            default_radius_km: default_nearby_radius_km(),
        }
    }
}

fn default_overpass_endpoint() -> String { "https://overpass-api.de/api/interpreter".to_string() }
fn default_overpass_timeout() -> u64 { 8 }
fn default_referral_radius_km() -> u32 { 30 }
fn default_nearby_radius_km() -> u32 { 50 }

/// Subscriber settings; `RUST_LOG` still wins over `level` when set
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty`, `compact` or `full`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with JEEVAN_)
    /// 5. `GEMINI_API_KEY`, `PORT`, `LOG_LEVEL` and `LOG_FORMAT`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., JEEVAN__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("JEEVAN")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_deployment_overrides(settings)?;

        settings.try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.ranking.weights)
    }
}

/// Apply the plain environment variables older deployments set
fn apply_deployment_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(api_key) = env::var("GEMINI_API_KEY") {
        builder = builder.set_override("gemini.api_key", api_key)?;
    }
    if let Some(port) = env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
        builder = builder.set_override("server.port", i64::from(port))?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
