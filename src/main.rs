use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use jeevan_setu::config::{LoggingSettings, Settings};
use jeevan_setu::core::Ranker;
use jeevan_setu::error::{handle_json_payload_error, handle_query_payload_error};
use jeevan_setu::routes::{self, AppState, RouteLimits};
use jeevan_setu::services::{
    DisabledExplainer, GeminiClient, HospitalCatalog, InMemoryReferralStore, OverpassClient, TextExplainer,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Load configuration; logging settings live there too
    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging);

    info!("Starting Jeevan-Setu referral service...");
    info!("Configuration loaded successfully");

    // Load the hospital catalog once; it is read-only from here on
    let catalog = HospitalCatalog::load(&settings.catalog.path).map_err(|e| {
        error!("Could not load hospital catalog: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;

    info!("Loaded {} hospitals", catalog.len());

    // Initialize explainer (optional - referrals fall back to a fixed sentence)
    let explainer: Arc<dyn TextExplainer> = if settings.gemini.api_key.is_empty() {
        warn!("GEMINI_API_KEY not set, AI explanations disabled");
        Arc::new(DisabledExplainer)
    } else {
        let client = GeminiClient::new(
            settings.gemini.endpoint.clone(),
            settings.gemini.api_key.clone(),
            settings.gemini.model.clone(),
            settings.gemini.timeout_secs,
        )
        .map_err(|e| {
            error!("Failed to build Gemini client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;
        info!("Gemini explainer initialized (model: {})", settings.gemini.model);
        Arc::new(client)
    };

    // Initialize Overpass client
    let lookup = Arc::new(
        OverpassClient::new(settings.overpass.endpoint.clone(), settings.overpass.timeout_secs).map_err(|e| {
            error!("Failed to build Overpass client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?,
    );

    info!("Overpass client initialized ({})", settings.overpass.endpoint);

    // Initialize ranker with configured weights
    let ranker = Ranker::new(settings.scoring_weights());

    info!("Ranker initialized with weights: {:?}", ranker.weights());

    // Build application state
    let app_state = AppState {
        catalog,
        ranker,
        explainer,
        lookup,
        referrals: Arc::new(InMemoryReferralStore::new()),
        limits: RouteLimits {
            referral_top_n: settings.ranking.referral_top_n,
            nearby_top_n: settings.ranking.nearby_top_n,
            referral_radius_km: settings.overpass.referral_radius_km,
            default_radius_km: settings.overpass.default_radius_km,
        },
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);
    info!("   POST /api/referral");
    info!("   GET  /api/referral/{{id}}");
    info!("   GET  /api/hospitals/nearby?lat=&lon=&condition=");
    info!("   GET  /health");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
            .default_service(web::to(routes::not_found))
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}

fn init_logging(logging: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match logging.format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "full" => subscriber.init(),
        _ => subscriber.compact().init(),
    }
}
