use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use skillswap_match::config::Settings;
use skillswap_match::core::Matcher;
use skillswap_match::routes::{self, AppState};
use skillswap_match::services::supabase::DEFAULT_PAGE_SIZE;
use skillswap_match::services::{MatchCache, PostgresClient, SupabaseClient, SupabaseTables};
use std::sync::Arc;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST))
            .json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path parameter errors (e.g. a malformed group id)
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    }
    .into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match format {
        "pretty" => subscriber.pretty().init(),
        "compact" => subscriber.compact().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting SkillSwap matching service...");

    let tables = SupabaseTables {
        profiles: settings.supabase.profiles_table.clone(),
        skills_teach: settings.supabase.skills_teach_table.clone(),
        skills_learn: settings.supabase.skills_learn_table.clone(),
        skills_order_column: settings.supabase.skills_order_column.clone(),
    };

    let supabase = Arc::new(
        SupabaseClient::new(
            settings.supabase.url.clone(),
            settings.supabase.api_key.clone(),
            tables,
            settings.supabase.timeout_secs.unwrap_or(30),
        )
        .map_err(|e| {
            error!("Failed to create Supabase client: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?
        .with_page_size(settings.supabase.page_size.unwrap_or(DEFAULT_PAGE_SIZE)),
    );

    info!("Supabase client initialized");

    let cache = match (settings.cache.enabled, settings.cache.redis_url.as_deref()) {
        (true, Some(redis_url)) => {
            let ttl = settings.cache.ttl_secs.unwrap_or(60);
            let capacity = settings.cache.local_capacity.unwrap_or(1000);

            match MatchCache::connect(redis_url, capacity, ttl).await {
                Ok(c) => {
                    info!("Match cache enabled (local: {} entries, TTL: {}s)", capacity, ttl);
                    Some(Arc::new(c))
                }
                Err(e) => {
                    warn!("Failed to connect to Redis ({}), running without cache", e);
                    None
                }
            }
        }
        (true, None) => {
            warn!("Match cache enabled without cache.redis_url, running without cache");
            None
        }
        (false, _) => {
            info!("Match cache disabled, matches are computed per request");
            None
        }
    };

    let db_max_conn = settings.database.max_connections.unwrap_or(10);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    let weights = settings.scoring_weights();
    let matcher = Matcher::new(weights)
        .with_default_limit(usize::from(settings.matching.default_limit));

    info!("Matcher initialized with weights: {:?}", weights);

    let app_state = AppState {
        supabase,
        postgres,
        cache,
        matcher,
        max_limit: usize::from(settings.matching.max_limit),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
