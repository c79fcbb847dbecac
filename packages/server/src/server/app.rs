//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, DEFAULT_MAX_UPLOAD_BYTES};
use crate::kernel::ServerDeps;
use crate::server::routes::{
    analysis_handler, dashboard_handler, health_handler, reports_handler, upload_handler,
};

/// Upper bound for the read-only routes. Uploads are bounded by the
/// metadata call instead.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared application state
#[derive(Clone)]
pub struct AxumAppState {
    pub deps: Arc<ServerDeps>,
    /// Present only when the report catalog is enabled
    pub db_pool: Option<PgPool>,
}

/// HTTP-level knobs that do not belong to the pipeline itself.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub max_upload_bytes: usize,
    /// Empty means any origin
    pub allowed_origins: Vec<String>,
}

impl HttpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            allowed_origins: config.allowed_origins.clone(),
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_origins: Vec::new(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, db_pool: Option<PgPool>, http: HttpSettings) -> Router {
    let app_state = AxumAppState {
        deps: Arc::new(deps),
        db_pool,
    };

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins(&http.allowed_origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    let upload_routes = Router::new()
        .route("/api/reports/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(http.max_upload_bytes));

    let read_routes = Router::new()
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/analyses/:id", get(analysis_handler))
        .route("/api/reports", get(reports_handler))
        .route("/health", get(health_handler))
        .layer(TimeoutLayer::new(READ_TIMEOUT));

    Router::new()
        .merge(upload_routes)
        .merge(read_routes)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.is_empty() {
        return AllowOrigin::any();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(parsed)
}
