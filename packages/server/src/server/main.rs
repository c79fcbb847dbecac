// Main entry point for the report analysis server

use std::sync::Arc;

use anyhow::{Context, Result};
use openrouter_client::OpenRouterClient;
use report_core::domains::analysis::AnalysisStore;
use report_core::domains::documents::DocumentParser;
use report_core::domains::reports::PostgresReportCatalog;
use report_core::kernel::{AnalysisSettings, BaseReportCatalog, OpenRouterAI, ServerDeps};
use report_core::server::{build_app, HttpSettings};
use report_core::Config;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,report_core=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting financial report analysis server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        analysis_model = %config.analysis_model,
        metadata_model = %config.metadata_model,
        "Configuration loaded"
    );

    // Optional durable catalog
    let db_pool = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .connect(database_url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Database connected");

            tracing::info!("Running database migrations...");
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations complete");
            Some(pool)
        }
        None => {
            tracing::info!("DATABASE_URL not set, report catalog disabled");
            None
        }
    };

    let client = OpenRouterClient::new(config.openrouter_api_key.clone())
        .with_base_url(config.openrouter_base_url.clone())
        .with_timeout(config.analysis_timeout)
        .with_app_name("report-server");

    let catalog = db_pool
        .clone()
        .map(|pool| Arc::new(PostgresReportCatalog::new(pool)) as Arc<dyn BaseReportCatalog>);

    let deps = ServerDeps::new(
        Arc::new(OpenRouterAI::new(client)),
        Arc::new(DocumentParser::new()),
        AnalysisStore::new(),
        catalog,
        AnalysisSettings::from_config(&config),
    );

    // Build application
    let app = build_app(deps, db_pool, HttpSettings::from_config(&config));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
