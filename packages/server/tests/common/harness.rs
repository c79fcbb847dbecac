//! Test harnesses.
//!
//! `TestApp` drives the full router in-process against mocked dependencies.
//! `CatalogHarness` gives the catalog tests a real Postgres, started once in a
//! shared container and migrated on first use.

#![allow(dead_code)]

use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use report_core::kernel::test_dependencies::RecordedAnalysis;
use report_core::kernel::TestDependencies;
use report_core::server::{build_app, HttpSettings};
use serde_json::Value;
use sqlx::PgPool;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// HTTP harness
// =============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

pub struct TestApp {
    router: Router,
    /// Same mocks and store the router was built with
    pub deps: TestDependencies,
}

impl TestApp {
    pub fn new(deps: TestDependencies) -> Self {
        Self::with_http(deps, HttpSettings::default())
    }

    pub fn with_http(deps: TestDependencies, http: HttpSettings) -> Self {
        init_tracing();
        let router = build_app(deps.clone().into_server_deps(), None, http);
        Self { router, deps }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    pub async fn upload(&self, form: MultipartForm) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri("/api/reports/upload")
            .header(CONTENT_TYPE, form.content_type())
            .body(Body::from(form.encode()))
            .unwrap();
        self.send(request).await
    }

    /// Upload `text` as a plain-text report of the given company type.
    pub async fn upload_text(&self, text: &str, company_type: Option<&str>) -> TestResponse {
        let mut form = MultipartForm::new().file("report.txt", "text/plain", text.as_bytes());
        if let Some(company_type) = company_type {
            form = form.text("companyType", company_type);
        }
        self.upload(form).await
    }

    /// Poll the single-record route until the analysis leaves processing.
    pub async fn wait_for_terminal(&self, id: &str) -> Value {
        for _ in 0..300 {
            let response = self.get(&format!("/api/analyses/{}", id)).await;
            assert_eq!(response.status, StatusCode::OK);
            if response.body["processing"] == Value::Bool(false) {
                return response.body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("analysis {id} never reached a terminal state");
    }

    /// Wait until the mock catalog has received `count` writes.
    pub async fn wait_for_catalog_writes(&self, count: usize) -> Vec<RecordedAnalysis> {
        let catalog = self
            .deps
            .catalog
            .as_ref()
            .expect("app was built without a mock catalog");
        for _ in 0..300 {
            let recorded = catalog.recorded();
            if recorded.len() >= count {
                return recorded;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("catalog never received {count} writes");
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse { status, body }
    }
}

const BOUNDARY: &str = "report-test-boundary-7d1f";

enum Part {
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
    Text {
        name: String,
        value: String,
    },
}

/// Minimal multipart/form-data body builder.
#[derive(Default)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.parts.push(Part::File {
            name: "file".to_string(),
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes: bytes.to_vec(),
        });
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.parts.push(Part::Text {
            name: name.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", BOUNDARY)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut body = Vec::new();
        for part in &self.parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::File {
                    name,
                    file_name,
                    content_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                            name, file_name, content_type
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                Part::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }
}

// =============================================================================
// Postgres harness
// =============================================================================

/// Shared container that persists across all catalog tests.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        // Run migrations once on the shared database
        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Fresh pool onto the shared, migrated database.
///
/// Tests share one database, so each should use its own ticker symbols.
pub struct CatalogHarness {
    pub db_pool: PgPool,
}

impl AsyncTestContext for CatalogHarness {
    async fn setup() -> Self {
        let infra = SharedTestInfra::get().await;
        let db_pool = PgPool::connect(&infra.db_url)
            .await
            .expect("Failed to connect to test database");
        Self { db_pool }
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}
