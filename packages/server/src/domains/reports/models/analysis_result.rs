use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

/// Persisted analysis of one financial report.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalysisResultRecord {
    pub id: Uuid,
    pub report_id: Uuid,
    /// Company type the analysis prompt was selected for
    pub analysis_type: String,
    pub analysis_content: Json<Value>,
    pub key_insights: Option<Json<Value>>,
    pub risk_factors: Option<Json<Value>>,
    pub model_impact: Option<Json<Value>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateAnalysisResult {
    pub report_id: Uuid,
    pub analysis_type: String,
    pub analysis_content: Value,
    pub key_insights: Option<Value>,
    pub risk_factors: Option<Value>,
    pub model_impact: Option<Value>,
}

impl AnalysisResultRecord {
    pub async fn create(input: CreateAnalysisResult, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO analysis_results (
                report_id, analysis_type, analysis_content,
                key_insights, risk_factors, model_impact
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(input.report_id)
        .bind(input.analysis_type)
        .bind(Json(input.analysis_content))
        .bind(input.key_insights.map(Json))
        .bind(input.risk_factors.map(Json))
        .bind(input.model_impact.map(Json))
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_latest_for_report(report_id: Uuid, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM analysis_results
            WHERE report_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(report_id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
