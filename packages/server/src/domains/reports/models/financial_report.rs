use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FinancialReport {
    pub id: Uuid,
    pub company_id: Uuid,
    pub report_type: String,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<i32>,
    pub filing_date: Option<NaiveDate>,
    pub document_name: Option<String>,
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct CreateFinancialReport {
    pub company_id: Uuid,
    pub report_type: String,
    pub fiscal_year: i32,
    pub fiscal_quarter: Option<i32>,
    pub filing_date: Option<NaiveDate>,
    pub document_name: Option<String>,
}

impl FinancialReport {
    pub async fn create(input: CreateFinancialReport, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO financial_reports (
                company_id, report_type, fiscal_year, fiscal_quarter,
                filing_date, document_name, processed
            )
            VALUES ($1, $2, $3, $4, $5, $6, false)
            RETURNING *
            "#,
        )
        .bind(input.company_id)
        .bind(input.report_type)
        .bind(input.fiscal_year)
        .bind(input.fiscal_quarter)
        .bind(input.filing_date)
        .bind(input.document_name)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_company(company_id: Uuid, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            r#"
            SELECT * FROM financial_reports
            WHERE company_id = $1
            ORDER BY fiscal_year DESC, fiscal_quarter DESC NULLS LAST
            "#,
        )
        .bind(company_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_processed(id: Uuid, processed: bool, conn: &mut PgConnection) -> Result<()> {
        sqlx::query("UPDATE financial_reports SET processed = $2 WHERE id = $1")
            .bind(id)
            .bind(processed)
            .execute(conn)
            .await?;
        Ok(())
    }
}
