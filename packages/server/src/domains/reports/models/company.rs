use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub id: Uuid,
    pub symbol: String,
    pub name: String,
    pub company_type: String,
    pub sector: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Company {
    pub async fn find_by_symbol(symbol: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies WHERE symbol = $1")
            .bind(symbol)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert the company, or return the existing row for `symbol` unchanged.
    pub async fn find_or_create(
        symbol: &str,
        name: &str,
        company_type: &str,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO companies (symbol, name, company_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (symbol) DO UPDATE SET symbol = companies.symbol
            RETURNING *
            "#,
        )
        .bind(symbol)
        .bind(name)
        .bind(company_type)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM companies ORDER BY name ASC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }
}
