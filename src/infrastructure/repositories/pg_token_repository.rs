use super::token_repository::TokenRepository;
use crate::domain::auth::TokenSet;
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// The gateway serves one portal, so the table only ever holds this row
const TOKEN_ROW_ID: i16 = 1;

pub struct PgTokenRepository {
    pool: Arc<DbPool>,
}

impl PgTokenRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn load(&self) -> AppResult<Option<TokenSet>> {
        let pool = self.pool.as_ref();
        let row = sqlx::query_as::<_, (String, String, i64, DateTime<Utc>)>(
            r#"
            SELECT access_token, refresh_token, expires_in, updated_at
            FROM oauth_tokens
            WHERE id = $1
            "#,
        )
        .bind(TOKEN_ROW_ID)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(
            |(access_token, refresh_token, expires_in, updated_at)| TokenSet {
                access_token,
                refresh_token,
                expires_in,
                updated_at,
            },
        ))
    }

    async fn save(&self, tokens: &TokenSet) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query(
            r#"
            INSERT INTO oauth_tokens (id, access_token, refresh_token, expires_in, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_in = EXCLUDED.expires_in,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(TOKEN_ROW_ID)
        .bind(&tokens.access_token)
        .bind(&tokens.refresh_token)
        .bind(tokens.expires_in)
        .bind(tokens.updated_at)
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let pool = self.pool.as_ref();
        sqlx::query("DELETE FROM oauth_tokens WHERE id = $1")
            .bind(TOKEN_ROW_ID)
            .execute(pool)
            .await?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }
}
