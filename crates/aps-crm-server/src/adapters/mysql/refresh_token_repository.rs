//! MySQL implementation of RefreshTokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;
use uuid::{fmt::Hyphenated, Uuid};

use aps_crm::{DomainError, RefreshToken, RefreshTokenRepository};

use super::db_error;

pub struct MySqlRefreshTokenRepository {
    pool: MySqlPool,
}

impl MySqlRefreshTokenRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    id: i64,
    user_id: Hyphenated,
    token_hash: String,
    expires_at: DateTime<Utc>,
    revoked: bool,
    replaced_by: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RefreshTokenRow> for RefreshToken {
    fn from(row: RefreshTokenRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id.into_uuid(),
            token_hash: row.token_hash,
            expires_at: row.expires_at,
            revoked: row.revoked,
            replaced_by: row.replaced_by,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl RefreshTokenRepository for MySqlRefreshTokenRepository {
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at, revoked, replaced_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(token.user_id.hyphenated())
        .bind(&token.token_hash)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(&token.replaced_by)
        .bind(token.created_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(RefreshToken {
            id: result.last_insert_id() as i64,
            ..token.clone()
        })
    }

    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            "SELECT * FROM refresh_tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn revoke(&self, id: i64, replaced_by: Option<&str>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked = TRUE, replaced_by = ? \
             WHERE id = ? AND revoked = FALSE",
        )
        .bind(replaced_by)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(user_id.hyphenated())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
