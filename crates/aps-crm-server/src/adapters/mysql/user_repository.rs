//! MySQL implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySql, MySqlPool, QueryBuilder};
use uuid::{fmt::Hyphenated, Uuid};

use aps_crm::ports::USER_SORT_KEYS;
use aps_crm::{
    Direction, DomainError, Page, PageRequest, User, UserRepository, UserRole, UserStatus,
};

use super::db_error;

/// MySQL implementation of UserRepository
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct UserRow {
    id: Hyphenated,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    gender: Option<String>,
    user_role: String,
    user_status: String,
    is_premium: bool,
    reset_token_hash: Option<String>,
    reset_token_expires_at: Option<DateTime<Utc>>,
    otp_hash: Option<String>,
    otp_expires_at: Option<DateTime<Utc>>,
    otp_attempts: i32,
    otp_locked_until: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id.into_uuid(),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            gender: row.gender,
            role: row.user_role.parse().unwrap_or(UserRole::User),
            status: row.user_status.parse().unwrap_or(UserStatus::Pending),
            is_premium: row.is_premium,
            reset_token_hash: row.reset_token_hash,
            reset_token_expires_at: row.reset_token_expires_at,
            otp_hash: row.otp_hash,
            otp_expires_at: row.otp_expires_at,
            otp_attempts: row.otp_attempts,
            otp_locked_until: row.otp_locked_until,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Append the search and role filters shared by the page and count queries
fn push_filters(builder: &mut QueryBuilder<'_, MySql>, q: Option<&str>, roles: &[UserRole]) {
    builder.push(" WHERE 1 = 1");
    if let Some(q) = q.map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{}%", q.to_lowercase());
        builder.push(" AND (");
        let mut clauses = builder.separated(" OR ");
        for column in [
            "first_name",
            "last_name",
            "email",
            "user_status",
            "user_role",
        ] {
            clauses.push(format!("LOWER({}) LIKE ", column));
            clauses.push_bind_unseparated(pattern.clone());
        }
        builder.push(")");
    }
    if !roles.is_empty() {
        builder.push(" AND user_role IN (");
        let mut values = builder.separated(", ");
        for role in roles {
            values.push_bind(role.to_string());
        }
        builder.push(")");
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(id.hyphenated())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE LOWER(email) = ?")
            .bind(email.trim().to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE reset_token_hash = ?")
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, UserRow>("SELECT * FROM users ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn search(
        &self,
        q: Option<&str>,
        roles: &[UserRole],
        page: &PageRequest,
    ) -> Result<Page<User>, DomainError> {
        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM users");
        push_filters(&mut count, q, roles);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        let mut select = QueryBuilder::<MySql>::new("SELECT * FROM users");
        push_filters(&mut select, q, roles);

        // Column names come from the whitelist only
        let orders = page.remap_sort(USER_SORT_KEYS);
        if orders.is_empty() {
            select.push(" ORDER BY created_at DESC");
        } else {
            let clauses: Vec<String> = orders
                .iter()
                .map(|o| {
                    let dir = match o.direction {
                        Direction::Asc => "ASC",
                        Direction::Desc => "DESC",
                    };
                    format!("{} {}", o.property, dir)
                })
                .collect();
            select.push(" ORDER BY ");
            select.push(clauses.join(", "));
        }
        select.push(" LIMIT ");
        select.push_bind(page.size as i64);
        select.push(" OFFSET ");
        select.push_bind(page.offset() as i64);

        let rows = select
            .build_query_as::<UserRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            total.max(0) as u64,
            page,
        ))
    }

    async fn insert(&self, user: &User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, first_name, last_name, email, password_hash, gender, user_role,
                user_status, is_premium, reset_token_hash, reset_token_expires_at,
                otp_hash, otp_expires_at, otp_attempts, otp_locked_until, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.hyphenated())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.gender)
        .bind(user.role.to_string())
        .bind(user.status.to_string())
        .bind(user.is_premium)
        .bind(&user.reset_token_hash)
        .bind(user.reset_token_expires_at)
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(user.otp_attempts)
        .bind(user.otp_locked_until)
        .bind(user.created_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user.id))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            UPDATE users SET
                first_name = ?,
                last_name = ?,
                email = ?,
                password_hash = ?,
                gender = ?,
                user_role = ?,
                user_status = ?,
                is_premium = ?,
                reset_token_hash = ?,
                reset_token_expires_at = ?,
                otp_hash = ?,
                otp_expires_at = ?,
                otp_attempts = ?,
                otp_locked_until = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.gender)
        .bind(user.role.to_string())
        .bind(user.status.to_string())
        .bind(user.is_premium)
        .bind(&user.reset_token_hash)
        .bind(user.reset_token_expires_at)
        .bind(&user.otp_hash)
        .bind(user.otp_expires_at)
        .bind(user.otp_attempts)
        .bind(user.otp_locked_until)
        .bind(Utc::now())
        .bind(user.id.hyphenated())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        self.find_by_id(user.id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user.id))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = ?")
            .bind(id.hyphenated())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.hyphenated())
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count.max(0) as u64)
    }
}
