//! MySQL implementation of PostRepository
//!
//! Reads `wp_posts`/`wp_postmeta` of the WordPress schema and the CRM's
//! `wp_posts_settings` flags.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use aps_crm::{
    domain::parse_number, DomainError, FlagsUpdate, NewPost, PostFlags, PostMeta, PostRecord,
    PostRepository, WpPost,
};

use super::db_error;

pub struct MySqlPostRepository {
    pool: MySqlPool,
}

impl MySqlPostRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

const POST_COLUMNS: &str = r#"
    SELECT p.ID AS id, p.post_type, p.post_status, p.post_title, p.post_excerpt,
           p.post_name, p.post_date, p.guid,
           s.is_downloaded, s.is_verified, s.is_corrupt, s.nr_borderou
    FROM wp_posts p
    LEFT JOIN wp_posts_settings s ON s.post_id = p.ID
"#;

#[derive(sqlx::FromRow)]
struct PostRow {
    id: u64,
    post_type: String,
    post_status: String,
    post_title: String,
    post_excerpt: String,
    post_name: String,
    post_date: NaiveDateTime,
    guid: String,
    is_downloaded: Option<bool>,
    is_verified: Option<bool>,
    is_corrupt: Option<bool>,
    nr_borderou: Option<i64>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            post: WpPost {
                id: row.id,
                post_type: row.post_type,
                status: row.post_status,
                title: row.post_title,
                excerpt: row.post_excerpt,
                name: row.post_name,
                date: row.post_date,
                guid: row.guid,
            },
            meta: PostMeta::new(),
            flags: PostFlags {
                downloaded: row.is_downloaded.unwrap_or(false),
                verified: row.is_verified.unwrap_or(false),
                corrupt: row.is_corrupt.unwrap_or(false),
                nr_borderou: row.nr_borderou,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct MetaRow {
    post_id: u64,
    meta_key: Option<String>,
    meta_value: Option<String>,
}

fn push_in<'args, T>(builder: &mut QueryBuilder<'args, MySql>, values: impl IntoIterator<Item = T>)
where
    T: 'args + Send + sqlx::Encode<'args, MySql> + sqlx::Type<MySql>,
{
    builder.push(" (");
    let mut separated = builder.separated(", ");
    for value in values {
        separated.push_bind(value);
    }
    separated.push_unseparated(")");
}

/// Render an amount without a trailing ".0" for whole numbers
fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

impl MySqlPostRepository {
    /// Attach meta rows to their posts, keeping post order
    fn merge_meta(mut records: Vec<PostRecord>, meta: Vec<MetaRow>) -> Vec<PostRecord> {
        let index: HashMap<u64, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.post.id, i))
            .collect();
        for row in meta {
            let (Some(key), Some(&i)) = (row.meta_key, index.get(&row.post_id)) else {
                continue;
            };
            records[i]
                .meta
                .insert(key, row.meta_value.unwrap_or_default());
        }
        records
    }
}

#[async_trait]
impl PostRepository for MySqlPostRepository {
    async fn find_by_type(
        &self,
        post_type: &str,
        statuses: &[&str],
    ) -> Result<Vec<PostRecord>, DomainError> {
        if statuses.is_empty() {
            return Ok(Vec::new());
        }
        let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();

        let mut posts = QueryBuilder::<MySql>::new(POST_COLUMNS);
        posts.push(" WHERE p.post_type = ");
        posts.push_bind(post_type.to_string());
        posts.push(" AND p.post_status IN");
        push_in(&mut posts, statuses.clone());
        posts.push(" ORDER BY p.ID");
        let rows = posts
            .build_query_as::<PostRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let mut meta = QueryBuilder::<MySql>::new(
            "SELECT m.post_id, m.meta_key, m.meta_value FROM wp_postmeta m \
             JOIN wp_posts p ON p.ID = m.post_id WHERE p.post_type = ",
        );
        meta.push_bind(post_type.to_string());
        meta.push(" AND p.post_status IN");
        push_in(&mut meta, statuses);
        meta.push(" ORDER BY m.meta_id");
        let meta_rows = meta
            .build_query_as::<MetaRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        let records = rows.into_iter().map(Into::into).collect();
        Ok(Self::merge_meta(records, meta_rows))
    }

    async fn find_by_id(
        &self,
        post_type: &str,
        id: u64,
    ) -> Result<Option<PostRecord>, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "{} WHERE p.ID = ? AND p.post_type = ?",
            POST_COLUMNS
        ))
        .bind(id)
        .bind(post_type)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let meta_rows = sqlx::query_as::<_, MetaRow>(
            "SELECT post_id, meta_key, meta_value FROM wp_postmeta WHERE post_id = ? ORDER BY meta_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(Self::merge_meta(vec![row.into()], meta_rows).pop())
    }

    async fn attached_files(&self, ids: &[u64]) -> Result<HashMap<u64, String>, DomainError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut query = QueryBuilder::<MySql>::new(
            "SELECT post_id, meta_key, meta_value FROM wp_postmeta \
             WHERE meta_key = '_wp_attached_file' AND post_id IN",
        );
        push_in(&mut query, ids.to_vec());
        let rows = query
            .build_query_as::<MetaRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| row.meta_value.map(|file| (row.post_id, file)))
            .collect())
    }

    async fn create(&self, post: &NewPost) -> Result<u64, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let result = sqlx::query(
            r#"
            INSERT INTO wp_posts (
                post_author, post_date, post_date_gmt, post_content, post_title, post_excerpt,
                post_status, comment_status, ping_status, post_name, post_type, to_ping, pinged,
                post_modified, post_modified_gmt, post_content_filtered, guid
            )
            VALUES (0, ?, ?, '', ?, '', ?, 'closed', 'closed', '', ?, '', '', ?, ?, '', '')
            "#,
        )
        .bind(post.date)
        .bind(post.date)
        .bind(&post.title)
        .bind(&post.status)
        .bind(&post.post_type)
        .bind(post.date)
        .bind(post.date)
        .execute(&mut *tx)
        .await
        .map_err(db_error)?;
        let post_id = result.last_insert_id();

        for (key, value) in &post.meta {
            sqlx::query("INSERT INTO wp_postmeta (post_id, meta_key, meta_value) VALUES (?, ?, ?)")
                .bind(post_id)
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(post_id)
    }

    async fn upsert_meta(&self, post_id: u64, key: &str, value: &str) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let existing: Option<u64> = sqlx::query_scalar(
            "SELECT meta_id FROM wp_postmeta WHERE post_id = ? AND meta_key = ? LIMIT 1 FOR UPDATE",
        )
        .bind(post_id)
        .bind(key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        match existing {
            Some(meta_id) => {
                sqlx::query("UPDATE wp_postmeta SET meta_value = ? WHERE meta_id = ?")
                    .bind(value)
                    .bind(meta_id)
                    .execute(&mut *tx)
                    .await
            }
            None => {
                sqlx::query(
                    "INSERT INTO wp_postmeta (post_id, meta_key, meta_value) VALUES (?, ?, ?)",
                )
                .bind(post_id)
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await
            }
        }
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        Ok(())
    }

    async fn adjust_meta_amount(
        &self,
        post_id: u64,
        key: &str,
        delta: f64,
    ) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let current: Option<(u64, Option<String>)> = sqlx::query_as(
            "SELECT meta_id, meta_value FROM wp_postmeta WHERE post_id = ? AND meta_key = ? LIMIT 1 FOR UPDATE",
        )
        .bind(post_id)
        .bind(key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        let Some((meta_id, raw)) = current else {
            return Ok(false);
        };
        let old = raw.as_deref().and_then(parse_number).unwrap_or(0.0);
        let new = (old + delta).max(0.0);

        sqlx::query("UPDATE wp_postmeta SET meta_value = ? WHERE meta_id = ?")
            .bind(format_amount(new))
            .bind(meta_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        tracing::debug!("Meta {} of post {}: {} -> {}", key, post_id, old, new);
        Ok(true)
    }

    async fn update_flags(&self, post_id: u64, update: &FlagsUpdate) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO wp_posts_settings (post_id, is_downloaded, is_verified, is_corrupt, updated_at)
            VALUES (?, IFNULL(?, FALSE), IFNULL(?, FALSE), IFNULL(?, FALSE), NOW())
            ON DUPLICATE KEY UPDATE
                is_downloaded = COALESCE(?, is_downloaded),
                is_verified = COALESCE(?, is_verified),
                is_corrupt = COALESCE(?, is_corrupt),
                updated_at = NOW()
            "#,
        )
        .bind(post_id)
        .bind(update.downloaded)
        .bind(update.verified)
        .bind(update.corrupt)
        .bind(update.downloaded)
        .bind(update.verified)
        .bind(update.corrupt)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn delete(&self, post_type: &str, id: u64) -> Result<bool, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let exists: Option<u64> =
            sqlx::query_scalar("SELECT ID FROM wp_posts WHERE ID = ? AND post_type = ? FOR UPDATE")
                .bind(id)
                .bind(post_type)
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error)?;
        if exists.is_none() {
            return Ok(false);
        }

        for statement in [
            "DELETE FROM wp_postmeta WHERE post_id = ?",
            "DELETE FROM wp_posts_settings WHERE post_id = ?",
            "DELETE FROM wp_posts WHERE ID = ?",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
        }

        tx.commit().await.map_err(db_error)?;
        Ok(true)
    }

    async fn count_site_users(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM wp_users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(count.max(0) as u64)
    }
}
