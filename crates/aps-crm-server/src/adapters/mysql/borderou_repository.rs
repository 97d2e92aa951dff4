//! MySQL implementation of BorderouRepository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

use aps_crm::ports::BorderouRenderer;
use aps_crm::{Borderou, BorderouRepository, DomainError};

use super::db_error;

pub struct MySqlBorderouRepository {
    pool: MySqlPool,
}

impl MySqlBorderouRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BorderouRepository for MySqlBorderouRepository {
    async fn create(
        &self,
        date: NaiveDate,
        post_ids: &[u64],
        render: BorderouRenderer<'_>,
    ) -> Result<Borderou, DomainError> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        // The auto-increment id is the Borderou number
        let result = sqlx::query("INSERT INTO borderouri (borderou_date, value) VALUES (?, '')")
            .bind(date)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        let id = result.last_insert_id() as i64;

        for post_id in post_ids {
            sqlx::query(
                r#"
                INSERT INTO wp_posts_settings (post_id, is_downloaded, is_verified, is_corrupt, nr_borderou, updated_at)
                VALUES (?, FALSE, FALSE, FALSE, ?, NOW())
                ON DUPLICATE KEY UPDATE nr_borderou = VALUES(nr_borderou), updated_at = NOW()
                "#,
            )
            .bind(post_id)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;
        }

        let xml = render(id);
        sqlx::query("UPDATE borderouri SET value = ? WHERE id = ?")
            .bind(&xml)
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        tracing::info!("Stored Borderou {} with {} forms", id, post_ids.len());

        Ok(Borderou { id, date, xml })
    }
}
