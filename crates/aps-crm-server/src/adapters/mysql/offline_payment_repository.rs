//! MySQL implementation of OfflinePaymentRepository

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::MySqlPool;

use aps_crm::{
    domain::parse_number, DomainError, OfflinePayment, OfflinePaymentRepository, OrderStatus,
};

use super::db_error;

pub struct MySqlOfflinePaymentRepository {
    pool: MySqlPool,
}

impl MySqlOfflinePaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// The amount is read as text so DECIMAL columns need no extra decoder
const ORDER_COLUMNS: &str = r#"
    SELECT o.id, o.user_id, o.cause_id, p.post_title AS cause_title, o.booking_date,
           o.order_status, CAST(o.donation_amount AS CHAR) AS donation_amount,
           o.payment_date, o.payment_info, o.booking_detail
    FROM wp_frmaster_order o
    LEFT JOIN wp_posts p ON p.ID = o.cause_id
"#;

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: u64,
    user_id: Option<u64>,
    cause_id: Option<u64>,
    cause_title: Option<String>,
    booking_date: Option<NaiveDateTime>,
    order_status: Option<String>,
    donation_amount: Option<String>,
    payment_date: Option<NaiveDateTime>,
    payment_info: Option<String>,
    booking_detail: Option<String>,
}

impl From<OrderRow> for OfflinePayment {
    fn from(row: OrderRow) -> Self {
        let payment_method = OfflinePayment::resolve_payment_method(
            row.payment_info.as_deref(),
            row.booking_detail.as_deref(),
        );
        Self {
            id: row.id,
            user_id: row.user_id,
            cause_id: row.cause_id,
            cause_title: row.cause_title,
            booking_date: row.booking_date,
            status: row
                .order_status
                .as_deref()
                .unwrap_or_default()
                .parse()
                .unwrap_or(OrderStatus::Pending),
            amount: row.donation_amount.as_deref().and_then(parse_number),
            payment_date: row.payment_date,
            payment_method,
        }
    }
}

#[async_trait]
impl OfflinePaymentRepository for MySqlOfflinePaymentRepository {
    async fn find_all(&self) -> Result<Vec<OfflinePayment>, DomainError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!("{} ORDER BY o.id DESC", ORDER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<OfflinePayment>, DomainError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!("{} WHERE o.id = ?", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn update_status(&self, id: u64, status: &OrderStatus) -> Result<bool, DomainError> {
        let result = sqlx::query("UPDATE wp_frmaster_order SET order_status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: u64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM wp_frmaster_order WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
