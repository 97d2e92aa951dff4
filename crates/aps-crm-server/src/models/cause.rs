//! Cause and offline payment DTOs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aps_crm::{Cause, OfflinePayment};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CauseResponse {
    pub id: u64,
    pub date: NaiveDateTime,
    pub title: String,
    /// Plain-text excerpt
    pub excerpt: String,
    pub goal: Option<f64>,
    pub donors: Option<i64>,
    pub donated: Option<f64>,
    pub guid: String,
}

impl From<Cause> for CauseResponse {
    fn from(c: Cause) -> Self {
        Self {
            id: c.id,
            date: c.date,
            title: c.title,
            excerpt: c.excerpt,
            goal: c.goal,
            donors: c.donors,
            donated: c.donated,
            guid: c.guid,
        }
    }
}

/// Manual correction of the donated amount
#[derive(Debug, Deserialize, ToSchema)]
pub struct AmountRequest {
    /// Positive amount
    pub value: Option<f64>,
    /// "+" adds, "-" subtracts
    pub operation: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfflinePaymentResponse {
    pub id: u64,
    pub user_id: Option<u64>,
    pub cause_id: Option<u64>,
    pub cause_title: Option<String>,
    pub booking_date: Option<NaiveDateTime>,
    /// Romanian label
    pub status: String,
    /// Stored status code (pending, approved, online-paid, ...)
    pub status_code: String,
    pub amount: Option<f64>,
    pub payment_date: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
}

impl From<OfflinePayment> for OfflinePaymentResponse {
    fn from(o: OfflinePayment) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            cause_id: o.cause_id,
            cause_title: o.cause_title,
            booking_date: o.booking_date,
            status: o.status.label(),
            status_code: o.status.to_string(),
            amount: o.amount,
            payment_date: o.payment_date,
            payment_method: o.payment_method,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentStatusRequest {
    /// pending, approved or rejected
    pub status: Option<String>,
}
