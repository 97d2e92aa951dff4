//! Cause - fundraising campaign and its donation orders

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::post::PostRecord;
use crate::domain::services::listing::{Listable, SortKey};
use crate::domain::value_objects::OrderStatus;

/// Meta key holding the donated total of a cause
pub const DONATED_AMOUNT_KEY: &str = "frmaster-donated-amount";

/// Fundraising campaign (`cause` post)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cause {
    pub id: u64,
    pub date: NaiveDateTime,
    pub status: String,
    pub title: String,
    pub excerpt: String,
    pub goal: Option<f64>,
    pub donors: Option<i64>,
    pub donated: Option<f64>,
    pub guid: String,
}

impl Cause {
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            id: record.post.id,
            date: record.post.date,
            status: record.post.status.clone(),
            title: record.post.title.clone(),
            excerpt: record.post.excerpt.clone(),
            goal: record.meta_number("frmaster-funding-goal"),
            donors: record
                .meta_number("frmaster-donor-amount")
                .map(|n| n as i64),
            donated: record.meta_number(DONATED_AMOUNT_KEY),
            guid: record.post.guid.clone(),
        }
    }
}

impl Listable for Cause {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        vec![self.title.clone(), self.excerpt.clone()]
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "date" => SortKey::Date(Some(self.date)),
            "title" => SortKey::text(&self.title),
            "goal" => SortKey::Number(self.goal),
            "donors" => SortKey::Number(self.donors.map(|d| d as f64)),
            "donated" => SortKey::Number(self.donated),
            _ => return None,
        })
    }
}

/// Direction of a manual amount correction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountOperation {
    Add,
    Subtract,
}

impl AmountOperation {
    /// "+" adds, anything else subtracts
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.trim() == "+" {
            AmountOperation::Add
        } else {
            AmountOperation::Subtract
        }
    }

    pub fn signed(&self, value: f64) -> f64 {
        match self {
            AmountOperation::Add => value,
            AmountOperation::Subtract => -value,
        }
    }
}

/// Donation order (`wp_frmaster_order` row)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfflinePayment {
    pub id: u64,
    pub user_id: Option<u64>,
    pub cause_id: Option<u64>,
    pub cause_title: Option<String>,
    pub booking_date: Option<NaiveDateTime>,
    pub status: OrderStatus,
    pub amount: Option<f64>,
    pub payment_date: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
}

impl OfflinePayment {
    /// Payment method from the JSON `payment_info`, else from the
    /// serialized `booking_detail` donation method
    pub fn resolve_payment_method(
        payment_info: Option<&str>,
        booking_detail: Option<&str>,
    ) -> Option<String> {
        let from_info = payment_info
            .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
            .and_then(|json| {
                json.get("payment_method")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.trim().is_empty());
        if from_info.is_some() {
            return from_info;
        }

        let detail = booking_detail?;
        if detail.contains("\"donation-method\":\"online\"") {
            Some("online".to_string())
        } else if detail.contains("\"donation-method\":\"offline\"") {
            Some("offline".to_string())
        } else {
            None
        }
    }
}

impl Listable for OfflinePayment {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [
            self.cause_title.clone(),
            Some(self.status.to_string()),
            Some(self.status.label()),
            self.payment_method.clone(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "bookingDate" => SortKey::Date(self.booking_date),
            "causeTitle" => SortKey::opt_text(self.cause_title.as_deref()),
            "status" => SortKey::text(&self.status.to_string()),
            "amount" => SortKey::Number(self.amount),
            "paymentDate" => SortKey::Date(self.payment_date),
            "paymentMethod" => SortKey::opt_text(self.payment_method.as_deref()),
            _ => return None,
        })
    }
}

/// An all-digit query also matches the cause id of an order
pub fn order_matches_cause(order: &OfflinePayment, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty()
        && needle.chars().all(|c| c.is_ascii_digit())
        && order.cause_id.map(|id| id.to_string()).as_deref() == Some(needle)
}
