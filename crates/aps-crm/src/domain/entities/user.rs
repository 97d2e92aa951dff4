//! User - CRM account
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::{UserRole, UserStatus};

/// CRM account with password-reset and OTP state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub gender: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_premium: bool,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    pub reset_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub otp_attempts: i32,
    pub otp_locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new pending account with generated ID and timestamps
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        gender: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            email,
            password_hash,
            gender,
            role: UserRole::User,
            status: UserStatus::Pending,
            is_premium: false,
            reset_token_hash: None,
            reset_token_expires_at: None,
            otp_hash: None,
            otp_expires_at: None,
            otp_attempts: 0,
            otp_locked_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_otp_locked(&self, now: DateTime<Utc>) -> bool {
        self.otp_locked_until.is_some_and(|until| until > now)
    }

    pub fn clear_otp(&mut self) {
        self.otp_hash = None;
        self.otp_expires_at = None;
        self.otp_attempts = 0;
        self.otp_locked_until = None;
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_token_hash = None;
        self.reset_token_expires_at = None;
    }

    /// Case-insensitive match against name, email, status and role
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [
            self.first_name.as_str(),
            self.last_name.as_str(),
            self.email.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
            || self.status.to_string().to_lowercase().contains(&needle)
            || self.role.to_string().to_lowercase().contains(&needle)
    }
}
