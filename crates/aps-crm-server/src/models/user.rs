//! Auth and user DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use aps_crm::{LoginPlatform, User};

use crate::application::Session;

/// Self-registration request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub gender: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    /// MOBILE or WEB (default)
    pub platform: Option<String>,
}

impl LoginRequest {
    pub fn platform(&self) -> LoginPlatform {
        match self.platform.as_deref().map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("mobile") => LoginPlatform::Mobile,
            _ => LoginPlatform::Web,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginUser {
    pub name: String,
    pub email: String,
}

/// Issued tokens; lifetimes in milliseconds
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: u64,
    pub user: LoginUser,
    pub refresh_token: String,
    pub refresh_expires_in: u64,
}

impl From<Session> for LoginResponse {
    fn from(session: Session) -> Self {
        Self {
            token: session.access_token,
            expires_in: session.expires_in,
            user: LoginUser {
                name: format!("{} {}", session.user.first_name, session.user.last_name)
                    .trim()
                    .to_string(),
                email: session.user.email,
            },
            refresh_token: session.refresh_token,
            refresh_expires_in: session.refresh_expires_in,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// New password for a reset link; sent as a form or as JSON
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetConfirmRequest {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpResetRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
}

/// Query of the reset page
#[derive(Debug, Deserialize)]
pub struct ResetPageQuery {
    pub token: Option<String>,
}

/// User profile, never carrying credentials
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub gender: Option<String>,
    /// ADMIN, VOLUNTEER or USER
    pub role: String,
    /// ACTIVE, PENDING or INACTIVE
    pub status: String,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            gender: user.gender,
            role: user.role.to_string(),
            status: user.status.to_string(),
            is_premium: user.is_premium,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, ACTIVE or INACTIVE; missing means PENDING
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePremiumRequest {
    pub premium: bool,
}
