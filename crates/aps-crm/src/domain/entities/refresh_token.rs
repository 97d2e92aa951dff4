//! RefreshToken - Opaque long-lived session token

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored refresh token. Only the SHA-256 of the token is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshToken {
    pub id: i64,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub replaced_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RefreshToken {
    /// Create an unsaved token; the id is assigned by the store
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            user_id,
            token_hash,
            expires_at,
            revoked: false,
            replaced_by: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.revoked && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_usable_until_expiry_or_revocation() {
        let now = Utc::now();
        let mut token = RefreshToken::new(Uuid::new_v4(), "h".into(), now + Duration::days(1));
        assert!(token.is_usable(now));
        assert!(!token.is_usable(now + Duration::days(2)));
        token.revoked = true;
        assert!(!token.is_usable(now));
    }
}
