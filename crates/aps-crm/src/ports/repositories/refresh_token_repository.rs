//! Refresh Token Repository Port

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, RefreshToken};

/// Repository interface for refresh tokens
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync {
    /// Insert a token, returning it with its assigned ID
    async fn create(&self, token: &RefreshToken) -> Result<RefreshToken, DomainError>;

    /// Find a token by the SHA-256 of its value
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<RefreshToken>, DomainError>;

    /// Mark a live token revoked, recording the hash of its successor.
    /// False when the token was already revoked.
    async fn revoke(&self, id: i64, replaced_by: Option<&str>) -> Result<bool, DomainError>;

    /// Delete every token of a user
    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, DomainError>;
}
