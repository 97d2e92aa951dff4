//! User Repository Port
//!
//! Abstract interface for CRM account persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Page, PageRequest, User, UserRole};

/// Sort keys accepted by user listings, mapped to entity fields
pub const USER_SORT_KEYS: &[(&str, &str)] = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("email", "email"),
    ("gender", "gender"),
    ("role", "user_role"),
    ("createdAt", "created_at"),
    ("status", "user_status"),
    ("isPremium", "is_premium"),
];

/// Repository interface for User entities
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;

    /// Find a user by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find the user holding a password-reset token (by its SHA-256)
    async fn find_by_reset_token_hash(&self, token_hash: &str) -> Result<Option<User>, DomainError>;

    /// All users, newest first
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;

    /// Paged search over name, email, status and role.
    /// An empty `roles` slice means any role.
    async fn search(
        &self,
        q: Option<&str>,
        roles: &[UserRole],
        page: &PageRequest,
    ) -> Result<Page<User>, DomainError>;

    /// Insert a new user; a taken email is a Conflict
    async fn insert(&self, user: &User) -> Result<User, DomainError>;

    /// Overwrite an existing user by ID
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user by ID
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;

    /// Number of CRM accounts
    async fn count(&self) -> Result<u64, DomainError>;
}
