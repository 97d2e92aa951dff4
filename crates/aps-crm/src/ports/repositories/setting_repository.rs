//! Setting Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Setting};

/// Repository interface for CRM settings
#[async_trait]
pub trait SettingRepository: Send + Sync {
    /// All settings ordered by name
    async fn find_all(&self) -> Result<Vec<Setting>, DomainError>;

    /// Settings with the given names, ordered by name
    async fn find_by_names(&self, names: &[&str]) -> Result<Vec<Setting>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Setting>, DomainError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Setting>, DomainError>;

    /// Save a setting (insert when `id` is 0, update otherwise)
    async fn save(&self, setting: &Setting) -> Result<Setting, DomainError>;
}
