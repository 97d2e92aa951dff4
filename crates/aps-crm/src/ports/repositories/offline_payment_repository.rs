//! Offline Payment Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, OfflinePayment, OrderStatus};

/// Repository interface for donation orders
#[async_trait]
pub trait OfflinePaymentRepository: Send + Sync {
    /// All orders with their cause title
    async fn find_all(&self) -> Result<Vec<OfflinePayment>, DomainError>;

    async fn find_by_id(&self, id: u64) -> Result<Option<OfflinePayment>, DomainError>;

    async fn update_status(&self, id: u64, status: &OrderStatus) -> Result<bool, DomainError>;

    async fn delete(&self, id: u64) -> Result<bool, DomainError>;
}
