//! MySQL Repository Implementations

mod borderou_repository;
mod offline_payment_repository;
mod post_repository;
mod refresh_token_repository;
mod setting_repository;
mod user_repository;

pub use borderou_repository::MySqlBorderouRepository;
pub use offline_payment_repository::MySqlOfflinePaymentRepository;
pub use post_repository::MySqlPostRepository;
pub use refresh_token_repository::MySqlRefreshTokenRepository;
pub use setting_repository::MySqlSettingRepository;
pub use user_repository::MySqlUserRepository;

use aps_crm::DomainError;

/// Map a driver error; duplicate keys become conflicts
pub(crate) fn db_error(err: sqlx::Error) -> DomainError {
    match err.as_database_error() {
        Some(db) if db.is_unique_violation() => DomainError::Conflict(db.message().to_string()),
        _ => DomainError::Repository(err.to_string()),
    }
}
