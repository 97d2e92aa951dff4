//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod mailer;
pub mod mysql;

// Re-exports
pub use mailer::{LogMailer, SmtpMailer};
pub use mysql::{
    MySqlBorderouRepository, MySqlOfflinePaymentRepository, MySqlPostRepository,
    MySqlRefreshTokenRepository, MySqlSettingRepository, MySqlUserRepository,
};
