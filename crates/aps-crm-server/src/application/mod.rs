//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod auth_service;
mod cause_service;
mod f230_service;
mod iban_service;
mod kpi_service;
mod mail_service;
mod report_service;
mod setting_service;
mod sponsorship_service;
mod user_service;
mod volunteer_service;

#[cfg(test)]
pub mod test_support;

pub use auth_service::{AuthPolicy, AuthService, RegisterCommand, Session};
pub use cause_service::CauseService;
pub use f230_service::F230Service;
pub use iban_service::IbanService;
pub use kpi_service::KpiService;
pub use mail_service::{JobReport, MailService};
pub use report_service::{Dataset, ReportService};
pub use setting_service::SettingService;
pub use sponsorship_service::{D177Service, SponsorshipService};
pub use user_service::UserService;
pub use volunteer_service::VolunteerService;
