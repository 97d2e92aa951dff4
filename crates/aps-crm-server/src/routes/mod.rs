//! APS CRM API Routes
//!
//! - /api/v1/auth - registration, login, refresh tokens, password reset
//! - /api/v1/users - accounts (status, premium and delete are admin only)
//! - /api/v1/volunteers - volunteer applications
//! - /api/v1/cause, /api/v1/offline-payments - donation campaigns and offline orders
//! - /api/v1/sponsorizare, /api/v1/formulare/d177 - company sponsorships
//! - /api/v1/f230 - tax redirection forms and Borderou 230
//! - /api/v1/iban - beneficiaries
//! - /api/v1/settings - CRM configuration
//! - /api/v1/kpi - dashboard figures
//! - /api/v1/reports - CSV exports
//! - /api/v1/mail - manual sends and mail jobs

pub mod auth;
pub mod causes;
pub mod d177;
pub mod f230;
pub mod iban;
pub mod kpi;
pub mod mail;
pub mod reports;
pub mod settings;
pub mod sponsorship;
pub mod swagger;
pub mod users;
pub mod volunteers;
