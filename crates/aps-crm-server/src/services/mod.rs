//! Server Services
//!
//! Infrastructure-facing helpers used by the application layer:
//! - html: `cid:` discovery and HTML-to-text
//! - templates: email and page templates
//! - mail_composer: message assembly on top of the Mailer port
//! - csv_export: report bodies
//! - scheduler: background mail jobs

pub mod csv_export;
pub mod html;
pub mod mail_composer;
pub mod scheduler;
pub mod templates;

pub use mail_composer::{missing_images, MailComposer};
pub use scheduler::maybe_start_scheduler;
pub use templates::Templates;
