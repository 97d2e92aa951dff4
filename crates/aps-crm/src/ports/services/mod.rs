//! Service Ports
//!
//! Abstract interfaces for external services.

mod mailer;

pub use mailer::*;
