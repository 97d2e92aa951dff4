//! APS CRM HTTP Models
//!
//! Request and response DTOs. Every JSON body is camelCase.
//!
//! - page: listing query and page envelope
//! - user: auth requests, sessions and profiles
//! - volunteer, cause, forms, iban: dataset rows and commands
//! - setting, kpi, mail: back-office configuration, dashboard and email

mod cause;
mod forms;
mod iban;
mod kpi;
mod mail;
mod page;
mod setting;
mod user;
mod volunteer;

pub use cause::*;
pub use forms::*;
pub use iban::*;
pub use kpi::*;
pub use mail::*;
pub use page::*;
pub use setting::*;
pub use user::*;
pub use volunteer::*;
