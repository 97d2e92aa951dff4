//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - User, RefreshToken: CRM accounts and sessions
//! - WpPost/PostRecord: WordPress posts with meta and CRM flags
//! - Volunteer, Cause, OfflinePayment, Sponsorship, D177, Form230, IbanBeneficiary:
//!   datasets read from WordPress
//! - Setting, Borderou: CRM-owned configuration and documents
//! - Kpi: dashboard figures

mod borderou;
mod cause;
mod form230;
mod iban;
mod kpi;
pub mod post;
mod refresh_token;
mod setting;
mod sponsorship;
mod user;
mod volunteer;

pub use borderou::*;
pub use cause::*;
pub use form230::*;
pub use iban::*;
pub use kpi::*;
pub use post::{
    parse_number, post_types, FlagsUpdate, NewPost, PostFlags, PostMeta, PostRecord, SiteLinks,
    WpPost,
};
pub use refresh_token::*;
pub use setting::*;
pub use sponsorship::*;
pub use user::*;
pub use volunteer::*;
