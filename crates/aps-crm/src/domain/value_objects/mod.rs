//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod order_status;
mod page;
mod setting_type;
mod user_role;

pub use order_status::*;
pub use page::*;
pub use setting_type::*;
pub use user_role::*;
