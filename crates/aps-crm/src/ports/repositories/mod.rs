//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod borderou_repository;
mod offline_payment_repository;
mod post_repository;
mod refresh_token_repository;
mod setting_repository;
mod user_repository;

pub use borderou_repository::*;
pub use offline_payment_repository::*;
pub use post_repository::*;
pub use refresh_token_repository::*;
pub use setting_repository::*;
pub use user_repository::*;
