//! Domain Services
//!
//! Pure functions over domain entities: no I/O, no clocks.

pub mod borderou_xml;
pub mod kpi;
pub mod listing;
pub mod mail_rules;
pub mod php_serialized;
