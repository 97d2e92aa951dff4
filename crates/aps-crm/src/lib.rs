//! APS CRM Domain Library
//!
//! Core domain types and interfaces for the Asociatia Actiune pentru Sanatate CRM.
//! The CRM reads the association's WordPress database (volunteers, causes,
//! sponsorship contracts, tax redirection forms) and owns its own tables for
//! CRM users, settings and generated Borderou 230 documents.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (User, Volunteer, Cause, Sponsorship, Form230, ...)
//!   - `value_objects/`: Immutable value types (UserRole, OrderStatus, PageRequest, ...)
//!   - `services/`: Pure domain services (PHP meta parsing, listing, Borderou XML, KPIs, mail rules)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces (Mailer)
//!
//! # Usage
//!
//! ```rust,ignore
//! use aps_crm::domain::{User, Volunteer};
//! use aps_crm::ports::{UserRepository, PostRepository};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    post_types, setting_keys, Address, Borderou, Cause, CauseKpi, D177Detail, D177Form, D177Kpi,
    Direction, DomainError, FlagsUpdate, Form230, Form230Kpi, IbanBeneficiary, IbanKpi, Kpi,
    LoginPlatform, NewPost, OfflinePayment, OrderStatus, Page, PageRequest, PeopleKpi, PostFlags,
    PostMeta, PostRecord, RefreshToken, Setting, SettingType, SiteLinks, SortOrder, Sponsorship,
    SponsorshipKpi, User, UserRole, UserStatus, Volunteer, VolunteerKpi, WpPost,
};
pub use ports::{
    // Services
    Attachment,
    // Repositories
    BorderouRepository,
    InlineImage,
    Mailer,
    OfflinePaymentRepository,
    OutgoingEmail,
    PostRepository,
    RefreshTokenRepository,
    SettingRepository,
    UserRepository,
};
