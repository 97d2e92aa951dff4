//! Mailer Port
//!
//! Abstract interface for outbound email delivery.

use async_trait::async_trait;

use crate::domain::errors::DomainError;

/// Image embedded in the HTML body, referenced as `cid:{content_id}`
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    pub content_id: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// File attached to the message
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Fully assembled HTML email
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    /// Plain-text alternative
    pub text: Option<String>,
    pub inline_images: Vec<InlineImage>,
    pub attachments: Vec<Attachment>,
}

/// Service interface for sending email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError>;
}
