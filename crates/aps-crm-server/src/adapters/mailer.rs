//! SMTP Mailer
//!
//! `lettre` implementation of the Mailer port, plus a logging fallback used
//! when no SMTP relay is configured.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment as MailAttachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use aps_crm::{DomainError, Mailer, OutgoingEmail};

use crate::config::{SmtpConfig, SmtpTls};

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig, from_address: &str, from_name: &str) -> anyhow::Result<Self> {
        let builder = match config.tls {
            SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?,
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?,
            SmtpTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };
        let mut builder = builder.port(config.port);
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: sender(from_address, from_name)?,
        })
    }
}

pub fn sender(address: &str, name: &str) -> anyhow::Result<Mailbox> {
    let address = address
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid MAIL_FROM_ADDRESS {:?}: {}", address, e))?;
    Ok(Mailbox::new(Some(name.to_string()), address))
}

fn content_type(raw: &str) -> Result<ContentType, DomainError> {
    ContentType::parse(raw)
        .map_err(|e| DomainError::validation(format!("Invalid content type {}: {}", raw, e)))
}

/// Assemble mixed[ alternative[ plain, related[ html, images ] ], attachments ]
pub fn build_message(from: &Mailbox, email: &OutgoingEmail) -> Result<Message, DomainError> {
    let to: Mailbox = email
        .to
        .trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("Adresă de email invalidă: {}", email.to)))?;

    let mut related = MultiPart::related().singlepart(SinglePart::html(email.html.clone()));
    for image in &email.inline_images {
        related = related.singlepart(
            MailAttachment::new_inline(image.content_id.clone())
                .body(image.data.clone(), content_type(&image.content_type)?),
        );
    }

    let body = match &email.text {
        Some(text) => MultiPart::alternative()
            .singlepart(SinglePart::plain(text.clone()))
            .multipart(related),
        None => related,
    };

    let mut mixed = MultiPart::mixed().multipart(body);
    for attachment in &email.attachments {
        mixed = mixed.singlepart(
            MailAttachment::new(attachment.filename.clone())
                .body(attachment.data.clone(), content_type(&attachment.content_type)?),
        );
    }

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(email.subject.clone())
        .multipart(mixed)
        .map_err(|e| DomainError::ExternalService(format!("Failed to build email: {}", e)))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        let message = build_message(&self.from, &email)?;
        self.transport.send(message).await.map_err(|e| {
            tracing::error!("SMTP delivery to {} failed: {}", email.to, e);
            DomainError::ExternalService(format!("SMTP delivery failed: {}", e))
        })?;

        tracing::info!("📧 Email sent to {}: {}", email.to, email.subject);
        Ok(())
    }
}

/// Mailer used when SMTP is not configured: logs and drops every message
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DomainError> {
        tracing::warn!(
            to = %email.to,
            subject = %email.subject,
            inline_images = email.inline_images.len(),
            attachments = email.attachments.len(),
            "SMTP not configured, email dropped"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aps_crm::{Attachment, InlineImage};

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "ana@example.ro".into(),
            subject: "Reminder".into(),
            html: r#"<p>Salut</p><img src="cid:logo">"#.into(),
            text: Some("Salut".into()),
            inline_images: vec![InlineImage {
                content_id: "logo".into(),
                content_type: "image/png".into(),
                data: vec![137, 80, 78, 71],
            }],
            attachments: vec![Attachment {
                filename: "Reminder.pdf".into(),
                content_type: "application/pdf".into(),
                data: b"%PDF-1.4".to_vec(),
            }],
        }
    }

    #[test]
    fn test_message_structure() {
        let from = sender("no-reply@example.ro", "APS").unwrap();
        let message = build_message(&from, &email()).unwrap();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();
        assert!(raw.contains("multipart/mixed"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("multipart/related"));
        assert!(raw.contains("<logo>"));
        assert!(raw.contains("Reminder.pdf"));
    }

    #[test]
    fn test_invalid_recipient_is_validation_error() {
        let from = sender("no-reply@example.ro", "APS").unwrap();
        let mut bad = email();
        bad.to = "not an address".into();
        assert!(matches!(
            build_message(&from, &bad),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        assert!(LogMailer.send(email()).await.is_ok());
    }
}
