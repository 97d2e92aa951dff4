//! Mail Composer
//!
//! Turns an HTML body into a complete message: inline `cid:` images loaded
//! from the images directory, a plain-text alternative and an optional PDF
//! downloaded from a URL. Delivery goes through the [`Mailer`] port.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use aps_crm::{Attachment, DomainError, InlineImage, Mailer, OutgoingEmail};

use super::html::{cid_references, html_to_text};
use super::templates::Templates;

pub struct MailComposer {
    mailer: Arc<dyn Mailer>,
    templates: Templates,
    images_dir: PathBuf,
    http: reqwest::Client,
}

fn image_content_type(name: &str) -> &'static str {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// `cid:` images referenced by any template but absent from `images_dir`
pub fn missing_images(templates: &Templates, images_dir: &Path) -> Vec<String> {
    let mut missing: Vec<String> = templates
        .iter()
        .flat_map(|(_, body)| cid_references(body))
        .filter(|name| !images_dir.join(name).is_file())
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

impl MailComposer {
    pub fn new(mailer: Arc<dyn Mailer>, templates: Templates, images_dir: PathBuf) -> Self {
        Self {
            mailer,
            templates,
            images_dir,
            http: reqwest::Client::new(),
        }
    }

    pub fn templates(&self) -> &Templates {
        &self.templates
    }

    async fn load_image(&self, name: &str) -> Result<InlineImage, DomainError> {
        let not_found = || DomainError::validation(format!("Image not found for cid: {}", name));
        if name.contains(['/', '\\']) || name.contains("..") {
            return Err(not_found());
        }

        let data = tokio::fs::read(self.images_dir.join(name))
            .await
            .map_err(|_| not_found())?;
        Ok(InlineImage {
            content_id: name.to_string(),
            content_type: image_content_type(name).to_string(),
            data,
        })
    }

    /// Build the message with embedded images and a text alternative
    pub async fn compose(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<OutgoingEmail, DomainError> {
        let mut inline_images = Vec::new();
        for name in cid_references(html) {
            inline_images.push(self.load_image(&name).await?);
        }
        let text = html_to_text(html);

        Ok(OutgoingEmail {
            to: to.trim().to_string(),
            subject: subject.to_string(),
            html: html.to_string(),
            text: (!text.is_empty()).then_some(text),
            inline_images,
            attachments: Vec::new(),
        })
    }

    async fn download_pdf(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| DomainError::ExternalService(format!("PDF download failed: {}", e)))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DomainError::ExternalService(format!("PDF download failed: {}", e)))?;
        Ok(bytes.to_vec())
    }

    pub async fn send_html(&self, to: &str, subject: &str, html: &str) -> Result<(), DomainError> {
        let email = self.compose(to, subject, html).await?;
        self.mailer.send(email).await
    }

    /// Send with the PDF at `pdf_url` attached as `{subject}.pdf`
    pub async fn send_html_with_pdf(
        &self,
        to: &str,
        subject: &str,
        html: &str,
        pdf_url: &str,
    ) -> Result<(), DomainError> {
        let mut email = self.compose(to, subject, html).await?;
        let data = self.download_pdf(pdf_url).await?;
        email.attachments.push(Attachment {
            filename: format!("{}.pdf", subject),
            content_type: "application/pdf".to_string(),
            data,
        });
        self.mailer.send(email).await
    }

    pub async fn send_template(
        &self,
        to: &str,
        subject: &str,
        template: &str,
        vars: &[(&str, &str)],
    ) -> Result<(), DomainError> {
        let html = self.templates.render(template, vars)?;
        self.send_html(to, subject, &html).await
    }
}
