//! Mail Application Service (Use Case)
//!
//! Ad-hoc HTML emails plus the Formular 230 renewal and birthday jobs.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use aps_crm::domain::services::mail_rules::{
    birthday_from_cnp, is_birthday, renewal_due, BIRTHDAY_SUBJECT, RENEWAL_SUBJECT,
};
use aps_crm::{post_types, DomainError, Form230, PostRepository, SiteLinks};

use crate::config::PublicLinks;
use crate::services::templates::{BIRTHDAY, RENEWAL};
use crate::services::MailComposer;

/// Outcome of one mail job run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobReport {
    /// Forms the job selected
    pub processed: u32,
    pub sent: u32,
    pub failed: u32,
}

/// Application service for outbound mail
pub struct MailService<P: PostRepository> {
    posts: Arc<P>,
    composer: Arc<MailComposer>,
    links: PublicLinks,
    site: SiteLinks,
}

impl<P: PostRepository> MailService<P> {
    pub fn new(
        posts: Arc<P>,
        composer: Arc<MailComposer>,
        links: PublicLinks,
        site: SiteLinks,
    ) -> Self {
        Self {
            posts,
            composer,
            links,
            site,
        }
    }

    /// Send one HTML email, optionally with a PDF downloaded from `pdf_url`
    pub async fn send(
        &self,
        to: &str,
        subject: &str,
        message: &str,
        pdf_url: Option<&str>,
    ) -> Result<(), DomainError> {
        if to.trim().is_empty() {
            return Err(DomainError::validation("Destinatarul este obligatoriu."));
        }
        if subject.trim().is_empty() {
            return Err(DomainError::validation("Subiectul este obligatoriu."));
        }

        match pdf_url.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => {
                self.composer
                    .send_html_with_pdf(to, subject, message, url)
                    .await?
            }
            None => self.composer.send_html(to, subject, message).await?,
        }

        tracing::info!("Sent email to {}: {}", to.trim(), subject);
        Ok(())
    }

    async fn forms(&self) -> Result<Vec<Form230>, DomainError> {
        let records = self
            .posts
            .find_by_type(post_types::FORM_230, &["publish"])
            .await?;
        Ok(records
            .iter()
            .map(|r| Form230::from_record(r, &self.site))
            .collect())
    }

    async fn deliver(&self, form: &Form230, email: &str, subject: &str, template: &str) -> bool {
        let user_name = form.beneficiary();
        let years = form.duration_years().to_string();
        let vars = [
            ("user_name", user_name.as_str()),
            ("years_since_completion", years.as_str()),
            ("user_email", email),
            ("website_url", self.links.website.as_str()),
            ("facebook_url", self.links.facebook.as_str()),
            ("instagram_url", self.links.instagram.as_str()),
            ("linkedin_url", self.links.linkedin.as_str()),
            ("unsubscribe_url", self.links.unsubscribe.as_str()),
        ];

        match self
            .composer
            .send_template(email, subject, template, &vars)
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Mail for form {} to {} failed: {}", form.id, email, e);
                false
            }
        }
    }

    /// Remind donors whose redirection expires this year
    pub async fn run_renewal(&self, today: NaiveDate) -> Result<JobReport, DomainError> {
        let mut report = JobReport::default();

        for form in self.forms().await? {
            let Some(email) = form.email.clone() else {
                continue;
            };
            if renewal_due(&form, today.year()).is_none() {
                continue;
            }
            report.processed += 1;
            if self.deliver(&form, &email, RENEWAL_SUBJECT, RENEWAL).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }
        }

        tracing::info!(
            "Renewal reminders: {} due, {} sent, {} failed",
            report.processed,
            report.sent,
            report.failed
        );
        Ok(report)
    }

    /// Greet donors whose CNP birthday is today
    pub async fn run_birthday(&self, today: NaiveDate) -> Result<JobReport, DomainError> {
        let mut report = JobReport::default();

        for form in self.forms().await? {
            let Some(email) = form.email.clone() else {
                continue;
            };
            let cnp = form.cnp.as_deref().unwrap_or_default();
            if birthday_from_cnp(cnp).is_none() {
                tracing::debug!("Skipping form {}: invalid CNP", form.id);
                continue;
            }
            if !is_birthday(cnp, today) {
                continue;
            }
            report.processed += 1;
            if self.deliver(&form, &email, BIRTHDAY_SUBJECT, BIRTHDAY).await {
                report.sent += 1;
            } else {
                report.failed += 1;
            }
        }

        tracing::info!(
            "Birthday greetings: {} due, {} sent, {} failed",
            report.processed,
            report.sent,
            report.failed
        );
        Ok(report)
    }
}
