//! KPI Application Service (Use Case)
//!
//! Loads every dataset once and hands it to the domain calculators.

use std::sync::Arc;

use chrono::NaiveDateTime;

use aps_crm::domain::services::kpi;
use aps_crm::domain::AttachedFiles;
use aps_crm::{
    post_types, Cause, D177Form, DomainError, Form230, IbanKpi, Kpi, PeopleKpi, PostRecord,
    PostRepository, SiteLinks, Sponsorship, UserRepository, Volunteer,
};

/// Application service for dashboard figures
pub struct KpiService<P: PostRepository, U: UserRepository> {
    posts: Arc<P>,
    users: Arc<U>,
}

impl<P: PostRepository, U: UserRepository> KpiService<P, U> {
    pub fn new(posts: Arc<P>, users: Arc<U>) -> Self {
        Self { posts, users }
    }

    async fn records(
        &self,
        post_type: &str,
        statuses: &[&str],
    ) -> Result<Vec<PostRecord>, DomainError> {
        self.posts.find_by_type(post_type, statuses).await
    }

    pub async fn compute(&self, now: NaiveDateTime) -> Result<Kpi, DomainError> {
        let today = now.date();
        // Links and attachments do not affect any figure
        let links = SiteLinks::default();
        let files = AttachedFiles::new();

        let volunteers: Vec<Volunteer> = self
            .records(post_types::VOLUNTEER, &["publish"])
            .await?
            .into_iter()
            .map(Volunteer::from_record)
            .collect();
        let d177: Vec<D177Form> = self
            .records(post_types::D177, &["publish"])
            .await?
            .iter()
            .map(|r| D177Form::from_record(r, &files, &links))
            .collect();
        let sponsorships: Vec<Sponsorship> = self
            .records(post_types::SPONSORSHIP, &["publish"])
            .await?
            .iter()
            .map(|r| Sponsorship::from_record(r, &files, &links))
            .collect();
        let forms: Vec<Form230> = self
            .records(post_types::FORM_230, &["publish"])
            .await?
            .iter()
            .map(|r| Form230::from_record(r, &links))
            .collect();
        let ibans = self
            .records(post_types::IBAN, &["publish", "draft"])
            .await?
            .len() as u64;
        let causes: Vec<Cause> = self
            .records(post_types::CAUSE, &["publish", "future"])
            .await?
            .iter()
            .map(Cause::from_record)
            .collect();

        Ok(Kpi {
            volunteers: kpi::volunteer_kpi(&volunteers),
            f177: kpi::d177_kpi(&d177, today),
            sponsorship: kpi::sponsorship_kpi(&sponsorships, today),
            f230: kpi::form230_kpi(&forms, today),
            iban: IbanKpi { total: ibans },
            causes: kpi::cause_kpi(&causes, now),
            persoane: PeopleKpi {
                users: self.posts.count_site_users().await?,
                admins: self.users.count().await?,
            },
        })
    }
}
