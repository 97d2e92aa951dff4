//! Formular 230 Application Service (Use Case)
//!
//! Tax redirection forms, their review flags and Borderou 230 generation.

use std::sync::Arc;

use chrono::NaiveDate;

use aps_crm::domain::services::borderou_xml::{self, BorderouHeader};
use aps_crm::domain::services::listing::paginate;
use aps_crm::{
    post_types, setting_keys, Borderou, BorderouRepository, DomainError, FlagsUpdate, Form230,
    Page, PageRequest, PostRepository, SettingRepository, SiteLinks, SortOrder,
};

use super::sponsorship_service::{delete_post, update_post_flags};

pub const F230_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("anFiscal", "year"),
    ("submittedAt", "submittedAt"),
    ("period", "period"),
    ("iban", "iban"),
    ("beneficiary", "lastName"),
    ("emailContrib", "email"),
    ("acordEmail", "acord"),
    ("downloaded", "downloaded"),
    ("verified", "verified"),
    ("corrupt", "corrupt"),
];

/// Application service for Formular 230 submissions
pub struct F230Service<P, S, B>
where
    P: PostRepository,
    S: SettingRepository,
    B: BorderouRepository,
{
    posts: Arc<P>,
    settings: Arc<S>,
    borderouri: Arc<B>,
    links: SiteLinks,
}

impl<P, S, B> F230Service<P, S, B>
where
    P: PostRepository,
    S: SettingRepository,
    B: BorderouRepository,
{
    pub fn new(posts: Arc<P>, settings: Arc<S>, borderouri: Arc<B>, links: SiteLinks) -> Self {
        Self {
            posts,
            settings,
            borderouri,
            links,
        }
    }

    pub async fn load_all(&self) -> Result<Vec<Form230>, DomainError> {
        let records = self
            .posts
            .find_by_type(post_types::FORM_230, &["publish"])
            .await?;
        Ok(records
            .iter()
            .map(|r| Form230::from_record(r, &self.links))
            .collect())
    }

    pub async fn list(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<Form230>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            F230_SORT_KEYS,
            SortOrder::desc("submittedAt"),
        ))
    }

    pub async fn get(&self, id: u64) -> Result<Form230, DomainError> {
        self.posts
            .find_by_id(post_types::FORM_230, id)
            .await?
            .map(|r| Form230::from_record(&r, &self.links))
            .ok_or_else(|| DomainError::not_found("Formular230", id))
    }

    pub async fn update_flags(&self, id: u64, update: &FlagsUpdate) -> Result<(), DomainError> {
        update_post_flags(self.posts.as_ref(), post_types::FORM_230, "Formular230", id, update)
            .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        delete_post(self.posts.as_ref(), post_types::FORM_230, "Formular230", id).await
    }

    /// Build and store a Borderou for the given forms, in input order.
    /// Unknown ids are skipped.
    pub async fn create_borderou(
        &self,
        ids: &[u64],
        date: NaiveDate,
    ) -> Result<Borderou, DomainError> {
        if ids.is_empty() {
            return Err(DomainError::validation(
                "Selectează cel puțin un formular pentru borderou.",
            ));
        }

        let settings = self.settings.find_by_names(setting_keys::XML_KEYS).await?;
        // The real number is only known once the row exists
        let header = BorderouHeader::from_settings(&settings, date, 0)?;

        let mut forms = Vec::with_capacity(ids.len());
        for id in ids {
            match self.posts.find_by_id(post_types::FORM_230, *id).await? {
                Some(record) => forms.push(Form230::from_record(&record, &self.links)),
                None => tracing::warn!("Borderou: skipping unknown Formular 230 {}", id),
            }
        }
        let post_ids: Vec<u64> = forms.iter().map(|f| f.id).collect();

        let render = |nr: i64| {
            let header = BorderouHeader {
                nr,
                ..header.clone()
            };
            borderou_xml::render(&header, &forms)
        };
        let borderou = self.borderouri.create(date, &post_ids, &render).await?;

        tracing::info!(
            "Created Borderou {} ({}) with {} forms",
            borderou.id,
            borderou.date,
            post_ids.len()
        );
        Ok(borderou)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{
        post, InMemoryBorderouRepository, InMemoryPostRepository, InMemorySettingRepository,
    };
    use aps_crm::{Setting, SettingType};

    type TestF230 =
        F230Service<InMemoryPostRepository, InMemorySettingRepository, InMemoryBorderouRepository>;

    fn form(id: u64, last: &str, cnp: &str, iban: &str) -> aps_crm::PostRecord {
        post(
            id,
            post_types::FORM_230,
            "publish",
            &[
                ("anul", "2024"),
                ("nume", "Ion"),
                ("prenume", last),
                ("cnp", cnp),
                ("iban", iban),
                ("acordComunicare", "1"),
            ],
        )
    }

    fn service(settings: Vec<Setting>) -> (TestF230, Arc<InMemoryBorderouRepository>) {
        let borderouri = Arc::new(InMemoryBorderouRepository::default());
        let service = F230Service::new(
            Arc::new(InMemoryPostRepository::with(vec![
                form(1, "Popescu", "1900315123456", "RO49AAAA1B31007593840000"),
                form(2, "Avram", "2850101123456", "RO49AAAA1B31007593840000"),
                post(3, post_types::D177, "publish", &[]),
            ])),
            Arc::new(InMemorySettingRepository::with(settings)),
            borderouri.clone(),
            SiteLinks::new("https://aps.ro"),
        );
        (service, borderouri)
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 20).unwrap()
    }

    #[tokio::test]
    async fn test_list_sorts_beneficiary_by_last_name() {
        let (service, _) = service(Vec::new());
        let request = PageRequest::new(0, 10, vec![SortOrder::asc("beneficiary")]);
        let page = service.list(None, &request).await.unwrap();
        let ids: Vec<u64> = page.content.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_borderou_in_input_order_skipping_unknown() {
        let (service, borderouri) = service(Vec::new());
        let borderou = service.create_borderou(&[2, 99, 3, 1], day()).await.unwrap();

        assert_eq!(borderou.id, 1);
        assert_eq!(borderou.file_name(), "borderou230-1.xml");
        assert!(borderou.xml.contains(r#"nr_borderou="1""#));
        assert!(borderou.xml.contains(r#"totalPlata_A="2""#));
        assert!(borderou.xml.contains(r#"luna="5""#));
        let first = borderou.xml.find("2850101123456").unwrap();
        let second = borderou.xml.find("1900315123456").unwrap();
        assert!(first < second);

        assert_eq!(*borderouri.assigned.lock().unwrap(), vec![(2, 1), (1, 1)]);
    }

    #[tokio::test]
    async fn test_borderou_validation() {
        let (empty, _) = service(Vec::new());
        assert!(matches!(
            empty.create_borderou(&[], day()).await,
            Err(DomainError::Validation(_))
        ));

        let bad_month = Setting::new(setting_keys::XML_LUNA, SettingType::Integer, "mai", "");
        let (misconfigured, borderouri) = service(vec![bad_month]);
        assert!(matches!(
            misconfigured.create_borderou(&[1], day()).await,
            Err(DomainError::Validation(_))
        ));
        assert!(borderouri.documents.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_is_type_guarded() {
        let (service, _) = service(Vec::new());
        let form = service.get(1).await.unwrap();
        assert_eq!(form.cnp.as_deref(), Some("1900315123456"));
        assert!(form.accepts_contact);
        assert!(matches!(service.get(3).await, Err(DomainError::NotFound { .. })));
    }
}
