//! IBAN Application Service (Use Case)

use std::sync::Arc;

use chrono::Local;

use aps_crm::domain::normalize_iban;
use aps_crm::domain::services::listing::paginate;
use aps_crm::{
    post_types, DomainError, IbanBeneficiary, NewPost, Page, PageRequest, PostRepository,
    SortOrder,
};

pub const IBAN_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("name", "name"),
    ("iban", "iban"),
    ("addedAt", "addedAt"),
];

const IBAN_STATUSES: &[&str] = &["publish", "draft"];

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Application service for IBAN beneficiaries
pub struct IbanService<P: PostRepository> {
    posts: Arc<P>,
}

impl<P: PostRepository> IbanService<P> {
    pub fn new(posts: Arc<P>) -> Self {
        Self { posts }
    }

    pub async fn load_all(&self) -> Result<Vec<IbanBeneficiary>, DomainError> {
        let records = self
            .posts
            .find_by_type(post_types::IBAN, IBAN_STATUSES)
            .await?;
        Ok(records.iter().map(IbanBeneficiary::from_record).collect())
    }

    pub async fn list(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<IbanBeneficiary>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            IBAN_SORT_KEYS,
            SortOrder::desc("id"),
        ))
    }

    pub async fn get(&self, id: u64) -> Result<IbanBeneficiary, DomainError> {
        self.posts
            .find_by_id(post_types::IBAN, id)
            .await?
            .map(|r| IbanBeneficiary::from_record(&r))
            .ok_or_else(|| DomainError::not_found("IBAN", id))
    }

    pub async fn create(&self, name: &str, iban: &str) -> Result<IbanBeneficiary, DomainError> {
        let name = non_blank(Some(name))
            .ok_or_else(|| DomainError::validation("Numele beneficiarului este obligatoriu."))?;
        let iban = normalize_iban(iban)?;

        let id = self
            .posts
            .create(&NewPost {
                post_type: post_types::IBAN.to_string(),
                status: "publish".to_string(),
                title: name.to_string(),
                date: Local::now().naive_local(),
                meta: vec![
                    ("nume".to_string(), name.to_string()),
                    ("iban".to_string(), iban),
                ],
            })
            .await?;

        tracing::info!("Created IBAN beneficiary {} ({})", name, id);
        self.get(id).await
    }

    /// Upsert the non-blank fields
    pub async fn update(
        &self,
        id: u64,
        name: Option<&str>,
        iban: Option<&str>,
    ) -> Result<IbanBeneficiary, DomainError> {
        self.get(id).await?;
        let iban = non_blank(iban).map(normalize_iban).transpose()?;

        if let Some(name) = non_blank(name) {
            self.posts.upsert_meta(id, "nume", name).await?;
        }
        if let Some(iban) = iban {
            self.posts.upsert_meta(id, "iban", &iban).await?;
        }

        tracing::info!("Updated IBAN beneficiary {}", id);
        self.get(id).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        if !self.posts.delete(post_types::IBAN, id).await? {
            return Err(DomainError::not_found("IBAN", id));
        }
        tracing::info!("Deleted IBAN beneficiary {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{post, InMemoryPostRepository};

    const VALID: &str = "RO49 AAAA 1B31 0075 9384 0000";

    fn service() -> IbanService<InMemoryPostRepository> {
        IbanService::new(Arc::new(InMemoryPostRepository::with(vec![
            post(
                1,
                post_types::IBAN,
                "publish",
                &[("nume", "Spital"), ("iban", "RO49AAAA1B31007593840000")],
            ),
            post(2, post_types::IBAN, "draft", &[("nume", "Școala")]),
            post(3, post_types::IBAN, "trash", &[]),
        ])))
    }

    #[tokio::test]
    async fn test_list_includes_drafts() {
        let page = service()
            .list(None, &PageRequest::new(0, 10, Vec::new()))
            .await
            .unwrap();
        let ids: Vec<u64> = page.content.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[tokio::test]
    async fn test_create_normalizes_iban() {
        let service = service();
        let created = service.create(" Clinica ", VALID).await.unwrap();
        assert_eq!(created.id, 4);
        assert_eq!(created.name.as_deref(), Some("Clinica"));
        assert_eq!(created.iban.as_deref(), Some("RO49AAAA1B31007593840000"));

        assert!(matches!(
            service.create("Clinica", "RO00 1234").await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.create(" ", VALID).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_update_only_non_blank_fields() {
        let service = service();
        let updated = service.update(2, Some(" "), Some(VALID)).await.unwrap();
        assert_eq!(updated.name.as_deref(), Some("Școala"));
        assert_eq!(updated.iban.as_deref(), Some("RO49AAAA1B31007593840000"));

        assert!(matches!(
            service.update(2, None, Some("XX12")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update(99, Some("x"), None).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let service = service();
        service.delete(1).await.unwrap();
        assert!(matches!(service.delete(1).await, Err(DomainError::NotFound { .. })));
    }
}
