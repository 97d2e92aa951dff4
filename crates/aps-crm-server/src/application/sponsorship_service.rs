//! Sponsorship and D177 Application Services (Use Cases)
//!
//! Both datasets are company submissions with serialized sections and
//! attachment posts, reviewed through the same CRM flags.

use std::sync::Arc;

use aps_crm::domain::services::listing::paginate;
use aps_crm::domain::{attachment_ids, AttachedFiles};
use aps_crm::{
    post_types, D177Detail, D177Form, DomainError, FlagsUpdate, Page, PageRequest, PostRecord,
    PostRepository, SiteLinks, SortOrder, Sponsorship,
};

pub const SPONSORSHIP_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("date", "date"),
    ("companyName", "companyName"),
    ("fiscalCode", "fiscalCode"),
    ("email", "email"),
    ("phone", "phone"),
    ("iban", "iban"),
    ("amount", "amountNum"),
    ("contractDate", "contractDate"),
    ("downloaded", "downloaded"),
    ("verified", "verified"),
    ("corrupt", "corrupt"),
];

pub const D177_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("date", "postDateIso"),
    ("postDateIso", "postDateIso"),
    ("companyName", "companyName"),
    ("fiscalCode", "fiscalCode"),
    ("email", "email"),
    ("amount", "amountNum"),
    ("downloaded", "downloaded"),
    ("verified", "verified"),
    ("corrupt", "corrupt"),
];

/// Published posts of a type plus the files their attachments point to
async fn load_with_files<P: PostRepository>(
    posts: &P,
    post_type: &str,
) -> Result<(Vec<PostRecord>, AttachedFiles), DomainError> {
    let records = posts.find_by_type(post_type, &["publish"]).await?;
    let ids: Vec<u64> = records.iter().flat_map(attachment_ids).collect();
    let files = if ids.is_empty() {
        AttachedFiles::new()
    } else {
        posts.attached_files(&ids).await?
    };
    Ok((records, files))
}

/// Upsert review flags on a post of the given type
pub(crate) async fn update_post_flags<P: PostRepository>(
    posts: &P,
    post_type: &str,
    entity: &str,
    id: u64,
    update: &FlagsUpdate,
) -> Result<(), DomainError> {
    if posts.find_by_id(post_type, id).await?.is_none() {
        return Err(DomainError::not_found(entity, id));
    }
    posts.update_flags(id, update).await?;
    tracing::info!("{} {} flags updated: {:?}", entity, id, update);
    Ok(())
}

pub(crate) async fn delete_post<P: PostRepository>(
    posts: &P,
    post_type: &str,
    entity: &str,
    id: u64,
) -> Result<(), DomainError> {
    if !posts.delete(post_type, id).await? {
        return Err(DomainError::not_found(entity, id));
    }
    tracing::info!("Deleted {} {}", entity, id);
    Ok(())
}

/// Application service for sponsorship contracts
pub struct SponsorshipService<P: PostRepository> {
    posts: Arc<P>,
    links: SiteLinks,
}

impl<P: PostRepository> SponsorshipService<P> {
    pub fn new(posts: Arc<P>, links: SiteLinks) -> Self {
        Self { posts, links }
    }

    pub async fn load_all(&self) -> Result<Vec<Sponsorship>, DomainError> {
        let (records, files) = load_with_files(self.posts.as_ref(), post_types::SPONSORSHIP).await?;
        Ok(records
            .iter()
            .map(|r| Sponsorship::from_record(r, &files, &self.links))
            .collect())
    }

    pub async fn list(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<Sponsorship>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            SPONSORSHIP_SORT_KEYS,
            SortOrder::desc("date"),
        ))
    }

    pub async fn update_flags(&self, id: u64, update: &FlagsUpdate) -> Result<(), DomainError> {
        update_post_flags(
            self.posts.as_ref(),
            post_types::SPONSORSHIP,
            "Sponsorship",
            id,
            update,
        )
        .await
    }

    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        delete_post(self.posts.as_ref(), post_types::SPONSORSHIP, "Sponsorship", id).await
    }
}

/// Application service for D177 declarations
pub struct D177Service<P: PostRepository> {
    posts: Arc<P>,
    links: SiteLinks,
}

impl<P: PostRepository> D177Service<P> {
    pub fn new(posts: Arc<P>, links: SiteLinks) -> Self {
        Self { posts, links }
    }

    pub async fn load_all(&self) -> Result<Vec<D177Form>, DomainError> {
        let (records, files) = load_with_files(self.posts.as_ref(), post_types::D177).await?;
        Ok(records
            .iter()
            .map(|r| D177Form::from_record(r, &files, &self.links))
            .collect())
    }

    pub async fn list(
        &self,
        q: Option<&str>,
        page: &PageRequest,
    ) -> Result<Page<D177Form>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            D177_SORT_KEYS,
            SortOrder::asc("postDateIso"),
        ))
    }

    pub async fn get(&self, id: u64) -> Result<D177Detail, DomainError> {
        let record = self
            .posts
            .find_by_id(post_types::D177, id)
            .await?
            .ok_or_else(|| DomainError::not_found("D177", id))?;
        let ids = attachment_ids(&record);
        let files = if ids.is_empty() {
            AttachedFiles::new()
        } else {
            self.posts.attached_files(&ids).await?
        };
        Ok(D177Detail::from_record(&record, &files, &self.links))
    }

    pub async fn update_flags(&self, id: u64, update: &FlagsUpdate) -> Result<(), DomainError> {
        update_post_flags(self.posts.as_ref(), post_types::D177, "D177", id, update).await
    }

    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        delete_post(self.posts.as_ref(), post_types::D177, "D177", id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{date, post, InMemoryPostRepository};

    const FIRMA_ACME: &str = r#"a:2:{s:8:"denumire";s:4:"Acme";s:3:"cui";s:6:"RO1234";}"#;
    const CONTRACT: &str = r#"a:2:{s:4:"suma";s:4:"1500";s:4:"data";s:10:"2025-02-10";}"#;

    fn repo() -> Arc<InMemoryPostRepository> {
        let mut acme = post(
            10,
            post_types::SPONSORSHIP,
            "publish",
            &[("_aps_firma", FIRMA_ACME), ("_aps_contract", CONTRACT), ("_aps_doc_id", "90")],
        );
        acme.post.date = date(2025, 2, 10);
        let untitled = post(11, post_types::SPONSORSHIP, "publish", &[]);
        let d177 = post(
            20,
            post_types::D177,
            "publish",
            &[
                ("_aps177_firma", FIRMA_ACME),
                ("_aps177_contract", CONTRACT),
                ("_aps177_signature_id", "91"),
            ],
        );
        let mut repo = InMemoryPostRepository::with(vec![acme, untitled, d177]);
        repo.files.insert(90, "2025/02/contract.pdf".into());
        repo.files.insert(91, "2025/02/semnatura.png".into());
        Arc::new(repo)
    }

    fn links() -> SiteLinks {
        SiteLinks::new("https://aps.ro/")
    }

    #[tokio::test]
    async fn test_sponsorships_resolve_sections_and_files() {
        let service = SponsorshipService::new(repo(), links());
        let page = service
            .list(None, &PageRequest::new(0, 10, Vec::new()))
            .await
            .unwrap();
        assert_eq!(page.total_elements, 2);

        let acme = page.content.iter().find(|s| s.id == 10).unwrap();
        assert_eq!(acme.company_name, "Acme");
        assert_eq!(acme.fiscal_code.as_deref(), Some("RO1234"));
        assert_eq!(acme.amount_value(), Some(1500.0));
        assert_eq!(
            acme.doc_url.as_deref(),
            Some("https://aps.ro/wp-content/uploads/2025/02/contract.pdf")
        );

        let untitled = page.content.iter().find(|s| s.id == 11).unwrap();
        assert_eq!(untitled.company_name, "Post 11");
    }

    #[tokio::test]
    async fn test_sponsorship_amount_sort_and_search() {
        let service = SponsorshipService::new(repo(), links());
        let request = PageRequest::new(0, 10, vec![SortOrder::desc("amount")]);
        let page = service.list(None, &request).await.unwrap();
        assert_eq!(page.content[0].id, 10);

        let found = service
            .list(Some("ro12"), &PageRequest::new(0, 10, Vec::new()))
            .await
            .unwrap();
        assert_eq!(found.content.len(), 1);
    }

    #[tokio::test]
    async fn test_flags_upsert_keeps_absent_fields() {
        let posts = repo();
        let service = SponsorshipService::new(posts.clone(), links());
        service
            .update_flags(10, &FlagsUpdate { verified: Some(true), ..Default::default() })
            .await
            .unwrap();
        service
            .update_flags(10, &FlagsUpdate { downloaded: Some(true), ..Default::default() })
            .await
            .unwrap();
        let flags = posts.record(10).unwrap().flags;
        assert!(flags.verified && flags.downloaded && !flags.corrupt);

        assert!(matches!(
            service.update_flags(20, &FlagsUpdate::default()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_d177_detail_and_type_guarded_delete() {
        let posts = repo();
        let service = D177Service::new(posts.clone(), links());
        let detail = service.get(20).await.unwrap();
        assert_eq!(detail.firma.get("denumire").map(String::as_str), Some("Acme"));
        assert_eq!(
            detail.sig_url.as_deref(),
            Some("https://aps.ro/wp-content/uploads/2025/02/semnatura.png")
        );
        assert_eq!(detail.admin_edit, "https://aps.ro/wp-admin/post.php?post=20&action=edit");

        assert!(matches!(service.get(10).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.delete(10).await, Err(DomainError::NotFound { .. })));
        service.delete(20).await.unwrap();
        assert!(posts.record(20).is_none());
    }
}
