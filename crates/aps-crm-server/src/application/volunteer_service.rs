//! Volunteer Application Service (Use Case)

use std::sync::Arc;

use aps_crm::domain::services::listing::paginate;
use aps_crm::{post_types, DomainError, Page, PageRequest, PostRepository, SortOrder, Volunteer};

/// UI sort keys accepted by volunteer listings
pub const VOLUNTEER_SORT_KEYS: &[(&str, &str)] = &[
    ("id", "id"),
    ("postName", "postName"),
    ("date", "date"),
    ("name", "name"),
    ("email", "email"),
    ("domain", "domain"),
    ("ocupation", "ocupation"),
    ("motivation", "motivation"),
    ("experience", "experience"),
    ("age", "age"),
];

/// Application service for volunteer sign-ups
pub struct VolunteerService<P: PostRepository> {
    posts: Arc<P>,
}

impl<P: PostRepository> VolunteerService<P> {
    pub fn new(posts: Arc<P>) -> Self {
        Self { posts }
    }

    pub async fn load_all(&self) -> Result<Vec<Volunteer>, DomainError> {
        let records = self
            .posts
            .find_by_type(post_types::VOLUNTEER, &["publish"])
            .await?;
        Ok(records.into_iter().map(Volunteer::from_record).collect())
    }

    pub async fn list(
        &self,
        q: Option<&str>,
        page: &PageRequest,
        default_sort: SortOrder,
    ) -> Result<Page<Volunteer>, DomainError> {
        Ok(paginate(
            self.load_all().await?,
            q,
            page,
            VOLUNTEER_SORT_KEYS,
            default_sort,
        ))
    }

    pub async fn get(&self, id: u64) -> Result<Volunteer, DomainError> {
        self.posts
            .find_by_id(post_types::VOLUNTEER, id)
            .await?
            .map(Volunteer::from_record)
            .ok_or_else(|| DomainError::not_found("Volunteer", id))
    }

    pub async fn delete(&self, id: u64) -> Result<(), DomainError> {
        if !self.posts.delete(post_types::VOLUNTEER, id).await? {
            return Err(DomainError::not_found("Volunteer", id));
        }
        tracing::info!("Deleted volunteer {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{post, InMemoryPostRepository};

    fn volunteer(id: u64, last: &str, age: &str) -> aps_crm::PostRecord {
        post(
            id,
            post_types::VOLUNTEER,
            "publish",
            &[("_vol_nume", last), ("_vol_prenume", "Ana"), ("_vol_varsta", age)],
        )
    }

    fn service() -> VolunteerService<InMemoryPostRepository> {
        VolunteerService::new(Arc::new(InMemoryPostRepository::with(vec![
            volunteer(1, "Popa", "9"),
            volunteer(2, "Ionescu", "30"),
            volunteer(3, "Avram", "100"),
            post(4, post_types::CAUSE, "publish", &[]),
            post(5, post_types::VOLUNTEER, "draft", &[]),
        ])))
    }

    #[tokio::test]
    async fn test_list_defaults_and_numeric_age_sort() {
        let service = service();
        let page = service
            .list(None, &PageRequest::new(0, 50, Vec::new()), SortOrder::asc("id"))
            .await
            .unwrap();
        let ids: Vec<u64> = page.content.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let by_age = PageRequest::new(0, 50, vec![SortOrder::desc("age"), SortOrder::asc("bogus")]);
        let page = service.list(None, &by_age, SortOrder::asc("id")).await.unwrap();
        let ages: Vec<Option<i64>> = page.content.iter().map(|v| v.age).collect();
        assert_eq!(ages, vec![Some(100), Some(30), Some(9)]);
    }

    #[tokio::test]
    async fn test_search_by_name_and_exact_id() {
        let service = service();
        let request = PageRequest::new(0, 10, Vec::new());
        let found = service
            .list(Some("ionescu"), &request, SortOrder::desc("id"))
            .await
            .unwrap();
        assert_eq!(found.total_elements, 1);
        assert_eq!(found.content[0].id, 2);

        let by_id = service.list(Some("3"), &request, SortOrder::desc("id")).await.unwrap();
        assert_eq!(by_id.content[0].id, 3);
    }

    #[tokio::test]
    async fn test_get_and_delete_are_type_guarded() {
        let service = service();
        assert_eq!(service.get(2).await.unwrap().last_name.as_deref(), Some("Ionescu"));
        assert!(matches!(service.get(4).await, Err(DomainError::NotFound { .. })));
        assert!(matches!(service.delete(4).await, Err(DomainError::NotFound { .. })));
        service.delete(2).await.unwrap();
        assert!(matches!(service.get(2).await, Err(DomainError::NotFound { .. })));
    }
}
