//! User Application Service (Use Case)
//!
//! CRM account listing and administration.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use aps_crm::{
    DomainError, Page, PageRequest, RefreshTokenRepository, User, UserRepository, UserRole,
    UserStatus,
};

/// Roles that can sign in to the web back office
const WEB_ROLES: &[UserRole] = &[UserRole::Admin, UserRole::Volunteer];

/// Application service for CRM users
pub struct UserService<U: UserRepository, T: RefreshTokenRepository> {
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U: UserRepository, T: RefreshTokenRepository> UserService<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.users.find_by_email(email).await
    }

    pub async fn get(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn list_all(&self) -> Result<Vec<User>, DomainError> {
        self.users.find_all().await
    }

    /// Paged search; `web_only` keeps back-office accounts
    pub async fn search(
        &self,
        q: Option<&str>,
        page: &PageRequest,
        web_only: bool,
    ) -> Result<Page<User>, DomainError> {
        let roles: &[UserRole] = if web_only { WEB_ROLES } else { &[] };
        let q = q.map(str::trim).filter(|q| !q.is_empty());
        self.users.search(q, roles, page).await
    }

    /// A missing status resets the account to PENDING
    pub async fn update_status(
        &self,
        id: Uuid,
        status: Option<&str>,
    ) -> Result<User, DomainError> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<UserStatus>().map_err(DomainError::validation)?,
            None => UserStatus::Pending,
        };

        let mut user = self.get(id).await?;
        user.status = status;
        user.updated_at = Utc::now();
        let saved = self.users.update(&user).await?;

        tracing::info!("User {} status set to {}", saved.email, saved.status);
        Ok(saved)
    }

    pub async fn set_premium(&self, id: Uuid, premium: bool) -> Result<User, DomainError> {
        let mut user = self.get(id).await?;
        user.is_premium = premium;
        user.updated_at = Utc::now();
        let saved = self.users.update(&user).await?;

        tracing::info!("User {} premium set to {}", saved.email, premium);
        Ok(saved)
    }

    /// Delete the account and its refresh tokens
    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let user = self.get(id).await?;
        let tokens = self.tokens.delete_by_user(id).await?;
        if !self.users.delete(id).await? {
            return Err(DomainError::not_found("User", id));
        }

        tracing::info!("Deleted user {} ({} refresh tokens)", user.email, tokens);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{InMemoryRefreshTokenRepository, InMemoryUserRepository};
    use aps_crm::RefreshToken;

    fn user(first: &str, email: &str, role: UserRole) -> User {
        let mut user = User::new(first.into(), "Pop".into(), email.into(), "hash".into(), None);
        user.role = role;
        user
    }

    type TestUsers = UserService<InMemoryUserRepository, InMemoryRefreshTokenRepository>;

    fn service(users: Vec<User>) -> (TestUsers, Arc<InMemoryRefreshTokenRepository>) {
        let tokens = Arc::new(InMemoryRefreshTokenRepository::default());
        (
            UserService::new(Arc::new(InMemoryUserRepository::with(users)), tokens.clone()),
            tokens,
        )
    }

    #[tokio::test]
    async fn test_search_filters_by_text_and_web_roles() {
        let (service, _) = service(vec![
            user("Ana", "ana@aps.ro", UserRole::Admin),
            user("Dan", "dan@aps.ro", UserRole::User),
            user("Ioana", "ioana@aps.ro", UserRole::Volunteer),
        ]);
        let page = PageRequest::new(0, 10, Vec::new());

        let all = service.search(None, &page, false).await.unwrap();
        assert_eq!(all.total_elements, 3);

        let web = service.search(Some("  "), &page, true).await.unwrap();
        assert_eq!(web.total_elements, 2);
        assert!(web.content.iter().all(|u| u.role != UserRole::User));

        let dan = service.search(Some(" DAN@"), &page, false).await.unwrap();
        assert_eq!(dan.content.len(), 1);
        assert_eq!(dan.content[0].first_name, "Dan");
    }

    #[tokio::test]
    async fn test_update_status() {
        let mut active = user("Ana", "ana@aps.ro", UserRole::User);
        active.status = UserStatus::Active;
        let id = active.id;
        let (service, _) = service(vec![active]);

        let updated = service.update_status(id, Some("inactive")).await.unwrap();
        assert_eq!(updated.status, UserStatus::Inactive);

        let reset = service.update_status(id, None).await.unwrap();
        assert_eq!(reset.status, UserStatus::Pending);

        assert!(matches!(
            service.update_status(id, Some("blocat")).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update_status(Uuid::new_v4(), Some("ACTIVE")).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_set_premium() {
        let ana = user("Ana", "ana@aps.ro", UserRole::User);
        let id = ana.id;
        let (service, _) = service(vec![ana]);
        assert!(service.set_premium(id, true).await.unwrap().is_premium);
        assert!(!service.set_premium(id, false).await.unwrap().is_premium);
    }

    #[tokio::test]
    async fn test_delete_removes_tokens_then_user() {
        let ana = user("Ana", "ana@aps.ro", UserRole::User);
        let id = ana.id;
        let (service, tokens) = service(vec![ana]);
        tokens
            .create(&RefreshToken::new(id, "h".into(), Utc::now()))
            .await
            .unwrap();

        service.delete(id).await.unwrap();
        assert!(tokens.tokens.lock().unwrap().is_empty());
        assert!(service.find_by_email("ana@aps.ro").await.unwrap().is_none());
        assert!(matches!(service.delete(id).await, Err(DomainError::NotFound { .. })));
    }
}
