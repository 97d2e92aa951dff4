//! Setting Application Service (Use Case)

use std::sync::Arc;

use aps_crm::{setting_keys, DomainError, Setting, SettingRepository, SettingType};

/// Application service for CRM settings
pub struct SettingService<S: SettingRepository> {
    repo: Arc<S>,
}

impl<S: SettingRepository> SettingService<S> {
    pub fn new(repo: Arc<S>) -> Self {
        Self { repo }
    }

    pub async fn list_all(&self) -> Result<Vec<Setting>, DomainError> {
        self.repo.find_all().await
    }

    /// Settings used by the Borderou 230 XML
    pub async fn list_xml(&self) -> Result<Vec<Setting>, DomainError> {
        self.repo.find_by_names(setting_keys::XML_KEYS).await
    }

    async fn get(&self, id: i64) -> Result<Setting, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Setting", id))
    }

    /// Store a value coerced to the setting's declared type
    pub async fn update_value(&self, id: i64, value: Option<&str>) -> Result<Setting, DomainError> {
        let value = value.ok_or_else(|| DomainError::validation("Valoarea este obligatorie."))?;
        let mut setting = self.get(id).await?;
        setting.value = Some(setting.kind().coerce(value)?);
        let saved = self.repo.save(&setting).await?;

        tracing::info!("Setting {} updated", saved.name);
        Ok(saved)
    }

    pub async fn reset(&self, id: i64) -> Result<Setting, DomainError> {
        let mut setting = self.get(id).await?;
        setting.value = setting.default_value.clone();
        let saved = self.repo.save(&setting).await?;

        tracing::info!("Setting {} reset to default", saved.name);
        Ok(saved)
    }

    pub async fn require_active_for_login(&self) -> Result<bool, DomainError> {
        Ok(self
            .repo
            .find_by_name(setting_keys::REQUIRE_ACTIVE_FOR_LOGIN)
            .await?
            .is_some_and(|s| s.is_enabled()))
    }

    /// Creates the flag on first use
    pub async fn set_require_active_for_login(&self, enabled: bool) -> Result<bool, DomainError> {
        let mut setting = match self
            .repo
            .find_by_name(setting_keys::REQUIRE_ACTIVE_FOR_LOGIN)
            .await?
        {
            Some(existing) => existing,
            None => Setting::new(
                setting_keys::REQUIRE_ACTIVE_FOR_LOGIN,
                SettingType::Boolean,
                "false",
                "false",
            ),
        };
        setting.value = Some(enabled.to_string());
        let saved = self.repo.save(&setting).await?;

        tracing::info!("require_active_for_login set to {}", enabled);
        Ok(saved.is_enabled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::InMemorySettingRepository;

    fn service() -> SettingService<InMemorySettingRepository> {
        SettingService::new(Arc::new(InMemorySettingRepository::with(vec![
            Setting::new(setting_keys::XML_AN, SettingType::Integer, "2025", "2024"),
            Setting::new(setting_keys::XMLNS, SettingType::String, "ns", "ns-default"),
            Setting::new("banner", SettingType::Boolean, "false", "false"),
        ])))
    }

    #[tokio::test]
    async fn test_xml_settings_only() {
        let names: Vec<String> = service()
            .list_xml()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["xml_an", "xmlns"]);
    }

    #[tokio::test]
    async fn test_update_coerces_by_type() {
        let service = service();
        let year = service.update_value(1, Some(" 2026 ")).await.unwrap();
        assert_eq!(year.value.as_deref(), Some("2026"));
        assert!(matches!(
            service.update_value(1, Some("abc")).await,
            Err(DomainError::Validation(_))
        ));
        let banner = service.update_value(3, Some("Da")).await.unwrap();
        assert_eq!(banner.value.as_deref(), Some("true"));
        assert!(matches!(
            service.update_value(1, None).await,
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.update_value(42, Some("x")).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_reset_restores_default() {
        let service = service();
        let reset = service.reset(2).await.unwrap();
        assert_eq!(reset.value.as_deref(), Some("ns-default"));
    }

    #[tokio::test]
    async fn test_require_active_flag_is_created_on_demand() {
        let service = service();
        assert!(!service.require_active_for_login().await.unwrap());
        assert!(service.set_require_active_for_login(true).await.unwrap());
        assert!(service.require_active_for_login().await.unwrap());
        assert!(!service.set_require_active_for_login(false).await.unwrap());
        assert_eq!(service.list_all().await.unwrap().len(), 4);
    }
}
