//! MySQL implementation of SettingRepository

use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};

use aps_crm::{DomainError, Setting, SettingRepository};

use super::db_error;

pub struct MySqlSettingRepository {
    pool: MySqlPool,
}

impl MySqlSettingRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingRow {
    id: i64,
    name: String,
    setting_type: Option<String>,
    value: Option<String>,
    default_value: Option<String>,
}

impl From<SettingRow> for Setting {
    fn from(row: SettingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            setting_type: row.setting_type.unwrap_or_else(|| "string".to_string()),
            value: row.value,
            default_value: row.default_value,
        }
    }
}

const SETTING_COLUMNS: &str =
    "SELECT id, name, `type` AS setting_type, value, default_value FROM crm_settings";

#[async_trait]
impl SettingRepository for MySqlSettingRepository {
    async fn find_all(&self) -> Result<Vec<Setting>, DomainError> {
        let rows = sqlx::query_as::<_, SettingRow>(&format!("{} ORDER BY name", SETTING_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_names(&self, names: &[&str]) -> Result<Vec<Setting>, DomainError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = QueryBuilder::<MySql>::new(SETTING_COLUMNS);
        query.push(" WHERE name IN (");
        let mut separated = query.separated(", ");
        for name in names {
            separated.push_bind(name.to_string());
        }
        separated.push_unseparated(") ORDER BY name");

        let rows = query
            .build_query_as::<SettingRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Setting>, DomainError> {
        let row = sqlx::query_as::<_, SettingRow>(&format!("{} WHERE id = ?", SETTING_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Setting>, DomainError> {
        let row = sqlx::query_as::<_, SettingRow>(&format!("{} WHERE name = ?", SETTING_COLUMNS))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, setting: &Setting) -> Result<Setting, DomainError> {
        let id = if setting.id == 0 {
            let result = sqlx::query(
                "INSERT INTO crm_settings (name, `type`, value, default_value) VALUES (?, ?, ?, ?)",
            )
            .bind(&setting.name)
            .bind(&setting.setting_type)
            .bind(&setting.value)
            .bind(&setting.default_value)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            result.last_insert_id() as i64
        } else {
            sqlx::query(
                "UPDATE crm_settings SET name = ?, `type` = ?, value = ?, default_value = ? WHERE id = ?",
            )
            .bind(&setting.name)
            .bind(&setting.setting_type)
            .bind(&setting.value)
            .bind(&setting.default_value)
            .bind(setting.id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
            setting.id
        };

        self.find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Setting", id))
    }
}
