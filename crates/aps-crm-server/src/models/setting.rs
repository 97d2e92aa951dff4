//! Setting DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aps_crm::Setting;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SettingResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub setting_type: String,
    pub value: Option<String>,
    pub default_value: Option<String>,
}

impl From<Setting> for SettingResponse {
    fn from(s: Setting) -> Self {
        Self {
            id: s.id,
            name: s.name,
            setting_type: s.setting_type,
            value: s.value,
            default_value: s.default_value,
        }
    }
}

/// New value; strings, numbers and booleans are accepted
#[derive(Debug, Deserialize, ToSchema)]
pub struct SettingValueRequest {
    #[schema(value_type = Option<String>)]
    pub value: Option<serde_json::Value>,
}

impl SettingValueRequest {
    /// The value as text; `null` and objects count as missing
    pub fn text(&self) -> Option<String> {
        match &self.value {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequireActiveResponse {
    pub require_active_for_login: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequireActiveRequest {
    pub require_active_for_login: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_as_text() {
        let parse = |body: &str| serde_json::from_str::<SettingValueRequest>(body).unwrap().text();
        assert_eq!(parse(r#"{"value":"da"}"#), Some("da".into()));
        assert_eq!(parse(r#"{"value":42}"#), Some("42".into()));
        assert_eq!(parse(r#"{"value":true}"#), Some("true".into()));
        assert_eq!(parse(r#"{"value":null}"#), None);
        assert_eq!(parse(r#"{}"#), None);
    }

    #[test]
    fn test_setting_type_field_name() {
        let json = serde_json::to_value(SettingResponse {
            id: 1,
            name: "xml_an".into(),
            setting_type: "integer".into(),
            value: None,
            default_value: Some("2025".into()),
        })
        .unwrap();
        assert_eq!(json["type"], "integer");
        assert_eq!(json["defaultValue"], "2025");
    }
}
