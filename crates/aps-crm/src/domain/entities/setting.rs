//! Setting - typed key/value configuration editable from the CRM

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SettingType;

/// Well-known setting names
pub mod setting_keys {
    pub const XMLNS: &str = "xmlns";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const XML_LUNA: &str = "xml_luna";
    pub const XML_AN: &str = "xml_an";
    pub const XML_NUME: &str = "xml_nume";
    pub const XML_CUI: &str = "xml_cui";
    pub const XML_CIF: &str = "xml_cif";
    pub const FORM230_VIZIBILITATE: &str = "form230_vizibilitate";
    pub const REQUIRE_ACTIVE_FOR_LOGIN: &str = "require_active_for_login";

    /// Settings shown on the Borderou XML screen
    pub const XML_KEYS: &[&str] = &[
        XMLNS,
        SCHEMA_LOCATION,
        XML_LUNA,
        XML_AN,
        XML_NUME,
        XML_CUI,
        XML_CIF,
        FORM230_VIZIBILITATE,
    ];
}

/// `crm_settings` row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Setting {
    pub id: i64,
    pub name: String,
    pub setting_type: String,
    pub value: Option<String>,
    pub default_value: Option<String>,
}

impl Setting {
    pub fn new(name: &str, setting_type: SettingType, value: &str, default_value: &str) -> Self {
        Self {
            id: 0,
            name: name.to_string(),
            setting_type: setting_type.to_string(),
            value: Some(value.to_string()),
            default_value: Some(default_value.to_string()),
        }
    }

    pub fn kind(&self) -> SettingType {
        SettingType::from_tag(&self.setting_type)
    }

    /// Value, else default value; blanks count as missing
    pub fn effective_value(&self) -> Option<&str> {
        [self.value.as_deref(), self.default_value.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
    }

    /// "true" (any case) or "1"
    pub fn is_enabled(&self) -> bool {
        self.value
            .as_deref()
            .map(str::trim)
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1")
    }
}

/// Effective value of a named setting within a loaded set
pub fn effective<'a>(settings: &'a [Setting], name: &str) -> Option<&'a str> {
    settings
        .iter()
        .find(|s| s.name == name)
        .and_then(Setting::effective_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setting(value: Option<&str>, default_value: Option<&str>) -> Setting {
        Setting {
            id: 1,
            name: "xml_nume".into(),
            setting_type: "string".into(),
            value: value.map(str::to_string),
            default_value: default_value.map(str::to_string),
        }
    }

    #[test]
    fn test_effective_value_skips_blanks() {
        assert_eq!(setting(Some("A"), Some("B")).effective_value(), Some("A"));
        assert_eq!(setting(Some("  "), Some("B")).effective_value(), Some("B"));
        assert_eq!(setting(None, Some("")).effective_value(), None);
    }

    #[test]
    fn test_is_enabled() {
        assert!(setting(Some("TRUE"), None).is_enabled());
        assert!(setting(Some("1"), None).is_enabled());
        assert!(!setting(Some("da"), None).is_enabled());
        assert!(!setting(None, Some("true")).is_enabled());
    }
}
