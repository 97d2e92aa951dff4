//! SettingType - Declared type of a CRM setting value

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Type tag stored next to each setting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    #[default]
    String,
    Integer,
    Boolean,
    Date,
}

impl SettingType {
    /// Unknown type tags fall back to plain strings
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "integer" | "int" | "number" => SettingType::Integer,
            "boolean" | "bool" => SettingType::Boolean,
            "date" => SettingType::Date,
            _ => SettingType::String,
        }
    }

    /// Normalise a raw value for storage
    pub fn coerce(&self, raw: &str) -> Result<String, DomainError> {
        match self {
            SettingType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(|n| n.to_string())
                .map_err(|_| DomainError::validation(format!("Valoare invalidă pentru tipul: {}", self))),
            SettingType::Boolean => {
                let truthy = matches!(
                    raw.trim().to_lowercase().as_str(),
                    "true" | "1" | "yes" | "da"
                );
                Ok(truthy.to_string())
            }
            SettingType::Date => Ok(raw.trim().to_string()),
            SettingType::String => Ok(raw.to_string()),
        }
    }
}

impl std::fmt::Display for SettingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingType::String => write!(f, "string"),
            SettingType::Integer => write!(f, "integer"),
            SettingType::Boolean => write!(f, "boolean"),
            SettingType::Date => write!(f, "date"),
        }
    }
}
