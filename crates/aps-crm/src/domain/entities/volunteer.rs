//! Volunteer - sign-up form from the public site

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::post::{PostMeta, PostRecord};
use crate::domain::services::listing::{Listable, SortKey};

/// Volunteer application (`aps_volunteer` post)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Volunteer {
    pub id: u64,
    pub post_name: String,
    pub title: String,
    pub date: NaiveDateTime,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i64>,
    pub ocupation: Option<String>,
    pub domain: Option<String>,
    pub availability: Option<String>,
    pub motivation: Option<String>,
    pub experience: Option<String>,
    pub gdpr: bool,
    pub source: Option<String>,
    pub link: String,
    pub meta: PostMeta,
}

impl Volunteer {
    pub fn from_record(record: PostRecord) -> Self {
        let age = record
            .meta("_vol_varsta")
            .and_then(|v| v.trim().parse::<i64>().ok());
        let gdpr = record
            .meta("_vol_gdpr")
            .is_some_and(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "da" | "yes" | "on"));
        Self {
            id: record.post.id,
            post_name: record.post.name.clone(),
            title: record.post.title.clone(),
            date: record.post.date,
            first_name: record.meta("_vol_prenume"),
            last_name: record.meta("_vol_nume"),
            email: record.meta("_vol_email"),
            phone: record.meta("_vol_telefon"),
            age,
            ocupation: record.meta("_vol_ocupatie"),
            domain: record.meta("_vol_domeniu"),
            availability: record.meta("_vol_disponibilitate"),
            motivation: record.meta("_vol_motivatie"),
            experience: record.meta("_vol_experienta"),
            gdpr,
            source: record.meta("_vol_source"),
            link: record.post.guid.clone(),
            meta: record.meta,
        }
    }

    /// "Last First", as shown in the volunteer list
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.last_name.as_deref().unwrap_or_default(),
            self.first_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }
}

impl Listable for Volunteer {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [
            Some(self.display_name()),
            self.email.clone(),
            self.phone.clone(),
            self.domain.clone(),
            self.ocupation.clone(),
            Some(self.title.clone()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "postName" => SortKey::text(&self.post_name),
            "date" => SortKey::Date(Some(self.date)),
            "name" => SortKey::text(&self.display_name()),
            "email" => SortKey::opt_text(self.email.as_deref()),
            "domain" => SortKey::opt_text(self.domain.as_deref()),
            "ocupation" => SortKey::opt_text(self.ocupation.as_deref()),
            "motivation" => SortKey::opt_text(self.motivation.as_deref()),
            "experience" => SortKey::opt_text(self.experience.as_deref()),
            "age" => SortKey::Number(self.age.map(|a| a as f64)),
            _ => return None,
        })
    }
}
