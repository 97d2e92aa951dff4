//! Volunteer DTOs

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use aps_crm::{SiteLinks, Volunteer};

/// Volunteer row in listings
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerResponse {
    pub id: u64,
    pub post_name: String,
    pub title: String,
    pub date: NaiveDateTime,
    /// "Last First"
    pub name: String,
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
}

impl From<Volunteer> for VolunteerResponse {
    fn from(v: Volunteer) -> Self {
        Self {
            name: v.display_name(),
            id: v.id,
            post_name: v.post_name,
            title: v.title,
            date: v.date,
            first_name: v.first_name,
            last_name: v.last_name,
            email: v.email,
            phone: v.phone,
            age: v.age,
            ocupation: v.ocupation,
            domain: v.domain,
            availability: v.availability,
            motivation: v.motivation,
            experience: v.experience,
        }
    }
}

/// Volunteer with every submitted field
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerDetailResponse {
    #[serde(flatten)]
    pub volunteer: VolunteerResponse,
    pub gdpr: bool,
    pub source: Option<String>,
    /// Public link of the post
    pub link: String,
    pub admin_edit: String,
    pub meta: BTreeMap<String, String>,
}

impl VolunteerDetailResponse {
    pub fn new(mut v: Volunteer, links: &SiteLinks) -> Self {
        let admin_edit = links.admin_edit(v.id);
        let meta = std::mem::take(&mut v.meta);
        let gdpr = v.gdpr;
        let source = v.source.take();
        let link = std::mem::take(&mut v.link);
        Self {
            volunteer: v.into(),
            gdpr,
            source,
            link,
            admin_edit,
            meta,
        }
    }
}
