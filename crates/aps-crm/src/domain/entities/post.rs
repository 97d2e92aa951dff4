//! WordPress posts backing the CRM datasets
//!
//! Every form or record the public site collects is a `wp_posts` row of a
//! dedicated post type, with its fields in `wp_postmeta`. The CRM adds
//! review flags per post in its own `wp_posts_settings` table.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Post types read by the CRM
pub mod post_types {
    pub const VOLUNTEER: &str = "aps_volunteer";
    pub const CAUSE: &str = "cause";
    pub const SPONSORSHIP: &str = "aps_sponsorship";
    pub const D177: &str = "aps_s177";
    pub const FORM_230: &str = "formular230";
    pub const IBAN: &str = "iban_beneficiar";
}

/// Raw post fields used by the CRM
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WpPost {
    pub id: u64,
    pub post_type: String,
    pub status: String,
    pub title: String,
    pub excerpt: String,
    pub name: String,
    pub date: NaiveDateTime,
    pub guid: String,
}

/// Post meta as key/value pairs
pub type PostMeta = BTreeMap<String, String>;

/// Review flags and Borderou number kept by the CRM per post
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PostFlags {
    pub downloaded: bool,
    pub verified: bool,
    pub corrupt: bool,
    pub nr_borderou: Option<i64>,
}

/// Partial flag update; `None` keeps the stored value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FlagsUpdate {
    pub downloaded: Option<bool>,
    pub verified: Option<bool>,
    pub corrupt: Option<bool>,
}

impl FlagsUpdate {
    pub fn is_empty(&self) -> bool {
        self.downloaded.is_none() && self.verified.is_none() && self.corrupt.is_none()
    }

    pub fn apply(&self, flags: PostFlags) -> PostFlags {
        PostFlags {
            downloaded: self.downloaded.unwrap_or(flags.downloaded),
            verified: self.verified.unwrap_or(flags.verified),
            corrupt: self.corrupt.unwrap_or(flags.corrupt),
            nr_borderou: flags.nr_borderou,
        }
    }
}

/// A post with its meta and CRM flags
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostRecord {
    pub post: WpPost,
    pub meta: PostMeta,
    pub flags: PostFlags,
}

impl PostRecord {
    /// Trimmed, non-empty meta value
    pub fn meta(&self, key: &str) -> Option<String> {
        self.meta
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    pub fn meta_number(&self, key: &str) -> Option<f64> {
        self.meta(key).and_then(|v| parse_number(&v))
    }

    pub fn meta_id(&self, key: &str) -> Option<u64> {
        self.meta(key).and_then(|v| v.parse().ok())
    }
}

/// New post inserted by the CRM
#[derive(Debug, Clone)]
pub struct NewPost {
    pub post_type: String,
    pub status: String,
    pub title: String,
    pub date: NaiveDateTime,
    pub meta: Vec<(String, String)>,
}

/// Links into the WordPress site
#[derive(Debug, Clone, Default)]
pub struct SiteLinks {
    base: String,
}

impl SiteLinks {
    pub fn new(site_url: &str) -> Self {
        Self {
            base: site_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn admin_edit(&self, post_id: u64) -> String {
        format!("{}/wp-admin/post.php?post={}&action=edit", self.base, post_id)
    }

    pub fn upload(&self, attached_file: &str) -> String {
        format!(
            "{}/wp-content/uploads/{}",
            self.base,
            attached_file.trim_start_matches('/')
        )
    }
}

/// Lenient number parsing for amounts typed into forms ("1.500,50", "2000 lei")
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (None, Some(_)) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    normalized.parse().ok()
}
