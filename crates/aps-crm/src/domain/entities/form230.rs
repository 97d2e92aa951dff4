//! Formular 230 - redirection of 3.5% of income tax to the association

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::post::{PostFlags, PostRecord, SiteLinks};
use crate::domain::services::listing::{Listable, SortKey};

/// Taxpayer address as typed into the form
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub street: Option<String>,
    pub number: Option<String>,
    pub block: Option<String>,
    pub staircase: Option<String>,
    pub floor: Option<String>,
    pub apartment: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

/// Formular 230 submission (`formular230` post)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Form230 {
    pub id: u64,
    pub submitted_at: NaiveDateTime,
    pub year: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub initial: Option<String>,
    pub cnp: Option<String>,
    pub address: Address,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub iban: Option<String>,
    /// Redirection valid for two years instead of one
    pub two_years: bool,
    pub accepts_contact: bool,
    pub pdf_url: Option<String>,
    pub admin_edit: String,
    pub flags: PostFlags,
}

impl Form230 {
    pub fn from_record(record: &PostRecord, links: &SiteLinks) -> Self {
        Self {
            id: record.post.id,
            submitted_at: record.post.date,
            year: record.meta("anul"),
            first_name: record.meta("nume"),
            last_name: record.meta("prenume"),
            initial: record.meta("initiala"),
            cnp: record.meta("cnp"),
            address: Address {
                street: record.meta("strada"),
                number: record.meta("numar"),
                block: record.meta("bloc"),
                staircase: record.meta("scara"),
                floor: record.meta("etaj"),
                apartment: record.meta("apartament"),
                county: record.meta("judet"),
                city: record.meta("localitate"),
                postal_code: record.meta("cod_postal"),
            },
            email: record.meta("email"),
            phone: record.meta("telefon"),
            fax: record.meta("fax"),
            iban: record.meta("iban"),
            two_years: record.meta("distribuire2ani").as_deref() == Some("1"),
            accepts_contact: record.meta("acordComunicare").as_deref() == Some("1"),
            pdf_url: record.meta("_pdf_url"),
            admin_edit: links.admin_edit(record.post.id),
            flags: record.flags,
        }
    }

    pub fn period_label(&self) -> &'static str {
        if self.two_years {
            "2 ani"
        } else {
            "1 an"
        }
    }

    pub fn beneficiary(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default()
        )
        .trim()
        .to_string()
    }

    pub fn year_number(&self) -> Option<i32> {
        self.year.as_deref().and_then(|y| y.trim().parse().ok())
    }

    /// Number of years the redirection stays valid
    pub fn duration_years(&self) -> i32 {
        if self.two_years {
            2
        } else {
            1
        }
    }
}

impl Listable for Form230 {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [
            self.year.clone(),
            self.iban.clone(),
            self.email.clone(),
            self.first_name.clone(),
            self.last_name.clone(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "year" => SortKey::Number(self.year_number().map(f64::from)),
            "submittedAt" => SortKey::Date(Some(self.submitted_at)),
            "period" => SortKey::Bool(self.two_years),
            "iban" => SortKey::opt_text(self.iban.as_deref()),
            "lastName" => SortKey::opt_text(self.last_name.as_deref()),
            "email" => SortKey::opt_text(self.email.as_deref()),
            "acord" => SortKey::Bool(self.accepts_contact),
            "downloaded" => SortKey::Bool(self.flags.downloaded),
            "verified" => SortKey::Bool(self.flags.verified),
            "corrupt" => SortKey::Bool(self.flags.corrupt),
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::post::WpPost;
    use chrono::NaiveDate;

    fn form_record(id: u64, meta: &[(&str, &str)]) -> PostRecord {
        PostRecord {
            post: WpPost {
                id,
                post_type: "formular230".into(),
                status: "publish".into(),
                title: format!("Formular {}", id),
                excerpt: String::new(),
                name: format!("formular-{}", id),
                date: NaiveDate::from_ymd_opt(2025, 4, 2)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
                guid: String::new(),
            },
            meta: meta
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            flags: PostFlags::default(),
        }
    }

    #[test]
    fn test_from_record() {
        let rec = form_record(
            3,
            &[
                ("anul", "2024"),
                ("nume", "Ana"),
                ("prenume", "Pop"),
                ("distribuire2ani", "1"),
                ("acordComunicare", "0"),
                ("judet", "Cluj"),
            ],
        );
        let f = Form230::from_record(&rec, &SiteLinks::new("https://aps.ro"));
        assert_eq!(f.beneficiary(), "Ana Pop");
        assert_eq!(f.period_label(), "2 ani");
        assert_eq!(f.duration_years(), 2);
        assert!(!f.accepts_contact);
        assert_eq!(f.year_number(), Some(2024));
        assert_eq!(f.address.county.as_deref(), Some("Cluj"));
    }

    #[test]
    fn test_defaults_to_one_year() {
        let f = Form230::from_record(&form_record(4, &[]), &SiteLinks::default());
        assert_eq!(f.period_label(), "1 an");
        assert_eq!(f.beneficiary(), "");
        assert_eq!(f.year_number(), None);
    }
}
