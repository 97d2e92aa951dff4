//! Sponsorship contract and D177 forms submitted by companies

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::post::{parse_number, PostFlags, PostRecord, SiteLinks};
use crate::domain::services::listing::{Listable, SortKey};
use crate::domain::services::php_serialized::{parse_assoc, PhpArray};

/// Attachment post id -> `_wp_attached_file`
pub type AttachedFiles = HashMap<u64, String>;

fn attachment_url(
    record: &PostRecord,
    key: &str,
    files: &AttachedFiles,
    links: &SiteLinks,
) -> Option<String> {
    record
        .meta_id(key)
        .and_then(|id| files.get(&id))
        .map(|file| links.upload(file))
}

fn section(record: &PostRecord, key: &str) -> PhpArray {
    record.meta(key).map(|raw| parse_assoc(&raw)).unwrap_or_default()
}

fn field(section: &PhpArray, key: &str) -> Option<String> {
    section
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Sponsorship contract (`aps_sponsorship` post)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sponsorship {
    pub id: u64,
    pub date: NaiveDateTime,
    pub company_name: String,
    pub fiscal_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub iban: Option<String>,
    pub amount: Option<String>,
    pub contract_date: Option<String>,
    pub doc_url: Option<String>,
    pub json_url: Option<String>,
    pub signature_url: Option<String>,
    pub detail: String,
    pub admin_edit: String,
    pub flags: PostFlags,
}

impl Sponsorship {
    pub fn from_record(record: &PostRecord, files: &AttachedFiles, links: &SiteLinks) -> Self {
        let firma = section(record, "_aps_firma");
        let reprez = section(record, "_aps_reprez");
        let banca = section(record, "_aps_banca");
        let contract = section(record, "_aps_contract");
        Self {
            id: record.post.id,
            date: record.post.date,
            company_name: field(&firma, "denumire").unwrap_or_else(|| record.post.title.clone()),
            fiscal_code: field(&firma, "cui"),
            email: field(&reprez, "email"),
            phone: field(&reprez, "tel"),
            iban: field(&banca, "iban"),
            amount: field(&contract, "suma"),
            contract_date: field(&contract, "data"),
            doc_url: attachment_url(record, "_aps_doc_id", files, links),
            json_url: attachment_url(record, "_aps_json_id", files, links),
            signature_url: attachment_url(record, "_aps_signature_id", files, links),
            detail: record.post.guid.clone(),
            admin_edit: links.admin_edit(record.post.id),
            flags: record.flags,
        }
    }

    pub fn amount_value(&self) -> Option<f64> {
        self.amount.as_deref().and_then(parse_number)
    }
}

impl Listable for Sponsorship {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [
            Some(self.company_name.clone()),
            self.fiscal_code.clone(),
            self.email.clone(),
            self.phone.clone(),
            self.iban.clone(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "date" => SortKey::Date(Some(self.date)),
            "companyName" => SortKey::text(&self.company_name),
            "fiscalCode" => SortKey::opt_text(self.fiscal_code.as_deref()),
            "email" => SortKey::opt_text(self.email.as_deref()),
            "phone" => SortKey::opt_text(self.phone.as_deref()),
            "iban" => SortKey::opt_text(self.iban.as_deref()),
            "amountNum" => SortKey::Number(self.amount_value()),
            "contractDate" => SortKey::opt_text(self.contract_date.as_deref()),
            "downloaded" => SortKey::Bool(self.flags.downloaded),
            "verified" => SortKey::Bool(self.flags.verified),
            "corrupt" => SortKey::Bool(self.flags.corrupt),
            _ => return None,
        })
    }
}

/// D177 sponsorship declaration (`aps_s177` post), list view
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct D177Form {
    pub id: u64,
    pub date: NaiveDateTime,
    pub company_name: String,
    pub fiscal_code: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<String>,
    pub contract_date: Option<String>,
    pub doc_url: Option<String>,
    pub admin_edit: String,
    pub flags: PostFlags,
}

/// D177 declaration with every section expanded
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct D177Detail {
    pub id: u64,
    pub date: NaiveDateTime,
    pub title: String,
    pub firma: PhpArray,
    pub corespondenta: PhpArray,
    pub reprezentant: PhpArray,
    pub contract: PhpArray,
    pub doc_url: Option<String>,
    pub sig_url: Option<String>,
    pub doc_html: Option<String>,
    pub admin_edit: String,
    pub flags: PostFlags,
}

impl D177Form {
    pub fn from_record(record: &PostRecord, files: &AttachedFiles, links: &SiteLinks) -> Self {
        let firma = section(record, "_aps177_firma");
        let reprez = section(record, "_aps177_reprez");
        let contract = section(record, "_aps177_contract");
        Self {
            id: record.post.id,
            date: record.post.date,
            company_name: field(&firma, "denumire").unwrap_or_else(|| record.post.title.clone()),
            fiscal_code: field(&firma, "cui"),
            email: field(&reprez, "email"),
            phone: field(&reprez, "tel"),
            amount: field(&contract, "suma"),
            contract_date: field(&contract, "data"),
            doc_url: attachment_url(record, "_aps177_doc_id", files, links),
            admin_edit: links.admin_edit(record.post.id),
            flags: record.flags,
        }
    }

    pub fn amount_value(&self) -> Option<f64> {
        self.amount.as_deref().and_then(parse_number)
    }
}

impl D177Detail {
    pub fn from_record(record: &PostRecord, files: &AttachedFiles, links: &SiteLinks) -> Self {
        Self {
            id: record.post.id,
            date: record.post.date,
            title: record.post.title.clone(),
            firma: section(record, "_aps177_firma"),
            corespondenta: section(record, "_aps177_coresp"),
            reprezentant: section(record, "_aps177_reprez"),
            contract: section(record, "_aps177_contract"),
            doc_url: attachment_url(record, "_aps177_doc_id", files, links),
            sig_url: attachment_url(record, "_aps177_signature_id", files, links),
            doc_html: record.meta("_aps177_doc_html"),
            admin_edit: links.admin_edit(record.post.id),
            flags: record.flags,
        }
    }
}

impl Listable for D177Form {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [
            Some(self.company_name.clone()),
            self.fiscal_code.clone(),
            self.email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "postDateIso" => SortKey::Date(Some(self.date)),
            "companyName" => SortKey::text(&self.company_name),
            "fiscalCode" => SortKey::opt_text(self.fiscal_code.as_deref()),
            "email" => SortKey::opt_text(self.email.as_deref()),
            "amountNum" => SortKey::Number(self.amount_value()),
            "downloaded" => SortKey::Bool(self.flags.downloaded),
            "verified" => SortKey::Bool(self.flags.verified),
            "corrupt" => SortKey::Bool(self.flags.corrupt),
            _ => return None,
        })
    }
}

/// Attachment post ids referenced by a record (documents, signatures, JSON exports)
pub fn attachment_ids(record: &PostRecord) -> Vec<u64> {
    [
        "_aps_doc_id",
        "_aps_json_id",
        "_aps_signature_id",
        "_aps177_doc_id",
        "_aps177_signature_id",
    ]
    .iter()
    .filter_map(|key| record.meta_id(key))
    .collect()
}
