//! Form DTOs - sponsorship contracts, D177, Formular 230 and Borderou

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aps_crm::{Address, D177Detail, D177Form, FlagsUpdate, Form230, PostFlags, Sponsorship};

use crate::error::ApiError;

/// Review flag update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FlagsRequest {
    pub downloaded: Option<bool>,
    pub verified: Option<bool>,
    pub corrupt: Option<bool>,
}

impl From<FlagsRequest> for FlagsUpdate {
    fn from(r: FlagsRequest) -> Self {
        FlagsUpdate {
            downloaded: r.downloaded,
            verified: r.verified,
            corrupt: r.corrupt,
        }
    }
}

/// Review flags of a form
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagsResponse {
    pub downloaded: bool,
    pub verified: bool,
    pub corrupt: bool,
}

impl From<PostFlags> for FlagsResponse {
    fn from(f: PostFlags) -> Self {
        Self {
            downloaded: f.downloaded,
            verified: f.verified,
            corrupt: f.corrupt,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SponsorshipResponse {
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
    #[serde(flatten)]
    pub flags: FlagsResponse,
}

impl From<Sponsorship> for SponsorshipResponse {
    fn from(s: Sponsorship) -> Self {
        Self {
            id: s.id,
            date: s.date,
            company_name: s.company_name,
            fiscal_code: s.fiscal_code,
            email: s.email,
            phone: s.phone,
            iban: s.iban,
            amount: s.amount,
            contract_date: s.contract_date,
            doc_url: s.doc_url,
            json_url: s.json_url,
            signature_url: s.signature_url,
            detail: s.detail,
            admin_edit: s.admin_edit,
            flags: s.flags.into(),
        }
    }
}

/// D177 row in listings
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct D177Response {
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
    #[serde(flatten)]
    pub flags: FlagsResponse,
}

impl From<D177Form> for D177Response {
    fn from(d: D177Form) -> Self {
        Self {
            id: d.id,
            date: d.date,
            company_name: d.company_name,
            fiscal_code: d.fiscal_code,
            email: d.email,
            phone: d.phone,
            amount: d.amount,
            contract_date: d.contract_date,
            doc_url: d.doc_url,
            admin_edit: d.admin_edit,
            flags: d.flags.into(),
        }
    }
}

/// D177 declaration with its raw sections
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct D177DetailResponse {
    pub id: u64,
    pub date: NaiveDateTime,
    pub title: String,
    pub firma: BTreeMap<String, String>,
    pub corespondenta: BTreeMap<String, String>,
    pub reprezentant: BTreeMap<String, String>,
    pub contract: BTreeMap<String, String>,
    pub doc_url: Option<String>,
    pub sig_url: Option<String>,
    pub doc_html: Option<String>,
    pub admin_edit: String,
    #[serde(flatten)]
    pub flags: FlagsResponse,
}

impl From<D177Detail> for D177DetailResponse {
    fn from(d: D177Detail) -> Self {
        Self {
            id: d.id,
            date: d.date,
            title: d.title,
            firma: d.firma,
            corespondenta: d.corespondenta,
            reprezentant: d.reprezentant,
            contract: d.contract,
            doc_url: d.doc_url,
            sig_url: d.sig_url,
            doc_html: d.doc_html,
            admin_edit: d.admin_edit,
            flags: d.flags.into(),
        }
    }
}

/// Formular 230 row in listings
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct F230Response {
    pub id: u64,
    pub year: Option<String>,
    pub submitted_at: NaiveDateTime,
    /// "1 an" or "2 ani"
    pub period: String,
    pub iban: Option<String>,
    pub beneficiary: String,
    pub email_contrib: Option<String>,
    pub nr_borderou: Option<i64>,
    #[serde(flatten)]
    pub flags: FlagsResponse,
    /// "Da" or "Nu"
    pub acord_date: String,
    pub pdf_url: Option<String>,
    /// Admin edit link
    pub detail: String,
}

fn yes_no(value: bool) -> String {
    if value { "Da" } else { "Nu" }.to_string()
}

impl From<Form230> for F230Response {
    fn from(f: Form230) -> Self {
        Self {
            period: f.period_label().to_string(),
            beneficiary: f.beneficiary(),
            acord_date: yes_no(f.accepts_contact),
            id: f.id,
            year: f.year,
            submitted_at: f.submitted_at,
            iban: f.iban,
            email_contrib: f.email,
            nr_borderou: f.flags.nr_borderou,
            flags: f.flags.into(),
            pdf_url: f.pdf_url,
            detail: f.admin_edit,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
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

impl From<Address> for AddressResponse {
    fn from(a: Address) -> Self {
        Self {
            street: a.street,
            number: a.number,
            block: a.block,
            staircase: a.staircase,
            floor: a.floor,
            apartment: a.apartment,
            county: a.county,
            city: a.city,
            postal_code: a.postal_code,
        }
    }
}

/// Formular 230 with the taxpayer's full data
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct F230DetailResponse {
    pub id: u64,
    pub year: Option<String>,
    pub submitted_at: NaiveDateTime,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub initial: Option<String>,
    pub cnp: Option<String>,
    pub address: AddressResponse,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub iban: Option<String>,
    pub period: String,
    pub two_years: bool,
    pub accepts_contact: bool,
    pub pdf_url: Option<String>,
    pub admin_edit: String,
    pub nr_borderou: Option<i64>,
    #[serde(flatten)]
    pub flags: FlagsResponse,
}

impl From<Form230> for F230DetailResponse {
    fn from(f: Form230) -> Self {
        Self {
            period: f.period_label().to_string(),
            id: f.id,
            year: f.year,
            submitted_at: f.submitted_at,
            first_name: f.first_name,
            last_name: f.last_name,
            initial: f.initial,
            cnp: f.cnp,
            address: f.address.into(),
            email: f.email,
            phone: f.phone,
            fax: f.fax,
            iban: f.iban,
            two_years: f.two_years,
            accepts_contact: f.accepts_contact,
            pdf_url: f.pdf_url,
            admin_edit: f.admin_edit,
            nr_borderou: f.flags.nr_borderou,
            flags: f.flags.into(),
        }
    }
}

/// Borderou 230 generation request
#[derive(Debug, Deserialize, ToSchema)]
pub struct BorderouRequest {
    #[serde(default)]
    pub ids: Vec<u64>,
    /// YYYY-MM-DD, defaults to today
    pub date: Option<String>,
}

impl BorderouRequest {
    pub fn date_or(&self, today: NaiveDate) -> Result<NaiveDate, ApiError> {
        match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ApiError::bad_request(format!("Data borderoului este invalidă: {}", raw))
            }),
            None => Ok(today),
        }
    }
}
