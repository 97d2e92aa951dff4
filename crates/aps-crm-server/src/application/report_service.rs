//! Report Application Service (Use Case)
//!
//! CSV exports of the post-backed datasets.

use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;

use aps_crm::{
    BorderouRepository, Cause, D177Form, DomainError, Form230, IbanBeneficiary,
    OfflinePaymentRepository, PostRepository, SettingRepository, Sponsorship, Volunteer,
};

use super::{
    CauseService, D177Service, F230Service, IbanService, SponsorshipService, VolunteerService,
};
use crate::services::csv_export::to_csv;

/// Exportable dataset, named as in the `dataset` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Volunteers,
    Sponsorships,
    Ibans,
    Forms230,
    D177,
    Causes,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Volunteers => "voluntari",
            Dataset::Sponsorships => "sponsorizare",
            Dataset::Ibans => "iban",
            Dataset::Forms230 => "f230",
            Dataset::D177 => "d177",
            Dataset::Causes => "cause",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }
}

impl FromStr for Dataset {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "voluntari" => Ok(Dataset::Volunteers),
            "sponsorizare" => Ok(Dataset::Sponsorships),
            "iban" => Ok(Dataset::Ibans),
            "f230" => Ok(Dataset::Forms230),
            "d177" => Ok(Dataset::D177),
            "cause" => Ok(Dataset::Causes),
            other => Err(DomainError::validation(format!(
                "Set de date necunoscut: {} (voluntari, sponsorizare, iban, f230, d177, cause)",
                other
            ))),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VolunteerRow {
    id: u64,
    date: NaiveDateTime,
    last_name: Option<String>,
    first_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    age: Option<i64>,
    ocupation: Option<String>,
    domain: Option<String>,
    availability: Option<String>,
    motivation: Option<String>,
    experience: Option<String>,
    gdpr: bool,
    source: Option<String>,
    link: String,
}

impl From<Volunteer> for VolunteerRow {
    fn from(v: Volunteer) -> Self {
        Self {
            id: v.id,
            date: v.date,
            last_name: v.last_name,
            first_name: v.first_name,
            email: v.email,
            phone: v.phone,
            age: v.age,
            ocupation: v.ocupation,
            domain: v.domain,
            availability: v.availability,
            motivation: v.motivation,
            experience: v.experience,
            gdpr: v.gdpr,
            source: v.source,
            link: v.link,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsorshipRow {
    id: u64,
    date: NaiveDateTime,
    company_name: String,
    fiscal_code: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    iban: Option<String>,
    amount: Option<String>,
    contract_date: Option<String>,
    doc_url: Option<String>,
    downloaded: bool,
    verified: bool,
    corrupt: bool,
}

impl From<Sponsorship> for SponsorshipRow {
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
            downloaded: s.flags.downloaded,
            verified: s.flags.verified,
            corrupt: s.flags.corrupt,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct D177Row {
    id: u64,
    date: NaiveDateTime,
    company_name: String,
    fiscal_code: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    amount: Option<String>,
    contract_date: Option<String>,
    doc_url: Option<String>,
    downloaded: bool,
    verified: bool,
    corrupt: bool,
}

impl From<D177Form> for D177Row {
    fn from(f: D177Form) -> Self {
        Self {
            id: f.id,
            date: f.date,
            company_name: f.company_name,
            fiscal_code: f.fiscal_code,
            email: f.email,
            phone: f.phone,
            amount: f.amount,
            contract_date: f.contract_date,
            doc_url: f.doc_url,
            downloaded: f.flags.downloaded,
            verified: f.flags.verified,
            corrupt: f.flags.corrupt,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct F230Row {
    id: u64,
    an_fiscal: Option<String>,
    submitted_at: NaiveDateTime,
    period: &'static str,
    iban: Option<String>,
    beneficiary: String,
    email_contrib: Option<String>,
    acord_email: &'static str,
    nr_borderou: Option<i64>,
    downloaded: bool,
    verified: bool,
    corrupt: bool,
    pdf_url: Option<String>,
}

impl From<Form230> for F230Row {
    fn from(f: Form230) -> Self {
        Self {
            id: f.id,
            period: f.period_label(),
            beneficiary: f.beneficiary(),
            acord_email: if f.accepts_contact { "Da" } else { "Nu" },
            an_fiscal: f.year,
            submitted_at: f.submitted_at,
            iban: f.iban,
            email_contrib: f.email,
            nr_borderou: f.flags.nr_borderou,
            downloaded: f.flags.downloaded,
            verified: f.flags.verified,
            corrupt: f.flags.corrupt,
            pdf_url: f.pdf_url,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IbanRow {
    id: u64,
    name: Option<String>,
    iban: Option<String>,
    added_at: NaiveDateTime,
}

impl From<IbanBeneficiary> for IbanRow {
    fn from(b: IbanBeneficiary) -> Self {
        Self {
            id: b.id,
            name: b.name,
            iban: b.iban,
            added_at: b.added_at,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CauseRow {
    id: u64,
    date: NaiveDateTime,
    title: String,
    excerpt: String,
    goal: Option<f64>,
    donors: Option<i64>,
    donated: Option<f64>,
    guid: String,
}

impl From<Cause> for CauseRow {
    fn from(c: Cause) -> Self {
        Self {
            id: c.id,
            date: c.date,
            title: c.title,
            excerpt: c.excerpt,
            goal: c.goal,
            donors: c.donors,
            donated: c.donated,
            guid: c.guid,
        }
    }
}

fn rows<T, R: From<T> + Serialize>(items: Vec<T>) -> Result<Vec<u8>, DomainError> {
    let rows: Vec<R> = items.into_iter().map(R::from).collect();
    to_csv(&rows)
}

/// Application service for CSV reports
pub struct ReportService<P, S, B, O>
where
    P: PostRepository,
    S: SettingRepository,
    B: BorderouRepository,
    O: OfflinePaymentRepository,
{
    volunteers: Arc<VolunteerService<P>>,
    sponsorships: Arc<SponsorshipService<P>>,
    d177: Arc<D177Service<P>>,
    forms: Arc<F230Service<P, S, B>>,
    ibans: Arc<IbanService<P>>,
    causes: Arc<CauseService<P, O>>,
}

impl<P, S, B, O> ReportService<P, S, B, O>
where
    P: PostRepository,
    S: SettingRepository,
    B: BorderouRepository,
    O: OfflinePaymentRepository,
{
    pub fn new(
        volunteers: Arc<VolunteerService<P>>,
        sponsorships: Arc<SponsorshipService<P>>,
        d177: Arc<D177Service<P>>,
        forms: Arc<F230Service<P, S, B>>,
        ibans: Arc<IbanService<P>>,
        causes: Arc<CauseService<P, O>>,
    ) -> Self {
        Self {
            volunteers,
            sponsorships,
            d177,
            forms,
            ibans,
            causes,
        }
    }

    /// CSV body of a dataset; an empty dataset yields an empty body
    pub async fn export(&self, dataset: Dataset) -> Result<Vec<u8>, DomainError> {
        let body = match dataset {
            Dataset::Volunteers => rows::<_, VolunteerRow>(self.volunteers.load_all().await?)?,
            Dataset::Sponsorships => {
                rows::<_, SponsorshipRow>(self.sponsorships.load_all().await?)?
            }
            Dataset::D177 => rows::<_, D177Row>(self.d177.load_all().await?)?,
            Dataset::Forms230 => rows::<_, F230Row>(self.forms.load_all().await?)?,
            Dataset::Ibans => rows::<_, IbanRow>(self.ibans.load_all().await?)?,
            Dataset::Causes => rows::<_, CauseRow>(self.causes.load_all().await?)?,
        };

        tracing::info!("Exported {} ({} bytes)", dataset.name(), body.len());
        Ok(body)
    }
}
