//! KPI - dashboard figures

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VolunteerKpi {
    pub total: u64,
    pub avg_age: Option<f64>,
    pub avg_disponibility_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct D177Kpi {
    pub companies: u64,
    pub total_amount: f64,
    pub last_month_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SponsorshipKpi {
    pub total_amount: f64,
    pub last_month_amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Form230Kpi {
    pub total_1y: u64,
    pub total_2y: u64,
    pub expiring_this_year: u64,
    pub this_month: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IbanKpi {
    pub total: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CauseKpi {
    pub total: u64,
    pub reached_goal: u64,
    pub avg_progress_pct: Option<f64>,
    pub next_campaign_date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PeopleKpi {
    /// WordPress site accounts
    pub users: u64,
    /// CRM accounts
    pub admins: u64,
}

/// All dashboard figures
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Kpi {
    pub volunteers: VolunteerKpi,
    pub f177: D177Kpi,
    pub sponsorship: SponsorshipKpi,
    pub f230: Form230Kpi,
    pub iban: IbanKpi,
    pub causes: CauseKpi,
    pub persoane: PeopleKpi,
}
