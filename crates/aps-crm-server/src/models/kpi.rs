//! Dashboard KPI DTOs

use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use aps_crm::Kpi;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerKpiResponse {
    pub total: u64,
    pub avg_age: Option<f64>,
    pub avg_disponibility_hours: Option<f64>,
}

/// Totals of contract amounts, in lei
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmountKpiResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<u64>,
    pub total_amount: f64,
    pub last_month_amount: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct F230KpiResponse {
    #[serde(rename = "total1y")]
    pub total_1y: u64,
    #[serde(rename = "total2y")]
    pub total_2y: u64,
    pub expiring_this_year: u64,
    pub this_month: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IbanKpiResponse {
    pub total: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CauseKpiResponse {
    pub total: u64,
    pub reached_goal: u64,
    pub avg_progress_pct: Option<f64>,
    pub next_campaign_date: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PeopleKpiResponse {
    /// WordPress site accounts
    pub users: u64,
    /// CRM accounts
    pub admins: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KpiResponse {
    pub volunteers: VolunteerKpiResponse,
    pub f177: AmountKpiResponse,
    pub sponsorship: AmountKpiResponse,
    pub f230: F230KpiResponse,
    pub iban: IbanKpiResponse,
    pub causes: CauseKpiResponse,
    pub persoane: PeopleKpiResponse,
}

impl From<Kpi> for KpiResponse {
    fn from(k: Kpi) -> Self {
        Self {
            volunteers: VolunteerKpiResponse {
                total: k.volunteers.total,
                avg_age: k.volunteers.avg_age,
                avg_disponibility_hours: k.volunteers.avg_disponibility_hours,
            },
            f177: AmountKpiResponse {
                companies: Some(k.f177.companies),
                total_amount: k.f177.total_amount,
                last_month_amount: k.f177.last_month_amount,
            },
            sponsorship: AmountKpiResponse {
                companies: None,
                total_amount: k.sponsorship.total_amount,
                last_month_amount: k.sponsorship.last_month_amount,
            },
            f230: F230KpiResponse {
                total_1y: k.f230.total_1y,
                total_2y: k.f230.total_2y,
                expiring_this_year: k.f230.expiring_this_year,
                this_month: k.f230.this_month,
            },
            iban: IbanKpiResponse { total: k.iban.total },
            causes: CauseKpiResponse {
                total: k.causes.total,
                reached_goal: k.causes.reached_goal,
                avg_progress_pct: k.causes.avg_progress_pct,
                next_campaign_date: k.causes.next_campaign_date,
            },
            persoane: PeopleKpiResponse {
                users: k.persoane.users,
                admins: k.persoane.admins,
            },
        }
    }
}
