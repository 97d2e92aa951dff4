//! IBAN beneficiary DTOs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use aps_crm::IbanBeneficiary;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IbanResponse {
    pub id: u64,
    pub name: Option<String>,
    pub iban: Option<String>,
    pub added_at: NaiveDateTime,
}

impl From<IbanBeneficiary> for IbanResponse {
    fn from(b: IbanBeneficiary) -> Self {
        Self {
            id: b.id,
            name: b.name,
            iban: b.iban,
            added_at: b.added_at,
        }
    }
}

/// Create or update a beneficiary; blank fields are ignored on update
#[derive(Debug, Deserialize, ToSchema)]
pub struct IbanRequest {
    pub name: Option<String>,
    pub iban: Option<String>,
}
