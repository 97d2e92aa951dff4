//! IBAN beneficiary - bank accounts the association publishes for donations

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::post::PostRecord;
use crate::domain::errors::DomainError;
use crate::domain::services::listing::{Listable, SortKey};

/// Beneficiary account (`iban_beneficiar` post)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IbanBeneficiary {
    pub id: u64,
    pub name: Option<String>,
    pub iban: Option<String>,
    pub added_at: NaiveDateTime,
}

impl IbanBeneficiary {
    pub fn from_record(record: &PostRecord) -> Self {
        Self {
            id: record.post.id,
            name: record.meta("nume"),
            iban: record.meta("iban"),
            added_at: record.post.date,
        }
    }
}

impl Listable for IbanBeneficiary {
    fn record_id(&self) -> u64 {
        self.id
    }

    fn search_fields(&self) -> Vec<String> {
        [self.name.clone(), self.iban.clone()]
            .into_iter()
            .flatten()
            .collect()
    }

    fn sort_key(&self, property: &str) -> Option<SortKey> {
        Some(match property {
            "id" => SortKey::Number(Some(self.id as f64)),
            "name" => SortKey::opt_text(self.name.as_deref()),
            "iban" => SortKey::opt_text(self.iban.as_deref()),
            "addedAt" => SortKey::Date(Some(self.added_at)),
            _ => return None,
        })
    }
}

/// Strip spaces, upper-case and verify the ISO 13616 mod-97 checksum
pub fn normalize_iban(raw: &str) -> Result<String, DomainError> {
    let iban: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let well_formed = (15..=34).contains(&iban.len())
        && iban.chars().all(|c| c.is_ascii_alphanumeric())
        && iban[..2].chars().all(|c| c.is_ascii_alphabetic())
        && iban[2..4].chars().all(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(DomainError::validation(format!("IBAN invalid: {}", raw.trim())));
    }

    let rearranged = iban[4..].chars().chain(iban[..4].chars());
    let mut remainder: u32 = 0;
    for c in rearranged {
        let value = c.to_digit(36).unwrap_or(0);
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    if remainder == 1 {
        Ok(iban)
    } else {
        Err(DomainError::validation(format!("IBAN invalid: {}", raw.trim())))
    }
}
