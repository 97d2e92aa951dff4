//! CSV export of flat row DTOs

use aps_crm::DomainError;
use serde::Serialize;

/// Serialize rows with a header taken from the field names.
/// No rows produce an empty body.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, DomainError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| DomainError::Repository(format!("CSV export failed: {}", e)))?;
    }
    writer
        .into_inner()
        .map_err(|e| DomainError::Repository(format!("CSV export failed: {}", e)))
}
