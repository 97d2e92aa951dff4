//! Borderou Repository Port

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{errors::DomainError, Borderou};

/// Renders the final document once the Borderou number is known
pub type BorderouRenderer<'a> = &'a (dyn Fn(i64) -> String + Send + Sync);

/// Repository interface for generated Borderou documents
#[async_trait]
pub trait BorderouRepository: Send + Sync {
    /// Atomically allocate a Borderou number, store the rendered XML and
    /// assign the number to the given Formular 230 posts
    async fn create(
        &self,
        date: NaiveDate,
        post_ids: &[u64],
        render: BorderouRenderer<'_>,
    ) -> Result<Borderou, DomainError>;
}
