//! Borderou - batch of Formular 230 submissions filed with ANAF

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Generated Borderou 230 document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Borderou {
    /// Also the `nr_borderou` printed in the XML
    pub id: i64,
    pub date: NaiveDate,
    pub xml: String,
}

impl Borderou {
    pub fn file_name(&self) -> String {
        format!("borderou230-{}.xml", self.id)
    }
}
