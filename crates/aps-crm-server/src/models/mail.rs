//! Mail DTOs

use serde::Deserialize;
use utoipa::ToSchema;

/// Free-form HTML email
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    #[serde(default)]
    pub send_to: String,
    #[serde(default)]
    pub subject: String,
    /// HTML body; `cid:` images are embedded from the images directory
    #[serde(default)]
    pub message: String,
    /// PDF to download and attach as `{subject}.pdf`
    pub pdf_url: Option<String>,
}
