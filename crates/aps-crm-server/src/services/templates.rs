//! Email and page templates with `{{placeholder}}` substitution
//!
//! The templates shipped in `templates/` are compiled in; a directory given
//! at startup may override any of them by file name.

use std::collections::HashMap;
use std::path::Path;

use aps_crm::DomainError;

pub const RENEWAL: &str = "renewal_formular230.html";
pub const BIRTHDAY: &str = "birthday.html";
pub const RESET_PASSWORD: &str = "reset_password.html";
pub const OTP: &str = "otp.html";
pub const RESET_FORM: &str = "reset_form.html";
pub const RESET_SUCCESS: &str = "reset_success.html";

const BUILTIN: &[(&str, &str)] = &[
    (RENEWAL, include_str!("../../templates/renewal_formular230.html")),
    (BIRTHDAY, include_str!("../../templates/birthday.html")),
    (RESET_PASSWORD, include_str!("../../templates/reset_password.html")),
    (OTP, include_str!("../../templates/otp.html")),
    (RESET_FORM, include_str!("../../templates/reset_form.html")),
    (RESET_SUCCESS, include_str!("../../templates/reset_success.html")),
];

#[derive(Debug, Clone, Default)]
pub struct Templates {
    templates: HashMap<String, String>,
}

impl Templates {
    pub fn builtin() -> Self {
        Self::from_map(BUILTIN.iter().map(|(name, body)| (name.to_string(), body.to_string())))
    }

    pub fn from_map(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            templates: entries.into_iter().collect(),
        }
    }

    /// Built-in templates overridden by the `.html` files found in `dir`
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut templates = Self::builtin();
        if !dir.is_dir() {
            tracing::info!("Template directory {} not found, using built-in templates", dir.display());
            return Ok(templates);
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
                continue;
            };
            let body = std::fs::read_to_string(&path)
                .map_err(|e| anyhow::anyhow!("Cannot read template {}: {}", path.display(), e))?;
            tracing::debug!("Loaded template override {}", name);
            templates.templates.insert(name, body);
        }
        Ok(templates)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.templates.iter().map(|(name, body)| (name.as_str(), body.as_str()))
    }

    /// Render a template, replacing every `{{key}}` with its value
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> Result<String, DomainError> {
        let template = self
            .templates
            .get(name)
            .ok_or_else(|| DomainError::ExternalService(format!("Nu pot încărca template email: {}", name)))?;
        Ok(substitute(template, vars))
    }
}

pub fn substitute(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{}}}}}", key), value)
    })
}
