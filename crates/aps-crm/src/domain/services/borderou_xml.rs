//! Borderou 230 XML
//!
//! Builds the ANAF `borderou230` document listing Formular 230 submissions
//! that redirect tax to the association.

use chrono::{Datelike, NaiveDate};

use crate::domain::entities::{effective, setting_keys, Form230, Setting};
use crate::domain::errors::DomainError;

pub const DEFAULT_XMLNS: &str = "mfp:anaf:dgti:b230:declaratie:v1";
pub const DEFAULT_SCHEMA_LOCATION: &str = "mfp:anaf:dgti:b230:declaratie:v1 B230.xsd";
pub const DEFAULT_ENTITY_NAME: &str = "Asociația ACȚIUNE PENTRU SĂNĂTATE";
pub const DEFAULT_ENTITY_CIF: &str = "43771157";

/// Document-level attributes of a Borderou
#[derive(Debug, Clone, PartialEq)]
pub struct BorderouHeader {
    pub nr: i64,
    pub date: NaiveDate,
    pub xmlns: String,
    pub schema_location: String,
    pub luna: u32,
    pub an: i32,
    pub entity_name: String,
    pub entity_cif: String,
}

impl BorderouHeader {
    /// Resolve header attributes from settings, falling back to built-in values
    pub fn from_settings(
        settings: &[Setting],
        date: NaiveDate,
        nr: i64,
    ) -> Result<Self, DomainError> {
        let luna = match effective(settings, setting_keys::XML_LUNA) {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| DomainError::validation(format!("Luna invalidă: {}", raw)))?,
            None => date.month(),
        };
        let an = match effective(settings, setting_keys::XML_AN) {
            Some(raw) => raw
                .parse::<i32>()
                .map_err(|_| DomainError::validation(format!("An invalid: {}", raw)))?,
            None => date.year(),
        };
        let entity_cif = effective(settings, setting_keys::XML_CIF)
            .or_else(|| effective(settings, setting_keys::XML_CUI))
            .unwrap_or(DEFAULT_ENTITY_CIF);

        Ok(Self {
            nr,
            date,
            xmlns: effective(settings, setting_keys::XMLNS)
                .unwrap_or(DEFAULT_XMLNS)
                .to_string(),
            schema_location: effective(settings, setting_keys::SCHEMA_LOCATION)
                .unwrap_or(DEFAULT_SCHEMA_LOCATION)
                .to_string(),
            luna,
            an,
            entity_name: effective(settings, setting_keys::XML_NUME)
                .unwrap_or(DEFAULT_ENTITY_NAME)
                .to_string(),
            entity_cif: entity_cif.to_string(),
        })
    }
}

/// Escape text for use inside a double-quoted XML attribute
pub fn escape_xml(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn attr(value: Option<&str>) -> String {
    escape_xml(value.unwrap_or_default())
}

/// Render the Borderou document; forms keep the given order
pub fn render(header: &BorderouHeader, forms: &[Form230]) -> String {
    let den = escape_xml(&header.entity_name);
    let cif = escape_xml(&header.entity_cif);

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<borderou230 xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" xmlns=\"{}\" \
         xsi:schemaLocation=\"{}\" nr_borderou=\"{}\" data_borderou=\"{}\" luna=\"{}\" an=\"{}\" \
         den=\"{}\" den_i=\"{}\" adresa_i=\"{}\" cui=\"{}\" cif_i=\"{}\" totalPlata_A=\"{}\">\n\n",
        escape_xml(&header.xmlns),
        escape_xml(&header.schema_location),
        header.nr,
        header.date.format("%d.%m.%Y"),
        header.luna,
        header.an,
        den,
        den,
        den,
        cif,
        cif,
        forms.len(),
    ));

    for (index, form) in forms.iter().enumerate() {
        xml.push_str(&format!(
            "  <declaratie230 cif_c=\"{}\" nr_poz=\"{}\" nume_c=\"{}\" prenume_c=\"{}\">\n",
            attr(form.cnp.as_deref()),
            index + 1,
            attr(form.first_name.as_deref()),
            attr(form.last_name.as_deref()),
        ));
        xml.push_str(&format!(
            "    <bursa_entit bifa_entitate=\"1\" den_entitate=\"{}\" cif_entitate=\"{}\" \
             cont_entitate=\"{}\" acord=\"{}\" valabilitate_distribuire=\"{}\"/>\n",
            den,
            cif,
            attr(form.iban.as_deref()),
            if form.accepts_contact { "1" } else { "0" },
            form.duration_years(),
        ));
        xml.push_str("  </declaratie230>\n");
    }

    xml.push_str("</borderou230>\n");
    xml
}
