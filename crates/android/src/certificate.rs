//! Certificate identity for the signing key
//!
//! Collects the six distinguished-name fields keytool embeds in the
//! self-signed certificate.

use devkit_cli::prompt::Prompt;
use devkit_core::config::CertificateDefaults;
use devkit_core::Result;

/// Identity embedded in the generated certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// CN
    pub common_name: String,
    /// OU
    pub organizational_unit: String,
    /// O
    pub organization: String,
    /// L
    pub locality: String,
    /// ST
    pub state: String,
    /// C
    pub country: String,
}

impl Default for CertificateInfo {
    fn default() -> Self {
        Self::from(&CertificateDefaults::default())
    }
}

impl From<&CertificateDefaults> for CertificateInfo {
    fn from(defaults: &CertificateDefaults) -> Self {
        Self {
            common_name: defaults.common_name.clone(),
            organizational_unit: defaults.organizational_unit.clone(),
            organization: defaults.organization.clone(),
            locality: defaults.locality.clone(),
            state: defaults.state.clone(),
            country: defaults.country.clone(),
        }
    }
}

impl CertificateInfo {
    /// Format as the `-dname` argument keytool expects
    pub fn distinguished_name(&self) -> String {
        format!(
            "CN={}, OU={}, O={}, L={}, ST={}, C={}",
            escape_dn_value(&self.common_name),
            escape_dn_value(&self.organizational_unit),
            escape_dn_value(&self.organization),
            escape_dn_value(&self.locality),
            escape_dn_value(&self.state),
            escape_dn_value(&self.country),
        )
    }
}

/// Backslash-escape the characters RFC 4514 reserves inside attribute values
fn escape_dn_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, ',' | '+' | '"' | '\\' | '<' | '>' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Identity fields supplied up front; unset fields are asked for
#[derive(Debug, Clone, Default)]
pub struct CertificateOptions {
    /// CN
    pub common_name: Option<String>,
    /// OU
    pub organizational_unit: Option<String>,
    /// O
    pub organization: Option<String>,
    /// L
    pub locality: Option<String>,
    /// ST
    pub state: Option<String>,
    /// C
    pub country: Option<String>,
}

impl CertificateOptions {
    /// Whether every field was supplied
    pub fn is_complete(&self) -> bool {
        self.common_name.is_some()
            && self.organizational_unit.is_some()
            && self.organization.is_some()
            && self.locality.is_some()
            && self.state.is_some()
            && self.country.is_some()
    }

    /// Fill unset fields from `prompt`, offering `defaults`
    pub fn resolve(&self, prompt: &mut dyn Prompt, defaults: &CertificateInfo) -> Result<CertificateInfo> {
        if !self.is_complete() {
            prompt.message("Enter certificate details (press Enter to accept the default):")?;
        }

        Ok(CertificateInfo {
            common_name: ask(prompt, &self.common_name, "Name (CN)", &defaults.common_name)?,
            organizational_unit: ask(
                prompt,
                &self.organizational_unit,
                "Organizational unit (OU)",
                &defaults.organizational_unit,
            )?,
            organization: ask(prompt, &self.organization, "Organization (O)", &defaults.organization)?,
            locality: ask(prompt, &self.locality, "City or locality (L)", &defaults.locality)?,
            state: ask(prompt, &self.state, "State or province (ST)", &defaults.state)?,
            country: ask(prompt, &self.country, "Country code (C)", &defaults.country)?,
        })
    }
}

fn ask(prompt: &mut dyn Prompt, preset: &Option<String>, label: &str, default: &str) -> Result<String> {
    match preset.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => prompt.input(label, default),
    }
}
