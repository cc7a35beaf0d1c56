//! Configuration schema definitions
//!
//! Shared configuration types for the keystore generator and the launcher.

use crate::validation::{ValidationResult, Validator};
use serde::{Deserialize, Serialize};

/// keytool rejects store and key passwords shorter than this
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub keystore: KeystoreConfig,

    #[serde(default)]
    pub metro: MetroConfig,
}

impl ConfigSchema {
    /// Check values that would otherwise only fail inside keytool or the launcher
    pub fn validate(&self) -> ValidationResult {
        let keystore = &self.keystore;
        let certificate = &keystore.certificate;
        let metro = &self.metro;

        Validator::new()
            .required("keystore.keystore_path", &keystore.keystore_path)
            .required("keystore.properties_path", &keystore.properties_path)
            .required("keystore.gitignore_path", &keystore.gitignore_path)
            .required("keystore.key_alias", &keystore.key_alias)
            .required("keystore.store_type", &keystore.store_type)
            .required("keystore.key_alg", &keystore.key_alg)
            .range("keystore.key_size", keystore.key_size, 256, 16384)
            .at_least("keystore.validity_days", keystore.validity_days, 1)
            .range(
                "keystore.password_length",
                keystore.password_length,
                MIN_PASSWORD_LENGTH,
                128,
            )
            .required("keystore.certificate.common_name", &certificate.common_name)
            .required("keystore.certificate.country", &certificate.country)
            .required("metro.config_file", &metro.config_file)
            .at_least("metro.default_port", metro.default_port, 1)
            .required("metro.runner", &metro.runner)
            .validate()
    }
}

/// Release signing keystore configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreConfig {
    /// Keystore location, relative to the project root
    #[serde(default = "default_keystore_path")]
    pub keystore_path: String,

    /// Signing properties file, relative to the project root
    #[serde(default = "default_properties_path")]
    pub properties_path: String,

    /// Ignore list that receives the generated paths
    #[serde(default = "default_gitignore_path")]
    pub gitignore_path: String,

    #[serde(default = "default_key_alias")]
    pub key_alias: String,

    #[serde(default = "default_store_type")]
    pub store_type: String,

    #[serde(default = "default_key_alg")]
    pub key_alg: String,

    #[serde(default = "default_key_size")]
    pub key_size: u32,

    #[serde(default = "default_validity_days")]
    pub validity_days: u32,

    /// Length of each generated password
    #[serde(default = "default_password_length")]
    pub password_length: usize,

    /// Defaults offered for the certificate identity prompts
    #[serde(default)]
    pub certificate: CertificateDefaults,
}

impl Default for KeystoreConfig {
    fn default() -> Self {
        Self {
            keystore_path: default_keystore_path(),
            properties_path: default_properties_path(),
            gitignore_path: default_gitignore_path(),
            key_alias: default_key_alias(),
            store_type: default_store_type(),
            key_alg: default_key_alg(),
            key_size: default_key_size(),
            validity_days: default_validity_days(),
            password_length: default_password_length(),
            certificate: CertificateDefaults::default(),
        }
    }
}

fn default_keystore_path() -> String {
    "android/app/release.keystore".to_string()
}

fn default_properties_path() -> String {
    "android/keystore.properties".to_string()
}

fn default_gitignore_path() -> String {
    ".gitignore".to_string()
}

fn default_key_alias() -> String {
    "release-key".to_string()
}

fn default_store_type() -> String {
    "PKCS12".to_string()
}

fn default_key_alg() -> String {
    "RSA".to_string()
}

fn default_key_size() -> u32 {
    2048
}

fn default_validity_days() -> u32 {
    10000
}

fn default_password_length() -> usize {
    16
}

/// Distinguished name defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateDefaults {
    #[serde(default = "default_common_name")]
    pub common_name: String,

    #[serde(default = "default_organizational_unit")]
    pub organizational_unit: String,

    #[serde(default = "default_organization")]
    pub organization: String,

    #[serde(default = "default_locality")]
    pub locality: String,

    #[serde(default = "default_state")]
    pub state: String,

    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for CertificateDefaults {
    fn default() -> Self {
        Self {
            common_name: default_common_name(),
            organizational_unit: default_organizational_unit(),
            organization: default_organization(),
            locality: default_locality(),
            state: default_state(),
            country: default_country(),
        }
    }
}

fn default_common_name() -> String {
    "Developer".to_string()
}

fn default_organizational_unit() -> String {
    "Development".to_string()
}

fn default_organization() -> String {
    "MyCompany".to_string()
}

fn default_locality() -> String {
    "Beijing".to_string()
}

fn default_state() -> String {
    "Beijing".to_string()
}

fn default_country() -> String {
    "CN".to_string()
}

/// Metro bundler and launcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetroConfig {
    /// Bundler config file, relative to the project root
    #[serde(default = "default_metro_config_file")]
    pub config_file: String,

    /// Port used when the bundler config has none
    #[serde(default = "default_port")]
    pub default_port: u16,

    /// Program that runs the react-native CLI
    #[serde(default = "default_runner")]
    pub runner: String,
}

impl Default for MetroConfig {
    fn default() -> Self {
        Self {
            config_file: default_metro_config_file(),
            default_port: default_port(),
            runner: default_runner(),
        }
    }
}

fn default_metro_config_file() -> String {
    "metro.config.js".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_runner() -> String {
    "npx".to_string()
}
