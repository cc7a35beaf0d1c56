//! Release keystore generation
//!
//! Runs the full generator flow: overwrite confirmation, keytool discovery,
//! password generation, certificate prompts, `keytool -genkeypair`, the
//! `keystore.properties` file and the ignore-list entries.
//!
//! Files are touched in an order that keeps failures cheap: the old keystore
//! is removed only after the user confirmed and keytool was found, and the
//! properties file and ignore list are written only after keytool succeeded.

use crate::certificate::{CertificateInfo, CertificateOptions};
use crate::keytool::{self, KeyParams};
use crate::password::generate_password;
use chrono::{DateTime, Local, SecondsFormat};
use devkit_cli::progress;
use devkit_cli::prompt::Prompt;
use devkit_core::config::KeystoreConfig;
use devkit_core::error::{Error, Result, ResultExt};
use devkit_telemetry::Timer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Where the generator reads and writes, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeystoreLayout {
    /// Project root all other paths hang off
    pub project_root: PathBuf,
    /// Binary keystore written by keytool
    pub keystore: PathBuf,
    /// Signing properties consumed by Gradle
    pub properties: PathBuf,
    /// Version-control ignore list
    pub gitignore: PathBuf,
}

impl KeystoreLayout {
    /// Standard React Native layout under `project_root`
    pub fn for_project(project_root: &Path) -> Self {
        Self::from_config(project_root, &KeystoreConfig::default())
    }

    /// Layout with paths taken from configuration
    pub fn from_config(project_root: &Path, config: &KeystoreConfig) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            keystore: PathBuf::from(&config.keystore_path),
            properties: PathBuf::from(&config.properties_path),
            gitignore: PathBuf::from(&config.gitignore_path),
        }
    }

    /// Absolute keystore path
    pub fn keystore_path(&self) -> PathBuf {
        self.project_root.join(&self.keystore)
    }

    /// Absolute properties path
    pub fn properties_path(&self) -> PathBuf {
        self.project_root.join(&self.properties)
    }

    /// Absolute ignore-list path
    pub fn gitignore_path(&self) -> PathBuf {
        self.project_root.join(&self.gitignore)
    }

    /// Android app module next to the properties file
    pub fn app_module_dir(&self) -> PathBuf {
        let properties = self.properties_path();
        properties
            .parent()
            .map(|dir| dir.join("app"))
            .unwrap_or_else(|| self.project_root.join("app"))
    }

    /// `storeFile` value as Gradle's `file()` in the app module resolves it:
    /// relative when the keystore lives under the module, absolute otherwise
    pub fn store_file(&self) -> String {
        let keystore = self.keystore_path();
        match keystore.strip_prefix(self.app_module_dir()) {
            Ok(relative) => slash_joined(relative),
            Err(_) => slash_joined(&std::path::absolute(&keystore).unwrap_or_else(|_| keystore.clone())),
        }
    }

    /// Lines appended to the ignore list
    pub fn ignore_entries(&self) -> Vec<String> {
        vec![
            "# Android signing files".to_string(),
            self.display_relative(&self.keystore),
            self.display_relative(&self.properties),
        ]
    }

    /// Ignore-list substring that marks the entries as already present
    pub fn ignore_marker(&self) -> String {
        file_name(&self.properties)
    }

    /// Project-relative, `/`-separated form of a layout path
    pub fn display_relative(&self, path: &Path) -> String {
        slash_joined(path.strip_prefix(&self.project_root).unwrap_or(path))
    }
}

fn slash_joined(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Contents of `keystore.properties`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningCredentials {
    /// `storeFile`, as resolved from the app module
    pub store_file: String,
    /// `storePassword`
    pub store_password: String,
    /// `keyAlias`
    pub key_alias: String,
    /// `keyPassword`
    pub key_password: String,
}

impl SigningCredentials {
    /// Render the properties file
    pub fn to_properties(&self, generated_at: DateTime<Local>) -> String {
        format!(
            "# Android release signing configuration\n\
             # Contains passwords. Do not commit this file.\n\
             # Generated {}\n\
             \n\
             storeFile={}\n\
             storePassword={}\n\
             keyAlias={}\n\
             keyPassword={}\n",
            generated_at.to_rfc3339_opts(SecondsFormat::Secs, false),
            self.store_file,
            self.store_password,
            self.key_alias,
            self.key_password,
        )
    }

    /// Write the properties file, creating parent directories
    pub fn write_properties(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_properties(Local::now()))
            .map_err(Error::from)
            .context(format!("Writing {}", path.display()))
    }
}

/// Append `entries` to the ignore list unless it already contains `marker`.
///
/// Returns whether the file was changed.
pub fn update_gitignore(path: &Path, entries: &[String], marker: &str) -> Result<bool> {
    let existing = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::from(e).with_context(format!("Reading {}", path.display()))),
    };

    if existing.contains(marker) {
        tracing::debug!(path = %path.display(), marker, "ignore entries already present");
        return Ok(false);
    }

    let mut block = String::new();
    if !existing.is_empty() {
        if !existing.ends_with('\n') {
            block.push('\n');
        }
        block.push('\n');
    }
    block.push_str(&entries.join("\n"));
    block.push('\n');

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(Error::from)
        .context(format!("Opening {}", path.display()))?;
    file.write_all(block.as_bytes())?;

    Ok(true)
}

/// A successfully generated keystore
#[derive(Debug, Clone)]
pub struct GeneratedKeystore {
    /// Keystore written by keytool
    pub keystore_path: PathBuf,
    /// Properties file written for Gradle
    pub properties_path: PathBuf,
    /// Values written to the properties file
    pub credentials: SigningCredentials,
    /// Identity embedded in the certificate
    pub certificate: CertificateInfo,
    /// Whether the ignore list was changed
    pub gitignore_updated: bool,
    /// Time spent in keytool
    pub elapsed: Duration,
}

/// Result of a generator run
#[derive(Debug, Clone)]
pub enum GenerateOutcome {
    /// The user declined to overwrite an existing keystore
    Cancelled,
    /// Keystore and properties were written
    Generated(Box<GeneratedKeystore>),
}

/// Generator for the release signing keystore
#[derive(Debug, Clone)]
pub struct KeystoreGenerator {
    layout: KeystoreLayout,
    params: KeyParams,
    certificate_defaults: CertificateInfo,
    keytool: Option<PathBuf>,
    force: bool,
}

impl KeystoreGenerator {
    /// Generator with default parameters and keytool looked up on this machine
    pub fn new(layout: KeystoreLayout) -> Self {
        Self {
            layout,
            params: KeyParams::default(),
            certificate_defaults: CertificateInfo::default(),
            keytool: keytool::locate(),
            force: false,
        }
    }

    /// Generator configured from the `[keystore]` section
    pub fn from_config(project_root: &Path, config: &KeystoreConfig) -> Self {
        Self::new(KeystoreLayout::from_config(project_root, config))
            .with_params(KeyParams::from(config))
            .with_certificate_defaults(CertificateInfo::from(&config.certificate))
    }

    /// Override key parameters
    pub fn with_params(mut self, params: KeyParams) -> Self {
        self.params = params;
        self
    }

    /// Override the defaults offered in the certificate prompts
    pub fn with_certificate_defaults(mut self, defaults: CertificateInfo) -> Self {
        self.certificate_defaults = defaults;
        self
    }

    /// Use a specific keytool binary, or none to simulate a missing JDK
    pub fn with_keytool(mut self, keytool: Option<PathBuf>) -> Self {
        self.keytool = keytool;
        self
    }

    /// Overwrite an existing keystore without asking
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Paths this generator works with
    pub fn layout(&self) -> &KeystoreLayout {
        &self.layout
    }

    /// Run the generator
    pub fn run(&self, prompt: &mut dyn Prompt, options: &CertificateOptions) -> Result<GenerateOutcome> {
        let keystore_path = self.layout.keystore_path();
        let properties_path = self.layout.properties_path();

        let existing = keystore_path.exists();
        if existing && !self.force {
            let question = format!(
                "Signing keystore already exists: {}. Overwrite?",
                self.layout.display_relative(&keystore_path)
            );
            if !prompt.confirm(&question)? {
                tracing::info!(path = %keystore_path.display(), "overwrite declined");
                return Ok(GenerateOutcome::Cancelled);
            }
        }

        let keytool_bin = self.keytool.as_deref().ok_or_else(keytool::not_found)?;
        tracing::debug!(keytool = %keytool_bin.display(), "using keytool");

        let store_password = generate_password(self.params.password_length);
        let key_password = generate_password(self.params.password_length);

        let certificate = options.resolve(prompt, &self.certificate_defaults)?;
        let distinguished_name = certificate.distinguished_name();
        tracing::info!(dname = %distinguished_name, "certificate identity");

        if existing {
            std::fs::remove_file(&keystore_path)
                .map_err(Error::from)
                .context(format!("Removing old keystore {}", keystore_path.display()))?;
        }
        if let Some(parent) = keystore_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let args = keytool::genkeypair_args(
            &self.params,
            &keystore_path,
            &store_password,
            &key_password,
            &distinguished_name,
        );

        let timer = Timer::start("keytool_genkeypair");
        let spinner = progress::spinner("Generating release signing key...");
        if let Err(e) = keytool::generate_keypair(keytool_bin, &args) {
            progress::finish_error(&spinner, "keytool failed");
            return Err(e);
        }
        progress::finish_success(&spinner, "Signing key generated");
        let elapsed = timer.stop();

        let credentials = SigningCredentials {
            store_file: self.layout.store_file(),
            store_password,
            key_alias: self.params.alias.clone(),
            key_password,
        };
        credentials.write_properties(&properties_path)?;

        let gitignore_updated = update_gitignore(
            &self.layout.gitignore_path(),
            &self.layout.ignore_entries(),
            &self.layout.ignore_marker(),
        )?;

        Ok(GenerateOutcome::Generated(Box::new(GeneratedKeystore {
            keystore_path,
            properties_path,
            credentials,
            certificate,
            gitignore_updated,
            elapsed,
        })))
    }
}
