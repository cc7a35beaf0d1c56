//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, Result, ResultExt};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path, or search the project root.
    ///
    /// An explicit path must exist. Without one, the first candidate found in
    /// `project_root` is used, falling back to defaults. Path values are
    /// `~`/env expanded and every value is validated before anything else runs.
    pub fn load(project_root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(p) => {
                let p = expand_path(p)?;
                if !p.exists() {
                    return Err(Error::config_not_found(&p));
                }
                Some(p)
            }
            None => find_config_file(project_root),
        };

        let schema = if let Some(ref p) = config_path {
            tracing::debug!(path = %p.display(), "loading configuration");
            let mut schema = load_config_file(p)?;
            expand_schema_paths(&mut schema).context(format!("Loading {}", p.display()))?;
            schema
                .validate()
                .to_result()
                .with_suggestion(format!("Fix the listed values in {}", p.display()))?;
            schema
        } else {
            ConfigSchema::default()
        };

        Ok(Self {
            schema,
            path: config_path,
        })
    }
}

/// Expand `~` and environment variables in a user-supplied path
pub fn expand_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .map_err(|e| Error::config(format!("Cannot expand path {}: {}", raw, e)))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn expand_string(value: &mut String) -> Result<()> {
    let expanded = expand_path(Path::new(value.as_str()))?;
    *value = expanded.to_string_lossy().into_owned();
    Ok(())
}

/// Expand the path-valued settings in place
fn expand_schema_paths(schema: &mut ConfigSchema) -> Result<()> {
    expand_string(&mut schema.keystore.keystore_path)?;
    expand_string(&mut schema.keystore.properties_path)?;
    expand_string(&mut schema.keystore.gitignore_path)?;
    expand_string(&mut schema.metro.config_file)?;
    Ok(())
}

/// Find configuration file in standard locations
fn find_config_file(project_root: &Path) -> Option<PathBuf> {
    let candidates = [".devkit.toml", "devkit.toml", ".config/devkit.toml"];

    candidates
        .iter()
        .map(|c| project_root.join(c))
        .find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path)
        .map_err(Error::from)
        .context(format!("Reading config file {}", path.display()))?;

    toml::from_str(&content)
        .map_err(Error::from)
        .context(format!("Parsing config file {}", path.display()))
}
