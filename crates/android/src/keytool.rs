//! JDK keytool integration
//!
//! Provides discovery of the keytool binary and the `-genkeypair` wrapper.

use devkit_core::config::KeystoreConfig;
use devkit_core::error::{Error, Result, ResultExt};
use devkit_core::process::{run_command, which_command, CommandResult};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const KEYTOOL: &str = "keytool";

/// Remediation shown when keytool cannot be found
pub const INSTALL_HINT: &str =
    "Install a JDK (macOS: brew install openjdk) or set JAVA_HOME to a JDK installation";

/// Fixed parameters of the generated key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyParams {
    /// `-storetype`
    pub store_type: String,
    /// `-keyalg`
    pub key_alg: String,
    /// `-keysize`, in bits
    pub key_size: u32,
    /// `-validity`, in days
    pub validity_days: u32,
    /// `-alias`
    pub alias: String,
    /// Length of each generated password
    pub password_length: usize,
}

impl Default for KeyParams {
    fn default() -> Self {
        Self::from(&KeystoreConfig::default())
    }
}

impl From<&KeystoreConfig> for KeyParams {
    fn from(config: &KeystoreConfig) -> Self {
        Self {
            store_type: config.store_type.clone(),
            key_alg: config.key_alg.clone(),
            key_size: config.key_size,
            validity_days: config.validity_days,
            alias: config.key_alias.clone(),
            password_length: config.password_length,
        }
    }
}

/// Find keytool on PATH, then under `$JAVA_HOME/bin`
pub fn locate() -> Option<PathBuf> {
    which_command(KEYTOOL).or_else(|| {
        let java_home = std::env::var_os("JAVA_HOME")?;
        java_home_keytool(Path::new(&java_home))
    })
}

/// keytool inside a JDK home, if present
pub fn java_home_keytool(java_home: &Path) -> Option<PathBuf> {
    let name = if cfg!(windows) { "keytool.exe" } else { KEYTOOL };
    let candidate = java_home.join("bin").join(name);
    candidate.is_file().then_some(candidate)
}

/// Error reported when keytool is unavailable
pub fn not_found() -> Error {
    Error::command_not_found(KEYTOOL).with_suggestion(INSTALL_HINT)
}

/// Arguments for `keytool -genkeypair`
pub fn genkeypair_args(
    params: &KeyParams,
    keystore: &Path,
    store_password: &str,
    key_password: &str,
    distinguished_name: &str,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-genkeypair".into(), "-v".into()];
    let pairs: [(&str, OsString); 9] = [
        ("-storetype", params.store_type.clone().into()),
        ("-keystore", keystore.as_os_str().to_os_string()),
        ("-alias", params.alias.clone().into()),
        ("-keyalg", params.key_alg.clone().into()),
        ("-keysize", params.key_size.to_string().into()),
        ("-validity", params.validity_days.to_string().into()),
        ("-storepass", store_password.into()),
        ("-keypass", key_password.into()),
        ("-dname", distinguished_name.into()),
    ];

    for (flag, value) in pairs {
        args.push(flag.into());
        args.push(value);
    }
    args
}

/// Run `keytool -genkeypair`; a non-zero exit becomes an error carrying keytool's output
pub fn generate_keypair(keytool: &Path, args: &[OsString]) -> Result<CommandResult> {
    tracing::info!(keytool = %keytool.display(), "generating key pair");

    let result = run_command(keytool, args).context("Generating signing key")?;

    if !result.success {
        // keytool reports most errors on stdout
        return Err(
            Error::command_failed(KEYTOOL, result.exit_code, &result.combined_output())
                .with_context("Generating signing key"),
        );
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_strings(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn test_default_params() {
        let params = KeyParams::default();
        assert_eq!(params.store_type, "PKCS12");
        assert_eq!(params.key_alg, "RSA");
        assert_eq!(params.key_size, 2048);
        assert_eq!(params.validity_days, 10000);
        assert_eq!(params.alias, "release-key");
        assert_eq!(params.password_length, 16);
    }

    #[test]
    fn test_genkeypair_args() {
        let args = genkeypair_args(
            &KeyParams::default(),
            Path::new("android/app/release.keystore"),
            "storepw",
            "keypw",
            "CN=Developer, C=CN",
        );
        assert_eq!(
            as_strings(&args),
            vec![
                "-genkeypair",
                "-v",
                "-storetype",
                "PKCS12",
                "-keystore",
                "android/app/release.keystore",
                "-alias",
                "release-key",
                "-keyalg",
                "RSA",
                "-keysize",
                "2048",
                "-validity",
                "10000",
                "-storepass",
                "storepw",
                "-keypass",
                "keypw",
                "-dname",
                "CN=Developer, C=CN",
            ]
        );
    }

    #[test]
    fn test_java_home_keytool() {
        let home = tempfile::tempdir().unwrap();
        assert!(java_home_keytool(home.path()).is_none());

        std::fs::create_dir_all(home.path().join("bin")).unwrap();
        let name = if cfg!(windows) { "keytool.exe" } else { "keytool" };
        std::fs::write(home.path().join("bin").join(name), "").unwrap();
        assert_eq!(
            java_home_keytool(home.path()),
            Some(home.path().join("bin").join(name))
        );
    }

    #[test]
    fn test_not_found_carries_hint() {
        let err = not_found();
        assert_eq!(err.code, devkit_core::ErrorCode::CommandNotFound);
        assert!(err.suggestion.unwrap().contains("JAVA_HOME"));
    }

    #[cfg(unix)]
    #[test]
    fn test_generate_keypair_failure_echoes_output() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("keytool");
        std::fs::write(&fake, "#!/bin/sh\necho 'keytool error: bad dname' >&2\nexit 1\n").unwrap();
        std::fs::set_permissions(&fake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = generate_keypair(&fake, &[OsString::from("-genkeypair")]).unwrap_err();
        assert_eq!(err.code, devkit_core::ErrorCode::CommandFailed);
        assert!(err.message.contains("bad dname"));
    }
}
