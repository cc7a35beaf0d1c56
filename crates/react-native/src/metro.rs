//! Metro bundler port discovery
//!
//! Reads the port out of `metro.config.js` without evaluating it: the first
//! `server: { ... port: <digits> ... }` object literal wins. Anything missing
//! or malformed falls back to the default port, with a reason the caller can
//! print as a warning.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};

/// Metro's own default port
pub const DEFAULT_PORT: u16 = 8081;

/// `server: { ..., port: 8081, ... }` with optional quotes around both keys.
/// `[^}]` keeps the search inside the first object body.
static PORT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\bserver["']?\s*:\s*\{[^}]*?\bport["']?\s*:\s*(\d+)"#).unwrap()
});

/// Where a resolved port came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortSource {
    /// Read from the bundler config
    Config(PathBuf),
    /// The bundler config does not exist
    MissingFile(PathBuf),
    /// The bundler config could not be read
    Unreadable {
        /// Config path
        path: PathBuf,
        /// IO error text
        reason: String,
    },
    /// No `server.port` entry in the bundler config
    NotConfigured(PathBuf),
    /// A `server.port` entry that is not a usable TCP port
    OutOfRange {
        /// Config path
        path: PathBuf,
        /// The digits as written
        value: String,
    },
}

/// Port plus its provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPort {
    /// Port to pass to the react-native CLI
    pub port: u16,
    /// Where it came from
    pub source: PortSource,
}

impl ResolvedPort {
    /// Whether the default was used instead of a configured port
    pub fn is_default(&self) -> bool {
        !matches!(self.source, PortSource::Config(_))
    }

    /// Warning to show when the default was used
    pub fn warning(&self) -> Option<String> {
        let reason = match &self.source {
            PortSource::Config(_) => return None,
            PortSource::MissingFile(path) => format!("{} not found", display_name(path)),
            PortSource::Unreadable { path, reason } => {
                format!("cannot read {}: {}", display_name(path), reason)
            }
            PortSource::NotConfigured(path) => {
                format!("no server port configured in {}", display_name(path))
            }
            PortSource::OutOfRange { path, value } => {
                format!("invalid server port {} in {}", value, display_name(path))
            }
        };
        Some(format!("{}, using default port {}", reason, self.port))
    }
}

impl fmt::Display for ResolvedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            PortSource::Config(path) => {
                write!(f, "port {} (from {})", self.port, display_name(path))
            }
            _ => write!(f, "port {} (default)", self.port),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Outcome of scanning config text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortMatch {
    /// A valid port
    Found(u16),
    /// A port entry whose value is 0 or above 65535
    OutOfRange(String),
    /// No port entry
    Missing,
}

/// Scan bundler config text for `server.port`
pub fn parse_port(content: &str) -> PortMatch {
    let Some(caps) = PORT_PATTERN.captures(content) else {
        return PortMatch::Missing;
    };
    let digits = &caps[1];
    match digits.parse::<u16>() {
        Ok(port) if port > 0 => PortMatch::Found(port),
        _ => PortMatch::OutOfRange(digits.to_string()),
    }
}

/// Resolve the bundler port from `config_path`, falling back to `default_port`
pub fn resolve_port(config_path: &Path, default_port: u16) -> ResolvedPort {
    let path = config_path.to_path_buf();

    let bytes = match std::fs::read(config_path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %config_path.display(), "bundler config missing");
            return ResolvedPort {
                port: default_port,
                source: PortSource::MissingFile(path),
            };
        }
        Err(e) => {
            return ResolvedPort {
                port: default_port,
                source: PortSource::Unreadable {
                    path,
                    reason: e.to_string(),
                },
            };
        }
    };

    let content = String::from_utf8_lossy(&bytes);
    let resolved = match parse_port(&content) {
        PortMatch::Found(port) => ResolvedPort {
            port,
            source: PortSource::Config(path),
        },
        PortMatch::OutOfRange(value) => ResolvedPort {
            port: default_port,
            source: PortSource::OutOfRange { path, value },
        },
        PortMatch::Missing => ResolvedPort {
            port: default_port,
            source: PortSource::NotConfigured(path),
        },
    };

    tracing::debug!(port = resolved.port, default = resolved.is_default(), "resolved bundler port");
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const STANDARD: &str = r#"
const {getDefaultConfig, mergeConfig} = require('@react-native/metro-config');

const config = {
  server: {
    port: 8090,
  },
};

module.exports = mergeConfig(getDefaultConfig(__dirname), config);
"#;

    #[test]
    fn test_parse_standard_config() {
        assert_eq!(parse_port(STANDARD), PortMatch::Found(8090));
    }

    #[test]
    fn test_parse_ignores_field_order() {
        assert_eq!(
            parse_port(r#"server: { host: "x", port: 9000 }"#),
            PortMatch::Found(9000)
        );
        assert_eq!(
            parse_port(r#"server: { port: 9000, host: "x" }"#),
            PortMatch::Found(9000)
        );
    }

    #[test]
    fn test_parse_multiline_with_extra_fields() {
        let content = "module.exports = {\n  server:{\n    enhanceMiddleware: m => m,\n    useGlobalHotkey: false,\n    port :  8123\n  }\n};";
        assert_eq!(parse_port(content), PortMatch::Found(8123));
    }

    #[test]
    fn test_parse_quoted_keys() {
        assert_eq!(
            parse_port(r#"{"server": {"port": 8555}}"#),
            PortMatch::Found(8555)
        );
    }

    #[test]
    fn test_parse_requires_port_key() {
        assert_eq!(parse_port("server: { host: 'x' }"), PortMatch::Missing);
        assert_eq!(parse_port("server: { devPort: 9000 }"), PortMatch::Missing);
        assert_eq!(parse_port("server: { proxy_port: 9000 }"), PortMatch::Missing);
        assert_eq!(parse_port("port: 9000"), PortMatch::Missing);
    }

    #[test]
    fn test_parse_port_outside_server_object() {
        assert_eq!(
            parse_port("server: { host: 'x' }, port: 9000"),
            PortMatch::Missing
        );
    }

    #[test]
    fn test_parse_out_of_range() {
        assert_eq!(
            parse_port("server: { port: 70000 }"),
            PortMatch::OutOfRange("70000".to_string())
        );
        assert_eq!(
            parse_port("server: { port: 0 }"),
            PortMatch::OutOfRange("0".to_string())
        );
    }

    #[test]
    fn test_resolve_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_port(&dir.path().join("metro.config.js"), DEFAULT_PORT);
        assert_eq!(resolved.port, 8081);
        assert!(resolved.is_default());
        assert!(resolved.warning().unwrap().contains("metro.config.js not found"));
    }

    #[test]
    fn test_resolve_without_port_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metro.config.js");
        std::fs::write(&path, "module.exports = { transformer: {} };").unwrap();

        let resolved = resolve_port(&path, DEFAULT_PORT);
        assert_eq!(resolved.port, DEFAULT_PORT);
        assert_eq!(resolved.source, PortSource::NotConfigured(path));
        assert!(resolved.warning().unwrap().contains("using default port 8081"));
    }

    #[test]
    fn test_resolve_reads_configured_port() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metro.config.js");
        std::fs::write(&path, STANDARD).unwrap();

        let resolved = resolve_port(&path, DEFAULT_PORT);
        assert_eq!(resolved.port, 8090);
        assert!(!resolved.is_default());
        assert!(resolved.warning().is_none());
        assert_eq!(resolved.to_string(), "port 8090 (from metro.config.js)");
    }

    #[test]
    fn test_resolve_custom_default() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_port(&dir.path().join("metro.config.js"), 19000);
        assert_eq!(resolved.port, 19000);
        assert_eq!(resolved.to_string(), "port 19000 (default)");
    }

    proptest! {
        #[test]
        fn prop_any_valid_port_is_found(
            port in 1u16..=u16::MAX,
            host_first in any::<bool>(),
        ) {
            let body = if host_first {
                format!("server: {{ host: \"x\", port: {} }}", port)
            } else {
                format!("server: {{ port: {}, host: \"x\" }}", port)
            };
            prop_assert_eq!(parse_port(&body), PortMatch::Found(port));
        }

        #[test]
        fn prop_text_without_port_key_is_missing(s in "[a-oq-z :{},\n]*") {
            prop_assert_eq!(parse_port(&s), PortMatch::Missing);
        }
    }
}
