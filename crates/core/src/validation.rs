//! Configuration value validation
//!
//! Collects every problem in one pass so the user can fix a config file in
//! one go.
//!
//! # Example
//!
//! ```rust
//! use devkit_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("keystore.key_alias", "release-key")
//!     .at_least("keystore.password_length", 4usize, 6)
//!     .validate();
//!
//! assert!(!result.is_valid());
//! ```

use crate::error::{Error, Result};
use std::fmt;

/// One rejected value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted config key
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Convert to a configuration error listing every rejected value
    pub fn to_result(self) -> Result<()> {
        if self.is_valid() {
            return Ok(());
        }
        let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
        Err(Error::config(format!("Invalid configuration: {}", messages.join("; "))))
    }
}

/// Fluent validator builder
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(mut self, field: &str, message: String) -> Self {
        self.result.errors.push(ValidationError {
            field: field.to_string(),
            message,
        });
        self
    }

    /// Validate that a field is not blank
    pub fn required(self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            return self.reject(field, "must not be empty".to_string());
        }
        self
    }

    /// Validate a lower bound
    pub fn at_least<T: PartialOrd + fmt::Display>(self, field: &str, value: T, min: T) -> Self {
        if value < min {
            return self.reject(field, format!("must be at least {}, got {}", min, value));
        }
        self
    }

    /// Validate an inclusive range
    pub fn range<T: PartialOrd + fmt::Display>(self, field: &str, value: T, min: T, max: T) -> Self {
        if value < min || value > max {
            return self.reject(
                field,
                format!("must be between {} and {}, got {}", min, max, value),
            );
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCode;

    #[test]
    fn test_valid_values_pass() {
        let result = Validator::new()
            .required("alias", "release-key")
            .at_least("port", 8081u16, 1)
            .range("size", 2048u32, 256, 16384)
            .validate();
        assert!(result.is_valid());
        assert!(result.to_result().is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let result = Validator::new()
            .required("alias", "  ")
            .at_least("port", 0u16, 1)
            .range("size", 0u32, 256, 16384)
            .validate();

        assert_eq!(result.errors().len(), 3);
        assert_eq!(result.errors()[0].field, "alias");

        let err = result.to_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigError);
        assert!(err.message.contains("port: must be at least 1, got 0"));
        assert!(err.message.contains("size: must be between 256 and 16384"));
    }
}
