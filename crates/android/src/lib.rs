//! Android release signing tools
//!
//! This crate provides the keystore generator:
//! - Certificate identity collection
//! - Random password generation
//! - keytool discovery and invocation
//! - `keystore.properties` and ignore-list maintenance

#![warn(missing_docs)]

pub mod certificate;
pub mod keystore;
pub mod keytool;
pub mod password;

pub use certificate::{CertificateInfo, CertificateOptions};
pub use keystore::{GenerateOutcome, GeneratedKeystore, KeystoreGenerator, KeystoreLayout, SigningCredentials};
pub use keytool::KeyParams;
