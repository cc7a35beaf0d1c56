//! Core utilities for mobile project development tools
//!
//! This crate provides shared functionality used by the platform crates:
//!
//! - **Error handling**: Errors with codes, context, and recovery suggestions
//! - **Process execution**: Captured and streaming command execution
//! - **Signal handling**: Ctrl-C around blocking child processes
//! - **Configuration**: TOML-based configuration with defaults and validation
//!
//! # Example
//!
//! ```rust,no_run
//! use devkit_core::process::run_command;
//!
//! let result = run_command("keytool", &["-help"]).expect("keytool not installed");
//! println!("{}", result.combined_output());
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod process;
pub mod signal;
pub mod validation;

pub use error::{Error, ErrorCode, Result, ResultExt};
