//! CLI utilities for mobile project development tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Progress indicators
//! - Interactive prompts

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod prompt;
