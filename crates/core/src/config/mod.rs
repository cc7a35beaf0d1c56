//! Configuration loading and schema definitions
//!
//! Shared configuration types used by every tool in the workspace.

mod loader;
mod schema;

pub use loader::{expand_path, Config};
pub use schema::*;
