//! React Native and Metro bundler tools
//!
//! - Metro port discovery from `metro.config.js`
//! - `react-native` CLI launch commands bound to that port

#![warn(missing_docs)]

pub mod launcher;
pub mod metro;

pub use launcher::{LaunchTarget, Launcher};
pub use metro::{parse_port, resolve_port, PortMatch, PortSource, ResolvedPort, DEFAULT_PORT};
