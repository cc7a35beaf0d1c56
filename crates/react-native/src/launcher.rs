//! react-native CLI launcher
//!
//! Builds `<runner> react-native <command> --port <port>` and runs it in the
//! project root with inherited stdio.

use devkit_core::config::MetroConfig;
use devkit_core::error::{Error, Result, ResultExt};
use devkit_core::process::{run_command_streaming_in_dir, StreamOutcome};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What to launch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Metro bundler
    Start,
    /// Build and install on an Android device or emulator
    Android,
    /// Build and install on an iOS simulator or device
    Ios,
}

impl LaunchTarget {
    /// Every target, in usage order
    pub const ALL: [LaunchTarget; 3] = [LaunchTarget::Start, LaunchTarget::Android, LaunchTarget::Ios];

    /// Name accepted on the command line
    pub fn name(self) -> &'static str {
        match self {
            LaunchTarget::Start => "start",
            LaunchTarget::Android => "android",
            LaunchTarget::Ios => "ios",
        }
    }

    /// One-line usage description
    pub fn description(self) -> &'static str {
        match self {
            LaunchTarget::Start => "Start the Metro bundler",
            LaunchTarget::Android => "Build and run the Android app",
            LaunchTarget::Ios => "Build and run the iOS app",
        }
    }

    /// Matching react-native CLI subcommand
    pub fn react_native_command(self) -> &'static str {
        match self {
            LaunchTarget::Start => "start",
            LaunchTarget::Android => "run-android",
            LaunchTarget::Ios => "run-ios",
        }
    }
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LaunchTarget {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        LaunchTarget::ALL
            .into_iter()
            .find(|target| target.name() == wanted)
            .ok_or_else(|| {
                Error::validation(format!("Unknown command: {}", s.trim()))
                    .with_suggestion("Use one of: start, android, ios")
            })
    }
}

/// Runs react-native CLI commands for one project
#[derive(Debug, Clone)]
pub struct Launcher {
    project_root: PathBuf,
    runner: String,
}

impl Launcher {
    /// Launcher using `npx` in `project_root`
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::from_config(project_root, &MetroConfig::default())
    }

    /// Launcher using the configured runner
    pub fn from_config(project_root: impl Into<PathBuf>, config: &MetroConfig) -> Self {
        Self {
            project_root: project_root.into(),
            runner: config.runner.clone(),
        }
    }

    /// Override the runner program
    pub fn with_runner(mut self, runner: impl Into<String>) -> Self {
        self.runner = runner.into();
        self
    }

    /// Directory the command runs in
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Runner program name
    pub fn runner(&self) -> &str {
        &self.runner
    }

    /// Program actually spawned; npm shims are `.cmd` files on Windows
    fn program(&self) -> String {
        if cfg!(windows) && matches!(self.runner.as_str(), "npx" | "npm" | "yarn") {
            format!("{}.cmd", self.runner)
        } else {
            self.runner.clone()
        }
    }

    /// Arguments passed to the runner
    pub fn args(&self, target: LaunchTarget, port: u16, extra: &[String]) -> Vec<String> {
        let mut args = vec![
            "react-native".to_string(),
            target.react_native_command().to_string(),
            "--port".to_string(),
            port.to_string(),
        ];
        args.extend(extra.iter().cloned());
        args
    }

    /// Full command line, for display
    pub fn command_line(&self, target: LaunchTarget, port: u16, extra: &[String]) -> String {
        std::iter::once(self.runner.clone())
            .chain(self.args(target, port, extra))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command, blocking until it exits or the user interrupts it
    pub fn launch(&self, target: LaunchTarget, port: u16, extra: &[String]) -> Result<StreamOutcome> {
        let args = self.args(target, port, extra);
        tracing::info!(command = %target, port, runner = %self.runner, "launching react-native");

        run_command_streaming_in_dir(self.program(), &args, &self.project_root)
            .map_err(|err| match err.code {
                devkit_core::ErrorCode::CommandNotFound => err.with_suggestion(format!(
                    "Install Node.js so that {} is on your PATH",
                    self.runner
                )),
                _ => err,
            })
            .context(format!("Running react-native {}", target.react_native_command()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_case_insensitive() {
        assert_eq!("start".parse::<LaunchTarget>().unwrap(), LaunchTarget::Start);
        assert_eq!("ANDROID".parse::<LaunchTarget>().unwrap(), LaunchTarget::Android);
        assert_eq!("iOS".parse::<LaunchTarget>().unwrap(), LaunchTarget::Ios);
    }

    #[test]
    fn test_parse_target_rejects_unknown() {
        let err = "web".parse::<LaunchTarget>().unwrap_err();
        assert_eq!(err.code, devkit_core::ErrorCode::ValidationError);
        assert!(err.message.contains("web"));
        assert!("run-android".parse::<LaunchTarget>().is_err());
    }

    #[test]
    fn test_react_native_commands() {
        assert_eq!(LaunchTarget::Start.react_native_command(), "start");
        assert_eq!(LaunchTarget::Android.react_native_command(), "run-android");
        assert_eq!(LaunchTarget::Ios.react_native_command(), "run-ios");
    }

    #[test]
    fn test_args_carry_port() {
        let launcher = Launcher::new("/tmp/app");
        assert_eq!(
            launcher.args(LaunchTarget::Android, 8090, &[]),
            vec!["react-native", "run-android", "--port", "8090"]
        );
    }

    #[test]
    fn test_args_forward_extra() {
        let launcher = Launcher::new("/tmp/app");
        let extra = vec!["--reset-cache".to_string()];
        assert_eq!(
            launcher.command_line(LaunchTarget::Start, 8081, &extra),
            "npx react-native start --port 8081 --reset-cache"
        );
    }

    #[test]
    fn test_from_config_runner() {
        let config = MetroConfig {
            runner: "bunx".to_string(),
            ..MetroConfig::default()
        };
        let launcher = Launcher::from_config("/tmp/app", &config);
        assert_eq!(launcher.runner(), "bunx");
        assert_eq!(launcher.project_root(), Path::new("/tmp/app"));
    }

    #[test]
    fn test_launch_missing_runner() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(dir.path()).with_runner("nonexistent_runner_12345");
        let err = launcher.launch(LaunchTarget::Start, 8081, &[]).unwrap_err();
        assert_eq!(err.code, devkit_core::ErrorCode::CommandNotFound);
        assert_eq!(err.exit_code(), 127);
        assert!(err.suggestion.unwrap().contains("Node.js"));
    }

    #[cfg(unix)]
    #[test]
    fn test_launch_runs_in_project_root_and_propagates_code() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let runner = dir.path().join("fake-npx");
        std::fs::write(&runner, "#!/bin/sh\necho \"$@\" > args.txt\nexit 4\n").unwrap();
        std::fs::set_permissions(&runner, std::fs::Permissions::from_mode(0o755)).unwrap();

        let launcher = Launcher::new(dir.path()).with_runner(runner.to_string_lossy());
        let outcome = launcher.launch(LaunchTarget::Ios, 9000, &[]).unwrap();

        assert_eq!(outcome, StreamOutcome::Exited(4));
        let recorded = std::fs::read_to_string(dir.path().join("args.txt")).unwrap();
        assert_eq!(recorded.trim(), "react-native run-ios --port 9000");
    }
}
