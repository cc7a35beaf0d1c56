//! Port-aware React Native launcher
//!
//! Reads the Metro port from `metro.config.js` and runs
//! `npx react-native <command> --port <port>` so the bundler and the native
//! builds agree on one port.

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use devkit_cli::output::{self, Status};
use devkit_core::config::{expand_path, Config};
use devkit_core::error::exit_codes;
use devkit_core::process::StreamOutcome;
use devkit_react_native::metro::resolve_port;
use devkit_react_native::{LaunchTarget, Launcher};
use devkit_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "start-with-port")]
#[command(about = "Run React Native commands on the Metro port from metro.config.js")]
#[command(version)]
#[command(after_help = "Commands:\n  start    Start the Metro bundler\n  android  Build and run the Android app\n  ios      Build and run the iOS app")]
struct Cli {
    /// start, android or ios
    #[arg(value_name = "COMMAND")]
    command: Option<String>,

    /// Extra arguments passed to react-native (after --)
    #[arg(last = true, value_name = "ARGS")]
    extra: Vec<String>,

    /// React Native project root
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    quiet: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn print_usage() {
    eprintln!("{}", "Usage: start-with-port <COMMAND> [-- <ARGS>...]".bold());
    eprintln!();
    eprintln!("Commands:");
    for target in LaunchTarget::ALL {
        eprintln!("  {:<8} {}", target.name(), target.description());
    }
    eprintln!();
    eprintln!("The Metro port is read from metro.config.js (server.port).");
}

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => exit_codes::SUCCESS,
                _ => exit_codes::FAILURE,
            };
            // Printing help or the parse error; nothing useful to do if stdout is gone
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if cli.no_color {
        owo_colors::set_override(false);
    }
    output::set_quiet(cli.quiet);

    let _ = devkit_telemetry::init_with_config(TelemetryConfig::from_verbosity(cli.verbose, cli.quiet));

    let exit_code = run(&cli);
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    let Some(command) = cli.command.as_deref() else {
        print_usage();
        return exit_codes::FAILURE;
    };

    let target = match command.parse::<LaunchTarget>() {
        Ok(target) => target,
        Err(e) => {
            Status::error(&e.message);
            eprintln!();
            print_usage();
            return exit_codes::FAILURE;
        }
    };

    let project_root = match expand_path(&cli.project_root) {
        Ok(root) => root,
        Err(e) => {
            Status::report(&e);
            return e.exit_code();
        }
    };

    let config = match Config::load(&project_root, cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            Status::report(&e);
            return e.exit_code();
        }
    };
    let metro = &config.schema.metro;

    let resolved = resolve_port(&project_root.join(&metro.config_file), metro.default_port);
    match resolved.warning() {
        Some(warning) => Status::warning(&warning),
        None => Status::info(&format!("Using {}", resolved)),
    }

    let launcher = Launcher::from_config(&project_root, metro);
    Status::info(&format!(
        "Running: {}",
        launcher.command_line(target, resolved.port, &cli.extra)
    ));

    match launcher.launch(target, resolved.port, &cli.extra) {
        Ok(StreamOutcome::Interrupted) => {
            eprintln!();
            Status::warning("Cancelled");
            exit_codes::INTERRUPTED
        }
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            Status::report(&e);
            e.exit_code()
        }
    }
}
