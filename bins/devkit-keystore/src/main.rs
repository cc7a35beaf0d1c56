//! Android release keystore generator
//!
//! Creates `android/app/release.keystore` with keytool, writes
//! `android/keystore.properties` for Gradle and keeps both out of git.

use anyhow::Result;
use clap::Parser;
use devkit_android::{CertificateOptions, GenerateOutcome, GeneratedKeystore, KeystoreGenerator};
use devkit_cli::output::{self, format_duration, Status};
use devkit_cli::prompt::{NonInteractive, Prompt, StdioPrompt};
use devkit_core::config::{expand_path, Config};
use devkit_core::error::exit_codes;
use devkit_telemetry::TelemetryConfig;
use owo_colors::OwoColorize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-keystore")]
#[command(about = "Generate an Android release signing keystore")]
#[command(version)]
struct Cli {
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

    /// Overwrite an existing keystore without asking
    #[arg(short, long)]
    force: bool,

    /// Accept default certificate details without prompting
    #[arg(long, visible_alias = "non-interactive")]
    defaults: bool,

    /// Certificate name (CN)
    #[arg(long, value_name = "NAME")]
    cn: Option<String>,

    /// Organizational unit (OU)
    #[arg(long, value_name = "UNIT")]
    ou: Option<String>,

    /// Organization (O)
    #[arg(long, value_name = "ORG")]
    org: Option<String>,

    /// City or locality (L)
    #[arg(long)]
    locality: Option<String>,

    /// State or province (ST)
    #[arg(long)]
    state: Option<String>,

    /// Two-letter country code (C)
    #[arg(long)]
    country: Option<String>,
}

impl Cli {
    fn certificate_options(&self) -> CertificateOptions {
        CertificateOptions {
            common_name: self.cn.clone(),
            organizational_unit: self.ou.clone(),
            organization: self.org.clone(),
            locality: self.locality.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }
    output::set_quiet(cli.quiet);

    // A second subscriber (tests, embedding) is not fatal
    let _ = devkit_telemetry::init_with_config(TelemetryConfig::from_verbosity(cli.verbose, cli.quiet));

    let exit_code = run(&cli);
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
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

    if !cli.quiet {
        Status::banner("Android Release Keystore Generator");
    }

    let generator =
        KeystoreGenerator::from_config(&project_root, &config.schema.keystore).force(cli.force);

    let mut prompt: Box<dyn Prompt> = if cli.defaults {
        Box::new(NonInteractive)
    } else {
        Box::new(StdioPrompt::stdio())
    };

    match generator.run(prompt.as_mut(), &cli.certificate_options()) {
        Ok(GenerateOutcome::Generated(generated)) => {
            print_summary(&generated, &generator);
            exit_codes::SUCCESS
        }
        Ok(GenerateOutcome::Cancelled) => {
            Status::warning("Keystore generation cancelled, existing files left untouched");
            exit_codes::SUCCESS
        }
        Err(e) => {
            Status::report(&e);
            e.exit_code()
        }
    }
}

fn print_summary(generated: &GeneratedKeystore, generator: &KeystoreGenerator) {
    let layout = generator.layout();
    let credentials = &generated.credentials;

    Status::success(&format!(
        "Keystore created in {}",
        format_duration(generated.elapsed)
    ));
    if generated.gitignore_updated {
        Status::success(&format!(
            "Added signing files to {}",
            layout.display_relative(&layout.gitignore)
        ));
    } else {
        Status::info(&format!(
            "{} already ignores the signing files",
            layout.display_relative(&layout.gitignore)
        ));
    }

    // Secrets go to stdout even with --quiet; this is the only place they are shown
    Status::header("Signing configuration");
    println!("  Keystore:        {}", layout.display_relative(&layout.keystore));
    println!("  Properties:      {}", layout.display_relative(&layout.properties));
    println!("  Key alias:       {}", credentials.key_alias);
    println!("  Store password:  {}", credentials.store_password.bold());
    println!("  Key password:    {}", credentials.key_password.bold());
    println!("  Certificate:     {}", generated.certificate.distinguished_name());

    Status::header("Important");
    println!("  1. Back up the keystore and both passwords somewhere safe.");
    println!("  2. Losing the keystore means you can no longer publish updates to this app.");
    println!("  3. Never commit the keystore or keystore.properties to version control.");
}
