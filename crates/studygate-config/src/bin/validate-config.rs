//! Config validation CLI tool
//!
//! Validates a studygate configuration file and reports any errors.

use std::path::PathBuf;
use std::process::ExitCode;
use studygate_util::{default_config_path, format_study_time};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let config_path = match args.get(1) {
        Some(path) => PathBuf::from(path),
        None => {
            let default_path = default_config_path();
            eprintln!("Usage: validate-config [config-file]");
            eprintln!();
            eprintln!("Validates a studygate configuration file.");
            eprintln!();
            eprintln!("If no path is provided, uses: {}", default_path.display());
            eprintln!();
            eprintln!("Example:");
            eprintln!("  validate-config {}", default_path.display());
            eprintln!("  validate-config config.example.toml");
            return ExitCode::from(2);
        }
    };

    if !config_path.exists() {
        eprintln!("Error: Configuration file not found: {}", config_path.display());
        return ExitCode::from(1);
    }

    match studygate_config::load_config(&config_path) {
        Ok(settings) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Summary:");
            println!("  Config version: {}", studygate_config::CURRENT_CONFIG_VERSION);
            println!(
                "  Session lifetime: {}h",
                settings.session.ttl.as_secs() / 3600
            );
            println!("  Login page: {}", settings.session.login_path);
            println!(
                "  Daily goal: {}",
                format_study_time(settings.tracker.daily_goal_minutes)
            );
            println!(
                "  Minimum interval: {}",
                format_study_time(settings.tracker.min_interval_minutes)
            );
            println!("  Data directory: {}", settings.storage.data_dir.display());
            println!("  Users: {}", settings.users.len());

            for user in &settings.users {
                println!("  - {}", user.username);
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed");
            eprintln!();
            match &e {
                studygate_config::ConfigError::ReadError(io_err) => {
                    eprintln!("Failed to read file: {}", io_err);
                }
                studygate_config::ConfigError::ParseError(parse_err) => {
                    eprintln!("TOML parse error:");
                    eprintln!("  {}", parse_err);
                }
                studygate_config::ConfigError::ValidationFailed { errors } => {
                    eprintln!("Validation errors ({}):", errors.len());
                    for err in errors {
                        eprintln!("  - {}", err);
                    }
                }
                studygate_config::ConfigError::UnsupportedVersion(ver) => {
                    eprintln!(
                        "Unsupported config version: {} (expected {})",
                        ver,
                        studygate_config::CURRENT_CONFIG_VERSION
                    );
                }
            }
            ExitCode::from(1)
        }
    }
}
