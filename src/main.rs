//! tfdelta CLI entry point.
//!
//! This binary provides the command-line interface for tfdelta.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use tfdelta::cli::{Cli, Commands, DiffArgs};
use tfdelta::{Config, Differ, TfDeltaError};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    // Run the appropriate command
    match run(cli).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            tracing::error!(error = %e, "Fatal error");

            // Print error with full chain
            eprintln!("Error: {e}");

            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut i = 0;
                while let Some(cause) = source {
                    eprintln!("  {i}: {cause}");
                    source = cause.source();
                    i += 1;
                }
            }

            let code = e
                .downcast_ref::<TfDeltaError>()
                .map_or(2, TfDeltaError::exit_code);
            ExitCode::from(u8::try_from(code).unwrap_or(2))
        }
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        // First try to use RUST_LOG from environment, otherwise use verbose flag
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let base_level = match verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            };
            // Filter string: tfdelta at the requested level, everything else at warn
            EnvFilter::new(format!("warn,tfdelta={base_level}"))
        })
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    tracing::debug!("Loading configuration");
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Diff(args) => {
            let config = apply_diff_args(config, &args);
            let differ = Differ::new(config.clone());

            let result = differ.diff_paths(&args.left, &args.right).await?;

            // Generate report
            let reporter = tfdelta::reporter::Reporter::new(&config);
            let report = reporter.generate(&result, &config.comparison(), args.format)?;

            // Output report
            if let Some(output_path) = args.output {
                std::fs::write(&output_path, &report)?;
                tracing::info!(path = %output_path.display(), "Report written");
            } else {
                print!("{report}");
            }

            // Differences map to exit code 1, like diff(1)
            let exit_code = u8::from(result.has_differences());
            Ok(ExitCode::from(exit_code))
        }

        Commands::Parse(args) => {
            let differ = Differ::new(config.clone());
            let definition = differ.parse_path(&args.path).await?;

            let json = if config.output.pretty {
                serde_json::to_string_pretty(&definition)?
            } else {
                serde_json::to_string(&definition)?
            };

            if let Some(output_path) = args.output {
                std::fs::write(&output_path, &json)?;
                tracing::info!(path = %output_path.display(), "Tree written");
            } else {
                println!("{json}");
            }

            Ok(ExitCode::from(0))
        }

        Commands::Init => {
            // Generate example configuration file
            let config_path = std::path::Path::new("tfdelta.yaml");

            if config_path.exists() {
                anyhow::bail!("Configuration file already exists: {}", config_path.display());
            }

            std::fs::write(config_path, Config::example_yaml())?;
            println!("Created example configuration: tfdelta.yaml");
            Ok(ExitCode::from(0))
        }

        Commands::Validate(args) => {
            // Validate configuration file
            let config_content = std::fs::read_to_string(&args.config)?;
            match Config::from_yaml(&config_content) {
                Ok(_) => {
                    println!("Configuration is valid: {}", args.config.display());
                    Ok(ExitCode::from(0))
                }
                Err(e) => {
                    eprintln!("Configuration error: {e}");
                    Ok(ExitCode::from(1))
                }
            }
        }
    }
}

/// Merge diff command-line flags over the loaded configuration.
fn apply_diff_args(mut config: Config, args: &DiffArgs) -> Config {
    if !args.levels.is_empty() {
        config.compare.levels = args.levels.clone();
    }
    if let Some(ignore_arguments) = args.ignore_args {
        config.compare.ignore_arguments = ignore_arguments;
    }
    if args.no_color {
        config.output.colored = false;
    }
    if args.continue_on_error {
        config.scan.continue_on_error = true;
    }
    config
        .scan
        .ignore_patterns
        .extend(args.ignore_patterns.iter().cloned());
    config
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    // Check for explicit config file
    if let Some(ref config_path) = cli.config {
        tracing::debug!(path = %config_path.display(), "Loading configuration from explicit path");
        let content = std::fs::read_to_string(config_path)?;
        return Ok(Config::from_yaml(&content)?);
    }

    // Look for default config files
    let default_paths = ["tfdelta.yaml", "tfdelta.yml", ".tfdelta.yaml"];
    for path in &default_paths {
        if std::path::Path::new(path).exists() {
            tracing::debug!(path = %path, "Found configuration file");
            let content = std::fs::read_to_string(path)?;
            return Ok(Config::from_yaml(&content)?);
        }
    }

    tracing::debug!("No configuration file found, using default configuration");
    Ok(Config::default())
}
