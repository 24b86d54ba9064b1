//! Command-line interface module.
//!
//! This module defines the CLI structure using Clap, including
//! all commands, arguments, and options.
//!
//! # Commands
//!
//! - `diff`: Compare two module directories and report differences
//! - `parse`: Dump the normalized tree of one module directory as JSON
//! - `init`: Create an example configuration file
//! - `validate`: Validate a configuration file
//!
//! # Example Usage
//!
//! ```bash
//! # Compare two versions of a module
//! tfdelta diff ./modules/vpc-v1 ./modules/vpc-v2
//!
//! # Compare everything including argument bodies
//! tfdelta diff ./old ./new -l all --ignore-args=false
//!
//! # Machine-readable output
//! tfdelta diff ./old ./new --format json --output report.json
//!
//! # Inspect the normalized tree
//! tfdelta parse ./modules/vpc
//!
//! # Initialize configuration
//! tfdelta init
//! ```

use crate::types::ReportFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// tfdelta - semantic diff for Terraform/OpenTofu module directories.
#[derive(Parser, Debug)]
#[command(
    name = "tfdelta",
    author,
    version,
    about = "Semantic diff for Terraform/OpenTofu module directories",
    long_about = "tfdelta parses two versions of a Terraform/OpenTofu module and reports \
                  semantic differences between them, tolerant of cosmetic reordering and \
                  of equivalent-but-differently-serialized structured values."
)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "TFDELTA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare two module directories
    #[command(visible_alias = "d")]
    Diff(DiffArgs),

    /// Parse a module directory and print its normalized tree as JSON
    #[command(visible_alias = "p")]
    Parse(ParseArgs),

    /// Create an example configuration file
    Init,

    /// Validate a configuration file
    Validate(ValidateArgs),
}

/// Arguments for the diff command.
#[derive(Args, Debug)]
pub struct DiffArgs {
    /// Path to the left (old) module directory
    #[arg(value_name = "LEFT")]
    pub left: PathBuf,

    /// Path to the right (new) module directory
    #[arg(value_name = "RIGHT")]
    pub right: PathBuf,

    /// Comparison levels: module_calls, outputs, resources, data_sources,
    /// variables, all (overrides the configuration file when given)
    #[arg(short = 'l', long = "level", value_name = "LEVEL", value_delimiter = ',')]
    pub levels: Vec<String>,

    /// Ignore argument differences (overrides the configuration file)
    #[arg(
        long = "ignore-args",
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub ignore_args: Option<bool>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: ReportFormat,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Glob patterns for files to skip (repeatable)
    #[arg(long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Continue even if some files fail to parse
    #[arg(long)]
    pub continue_on_error: bool,
}

/// Arguments for the parse command.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Path to the module directory to parse
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output file path (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(value_name = "FILE", default_value = "tfdelta.yaml")]
    pub config: PathBuf,
}
