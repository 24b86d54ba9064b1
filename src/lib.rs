//! # tfdelta
//!
//! A semantic diff tool for Terraform/OpenTofu module directories.
//!
//! tfdelta parses two versions of a module into normalized configuration
//! trees, compares them entity by entity (module calls, outputs, resources,
//! data sources, variables), and reports added/removed/modified
//! differences. The comparison is semantic, not textual:
//!
//! - **JSON-order invariance**: a JSON-encoded string attribute with
//!   reordered keys is not a difference
//! - **Block-set order invariance**: repeated nested blocks (e.g.
//!   `ingress {}`) match order-independently
//! - **List order sensitivity**: list values are compared element by
//!   element, in order
//! - **Opaque expressions**: values that cannot be evaluated statically
//!   never compare equal
//!
//! ## Example
//!
//! ```rust,no_run
//! use tfdelta::{Config, Differ, ReportFormat};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let differ = Differ::new(config.clone());
//!
//!     let result = differ.diff_paths("./module-v1", "./module-v2").await?;
//!     println!("{} differences", result.summary.total);
//!
//!     let reporter = tfdelta::reporter::Reporter::new(&config);
//!     let report = reporter.generate(&result, &config.comparison(), ReportFormat::Text)?;
//!     println!("{report}");
//!
//!     Ok(())
//! }
//! ```

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod cli;
pub mod compare;
pub mod config;
pub mod error;
pub mod parser;
pub mod reporter;
pub mod types;
pub mod value;

// Re-export commonly used types at crate root
pub use compare::compare_modules;
pub use config::Config;
pub use error::{Result, TfDeltaError};
pub use types::{
    ComparisonConfig, ComparisonLevel, ComparisonResult, DiffKind, ModuleDefinition, ReportFormat,
};
pub use value::ConfigValue;

use std::path::Path;

/// Main orchestrator that coordinates parsing and comparison.
///
/// The `Differ` is the primary entry point for using tfdelta as a library.
/// It validates both module directories, parses them concurrently, and runs
/// the comparison engine under the configured levels.
///
/// # Example
///
/// ```rust,no_run
/// use tfdelta::{Config, Differ};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let differ = Differ::new(Config::default());
///     let result = differ.diff_paths("./old", "./new").await?;
///     for diff in &result.diffs {
///         println!("{}", diff.message);
///     }
///     Ok(())
/// }
/// ```
pub struct Differ {
    config: Config,
}

impl Differ {
    /// Create a new differ with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compare two module directories.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory is missing, contains no
    /// Terraform files, or fails to parse.
    pub async fn diff_paths<P: AsRef<Path>>(&self, left: P, right: P) -> Result<ComparisonResult> {
        let left = left.as_ref();
        let right = right.as_ref();

        parser::validate_module_directory(left)?;
        parser::validate_module_directory(right)?;

        let hcl_parser = parser::HclParser::new(&self.config);

        tracing::info!(
            left = %left.display(),
            right = %right.display(),
            "Comparing modules"
        );

        let (left_definition, right_definition) = tokio::try_join!(
            hcl_parser.parse_directory(left),
            hcl_parser.parse_directory(right)
        )?;

        let comparison = self.config.comparison();
        Ok(compare::compare_modules(
            &left_definition,
            &right_definition,
            &comparison,
        ))
    }

    /// Parse a single module directory into its normalized tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory is missing, contains no Terraform
    /// files, or fails to parse.
    pub async fn parse_path<P: AsRef<Path>>(&self, path: P) -> Result<ModuleDefinition> {
        let path = path.as_ref();
        parser::validate_module_directory(path)?;

        let hcl_parser = parser::HclParser::new(&self.config);
        hcl_parser.parse_directory(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_differ_creation() {
        let config = Config::default();
        let _differ = Differ::new(config);
    }
}
