//! Configuration module for tfdelta.
//!
//! This module handles loading and validating configuration from:
//! - YAML configuration files (`tfdelta.yaml`)
//! - CLI arguments (merged on top by the binary)
//!
//! # Configuration File Format
//!
//! ```yaml
//! # tfdelta.yaml
//!
//! # Comparison options
//! compare:
//!   levels:
//!     - module_calls
//!     - outputs
//!     - resources
//!     - data_sources
//!   ignore_arguments: true
//!
//! # Scanning options
//! scan:
//!   ignore_patterns:
//!     - "*_override.tf"
//!   continue_on_error: false
//!   max_depth: 100
//!
//! # Output options
//! output:
//!   colored: true
//!   pretty: true
//!   verbose: false
//! ```

use crate::error::Result;
use crate::types::{ComparisonConfig, ComparisonLevel};
use serde::{Deserialize, Serialize};

/// Comparison options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareOptions {
    /// Level tokens selecting what to compare. Unrecognized tokens are
    /// silently dropped.
    pub levels: Vec<String>,

    /// Ignore argument/body differences; only headers and identity are
    /// compared.
    pub ignore_arguments: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            levels: vec![
                "module_calls".to_string(),
                "outputs".to_string(),
                "resources".to_string(),
                "data_sources".to_string(),
            ],
            ignore_arguments: true,
        }
    }
}

/// Scanning options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScanOptions {
    /// Patterns to exclude from scanning (glob patterns).
    pub ignore_patterns: Vec<String>,

    /// Continue even if some files fail to parse.
    pub continue_on_error: bool,

    /// Maximum depth for recursive directory scanning.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// Output options.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputOptions {
    /// Use colored output.
    #[serde(default = "default_true")]
    pub colored: bool,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,

    /// Verbose output mode.
    pub verbose: bool,
}

/// The complete tfdelta configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Comparison options
    pub compare: CompareOptions,

    /// Scanning options
    pub scan: ScanOptions,

    /// Output options
    pub output: OutputOptions,
}

impl Config {
    /// Parse a configuration from YAML content.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigParse` error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content).map_err(|e| {
            crate::err!(ConfigParse {
                message: format!("invalid YAML configuration: {e}"),
                source: Some(Box::new(e)),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigValue` error when a value is out of range or a
    /// glob pattern does not compile.
    pub fn validate(&self) -> Result<()> {
        if self.scan.max_depth == 0 {
            return Err(crate::err!(ConfigValue {
                key: "scan.max_depth".to_string(),
                message: "must be greater than zero".to_string(),
            }));
        }

        for pattern in &self.scan.ignore_patterns {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(crate::err!(ConfigValue {
                    key: "scan.ignore_patterns".to_string(),
                    message: format!("invalid glob pattern '{pattern}': {e}"),
                }));
            }
        }

        Ok(())
    }

    /// Build the immutable typed comparison configuration from the level
    /// tokens, silently dropping unrecognized tokens.
    #[must_use]
    pub fn comparison(&self) -> ComparisonConfig {
        ComparisonConfig {
            levels: ComparisonLevel::parse_levels(&self.compare.levels),
            ignore_arguments: self.compare.ignore_arguments,
        }
    }

    /// Example configuration file content for `tfdelta init`.
    #[must_use]
    pub fn example_yaml() -> &'static str {
        r#"# tfdelta configuration file

# Comparison options
compare:
  # Levels to compare: module_calls, outputs, resources, data_sources,
  # variables, or all
  levels:
    - module_calls
    - outputs
    - resources
    - data_sources
  # Ignore argument/body differences
  ignore_arguments: true

# Scanning options
scan:
  # Glob patterns for files to skip
  ignore_patterns: []
  # Keep going when individual files fail to parse
  continue_on_error: false
  # Maximum directory recursion depth
  max_depth: 100

# Output options
output:
  colored: true
  pretty: true
  verbose: false
"#
    }
}

const fn default_true() -> bool {
    true
}

const fn default_max_depth() -> usize {
    100
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.compare.ignore_arguments);
        assert_eq!(config.compare.levels.len(), 4);
        assert_eq!(config.scan.max_depth, 100);
        assert!(!config.scan.continue_on_error);
    }

    #[test]
    fn test_from_yaml_partial_sections() {
        let yaml = r#"
scan:
  ignore_patterns:
    - "*_override.tf"
  continue_on_error: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert!(config.scan.continue_on_error);
        assert!(config
            .scan
            .ignore_patterns
            .contains(&"*_override.tf".to_string()));
        // Untouched sections keep their defaults.
        assert!(config.compare.ignore_arguments);
    }

    #[test]
    fn test_from_yaml_rejects_invalid_yaml() {
        assert!(Config::from_yaml("compare: [not: a map").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_depth() {
        let mut config = Config::default();
        config.scan.max_depth = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_glob() {
        let mut config = Config::default();
        config.scan.ignore_patterns = vec!["[".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_comparison_drops_unknown_levels() {
        let mut config = Config::default();
        config.compare.levels = vec![
            "resources".to_string(),
            "everything".to_string(),
            " all ".to_string(),
        ];
        let comparison = config.comparison();
        assert_eq!(
            comparison.levels,
            vec![ComparisonLevel::Resources, ComparisonLevel::All]
        );
    }

    #[test]
    fn test_example_yaml_round_trips() {
        let config = Config::from_yaml(Config::example_yaml()).unwrap();
        assert!(config.compare.ignore_arguments);
        assert!(config.output.colored);
    }
}
