//! Report generation module.
//!
//! This module renders a [`crate::types::ComparisonResult`] in multiple
//! formats:
//! - Text: human-readable hierarchical unified-diff-like output
//! - JSON: machine-readable structured output with stable field names
//!
//! Rendering is pure: the same result and configuration always produce the
//! same text.

mod json;
mod text;

use crate::config::Config;
use crate::error::Result;
use crate::types::{ComparisonConfig, ComparisonResult, ReportFormat};

pub use json::JsonReporter;
pub use text::TextReporter;

/// Report generator that supports multiple output formats.
pub struct Reporter {
    config: Config,
}

impl Reporter {
    /// Create a new reporter with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Generate a report in the specified format.
    ///
    /// The comparison configuration must be the one the result was produced
    /// under; it gates which attributes the text renderer shows.
    ///
    /// # Errors
    ///
    /// Returns an error if report generation fails.
    pub fn generate(
        &self,
        result: &ComparisonResult,
        comparison: &ComparisonConfig,
        format: ReportFormat,
    ) -> Result<String> {
        match format {
            ReportFormat::Json => JsonReporter::new(&self.config).generate(result, comparison),
            ReportFormat::Text => TextReporter::new(&self.config).generate(result, comparison),
        }
    }
}

/// Trait for report generators.
pub trait ReportGenerator {
    /// Render a comparison result.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn generate(
        &self,
        result: &ComparisonResult,
        comparison: &ComparisonConfig,
    ) -> Result<String>;
}
