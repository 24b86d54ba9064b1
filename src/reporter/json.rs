//! JSON report generator.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{ComparisonConfig, ComparisonResult};

/// JSON report generator.
///
/// Serializes the comparison result as-is; the stable field names
/// (`type`, `level`, `element`, `before`, `after`, `message` per diff,
/// `left_path`/`right_path`/`diffs`/`summary` at the top level) come from
/// the serde attributes on the result types.
pub struct JsonReporter {
    /// Whether to pretty-print the output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            pretty: config.output.pretty,
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(
        &self,
        result: &ComparisonResult,
        _comparison: &ComparisonConfig,
    ) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(result)
        } else {
            serde_json::to_string(result)
        };

        json.map_err(|e| crate::err!(ReportGeneration {
            message: format!("Failed to serialize JSON report: {e}"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Diff, DiffKind, DiffSummary, Entity, EntityKind, Resource};
    use pretty_assertions::assert_eq;

    fn create_test_result() -> ComparisonResult {
        ComparisonResult {
            left_path: "./old".to_string(),
            right_path: "./new".to_string(),
            diffs: vec![Diff {
                kind: DiffKind::Added,
                level: EntityKind::Resource,
                element: "aws_s3_bucket.bucket".to_string(),
                before: None,
                after: Some(Entity::Resource(Resource {
                    resource_type: "aws_s3_bucket".to_string(),
                    name: "bucket".to_string(),
                    ..Resource::default()
                })),
                message: "Resource 'aws_s3_bucket.bucket' was added".to_string(),
            }],
            summary: DiffSummary {
                added: 1,
                removed: 0,
                modified: 0,
                total: 1,
            },
        }
    }

    #[test]
    fn test_json_report_structure() {
        let result = create_test_result();
        let mut config = Config::default();
        config.output.pretty = false;

        let reporter = JsonReporter::new(&config);
        let json = reporter
            .generate(&result, &ComparisonConfig::default())
            .unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["left_path"], "./old");
        assert_eq!(parsed["right_path"], "./new");
        assert_eq!(parsed["summary"]["added"], 1);
        assert_eq!(parsed["summary"]["total"], 1);
        assert_eq!(parsed["diffs"][0]["type"], "added");
        assert_eq!(parsed["diffs"][0]["level"], "resource");
        assert_eq!(parsed["diffs"][0]["element"], "aws_s3_bucket.bucket");
        assert_eq!(
            parsed["diffs"][0]["message"],
            "Resource 'aws_s3_bucket.bucket' was added"
        );
    }

    #[test]
    fn test_json_report_pretty() {
        let result = create_test_result();
        let mut config = Config::default();
        config.output.pretty = true;

        let reporter = JsonReporter::new(&config);
        let json = reporter
            .generate(&result, &ComparisonConfig::default())
            .unwrap();

        // Pretty output should have newlines
        assert!(json.contains('\n'));
    }
}
