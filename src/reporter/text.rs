//! Hierarchical unified-diff text renderer.
//!
//! Added and removed entities render as synthetic declaration blocks with
//! every line prefixed `+` or `-`. Modified entities render an unprefixed
//! declaration frame with one `-`/`+` pair per differing attribute.
//! Attributes whose value is the opaque sentinel or empty are suppressed,
//! and nested structure differences are shown as whole-value replacements
//! in serialized form rather than being exploded line by line.

use crate::config::Config;
use crate::error::Result;
use crate::reporter::ReportGenerator;
use crate::types::{
    ComparisonConfig, ComparisonResult, DataSource, Diff, DiffKind, Entity, ModuleCall, Output,
    Resource, Variable,
};
use crate::value::{AttrMap, ConfigValue};
use colored::Colorize;
use std::collections::BTreeSet;

/// Text report generator for CLI output.
pub struct TextReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl TextReporter {
    /// Create a new text reporter.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            use_colors: config.output.colored,
        }
    }

    /// Apply color to a rendered line based on its diff prefix.
    fn colorize(&self, line: &str) -> String {
        if !self.use_colors {
            return line.to_string();
        }
        if line.starts_with('+') {
            line.green().to_string()
        } else if line.starts_with('-') {
            line.red().to_string()
        } else {
            line.to_string()
        }
    }
}

impl ReportGenerator for TextReporter {
    fn generate(
        &self,
        result: &ComparisonResult,
        comparison: &ComparisonConfig,
    ) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("--- {}\n", result.left_path));
        output.push_str(&format!("+++ {}\n", result.right_path));

        for diff in &result.diffs {
            let lines = match diff.kind {
                DiffKind::Added => diff
                    .after
                    .as_ref()
                    .map(|entity| prefixed_entity_lines('+', entity, comparison))
                    .unwrap_or_default(),
                DiffKind::Removed => diff
                    .before
                    .as_ref()
                    .map(|entity| prefixed_entity_lines('-', entity, comparison))
                    .unwrap_or_default(),
                DiffKind::Modified => modified_lines(diff, comparison),
            };

            for line in lines {
                output.push_str(&self.colorize(&line));
                output.push('\n');
            }
        }

        Ok(output)
    }
}

/// Render an entity declaration block with every line carrying the given
/// diff prefix.
fn prefixed_entity_lines(
    prefix: char,
    entity: &Entity,
    comparison: &ComparisonConfig,
) -> Vec<String> {
    entity_lines(entity, comparison)
        .into_iter()
        .map(|line| format!("{prefix}{line}"))
        .collect()
}

/// Render an entity as a synthetic declaration block, one line per
/// renderable attribute.
fn entity_lines(entity: &Entity, comparison: &ComparisonConfig) -> Vec<String> {
    match entity {
        Entity::ModuleCall(call) => module_call_lines(call, comparison),
        Entity::Output(output) => output_lines(output),
        Entity::Resource(resource) => resource_lines(resource, comparison),
        Entity::DataSource(data) => data_source_lines(data, comparison),
        Entity::Variable(variable) => variable_lines(variable),
    }
}

fn module_call_lines(call: &ModuleCall, comparison: &ComparisonConfig) -> Vec<String> {
    let mut lines = vec![format!("module \"{}\" {{", call.name)];
    if renderable_scalar(&call.source) {
        lines.push(format!("  source  = \"{}\"", call.source));
    }
    if let Some(version) = call.version.as_deref().filter(|v| renderable_scalar(v)) {
        lines.push(format!("  version = \"{version}\""));
    }
    if !comparison.ignore_arguments {
        lines.extend(attr_lines(&call.args));
    }
    lines.push("}".to_string());
    lines
}

fn output_lines(output: &Output) -> Vec<String> {
    let mut lines = vec![format!("output \"{}\" {{", output.name)];
    if renderable_scalar(&output.description) {
        lines.push(format!("  description = \"{}\"", output.description));
    }
    lines.push(format!("  sensitive = {}", output.sensitive));
    if renderable_scalar(&output.value) {
        lines.push(format!("  value = \"{}\"", output.value));
    }
    lines.push("}".to_string());
    lines
}

fn resource_lines(resource: &Resource, comparison: &ComparisonConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "resource \"{}\" \"{}\" {{",
        resource.resource_type, resource.name
    )];
    if !comparison.ignore_arguments {
        lines.extend(attr_lines(&resource.config));
    }
    lines.push("}".to_string());
    lines
}

fn data_source_lines(data: &DataSource, comparison: &ComparisonConfig) -> Vec<String> {
    let mut lines = vec![format!(
        "data \"{}\" \"{}\" {{",
        data.source_type, data.name
    )];
    if !comparison.ignore_arguments {
        lines.extend(attr_lines(&data.config));
    }
    lines.push("}".to_string());
    lines
}

fn variable_lines(variable: &Variable) -> Vec<String> {
    let mut lines = vec![format!("variable \"{}\" {{", variable.name)];
    if let Some(vtype) = variable.variable_type.as_deref().filter(|t| renderable_scalar(t)) {
        lines.push(format!("  type = \"{vtype}\""));
    }
    if let Some(description) = variable
        .description
        .as_deref()
        .filter(|d| renderable_scalar(d))
    {
        lines.push(format!("  description = \"{description}\""));
    }
    if let Some(rendered) = variable.default_value.as_ref().and_then(render_bare_value) {
        lines.push(format!("  default = {rendered}"));
    }
    lines.push("}".to_string());
    lines
}

/// One `key = value` line per renderable attribute. The map is a `BTreeMap`,
/// so lines come out sorted by key.
fn attr_lines(attrs: &AttrMap) -> Vec<String> {
    attrs
        .iter()
        .filter_map(|(key, value)| {
            render_value(value).map(|rendered| format!("  {key} = {rendered}"))
        })
        .collect()
}

/// Render attribute-level differences for a modified entity: an unprefixed
/// declaration frame around one `-`/`+` pair per differing attribute.
fn modified_lines(diff: &Diff, comparison: &ComparisonConfig) -> Vec<String> {
    match (&diff.before, &diff.after) {
        (Some(Entity::ModuleCall(before)), Some(Entity::ModuleCall(after))) => {
            let mut lines = vec![format!(" module \"{}\" {{", before.name)];
            if before.source != after.source {
                if renderable_scalar(&before.source) {
                    lines.push(format!("-  source  = \"{}\"", before.source));
                }
                if renderable_scalar(&after.source) {
                    lines.push(format!("+  source  = \"{}\"", after.source));
                }
            }
            if before.version != after.version {
                if let Some(v) = before.version.as_deref().filter(|v| renderable_scalar(v)) {
                    lines.push(format!("-  version = \"{v}\""));
                }
                if let Some(v) = after.version.as_deref().filter(|v| renderable_scalar(v)) {
                    lines.push(format!("+  version = \"{v}\""));
                }
            }
            if !comparison.ignore_arguments {
                lines.extend(attr_pair_lines(&before.args, &after.args));
            }
            lines.push(" }".to_string());
            lines
        }

        (Some(Entity::Output(before)), Some(Entity::Output(after))) => {
            let mut lines = vec![format!(" output \"{}\" {{", before.name)];
            if before.description != after.description {
                if renderable_scalar(&before.description) {
                    lines.push(format!("-  description = \"{}\"", before.description));
                }
                if renderable_scalar(&after.description) {
                    lines.push(format!("+  description = \"{}\"", after.description));
                }
            }
            if before.sensitive != after.sensitive {
                lines.push(format!("-  sensitive = {}", before.sensitive));
                lines.push(format!("+  sensitive = {}", after.sensitive));
            }
            if before.value != after.value {
                if renderable_scalar(&before.value) {
                    lines.push(format!("-  value = \"{}\"", before.value));
                }
                if renderable_scalar(&after.value) {
                    lines.push(format!("+  value = \"{}\"", after.value));
                }
            }
            lines.push(" }".to_string());
            lines
        }

        (Some(Entity::Resource(before)), Some(Entity::Resource(after))) => {
            let mut lines = vec![format!(
                " resource \"{}\" \"{}\" {{",
                before.resource_type, before.name
            )];
            if !comparison.ignore_arguments {
                lines.extend(attr_pair_lines(&before.config, &after.config));
            }
            lines.push(" }".to_string());
            lines
        }

        (Some(Entity::DataSource(before)), Some(Entity::DataSource(after))) => {
            let mut lines = vec![format!(
                " data \"{}\" \"{}\" {{",
                before.source_type, before.name
            )];
            if !comparison.ignore_arguments {
                lines.extend(attr_pair_lines(&before.config, &after.config));
            }
            lines.push(" }".to_string());
            lines
        }

        (Some(Entity::Variable(before)), Some(Entity::Variable(after))) => {
            let mut lines = vec![format!(" variable \"{}\" {{", before.name)];
            if before.variable_type != after.variable_type {
                if let Some(t) = before.variable_type.as_deref().filter(|t| renderable_scalar(t)) {
                    lines.push(format!("-  type = \"{t}\""));
                }
                if let Some(t) = after.variable_type.as_deref().filter(|t| renderable_scalar(t)) {
                    lines.push(format!("+  type = \"{t}\""));
                }
            }
            if before.description != after.description {
                if let Some(d) = before.description.as_deref().filter(|d| renderable_scalar(d)) {
                    lines.push(format!("-  description = \"{d}\""));
                }
                if let Some(d) = after.description.as_deref().filter(|d| renderable_scalar(d)) {
                    lines.push(format!("+  description = \"{d}\""));
                }
            }
            if !comparison.ignore_arguments {
                let differs = match (&before.default_value, &after.default_value) {
                    (Some(b), Some(a)) => !b.semantic_eq(a),
                    (None, None) => false,
                    _ => true,
                };
                if differs {
                    if let Some(rendered) =
                        before.default_value.as_ref().and_then(render_bare_value)
                    {
                        lines.push(format!("-  default = {rendered}"));
                    }
                    if let Some(rendered) =
                        after.default_value.as_ref().and_then(render_bare_value)
                    {
                        lines.push(format!("+  default = {rendered}"));
                    }
                }
            }
            lines.push(" }".to_string());
            lines
        }

        // Mismatched payload kinds cannot be produced by the comparators;
        // fall back to the one-line message.
        _ => vec![format!(" {}", diff.message)],
    }
}

/// One `-`/`+` pair per differing body attribute, sorted by attribute key.
/// Attributes present on one side only render a single line. Values that
/// are semantically equal (e.g. reordered JSON strings) emit nothing.
fn attr_pair_lines(before: &AttrMap, after: &AttrMap) -> Vec<String> {
    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    let mut lines = Vec::new();

    for key in keys {
        match (before.get(key), after.get(key)) {
            (Some(before_value), Some(after_value)) => {
                if !before_value.semantic_eq(after_value) {
                    if let Some(rendered) = render_value(before_value) {
                        lines.push(format!("-  {key} = {rendered}"));
                    }
                    if let Some(rendered) = render_value(after_value) {
                        lines.push(format!("+  {key} = {rendered}"));
                    }
                }
            }
            (Some(before_value), None) => {
                if let Some(rendered) = render_value(before_value) {
                    lines.push(format!("-  {key} = {rendered}"));
                }
            }
            (None, Some(after_value)) => {
                if let Some(rendered) = render_value(after_value) {
                    lines.push(format!("+  {key} = {rendered}"));
                }
            }
            (None, None) => {}
        }
    }

    lines
}

/// A scalar header field is renderable unless it is empty or a sentinel.
fn renderable_scalar(s: &str) -> bool {
    !s.is_empty() && !s.starts_with('<')
}

/// Rendered form of a body value: scalars quoted, nested structures as
/// their single-line JSON serialization, opaque and empty values elided.
fn render_value(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Scalar(s) if renderable_scalar(s) => Some(format!("\"{s}\"")),
        ConfigValue::Scalar(_) | ConfigValue::Opaque => None,
        other if other.is_empty() => None,
        other => serde_json::to_string(other).ok(),
    }
}

/// Like [`render_value`] but with scalars unquoted (variable defaults keep
/// their literal form).
fn render_bare_value(value: &ConfigValue) -> Option<String> {
    match value {
        ConfigValue::Scalar(s) if renderable_scalar(s) => Some(s.clone()),
        ConfigValue::Scalar(_) | ConfigValue::Opaque => None,
        other if other.is_empty() => None,
        other => serde_json::to_string(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::compare_modules;
    use crate::types::{ComparisonLevel, ModuleDefinition};
    use pretty_assertions::assert_eq;

    fn plain_reporter() -> TextReporter {
        let mut config = Config::default();
        config.output.colored = false;
        TextReporter::new(&config)
    }

    fn all_levels(ignore_arguments: bool) -> ComparisonConfig {
        ComparisonConfig {
            levels: vec![ComparisonLevel::All],
            ignore_arguments,
        }
    }

    fn scalar(s: &str) -> ConfigValue {
        ConfigValue::Scalar(s.to_string())
    }

    fn resource(rtype: &str, name: &str, config: &[(&str, ConfigValue)]) -> Resource {
        Resource {
            resource_type: rtype.to_string(),
            name: name.to_string(),
            config: config
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            position: None,
        }
    }

    #[test]
    fn test_header_only_when_no_diffs() {
        let result = ComparisonResult {
            left_path: "./old".to_string(),
            right_path: "./new".to_string(),
            ..ComparisonResult::default()
        };
        let text = plain_reporter()
            .generate(&result, &all_levels(true))
            .unwrap();
        assert_eq!(text, "--- ./old\n+++ ./new\n");
    }

    #[test]
    fn test_added_resource_renders_prefixed_block() {
        let left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        right.resources.push(resource(
            "aws_s3_bucket",
            "bucket",
            &[("bucket", scalar("my-bucket")), ("acl", scalar("private"))],
        ));

        let comparison = all_levels(false);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        assert_eq!(
            text,
            "--- ./old\n\
             +++ ./new\n\
             +resource \"aws_s3_bucket\" \"bucket\" {\n\
             +  acl = \"private\"\n\
             +  bucket = \"my-bucket\"\n\
             +}\n"
        );
    }

    #[test]
    fn test_removed_module_call_renders_minus_block() {
        let mut left = ModuleDefinition::new("./old");
        let right = ModuleDefinition::new("./new");
        left.module_calls.push(ModuleCall {
            name: "vpc".to_string(),
            source: "terraform-aws-modules/vpc/aws".to_string(),
            version: Some("~> 5.0".to_string()),
            ..ModuleCall::default()
        });

        let comparison = all_levels(true);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        assert!(text.contains("-module \"vpc\" {"));
        assert!(text.contains("-  source  = \"terraform-aws-modules/vpc/aws\""));
        assert!(text.contains("-  version = \"~> 5.0\""));
        assert!(text.contains("-}"));
    }

    #[test]
    fn test_modified_resource_renders_attribute_pairs() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.resources.push(resource(
            "aws_instance",
            "web",
            &[("ami", scalar("ami-1")), ("monitoring", scalar("true"))],
        ));
        right.resources.push(resource(
            "aws_instance",
            "web",
            &[("ami", scalar("ami-2")), ("instance_type", scalar("t3.micro"))],
        ));

        let comparison = all_levels(false);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        assert_eq!(
            text,
            "--- ./old\n\
             +++ ./new\n\
             \u{20}resource \"aws_instance\" \"web\" {\n\
             -  ami = \"ami-1\"\n\
             +  ami = \"ami-2\"\n\
             +  instance_type = \"t3.micro\"\n\
             -  monitoring = \"true\"\n\
             \u{20}}\n"
        );
    }

    #[test]
    fn test_opaque_attributes_are_suppressed() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.resources.push(resource(
            "aws_instance",
            "web",
            &[("ami", ConfigValue::Opaque), ("zone", scalar("a"))],
        ));
        right.resources.push(resource(
            "aws_instance",
            "web",
            &[("ami", ConfigValue::Opaque), ("zone", scalar("b"))],
        ));

        let comparison = all_levels(false);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        // ami is opaque on both sides: the entity is modified (opaque never
        // equals opaque) but no ami line is rendered.
        assert!(!text.contains("ami"));
        assert!(text.contains("-  zone = \"a\""));
        assert!(text.contains("+  zone = \"b\""));
    }

    #[test]
    fn test_reordered_json_string_emits_no_pair() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.resources.push(resource(
            "aws_iam_policy",
            "p",
            &[("policy", scalar(r#"{"a":1,"b":2}"#)), ("name", scalar("x"))],
        ));
        right.resources.push(resource(
            "aws_iam_policy",
            "p",
            &[("policy", scalar(r#"{"b":2,"a":1}"#)), ("name", scalar("y"))],
        ));

        let comparison = all_levels(false);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        // The name attribute differs; the reordered policy JSON does not.
        assert!(!text.contains("policy"));
        assert!(text.contains("-  name = \"x\""));
    }

    #[test]
    fn test_modified_variable_default_renders_serialized_pair() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.variables.push(Variable {
            name: "zones".to_string(),
            default_value: Some(ConfigValue::List(vec![scalar("a"), scalar("b")])),
            ..Variable::default()
        });
        right.variables.push(Variable {
            name: "zones".to_string(),
            default_value: Some(ConfigValue::List(vec![scalar("a"), scalar("b"), scalar("c")])),
            ..Variable::default()
        });

        let comparison = all_levels(false);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        assert!(text.contains(" variable \"zones\" {"));
        assert!(text.contains(r#"-  default = ["a","b"]"#));
        assert!(text.contains(r#"+  default = ["a","b","c"]"#));
    }

    #[test]
    fn test_modified_output_pairs() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.outputs.push(Output {
            name: "ip".to_string(),
            sensitive: false,
            ..Output::default()
        });
        right.outputs.push(Output {
            name: "ip".to_string(),
            sensitive: true,
            description: "public ip".to_string(),
            ..Output::default()
        });

        let comparison = all_levels(true);
        let result = compare_modules(&left, &right, &comparison);
        let text = plain_reporter().generate(&result, &comparison).unwrap();

        assert!(text.contains(" output \"ip\" {"));
        assert!(text.contains("+  description = \"public ip\""));
        assert!(text.contains("-  sensitive = false"));
        assert!(text.contains("+  sensitive = true"));
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut left = ModuleDefinition::new("./old");
        let mut right = ModuleDefinition::new("./new");
        left.resources.push(resource("aws_instance", "web", &[("ami", scalar("ami-1"))]));
        right.resources.push(resource("aws_instance", "web", &[("ami", scalar("ami-2"))]));
        right.resources.push(resource("aws_s3_bucket", "b", &[]));

        let comparison = all_levels(false);
        let first = plain_reporter()
            .generate(&compare_modules(&left, &right, &comparison), &comparison)
            .unwrap();
        let second = plain_reporter()
            .generate(&compare_modules(&left, &right, &comparison), &comparison)
            .unwrap();
        assert_eq!(first, second);
    }
}
