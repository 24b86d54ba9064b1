//! HCL file parser implementation.
//!
//! This module provides the source-to-tree translation using the `hcl-rs`
//! crate: it walks a module directory, parses each Terraform file, and
//! evaluates attribute expressions into the semantic value model.

use crate::config::Config;
use crate::error::{ErrorCollector, Result, TfDeltaError};
use crate::parser::{is_terraform_file, Parser, SKIP_FILES};
use crate::types::{DataSource, ModuleCall, ModuleDefinition, Output, Resource, Variable};
use crate::value::{AttrMap, BlockMap, ConfigValue, NESTED_BLOCKS_KEY, OPAQUE_SENTINEL};

use hcl::{Block, Body, Expression};
use std::path::Path;
use walkdir::WalkDir;

/// HCL parser for Terraform/OpenTofu module directories.
///
/// The parser walks a directory, reads Terraform files, and produces the
/// normalized [`ModuleDefinition`] tree the comparison engine consumes.
pub struct HclParser {
    /// Configuration for parsing behavior
    config: Config,
}

impl HclParser {
    /// Create a new HCL parser with the given configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Parse all Terraform files in a directory into one module definition.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory doesn't exist or if parsing fails
    /// for any file (unless `continue_on_error` is enabled in config).
    pub async fn parse_directory(&self, path: &Path) -> Result<ModuleDefinition> {
        if !path.exists() {
            return Err(crate::err!(DirectoryNotFound {
                path: path.to_path_buf(),
            }));
        }

        let mut definition = ModuleDefinition::new(path.display().to_string());
        let mut error_collector = ErrorCollector::new();

        // The root itself is exempt from skip rules so that module
        // directories with leading-dot names still parse.
        for entry in WalkDir::new(path)
            .max_depth(self.config.scan.max_depth)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !self.should_skip(e.path()))
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to read directory entry");
                    continue;
                }
            };

            let file_path = entry.path();
            if file_path.is_dir() || !is_terraform_file(file_path) {
                continue;
            }

            tracing::debug!(file = %file_path.display(), "Parsing file");

            match self.parse_file(file_path).await {
                Ok(parsed) => definition.merge(parsed),
                Err(e) => {
                    if self.config.scan.continue_on_error && e.is_recoverable() {
                        tracing::warn!(
                            file = %file_path.display(),
                            "failed to parse file, continuing: {}",
                            e
                        );
                        error_collector.add(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        tracing::info!(
            path = %path.display(),
            module_calls = definition.module_calls.len(),
            resources = definition.resources.len(),
            data_sources = definition.data_sources.len(),
            outputs = definition.outputs.len(),
            variables = definition.variables.len(),
            errors = error_collector.count(),
            "Parsing complete"
        );

        Ok(definition)
    }

    /// Parse a single Terraform file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn parse_file(&self, path: &Path) -> Result<ModuleDefinition> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| TfDeltaError::io(path, e, file!(), line!()))?;

        self.parse_content(&content, path)
    }

    /// Check if a path should be skipped.
    fn should_skip(&self, path: &Path) -> bool {
        if let Some(file_name) = path.file_name().and_then(|n| n.to_str()) {
            // Skip hidden files/directories
            if file_name.starts_with('.') {
                tracing::debug!(path = %path.display(), reason = "hidden file/directory", "Skipping path");
                return true;
            }

            if SKIP_FILES.iter().any(|s| file_name == *s) {
                tracing::debug!(path = %path.display(), reason = "known skip file", "Skipping path");
                return true;
            }

            if self.config.scan.ignore_patterns.iter().any(|pattern| {
                glob::Pattern::new(pattern)
                    .map(|p| p.matches(file_name))
                    .unwrap_or(false)
            }) {
                tracing::debug!(path = %path.display(), reason = "matches ignore pattern", "Skipping path");
                return true;
            }
        }

        false
    }
}

impl Parser for HclParser {
    fn parse_content(&self, content: &str, file_path: &Path) -> Result<ModuleDefinition> {
        let body: Body = hcl::from_str(content).map_err(|e| crate::err!(HclParse {
            file: file_path.to_path_buf(),
            message: e.to_string(),
        }))?;

        let mut definition = ModuleDefinition::new(file_path.display().to_string());

        for structure in body.into_inner() {
            if let hcl::Structure::Block(block) = structure {
                match block.identifier.as_str() {
                    "module" => definition
                        .module_calls
                        .push(parse_module_block(&block, file_path)?),
                    "resource" => definition
                        .resources
                        .push(parse_resource_block(&block, file_path)?),
                    "data" => definition
                        .data_sources
                        .push(parse_data_block(&block, file_path)?),
                    "output" => definition
                        .outputs
                        .push(parse_output_block(&block, file_path)?),
                    "variable" => definition
                        .variables
                        .push(parse_variable_block(&block, file_path)?),
                    _ => {
                        // Ignore other block types (terraform, provider, locals, etc.)
                    }
                }
            }
        }

        Ok(definition)
    }
}

/// Parse a `module` block into a [`ModuleCall`].
fn parse_module_block(block: &Block, file_path: &Path) -> Result<ModuleCall> {
    let name = single_label(block, file_path, "module")?;

    let mut call = ModuleCall {
        name,
        position: position_of(file_path),
        ..ModuleCall::default()
    };

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "source" => call.source = scalar_string(&attr.expr),
            "version" => call.version = Some(scalar_string(&attr.expr)),
            key => {
                call.args
                    .insert(key.to_string(), expression_to_value(&attr.expr));
            }
        }
    }

    Ok(call)
}

/// Parse a `resource` block into a [`Resource`].
fn parse_resource_block(block: &Block, file_path: &Path) -> Result<Resource> {
    let (resource_type, name) = double_label(block, file_path, "resource")?;

    Ok(Resource {
        resource_type,
        name,
        config: convert_body(&block.body),
        position: position_of(file_path),
    })
}

/// Parse a `data` block into a [`DataSource`].
fn parse_data_block(block: &Block, file_path: &Path) -> Result<DataSource> {
    let (source_type, name) = double_label(block, file_path, "data")?;

    Ok(DataSource {
        source_type,
        name,
        config: convert_body(&block.body),
        position: position_of(file_path),
    })
}

/// Parse an `output` block into an [`Output`].
fn parse_output_block(block: &Block, file_path: &Path) -> Result<Output> {
    let name = single_label(block, file_path, "output")?;

    let mut output = Output {
        name,
        position: position_of(file_path),
        ..Output::default()
    };

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "description" => output.description = scalar_string(&attr.expr),
            "sensitive" => output.sensitive = scalar_string(&attr.expr) == "true",
            "value" => output.value = scalar_string(&attr.expr),
            _ => {}
        }
    }

    Ok(output)
}

/// Parse a `variable` block into a [`Variable`].
fn parse_variable_block(block: &Block, file_path: &Path) -> Result<Variable> {
    let name = single_label(block, file_path, "variable")?;

    let mut variable = Variable {
        name,
        position: position_of(file_path),
        ..Variable::default()
    };

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "type" => variable.variable_type = Some(type_string(&attr.expr)),
            "description" => variable.description = Some(scalar_string(&attr.expr)),
            "default" => variable.default_value = Some(expression_to_value(&attr.expr)),
            _ => {}
        }
    }

    Ok(variable)
}

/// Convert a block body into an attribute map, folding repeatable nested
/// blocks under the reserved `_blocks` key. Applied recursively, so a block
/// nested inside a block contributes to that block object's own `_blocks`.
fn convert_body(body: &Body) -> AttrMap {
    let mut attrs = AttrMap::new();
    let mut blocks = BlockMap::new();

    for structure in body.clone().into_inner() {
        match structure {
            hcl::Structure::Attribute(attr) => {
                attrs.insert(attr.key.as_str().to_string(), expression_to_value(&attr.expr));
            }
            hcl::Structure::Block(nested) => {
                blocks
                    .entry(block_key(&nested))
                    .or_default()
                    .push(convert_body(&nested.body));
            }
        }
    }

    if !blocks.is_empty() {
        attrs.insert(
            NESTED_BLOCKS_KEY.to_string(),
            ConfigValue::BlockSet(blocks),
        );
    }

    attrs
}

/// Block-set key for a nested block: the type, plus any labels joined
/// with dots (e.g. `provisioner.local-exec`).
fn block_key(block: &Block) -> String {
    let mut key = block.identifier.as_str().to_string();
    for label in &block.labels {
        key.push('.');
        key.push_str(label.as_str());
    }
    key
}

/// Evaluate an expression into a semantic value. Literals, arrays, and
/// objects evaluate structurally; everything else (templates, references,
/// function calls, conditionals) becomes the opaque sentinel.
fn expression_to_value(expr: &Expression) -> ConfigValue {
    match expr {
        Expression::Null => ConfigValue::Scalar("null".to_string()),
        Expression::String(s) => ConfigValue::Scalar(s.clone()),
        Expression::Number(n) => ConfigValue::Scalar(n.to_string()),
        Expression::Bool(b) => ConfigValue::Scalar(b.to_string()),
        Expression::Array(items) => {
            ConfigValue::List(items.iter().map(expression_to_value).collect())
        }
        Expression::Object(obj) => {
            let mut map = AttrMap::new();
            for (key, value) in obj {
                map.insert(object_key_to_string(key), expression_to_value(value));
            }
            ConfigValue::Object(map)
        }
        _ => ConfigValue::Opaque,
    }
}

/// Evaluate an expression into its textual form for scalar header fields.
/// Structured values are carried as their JSON serialization; unresolvable
/// expressions become the sentinel string.
fn scalar_string(expr: &Expression) -> String {
    match expression_to_value(expr) {
        ConfigValue::Scalar(s) => s,
        ConfigValue::Opaque => OPAQUE_SENTINEL.to_string(),
        value => serde_json::to_string(&value)
            .unwrap_or_else(|_| OPAQUE_SENTINEL.to_string()),
    }
}

/// Textual form of a variable `type` expression. Bare type keywords
/// (`string`, `number`) surface as identifiers rather than the sentinel.
fn type_string(expr: &Expression) -> String {
    match expr {
        Expression::Variable(variable) => variable.to_string(),
        _ => scalar_string(expr),
    }
}

/// Convert an object key to a string.
fn object_key_to_string(key: &hcl::ObjectKey) -> String {
    match key {
        hcl::ObjectKey::Identifier(id) => id.as_str().to_string(),
        hcl::ObjectKey::Expression(expr) => scalar_string(expr),
        _ => String::new(),
    }
}

/// Position string recorded on parsed entities (file name only; hcl-rs
/// doesn't expose line numbers easily).
fn position_of(file_path: &Path) -> Option<String> {
    file_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
}

fn single_label(block: &Block, file_path: &Path, block_type: &str) -> Result<String> {
    if block.labels.len() != 1 {
        return Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("{block_type} block must have exactly one label"),
        }));
    }
    Ok(block.labels[0].as_str().to_string())
}

fn double_label(block: &Block, file_path: &Path, block_type: &str) -> Result<(String, String)> {
    if block.labels.len() != 2 {
        return Err(crate::err!(HclStructure {
            file: file_path.to_path_buf(),
            message: format!("{block_type} block must have exactly two labels"),
        }));
    }
    Ok((
        block.labels[0].as_str().to_string(),
        block.labels[1].as_str().to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_parser() -> HclParser {
        HclParser::new(&Config::default())
    }

    #[test]
    fn test_parse_simple_resource() {
        let parser = create_test_parser();
        let content = r#"
resource "aws_instance" "web" {
  ami           = "ami-0c02fb55956c7d316"
  instance_type = "t3.micro"
  count         = 2
}
"#;

        let result = parser
            .parse_content(content, Path::new("main.tf"))
            .unwrap();

        assert_eq!(result.resources.len(), 1);
        let resource = &result.resources[0];
        assert_eq!(resource.address(), "aws_instance.web");
        assert_eq!(
            resource.config.get("ami"),
            Some(&ConfigValue::Scalar("ami-0c02fb55956c7d316".to_string()))
        );
        assert_eq!(
            resource.config.get("count"),
            Some(&ConfigValue::Scalar("2".to_string()))
        );
        assert_eq!(resource.position.as_deref(), Some("main.tf"));
    }

    #[test]
    fn test_parse_resource_with_nested_blocks() {
        let parser = create_test_parser();
        let content = r#"
resource "aws_security_group" "example" {
  name = "example"

  ingress {
    from_port = 80
    to_port   = 80
    protocol  = "tcp"
  }

  ingress {
    from_port = 22
    to_port   = 22
    protocol  = "tcp"
  }

  egress {
    from_port = 0
    to_port   = 0
    protocol  = "-1"
  }
}
"#;

        let result = parser
            .parse_content(content, Path::new("main.tf"))
            .unwrap();

        let resource = &result.resources[0];
        let Some(ConfigValue::BlockSet(blocks)) = resource.config.get(NESTED_BLOCKS_KEY) else {
            panic!("expected a block set under {NESTED_BLOCKS_KEY}");
        };

        assert_eq!(blocks.get("ingress").map(Vec::len), Some(2));
        assert_eq!(blocks.get("egress").map(Vec::len), Some(1));
        assert_eq!(
            blocks["egress"][0].get("protocol"),
            Some(&ConfigValue::Scalar("-1".to_string()))
        );
    }

    #[test]
    fn test_parse_module_call() {
        let parser = create_test_parser();
        let content = r#"
module "vpc" {
  source  = "terraform-aws-modules/vpc/aws"
  version = "~> 5.0"

  name = "my-vpc"
  cidr = "10.0.0.0/16"
}
"#;

        let result = parser
            .parse_content(content, Path::new("main.tf"))
            .unwrap();

        assert_eq!(result.module_calls.len(), 1);
        let call = &result.module_calls[0];
        assert_eq!(call.name, "vpc");
        assert_eq!(call.source, "terraform-aws-modules/vpc/aws");
        assert_eq!(call.version.as_deref(), Some("~> 5.0"));
        assert_eq!(
            call.args.get("cidr"),
            Some(&ConfigValue::Scalar("10.0.0.0/16".to_string()))
        );
        // source/version are extracted as headers, not arguments
        assert!(!call.args.contains_key("source"));
    }

    #[test]
    fn test_parse_output_block() {
        let parser = create_test_parser();
        let content = r#"
output "instance_ip" {
  description = "Public IP of the instance"
  sensitive   = true
  value       = aws_instance.web.public_ip
}
"#;

        let result = parser
            .parse_content(content, Path::new("outputs.tf"))
            .unwrap();

        assert_eq!(result.outputs.len(), 1);
        let output = &result.outputs[0];
        assert_eq!(output.name, "instance_ip");
        assert_eq!(output.description, "Public IP of the instance");
        assert!(output.sensitive);
        // Attribute references are not statically evaluable.
        assert_eq!(output.value, OPAQUE_SENTINEL);
    }

    #[test]
    fn test_parse_variable_block() {
        let parser = create_test_parser();
        let content = r#"
variable "availability_zones" {
  type        = list(string)
  description = "Zones to spread across"
  default     = ["eu-west-1a", "eu-west-1b"]
}

variable "region" {
  type    = string
  default = "eu-west-1"
}
"#;

        let result = parser
            .parse_content(content, Path::new("variables.tf"))
            .unwrap();

        assert_eq!(result.variables.len(), 2);
        let zones = &result.variables[0];
        assert_eq!(zones.name, "availability_zones");
        assert_eq!(
            zones.default_value,
            Some(ConfigValue::List(vec![
                ConfigValue::Scalar("eu-west-1a".to_string()),
                ConfigValue::Scalar("eu-west-1b".to_string()),
            ]))
        );

        // Bare type keywords surface as identifiers
        let region = &result.variables[1];
        assert_eq!(region.variable_type.as_deref(), Some("string"));
    }

    #[test]
    fn test_parse_object_attribute() {
        let parser = create_test_parser();
        let content = r#"
resource "aws_instance" "web" {
  tags = {
    Name = "web"
    Env  = "prod"
  }
}
"#;

        let result = parser
            .parse_content(content, Path::new("main.tf"))
            .unwrap();

        let resource = &result.resources[0];
        let Some(ConfigValue::Object(tags)) = resource.config.get("tags") else {
            panic!("expected tags to be an object");
        };
        assert_eq!(tags.get("Name"), Some(&ConfigValue::Scalar("web".to_string())));
        assert_eq!(tags.get("Env"), Some(&ConfigValue::Scalar("prod".to_string())));
    }

    #[test]
    fn test_complex_expressions_become_opaque() {
        let parser = create_test_parser();
        let content = r#"
resource "aws_instance" "web" {
  ami  = var.ami_id
  name = "web-${var.env}"
}
"#;

        let result = parser
            .parse_content(content, Path::new("main.tf"))
            .unwrap();

        let resource = &result.resources[0];
        assert_eq!(resource.config.get("ami"), Some(&ConfigValue::Opaque));
        assert_eq!(resource.config.get("name"), Some(&ConfigValue::Opaque));
    }

    #[test]
    fn test_parse_invalid_hcl() {
        let parser = create_test_parser();
        let content = "this is not valid { hcl";

        let result = parser.parse_content(content, Path::new("main.tf"));
        assert!(result.is_err());
    }

    #[test]
    fn test_resource_label_count_is_enforced() {
        let parser = create_test_parser();
        let content = r#"
resource "only_one_label" {
  ami = "ami-1"
}
"#;

        let result = parser.parse_content(content, Path::new("main.tf"));
        assert!(matches!(
            result,
            Err(TfDeltaError::HclStructure { .. })
        ));
    }

    #[test]
    fn test_should_skip() {
        let parser = create_test_parser();

        assert!(parser.should_skip(Path::new(".terraform")));
        assert!(parser.should_skip(Path::new(".git")));
        assert!(parser.should_skip(Path::new(".terragrunt-cache")));
        assert!(!parser.should_skip(Path::new("modules")));
        assert!(!parser.should_skip(Path::new("main.tf")));
    }

    #[test]
    fn test_should_skip_ignore_patterns() {
        let mut config = Config::default();
        config.scan.ignore_patterns = vec!["*_override.tf".to_string()];
        let parser = HclParser::new(&config);

        assert!(parser.should_skip(Path::new("main_override.tf")));
        assert!(!parser.should_skip(Path::new("main.tf")));
    }

    #[tokio::test]
    async fn test_parse_directory_merges_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_instance\" \"web\" {\n  ami = \"ami-1\"\n}\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("variables.tf"),
            "variable \"region\" {\n  default = \"eu-west-1\"\n}\n",
        )
        .unwrap();

        let parser = create_test_parser();
        let definition = parser.parse_directory(dir.path()).await.unwrap();

        assert_eq!(definition.resources.len(), 1);
        assert_eq!(definition.variables.len(), 1);
        assert_eq!(definition.path, dir.path().display().to_string());
    }

    #[tokio::test]
    async fn test_parse_directory_missing() {
        let parser = create_test_parser();
        let result = parser
            .parse_directory(Path::new("/definitely/not/here"))
            .await;
        assert!(matches!(
            result,
            Err(TfDeltaError::DirectoryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_parse_directory_continue_on_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.tf"), "not { valid hcl").unwrap();
        std::fs::write(
            dir.path().join("main.tf"),
            "resource \"aws_instance\" \"web\" {}\n",
        )
        .unwrap();

        let strict = create_test_parser();
        assert!(strict.parse_directory(dir.path()).await.is_err());

        let mut config = Config::default();
        config.scan.continue_on_error = true;
        let lenient = HclParser::new(&config);
        let definition = lenient.parse_directory(dir.path()).await.unwrap();
        assert_eq!(definition.resources.len(), 1);
    }
}
