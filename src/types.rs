//! Core data types used throughout tfdelta.
//!
//! This module defines the fundamental data structures for representing:
//! - Normalized configuration trees (entities and their bodies)
//! - Comparison configuration (levels, argument gating)
//! - Classified differences and the comparison result

use crate::value::{AttrMap, ConfigValue};
use serde::{Deserialize, Serialize};

/// Represents a module call in a Terraform configuration.
///
/// # Example HCL
///
/// ```hcl
/// module "vpc" {
///   source  = "terraform-aws-modules/vpc/aws"
///   version = "~> 5.0"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModuleCall {
    /// The name/label of the module block (e.g., "vpc")
    pub name: String,

    /// The source of the module (registry path, Git URL, or local path)
    pub source: String,

    /// Version constraint, if specified
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Remaining arguments of the module block
    #[serde(skip_serializing_if = "AttrMap::is_empty")]
    pub args: AttrMap,

    /// File the block was declared in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Represents an output value declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Output {
    /// The name/label of the output block
    pub name: String,

    /// Description attribute, empty when absent
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Whether the output is marked sensitive
    pub sensitive: bool,

    /// The output value in textual form (sentinel when unresolvable)
    #[serde(skip_serializing_if = "String::is_empty")]
    pub value: String,

    /// File the block was declared in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Represents a managed resource declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Resource {
    /// Resource type (e.g., "aws_instance")
    #[serde(rename = "type")]
    pub resource_type: String,

    /// Resource name (the second label)
    pub name: String,

    /// Attribute bag; repeatable nested blocks live under the reserved
    /// `_blocks` key as a [`ConfigValue::BlockSet`]
    #[serde(skip_serializing_if = "AttrMap::is_empty")]
    pub config: AttrMap,

    /// File the block was declared in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Resource {
    /// Identity key used to match resources across two trees.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}.{}", self.resource_type, self.name)
    }
}

/// Represents a data source declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DataSource {
    /// Data source type (e.g., "aws_ami")
    #[serde(rename = "type")]
    pub source_type: String,

    /// Data source name (the second label)
    pub name: String,

    /// Attribute bag, same conventions as [`Resource::config`]
    #[serde(skip_serializing_if = "AttrMap::is_empty")]
    pub config: AttrMap,

    /// File the block was declared in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl DataSource {
    /// Identity key used to match data sources across two trees.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}.{}", self.source_type, self.name)
    }
}

/// Represents an input variable declaration.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Variable {
    /// The name/label of the variable block
    pub name: String,

    /// Type expression in textual form
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<String>,

    /// Description attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Default value, compared through the semantic value model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<ConfigValue>,

    /// File the block was declared in
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// The complete normalized definition of one module directory.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ModuleDefinition {
    /// Path the module was read from
    pub path: String,

    /// Module call blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub module_calls: Vec<ModuleCall>,

    /// Output blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Output>,

    /// Resource blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<Resource>,

    /// Data source blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_sources: Vec<DataSource>,

    /// Variable blocks
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<Variable>,
}

impl ModuleDefinition {
    /// Create an empty definition for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Merge entities parsed from another file into this definition.
    /// The receiver keeps its own path.
    pub fn merge(&mut self, other: Self) {
        self.module_calls.extend(other.module_calls);
        self.outputs.extend(other.outputs);
        self.resources.extend(other.resources);
        self.data_sources.extend(other.data_sources);
        self.variables.extend(other.variables);
    }
}

/// The entity kind a diff belongs to.
///
/// Declaration order matters: the derived `Ord` must coincide with the
/// lexicographic order of the serialized names, which the diff sort
/// relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A `data` block
    DataSource,
    /// A `module` block
    ModuleCall,
    /// An `output` block
    Output,
    /// A `resource` block
    Resource,
    /// A `variable` block
    Variable,
}

impl EntityKind {
    /// Human-readable label used in diff messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DataSource => "Data source",
            Self::ModuleCall => "Module call",
            Self::Output => "Output",
            Self::Resource => "Resource",
            Self::Variable => "Variable",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DataSource => "data_source",
            Self::ModuleCall => "module_call",
            Self::Output => "output",
            Self::Resource => "resource",
            Self::Variable => "variable",
        };
        write!(f, "{name}")
    }
}

/// A comparison level token as configured by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonLevel {
    /// Compare module call blocks
    ModuleCalls,
    /// Compare output blocks
    Outputs,
    /// Compare resource blocks
    Resources,
    /// Compare data source blocks
    DataSources,
    /// Compare variable blocks
    Variables,
    /// Sentinel enabling every level
    All,
}

impl ComparisonLevel {
    /// Parse a single level token. Tokens are case-sensitive and
    /// whitespace-trimmed; unknown tokens yield `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "module_calls" => Some(Self::ModuleCalls),
            "outputs" => Some(Self::Outputs),
            "resources" => Some(Self::Resources),
            "data_sources" => Some(Self::DataSources),
            "variables" => Some(Self::Variables),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Parse a list of level tokens, silently dropping unrecognized ones.
    #[must_use]
    pub fn parse_levels<I, S>(tokens: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .filter_map(|t| Self::parse(t.as_ref()))
            .collect()
    }
}

/// Immutable configuration for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Enabled comparison levels
    pub levels: Vec<ComparisonLevel>,

    /// Suppress body/argument comparison
    pub ignore_arguments: bool,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                ComparisonLevel::ModuleCalls,
                ComparisonLevel::Outputs,
                ComparisonLevel::Resources,
                ComparisonLevel::DataSources,
                ComparisonLevel::Variables,
            ],
            ignore_arguments: true,
        }
    }
}

impl ComparisonConfig {
    /// Whether a level should run, honoring the `all` sentinel.
    #[must_use]
    pub fn level_enabled(&self, level: ComparisonLevel) -> bool {
        self.levels.contains(&ComparisonLevel::All) || self.levels.contains(&level)
    }
}

/// The classification of one difference.
///
/// Declaration order is the sort order within one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Present only on the right side
    Added,
    /// Present on both sides with differing content
    Modified,
    /// Present only on the left side
    Removed,
}

impl std::fmt::Display for DiffKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        };
        write!(f, "{name}")
    }
}

/// Entity payload attached to a diff.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    /// Module call payload
    ModuleCall(ModuleCall),
    /// Output payload
    Output(Output),
    /// Resource payload
    Resource(Resource),
    /// Data source payload
    DataSource(DataSource),
    /// Variable payload
    Variable(Variable),
}

impl From<ModuleCall> for Entity {
    fn from(entity: ModuleCall) -> Self {
        Self::ModuleCall(entity)
    }
}

impl From<Output> for Entity {
    fn from(entity: Output) -> Self {
        Self::Output(entity)
    }
}

impl From<Resource> for Entity {
    fn from(entity: Resource) -> Self {
        Self::Resource(entity)
    }
}

impl From<DataSource> for Entity {
    fn from(entity: DataSource) -> Self {
        Self::DataSource(entity)
    }
}

impl From<Variable> for Entity {
    fn from(entity: Variable) -> Self {
        Self::Variable(entity)
    }
}

/// One classified difference between the two trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diff {
    /// Diff classification
    #[serde(rename = "type")]
    pub kind: DiffKind,

    /// Entity kind the diff belongs to
    pub level: EntityKind,

    /// Identity key of the affected entity
    pub element: String,

    /// Left-side payload (absent for added diffs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Entity>,

    /// Right-side payload (absent for removed diffs)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<Entity>,

    /// Human-readable one-line description
    pub message: String,
}

/// Summary counts over a diff list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of added entities
    pub added: usize,
    /// Number of removed entities
    pub removed: usize,
    /// Number of modified entities
    pub modified: usize,
    /// Total number of diffs
    pub total: usize,
}

/// The result of comparing two module definitions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ComparisonResult {
    /// Path of the left module
    pub left_path: String,

    /// Path of the right module
    pub right_path: String,

    /// Ordered diff list
    pub diffs: Vec<Diff>,

    /// Summary counts
    pub summary: DiffSummary,
}

impl ComparisonResult {
    /// Whether any difference was found.
    #[must_use]
    pub fn has_differences(&self) -> bool {
        !self.diffs.is_empty()
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum ReportFormat {
    /// Unified-diff-like text format
    #[default]
    Text,
    /// JSON format
    Json,
}
