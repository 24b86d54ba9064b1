//! HCL parsing module for Terraform/OpenTofu files.
//!
//! This module translates a module directory into the normalized tree the
//! comparison engine consumes: one [`crate::types::ModuleDefinition`] per
//! directory, with every attribute value evaluated into a
//! [`crate::value::ConfigValue`]. Expressions that cannot be evaluated
//! statically become the opaque sentinel; repeatable nested blocks fold
//! into the body under the reserved `_blocks` key.
//!
//! # Supported Constructs
//!
//! - `module` blocks (source, version, and remaining arguments)
//! - `resource` and `data` blocks (attributes and nested blocks)
//! - `output` blocks (description, sensitive, value)
//! - `variable` blocks (type, description, default)

mod hcl;

pub use hcl::HclParser;

use crate::error::Result;
use std::path::Path;
use walkdir::WalkDir;

/// File extensions to scan for Terraform/OpenTofu files.
pub const TERRAFORM_EXTENSIONS: &[&str] = &[".tf", ".tf.json"];

/// Files and directories to skip during scanning.
pub const SKIP_FILES: &[&str] = &[".terraform", ".terragrunt-cache", "terraform.tfstate"];

/// Trait for parsing HCL content.
///
/// This trait allows for different parsing implementations
/// (e.g., for testing with mock parsers).
pub trait Parser: Send + Sync {
    /// Parse a single file's contents into a module definition fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the HCL content is invalid.
    fn parse_content(
        &self,
        content: &str,
        file_path: &Path,
    ) -> Result<crate::types::ModuleDefinition>;
}

/// Check if a path looks like a Terraform file.
#[must_use]
pub fn is_terraform_file(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    TERRAFORM_EXTENSIONS
        .iter()
        .any(|ext| path_str.ends_with(ext))
}

/// Validate that a path is a directory containing at least one Terraform
/// file. Violations are hard errors reported before comparison runs.
///
/// # Errors
///
/// Returns `DirectoryNotFound` if the path does not exist or is not a
/// directory, and `NoTerraformFiles` if no Terraform file is found.
pub fn validate_module_directory(path: &Path) -> Result<()> {
    if !path.is_dir() {
        return Err(crate::err!(DirectoryNotFound {
            path: path.to_path_buf(),
        }));
    }

    let has_terraform_files = WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .any(|entry| entry.path().is_file() && is_terraform_file(entry.path()));

    if !has_terraform_files {
        return Err(crate::err!(NoTerraformFiles {
            path: path.to_path_buf(),
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TfDeltaError;

    #[test]
    fn test_is_terraform_file() {
        assert!(is_terraform_file(Path::new("main.tf")));
        assert!(is_terraform_file(Path::new("variables.tf")));
        assert!(is_terraform_file(Path::new("config.tf.json")));
        assert!(!is_terraform_file(Path::new("readme.md")));
        assert!(!is_terraform_file(Path::new("script.sh")));
    }

    #[test]
    fn test_validate_missing_directory() {
        let result = validate_module_directory(Path::new("/definitely/not/here"));
        assert!(matches!(
            result,
            Err(TfDeltaError::DirectoryNotFound { .. })
        ));
    }

    #[test]
    fn test_validate_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_module_directory(dir.path());
        assert!(matches!(result, Err(TfDeltaError::NoTerraformFiles { .. })));
    }

    #[test]
    fn test_validate_directory_with_terraform_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.tf"), "# empty\n").unwrap();
        assert!(validate_module_directory(dir.path()).is_ok());
    }
}
