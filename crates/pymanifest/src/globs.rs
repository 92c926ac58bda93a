//! Validation of the glob patterns a manifest declares.
//!
//! Build-backend include/exclude patterns are anchored at the project root
//! and may start with `/`. License patterns must be plain relative paths.

use glob::Pattern;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlobError {
    #[error("pattern is empty")]
    Empty,

    #[error("pattern must not contain `..` segments")]
    ParentTraversal,

    #[error("pattern must be relative to the project root")]
    Absolute,

    #[error("pattern must use `/` as path separator")]
    Backslash,

    #[error("invalid glob syntax: {0}")]
    Syntax(String),
}

fn has_parent_segment(pattern: &str) -> bool {
    pattern.split(['/', '\\']).any(|segment| segment == "..")
}

fn check_syntax(pattern: &str) -> Result<(), GlobError> {
    Pattern::new(pattern)
        .map(drop)
        .map_err(|err| GlobError::Syntax(err.to_string()))
}

/// Validate a `source-include`, `source-exclude` or `wheel-exclude` pattern.
pub fn validate_build_glob(pattern: &str) -> Result<(), GlobError> {
    if pattern.trim().is_empty() {
        return Err(GlobError::Empty);
    }
    if has_parent_segment(pattern) {
        return Err(GlobError::ParentTraversal);
    }
    check_syntax(pattern)
}

/// Validate a `license-files` pattern.
pub fn validate_license_glob(pattern: &str) -> Result<(), GlobError> {
    if pattern.trim().is_empty() {
        return Err(GlobError::Empty);
    }
    if pattern.contains('\\') {
        return Err(GlobError::Backslash);
    }
    if pattern.starts_with('/') || pattern.chars().nth(1) == Some(':') {
        return Err(GlobError::Absolute);
    }
    if has_parent_segment(pattern) {
        return Err(GlobError::ParentTraversal);
    }
    check_syntax(pattern)
}
