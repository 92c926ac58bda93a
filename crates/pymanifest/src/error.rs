//! Errors raised while loading a manifest.

use crate::entry_point::EntryPointError;
use crate::globs::GlobError;
use crate::manifest::DataCategory;
use crate::requirement::RequirementError;
use crate::version::VersionError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of [`PackageManifest`](crate::PackageManifest) loading.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no `pyproject.toml` found in `{}` or any parent directory", .0.display())]
    NotFound(PathBuf),

    /// The document is not well-formed TOML, or a value has the wrong type.
    #[error("failed to parse manifest: {0}")]
    Syntax(#[from] toml::de::Error),

    /// The document is well-formed but describes an invalid package.
    #[error("invalid manifest: {0}")]
    Validation(#[from] ValidationError),
}

/// A well-formed manifest that breaks one of the package rules.
///
/// Every message names the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required table `[{0}]`")]
    MissingTable(&'static str),

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must not be empty")]
    EmptyField(&'static str),

    #[error("invalid package name '{0}' in `project.name`")]
    InvalidName(String),

    #[error("invalid version '{value}' in `project.version`: {source}")]
    InvalidVersion { value: String, source: VersionError },

    #[error("invalid `project.requires-python` '{value}': {source}")]
    InvalidRequiresPython { value: String, source: VersionError },

    #[error("duplicate key `{key}` in `[{table}]` at line {line}")]
    DuplicateKey {
        table: String,
        key: String,
        line: usize,
    },

    #[error("invalid requirement '{requirement}' in `{field}`: {source}")]
    InvalidRequirement {
        field: String,
        requirement: String,
        source: RequirementError,
    },

    #[error("invalid extra name '{0}' in `project.optional-dependencies`")]
    InvalidExtraName(String),

    #[error("invalid entry point for `{name}` in `[{table}]`: {source}")]
    InvalidEntryPoint {
        table: &'static str,
        name: String,
        source: EntryPointError,
    },

    #[error("invalid glob '{pattern}' in `{field}`: {source}")]
    InvalidGlob {
        field: String,
        pattern: String,
        source: GlobError,
    },

    #[error("`build-system.requires` must not be empty when `build-system.build-backend` is declared")]
    EmptyBuildRequires,

    #[error(
        "unknown data category '{0}' in `[tool.uv.build-backend.data]`, expected one of: data, headers, platlib, purelib, scripts"
    )]
    UnknownDataCategory(String),

    #[error("invalid directory '{path}' for `tool.uv.build-backend.data.{category}`: {reason}")]
    InvalidDataDirectory {
        category: DataCategory,
        path: String,
        reason: &'static str,
    },

    #[error("invalid `tool.uv.build-backend.module-root` '{path}': {reason}")]
    InvalidModuleRoot { path: String, reason: &'static str },

    #[error("invalid module name '{0}' in `tool.uv.build-backend.module-name`")]
    InvalidModuleName(String),

    #[error("cannot infer the content type of readme '{0}', set `content-type` explicitly")]
    UnknownReadmeType(String),

    #[error("`project.readme` table needs exactly one of `file` or `text`")]
    InvalidReadmeTable,

    #[error("`project.license` table needs exactly one of `file` or `text`")]
    InvalidLicenseTable,
}
