//! The raw `pyproject.toml` document as deserialized by `toml`.
//!
//! Required fields are still `Option` here so that their absence surfaces as
//! a validation error naming the field rather than a parser error.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PyProjectToml {
    #[serde(default)]
    pub project: Option<ProjectTable>,

    #[serde(default)]
    pub tool: Option<ToolTable>,

    #[serde(default)]
    pub build_system: Option<BuildSystemTable>,
}

/// The `[project]` table. Keys not listed here are accepted and ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectTable {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub readme: Option<ReadmeField>,

    #[serde(default)]
    pub requires_python: Option<String>,

    #[serde(default)]
    pub license: Option<LicenseField>,

    #[serde(default)]
    pub license_files: Vec<String>,

    #[serde(default)]
    pub authors: Vec<Contact>,

    #[serde(default)]
    pub maintainers: Vec<Contact>,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub classifiers: Vec<String>,

    #[serde(default)]
    pub urls: BTreeMap<String, String>,

    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub optional_dependencies: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub scripts: BTreeMap<String, String>,

    #[serde(default)]
    pub gui_scripts: BTreeMap<String, String>,

    #[serde(default)]
    pub dynamic: Vec<String>,
}

/// `project.readme`: a path, or a table with `file` or `text`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ReadmeField {
    Path(String),
    Table(ReadmeTable),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReadmeTable {
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub content_type: Option<String>,
}

/// `project.license`: an SPDX expression, or a legacy `file`/`text` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LicenseField {
    Expression(String),
    Table(LicenseTable),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LicenseTable {
    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub text: Option<String>,
}

/// An entry of `project.authors` or `project.maintainers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Contact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// `[tool]`; only the `uv` subtable is interpreted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolTable {
    #[serde(default)]
    pub uv: Option<ToolUv>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ToolUv {
    #[serde(default)]
    pub build_backend: Option<BuildBackendTable>,
}

/// `[tool.uv.build-backend]`. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BuildBackendTable {
    #[serde(default)]
    pub module_name: Option<String>,

    #[serde(default)]
    pub module_root: Option<String>,

    #[serde(default)]
    pub default_excludes: Option<bool>,

    #[serde(default)]
    pub source_include: Vec<String>,

    #[serde(default)]
    pub source_exclude: Vec<String>,

    #[serde(default)]
    pub wheel_exclude: Vec<String>,

    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// `[build-system]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSystemTable {
    #[serde(default)]
    pub requires: Option<Vec<String>>,

    #[serde(default)]
    pub build_backend: Option<String>,

    #[serde(default)]
    pub backend_path: Vec<String>,
}
