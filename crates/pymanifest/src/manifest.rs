//! `pyproject.toml` loading and validation.

use crate::entry_point::{is_identifier, EntryPoint};
use crate::error::{ManifestError, ValidationError};
use crate::globs::{validate_build_glob, validate_license_glob};
use crate::keys::find_duplicate_key;
use crate::pyproject::{
    BuildBackendTable, BuildSystemTable, Contact, LicenseField, PyProjectToml, ReadmeField,
};
use crate::requirement::{PackageName, Requirement};
use crate::version::{Version, VersionSpecifiers};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, warn};

/// The manifest filename.
pub const MANIFEST_FILE: &str = "pyproject.toml";

/// Identifier of the uv build backend in `build-system.build-backend`.
pub const UV_BUILD_BACKEND: &str = "uv_build";

/// Default value of `tool.uv.build-backend.module-root`.
pub const DEFAULT_MODULE_ROOT: &str = "src";

/// Tables whose keys are user-chosen names that must be unique.
pub const NAMED_ENTRY_TABLES: &[&str] = &[
    "project.scripts",
    "project.gui-scripts",
    "project.optional-dependencies",
    "project.urls",
    "tool.uv.build-backend.data",
];

/// A validated package manifest.
///
/// Built once from the document text and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageManifest {
    pub name: PackageName,
    pub version: Version,
    pub description: Option<String>,
    pub readme: Option<Readme>,
    pub requires_python: Option<VersionSpecifiers>,
    pub license: Option<License>,
    /// Glob patterns, de-duplicated in declaration order.
    pub license_files: Vec<String>,
    pub authors: Vec<Contact>,
    pub maintainers: Vec<Contact>,
    pub keywords: Vec<String>,
    pub classifiers: Vec<String>,
    pub urls: BTreeMap<String, String>,
    pub dependencies: Vec<Requirement>,
    pub optional_dependencies: BTreeMap<String, Vec<Requirement>>,
    pub scripts: BTreeMap<String, EntryPoint>,
    pub gui_scripts: BTreeMap<String, EntryPoint>,
    pub build_backend: BuildBackendOptions,
    pub build_system: BuildSystem,
}

/// The package long description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", rename_all_fields = "kebab-case")]
pub enum Readme {
    /// Read from a file relative to the project root.
    File { path: String, content_type: String },
    /// Inline text.
    Text { text: String, content_type: String },
}

impl Readme {
    /// The readme path, if the readme is a file.
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::File { path, .. } => Some(path),
            Self::Text { .. } => None,
        }
    }

    #[must_use]
    pub fn content_type(&self) -> &str {
        match self {
            Self::File { content_type, .. } | Self::Text { content_type, .. } => content_type,
        }
    }
}

/// `project.license`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum License {
    /// An SPDX license expression.
    Expression(String),
    /// Legacy table form pointing at a file.
    File(String),
    /// Legacy table form with inline text.
    Text(String),
}

/// Options of `[tool.uv.build-backend]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildBackendOptions {
    /// Import name of the module; derived from the package name if unset.
    pub module_name: Option<String>,
    /// Directory containing the module, relative to the project root.
    pub module_root: String,
    /// Whether the backend's built-in excludes (`__pycache__`, `*.pyc`) apply.
    pub default_excludes: bool,
    pub source_include: Vec<String>,
    pub source_exclude: Vec<String>,
    pub wheel_exclude: Vec<String>,
    /// Wheel data directories, keyed by install category.
    pub data: BTreeMap<DataCategory, String>,
}

impl Default for BuildBackendOptions {
    fn default() -> Self {
        Self {
            module_name: None,
            module_root: String::from(DEFAULT_MODULE_ROOT),
            default_excludes: true,
            source_include: Vec::new(),
            source_exclude: Vec::new(),
            wheel_exclude: Vec::new(),
            data: BTreeMap::new(),
        }
    }
}

/// Install category of a wheel data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataCategory {
    Data,
    Headers,
    Platlib,
    Purelib,
    Scripts,
}

impl DataCategory {
    /// Every category, in sorted order.
    pub const ALL: [Self; 5] = [
        Self::Data,
        Self::Headers,
        Self::Platlib,
        Self::Purelib,
        Self::Scripts,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Headers => "headers",
            Self::Platlib => "platlib",
            Self::Purelib => "purelib",
            Self::Scripts => "scripts",
        }
    }
}

impl fmt::Display for DataCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDataCategory(s.to_string()))
    }
}

/// `[build-system]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSystem {
    pub requires: Vec<Requirement>,
    pub backend: Option<String>,
    pub backend_path: Vec<String>,
}

impl BuildSystem {
    /// Returns true if the declared backend is `uv_build`.
    #[must_use]
    pub fn uses_uv_build(&self) -> bool {
        self.backend.as_deref() == Some(UV_BUILD_BACKEND)
    }
}

/// A finding that does not prevent loading but is worth reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestWarning {
    /// No `project.requires-python`.
    MissingRequiresPython,
    /// A `uv_build` requirement without an upper version bound.
    UnboundedBackendRequirement(String),
    /// `[tool.uv.build-backend]` is set but another backend is declared.
    IgnoredBackendOptions(String),
}

impl fmt::Display for ManifestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiresPython => {
                write!(f, "`project.requires-python` is not set")
            }
            Self::UnboundedBackendRequirement(req) => write!(
                f,
                "`build-system.requires` entry '{req}' has no upper bound; future uv_build releases may break the build"
            ),
            Self::IgnoredBackendOptions(backend) => write!(
                f,
                "`[tool.uv.build-backend]` is ignored because the build backend is '{backend}'"
            ),
        }
    }
}

impl PackageManifest {
    /// Load a manifest from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading manifest");
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Find `pyproject.toml` in `start` or its nearest ancestor and load it.
    ///
    /// Returns the manifest path along with the manifest.
    pub fn find(start: impl AsRef<Path>) -> Result<(PathBuf, Self), ManifestError> {
        let start = start.as_ref();
        let mut current = Some(start);

        while let Some(dir) = current {
            let candidate = dir.join(MANIFEST_FILE);
            if candidate.is_file() {
                let manifest = Self::from_path(&candidate)?;
                return Ok((candidate, manifest));
            }
            current = dir.parent();
        }

        Err(ManifestError::NotFound(start.to_path_buf()))
    }

    /// Parse and validate a manifest from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Syntax`] for malformed TOML and
    /// [`ManifestError::Validation`] for a well-formed but invalid manifest.
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        let raw: PyProjectToml = match toml::from_str(content) {
            Ok(raw) => raw,
            Err(err) => {
                if let Some(dup) = find_duplicate_key(content, NAMED_ENTRY_TABLES) {
                    return Err(ValidationError::DuplicateKey {
                        table: dup.table,
                        key: dup.key,
                        line: dup.line,
                    }
                    .into());
                }
                return Err(ManifestError::Syntax(err));
            }
        };

        let manifest = Self::from_pyproject(raw)?;
        debug!(
            name = %manifest.name,
            version = %manifest.version,
            dependencies = manifest.dependencies.len(),
            "loaded manifest"
        );
        for warning in manifest.warnings() {
            warn!(package = %manifest.name, "{warning}");
        }
        Ok(manifest)
    }

    /// Validate an already deserialized document.
    pub fn from_pyproject(raw: PyProjectToml) -> Result<Self, ValidationError> {
        let project = raw.project.ok_or(ValidationError::MissingTable("project"))?;
        let build_system = raw
            .build_system
            .ok_or(ValidationError::MissingTable("build-system"))?;

        let backend_table = raw
            .tool
            .and_then(|tool| tool.uv)
            .and_then(|uv| uv.build_backend)
            .unwrap_or_default();

        Ok(Self {
            name: validate_name(project.name)?,
            version: validate_version(project.version)?,
            description: project.description,
            readme: project.readme.map(validate_readme).transpose()?,
            requires_python: project
                .requires_python
                .map(validate_requires_python)
                .transpose()?,
            license: project.license.map(validate_license).transpose()?,
            license_files: validate_license_files(project.license_files)?,
            authors: project.authors,
            maintainers: project.maintainers,
            keywords: project.keywords,
            classifiers: project.classifiers,
            urls: project.urls,
            dependencies: parse_requirements("project.dependencies", project.dependencies)?,
            optional_dependencies: validate_optional_dependencies(project.optional_dependencies)?,
            scripts: parse_entry_points("project.scripts", project.scripts)?,
            gui_scripts: parse_entry_points("project.gui-scripts", project.gui_scripts)?,
            build_backend: validate_build_backend(backend_table)?,
            build_system: validate_build_system(build_system)?,
        })
    }

    /// The import name of the package's module.
    #[must_use]
    pub fn module_name(&self) -> String {
        self.build_backend
            .module_name
            .clone()
            .unwrap_or_else(|| self.name.module_name())
    }

    /// Every runtime requirement, including those of optional extras.
    pub fn all_dependencies(&self) -> impl Iterator<Item = &Requirement> {
        self.dependencies
            .iter()
            .chain(self.optional_dependencies.values().flatten())
    }

    /// Non-fatal findings about this manifest.
    #[must_use]
    pub fn warnings(&self) -> Vec<ManifestWarning> {
        let mut warnings = Vec::new();

        if self.requires_python.is_none() {
            warnings.push(ManifestWarning::MissingRequiresPython);
        }

        match self.build_system.backend.as_deref() {
            Some(UV_BUILD_BACKEND) => {
                warnings.extend(
                    self.build_system
                        .requires
                        .iter()
                        .filter(|req| req.name().normalized() == "uv-build")
                        .filter(|req| !req.has_upper_bound())
                        .map(|req| ManifestWarning::UnboundedBackendRequirement(req.to_string())),
                );
            }
            Some(other) if self.build_backend != BuildBackendOptions::default() => {
                warnings.push(ManifestWarning::IgnoredBackendOptions(other.to_string()));
            }
            _ => {}
        }

        warnings
    }
}

fn validate_name(name: Option<String>) -> Result<PackageName, ValidationError> {
    let name = name.ok_or(ValidationError::MissingField("project.name"))?;
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyField("project.name"));
    }
    PackageName::new(name.as_str()).map_err(|_| ValidationError::InvalidName(name))
}

fn validate_version(version: Option<String>) -> Result<Version, ValidationError> {
    let version = version.ok_or(ValidationError::MissingField("project.version"))?;
    if version.trim().is_empty() {
        return Err(ValidationError::EmptyField("project.version"));
    }
    version
        .parse()
        .map_err(|source| ValidationError::InvalidVersion {
            value: version,
            source,
        })
}

fn validate_requires_python(value: String) -> Result<VersionSpecifiers, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField("project.requires-python"));
    }
    value
        .parse()
        .map_err(|source| ValidationError::InvalidRequiresPython { value, source })
}

fn infer_content_type(path: &str) -> Option<&'static str> {
    let extension = Path::new(path).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "md" => Some("text/markdown"),
        "rst" => Some("text/x-rst"),
        "txt" => Some("text/plain"),
        _ => None,
    }
}

fn readme_file(path: String, content_type: Option<String>) -> Result<Readme, ValidationError> {
    if path.trim().is_empty() {
        return Err(ValidationError::EmptyField("project.readme"));
    }
    let content_type = match content_type {
        Some(content_type) => content_type,
        None => infer_content_type(&path)
            .ok_or_else(|| ValidationError::UnknownReadmeType(path.clone()))?
            .to_string(),
    };
    Ok(Readme::File { path, content_type })
}

fn validate_readme(field: ReadmeField) -> Result<Readme, ValidationError> {
    match field {
        ReadmeField::Path(path) => readme_file(path, None),
        ReadmeField::Table(table) => match (table.file, table.text) {
            (Some(path), None) => readme_file(path, table.content_type),
            (None, Some(text)) => Ok(Readme::Text {
                text,
                content_type: table
                    .content_type
                    .ok_or(ValidationError::MissingField("project.readme.content-type"))?,
            }),
            _ => Err(ValidationError::InvalidReadmeTable),
        },
    }
}

fn validate_license(field: LicenseField) -> Result<License, ValidationError> {
    match field {
        LicenseField::Expression(expr) if expr.trim().is_empty() => {
            Err(ValidationError::EmptyField("project.license"))
        }
        LicenseField::Expression(expr) => Ok(License::Expression(expr)),
        LicenseField::Table(table) => match (table.file, table.text) {
            (Some(file), None) => Ok(License::File(file)),
            (None, Some(text)) => Ok(License::Text(text)),
            _ => Err(ValidationError::InvalidLicenseTable),
        },
    }
}

fn validate_license_files(patterns: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let mut unique: Vec<String> = Vec::with_capacity(patterns.len());
    for (index, pattern) in patterns.into_iter().enumerate() {
        validate_license_glob(&pattern).map_err(|source| ValidationError::InvalidGlob {
            field: format!("project.license-files[{index}]"),
            pattern: pattern.clone(),
            source,
        })?;
        if !unique.contains(&pattern) {
            unique.push(pattern);
        }
    }
    Ok(unique)
}

fn parse_requirements(field: &str, items: Vec<String>) -> Result<Vec<Requirement>, ValidationError> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.parse()
                .map_err(|source| ValidationError::InvalidRequirement {
                    field: format!("{field}[{index}]"),
                    requirement: item,
                    source,
                })
        })
        .collect()
}

fn validate_optional_dependencies(
    extras: BTreeMap<String, Vec<String>>,
) -> Result<BTreeMap<String, Vec<Requirement>>, ValidationError> {
    extras
        .into_iter()
        .map(|(extra, items)| {
            if PackageName::new(extra.as_str()).is_err() {
                return Err(ValidationError::InvalidExtraName(extra));
            }
            let field = format!("project.optional-dependencies.{extra}");
            let requirements = parse_requirements(&field, items)?;
            Ok((extra, requirements))
        })
        .collect()
}

fn parse_entry_points(
    table: &'static str,
    entries: BTreeMap<String, String>,
) -> Result<BTreeMap<String, EntryPoint>, ValidationError> {
    entries
        .into_iter()
        .map(|(name, value)| match value.parse::<EntryPoint>() {
            Ok(entry_point) => Ok((name, entry_point)),
            Err(source) => Err(ValidationError::InvalidEntryPoint {
                table,
                name,
                source,
            }),
        })
        .collect()
}

/// Check that `path` stays inside the project root.
fn relative_dir_problem(path: &str) -> Option<&'static str> {
    let absolute = path.starts_with('/')
        || path.starts_with('\\')
        || path.chars().nth(1) == Some(':');
    if absolute {
        Some("path must be relative to the project root")
    } else if path.split(['/', '\\']).any(|segment| segment == "..") {
        Some("path must not contain `..` segments")
    } else {
        None
    }
}

fn validate_globs(field: &str, patterns: &[String]) -> Result<(), ValidationError> {
    for (index, pattern) in patterns.iter().enumerate() {
        validate_build_glob(pattern).map_err(|source| ValidationError::InvalidGlob {
            field: format!("{field}[{index}]"),
            pattern: pattern.clone(),
            source,
        })?;
    }
    Ok(())
}

fn validate_build_backend(table: BuildBackendTable) -> Result<BuildBackendOptions, ValidationError> {
    let defaults = BuildBackendOptions::default();

    if let Some(module_name) = &table.module_name {
        if !module_name.split('.').all(is_identifier) {
            return Err(ValidationError::InvalidModuleName(module_name.clone()));
        }
    }

    let module_root = table.module_root.unwrap_or(defaults.module_root);
    if let Some(reason) = relative_dir_problem(&module_root) {
        return Err(ValidationError::InvalidModuleRoot {
            path: module_root,
            reason,
        });
    }

    validate_globs("tool.uv.build-backend.source-include", &table.source_include)?;
    validate_globs("tool.uv.build-backend.source-exclude", &table.source_exclude)?;
    validate_globs("tool.uv.build-backend.wheel-exclude", &table.wheel_exclude)?;

    let mut data = BTreeMap::new();
    for (key, path) in table.data {
        let category: DataCategory = key.parse()?;
        let problem = if path.trim().is_empty() {
            Some("path is empty")
        } else {
            relative_dir_problem(&path)
        };
        if let Some(reason) = problem {
            return Err(ValidationError::InvalidDataDirectory {
                category,
                path,
                reason,
            });
        }
        data.insert(category, path);
    }

    Ok(BuildBackendOptions {
        module_name: table.module_name,
        module_root,
        default_excludes: table.default_excludes.unwrap_or(defaults.default_excludes),
        source_include: table.source_include,
        source_exclude: table.source_exclude,
        wheel_exclude: table.wheel_exclude,
        data,
    })
}

fn validate_build_system(table: BuildSystemTable) -> Result<BuildSystem, ValidationError> {
    if let Some(backend) = &table.build_backend {
        if backend.trim().is_empty() {
            return Err(ValidationError::EmptyField("build-system.build-backend"));
        }
        if table.requires.as_ref().map_or(true, Vec::is_empty) {
            return Err(ValidationError::EmptyBuildRequires);
        }
    }

    Ok(BuildSystem {
        requires: parse_requirements("build-system.requires", table.requires.unwrap_or_default())?,
        backend: table.build_backend,
        backend_path: table.backend_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globs::GlobError;

    const BUILT_BY_UV: &str = r#"
[project]
name = "built-by-uv"
version = "0.1.0"
description = "A package to be built with the uv build backend that uses all features exposed by the build backend"
readme = "README.md"
requires-python = ">=3.12"
dependencies = ["anyio>=4,<5"]
license-files = ["LICENSE*", "third-party-licenses/*"]

[project.scripts]
say-hi = "built_by_uv.cli:hello"

[tool.uv.build-backend]
# A file we need for the source dist -> wheel step, but not in the wheel itself
source-include = ["data/build-script.py"]
# A temporary or generated file we want to ignore
source-exclude = ["/src/built_by_uv/not-packaged.txt"]
# Headers are build-only
wheel-exclude = ["build-*.h"]

[tool.uv.build-backend.data]
scripts = "scripts"
data = "assets"
headers = "header"

[build-system]
requires = ["uv_build>=0.7,<10000"]
build-backend = "uv_build"
"#;

    fn validation_error(toml: &str) -> ValidationError {
        match PackageManifest::parse(toml) {
            Err(ManifestError::Validation(err)) => err,
            other => panic!("expected a validation error, got {other:?}"),
        }
    }

    #[test]
    fn parse_built_by_uv() {
        let manifest = PackageManifest::parse(BUILT_BY_UV).unwrap();
        assert_eq!(manifest.name.as_str(), "built-by-uv");
        assert_eq!(manifest.version.to_string(), "0.1.0");
        assert_eq!(
            manifest
                .dependencies
                .iter()
                .map(Requirement::as_str)
                .collect::<Vec<_>>(),
            ["anyio>=4,<5"]
        );
        assert_eq!(manifest.requires_python.as_ref().unwrap().to_string(), ">=3.12");
        assert_eq!(manifest.readme.as_ref().unwrap().content_type(), "text/markdown");
        assert_eq!(manifest.license_files, ["LICENSE*", "third-party-licenses/*"]);
        assert_eq!(manifest.scripts["say-hi"].module(), "built_by_uv.cli");
        assert_eq!(manifest.build_backend.module_root, "src");
        assert_eq!(manifest.build_backend.data[&DataCategory::Data], "assets");
        assert_eq!(manifest.build_backend.data.len(), 3);
        assert!(manifest.build_system.uses_uv_build());
        assert_eq!(manifest.module_name(), "built_by_uv");
        assert!(manifest.warnings().is_empty());
    }

    #[test]
    fn loading_is_idempotent() {
        let first = PackageManifest::parse(BUILT_BY_UV).unwrap();
        let second = PackageManifest::parse(BUILT_BY_UV).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn missing_name() {
        let toml = BUILT_BY_UV.replace("name = \"built-by-uv\"\n", "");
        assert_eq!(
            validation_error(&toml),
            ValidationError::MissingField("project.name")
        );
    }

    #[test]
    fn empty_name() {
        let toml = BUILT_BY_UV.replace("name = \"built-by-uv\"", "name = \"\"");
        assert_eq!(
            validation_error(&toml),
            ValidationError::EmptyField("project.name")
        );
    }

    #[test]
    fn invalid_name() {
        let toml = BUILT_BY_UV.replace("name = \"built-by-uv\"", "name = \"-built\"");
        assert!(matches!(validation_error(&toml), ValidationError::InvalidName(_)));
    }

    #[test]
    fn missing_or_invalid_version() {
        let toml = BUILT_BY_UV.replace("version = \"0.1.0\"\n", "");
        assert_eq!(
            validation_error(&toml),
            ValidationError::MissingField("project.version")
        );

        let toml = BUILT_BY_UV.replace("version = \"0.1.0\"", "version = \"latest\"");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidVersion { .. }
        ));
    }

    #[test]
    fn missing_project_table() {
        let toml = "[build-system]\nrequires = [\"uv_build\"]\nbuild-backend = \"uv_build\"\n";
        assert_eq!(validation_error(toml), ValidationError::MissingTable("project"));
    }

    #[test]
    fn missing_build_system_table() {
        let end = BUILT_BY_UV.find("[build-system]").unwrap();
        let err = validation_error(&BUILT_BY_UV[..end]);
        assert_eq!(err, ValidationError::MissingTable("build-system"));
        assert!(err.to_string().contains("[build-system]"));
    }

    #[test]
    fn duplicate_script_name() {
        let toml = BUILT_BY_UV.replace(
            "say-hi = \"built_by_uv.cli:hello\"",
            "say-hi = \"built_by_uv.cli:hello\"\nsay-hi = \"built_by_uv.cli:other\"",
        );
        match validation_error(&toml) {
            ValidationError::DuplicateKey { table, key, .. } => {
                assert_eq!(table, "project.scripts");
                assert_eq!(key, "say-hi");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_script_name_in_inline_table() {
        let toml = BUILT_BY_UV.replace(
            "\n[project.scripts]\nsay-hi = \"built_by_uv.cli:hello\"\n",
            "scripts = { say-hi = \"built_by_uv.cli:hello\", say-hi = \"built_by_uv.cli:other\" }\n",
        );
        match validation_error(&toml) {
            ValidationError::DuplicateKey { table, key, line } => {
                assert_eq!(table, "project.scripts");
                assert_eq!(key, "say-hi");
                assert_eq!(line, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_key_elsewhere_is_a_syntax_error() {
        let toml = BUILT_BY_UV.replace(
            "version = \"0.1.0\"",
            "version = \"0.1.0\"\nversion = \"0.2.0\"",
        );
        assert!(matches!(
            PackageManifest::parse(&toml),
            Err(ManifestError::Syntax(_))
        ));
    }

    #[test]
    fn wheel_exclude_traversal() {
        let toml = BUILT_BY_UV.replace("wheel-exclude = [\"build-*.h\"]", "wheel-exclude = [\"../secret\"]");
        assert_eq!(
            validation_error(&toml),
            ValidationError::InvalidGlob {
                field: String::from("tool.uv.build-backend.wheel-exclude[0]"),
                pattern: String::from("../secret"),
                source: GlobError::ParentTraversal,
            }
        );
    }

    #[test]
    fn empty_source_include_pattern() {
        let toml = BUILT_BY_UV.replace("[\"data/build-script.py\"]", "[\"data/build-script.py\", \"\"]");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidGlob { source: GlobError::Empty, .. }
        ));
    }

    #[test]
    fn invalid_license_glob() {
        let toml = BUILT_BY_UV.replace("\"LICENSE*\"", "\"/etc/LICENSE\"");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidGlob { source: GlobError::Absolute, .. }
        ));
    }

    #[test]
    fn duplicate_license_patterns_collapse() {
        let toml = BUILT_BY_UV.replace("[\"LICENSE*\", ", "[\"LICENSE*\", \"LICENSE*\", ");
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(manifest.license_files, ["LICENSE*", "third-party-licenses/*"]);
    }

    #[test]
    fn invalid_entry_point() {
        let toml = BUILT_BY_UV.replace("built_by_uv.cli:hello", "built_by_uv.cli");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidEntryPoint { table: "project.scripts", .. }
        ));
    }

    #[test]
    fn invalid_dependency() {
        let toml = BUILT_BY_UV.replace("\"anyio>=4,<5\"", "\"anyio>=four\"");
        match validation_error(&toml) {
            ValidationError::InvalidRequirement { field, requirement, .. } => {
                assert_eq!(field, "project.dependencies[0]");
                assert_eq!(requirement, "anyio>=four");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn invalid_requires_python() {
        let toml = BUILT_BY_UV.replace("\">=3.12\"", "\"3.12\"");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidRequiresPython { .. }
        ));
    }

    #[test]
    fn backend_without_requirements() {
        let toml = BUILT_BY_UV.replace("requires = [\"uv_build>=0.7,<10000\"]", "requires = []");
        assert_eq!(validation_error(&toml), ValidationError::EmptyBuildRequires);

        let toml = BUILT_BY_UV.replace("requires = [\"uv_build>=0.7,<10000\"]\n", "");
        assert_eq!(validation_error(&toml), ValidationError::EmptyBuildRequires);
    }

    #[test]
    fn requirements_without_backend_are_fine() {
        let toml = BUILT_BY_UV.replace("build-backend = \"uv_build\"\n", "");
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(manifest.build_system.backend, None);
        assert_eq!(manifest.build_system.requires.len(), 1);
    }

    #[test]
    fn unknown_data_category() {
        let toml = BUILT_BY_UV.replace("headers = \"header\"", "binaries = \"bin\"");
        assert_eq!(
            validation_error(&toml),
            ValidationError::UnknownDataCategory(String::from("binaries"))
        );
    }

    #[test]
    fn data_directory_outside_project() {
        let toml = BUILT_BY_UV.replace("data = \"assets\"", "data = \"../assets\"");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidDataDirectory {
                category: DataCategory::Data,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_data_category() {
        let toml = BUILT_BY_UV.replace("data = \"assets\"", "data = \"assets\"\ndata = \"more\"");
        assert!(matches!(
            validation_error(&toml),
            ValidationError::DuplicateKey { .. }
        ));
    }

    #[test]
    fn unknown_backend_option_is_a_syntax_error() {
        let toml = BUILT_BY_UV.replace("wheel-exclude", "wheel-excludes");
        assert!(matches!(
            PackageManifest::parse(&toml),
            Err(ManifestError::Syntax(_))
        ));
    }

    #[test]
    fn malformed_toml() {
        for text in ["[project\nname = \"x\"", "[project]\nname = \"bad \\q escape\""] {
            assert!(matches!(
                PackageManifest::parse(text),
                Err(ManifestError::Syntax(_))
            ));
        }
    }

    #[test]
    fn readme_table_forms() {
        let toml = BUILT_BY_UV.replace(
            "readme = \"README.md\"",
            "readme = { text = \"Hello\", content-type = \"text/plain\" }",
        );
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(manifest.readme.as_ref().unwrap().path(), None);

        let toml = BUILT_BY_UV.replace("readme = \"README.md\"", "readme = \"README\"");
        assert_eq!(
            validation_error(&toml),
            ValidationError::UnknownReadmeType(String::from("README"))
        );

        let toml = BUILT_BY_UV.replace(
            "readme = \"README.md\"",
            "readme = { file = \"README\", text = \"x\" }",
        );
        assert_eq!(validation_error(&toml), ValidationError::InvalidReadmeTable);
    }

    #[test]
    fn module_name_override() {
        let toml = BUILT_BY_UV.replace(
            "[tool.uv.build-backend]",
            "[tool.uv.build-backend]\nmodule-name = \"byuv.core\"",
        );
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(manifest.module_name(), "byuv.core");

        let toml = BUILT_BY_UV.replace(
            "[tool.uv.build-backend]",
            "[tool.uv.build-backend]\nmodule-name = \"by-uv\"",
        );
        assert!(matches!(
            validation_error(&toml),
            ValidationError::InvalidModuleName(_)
        ));
    }

    #[test]
    fn optional_dependencies_and_gui_scripts() {
        let toml = BUILT_BY_UV.replace(
            "[project.scripts]",
            "[project.optional-dependencies]\ntrio = [\"trio>=0.26\"]\n\n[project.gui-scripts]\nsay-hi-gui = \"built_by_uv.gui:main\"\n\n[project.scripts]",
        );
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(manifest.optional_dependencies["trio"][0].as_str(), "trio>=0.26");
        assert_eq!(manifest.gui_scripts["say-hi-gui"].object(), "main");
        assert_eq!(manifest.all_dependencies().count(), 2);
    }

    #[test]
    fn warnings_for_loose_manifests() {
        let toml = BUILT_BY_UV
            .replace("requires-python = \">=3.12\"\n", "")
            .replace("uv_build>=0.7,<10000", "uv_build>=0.7");
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(
            manifest.warnings(),
            [
                ManifestWarning::MissingRequiresPython,
                ManifestWarning::UnboundedBackendRequirement(String::from("uv_build>=0.7")),
            ]
        );

        let toml = BUILT_BY_UV.replace(
            "requires = [\"uv_build>=0.7,<10000\"]\nbuild-backend = \"uv_build\"",
            "requires = [\"hatchling\"]\nbuild-backend = \"hatchling.build\"",
        );
        let manifest = PackageManifest::parse(&toml).unwrap();
        assert_eq!(
            manifest.warnings(),
            [ManifestWarning::IgnoredBackendOptions(String::from("hatchling.build"))]
        );
    }
}
