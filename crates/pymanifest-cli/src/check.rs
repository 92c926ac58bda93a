//! Manifest checking for `pymanifest check`.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use pymanifest::{PackageManifest, SourceTree, Version, MANIFEST_FILE};
use serde::Serialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::info;

/// How the check report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Options for `pymanifest check`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Manifest file or project directory; searched upward from the current
    /// directory when absent.
    pub manifest_path: Option<PathBuf>,

    /// Check the source tree next to the manifest.
    pub tree: bool,

    /// Interpreter version that `requires-python` must admit.
    pub python: Option<String>,
}

/// Summary of a successful check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckReport {
    pub manifest_path: PathBuf,
    pub name: String,
    pub version: String,
    pub requires_python: Option<String>,
    pub dependencies: Vec<String>,
    pub scripts: Vec<String>,
    pub build_backend: Option<String>,
    pub module_dir: Option<PathBuf>,
    pub license_files: Vec<PathBuf>,
    pub warnings: Vec<String>,
}

/// Resolve and load the manifest the user pointed at.
pub fn locate_manifest(path: Option<&Path>) -> Result<(PathBuf, PackageManifest)> {
    match path {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(MANIFEST_FILE)
            } else {
                path.to_path_buf()
            };
            let manifest = PackageManifest::from_path(&path)
                .with_context(|| format!("Failed to load `{}`", path.display()))?;
            Ok((path, manifest))
        }
        None => {
            let current_dir = env::current_dir().context("Failed to get current directory")?;
            PackageManifest::find(&current_dir)
                .with_context(|| format!("Failed to load manifest for `{}`", current_dir.display()))
        }
    }
}

/// Load, validate and optionally check the source tree.
pub fn run_check(options: &CheckOptions) -> Result<CheckReport> {
    let (manifest_path, manifest) = locate_manifest(options.manifest_path.as_deref())?;
    info!(path = %manifest_path.display(), "manifest is valid");

    if let Some(python) = &options.python {
        let version: Version = python
            .parse()
            .with_context(|| format!("Invalid --python version '{python}'"))?;
        if let Some(requires_python) = &manifest.requires_python {
            if !requires_python.contains(&version) {
                bail!(
                    "Python {} does not satisfy `requires-python = \"{}\"` of `{}`",
                    version,
                    requires_python,
                    manifest.name
                );
            }
        }
    }

    let tree = if options.tree {
        let root = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let tree = SourceTree::discover(root, &manifest)
            .with_context(|| format!("Source tree check failed for `{}`", root.display()))?;
        Some(tree)
    } else {
        None
    };

    Ok(CheckReport {
        name: manifest.name.to_string(),
        version: manifest.version.to_string(),
        requires_python: manifest.requires_python.as_ref().map(ToString::to_string),
        dependencies: manifest
            .dependencies
            .iter()
            .map(|req| req.as_str().to_string())
            .collect(),
        scripts: manifest.scripts.keys().cloned().collect(),
        build_backend: manifest.build_system.backend.clone(),
        module_dir: tree.as_ref().map(|tree| tree.module_dir.clone()),
        license_files: tree.map(|tree| tree.license_files).unwrap_or_default(),
        warnings: manifest.warnings().iter().map(ToString::to_string).collect(),
        manifest_path,
    })
}

impl CheckReport {
    /// Render the report as human-readable text.
    pub fn to_text(&self) -> String {
        let mut out = format!(
            "{} {} is valid ({})\n",
            self.name,
            self.version,
            self.manifest_path.display()
        );
        if let Some(requires_python) = &self.requires_python {
            out.push_str(&format!("  requires-python: {requires_python}\n"));
        }
        out.push_str(&format!("  dependencies: {}\n", self.dependencies.len()));
        for dep in &self.dependencies {
            out.push_str(&format!("    {dep}\n"));
        }
        if !self.scripts.is_empty() {
            out.push_str(&format!("  scripts: {}\n", self.scripts.join(", ")));
        }
        if let Some(backend) = &self.build_backend {
            out.push_str(&format!("  build backend: {backend}\n"));
        }
        if let Some(module_dir) = &self.module_dir {
            out.push_str(&format!("  module: {}\n", module_dir.display()));
            out.push_str(&format!("  license files: {}\n", self.license_files.len()));
        }
        for warning in &self.warnings {
            out.push_str(&format!("warning: {warning}\n"));
        }
        out
    }

    /// Print the report to stdout.
    pub fn print(&self, format: OutputFormat) -> Result<()> {
        match format {
            OutputFormat::Text => print!("{}", self.to_text()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(self).context("Failed to serialize report")?;
                println!("{json}");
            }
        }
        Ok(())
    }
}
