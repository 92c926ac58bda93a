//! Source-tree checks for a loaded manifest.
//!
//! Verifies that the files a manifest refers to exist in the conventional
//! layout of a project built with uv_build:
//! ```text
//! my-package/
//! ├── pyproject.toml        # Package manifest
//! ├── README.md             # project.readme
//! ├── LICENSE               # matched by project.license-files
//! ├── assets/               # tool.uv.build-backend.data
//! └── src/                  # tool.uv.build-backend.module-root
//!     └── my_package/
//!         └── __init__.py
//! ```
//!
//! Nothing here writes to disk.

use crate::manifest::{DataCategory, PackageManifest, Readme, MANIFEST_FILE};
use crate::ManifestError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Marker file of a regular Python package.
pub const INIT_FILE: &str = "__init__.py";

/// Errors that can occur when checking a source tree.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("project directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("manifest not found at: {}", .0.display())]
    ManifestNotFound(PathBuf),

    #[error("module root `{}` does not exist", .0.display())]
    MissingModuleRoot(PathBuf),

    #[error("expected module `{module}` at `{}`", path.display())]
    MissingModule { module: String, path: PathBuf },

    #[error("readme file `{}` does not exist", .0.display())]
    MissingReadme(PathBuf),

    #[error("`project.license-files` pattern '{0}' does not match any file")]
    UnmatchedLicenseGlob(String),

    #[error("data directory `{}` for category `{category}` does not exist", path.display())]
    MissingDataDir {
        category: DataCategory,
        path: PathBuf,
    },

    #[error("project path `{}` is not valid UTF-8", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Resolved on-disk locations of everything a manifest refers to.
#[derive(Debug, Clone)]
pub struct SourceTree {
    /// Project root directory.
    pub root: PathBuf,

    /// Path to `pyproject.toml`.
    pub manifest_path: PathBuf,

    /// Directory that contains the module.
    pub module_root: PathBuf,

    /// Directory of the module itself.
    pub module_dir: PathBuf,

    /// Readme file, when the manifest declares one by path.
    pub readme: Option<PathBuf>,

    /// Every file matched by `project.license-files`, sorted.
    pub license_files: Vec<PathBuf>,

    /// Wheel data directories.
    pub data_dirs: BTreeMap<DataCategory, PathBuf>,
}

impl SourceTree {
    /// Check the source tree at `root` against `manifest`.
    ///
    /// # Errors
    ///
    /// Returns the first missing file or directory.
    pub fn discover(root: impl AsRef<Path>, manifest: &PackageManifest) -> Result<Self, LayoutError> {
        let root = root.as_ref().to_path_buf();

        if !root.is_dir() {
            return Err(LayoutError::NotFound(root));
        }

        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(LayoutError::ManifestNotFound(manifest_path));
        }

        let module_root = root.join(&manifest.build_backend.module_root);
        if !module_root.is_dir() {
            return Err(LayoutError::MissingModuleRoot(module_root));
        }

        let module = manifest.module_name();
        let module_dir = module
            .split('.')
            .fold(module_root.clone(), |dir, segment| dir.join(segment));
        let init = module_dir.join(INIT_FILE);
        if !init.is_file() {
            return Err(LayoutError::MissingModule { module, path: init });
        }

        let readme = match manifest.readme.as_ref().and_then(Readme::path) {
            Some(path) => {
                let path = root.join(path);
                if !path.is_file() {
                    return Err(LayoutError::MissingReadme(path));
                }
                Some(path)
            }
            None => None,
        };

        let license_files = collect_license_files(&root, &manifest.license_files)?;

        let mut data_dirs = BTreeMap::new();
        for (category, dir) in &manifest.build_backend.data {
            let path = root.join(dir);
            if !path.is_dir() {
                return Err(LayoutError::MissingDataDir {
                    category: *category,
                    path,
                });
            }
            data_dirs.insert(*category, path);
        }

        debug!(
            root = %root.display(),
            module = %module,
            license_files = license_files.len(),
            "checked source tree"
        );

        Ok(Self {
            root,
            manifest_path,
            module_root,
            module_dir,
            readme,
            license_files,
            data_dirs,
        })
    }

    /// Load the manifest in `root` and check the tree around it.
    pub fn load(root: impl AsRef<Path>) -> Result<(PackageManifest, Self), LayoutError> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE);
        if !manifest_path.is_file() {
            return Err(LayoutError::ManifestNotFound(manifest_path));
        }
        let manifest = PackageManifest::from_path(&manifest_path)?;
        let tree = Self::discover(root, &manifest)?;
        Ok((manifest, tree))
    }

    /// Find the nearest project at or above `start`, then load and check it.
    pub fn find_root(start: impl AsRef<Path>) -> Result<(PackageManifest, Self), LayoutError> {
        let (manifest_path, manifest) = PackageManifest::find(start)?;
        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let tree = Self::discover(root, &manifest)?;
        Ok((manifest, tree))
    }
}

fn collect_license_files(root: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, LayoutError> {
    let root_str = root
        .to_str()
        .ok_or_else(|| LayoutError::NonUtf8Path(root.to_path_buf()))?;
    let base = glob::Pattern::escape(root_str);
    let base = base.trim_end_matches('/');

    let mut files = Vec::new();
    for pattern in patterns {
        let mut matched: Vec<PathBuf> = glob::glob(&format!("{base}/{pattern}"))?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        if matched.is_empty() {
            return Err(LayoutError::UnmatchedLicenseGlob(pattern.clone()));
        }
        files.append(&mut matched);
    }

    files.sort();
    files.dedup();
    Ok(files)
}
