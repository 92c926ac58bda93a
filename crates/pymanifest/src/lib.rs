//! Loading and validation of `pyproject.toml` manifests for the uv build
//! backend.
//!
//! This crate provides:
//! - Parsing and validation of `pyproject.toml` into a typed [`PackageManifest`]
//! - PEP 440 versions and specifiers, PEP 508 requirements and entry points
//! - Glob checks for license files and build-backend include/exclude lists
//! - Source-tree checks for the files a manifest refers to

mod entry_point;
mod error;
mod globs;
mod keys;
mod layout;
mod manifest;
pub mod pyproject;
mod requirement;
mod version;

pub use entry_point::{EntryPoint, EntryPointError};
pub use error::{ManifestError, ValidationError};
pub use globs::{validate_build_glob, validate_license_glob, GlobError};
pub use keys::{find_duplicate_key, DuplicateKey};
pub use layout::{LayoutError, SourceTree, INIT_FILE};
pub use manifest::{
    BuildBackendOptions, BuildSystem, DataCategory, License, ManifestWarning, PackageManifest,
    Readme, DEFAULT_MODULE_ROOT, MANIFEST_FILE, NAMED_ENTRY_TABLES, UV_BUILD_BACKEND,
};
pub use pyproject::Contact;
pub use requirement::{PackageName, Requirement, RequirementError};
pub use version::{
    LocalSegment, Operator, PreRelease, Version, VersionError, VersionSpecifier,
    VersionSpecifiers,
};
