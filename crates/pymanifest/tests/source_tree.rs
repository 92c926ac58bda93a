//! Source-tree checks against a real directory layout.

mod common;

use common::{write_built_by_uv, BUILT_BY_UV};
use pymanifest::{DataCategory, LayoutError, PackageManifest, SourceTree, MANIFEST_FILE};
use std::fs;
use tempfile::TempDir;

#[test]
fn complete_tree_passes() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());

    let (manifest, tree) = SourceTree::load(dir.path()).unwrap();
    assert_eq!(manifest.name.as_str(), "built-by-uv");
    assert_eq!(tree.module_dir, dir.path().join("src").join("built_by_uv"));
    assert_eq!(tree.readme, Some(dir.path().join("README.md")));
    assert_eq!(tree.license_files.len(), 3);
    assert_eq!(tree.data_dirs[&DataCategory::Headers], dir.path().join("header"));
}

#[test]
fn find_root_from_nested_directory() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());

    let (_, tree) = SourceTree::find_root(dir.path().join("assets")).unwrap();
    assert_eq!(tree.manifest_path, dir.path().join(MANIFEST_FILE));
}

#[test]
fn missing_module() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::remove_file(dir.path().join("src/built_by_uv/__init__.py")).unwrap();

    match SourceTree::load(dir.path()) {
        Err(LayoutError::MissingModule { module, .. }) => assert_eq!(module, "built_by_uv"),
        other => panic!("expected a missing module, got {other:?}"),
    }
}

#[test]
fn missing_module_root() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::remove_dir_all(dir.path().join("src")).unwrap();

    assert!(matches!(
        SourceTree::load(dir.path()),
        Err(LayoutError::MissingModuleRoot(_))
    ));
}

#[test]
fn missing_readme() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::remove_file(dir.path().join("README.md")).unwrap();

    assert!(matches!(
        SourceTree::load(dir.path()),
        Err(LayoutError::MissingReadme(_))
    ));
}

#[test]
fn unmatched_license_pattern() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::remove_dir_all(dir.path().join("third-party-licenses")).unwrap();

    match SourceTree::load(dir.path()) {
        Err(LayoutError::UnmatchedLicenseGlob(pattern)) => {
            assert_eq!(pattern, "third-party-licenses/*");
        }
        other => panic!("expected an unmatched license glob, got {other:?}"),
    }
}

#[test]
fn missing_data_directory() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::remove_dir_all(dir.path().join("assets")).unwrap();

    assert!(matches!(
        SourceTree::load(dir.path()),
        Err(LayoutError::MissingDataDir {
            category: DataCategory::Data,
            ..
        })
    ));
}

#[test]
fn custom_module_root_and_name() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    let toml = BUILT_BY_UV.replace(
        "[tool.uv.build-backend]",
        "[tool.uv.build-backend]\nmodule-root = \"\"\nmodule-name = \"byuv.core\"",
    );
    fs::write(dir.path().join(MANIFEST_FILE), &toml).unwrap();
    fs::create_dir_all(dir.path().join("byuv/core")).unwrap();
    fs::write(dir.path().join("byuv/core/__init__.py"), "").unwrap();

    let manifest = PackageManifest::parse(&toml).unwrap();
    let tree = SourceTree::discover(dir.path(), &manifest).unwrap();
    assert_eq!(tree.module_dir, dir.path().join("byuv").join("core"));
}

#[test]
fn invalid_manifest_surfaces_as_manifest_error() {
    let dir = TempDir::new().unwrap();
    write_built_by_uv(dir.path());
    fs::write(dir.path().join(MANIFEST_FILE), "[project]\nname = \"x\"\n").unwrap();

    assert!(matches!(
        SourceTree::load(dir.path()),
        Err(LayoutError::Manifest(_))
    ));
}
