//! `pymanifest show`: dump the validated manifest as JSON.

use anyhow::{Context, Result};
use std::path::Path;

use crate::check::locate_manifest;

pub fn show_manifest(path: Option<&Path>) -> Result<()> {
    println!("{}", render_manifest(path)?);
    Ok(())
}

/// Load the manifest and render it as pretty JSON.
pub fn render_manifest(path: Option<&Path>) -> Result<String> {
    let (_, manifest) = locate_manifest(path)?;
    serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")
}
