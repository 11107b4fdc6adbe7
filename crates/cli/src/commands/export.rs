use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Generate the site and package it into a zip archive on disk
pub async fn run(path: PathBuf, output: Option<PathBuf>, format: Option<String>) -> Result<()> {
    println!("📦 Exporting site archive...");

    let project = super::load_project(&path)?;
    let format = super::resolve_format(&project, format.as_deref())?;

    let files = sitekit_generator::generate(&project.site, &project.components, format);
    let blob =
        sitekit_deployer::archive::archive(&files).context("Failed to package site archive")?;

    let output = output.unwrap_or_else(|| {
        PathBuf::from(format!(
            "{}-netlify-ready.zip",
            sitekit_core::slugify(&project.site.name)
        ))
    });
    fs::write(&output, &blob)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("   ✓ {} files, {} KiB", files.len(), blob.len() / 1024);
    println!();
    println!("✅ Exported to: {}", output.display());

    Ok(())
}
