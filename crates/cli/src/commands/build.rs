use anyhow::{Context, Result};
use sitekit_core::ExportFormat;
use std::fs;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Build the site bundle into an output directory
pub async fn run(path: PathBuf, output: PathBuf, format: Option<String>) -> Result<()> {
    println!("🔨 Building site bundle...");
    println!("   Source: {}", path.display());
    println!("   Output: {}", output.display());
    println!();

    if !path.exists() {
        anyhow::bail!("Site directory does not exist: {}", path.display());
    }

    let project = super::load_project(&path)?;
    let format = super::resolve_format(&project, format.as_deref())?;

    println!("✓ Loaded: {}", project.site.name);
    println!("  Pages: {}", project.site.pages.len());
    println!("  Components: {}", project.components.len());
    println!("  Format: {}", format);
    println!();

    println!("📄 Generating site files...");
    let files = sitekit_generator::generate(&project.site, &project.components, format);
    for file in &files {
        let dest = output.join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&dest, &file.content)
            .with_context(|| format!("Failed to write {}", dest.display()))?;
    }
    println!("   ✓ Wrote {} files", files.len());

    // Copy local assets into the bundle's image directory
    if let Some(assets) = &project.assets_dir {
        let assets_src = path.join(assets);
        if assets_src.exists() {
            let image_root = match format {
                ExportFormat::StaticHtml => output.join("images"),
                ExportFormat::React | ExportFormat::Astro => output.join("public/images"),
            };
            println!("🎨 Copying assets...");
            let mut copied = 0;
            for entry in WalkDir::new(&assets_src)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
            {
                let relative = entry
                    .path()
                    .strip_prefix(&assets_src)
                    .context("Failed to get relative asset path")?;
                let dest = image_root.join(relative);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &dest)
                    .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
                copied += 1;
            }
            println!("   ✓ Copied {} asset files", copied);
        }
    }

    println!();
    println!("✅ Build complete!");
    println!("   Output: {}", output.display());
    println!();
    println!("To test locally:");
    println!("   sitekit preview {}", path.display());
    println!();

    Ok(())
}
