use anyhow::{Context, Result};
use axum::Router;
use sitekit_core::ExportFormat;
use std::fs;
use std::path::PathBuf;
use tower_http::services::ServeDir;

/// Serve the generated static bundle locally.
///
/// Always renders the static-html format: the framework scaffolds need
/// their own toolchain to run, so they are not previewable here.
pub async fn run(path: PathBuf, port: u16) -> Result<()> {
    let project = super::load_project(&path)?;

    let build_dir = tempfile::tempdir().context("Failed to create preview directory")?;
    let files =
        sitekit_generator::generate(&project.site, &project.components, ExportFormat::StaticHtml);
    for file in &files {
        let dest = build_dir.path().join(&file.path);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &file.content)?;
    }

    println!("🚀 Preview server running");
    println!("   Site: {}", project.site.name);
    println!("   URL:  http://localhost:{}", port);
    println!();
    println!("Press Ctrl+C to stop");

    let app = Router::new().fallback_service(ServeDir::new(build_dir.path()));
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    axum::serve(listener, app).await?;

    Ok(())
}
