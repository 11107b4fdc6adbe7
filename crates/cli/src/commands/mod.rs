pub mod build;
pub mod deploy;
pub mod export;
pub mod init;
pub mod preview;
pub mod validate;

use anyhow::{Context, Result};
use sitekit_core::{ExportFormat, SiteProject, parse_site_toml};
use std::path::Path;

/// Load a project directory's site.toml, with the standard hint when the
/// file is missing.
pub(crate) fn load_project(path: &Path) -> Result<SiteProject> {
    let config_path = path.join("site.toml");
    if !config_path.exists() {
        anyhow::bail!(
            "site.toml not found in {}\nRun 'sitekit init {}' first",
            path.display(),
            path.display()
        );
    }
    parse_site_toml(&config_path).context("Failed to parse site.toml")
}

/// Command-line format override, falling back to the project's configured
/// format.
pub(crate) fn resolve_format(
    project: &SiteProject,
    format: Option<&str>,
) -> Result<ExportFormat> {
    match format {
        Some(f) => Ok(f.parse()?),
        None => Ok(project.deploy.format),
    }
}
