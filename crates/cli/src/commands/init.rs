use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const STARTER_SITE_TOML: &str = r#"[site]
name = "My Website"
description = "Built with sitekit"
assets = "assets"

[deploy]
# site_name = "my-website"
format = "static-html"

[[page]]
title = "Home"
slug = "home"
content = """
<h2>Hello</h2>
<p>Edit site.toml to change this page.</p>
"""

[[component]]
id = "navbar-1"
type = "simple-navbar"

[component.properties]
logo = "My Website"

[[component]]
id = "hero-1"
type = "centered-hero"

[component.properties]
heading = "Welcome to My Website"
subheading = "The best platform for your needs"
buttonText = "Get Started"

[[component]]
id = "features-1"
type = "features-grid"

[[component]]
id = "footer-1"
type = "simple-footer"
"#;

/// Scaffold a new site directory with a starter site.toml
pub async fn run(path: PathBuf) -> Result<()> {
    println!("✨ Initializing new site at: {}", path.display());

    let config_path = path.join("site.toml");
    if config_path.exists() {
        anyhow::bail!("site.toml already exists in {}", path.display());
    }

    fs::create_dir_all(&path).context("Failed to create site directory")?;
    fs::create_dir_all(path.join("assets")).context("Failed to create assets directory")?;
    fs::write(&config_path, STARTER_SITE_TOML).context("Failed to write site.toml")?;

    println!("   ✓ Created site.toml");
    println!("   ✓ Created assets/");
    println!();
    println!("✅ Site initialized!");
    println!();
    println!("Next steps:");
    println!("   1. Edit {}/site.toml", path.display());
    println!("   2. sitekit preview {}", path.display());
    println!("   3. sitekit deploy publish {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starter_config_parses_and_uses_known_components() {
        let project = sitekit_core::parse_site_toml_str(STARTER_SITE_TOML).unwrap();
        assert_eq!(project.site.pages.len(), 1);
        for component in &project.components {
            assert!(
                sitekit_registry::by_type(&component.component_type).is_some(),
                "starter uses unknown type {}",
                component.component_type
            );
        }
    }
}
