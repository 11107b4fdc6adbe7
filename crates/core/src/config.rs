use crate::error::{Error, Result};
use crate::types::*;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Raw TOML configuration structure
/// This matches the site.toml file structure exactly
#[derive(Debug, Deserialize)]
struct RawConfig {
    site: RawSite,
    #[serde(default)]
    deploy: Option<RawDeploy>,
    #[serde(default)]
    page: Vec<RawPage>,
    #[serde(default)]
    component: Vec<RawComponent>,
}

#[derive(Debug, Deserialize)]
struct RawSite {
    name: String,
    #[serde(default)]
    description: String,
    assets: Option<String>, // Convert to PathBuf after validation
}

#[derive(Debug, Deserialize)]
struct RawDeploy {
    site_name: Option<String>,
    format: Option<String>, // Parse as ExportFormat
}

#[derive(Debug, Deserialize)]
struct RawPage {
    id: Option<String>,
    title: String,
    slug: String,
    #[serde(default)]
    content: String,
    #[serde(default = "default_published")]
    published: bool,
}

fn default_published() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    id: String,
    #[serde(rename = "type")]
    component_type: String,
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
}

/// Parse site.toml from a file path
pub fn parse_site_toml<P: AsRef<Path>>(path: P) -> Result<SiteProject> {
    let content = fs::read_to_string(path)?;
    parse_site_toml_str(&content)
}

/// Parse site.toml from a string (useful for testing)
pub fn parse_site_toml_str(content: &str) -> Result<SiteProject> {
    let raw: RawConfig = toml::from_str(content)?;

    if raw.site.name.trim().is_empty() {
        return Err(Error::ConfigParse("site.name must not be empty".into()));
    }

    let assets_dir = if let Some(assets) = raw.site.assets {
        Some(validate_path(&assets, "site.assets")?)
    } else {
        None
    };

    // Convert pages, enforcing unique URL-safe slugs
    let mut seen_slugs = HashSet::new();
    let pages: Result<Vec<Page>> = raw
        .page
        .into_iter()
        .map(|p| {
            validate_slug(&p.slug)?;
            if !seen_slugs.insert(p.slug.clone()) {
                return Err(Error::ConfigParse(format!(
                    "Duplicate page slug '{}'",
                    p.slug
                )));
            }
            Ok(Page {
                id: p.id.unwrap_or_else(|| p.slug.clone()),
                title: p.title,
                slug: p.slug,
                content: p.content,
                is_published: p.published,
            })
        })
        .collect();

    // Convert components; order follows file position and is kept dense
    let mut seen_ids = HashSet::new();
    let components: Result<Vec<ComponentRecord>> = raw
        .component
        .into_iter()
        .map(|c| {
            if !seen_ids.insert(c.id.clone()) {
                return Err(Error::ConfigParse(format!(
                    "Duplicate component id '{}'",
                    c.id
                )));
            }
            Ok(ComponentRecord {
                id: c.id,
                component_type: c.component_type,
                order: 0,
                properties: c.properties,
            })
        })
        .collect();
    let mut components = components?;
    renumber(&mut components);

    let deploy = match raw.deploy {
        Some(d) => DeploySettings {
            site_name: d.site_name,
            format: match d.format {
                Some(f) => f.parse()?,
                None => ExportFormat::StaticHtml,
            },
        },
        None => DeploySettings::default(),
    };

    Ok(SiteProject {
        site: Site {
            name: raw.site.name,
            description: raw.site.description,
            pages: pages?,
        },
        components,
        deploy,
        assets_dir,
    })
}

/// Check that a page slug is URL-safe: lowercase ASCII alphanumerics and
/// hyphens, non-empty.
fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(Error::ConfigParse("Page slug must not be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(Error::ConfigParse(format!(
            "Page slug '{}' must contain only lowercase letters, numbers, and hyphens",
            slug
        )));
    }
    Ok(())
}

/// Validate and convert a path string to PathBuf.
///
/// Rejects absolute paths and parent directory references so a site.toml
/// cannot reach outside its project directory.
fn validate_path(path_str: &str, field_name: &str) -> Result<PathBuf> {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return Err(Error::ConfigParse(format!(
            "Absolute paths not allowed in '{}': '{}'. Use relative paths only.",
            field_name, path_str
        )));
    }

    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return Err(Error::ConfigParse(format!(
            "Parent directory references not allowed in '{}': '{}'",
            field_name, path_str
        )));
    }

    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
[site]
name = "Demo Site"
description = "A demo"

[[page]]
title = "Home"
slug = "home"
content = "<p>Hello</p>"

[[component]]
id = "hero-1"
type = "centered-hero"

[component.properties]
heading = "Welcome"

[[component]]
id = "footer-1"
type = "simple-footer"
"#;

    #[test]
    fn parses_minimal_config() {
        let project = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(project.site.name, "Demo Site");
        assert_eq!(project.site.pages.len(), 1);
        assert_eq!(project.site.pages[0].slug, "home");
        assert!(project.site.pages[0].is_published);
        assert_eq!(project.components.len(), 2);
        assert_eq!(project.deploy.format, ExportFormat::StaticHtml);
    }

    #[test]
    fn component_order_follows_file_position() {
        let project = parse_site_toml_str(MINIMAL).unwrap();
        assert_eq!(project.components[0].order, 0);
        assert_eq!(project.components[1].order, 1);
        assert_eq!(
            project.components[0].property_str("heading"),
            Some("Welcome")
        );
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let config = r#"
[site]
name = "Demo"

[[page]]
title = "One"
slug = "home"

[[page]]
title = "Two"
slug = "home"
"#;
        assert!(parse_site_toml_str(config).is_err());
    }

    #[test]
    fn rejects_unsafe_slug() {
        let config = r#"
[site]
name = "Demo"

[[page]]
title = "One"
slug = "Home Page"
"#;
        assert!(parse_site_toml_str(config).is_err());
    }

    #[test]
    fn rejects_duplicate_component_ids() {
        let config = r#"
[site]
name = "Demo"

[[component]]
id = "x"
type = "centered-hero"

[[component]]
id = "x"
type = "simple-footer"
"#;
        assert!(parse_site_toml_str(config).is_err());
    }

    #[test]
    fn parses_deploy_settings() {
        let config = r#"
[site]
name = "Demo"

[deploy]
site_name = "demo-site"
format = "astro"
"#;
        let project = parse_site_toml_str(config).unwrap();
        assert_eq!(project.deploy.site_name.as_deref(), Some("demo-site"));
        assert_eq!(project.deploy.format, ExportFormat::Astro);
    }

    #[test]
    fn rejects_escaping_assets_path() {
        let config = r#"
[site]
name = "Demo"
assets = "../outside"
"#;
        assert!(parse_site_toml_str(config).is_err());
    }

    #[test]
    fn empty_page_list_is_allowed() {
        let config = r#"
[site]
name = "Demo"
"#;
        let project = parse_site_toml_str(config).unwrap();
        assert!(project.site.pages.is_empty());
    }
}
