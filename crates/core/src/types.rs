use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One placed, configured building block of a page (e.g. a navbar instance).
///
/// `order` is kept dense: after any insert, remove, or reorder the list is
/// re-numbered 0..N-1 so it always matches list position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub order: usize,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl ComponentRecord {
    pub fn new(id: impl Into<String>, component_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            component_type: component_type.into(),
            order: 0,
            properties: Map::new(),
        }
    }

    /// String-valued property, if present.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Re-number `order` so it is dense and matches list position.
pub fn renumber(components: &mut [ComponentRecord]) {
    for (index, component) in components.iter_mut().enumerate() {
        component.order = index;
    }
}

/// A site under construction: metadata plus its ordered pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

/// One page of a site. Slugs are unique per site and URL-safe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub slug: String,
    /// HTML fragment making up the page body.
    pub content: String,
    pub is_published: bool,
}

/// An in-memory (path, content) pair not yet written to persistent storage.
///
/// Paths are relative, `/`-separated, and preserved verbatim through
/// archiving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    pub path: String,
    pub content: Vec<u8>,
}

impl VirtualFile {
    pub fn text(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into().into_bytes(),
        }
    }

    pub fn binary(path: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content,
        }
    }

    /// Content as UTF-8, lossy for binary payloads.
    pub fn content_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

/// Output flavor produced by the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExportFormat {
    /// Plain HTML/CSS/JS bundle, deployable as-is.
    StaticHtml,
    /// Vite + React project scaffold.
    React,
    /// Astro project scaffold.
    Astro,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::StaticHtml => "static-html",
            ExportFormat::React => "react",
            ExportFormat::Astro => "astro",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "static-html" | "html" => Ok(ExportFormat::StaticHtml),
            "react" => Ok(ExportFormat::React),
            "astro" => Ok(ExportFormat::Astro),
            other => Err(crate::error::Error::InvalidData(format!(
                "Unknown export format '{}'. Expected static-html, react, or astro.",
                other
            ))),
        }
    }
}

/// Deploy-related settings from site.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploySettings {
    /// Remote site name; derived from the site name when absent.
    pub site_name: Option<String>,
    pub format: ExportFormat,
}

impl Default for DeploySettings {
    fn default() -> Self {
        Self {
            site_name: None,
            format: ExportFormat::StaticHtml,
        }
    }
}

/// A fully-loaded project directory: the site, its component list, and
/// deploy settings.
#[derive(Debug, Clone)]
pub struct SiteProject {
    pub site: Site,
    pub components: Vec<ComponentRecord>,
    pub deploy: DeploySettings,
    /// Optional directory of static assets copied into the build's images/.
    pub assets_dir: Option<PathBuf>,
}

/// Record handed to the history sink after a successful deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub project: String,
    pub site_name: String,
    pub url: String,
    pub deployed_at: DateTime<Utc>,
    pub status: String,
}

/// Get a URL-safe slug from free-form text: lowercase ASCII alphanumerics
/// joined by single hyphens, everything else dropped.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c
            } else if c.is_whitespace() || c == '-' || c == '_' {
                '-'
            } else {
                '\0'
            }
        })
        .filter(|&c| c != '\0')
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
