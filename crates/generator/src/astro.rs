//! Astro project scaffold: a layout, one .astro source file per component,
//! and an index page that renders them all in order.

use crate::render::effective_properties;
use crate::{component_ident, ensure_pages, html_escape};
use serde_json::json;
use sitekit_core::{ComponentRecord, Site, VirtualFile};
use std::collections::HashSet;

pub(crate) fn generate_astro_project(
    site: &Site,
    components: &[&ComponentRecord],
) -> Vec<VirtualFile> {
    let mut files = vec![
        VirtualFile::text("package.json", package_json(site)),
        VirtualFile::text("astro.config.mjs", ASTRO_CONFIG),
        VirtualFile::text("src/pages/index.astro", index_astro(site, components)),
        VirtualFile::text("src/layouts/Layout.astro", layout_astro(site)),
        VirtualFile::text("src/styles/global.css", GLOBAL_CSS),
        VirtualFile::binary("public/favicon.ico", Vec::new()),
    ];

    let mut seen = HashSet::new();
    for record in components {
        let ident = component_ident(&record.component_type);
        if !seen.insert(ident.clone()) {
            continue;
        }
        files.push(VirtualFile::text(
            format!("src/components/{}.astro", ident),
            component_astro(record, &ident),
        ));
    }

    files
}

fn package_json(site: &Site) -> String {
    let manifest = json!({
        "name": sitekit_core::slugify(&site.name),
        "version": "0.1.0",
        "private": true,
        "scripts": {
            "dev": "astro dev",
            "start": "astro dev",
            "build": "astro build",
            "preview": "astro preview",
        },
        "dependencies": {
            "astro": "^4.0.0",
        },
    });
    serde_json::to_string_pretty(&manifest).expect("static manifest serializes") + "\n"
}

const ASTRO_CONFIG: &str = r#"import { defineConfig } from 'astro/config';

export default defineConfig({});
"#;

fn index_astro(site: &Site, components: &[&ComponentRecord]) -> String {
    let mut imported = HashSet::new();
    let imports: String = components
        .iter()
        .filter_map(|record| {
            let ident = component_ident(&record.component_type);
            imported
                .insert(ident.clone())
                .then(|| format!("import {0} from '../components/{0}.astro';", ident))
        })
        .collect::<Vec<_>>()
        .join("\n");

    // Props are bound in frontmatter so complex values spread cleanly
    let prop_consts: String = components
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let props = serde_json::Value::Object(effective_properties(record));
            format!("const props{} = {};", index, props)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let rendered: String = components
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let ident = component_ident(&record.component_type);
            format!("    <{} {{...props{}}} />", ident, index)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let page_sections: String = ensure_pages(site)
        .iter()
        .map(|page| {
            format!(
                "    <section id=\"{}\" set:html={} />",
                page.slug,
                serde_json::Value::String(page.content.clone())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"---
import Layout from '../layouts/Layout.astro';
{imports}

{prop_consts}
---

<Layout title="{title}">
  <main>
{rendered}
{page_sections}
  </main>
</Layout>
"#,
        imports = imports,
        prop_consts = prop_consts,
        title = html_escape(&site.name),
        rendered = rendered,
        page_sections = page_sections,
    )
}

fn layout_astro(site: &Site) -> String {
    format!(
        r#"---
interface Props {{
  title: string;
}}

const {{ title }} = Astro.props;
---

<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width" />
    <meta name="description" content="{description}" />
    <link rel="icon" type="image/x-icon" href="/favicon.ico" />
    <title>{{title}}</title>
  </head>
  <body>
    <slot />
    <footer>
      <p>&copy; {site_name}. All rights reserved.</p>
    </footer>
  </body>
</html>

<style>
  @import '../styles/global.css';

  footer {{
    text-align: center;
    padding: 2rem;
    background: #f8f9fa;
    margin-top: 2rem;
    border-top: 1px solid #e9ecef;
  }}
</style>
"#,
        description = html_escape(if site.description.is_empty() {
            "Created with sitekit"
        } else {
            &site.description
        }),
        site_name = html_escape(&site.name),
    )
}

fn component_astro(record: &ComponentRecord, ident: &str) -> String {
    let category = sitekit_registry::by_type(&record.component_type).map(|t| t.category);
    match category {
        Some(sitekit_registry::Category::Hero) => r#"---
interface Props {
  heading?: string;
  subheading?: string;
  buttonText?: string;
  buttonUrl?: string;
}

const { heading = 'Welcome', subheading = '', buttonText = '', buttonUrl = '#' } = Astro.props;
---

<section class="hero">
  <h1>{heading}</h1>
  <p>{subheading}</p>
  {buttonText && <a class="btn" href={buttonUrl}>{buttonText}</a>}
</section>

<style>
  .hero {
    text-align: center;
    padding: 4rem 2rem;
    background: linear-gradient(to right, #f8f9fa, #e9ecef);
    margin-bottom: 2rem;
  }
  h1 {
    font-size: 2.5rem;
    margin-bottom: 1rem;
  }
  p {
    font-size: 1.2rem;
    color: #6c757d;
    margin-bottom: 2rem;
  }
  .btn {
    display: inline-block;
    padding: 0.75rem 1.5rem;
    background-color: #3498db;
    color: white;
    border-radius: 4px;
    text-decoration: none;
  }
</style>
"#
        .to_string(),
        Some(sitekit_registry::Category::Navbar) => r#"---
interface Props {
  logo?: string;
  links?: { label?: string; url?: string }[];
  leftLinks?: { label?: string; url?: string }[];
  rightLinks?: { label?: string; url?: string }[];
}

const { logo = 'Logo', links, leftLinks = [], rightLinks = [] } = Astro.props;
const allLinks = links ?? [...leftLinks, ...rightLinks];
---

<nav class="navbar">
  <div class="logo">{logo}</div>
  <ul class="nav-links">
    {allLinks.map((link) => (
      <li><a href={link.url ?? '#'}>{link.label ?? 'Link'}</a></li>
    ))}
  </ul>
</nav>

<style>
  .navbar {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 1rem 2rem;
    box-shadow: 0 2px 5px rgba(0,0,0,0.1);
  }
  .nav-links {
    display: flex;
    list-style: none;
    gap: 1.5rem;
  }
  .nav-links a {
    text-decoration: none;
    color: #333;
  }
</style>
"#
        .to_string(),
        _ => format!(
            r#"---
interface Props {{
  heading?: string;
  title?: string;
  content?: string;
  description?: string;
}}

const {{ heading, title, content, description }} = Astro.props;
const blockTitle = heading ?? title ?? '{ident}';
const blockContent = content ?? description ?? 'Content goes here';
---

<div class="component {class_name}">
  <h2>{{blockTitle}}</h2>
  <p>{{blockContent}}</p>
</div>

<style>
  .component {{
    background: white;
    border-radius: 8px;
    box-shadow: 0 2px 10px rgba(0,0,0,0.1);
    padding: 2rem;
    margin-bottom: 2rem;
  }}
  h2 {{
    margin-bottom: 1rem;
    color: #343a40;
  }}
  p {{
    color: #6c757d;
  }}
</style>
"#,
            ident = ident,
            class_name = record.component_type,
        ),
    }
}

const GLOBAL_CSS: &str = r#"* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
  line-height: 1.6;
  color: #333;
}

main {
  margin: auto;
  padding: 1.5rem;
  max-width: 1200px;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered_components;

    fn site() -> Site {
        Site {
            name: "Demo Site".into(),
            description: String::new(),
            pages: vec![],
        }
    }

    #[test]
    fn emits_project_scaffold() {
        let components = vec![ComponentRecord::new("hero-1", "centered-hero")];
        let ordered = ordered_components(&components);
        let files = generate_astro_project(&site(), &ordered);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        for expected in [
            "package.json",
            "astro.config.mjs",
            "src/pages/index.astro",
            "src/layouts/Layout.astro",
            "src/styles/global.css",
            "src/components/CenteredHero.astro",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn index_imports_components_and_binds_props() {
        let mut record = ComponentRecord::new("hero-1", "centered-hero");
        record
            .properties
            .insert("heading".into(), serde_json::json!("Custom Heading"));
        let components = vec![record];
        let ordered = ordered_components(&components);
        let files = generate_astro_project(&site(), &ordered);
        let index = files
            .iter()
            .find(|f| f.path == "src/pages/index.astro")
            .unwrap();
        let content = index.content_str();
        assert!(content.contains("import CenteredHero from '../components/CenteredHero.astro';"));
        assert!(content.contains("Custom Heading"));
        assert!(content.contains("<CenteredHero {...props0} />"));
    }

    #[test]
    fn manifest_uses_astro_toolchain() {
        let files = generate_astro_project(&site(), &[]);
        let manifest = files.iter().find(|f| f.path == "package.json").unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&manifest.content).unwrap();
        assert_eq!(parsed["scripts"]["build"], "astro build");
        assert!(parsed["dependencies"]["astro"].is_string());
    }
}
