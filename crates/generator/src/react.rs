//! Vite + React project scaffold: one source file per component, an entry
//! page that renders them all in order, and the build configuration.

use crate::render::effective_properties;
use crate::{component_ident, ensure_pages};
use serde_json::json;
use sitekit_core::{ComponentRecord, Site, VirtualFile};
use std::collections::HashSet;

pub(crate) fn generate_react_project(
    site: &Site,
    components: &[&ComponentRecord],
) -> Vec<VirtualFile> {
    let mut files = vec![
        VirtualFile::text("package.json", package_json(site)),
        VirtualFile::text("vite.config.js", VITE_CONFIG),
        VirtualFile::text("index.html", index_html(site)),
        VirtualFile::text("src/main.jsx", MAIN_JSX),
        VirtualFile::text("src/App.jsx", app_jsx(site, components)),
        VirtualFile::text("src/styles/globals.css", GLOBAL_CSS),
        VirtualFile::binary("public/favicon.ico", Vec::new()),
    ];

    // One file per distinct component type
    let mut seen = HashSet::new();
    for record in components {
        let ident = component_ident(&record.component_type);
        if !seen.insert(ident.clone()) {
            continue;
        }
        files.push(VirtualFile::text(
            format!("src/components/{}.jsx", ident),
            component_jsx(record, &ident),
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
            "dev": "vite",
            "build": "vite build",
            "preview": "vite preview",
        },
        "dependencies": {
            "react": "^18.2.0",
            "react-dom": "^18.2.0",
        },
        "devDependencies": {
            "@vitejs/plugin-react": "^4.0.0",
            "vite": "^5.0.0",
        },
    });
    serde_json::to_string_pretty(&manifest).expect("static manifest serializes") + "\n"
}

const VITE_CONFIG: &str = r#"import { defineConfig } from 'vite';
import react from '@vitejs/plugin-react';

export default defineConfig({
  plugins: [react()],
});
"#;

fn index_html(site: &Site) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link rel="icon" href="/favicon.ico" />
    <title>{}</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.jsx"></script>
  </body>
</html>
"#,
        crate::html_escape(&site.name)
    )
}

const MAIN_JSX: &str = r#"import React from 'react';
import ReactDOM from 'react-dom/client';
import App from './App';
import './styles/globals.css';

ReactDOM.createRoot(document.getElementById('root')).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>
);
"#;

fn app_jsx(site: &Site, components: &[&ComponentRecord]) -> String {
    let mut imported = HashSet::new();
    let imports: String = components
        .iter()
        .filter_map(|record| {
            let ident = component_ident(&record.component_type);
            imported
                .insert(ident.clone())
                .then(|| format!("import {0} from './components/{0}';", ident))
        })
        .collect::<Vec<_>>()
        .join("\n");

    let rendered: String = components
        .iter()
        .map(|record| {
            let ident = component_ident(&record.component_type);
            let props = serde_json::Value::Object(effective_properties(record));
            format!("      <{} {{...{}}} />", ident, props)
        })
        .collect::<Vec<_>>()
        .join("\n");

    let page_sections: String = ensure_pages(site)
        .iter()
        .map(|page| {
            format!(
                "      <section id=\"{}\" dangerouslySetInnerHTML={{{{ __html: {} }}}} />",
                page.slug,
                serde_json::Value::String(page.content.clone())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{imports}

export default function App() {{
  return (
    <main>
{rendered}
{page_sections}
      <footer>
        <p>&copy; {{new Date().getFullYear()}} {name}. All rights reserved.</p>
      </footer>
    </main>
  );
}}
"#,
        imports = imports,
        rendered = rendered,
        page_sections = page_sections,
        name = site.name.replace('{', "").replace('}', ""),
    )
}

fn component_jsx(record: &ComponentRecord, ident: &str) -> String {
    let category = sitekit_registry::by_type(&record.component_type).map(|t| t.category);
    match category {
        Some(sitekit_registry::Category::Hero) => format!(
            r#"export default function {ident}(props) {{
  return (
    <section className="hero">
      <h1>{{props.heading || 'Welcome'}}</h1>
      <p>{{props.subheading || ''}}</p>
      {{props.buttonText && <a className="btn" href={{props.buttonUrl || '#'}}>{{props.buttonText}}</a>}}
    </section>
  );
}}
"#
        ),
        Some(sitekit_registry::Category::Navbar) => format!(
            r#"export default function {ident}(props) {{
  const links = props.links || [...(props.leftLinks || []), ...(props.rightLinks || [])];
  return (
    <nav className="navbar">
      <div className="logo">{{props.logo || 'Logo'}}</div>
      <ul className="nav-links">
        {{links.map((link, index) => (
          <li key={{index}}><a href={{link.url || '#'}}>{{link.label || 'Link'}}</a></li>
        ))}}
      </ul>
    </nav>
  );
}}
"#
        ),
        Some(sitekit_registry::Category::Footer) => format!(
            r#"export default function {ident}(props) {{
  return (
    <footer className="footer">
      <div className="logo">{{props.logo || ''}}</div>
      <p>&copy; {{new Date().getFullYear()}} {{props.copyright || 'All rights reserved.'}}</p>
    </footer>
  );
}}
"#
        ),
        _ => format!(
            r#"export default function {ident}(props) {{
  return (
    <div className="component {class_name}">
      <h2>{{props.heading || props.title || '{ident}'}}</h2>
      <p>{{props.content || props.description || 'Content goes here'}}</p>
    </div>
  );
}}
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
  max-width: 1200px;
  margin: 0 auto;
}

.hero {
  text-align: center;
  padding: 6rem 2rem;
  background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%);
}

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

.btn {
  display: inline-block;
  padding: 1rem 2rem;
  background-color: #3498db;
  color: white;
  border-radius: 4px;
  text-decoration: none;
}

.footer {
  text-align: center;
  padding: 2rem;
  background: #343a40;
  color: white;
  margin-top: 2rem;
}
"#;
