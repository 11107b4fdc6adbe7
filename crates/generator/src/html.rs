//! Static HTML output: one self-contained document plus css/, js/, images/
//! and the Netlify redirect manifest, deployable without a build step.

use crate::render::{RenderContext, render_component};
use crate::{ensure_pages, generated_stamp, html_escape};
use sitekit_core::{ComponentRecord, Site, VirtualFile};

pub(crate) fn generate_static_site(
    site: &Site,
    components: &[&ComponentRecord],
) -> Vec<VirtualFile> {
    let pages = ensure_pages(site);
    let ctx = RenderContext {
        site_name: &site.name,
    };

    let nav_links: String = pages
        .iter()
        .map(|page| {
            format!(
                "<li><a href=\"#{}\">{}</a></li>",
                html_escape(&page.slug),
                html_escape(&page.title)
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ");

    let component_html: String = components
        .iter()
        .map(|record| render_component(record, &ctx))
        .collect::<Vec<_>>()
        .join("\n    ");

    let page_sections: String = pages
        .iter()
        .map(|page| {
            format!(
                r#"<section id="{}" class="page-section">
      <div class="page-content">
        {}
      </div>
    </section>"#,
                html_escape(&page.slug),
                page.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    let index = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <meta name="description" content="{description}">
  {stamp}
  <link rel="stylesheet" href="./css/styles.css">
  <link rel="icon" href="./favicon.ico" type="image/x-icon">
</head>
<body>
  <header>
    <nav class="navbar">
      <div class="container">
        <div class="logo">{title}</div>
        <ul class="nav-links">
          {nav_links}
        </ul>
      </div>
    </nav>
  </header>

  <main class="container">
    {component_html}
    {page_sections}
  </main>

  <footer>
    <div class="container">
      <p>&copy; <span id="year"></span> {title}. All rights reserved.</p>
    </div>
  </footer>

  <script src="./js/main.js"></script>
</body>
</html>
"#,
        title = html_escape(&site.name),
        description = html_escape(if site.description.is_empty() {
            "Created with sitekit"
        } else {
            &site.description
        }),
        stamp = generated_stamp(),
        nav_links = nav_links,
        component_html = component_html,
        page_sections = page_sections,
    );

    vec![
        VirtualFile::text("index.html", index),
        VirtualFile::text("css/styles.css", STYLESHEET),
        VirtualFile::text("js/main.js", main_js(&site.name)),
        VirtualFile::text("images/.gitkeep", ""),
        VirtualFile::binary("favicon.ico", Vec::new()),
        VirtualFile::text("netlify.toml", NETLIFY_MANIFEST),
    ]
}

/// Catch-all redirect so deep links resolve to the single document.
const NETLIFY_MANIFEST: &str = r#"[build]
  publish = "/"

[[redirects]]
  from = "/*"
  to = "/index.html"
  status = 200
"#;

const STYLESHEET: &str = r#"/* Base styles */
:root {
  --primary-color: #3498db;
  --secondary-color: #2c3e50;
  --text-color: #333;
  --light-color: #f8f9fa;
  --dark-color: #343a40;
}

* {
  margin: 0;
  padding: 0;
  box-sizing: border-box;
}

body {
  font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
  line-height: 1.6;
  color: var(--text-color);
  background-color: #fff;
}

.container {
  width: 100%;
  max-width: 1200px;
  margin: 0 auto;
  padding: 0 15px;
}

/* Navigation */
.navbar {
  background-color: #fff;
  box-shadow: 0 2px 5px rgba(0,0,0,0.1);
  padding: 1rem 0;
  position: sticky;
  top: 0;
  z-index: 100;
}

.navbar .container {
  display: flex;
  justify-content: space-between;
  align-items: center;
}

.logo {
  font-size: 1.5rem;
  font-weight: bold;
  color: var(--primary-color);
}

.nav-links {
  display: flex;
  list-style: none;
}

.nav-links li {
  margin-left: 1.5rem;
}

.nav-links a {
  text-decoration: none;
  color: var(--text-color);
  font-weight: 500;
  transition: color 0.3s;
}

.nav-links a:hover {
  color: var(--primary-color);
}

/* Main content */
main {
  padding: 3rem 0;
}

.hero {
  text-align: center;
  padding: 6rem 2rem;
  background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%);
  margin-bottom: 2rem;
}

.hero h1 {
  font-size: 3.5rem;
  margin-bottom: 1.5rem;
  color: #1a1a1a;
}

.hero p {
  font-size: 1.5rem;
  color: #6c757d;
  margin-bottom: 2rem;
}

.btn {
  display: inline-block;
  padding: 1rem 2rem;
  background-color: var(--primary-color);
  color: white;
  border: none;
  border-radius: 4px;
  cursor: pointer;
  font-size: 1.1rem;
  text-decoration: none;
  transition: all 0.3s ease;
}

.btn:hover {
  background-color: #0056b3;
  transform: translateY(-2px);
}

.page-section {
  margin-bottom: 4rem;
  scroll-margin-top: 5rem;
}

.page-content,
.component {
  background-color: #fff;
  padding: 2rem;
  border-radius: 8px;
  box-shadow: 0 2px 10px rgba(0,0,0,0.05);
  margin-bottom: 2rem;
}

.about,
.contact,
.testimonials {
  padding: 3rem 2rem;
}

.about-split {
  display: flex;
  gap: 2rem;
  align-items: center;
}

.about-split img {
  max-width: 45%;
  border-radius: 8px;
}

.card-grid,
.features-grid {
  display: grid;
  grid-template-columns: repeat(auto-fit, minmax(300px, 1fr));
  gap: 2rem;
}

.card,
.feature-item {
  padding: 2rem;
  background: white;
  border-radius: 8px;
  box-shadow: 0 2px 15px rgba(0,0,0,0.05);
  transition: transform 0.3s ease;
}

.feature-item:hover {
  transform: translateY(-5px);
}

.testimonial-list blockquote {
  border-left: 4px solid var(--primary-color);
  padding: 1rem 1.5rem;
  margin-bottom: 1.5rem;
  background: var(--light-color);
}

.testimonial-list cite {
  display: block;
  margin-top: 0.5rem;
  color: #6c757d;
}

.contact-form .form-field {
  margin-bottom: 1rem;
}

.contact-form label {
  display: block;
  margin-bottom: 0.25rem;
  font-weight: 500;
}

.contact-form input,
.contact-form textarea {
  width: 100%;
  padding: 0.5rem;
  border: 1px solid #ced4da;
  border-radius: 4px;
}

/* Footer */
footer,
.footer {
  background-color: var(--dark-color);
  color: #fff;
  padding: 2rem 0;
  text-align: center;
}

.footer-links {
  display: flex;
  justify-content: center;
  gap: 1.5rem;
  list-style: none;
  margin: 1rem 0;
}

.footer-links a {
  color: #fff;
  text-decoration: none;
}

/* Responsive design */
@media (max-width: 768px) {
  .navbar .container {
    flex-direction: column;
    gap: 1rem;
  }

  .hero h1 {
    font-size: 2.5rem;
  }

  .about-split {
    flex-direction: column;
  }

  .about-split img {
    max-width: 100%;
  }

  .nav-links {
    width: 100%;
    justify-content: center;
    gap: 1rem;
  }

  .nav-links li {
    margin-left: 0;
  }
}
"#;

fn main_js(site_name: &str) -> String {
    format!(
        r##"// Main JavaScript file
document.addEventListener('DOMContentLoaded', function() {{
  console.log('{} website loaded successfully!');

  // Fill in the copyright year
  document.querySelectorAll('#year').forEach(function(el) {{
    el.textContent = new Date().getFullYear();
  }});

  // Smooth scrolling for anchor links
  document.querySelectorAll('a[href^="#"]').forEach(function(anchor) {{
    anchor.addEventListener('click', function(e) {{
      e.preventDefault();

      const targetElement = document.querySelector(this.getAttribute('href'));
      if (targetElement) {{
        window.scrollTo({{
          top: targetElement.offsetTop - 70,
          behavior: 'smooth'
        }});
      }}
    }});
  }});
}});
"##,
        site_name.replace('\'', "\\'")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered_components;
    use sitekit_core::Page;

    fn site() -> Site {
        Site {
            name: "Demo".into(),
            description: "d".into(),
            pages: vec![
                Page {
                    id: "home".into(),
                    title: "Home".into(),
                    slug: "home".into(),
                    content: "<p>hi</p>".into(),
                    is_published: true,
                },
                Page {
                    id: "about".into(),
                    title: "About".into(),
                    slug: "about".into(),
                    content: "<p>about</p>".into(),
                    is_published: true,
                },
            ],
        }
    }

    #[test]
    fn emits_expected_file_layout() {
        let files = generate_static_site(&site(), &[]);
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
        for expected in [
            "index.html",
            "css/styles.css",
            "js/main.js",
            "images/.gitkeep",
            "favicon.ico",
            "netlify.toml",
        ] {
            assert!(paths.contains(&expected), "missing {}", expected);
        }
    }

    #[test]
    fn navigation_is_built_from_page_slugs() {
        let files = generate_static_site(&site(), &[]);
        let index = files.iter().find(|f| f.path == "index.html").unwrap();
        let content = index.content_str();
        assert!(content.contains("href=\"#home\">Home</a>"));
        assert!(content.contains("href=\"#about\">About</a>"));
        assert!(content.contains("<section id=\"about\""));
    }

    #[test]
    fn redirect_manifest_routes_everything_to_index() {
        let files = generate_static_site(&site(), &[]);
        let manifest = files.iter().find(|f| f.path == "netlify.toml").unwrap();
        let content = manifest.content_str();
        assert!(content.contains("from = \"/*\""));
        assert!(content.contains("to = \"/index.html\""));
        assert!(content.contains("status = 200"));
    }

    #[test]
    fn components_appear_in_document() {
        let record = ComponentRecord::new("hero-1", "centered-hero");
        let components = vec![record];
        let ordered = ordered_components(&components);
        let files = generate_static_site(&site(), &ordered);
        let index = files.iter().find(|f| f.path == "index.html").unwrap();
        assert!(index.content_str().contains("class=\"hero\""));
    }
}
