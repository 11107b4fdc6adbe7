//! Static HTML rendering of individual components.
//!
//! Dispatch is a lookup table from type tag to render function. Unknown tags
//! never abort generation: they fall through to a generic placeholder block.

use crate::html_escape;
use serde_json::{Map, Value};
use sitekit_core::ComponentRecord;

/// Context shared by all render functions.
pub struct RenderContext<'a> {
    pub site_name: &'a str,
}

type RenderFn = fn(&Map<String, Value>, &RenderContext) -> String;

const RENDERERS: &[(&str, RenderFn)] = &[
    ("simple-navbar", render_navbar),
    ("centered-navbar", render_navbar),
    ("centered-hero", render_hero),
    ("split-hero", render_hero),
    ("about-cards", render_about_cards),
    ("about-image-text", render_about_image_text),
    ("features-grid", render_features),
    ("testimonials", render_testimonials),
    ("contact-form", render_contact_form),
    ("contact-info", render_contact_info),
    ("simple-footer", render_footer),
    ("expanded-footer", render_footer),
];

fn lookup_renderer(component_type: &str) -> Option<RenderFn> {
    RENDERERS
        .iter()
        .find(|(tag, _)| *tag == component_type)
        .map(|(_, f)| *f)
}

/// Render one component to an HTML block.
pub fn render_component(record: &ComponentRecord, ctx: &RenderContext) -> String {
    let props = effective_properties(record);
    let renderer = lookup_renderer(&record.component_type).unwrap_or(render_placeholder);
    renderer(&props, ctx)
}

/// Registry defaults for the record's type, overlaid with the record's own
/// property values.
pub fn effective_properties(record: &ComponentRecord) -> Map<String, Value> {
    let mut props = sitekit_registry::by_type(&record.component_type)
        .and_then(|t| t.default_properties.as_object().cloned())
        .unwrap_or_default();
    for (key, value) in &record.properties {
        props.insert(key.clone(), value.clone());
    }
    props
}

fn prop_str<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    props.get(key).and_then(Value::as_str)
}

fn prop_array<'a>(props: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    props
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn escaped(props: &Map<String, Value>, key: &str, fallback: &str) -> String {
    html_escape(prop_str(props, key).unwrap_or(fallback))
}

fn link_items(links: &[Value]) -> String {
    links
        .iter()
        .map(|link| {
            let label = html_escape(
                link.get("label")
                    .or_else(|| link.get("text"))
                    .and_then(Value::as_str)
                    .unwrap_or("Link"),
            );
            let url = html_escape(link.get("url").and_then(Value::as_str).unwrap_or("#"));
            format!("<li><a href=\"{}\">{}</a></li>", url, label)
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn render_navbar(props: &Map<String, Value>, ctx: &RenderContext) -> String {
    let logo = escaped(props, "logo", ctx.site_name);
    // Centered navbars keep their links in two halves
    let mut links: Vec<Value> = prop_array(props, "links").to_vec();
    links.extend_from_slice(prop_array(props, "leftLinks"));
    links.extend_from_slice(prop_array(props, "rightLinks"));
    format!(
        r#"<nav class="navbar">
      <div class="container">
        <div class="logo">{}</div>
        <ul class="nav-links">
          {}
        </ul>
      </div>
    </nav>"#,
        logo,
        link_items(&links)
    )
}

fn render_hero(props: &Map<String, Value>, ctx: &RenderContext) -> String {
    let heading = prop_str(props, "heading")
        .map(html_escape)
        .unwrap_or_else(|| format!("Welcome to {}", html_escape(ctx.site_name)));
    let subheading = escaped(props, "subheading", "The best platform for your needs");
    let button = match prop_str(props, "buttonText") {
        Some(text) if !text.is_empty() => format!(
            "\n      <a class=\"btn\" href=\"{}\">{}</a>",
            html_escape(prop_str(props, "buttonUrl").unwrap_or("#")),
            html_escape(text)
        ),
        _ => String::new(),
    };
    format!(
        r#"<section class="hero">
      <h1>{}</h1>
      <p>{}</p>{}
    </section>"#,
        heading, subheading, button
    )
}

fn render_about_cards(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "About Us");
    let cards = prop_array(props, "cards")
        .iter()
        .map(|card| {
            format!(
                r#"<div class="card">
          <h3>{}</h3>
          <p>{}</p>
        </div>"#,
                html_escape(card.get("title").and_then(Value::as_str).unwrap_or("Card")),
                html_escape(
                    card.get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("")
                )
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    format!(
        r#"<section class="about">
      <h2>{}</h2>
      <div class="card-grid">
        {}
      </div>
    </section>"#,
        heading, cards
    )
}

fn render_about_image_text(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "About Our Company");
    let description = escaped(props, "description", "");
    let image = match prop_str(props, "image") {
        Some(src) if !src.is_empty() => format!(
            "\n      <img src=\"{}\" alt=\"{}\">",
            html_escape(src),
            heading
        ),
        _ => String::new(),
    };
    format!(
        r#"<section class="about about-split">
      <div>
        <h2>{}</h2>
        <p>{}</p>
      </div>{}
    </section>"#,
        heading, description, image
    )
}

fn render_features(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "Features");
    let items = prop_array(props, "features")
        .iter()
        .map(|item| {
            format!(
                r#"<div class="feature-item">
          <h3>{}</h3>
          <p>{}</p>
        </div>"#,
                html_escape(item.get("title").and_then(Value::as_str).unwrap_or("Feature")),
                html_escape(
                    item.get("description")
                        .and_then(Value::as_str)
                        .unwrap_or("Feature description")
                )
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    format!(
        r#"<section class="features">
      <h2>{}</h2>
      <div class="features-grid">
        {}
      </div>
    </section>"#,
        heading, items
    )
}

fn render_testimonials(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "What Our Customers Say");
    let quotes = prop_array(props, "testimonials")
        .iter()
        .map(|t| {
            format!(
                r#"<blockquote>
          <p>{}</p>
          <cite>{} - {}</cite>
        </blockquote>"#,
                html_escape(t.get("quote").and_then(Value::as_str).unwrap_or("")),
                html_escape(t.get("author").and_then(Value::as_str).unwrap_or("Anonymous")),
                html_escape(t.get("title").and_then(Value::as_str).unwrap_or(""))
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    format!(
        r#"<section class="testimonials">
      <h2>{}</h2>
      <div class="testimonial-list">
        {}
      </div>
    </section>"#,
        heading, quotes
    )
}

fn render_contact_form(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "Contact Us");
    let subheading = escaped(props, "subheading", "");
    let button = escaped(props, "buttonText", "Send Message");
    let fields = prop_array(props, "fields")
        .iter()
        .map(|field| {
            let name = html_escape(field.get("name").and_then(Value::as_str).unwrap_or("field"));
            let label = html_escape(field.get("label").and_then(Value::as_str).unwrap_or("Field"));
            let kind = field.get("type").and_then(Value::as_str).unwrap_or("text");
            let input = if kind == "textarea" {
                format!("<textarea id=\"{0}\" name=\"{0}\" rows=\"5\"></textarea>", name)
            } else {
                format!(
                    "<input type=\"{}\" id=\"{1}\" name=\"{1}\">",
                    html_escape(kind),
                    name
                )
            };
            format!(
                r#"<div class="form-field">
          <label for="{}">{}</label>
          {}
        </div>"#,
                name, label, input
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ");
    format!(
        r#"<section class="contact">
      <h2>{}</h2>
      <p>{}</p>
      <form class="contact-form">
        {}
        <button class="btn" type="submit">{}</button>
      </form>
    </section>"#,
        heading, subheading, fields, button
    )
}

fn render_contact_info(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let heading = escaped(props, "heading", "Get in Touch");
    let mut details = String::new();
    for (key, label) in [("email", "Email"), ("phone", "Phone"), ("address", "Address")] {
        if let Some(value) = prop_str(props, key)
            && !value.is_empty()
        {
            details.push_str(&format!(
                "\n        <p>{}: {}</p>",
                label,
                html_escape(value)
            ));
        }
    }
    format!(
        r#"<section class="contact">
      <h2>{}</h2>
      <div class="contact-details">{}
      </div>
    </section>"#,
        heading, details
    )
}

fn render_footer(props: &Map<String, Value>, ctx: &RenderContext) -> String {
    let logo = escaped(props, "logo", ctx.site_name);
    let copyright = escaped(props, "copyright", "All rights reserved.");
    let mut links: Vec<Value> = prop_array(props, "links").to_vec();
    for section in prop_array(props, "sections") {
        if let Some(section_links) = section.get("links").and_then(Value::as_array) {
            links.extend_from_slice(section_links);
        }
    }
    let link_list = if links.is_empty() {
        String::new()
    } else {
        format!(
            "\n        <ul class=\"footer-links\">\n          {}\n        </ul>",
            link_items(&links)
        )
    };
    format!(
        r#"<footer class="footer">
      <div class="container">
        <div class="logo">{}</div>{}
        <p>&copy; <span id="year"></span> {}</p>
      </div>
    </footer>"#,
        logo, link_list, copyright
    )
}

/// Default-case renderer for unknown component types: a generic block built
/// from whatever title/content-like properties exist.
fn render_placeholder(props: &Map<String, Value>, _ctx: &RenderContext) -> String {
    let title = prop_str(props, "title")
        .or_else(|| prop_str(props, "heading"))
        .or_else(|| prop_str(props, "label"))
        .unwrap_or("Component");
    let content = prop_str(props, "content")
        .or_else(|| prop_str(props, "text"))
        .or_else(|| prop_str(props, "description"))
        .unwrap_or("Content goes here");
    format!(
        r#"<div class="component">
      <h2>{}</h2>
      <p>{}</p>
    </div>"#,
        html_escape(title),
        html_escape(content)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RenderContext<'static> {
        RenderContext {
            site_name: "Demo Site",
        }
    }

    fn record_with(component_type: &str, props: Value) -> ComponentRecord {
        let mut record = ComponentRecord::new("r-1", component_type);
        record.properties = props.as_object().cloned().unwrap_or_default();
        record
    }

    #[test]
    fn registry_defaults_are_merged_under_record_properties() {
        let record = record_with("centered-hero", json!({ "heading": "Custom" }));
        let props = effective_properties(&record);
        assert_eq!(props.get("heading").unwrap(), "Custom");
        // untouched default survives
        assert_eq!(props.get("buttonText").unwrap(), "Get Started");
    }

    #[test]
    fn hero_renders_heading_and_button() {
        let html = render_component(
            &record_with("centered-hero", json!({ "heading": "Hi", "buttonText": "Go" })),
            &ctx(),
        );
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains(">Go</a>"));
    }

    #[test]
    fn navbar_merges_centered_link_halves() {
        let html = render_component(
            &record_with(
                "centered-navbar",
                json!({
                    "leftLinks": [{ "label": "Home", "url": "/" }],
                    "rightLinks": [{ "label": "Contact", "url": "/contact" }],
                }),
            ),
            &ctx(),
        );
        assert!(html.contains(">Home</a>"));
        assert!(html.contains(">Contact</a>"));
    }

    #[test]
    fn unknown_type_uses_placeholder_defaults() {
        let html = render_component(&record_with("holographic-banner", json!({})), &ctx());
        assert!(html.contains("Content goes here"));
    }

    #[test]
    fn placeholder_prefers_title_like_properties() {
        let html = render_component(
            &record_with("holographic-banner", json!({ "title": "T", "text": "Body" })),
            &ctx(),
        );
        assert!(html.contains("<h2>T</h2>"));
        assert!(html.contains("<p>Body</p>"));
    }

    #[test]
    fn renderer_output_is_escaped() {
        let html = render_component(
            &record_with("centered-hero", json!({ "heading": "<img onerror=x>" })),
            &ctx(),
        );
        assert!(!html.contains("<img onerror"));
    }
}
