//! Static catalog of page-building components.
//!
//! Maps a component type tag to its label, category, and default property
//! set. Pure data; callers treat "type not found" as normal control flow and
//! fall back to generic rendering.

use serde_json::{Value, json};
use std::sync::LazyLock;

/// Section of the palette a component belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Navbar,
    Hero,
    About,
    Content,
    Contact,
    Footer,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Navbar => "navbar",
            Category::Hero => "hero",
            Category::About => "about",
            Category::Content => "content",
            Category::Contact => "contact",
            Category::Footer => "footer",
        }
    }

    pub const ALL: [Category; 6] = [
        Category::Navbar,
        Category::Hero,
        Category::About,
        Category::Content,
        Category::Contact,
        Category::Footer,
    ];
}

/// One entry of the catalog: a component type and its defaults.
#[derive(Debug, Clone)]
pub struct ComponentTemplate {
    pub component_type: &'static str,
    pub category: Category,
    pub label: &'static str,
    pub description: &'static str,
    /// Always a JSON object.
    pub default_properties: Value,
}

static CATALOG: LazyLock<Vec<ComponentTemplate>> = LazyLock::new(build_catalog);

/// Every template in the catalog, in palette order.
pub fn all() -> &'static [ComponentTemplate] {
    &CATALOG
}

/// Templates belonging to one palette category.
pub fn by_category(category: Category) -> Vec<&'static ComponentTemplate> {
    CATALOG.iter().filter(|t| t.category == category).collect()
}

/// Look up a template by its type tag.
pub fn by_type(component_type: &str) -> Option<&'static ComponentTemplate> {
    CATALOG.iter().find(|t| t.component_type == component_type)
}

fn build_catalog() -> Vec<ComponentTemplate> {
    vec![
        // Navbars
        ComponentTemplate {
            component_type: "simple-navbar",
            category: Category::Navbar,
            label: "Simple Navbar",
            description: "A clean, minimal navigation bar with logo and links",
            default_properties: json!({
                "logo": "My Website",
                "links": [
                    { "label": "Home", "url": "#" },
                    { "label": "Features", "url": "#" },
                    { "label": "Pricing", "url": "#" },
                    { "label": "Contact", "url": "#" },
                ],
                "buttonText": "Sign Up",
                "buttonUrl": "#",
            }),
        },
        ComponentTemplate {
            component_type: "centered-navbar",
            category: Category::Navbar,
            label: "Centered Navbar",
            description: "Navigation bar with centered logo and links on both sides",
            default_properties: json!({
                "logo": "My Website",
                "leftLinks": [
                    { "label": "Home", "url": "#" },
                    { "label": "Features", "url": "#" },
                ],
                "rightLinks": [
                    { "label": "Pricing", "url": "#" },
                    { "label": "Contact", "url": "#" },
                ],
            }),
        },
        // Heroes
        ComponentTemplate {
            component_type: "centered-hero",
            category: Category::Hero,
            label: "Centered Hero",
            description: "A centered hero section with heading, subheading, and CTA button",
            default_properties: json!({
                "heading": "Welcome to My Website",
                "subheading": "The best platform for your needs",
                "buttonText": "Get Started",
                "buttonUrl": "#",
            }),
        },
        ComponentTemplate {
            component_type: "split-hero",
            category: Category::Hero,
            label: "Split Hero",
            description: "A hero section split into text and image",
            default_properties: json!({
                "heading": "Welcome to My Website",
                "subheading": "The best platform for your needs",
                "buttonText": "Get Started",
                "buttonUrl": "#",
                "image": "images/hero.jpg",
            }),
        },
        // About
        ComponentTemplate {
            component_type: "about-cards",
            category: Category::About,
            label: "About with Cards",
            description: "About section with multiple information cards",
            default_properties: json!({
                "heading": "About Us",
                "cards": [
                    {
                        "title": "Our Mission",
                        "description": "We strive to provide the best service possible to our customers.",
                    },
                    {
                        "title": "Our Vision",
                        "description": "To become the leading provider in our industry.",
                    },
                    {
                        "title": "Our Values",
                        "description": "Integrity, excellence, and innovation guide everything we do.",
                    },
                ],
            }),
        },
        ComponentTemplate {
            component_type: "about-image-text",
            category: Category::About,
            label: "About with Image",
            description: "About section with image and text side by side",
            default_properties: json!({
                "heading": "About Our Company",
                "description": "We are a forward-thinking company dedicated to excellence and innovation.",
                "image": "images/about.jpg",
            }),
        },
        // Content
        ComponentTemplate {
            component_type: "features-grid",
            category: Category::Content,
            label: "Features Grid",
            description: "A grid layout showcasing features or services",
            default_properties: json!({
                "heading": "Our Features",
                "subheading": "Everything you need to succeed",
                "features": [
                    { "title": "Feature 1", "description": "Description of feature 1" },
                    { "title": "Feature 2", "description": "Description of feature 2" },
                    { "title": "Feature 3", "description": "Description of feature 3" },
                    { "title": "Feature 4", "description": "Description of feature 4" },
                ],
            }),
        },
        ComponentTemplate {
            component_type: "testimonials",
            category: Category::Content,
            label: "Testimonials",
            description: "Customer quotes with attribution",
            default_properties: json!({
                "heading": "What Our Customers Say",
                "testimonials": [
                    {
                        "quote": "This product has completely transformed our business operations.",
                        "author": "Jane Doe",
                        "title": "CEO, Company A",
                    },
                    {
                        "quote": "I cannot imagine running my business without this tool anymore.",
                        "author": "John Smith",
                        "title": "Founder, Company B",
                    },
                ],
            }),
        },
        // Contact
        ComponentTemplate {
            component_type: "contact-form",
            category: Category::Contact,
            label: "Contact Form",
            description: "A simple contact form with fields for name, email, and message",
            default_properties: json!({
                "heading": "Contact Us",
                "subheading": "We'd love to hear from you",
                "buttonText": "Send Message",
                "fields": [
                    { "name": "name", "label": "Name", "type": "text" },
                    { "name": "email", "label": "Email", "type": "email" },
                    { "name": "message", "label": "Message", "type": "textarea" },
                ],
            }),
        },
        ComponentTemplate {
            component_type: "contact-info",
            category: Category::Contact,
            label: "Contact Information",
            description: "Display contact details",
            default_properties: json!({
                "heading": "Get in Touch",
                "address": "123 Main St, City, Country",
                "email": "contact@example.com",
                "phone": "+1 (555) 123-4567",
            }),
        },
        // Footers
        ComponentTemplate {
            component_type: "simple-footer",
            category: Category::Footer,
            label: "Simple Footer",
            description: "A simple footer with links and copyright",
            default_properties: json!({
                "logo": "My Website",
                "links": [
                    { "label": "Home", "url": "#" },
                    { "label": "About", "url": "#" },
                    { "label": "Features", "url": "#" },
                    { "label": "Contact", "url": "#" },
                ],
                "copyright": "My Website. All rights reserved.",
            }),
        },
        ComponentTemplate {
            component_type: "expanded-footer",
            category: Category::Footer,
            label: "Expanded Footer",
            description: "An expanded footer with multiple sections of links",
            default_properties: json!({
                "logo": "My Website",
                "sections": [
                    {
                        "title": "Product",
                        "links": [
                            { "label": "Features", "url": "#" },
                            { "label": "Pricing", "url": "#" },
                            { "label": "FAQ", "url": "#" },
                        ],
                    },
                    {
                        "title": "Company",
                        "links": [
                            { "label": "About", "url": "#" },
                            { "label": "Team", "url": "#" },
                            { "label": "Careers", "url": "#" },
                        ],
                    },
                ],
                "copyright": "My Website. All rights reserved.",
            }),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twelve_templates() {
        assert_eq!(all().len(), 12);
    }

    #[test]
    fn looks_up_by_type() {
        let template = by_type("centered-hero").unwrap();
        assert_eq!(template.category, Category::Hero);
        assert_eq!(template.label, "Centered Hero");
        assert!(template.default_properties.get("heading").is_some());
    }

    #[test]
    fn unknown_type_is_none() {
        assert!(by_type("holographic-banner").is_none());
    }

    #[test]
    fn filters_by_category() {
        let navbars = by_category(Category::Navbar);
        assert_eq!(navbars.len(), 2);
        assert!(navbars.iter().all(|t| t.category == Category::Navbar));
    }

    #[test]
    fn every_category_is_populated() {
        for category in Category::ALL {
            assert!(
                !by_category(category).is_empty(),
                "no templates for {}",
                category.as_str()
            );
        }
    }

    #[test]
    fn default_properties_are_objects() {
        for template in all() {
            assert!(template.default_properties.is_object());
        }
    }
}
