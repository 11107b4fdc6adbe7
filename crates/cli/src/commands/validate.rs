use anyhow::Result;
use sitekit_deployer::netlify::validate_site_name;
use std::path::PathBuf;

pub async fn run(path: PathBuf) -> Result<()> {
    println!("Validating site at: {}", path.display());

    let project = super::load_project(&path)?;

    println!("✓ site.toml valid");
    println!("  Site: {}", project.site.name);
    println!("  Pages: {}", project.site.pages.len());
    println!("  Components: {}", project.components.len());

    for component in &project.components {
        if sitekit_registry::by_type(&component.component_type).is_none() {
            println!(
                "  ⚠ Unknown component type '{}' ({}): will render as a generic block",
                component.component_type, component.id
            );
        }
    }

    let site_name = project
        .deploy
        .site_name
        .clone()
        .unwrap_or_else(|| sitekit_core::slugify(&project.site.name));
    match validate_site_name(&site_name) {
        Ok(()) => println!("✓ Deploy name '{}' is valid", site_name),
        Err(err) => println!("  ⚠ {}", err),
    }

    Ok(())
}
