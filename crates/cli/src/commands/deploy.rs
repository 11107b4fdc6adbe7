use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sitekit_core::DeploymentRecord;
use sitekit_deployer::netlify::validate_site_name;
use sitekit_deployer::progress::ProgressObserver;
use sitekit_deployer::{DeployRequest, NetlifyClient, SiteDeployer, TokioSleeper};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Global configuration for deployments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub netlify: NetlifyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetlifyConfig {
    pub token: String,
}

/// Deployment history appended after every successful publish
#[derive(Debug, Default, Serialize, Deserialize)]
struct History {
    #[serde(default)]
    deployment: Vec<DeploymentRecord>,
}

/// Get path to a file in the global config directory
fn global_path(file: &str) -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    let config_dir = PathBuf::from(home).join(".sitekit");
    fs::create_dir_all(&config_dir)?;
    Ok(config_dir.join(file))
}

/// Load global config
fn load_config() -> Result<Option<GlobalConfig>> {
    let path = global_path("config.toml")?;
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path).context("Failed to read config file")?;
    let config: GlobalConfig = toml::from_str(&contents).context("Failed to parse config file")?;
    Ok(Some(config))
}

/// Save global config
fn save_config(config: &GlobalConfig) -> Result<()> {
    let path = global_path("config.toml")?;
    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(&path, contents).context("Failed to write config file")?;
    println!("✅ Configuration saved to: {}", path.display());
    Ok(())
}

fn load_history() -> Result<History> {
    let path = global_path("history.toml")?;
    if !path.exists() {
        return Ok(History::default());
    }
    let contents = fs::read_to_string(&path).context("Failed to read history file")?;
    toml::from_str(&contents).context("Failed to parse history file")
}

fn append_history(record: &DeploymentRecord) -> Result<()> {
    let mut history = load_history()?;
    history.deployment.push(record.clone());
    let path = global_path("history.toml")?;
    let contents = toml::to_string_pretty(&history).context("Failed to serialize history")?;
    fs::write(&path, contents).context("Failed to write history file")?;
    Ok(())
}

/// Helper to read user input
fn read_input(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Progress observer printing coarse milestones to the console
struct ConsoleProgress {
    last_bucket: AtomicU8,
}

impl ConsoleProgress {
    fn new() -> Self {
        Self {
            last_bucket: AtomicU8::new(u8::MAX),
        }
    }
}

impl ProgressObserver for ConsoleProgress {
    fn on_progress(&self, percent: u8, message: &str) {
        // Chunked uploads report often; only print every tenth percent
        let bucket = percent / 10;
        if self.last_bucket.swap(bucket, Ordering::SeqCst) != bucket {
            println!("   [{:>3}%] {}", percent, message);
        }
    }
}

/// Configure the Netlify access token
pub async fn configure() -> Result<()> {
    println!("🔧 Configuring Netlify deployment...\n");

    let existing = load_config()?;

    println!("📋 You'll need a Netlify personal access token.");
    println!("   Create one at: https://app.netlify.com/user/applications");
    println!();

    let default_token = existing
        .as_ref()
        .map(|c| c.netlify.token.as_str())
        .unwrap_or("");
    let token = if !default_token.is_empty() {
        let input = read_input(&format!(
            "Access Token [current: {}...]: ",
            &default_token[..10.min(default_token.len())]
        ))?;
        if input.is_empty() {
            default_token.to_string()
        } else {
            input
        }
    } else {
        read_input("Access Token: ")?
    };

    if token.is_empty() {
        anyhow::bail!("Access token is required");
    }

    // Live reachability check is the only token validation; the provider's
    // token format is not something we second-guess locally
    println!();
    println!("🔍 Verifying token against the Netlify API...");
    let client = NetlifyClient::new(&token)?;
    if client.validate_credential().await {
        println!("   ✓ Token verified");
    } else {
        println!("   ⚠ Could not verify token (invalid token or no connectivity)");
        println!("   Saving anyway; run 'sitekit deploy configure' again to retry");
    }

    save_config(&GlobalConfig {
        netlify: NetlifyConfig { token },
    })?;

    println!();
    println!("🚀 Ready to deploy! Try: sitekit deploy publish <site-path>");

    Ok(())
}

/// Publish the site to Netlify
pub async fn publish(path: PathBuf, name: Option<String>, demo: bool, force: bool) -> Result<()> {
    println!("🚀 Publishing site to Netlify...\n");

    let project = super::load_project(&path)?;
    let site_name = name
        .or_else(|| project.deploy.site_name.clone())
        .unwrap_or_else(|| sitekit_core::slugify(&project.site.name));
    validate_site_name(&site_name)?;

    println!("📋 Deployment Plan:");
    println!("   Site: {}", project.site.name);
    println!("   Remote name: {}", site_name);
    println!("   Format: {}", project.deploy.format);
    if demo {
        println!("   Mode: demo (no network calls)");
    } else {
        println!("   Target: Netlify");
    }
    println!();

    let token = if demo {
        "demo".to_string()
    } else {
        load_config()?
            .context("No Netlify configuration found.\nRun 'sitekit deploy configure' first")?
            .netlify
            .token
    };

    // Confirmation prompt
    if !force {
        print!("❓ Deploy to Netlify? (y/N): ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("❌ Deployment cancelled");
            return Ok(());
        }
        println!();
    }

    let client = NetlifyClient::new(&token)?;
    if !demo {
        println!("🔍 Verifying access token...");
        if !client.validate_credential().await {
            anyhow::bail!(
                "Token verification failed. Check the token and your network connection."
            );
        }
        println!("   ✓ Token verified");
        println!();
    }

    println!("☁️  Deploying...");
    let sleeper = TokioSleeper;
    let deployer =
        SiteDeployer::new(&client, &sleeper).with_observer(Arc::new(ConsoleProgress::new()));
    let request = DeployRequest {
        site: project.site.clone(),
        components: project.components.clone(),
        site_name: site_name.clone(),
        token,
        format: project.deploy.format,
        demo,
    };
    let result = deployer.deploy(&request).await;
    println!();

    if result.success {
        println!("✅ Deployment complete!");
        if let Some(url) = &result.live_url {
            println!("   Live URL: {}", url);
        }
        if let Some(preview) = &result.preview_url {
            println!("   Preview: {}", preview);
        }
        if result.demo {
            println!("   (demo mode: nothing was uploaded)");
        }
        if let Some(record) = result.history_record(&project.site.name, &site_name) {
            append_history(&record)?;
        }
        Ok(())
    } else {
        println!("❌ Deployment failed");
        if let Some(site_id) = &result.site_id {
            println!("   Remote site was created: {}", site_id);
        }
        if let Some(deploy_id) = &result.deploy_id {
            println!("   Deploy started: {}", deploy_id);
        }
        anyhow::bail!(
            "{}",
            result.error.unwrap_or_else(|| "Unknown error".to_string())
        )
    }
}

/// Show deployment status
pub async fn status(path: Option<PathBuf>) -> Result<()> {
    let path = path.unwrap_or_else(|| PathBuf::from("."));

    println!("📊 Checking deployment status...\n");

    let project = super::load_project(&path)?;
    let site_name = project
        .deploy
        .site_name
        .clone()
        .unwrap_or_else(|| sitekit_core::slugify(&project.site.name));

    println!("📋 Project Information:");
    println!("   Site: {}", project.site.name);
    println!("   Remote name: {}", site_name);
    println!();

    let config = load_config()?
        .context("No Netlify configuration found.\nRun 'sitekit deploy configure' first")?;

    println!("☁️  Netlify Status:");
    let client = NetlifyClient::new(&config.netlify.token)?;
    let sites = client.list_sites().await?;

    match sites.iter().find(|s| s.name == site_name) {
        Some(site) => {
            println!("   ✅ Status: Deployed");
            println!(
                "   URL: {}",
                site.ssl_url
                    .clone()
                    .or_else(|| site.url.clone())
                    .unwrap_or_else(|| format!("https://{}.netlify.app", site_name))
            );
        }
        None => {
            println!("   ❌ Status: Not deployed");
            println!("   Run 'sitekit deploy publish {}' to deploy", path.display());
        }
    }
    println!();

    let history = load_history()?;
    let entries: Vec<&DeploymentRecord> = history
        .deployment
        .iter()
        .filter(|r| r.site_name == site_name)
        .collect();
    if !entries.is_empty() {
        println!("🕘 Deployment History:");
        for record in entries {
            println!(
                "   {} - {} ({})",
                record.deployed_at.format("%Y-%m-%d %H:%M UTC"),
                record.url,
                record.status
            );
        }
    }

    Ok(())
}
