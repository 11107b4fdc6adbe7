mod commands;

use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "sitekit")]
#[command(version, about = "Site builder pipeline: generate, package, and deploy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Initialize new site directory
    Init {
        /// Path to create site directory
        path: PathBuf,
    },

    /// Validate site configuration
    Validate {
        /// Path to site directory
        path: PathBuf,
    },

    /// Build the site bundle without deploying
    Build {
        /// Path to site directory
        path: PathBuf,

        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (static-html, react, astro); defaults to site.toml
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Package the site bundle into a deployable zip archive
    Export {
        /// Path to site directory
        path: PathBuf,

        /// Archive file to write (defaults to <site>-netlify-ready.zip)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Export format (static-html, react, astro); defaults to site.toml
        #[arg(short, long)]
        format: Option<String>,
    },

    /// Preview the generated site locally
    Preview {
        /// Path to site directory
        path: PathBuf,

        /// Port to serve on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Deploy site to hosting platform
    Deploy {
        #[command(subcommand)]
        command: DeployCommand,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
enum DeployCommand {
    /// Configure the Netlify access token
    ///
    /// Create a personal access token at:
    ///   https://app.netlify.com/user/applications
    Configure,

    /// Publish the site to Netlify
    Publish {
        /// Path to site directory
        path: PathBuf,

        /// Remote site name; derived from the site name when omitted
        #[arg(long)]
        name: Option<String>,

        /// Skip all network calls and synthesize a placeholder result
        #[arg(long)]
        demo: bool,

        /// Skip confirmation prompts
        #[arg(long)]
        force: bool,
    },

    /// Show deployment status and history
    Status {
        /// Path to site directory (optional - scans current dir)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_target(false).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Init { path } => commands::init::run(path).await,
        Command::Validate { path } => commands::validate::run(path).await,
        Command::Build {
            path,
            output,
            format,
        } => commands::build::run(path, output, format).await,
        Command::Export {
            path,
            output,
            format,
        } => commands::export::run(path, output, format).await,
        Command::Preview { path, port } => commands::preview::run(path, port).await,
        Command::Deploy { command } => match command {
            DeployCommand::Configure => commands::deploy::configure().await,
            DeployCommand::Publish {
                path,
                name,
                demo,
                force,
            } => commands::deploy::publish(path, name, demo, force).await,
            DeployCommand::Status { path } => commands::deploy::status(path).await,
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "sitekit", &mut io::stdout());
            Ok(())
        }
    }
}
