//! CLI entry point for site-latest

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "site-latest")]
#[command(version)]
#[command(about = "Finds the latest blog post and changelog of a documentation site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the latest entries and write the data file
    #[command(alias = "g")]
    Generate,

    /// Print the latest entries as JSON
    Show,

    /// List candidates of a collection, latest first
    List {
        /// Collection to list (post, changelog)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Delete the data file
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "site_latest=debug,info"
    } else {
        "site_latest=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Generate => {
            let site = site_latest::SiteLatest::new(&base_dir)?;
            tracing::info!("Resolving latest content in {:?}", base_dir);
            site.generate().await?;
            println!("Generated {}", site.data_path().display());
        }

        Commands::Show => {
            let site = site_latest::SiteLatest::new(&base_dir)?;
            site_latest::commands::show::run(&site).await?;
        }

        Commands::List { r#type } => {
            let site = site_latest::SiteLatest::new(&base_dir)?;
            site_latest::commands::list::run(&site, &r#type).await?;
        }

        Commands::Clean => {
            let site = site_latest::SiteLatest::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("site-latest version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
