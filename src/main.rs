//! CLI entry point for spacetraveling

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "spacetraveling")]
#[command(version)]
#[command(about = "A static blog generator backed by the Prismic CMS", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Prismic API endpoint, e.g. https://repo.cdn.prismic.io/api/v2
    #[arg(long, global = true, env = "PRISMIC_API_ENDPOINT")]
    endpoint: Option<String>,

    /// Prismic access token
    #[arg(long, global = true, env = "PRISMIC_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new blog site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// Start a local server
    #[command(alias = "s", alias = "server")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,

        /// Serve the existing public folder without building first
        #[arg(long)]
        skip_generate: bool,
    },

    /// Clean the public folder
    Clean,

    /// List published posts
    List,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "spacetraveling=debug,tower_http=debug,info"
    } else {
        "spacetraveling=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            spacetraveling::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::Generate => {
            let blog = spacetraveling::Blog::new(&base_dir)?;
            let client = blog.client(cli.endpoint, cli.access_token)?;
            tracing::info!("Generating static files...");

            let report = blog.generate(&client).await?;
            println!(
                "Generated successfully! ({} posts on the home page, {} post pages)",
                report.home_posts, report.post_pages
            );
        }

        Commands::Serve {
            port,
            ip,
            skip_generate,
        } => {
            let blog = spacetraveling::Blog::new(&base_dir)?;
            let client = blog.client(cli.endpoint, cli.access_token)?;

            if !skip_generate {
                tracing::info!("Generating static files...");
                blog.generate(&client).await?;
            }

            tracing::info!("Starting server at http://{}:{}", ip, port);
            spacetraveling::server::start(&blog, client, &ip, port).await?;
        }

        Commands::Clean => {
            let blog = spacetraveling::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List => {
            let blog = spacetraveling::Blog::new(&base_dir)?;
            let client = blog.client(cli.endpoint, cli.access_token)?;
            spacetraveling::commands::list::run(&blog, &client).await?;
        }

        Commands::Version => {
            println!("spacetraveling version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
