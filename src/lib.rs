//! spacetraveling: a static blog generator backed by the Prismic CMS
//!
//! Posts are fetched from a Prismic repository, rendered with embedded Tera
//! templates and written as static HTML. The home page lists the first page
//! of posts and loads further pages in the browser; post pages are rendered
//! ahead of time or on demand by the development server.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod prismic;
pub mod richtext;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The blog site rooted at one directory
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Load the site from a directory, using defaults when `_config.yml` is absent
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// Build a CMS client from CLI/environment values and `_config.yml`
    pub fn client(
        &self,
        endpoint: Option<String>,
        access_token: Option<String>,
    ) -> Result<prismic::PrismicClient> {
        let settings =
            config::PrismicSettings::resolve(endpoint, access_token, &self.config.prismic)?;
        self.client_with(settings)
    }

    pub fn client_with(&self, settings: config::PrismicSettings) -> Result<prismic::PrismicClient> {
        tracing::debug!("Using Prismic endpoint {}", settings.endpoint);
        Ok(prismic::PrismicClient::new(settings)?)
    }

    /// Generate the static site
    pub async fn generate(
        &self,
        client: &prismic::PrismicClient,
    ) -> Result<generator::BuildReport> {
        commands::generate::run(self, client).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
