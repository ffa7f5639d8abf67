//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,
    pub logo: String,

    // Directory
    pub public_dir: String,

    // Home page
    #[serde(default)]
    pub home: HomeConfig,

    // Post pages
    pub paths_page_size: usize,
    pub trust_cms_html: bool,

    // CMS connection (overridden by CLI flags / environment)
    #[serde(default)]
    pub prismic: PrismicSection,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            timezone: "UTC".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),
            logo: "/images/logo.svg".to_string(),

            public_dir: "public".to_string(),

            home: HomeConfig::default(),

            paths_page_size: 100,
            trust_cms_html: false,

            prismic: PrismicSection::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Resolve the configured timezone, falling back to UTC
    pub fn tz(&self) -> chrono_tz::Tz {
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                if !self.timezone.is_empty() {
                    tracing::warn!("Unknown timezone {:?}, using UTC", self.timezone);
                }
                chrono_tz::UTC
            }
        }
    }
}

/// Home page listing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeConfig {
    pub page_size: usize,
}

impl Default for HomeConfig {
    fn default() -> Self {
        Self { page_size: 2 }
    }
}

/// `prismic:` section of _config.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicSection {
    pub endpoint: Option<String>,
    pub access_token: Option<String>,
}
