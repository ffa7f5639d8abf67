//! Initialize a new blog site

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# spacetraveling configuration

# Site
title: spacetraveling
language: pt-BR
timezone: UTC

# URL
url: http://localhost:4000
root: /
logo: /images/logo.svg

# Directory
public_dir: public

# Home page setting
home:
  page_size: 2

# Page size used when enumerating every post to pre-render
paths_page_size: 100

# Emit CMS rich text without sanitizing it
trust_cms_html: false

# CMS connection (PRISMIC_API_ENDPOINT / PRISMIC_ACCESS_TOKEN take priority)
prismic:
  endpoint:
  access_token:
"#;

/// Write a default `_config.yml` into the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let config_path = target_dir.join("_config.yml");
    if config_path.exists() {
        bail!("{:?} already exists", config_path);
    }

    fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {:?}", config_path))?;
    tracing::info!("Created: {:?}", config_path);

    Ok(())
}
