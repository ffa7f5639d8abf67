//! CMS connection settings

use anyhow::{anyhow, Context, Result};
use url::Url;

use super::site::PrismicSection;

/// Endpoint and credentials used to build a [`crate::prismic::PrismicClient`]
#[derive(Debug, Clone)]
pub struct PrismicSettings {
    /// API entry point, e.g. `https://repo.cdn.prismic.io/api/v2`
    pub endpoint: Url,
    /// Access token for private repositories
    pub access_token: Option<String>,
}

impl PrismicSettings {
    pub fn new(endpoint: &str, access_token: Option<String>) -> Result<Self> {
        let endpoint = Url::parse(endpoint.trim_end_matches('/'))
            .with_context(|| format!("Invalid Prismic endpoint: {}", endpoint))?;
        let access_token = access_token.filter(|t| !t.trim().is_empty());
        Ok(Self {
            endpoint,
            access_token,
        })
    }

    /// Merge CLI/environment values over the `prismic` section of _config.yml
    pub fn resolve(
        endpoint: Option<String>,
        access_token: Option<String>,
        file: &PrismicSection,
    ) -> Result<Self> {
        let endpoint = endpoint
            .filter(|e| !e.trim().is_empty())
            .or_else(|| file.endpoint.clone())
            .ok_or_else(|| {
                anyhow!(
                    "Prismic endpoint is not configured (use --endpoint, PRISMIC_API_ENDPOINT or prismic.endpoint in _config.yml)"
                )
            })?;
        let access_token = access_token.or_else(|| file.access_token.clone());
        Self::new(&endpoint, access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_file() {
        let file = PrismicSection {
            endpoint: Some("https://file.cdn.prismic.io/api/v2".to_string()),
            access_token: Some("file-token".to_string()),
        };
        let settings = PrismicSettings::resolve(
            Some("https://cli.cdn.prismic.io/api/v2/".to_string()),
            None,
            &file,
        )
        .unwrap();
        assert_eq!(
            settings.endpoint.as_str(),
            "https://cli.cdn.prismic.io/api/v2"
        );
        assert_eq!(settings.access_token.as_deref(), Some("file-token"));
    }

    #[test]
    fn test_missing_endpoint_is_error() {
        let err = PrismicSettings::resolve(None, None, &PrismicSection::default()).unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let settings =
            PrismicSettings::new("https://x.cdn.prismic.io/api/v2", Some("  ".into())).unwrap();
        assert!(settings.access_token.is_none());
    }
}
