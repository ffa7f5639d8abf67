//! HTML helper functions

use ammonia::Builder as AmmoniaBuilder;
use std::collections::HashSet;

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Trust boundary for CMS-supplied markup.
///
/// Rich text bodies are rendered to HTML locally but may embed oEmbed
/// markup and arbitrary link targets from the CMS, so they pass through
/// ammonia unless the site trusts its CMS.
pub struct Sanitizer {
    builder: Option<AmmoniaBuilder<'static>>,
}

impl Sanitizer {
    /// Sanitizer allowing the markup rich text can produce
    pub fn new() -> Self {
        let mut builder = AmmoniaBuilder::default();

        let generic: HashSet<&'static str> = HashSet::from(["class", "lang", "title"]);
        builder.generic_attributes(generic);
        builder.add_tags(&["iframe"]);
        builder.add_tag_attributes("a", &["target"]);
        builder.add_tag_attributes("div", &["data-oembed"]);
        builder.add_tag_attributes(
            "iframe",
            &["src", "width", "height", "allow", "allowfullscreen", "frameborder"],
        );
        builder.link_rel(Some("noopener noreferrer"));

        Self {
            builder: Some(builder),
        }
    }

    /// Pass markup through untouched
    pub fn trusted() -> Self {
        Self { builder: None }
    }

    /// Build from the `trust_cms_html` site setting
    pub fn from_trust(trust_cms_html: bool) -> Self {
        if trust_cms_html {
            Self::trusted()
        } else {
            Self::new()
        }
    }

    pub fn clean(&self, html: &str) -> String {
        match &self.builder {
            Some(builder) => builder.clean(html).to_string(),
            None => html.to_string(),
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}
