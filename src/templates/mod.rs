//! Built-in spacetraveling templates using the Tera template engine
//!
//! Templates and static assets are embedded in the binary. View models in
//! this module hold already-escaped strings, so autoescaping is disabled.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::content::{PostDetail, PostPagination, PostSummary};
use crate::helpers::{
    date_xml, html_escape, post_url, publication_date, reading_time, url_for, Sanitizer,
};
use crate::richtext::as_html;

/// Static files copied verbatim into the public directory
pub const ASSETS: &[(&str, &str)] = &[
    ("images/logo.svg", include_str!("spacetraveling/assets/logo.svg")),
    ("styles.css", include_str!("spacetraveling/assets/styles.css")),
    ("js/load-more.js", include_str!("spacetraveling/assets/load-more.js")),
];

/// Seconds before the fallback placeholder reloads itself
pub const FALLBACK_REFRESH_SECONDS: u32 = 1;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        // View models are escaped when built
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("spacetraveling/layout.html")),
            ("index.html", include_str!("spacetraveling/index.html")),
            ("post.html", include_str!("spacetraveling/post.html")),
            ("fallback.html", include_str!("spacetraveling/fallback.html")),
            ("404.html", include_str!("spacetraveling/404.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("spacetraveling/partials/header.html"),
            ),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Home page listing
    pub fn render_home(&self, site: &SiteData, home: &HomeView) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("posts", &home.posts);
        context.insert("next_page", &home.next_page);
        self.render("index.html", &context)
    }

    /// Single post page
    pub fn render_post(&self, site: &SiteData, post: &PostView) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("post", post);
        self.render("post.html", &context)
    }

    /// Placeholder served while a post page is generated on demand
    pub fn render_fallback(&self, site: &SiteData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        context.insert("refresh_seconds", &FALLBACK_REFRESH_SECONDS);
        self.render("fallback.html", &context)
    }

    pub fn render_not_found(&self, site: &SiteData) -> Result<String> {
        let mut context = Context::new();
        context.insert("site", site);
        self.render("404.html", &context)
    }
}

/// Site-wide values shared by every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub language: String,
    pub timezone: String,
    pub home_url: String,
    pub logo_url: String,
    pub styles_url: String,
    pub script_url: String,
    pub post_root: String,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        let logo_url = if config.logo.starts_with("http://") || config.logo.starts_with("https://")
        {
            config.logo.clone()
        } else {
            url_for(config, &config.logo)
        };

        Self {
            title: html_escape(&config.title),
            language: html_escape(&config.language),
            timezone: html_escape(config.tz().name()),
            home_url: url_for(config, "/"),
            logo_url: html_escape(&logo_url),
            styles_url: url_for(config, "styles.css"),
            script_url: url_for(config, "js/load-more.js"),
            post_root: url_for(config, "post/"),
        }
    }
}

/// One entry of the home page listing
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub href: String,
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub date: String,
    pub datetime: String,
}

impl PostCard {
    /// Cards need a uid to link to; posts without one are skipped
    pub fn from_summary(post: &PostSummary, config: &SiteConfig) -> Option<Self> {
        let uid = post.uid.as_deref()?;
        let tz = config.tz();
        Some(Self {
            href: html_escape(&post_url(config, uid)),
            title: html_escape(&post.data.title),
            subtitle: html_escape(&post.data.subtitle),
            author: html_escape(&post.data.author),
            date: publication_date(post.first_publication_date.as_ref(), &tz),
            datetime: post
                .first_publication_date
                .as_ref()
                .map(date_xml)
                .unwrap_or_default(),
        })
    }
}

/// Home page state: the first page of posts and the cursor after it
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub posts: Vec<PostCard>,
    pub next_page: Option<String>,
}

impl HomeView {
    pub fn from_pagination(pagination: &PostPagination, config: &SiteConfig) -> Self {
        let posts = pagination
            .results
            .iter()
            .filter_map(|post| {
                let card = PostCard::from_summary(post, config);
                if card.is_none() {
                    tracing::warn!("Skipping post {} without uid", post.id);
                }
                card
            })
            .collect();

        Self {
            posts,
            next_page: pagination
                .next_page
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(html_escape),
        }
    }
}

/// A rendered post
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub title: String,
    pub banner: Option<String>,
    pub author: String,
    pub date: String,
    pub datetime: String,
    pub reading_time: usize,
    pub sections: Vec<SectionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionView {
    pub heading: String,
    pub html: String,
}

impl PostView {
    pub fn from_detail(post: &PostDetail, config: &SiteConfig, sanitizer: &Sanitizer) -> Self {
        let tz = config.tz();
        let sections = post
            .data
            .content
            .iter()
            .map(|section| SectionView {
                heading: html_escape(&section.heading),
                html: sanitizer.clean(&as_html(&section.body)),
            })
            .collect();

        Self {
            title: html_escape(&post.data.title),
            banner: post
                .data
                .banner
                .url
                .as_deref()
                .filter(|u| !u.is_empty())
                .map(html_escape),
            author: html_escape(&post.data.author),
            date: publication_date(post.first_publication_date.as_ref(), &tz),
            datetime: post
                .first_publication_date
                .as_ref()
                .map(date_xml)
                .unwrap_or_default(),
            reading_time: reading_time(&post.data.content),
            sections,
        }
    }
}
