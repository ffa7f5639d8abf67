//! Generator module - renders CMS content into static HTML files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{PostDetail, PostDetailData, PostPagination, PostSummaryData, POST_TYPE};
use crate::helpers::{is_safe_slug, Sanitizer};
use crate::prismic::{Predicate, PrismicClient};
use crate::templates::{HomeView, PostView, SiteData, TemplateRenderer, ASSETS};
use crate::Blog;

/// What a full build produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Posts listed on the home page
    pub home_posts: usize,
    /// Whether the home page offers "load more"
    pub has_more: bool,
    /// Post pages written
    pub post_pages: usize,
}

/// Static site generator using Tera templates
pub struct Generator {
    blog: Blog,
    renderer: TemplateRenderer,
    sanitizer: Sanitizer,
    site: SiteData,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        let renderer = TemplateRenderer::new()?;
        let sanitizer = Sanitizer::from_trust(blog.config.trust_cms_html);
        let site = SiteData::from_config(&blog.config);

        Ok(Self {
            blog: blog.clone(),
            renderer,
            sanitizer,
            site,
        })
    }

    pub fn site(&self) -> &SiteData {
        &self.site
    }

    pub fn renderer(&self) -> &TemplateRenderer {
        &self.renderer
    }

    /// Generate the entire site
    pub async fn generate(&self, client: &PrismicClient) -> Result<BuildReport> {
        fs::create_dir_all(&self.blog.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.blog.public_dir))?;

        self.write_assets()?;
        self.generate_not_found()?;

        let pagination = self.generate_home(client).await?;

        let uids = self.post_paths(client).await?;
        for uid in &uids {
            self.generate_post(client, uid).await?;
        }
        tracing::info!("Generated {} post pages", uids.len());

        Ok(BuildReport {
            home_posts: pagination.results.len(),
            has_more: pagination.has_more(),
            post_pages: uids.len(),
        })
    }

    /// Generate the home page from the first page of posts
    pub async fn generate_home(&self, client: &PrismicClient) -> Result<PostPagination> {
        let pagination = PostPagination::first_page(client, self.blog.config.home.page_size)
            .await
            .context("Failed to query posts for the home page")?;

        let home = HomeView::from_pagination(&pagination, &self.blog.config);
        let html = self.renderer.render_home(&self.site, &home)?;
        write_page(&self.blog.public_dir.join("index.html"), &html)?;
        tracing::info!(
            "Generated home page with {} posts (more: {})",
            home.posts.len(),
            pagination.has_more()
        );

        Ok(pagination)
    }

    /// Every post uid that gets a pre-rendered page
    pub async fn post_paths(&self, client: &PrismicClient) -> Result<Vec<String>> {
        let posts = client
            .query_all::<PostSummaryData>(
                &[Predicate::document_type(POST_TYPE)],
                self.blog.config.paths_page_size,
            )
            .await
            .context("Failed to enumerate posts")?;

        let uids = posts
            .into_iter()
            .filter_map(|post| match post.uid {
                Some(uid) if is_safe_slug(&uid) => Some(uid),
                Some(uid) => {
                    tracing::warn!("Skipping post {} with unsafe uid {:?}", post.id, uid);
                    None
                }
                None => {
                    tracing::warn!("Skipping post {} without uid", post.id);
                    None
                }
            })
            .collect();

        Ok(uids)
    }

    /// Fetch one post by uid and write its page
    pub async fn generate_post(&self, client: &PrismicClient, uid: &str) -> Result<PathBuf> {
        let post: PostDetail = client
            .get_by_uid::<PostDetailData>(POST_TYPE, uid)
            .await
            .with_context(|| format!("Failed to fetch post {:?}", uid))?;

        let html = self.render_post(&post)?;
        let output_path = self.post_output_path(uid);
        write_page(&output_path, &html)?;
        tracing::debug!("Generated post: {:?}", output_path);

        Ok(output_path)
    }

    pub fn render_post(&self, post: &PostDetail) -> Result<String> {
        let view = PostView::from_detail(post, &self.blog.config, &self.sanitizer);
        self.renderer.render_post(&self.site, &view)
    }

    pub fn post_output_path(&self, uid: &str) -> PathBuf {
        self.blog
            .public_dir
            .join("post")
            .join(uid)
            .join("index.html")
    }

    fn generate_not_found(&self) -> Result<()> {
        let html = self.renderer.render_not_found(&self.site)?;
        write_page(&self.blog.public_dir.join("404.html"), &html)
    }

    /// Copy embedded assets (logo, stylesheet, load-more script)
    fn write_assets(&self) -> Result<()> {
        for (path, content) in ASSETS {
            write_page(&self.blog.public_dir.join(path), content)?;
        }
        Ok(())
    }
}

/// Write through a temporary file so readers never see a partial page
fn write_page(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content).map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", tmp, e))?;
    fs::rename(&tmp, path)
        .map_err(|e| anyhow::anyhow!("Failed to move {:?} to {:?}: {}", tmp, path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismic::testing::{
        detail_doc, mock_master_ref, mock_post, search_page, settings_for, summary_doc,
    };
    use crate::prismic::PrismicError;
    use httpmock::MockServer;
    use serde_json::json;

    fn blog(dir: &Path) -> Blog {
        Blog::new(dir).unwrap()
    }

    fn body(text: &str) -> serde_json::Value {
        json!([{"heading": "Intro", "body": [{"type": "paragraph", "text": text, "spans": []}]}])
    }

    #[tokio::test]
    async fn generates_home_and_every_post() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        mock_master_ref(&server).await;
        let cursor = server.url("/api/v2/documents/search?page=2&pageSize=2");

        // Home page query
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("pageSize", "2");
                then.status(200).json_body(search_page(
                    vec![summary_doc("one", "One"), summary_doc("two", "Two")],
                    Some(&cursor),
                ));
            })
            .await;
        // Path enumeration
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("pageSize", "100");
                then.status(200).json_body(search_page(
                    vec![
                        summary_doc("one", "One"),
                        summary_doc("two", "Two"),
                        summary_doc("three", "Three"),
                    ],
                    None,
                ));
            })
            .await;
        for (uid, title) in [("one", "One"), ("two", "Two"), ("three", "Three")] {
            mock_post(&server, uid, detail_doc(uid, title, body("a b c d"))).await;
        }

        let blog = blog(dir.path());
        let client = blog.client_with(settings_for(&server)).unwrap();
        let report = Generator::new(&blog).unwrap().generate(&client).await.unwrap();

        assert_eq!(
            report,
            BuildReport {
                home_posts: 2,
                has_more: true,
                post_pages: 3
            }
        );

        let public = dir.path().join("public");
        let index = fs::read_to_string(public.join("index.html")).unwrap();
        assert!(index.contains(r#"id="load-more""#));
        assert!(index.contains("page=2&amp;pageSize=2"));
        assert!(!index.contains("Three"));

        let three = fs::read_to_string(public.join("post/three/index.html")).unwrap();
        assert!(three.contains("<strong>Three</strong>"));
        assert!(three.contains("1 min"));

        assert!(public.join("404.html").exists());
        assert!(public.join("images/logo.svg").exists());
        assert!(public.join("styles.css").exists());
        assert!(public.join("js/load-more.js").exists());
        assert!(!public.join("index.tmp").exists());
    }

    #[tokio::test]
    async fn skips_posts_without_safe_uid() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        mock_master_ref(&server).await;

        let mut no_uid = summary_doc("x", "X");
        no_uid["uid"] = serde_json::Value::Null;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/v2/documents/search");
                then.status(200).json_body(search_page(
                    vec![summary_doc("ok", "Ok"), summary_doc("../evil", "Evil"), no_uid],
                    None,
                ));
            })
            .await;

        let blog = blog(dir.path());
        let client = blog.client_with(settings_for(&server)).unwrap();
        let uids = Generator::new(&blog)
            .unwrap()
            .post_paths(&client)
            .await
            .unwrap();
        assert_eq!(uids, vec!["ok".to_string()]);
    }

    #[tokio::test]
    async fn missing_post_fails_with_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        mock_master_ref(&server).await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/v2/documents/search");
                then.status(200).json_body(search_page(vec![], None));
            })
            .await;

        let blog = blog(dir.path());
        let client = blog.client_with(settings_for(&server)).unwrap();
        let err = Generator::new(&blog)
            .unwrap()
            .generate_post(&client, "ghost")
            .await
            .unwrap_err();
        assert!(err
            .downcast_ref::<PrismicError>()
            .is_some_and(PrismicError::is_not_found));
    }

    #[tokio::test]
    async fn cms_failure_fails_the_build() {
        let dir = tempfile::tempdir().unwrap();
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/v2");
                then.status(503).body("unavailable");
            })
            .await;

        let blog = blog(dir.path());
        let client = blog.client_with(settings_for(&server)).unwrap();
        let result = Generator::new(&blog).unwrap().generate(&client).await;
        assert!(result.is_err());
        assert!(!dir.path().join("public/index.html").exists());
    }
}
