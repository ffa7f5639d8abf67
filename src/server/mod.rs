//! Development server with on-demand post generation

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::generator::Generator;
use crate::helpers::is_safe_slug;
use crate::prismic::{PrismicClient, PrismicError};
use crate::Blog;

/// How long an unanswered miss or failure is kept
const OUTCOME_TTL: Duration = Duration::from_secs(60);

/// Where a post page that was missing from the build stands.
///
/// `Missing` and `Failed` are answered once and then dropped, so the next
/// request asks the CMS again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PageState {
    /// Being generated in the background
    Pending,
    /// The CMS had no post with this uid
    Missing(Instant),
    /// Last generation attempt failed
    Failed(Instant),
}

impl PageState {
    fn is_stale(&self, now: Instant) -> bool {
        match self {
            PageState::Pending => false,
            PageState::Missing(at) | PageState::Failed(at) => {
                now.duration_since(*at) > OUTCOME_TTL
            }
        }
    }
}

/// Server state
pub struct ServerState {
    public_dir: PathBuf,
    generator: Generator,
    client: PrismicClient,
    pages: Mutex<HashMap<String, PageState>>,
}

impl ServerState {
    pub fn new(blog: &Blog, client: PrismicClient) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            generator: Generator::new(blog)?,
            client,
            pages: Mutex::new(HashMap::new()),
        })
    }
}

/// Build the router serving the public directory
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the development server
pub async fn start(blog: &Blog, client: PrismicClient, ip: &str, port: u16) -> Result<()> {
    let state = Arc::new(ServerState::new(blog, client)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve files, generating post pages that are not on disk yet
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    if let Some(slug) = post_slug(request.uri().path()) {
        if !is_safe_slug(slug) {
            tracing::debug!("Rejected post slug {:?}", slug);
            return not_found(&state);
        }
        let slug = slug.to_string();
        if let Some(response) = ensure_post(&state, slug).await {
            return response;
        }
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) if response.status() == StatusCode::NOT_FOUND => not_found(&state),
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Slug of a `/post/{slug}` request
fn post_slug(path: &str) -> Option<&str> {
    let rest = path.strip_prefix("/post/")?;
    let rest = rest.strip_suffix("index.html").unwrap_or(rest);
    let slug = rest.trim_end_matches('/');
    (!slug.is_empty()).then_some(slug)
}

/// Returns a response when the page is not ready to be served from disk
async fn ensure_post(state: &Arc<ServerState>, slug: String) -> Option<Response> {
    let mut pages = state.pages.lock().await;

    if state.generator.post_output_path(&slug).exists() {
        return None;
    }

    match pages.get(&slug).copied() {
        Some(PageState::Pending) => Some(placeholder(state)),
        Some(PageState::Missing(_)) => {
            pages.remove(&slug);
            Some(not_found(state))
        }
        Some(PageState::Failed(_)) => {
            pages.remove(&slug);
            Some((StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate post").into_response())
        }
        None => {
            // Outcomes nobody came back for
            let now = Instant::now();
            pages.retain(|_, page| !page.is_stale(now));

            pages.insert(slug.clone(), PageState::Pending);
            tracing::info!("Generating post {:?} on demand", slug);

            let task = Arc::clone(state);
            tokio::spawn(async move {
                let result = task.generator.generate_post(&task.client, &slug).await;
                let mut pages = task.pages.lock().await;
                match result {
                    Ok(_) => {
                        pages.remove(&slug);
                    }
                    Err(e)
                        if e
                            .downcast_ref::<PrismicError>()
                            .is_some_and(PrismicError::is_not_found) =>
                    {
                        tracing::info!("No post with uid {:?}", slug);
                        pages.insert(slug, PageState::Missing(Instant::now()));
                    }
                    Err(e) => {
                        tracing::error!("Generation of {:?} failed: {:#}", slug, e);
                        pages.insert(slug, PageState::Failed(Instant::now()));
                    }
                }
            });

            Some(placeholder(state))
        }
    }
}

fn placeholder(state: &ServerState) -> Response {
    let site = state.generator.site();
    match state.generator.renderer().render_fallback(site) {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

fn not_found(state: &ServerState) -> Response {
    let site = state.generator.site();
    match state.generator.renderer().render_not_found(site) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}
