//! List posts published in the CMS

use anyhow::{Context, Result};

use crate::content::{PostPagination, PostSummary};
use crate::helpers::publication_date;
use crate::prismic::PrismicClient;
use crate::Blog;

/// Print every post, walking the listing one page at a time
pub async fn run(blog: &Blog, client: &PrismicClient) -> Result<()> {
    let pagination = load_all(blog, client).await?;
    let tz = blog.config.tz();

    println!("Posts ({}):", pagination.results.len());
    for post in &pagination.results {
        println!("  {}", format_line(post, &tz));
    }

    Ok(())
}

/// Follow the listing cursor the way the home page does until it runs out
pub async fn load_all(blog: &Blog, client: &PrismicClient) -> Result<PostPagination> {
    let mut pagination = PostPagination::first_page(client, blog.config.home.page_size)
        .await
        .context("Failed to query posts")?;

    while pagination.has_more() {
        let added = pagination
            .load_more(client)
            .await
            .context("Failed to load more posts")?;
        if added == 0 {
            break;
        }
    }

    Ok(pagination)
}

fn format_line(post: &PostSummary, tz: &chrono_tz::Tz) -> String {
    let date = publication_date(post.first_publication_date.as_ref(), tz);
    format!(
        "{:<11} - {} [{}]",
        date,
        post.data.title,
        post.uid.as_deref().unwrap_or("-")
    )
}
