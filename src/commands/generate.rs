//! Generate static files

use anyhow::Result;

use crate::generator::{BuildReport, Generator};
use crate::prismic::PrismicClient;
use crate::Blog;

/// Build the whole site from the CMS
pub async fn run(blog: &Blog, client: &PrismicClient) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    let report = generator.generate(client).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} post pages in {:.2}s",
        report.post_pages,
        duration.as_secs_f64()
    );

    Ok(report)
}
