//! Cursor-driven post listing

use serde::{Deserialize, Serialize};

use super::post::{PostSummary, PostSummaryData, POST_TYPE};
use crate::prismic::{PrismicClient, Predicate, QueryOptions, Result, SearchPage};

/// Posts loaded so far plus the cursor to the next page.
///
/// Results are only ever appended, in the order the CMS returns them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

impl PostPagination {
    /// Query the first page of posts
    pub async fn first_page(client: &PrismicClient, page_size: usize) -> Result<Self> {
        let page = client
            .query(
                &[Predicate::document_type(POST_TYPE)],
                &QueryOptions::page_size(page_size),
            )
            .await?;
        Ok(Self::from_page(page))
    }

    pub fn from_page(page: SearchPage<PostSummaryData>) -> Self {
        Self {
            next_page: page.next_page,
            results: page.results,
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_page.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Append a fetched page and take over its cursor
    pub fn append(&mut self, page: SearchPage<PostSummaryData>) {
        self.results.extend(page.results);
        self.next_page = page.next_page.filter(|p| !p.is_empty());
    }

    /// Fetch the page behind the cursor and append it.
    ///
    /// Returns how many posts were added; `0` when there is no cursor. On
    /// error the pagination is left untouched.
    pub async fn load_more(&mut self, client: &PrismicClient) -> Result<usize> {
        let Some(next) = self.next_page.as_deref().filter(|p| !p.is_empty()) else {
            return Ok(0);
        };

        let page = client.fetch_page::<PostSummaryData>(next).await?;
        let added = page.results.len();
        self.append(page);
        tracing::debug!("Loaded {} more posts ({} total)", added, self.results.len());
        Ok(added)
    }
}
