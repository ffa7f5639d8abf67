//! HTTP client for the Prismic REST API

use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::OnceCell;
use url::Url;

use super::document::{ApiEntry, Document, SearchPage};
use super::error::{PrismicError, Result};
use super::predicate::{self, Predicate};
use crate::config::PrismicSettings;

/// Query parameters besides the predicates
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    pub page_size: Option<usize>,
}

impl QueryOptions {
    pub fn page_size(page_size: usize) -> Self {
        Self {
            page_size: Some(page_size),
        }
    }
}

/// Client bound to one repository endpoint.
///
/// The master ref is fetched on first use and reused for every later query.
#[derive(Debug)]
pub struct PrismicClient {
    http: Client,
    settings: PrismicSettings,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    pub fn new(settings: PrismicSettings) -> Result<Self> {
        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self {
            http,
            settings,
            master_ref: OnceCell::new(),
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("spacetraveling/", env!("CARGO_PKG_VERSION"))
    }

    pub fn settings(&self) -> &PrismicSettings {
        &self.settings
    }

    /// Ref of the currently published content release
    pub async fn master_ref(&self) -> Result<&str> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut url = self.settings.endpoint.clone();
                self.append_token(&mut url);
                let entry: ApiEntry = self.get_json(url).await?;
                let master = entry
                    .master_ref()
                    .map(str::to_string)
                    .ok_or(PrismicError::NoMasterRef)?;
                tracing::debug!("Resolved master ref {}", master);
                Ok::<_, PrismicError>(master)
            })
            .await?;
        Ok(reference.as_str())
    }

    /// Run a query against the master ref and return one page of results
    pub async fn query<T: DeserializeOwned>(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchPage<T>> {
        let url = self.search_url(predicates, options).await?;
        self.get_json(url).await
    }

    /// Fetch a page by the absolute `next_page` URL of a previous response
    pub async fn fetch_page<T: DeserializeOwned>(&self, next_page: &str) -> Result<SearchPage<T>> {
        let url = Url::parse(next_page)?;
        self.get_json(url).await
    }

    /// Run a query and follow `next_page` until every result is collected
    pub async fn query_all<T: DeserializeOwned>(
        &self,
        predicates: &[Predicate],
        page_size: usize,
    ) -> Result<Vec<Document<T>>> {
        let mut page: SearchPage<T> = self
            .query(predicates, &QueryOptions::page_size(page_size))
            .await?;
        let mut documents = std::mem::take(&mut page.results);

        while let Some(next) = page.next_page.take() {
            page = self.fetch_page(&next).await?;
            documents.append(&mut page.results);
        }

        Ok(documents)
    }

    /// Look up a single document of `doc_type` by uid
    pub async fn get_by_uid<T: DeserializeOwned>(
        &self,
        doc_type: &str,
        uid: &str,
    ) -> Result<Document<T>> {
        let page: SearchPage<T> = self
            .query(&[Predicate::uid(doc_type, uid)], &QueryOptions::page_size(1))
            .await?;
        page.results
            .into_iter()
            .next()
            .ok_or_else(|| PrismicError::NotFound {
                doc_type: doc_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn search_url(&self, predicates: &[Predicate], options: &QueryOptions) -> Result<Url> {
        let reference = self.master_ref().await?;
        let mut url = Url::parse(&format!(
            "{}/documents/search",
            self.settings.endpoint.as_str().trim_end_matches('/')
        ))?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("ref", reference);
            if !predicates.is_empty() {
                qp.append_pair("q", &predicate::to_query(predicates));
            }
            if let Some(size) = options.page_size {
                qp.append_pair("pageSize", &size.to_string());
            }
        }
        self.append_token(&mut url);
        Ok(url)
    }

    fn append_token(&self, url: &mut Url) {
        if let Some(token) = &self.settings.access_token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        // The query string may carry the access token
        tracing::debug!("GET {}{}", url.origin().ascii_serialization(), url.path());

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(PrismicError::Status { status, body });
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prismic::testing::{client_for, mock_master_ref, search_page, summary_doc};
    use httpmock::MockServer;
    use serde_json::json;

    #[derive(Debug, serde::Deserialize)]
    struct Title {
        title: String,
    }

    #[tokio::test]
    async fn query_sends_ref_predicate_and_page_size() {
        let server = MockServer::start_async().await;
        let api = mock_master_ref(&server).await;
        let search = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("ref", "master-ref")
                    .query_param("q", r#"[[at(document.type, "post")]]"#)
                    .query_param("pageSize", "2")
                    .query_param("access_token", "secret");
                then.status(200).json_body(search_page(
                    vec![summary_doc("one", "One"), summary_doc("two", "Two")],
                    None,
                ));
            })
            .await;

        let client = client_for(&server);
        let page: SearchPage<Title> = client
            .query(
                &[Predicate::document_type("post")],
                &QueryOptions::page_size(2),
            )
            .await
            .unwrap();

        api.assert_async().await;
        search.assert_async().await;
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[1].data.title, "Two");
        assert!(page.next_page.is_none());
    }

    #[tokio::test]
    async fn master_ref_is_fetched_once() {
        let server = MockServer::start_async().await;
        let api = mock_master_ref(&server).await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/v2/documents/search");
                then.status(200).json_body(search_page(vec![], None));
            })
            .await;

        let client = client_for(&server);
        for _ in 0..3 {
            let _: SearchPage<Title> = client
                .query(&[], &QueryOptions::default())
                .await
                .unwrap();
        }
        api.assert_async().await;
    }

    #[tokio::test]
    async fn get_by_uid_missing_is_not_found() {
        let server = MockServer::start_async().await;
        mock_master_ref(&server).await;
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("q", r#"[[at(my.post.uid, "ghost")]]"#);
                then.status(200).json_body(search_page(vec![], None));
            })
            .await;

        let client = client_for(&server);
        let err = client
            .get_by_uid::<Title>("post", "ghost")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn query_all_follows_next_page() {
        let server = MockServer::start_async().await;
        mock_master_ref(&server).await;
        let second_url = server.url("/api/v2/documents/search?page=2");
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("pageSize", "100");
                then.status(200).json_body(search_page(
                    vec![summary_doc("a", "A"), summary_doc("b", "B")],
                    Some(&second_url),
                ));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/api/v2/documents/search")
                    .query_param("page", "2");
                then.status(200)
                    .json_body(search_page(vec![summary_doc("c", "C")], None));
            })
            .await;

        let client = client_for(&server);
        let docs: Vec<Document<Title>> = client
            .query_all(&[Predicate::document_type("post")], 100)
            .await
            .unwrap();
        let uids: Vec<_> = docs.iter().filter_map(|d| d.uid.as_deref()).collect();
        assert_eq!(uids, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("GET").path("/api/v2");
                then.status(401).json_body(json!({"error": "Invalid access token"}));
            })
            .await;

        let client = client_for(&server);
        let err = client.master_ref().await.unwrap_err();
        match err {
            PrismicError::Status { status, body } => {
                assert_eq!(status.as_u16(), 401);
                assert!(body.contains("Invalid access token"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
