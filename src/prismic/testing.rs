//! Fake Prismic repository for tests

use httpmock::{Mock, MockServer};
use serde_json::{json, Value};

use super::PrismicClient;
use crate::config::PrismicSettings;

pub(crate) const TOKEN: &str = "secret";

pub(crate) fn settings_for(server: &MockServer) -> PrismicSettings {
    PrismicSettings::new(&server.url("/api/v2"), Some(TOKEN.to_string())).unwrap()
}

pub(crate) fn client_for(server: &MockServer) -> PrismicClient {
    PrismicClient::new(settings_for(server)).unwrap()
}

pub(crate) async fn mock_master_ref(server: &MockServer) -> Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2")
                .query_param("access_token", TOKEN);
            then.status(200).json_body(json!({
                "refs": [
                    {"id": "master", "ref": "master-ref", "label": "Master", "isMasterRef": true}
                ]
            }));
        })
        .await
}

pub(crate) fn search_page(results: Vec<Value>, next_page: Option<&str>) -> Value {
    json!({
        "page": 1,
        "results_per_page": results.len(),
        "results_size": results.len(),
        "total_results_size": results.len(),
        "total_pages": 1,
        "next_page": next_page,
        "prev_page": null,
        "results": results,
    })
}

pub(crate) fn summary_doc(uid: &str, title: &str) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "post",
        "tags": [],
        "first_publication_date": "2023-01-05T00:00:00+0000",
        "last_publication_date": "2023-01-05T00:00:00+0000",
        "lang": "pt-br",
        "data": {
            "title": title,
            "subtitle": format!("{} subtitle", title),
            "author": "Joseph Oliveira",
        }
    })
}

pub(crate) fn detail_doc(uid: &str, title: &str, sections: Value) -> Value {
    json!({
        "id": format!("id-{}", uid),
        "uid": uid,
        "type": "post",
        "tags": [],
        "first_publication_date": "2023-01-05T00:00:00+0000",
        "last_publication_date": "2023-01-05T00:00:00+0000",
        "lang": "pt-br",
        "data": {
            "title": title,
            "subtitle": "",
            "author": "Joseph Oliveira",
            "banner": {"url": "https://images.prismic.io/banner.png", "alt": null},
            "content": sections,
        }
    })
}

/// Serve `doc` for `at(my.post.uid, uid)` queries
pub(crate) async fn mock_post<'a>(server: &'a MockServer, uid: &str, doc: Value) -> Mock<'a> {
    let q = format!(r#"[[at(my.post.uid, "{}")]]"#, uid);
    server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("q", q);
            then.status(200).json_body(search_page(vec![doc], None));
        })
        .await
}
