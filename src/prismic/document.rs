//! Response envelopes of the Prismic REST API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// API entry document, used to find the master ref
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEntry {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

impl ApiEntry {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

/// A CMS document with its custom-type payload in `data`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document<T> {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub doc_type: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub first_publication_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub last_publication_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub lang: Option<String>,

    pub data: T,
}

/// One page of query results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage<T> {
    #[serde(default)]
    pub page: u32,

    #[serde(default)]
    pub results_per_page: u32,

    #[serde(default)]
    pub total_results_size: u32,

    #[serde(default)]
    pub total_pages: u32,

    /// Absolute URL of the next page, `None` on the last page
    #[serde(default, deserialize_with = "deserialize_cursor")]
    pub next_page: Option<String>,

    #[serde(default = "Vec::new")]
    pub results: Vec<Document<T>>,
}

/// Parse a Prismic timestamp.
///
/// The API emits `2021-03-25T19:25:28+0000`; RFC 3339 is accepted as well.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

fn deserialize_cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()))
}

/// Text fields come back as `null` when left empty in the editor
pub(crate) fn nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Deserialize, Serialize)]
    struct Data {
        #[serde(default, deserialize_with = "nullable_string")]
        title: String,
    }

    #[test]
    fn test_parse_prismic_offset_format() {
        let date = parse_timestamp("2021-03-25T19:25:28+0000").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2021, 3, 25, 19, 25, 28).unwrap());
    }

    #[test]
    fn test_parse_rfc3339() {
        let date = parse_timestamp("2023-01-05T00:00:00Z").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2023, 1, 5, 0, 0, 0).unwrap());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_decode_search_page() {
        let json = r#"{
            "page": 1,
            "results_per_page": 2,
            "total_results_size": 3,
            "total_pages": 2,
            "next_page": "https://x.cdn.prismic.io/api/v2/documents/search?page=2",
            "prev_page": null,
            "results": [
                {"id": "A1", "uid": "first", "type": "post", "tags": [],
                 "first_publication_date": "2021-03-25T19:25:28+0000",
                 "last_publication_date": null,
                 "data": {"title": "First"}},
                {"id": "A2", "type": "post",
                 "first_publication_date": null,
                 "data": {"title": null}}
            ]
        }"#;
        let page: SearchPage<Data> = serde_json::from_str(json).unwrap();
        assert_eq!(page.total_pages, 2);
        assert!(page.next_page.is_some());
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].uid.as_deref(), Some("first"));
        assert!(page.results[0].first_publication_date.is_some());
        assert!(page.results[1].uid.is_none());
        assert!(page.results[1].first_publication_date.is_none());
        assert_eq!(page.results[1].data.title, "");
    }

    #[test]
    fn test_empty_cursor_is_none() {
        let page: SearchPage<Data> =
            serde_json::from_str(r#"{"next_page": "", "results": []}"#).unwrap();
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_missing_results_is_empty() {
        // Data has no Default impl; an absent list must still decode
        let page: SearchPage<Data> = serde_json::from_str(r#"{"next_page": null}"#).unwrap();
        assert!(page.results.is_empty());
        assert!(page.next_page.is_none());
    }

    #[test]
    fn test_master_ref() {
        let entry: ApiEntry = serde_json::from_str(
            r#"{"refs": [
                {"id": "preview", "ref": "P1", "label": "Preview", "isMasterRef": false},
                {"id": "master", "ref": "M1", "label": "Master", "isMasterRef": true}
            ]}"#,
        )
        .unwrap();
        assert_eq!(entry.master_ref(), Some("M1"));
    }
}
