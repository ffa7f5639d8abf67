//! Post models

use serde::{Deserialize, Serialize};

use crate::prismic::{nullable_string, Document};
use crate::richtext::RichText;

/// Custom type id of posts in the repository
pub const POST_TYPE: &str = "post";

/// Fields needed for the home page listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryData {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub subtitle: String,

    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,
}

/// Fields needed to render a full post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailData {
    #[serde(default, deserialize_with = "nullable_string")]
    pub title: String,

    #[serde(default)]
    pub banner: Banner,

    #[serde(default, deserialize_with = "nullable_string")]
    pub author: String,

    #[serde(default)]
    pub content: Vec<ContentSection>,
}

/// Banner image field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Banner {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub alt: Option<String>,
}

/// One repeatable group entry of the post body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSection {
    #[serde(default, deserialize_with = "nullable_string")]
    pub heading: String,

    #[serde(default)]
    pub body: RichText,
}

/// A post as listed on the home page
pub type PostSummary = Document<PostSummaryData>;

/// A post with its full body
pub type PostDetail = Document<PostDetailData>;
