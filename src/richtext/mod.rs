//! Prismic rich text fields
//!
//! Rich text arrives as a list of blocks, each carrying plain text plus
//! character-offset spans. [`as_text`] flattens them for word counting and
//! [`as_html`] renders markup for post bodies.

mod html;

use serde::{Deserialize, Serialize};

use crate::prismic::nullable_string;

pub use html::as_html;

/// A rich text field value
pub type RichText = Vec<RichTextBlock>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,

    #[serde(default, deserialize_with = "nullable_string")]
    pub text: String,

    #[serde(default)]
    pub spans: Vec<Span>,

    /// Image blocks
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,

    /// Embed blocks
    #[serde(default)]
    pub oembed: Option<Embed>,
}

impl RichTextBlock {
    pub fn paragraph(text: &str) -> Self {
        Self::text(BlockKind::Paragraph, text)
    }

    pub fn text(kind: BlockKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
            oembed: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.spans.push(span);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[serde(rename = "paragraph")]
    Paragraph,
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
    #[serde(rename = "heading3")]
    Heading3,
    #[serde(rename = "heading4")]
    Heading4,
    #[serde(rename = "heading5")]
    Heading5,
    #[serde(rename = "heading6")]
    Heading6,
    #[serde(rename = "preformatted")]
    Preformatted,
    #[serde(rename = "list-item")]
    ListItem,
    #[serde(rename = "o-list-item")]
    OrderedListItem,
    #[serde(rename = "image")]
    Image,
    #[serde(rename = "embed")]
    Embed,
    #[serde(other)]
    Unknown,
}

/// Inline formatting over `[start, end)` character offsets of the block text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: SpanKind,
    #[serde(default)]
    pub data: Option<SpanData>,
}

impl Span {
    pub fn new(kind: SpanKind, start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            kind,
            data: None,
        }
    }

    pub fn link(start: usize, end: usize, url: &str) -> Self {
        Self {
            start,
            end,
            kind: SpanKind::Hyperlink,
            data: Some(SpanData {
                link_type: Some("Web".to_string()),
                url: Some(url.to_string()),
                ..SpanData::default()
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpanKind {
    #[serde(rename = "strong")]
    Strong,
    #[serde(rename = "em")]
    Em,
    #[serde(rename = "hyperlink")]
    Hyperlink,
    #[serde(rename = "label")]
    Label,
    #[serde(other)]
    Unknown,
}

/// Payload of hyperlink and label spans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpanData {
    #[serde(default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    /// Document links
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    /// Label spans
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub embed_url: Option<String>,
}

/// Concatenate the text of every block, joined by `separator`
pub fn as_text(blocks: &[RichTextBlock], separator: &str) -> String {
    blocks
        .iter()
        .map(|b| b.text.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
