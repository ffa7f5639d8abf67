use thiserror::Error;

/// Errors raised while talking to the Prismic API
#[derive(Debug, Error)]
pub enum PrismicError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Prismic returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode Prismic response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Prismic API did not advertise a master ref")]
    NoMasterRef,

    #[error("no {doc_type} document with uid {uid:?}")]
    NotFound { doc_type: String, uid: String },
}

impl PrismicError {
    /// Whether the error means the document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, PrismicError::NotFound { .. })
    }
}

pub type Result<T, E = PrismicError> = std::result::Result<T, E>;
