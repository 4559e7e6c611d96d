use thiserror::Error;

/// Failures while talking to a profile source.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no Google Scholar profile found for `{0}`")]
    ProfileNotFound(String),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("unexpected page layout: {0}")]
    Layout(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// A failure recorded in a replay dump.
    #[error("{0}")]
    Replay(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed replay dump: {0}")]
    Json(#[from] serde_json::Error),
}
