use thiserror::Error;

/// Result type using [`ErrorKind`] as the error variant
pub type Result<T> = std::result::Result<T, ErrorKind>;

/// Possible errors when interacting with `deadlink_finder`
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The request could not be built or sent at all.
    /// Note that reachability failures of probed links never surface here;
    /// those become a [`Status`](crate::Status) instead.
    #[error("Network error while trying to connect to an endpoint")]
    ReqwestError(#[from] reqwest::Error),
    /// A configured header value could not be parsed
    #[error("Header could not be parsed")]
    InvalidHeader(#[from] http::header::InvalidHeaderValue),
    /// The given string can not be parsed into a valid URL
    #[error("Cannot parse {0} as a URL: {1}")]
    UrlParseError(String, url::ParseError),
    /// The project base address cannot carry branch and file path segments
    #[error("Cannot derive a raw document address from base `{0}`")]
    InvalidBaseUrl(String),
    /// Retrieving the document to check failed; fatal for this one document
    #[error("Failed to fetch document from `{url}`: {source}")]
    DocumentFetch {
        url: String,
        source: reqwest::Error,
    },
    /// A spawned probe did not run to completion (e.g. it panicked)
    #[error("A probe task could not be joined")]
    TaskJoin(#[from] tokio::task::JoinError),
}
