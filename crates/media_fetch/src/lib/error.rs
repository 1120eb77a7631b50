#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    ParseError(&'static str),
    #[error("Auth error: {0}")]
    AuthError(String),
    #[error("HTTP error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Request to {url} failed with status {status}")]
    Status { status: u16, url: String },
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Transport failures and non-success HTTP statuses alike
    pub fn is_network(&self) -> bool {
        matches!(self, Error::NetworkError(_) | Error::Status { .. })
    }

    /// Whether the server refused the request on credential grounds
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Status { status: 401 | 403, .. })
    }
}
