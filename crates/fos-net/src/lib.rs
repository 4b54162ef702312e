//! fOS Networking
//!
//! HTTP transport used by the navigator to fetch pages and scripts.

mod loader;

pub use loader::{ResourceLoader, LoaderBuilder};
pub use url::Url;

/// Something that can perform an HTTP GET
///
/// Implementations report every HTTP status as `Ok`; judging the status is
/// left to the caller.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Issue a GET for `url` with extra request headers
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<Response, NetError>;
}

/// HTTP Response
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Final URL after redirects
    pub url: Url,
    /// Whether `url` differs from the requested URL
    pub redirected: bool,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    /// Check if response is OK (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<reqwest::Error> for NetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            NetError::Timeout
        } else if err.is_builder() {
            NetError::InvalidUrl(err.to_string())
        } else {
            NetError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetError {
    fn from(err: url::ParseError) -> Self {
        NetError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Response {
        Response {
            status,
            url: Url::parse("http://localhost/").unwrap(),
            redirected: false,
            headers: vec![("Content-Type".into(), "text/html".into())],
            body: String::new(),
        }
    }

    #[test]
    fn test_response_ok_range() {
        assert!(response(200).ok());
        assert!(response(204).ok());
        assert!(!response(199).ok());
        assert!(!response(301).ok());
        assert!(!response(404).ok());
    }

    #[test]
    fn test_header_case_insensitive() {
        let resp = response(200);
        assert_eq!(resp.header("content-type"), Some("text/html"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn test_url_error_conversion() {
        let err: NetError = Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, NetError::InvalidUrl(_)));
    }
}
