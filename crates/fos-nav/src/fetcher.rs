//! Page Fetcher
//!
//! GETs a page through a [`Transport`] under a deadline and parses it.

use std::time::Duration;

use fos_dom::Document;
use fos_net::Transport;
use url::Url;
use smol::Timer;

use crate::{Config, NavError, path_and_query};

/// A parsed page and the path it was served under
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Canonical path; the redirect target when the server redirected
    pub path: String,
    pub document: Document,
}

/// Network retrieval of navigation targets
pub struct Fetcher<T> {
    transport: T,
    origin: Url,
    headers: Vec<(String, String)>,
    timeout: Duration,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, config: &Config) -> Self {
        Self {
            transport,
            origin: config.origin.clone(),
            headers: vec![config.nav_header.clone()],
            timeout: config.fetch_timeout,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch and parse `path`
    ///
    /// The transport future is dropped when the deadline passes first, so a
    /// late response is never observed.
    pub async fn fetch(&self, path: &str) -> Result<FetchedPage, NavError> {
        let url = self.origin.join(path).map_err(|e| NavError::Network(e.to_string()))?;
        tracing::debug!("Fetching {}", url);

        let deadline = self.timeout;
        let request = self.transport.get(&url, &self.headers);
        let outcome = smol::future::or(
            async { Some(request.await) },
            async {
                Timer::after(deadline).await;
                None
            },
        )
        .await;

        let Some(result) = outcome else {
            tracing::warn!("Fetch of {} timed out after {:?}", path, deadline);
            return Err(NavError::Timeout { after: deadline });
        };
        let response = result.map_err(|e| NavError::from_net(e, deadline))?;

        if !response.ok() {
            return Err(NavError::HttpStatus { code: response.status });
        }

        let path = if response.redirected {
            let canonical = path_and_query(&response.url);
            tracing::debug!("{} redirected to {}", path, canonical);
            canonical
        } else {
            path.to_string()
        };

        let document = fos_html::parse_with_url(&response.body, response.url.as_str());
        Ok(FetchedPage { path, document })
    }
}
