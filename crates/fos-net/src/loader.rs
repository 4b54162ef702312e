//! Resource Loader
//!
//! Blocking reqwest client driven from async code through smol's blocking
//! thread pool.

use std::time::Duration;

use crate::{NetError, Response, Transport, Url};

/// Builder for [`ResourceLoader`]
pub struct LoaderBuilder {
    user_agent: String,
    timeout: Option<Duration>,
}

impl LoaderBuilder {
    pub fn user_agent(mut self, ua: &str) -> Self {
        self.user_agent = ua.to_string();
        self
    }

    /// Client-side hard limit for a whole request
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ResourceLoader, NetError> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(self.user_agent);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(ResourceLoader { client: builder.build()? })
    }
}

/// Load resources from network
#[derive(Clone)]
pub struct ResourceLoader {
    client: reqwest::blocking::Client,
}

impl ResourceLoader {
    pub fn new() -> Result<Self, NetError> {
        Self::builder().build()
    }

    pub fn builder() -> LoaderBuilder {
        LoaderBuilder {
            user_agent: format!("fOS-Navigator/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
        }
    }

    /// Start a GET on the blocking pool
    ///
    /// Dropping the returned task abandons the request; a response that
    /// arrives afterwards is discarded.
    pub fn spawn_get(&self, url: Url, headers: Vec<(String, String)>) -> smol::Task<Result<Response, NetError>> {
        let client = self.client.clone();
        smol::unblock(move || blocking_get(&client, url, &headers))
    }
}

impl Transport for ResourceLoader {
    async fn get(&self, url: &Url, headers: &[(String, String)]) -> Result<Response, NetError> {
        self.spawn_get(url.clone(), headers.to_vec()).await
    }
}

fn blocking_get(
    client: &reqwest::blocking::Client,
    url: Url,
    headers: &[(String, String)],
) -> Result<Response, NetError> {
    tracing::debug!("HTTP GET {}", url);

    let mut request = client.get(url.clone());
    for (name, value) in headers {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request.send()?;
    let status = response.status().as_u16();
    let final_url = response.url().clone();
    let response_headers = response.headers()
        .iter()
        .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
        .collect();
    let body = response.text()?;

    tracing::debug!("HTTP {} {} ({} bytes)", status, final_url, body.len());

    Ok(Response {
        status,
        redirected: final_url != url,
        url: final_url,
        headers: response_headers,
        body,
    })
}
