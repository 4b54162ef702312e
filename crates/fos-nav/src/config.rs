//! Navigator Configuration

use std::time::Duration;

use url::Url;

/// Default deadline for a page fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Navigation engine configuration options
#[derive(Debug, Clone)]
pub struct Config {
    /// Origin every navigation path is resolved against
    pub origin: Url,

    /// Simple selector of the content container
    pub content_selector: String,

    /// Marker attribute of engine-managed head elements
    pub dynamic_attr: String,

    /// Attribute holding an inline script's identity
    pub script_id_attr: String,

    /// Deadline for a single page fetch
    pub fetch_timeout: Duration,

    /// Header marking requests as client-side navigations
    pub nav_header: (String, String),

    /// User agent string
    pub user_agent: String,
}

impl Config {
    pub fn with_origin(mut self, origin: Url) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_content_selector(mut self, selector: &str) -> Self {
        self.content_selector = selector.to_string();
        self
    }

    pub fn with_dynamic_attr(mut self, attr: &str) -> Self {
        self.dynamic_attr = attr.to_string();
        self
    }

    pub fn with_script_id_attr(mut self, attr: &str) -> Self {
        self.script_id_attr = attr.to_string();
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_nav_header(mut self, name: &str, value: &str) -> Self {
        self.nav_header = (name.to_string(), value.to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            origin: Url::parse("http://localhost/").expect("static URL"),
            content_selector: "#app".to_string(),
            dynamic_attr: "data-dynamic".to_string(),
            script_id_attr: "data-id".to_string(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            nav_header: ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
            user_agent: format!("fOS-Navigator/{}", crate::VERSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.origin.as_str(), "http://localhost/");
        assert_eq!(config.content_selector, "#app");
        assert_eq!(config.dynamic_attr, "data-dynamic");
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.nav_header.0, "X-Requested-With");
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::default()
            .with_origin(Url::parse("https://example.com").unwrap())
            .with_content_selector("main")
            .with_fetch_timeout(Duration::from_millis(250));
        assert_eq!(config.origin.host_str(), Some("example.com"));
        assert_eq!(config.content_selector, "main");
        assert_eq!(config.fetch_timeout, Duration::from_millis(250));
    }
}
