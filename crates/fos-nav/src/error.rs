//! Navigation errors

use std::time::Duration;

use fos_net::NetError;

/// Why a navigation failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {code}")]
    HttpStatus { code: u16 },

    #[error("navigation timeout after {after:?}")]
    Timeout { after: Duration },

    #[error("content container `{selector}` not found")]
    ContentNotFound { selector: String },
}

impl NavError {
    /// Map a transport failure, reporting timeouts against `deadline`
    pub fn from_net(err: NetError, deadline: Duration) -> Self {
        match err {
            NetError::Timeout => NavError::Timeout { after: deadline },
            other => NavError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_net() {
        let deadline = Duration::from_secs(10);
        assert_eq!(
            NavError::from_net(NetError::Timeout, deadline),
            NavError::Timeout { after: deadline }
        );
        assert!(matches!(
            NavError::from_net(NetError::Network("refused".into()), deadline),
            NavError::Network(msg) if msg.contains("refused")
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(NavError::HttpStatus { code: 404 }.to_string(), "HTTP error! status: 404");
        assert_eq!(
            NavError::ContentNotFound { selector: "#app".into() }.to_string(),
            "content container `#app` not found"
        );
    }
}
