//! fOS Navigator
//!
//! Client-side navigation for single-page application shells: fetch a
//! same-origin page, reconcile the engine-managed head resources, swap the
//! content container and keep history entries in sync.
//!
//! # Architecture
//!
//! ```text
//! click / popstate ─▶ NavigationEngine::navigate (single-flight)
//!                        ├─ TransitionCache ─ or ─ Fetcher (Transport)
//!                        ├─ reconcile: links, styles, title, content
//!                        ├─ ScriptReconciler ─▶ ScriptHost
//!                        └─ HistoryBackend ─▶ NavigationEvent listeners
//! ```

mod cache;
mod config;
mod engine;
mod error;
mod events;
mod fetcher;
mod history;
mod input;
mod js_host;
mod reconcile;
mod scripts;

pub use cache::TransitionCache;
pub use config::Config;
pub use engine::{NavigationEngine, NavigationRequest};
pub use error::NavError;
pub use events::{EventDetail, NavigationEvent, NavigationOutcome, SubscriptionId};
pub use fetcher::{FetchedPage, Fetcher};
pub use history::{HistoryAction, HistoryBackend, HistoryEntry, HistoryState, SessionHistory};
pub use input::{ClickDisposition, ClickEvent, Modifiers};
pub use js_host::JsScriptHost;
pub use reconcile::{ReconcileStats, reconcile_tagged, replace_content, update_title};
pub use scripts::{ScriptHost, ScriptIdentity, ScriptReconciler, guard_script};

pub use fos_dom::{Document, NodeId};
pub use fos_net::Transport;
pub use url::Url;

/// Navigator version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Normalize a navigation path to always start with a single `/`
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_start_matches('/');
    format!("/{}", trimmed)
}

/// Path plus query of a URL, without origin
pub(crate) fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}
