//! Click and popstate adapters
//!
//! Decide whether an anchor activation should become a client-side
//! navigation or be left to default browser handling.

use fos_dom::{Document, NodeId, SimpleSelector};
use url::Url;

use crate::path_and_query;

/// Keyboard modifiers held during a click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.meta || self.ctrl || self.shift || self.alt
    }
}

/// A click on a node of the live document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickEvent {
    pub target: NodeId,
    pub modifiers: Modifiers,
}

impl ClickEvent {
    pub fn new(target: NodeId) -> Self {
        Self { target, modifiers: Modifiers::default() }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// How a click was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickDisposition {
    /// Taken over by the engine; `accepted` is false when another
    /// navigation was already in flight
    Intercepted { path: String, accepted: bool },
    /// Left to the browser
    Default,
}

/// Path to navigate to for `event`, or `None` to let the browser handle it
pub(crate) fn intercept_path(doc: &Document, origin: &Url, location: &str, event: &ClickEvent) -> Option<String> {
    let anchor = doc.closest(event.target, &SimpleSelector::Tag("a".into()))?;
    // An empty href still resolves, to the current location
    let href = doc.attr(anchor, "href").map(str::trim)?;

    if event.modifiers.any() {
        return None;
    }
    if doc.attr(anchor, "download").is_some() {
        return None;
    }
    if doc.attr(anchor, "target").is_some_and(|t| !t.trim().is_empty()) {
        return None;
    }

    let url = origin.join(location).and_then(|base| base.join(href)).ok()?;
    if url.origin() != origin.origin() {
        tracing::debug!("Leaving cross-origin link {} to the browser", url);
        return None;
    }
    Some(path_and_query(&url))
}

/// Path carried by a popstate state object
pub(crate) fn popstate_path(state: Option<&str>) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(state?).ok()?;
    value.get("path")?.as_str().filter(|p| !p.is_empty()).map(str::to_string)
}
