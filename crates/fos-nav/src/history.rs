//! History synchronization
//!
//! Structured history state plus an in-memory session history that behaves
//! like `window.history` (pushState, replaceState, back, forward, go).

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// State object stored with every engine-created history entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub path: String,
    pub title: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl HistoryState {
    /// State for `path` stamped with the current time
    pub fn new(path: &str, title: &str) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Self {
            path: path.to_string(),
            title: title.to_string(),
            timestamp,
        }
    }

    /// JSON form handed to the history backend
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Where history entries are written
pub trait HistoryBackend {
    /// Add an entry after the current one, dropping forward entries
    fn push_state(&mut self, state: Option<String>, title: String, url: String);

    /// Overwrite the current entry
    fn replace_state(&mut self, state: Option<String>, title: String, url: String);

    /// JSON state of the current entry
    fn current_state(&self) -> Option<String>;
}

/// What [`record`] did with a state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    Pushed,
    Replaced,
    Skipped,
}

/// Record `state`: push, else replace, else leave history alone
pub fn record<H: HistoryBackend + ?Sized>(
    backend: &mut H,
    state: &HistoryState,
    push: bool,
    replace: bool,
) -> HistoryAction {
    let json = Some(state.to_json());
    let (title, url) = (state.title.clone(), state.path.clone());
    if push {
        backend.push_state(json, title, url);
        HistoryAction::Pushed
    } else if replace {
        backend.replace_state(json, title, url);
        HistoryAction::Replaced
    } else {
        HistoryAction::Skipped
    }
}

/// History entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: String,
    pub title: String,
    /// JSON-serialized state
    pub state: Option<String>,
}

/// In-memory session history
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    current: usize,
}

impl SessionHistory {
    pub fn new(initial_url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial_url.to_string(),
                title: String::new(),
                state: None,
            }],
            current: 0,
        }
    }

    /// Go back
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        self.go(-1)
    }

    /// Go forward
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        self.go(1)
    }

    /// Go to specific offset; out-of-range offsets leave history unchanged
    pub fn go(&mut self, delta: i32) -> Option<&HistoryEntry> {
        if delta == 0 {
            return None;
        }
        let index = self.current.checked_add_signed(delta as isize)?;
        if index < self.entries.len() {
            self.current = index;
            Some(&self.entries[index])
        } else {
            None
        }
    }

    /// Get current entry
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.current]
    }

    /// Get history length
    pub fn length(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

impl HistoryBackend for SessionHistory {
    fn push_state(&mut self, state: Option<String>, title: String, url: String) {
        // Remove forward history
        self.entries.truncate(self.current + 1);
        self.entries.push(HistoryEntry { url, title, state });
        self.current = self.entries.len() - 1;
    }

    fn replace_state(&mut self, state: Option<String>, title: String, url: String) {
        let entry = &mut self.entries[self.current];
        entry.url = url;
        entry.title = title;
        entry.state = state;
    }

    fn current_state(&self) -> Option<String> {
        self.current().state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_push() {
        let mut history = SessionHistory::new("https://example.com/");

        history.push_state(None, "Page 2".into(), "/page2".into());
        assert_eq!(history.length(), 2);
        assert_eq!(history.current().url, "/page2");
    }

    #[test]
    fn test_history_navigation() {
        let mut history = SessionHistory::new("https://example.com/");
        history.push_state(None, "".into(), "/page1".into());
        history.push_state(None, "".into(), "/page2".into());

        history.back();
        assert_eq!(history.current().url, "/page1");

        history.back();
        assert_eq!(history.current().url, "https://example.com/");
        assert!(history.back().is_none());

        history.forward();
        assert_eq!(history.current().url, "/page1");

        assert_eq!(history.go(1).map(|e| e.url.as_str()), Some("/page2"));
        assert!(history.go(5).is_none());
        assert_eq!(history.current().url, "/page2");
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut history = SessionHistory::new("/");
        history.push_state(None, "".into(), "/a".into());
        history.push_state(None, "".into(), "/b".into());
        history.back();
        history.push_state(None, "".into(), "/c".into());

        let urls: Vec<&str> = history.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/", "/a", "/c"]);
    }

    #[test]
    fn test_record_actions() {
        let mut history = SessionHistory::new("/");
        let state = HistoryState::new("/about", "About");

        assert_eq!(record(&mut history, &state, true, false), HistoryAction::Pushed);
        assert_eq!(history.length(), 2);

        assert_eq!(record(&mut history, &state, false, true), HistoryAction::Replaced);
        assert_eq!(history.length(), 2);

        assert_eq!(record(&mut history, &state, false, false), HistoryAction::Skipped);
        assert_eq!(history.length(), 2);

        let stored = HistoryState::from_json(&history.current_state().unwrap()).unwrap();
        assert_eq!(stored, state);
        assert_eq!(history.current().title, "About");
    }

    #[test]
    fn test_state_json_shape() {
        let state = HistoryState { path: "/a".into(), title: "A".into(), timestamp: 42 };
        assert_eq!(state.to_json(), r#"{"path":"/a","title":"A","timestamp":42}"#);
        assert!(HistoryState::new("/", "").timestamp > 0);
    }
}
