//! Navigation events
//!
//! Listeners receive one event per accepted navigation, successful or not.

use std::rc::Rc;

use serde::Serialize;

use crate::{HistoryState, NavError};

/// Result of an accepted navigation
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    Success(HistoryState),
    Failure(NavError),
}

/// Signal emitted when a navigation finishes
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationEvent {
    pub path: String,
    pub outcome: NavigationOutcome,
}

/// Serializable `{ path, success, state | error }` view of an event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDetail {
    pub path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<HistoryState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NavigationEvent {
    pub fn success(&self) -> bool {
        matches!(self.outcome, NavigationOutcome::Success(_))
    }

    pub fn state(&self) -> Option<&HistoryState> {
        match &self.outcome {
            NavigationOutcome::Success(state) => Some(state),
            NavigationOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&NavError> {
        match &self.outcome {
            NavigationOutcome::Success(_) => None,
            NavigationOutcome::Failure(err) => Some(err),
        }
    }

    pub fn detail(&self) -> EventDetail {
        EventDetail {
            path: self.path.clone(),
            success: self.success(),
            state: self.state().cloned(),
            error: self.error().map(ToString::to_string),
        }
    }
}

/// Handle returned by `on_navigate`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Listener = Rc<dyn Fn(&NavigationEvent)>;

/// Registered navigation listeners in subscription order
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    pub fn subscribe(&mut self, handler: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, handler));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(h, _)| *h != id);
        self.handlers.len() != before
    }

    /// Handlers to call, detached from the registry
    pub fn snapshot(&self) -> Vec<Listener> {
        self.handlers.iter().map(|(_, h)| h.clone()).collect()
    }
}
