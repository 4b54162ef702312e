//! Head and content reconciliation
//!
//! Links and styles carrying the dynamic marker are diffed structurally
//! against the incoming page. Untagged elements belong to the page shell and
//! are never looked at.

use fos_dom::{Document, NodeId, SimpleSelector};

use crate::NavError;

/// Elements touched by one reconcile pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileStats {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Diff `tag[marker]` elements of `live` against `incoming`
///
/// Current elements without a structurally equal incoming counterpart are
/// removed; incoming elements without a current counterpart are deep-copied
/// into `<head>`.
pub fn reconcile_tagged(live: &mut Document, incoming: &Document, tag: &str, marker: &str) -> ReconcileStats {
    let selector = SimpleSelector::tagged(tag, marker);
    let current = live.query_selector_all(&selector);
    let wanted = incoming.query_selector_all(&selector);

    let has_match = |id: NodeId, pool: &[NodeId], live_side: bool| {
        pool.iter().any(|&other| {
            if live_side {
                live.tree().is_equal_node(id, incoming.tree(), other)
            } else {
                live.tree().is_equal_node(other, incoming.tree(), id)
            }
        })
    };

    // Collected before any removal: removed slots get reused by new nodes
    let to_add: Vec<NodeId> = wanted.iter().copied().filter(|&w| !has_match(w, &current, false)).collect();
    let to_remove: Vec<NodeId> = current.iter().copied().filter(|&c| !has_match(c, &wanted, true)).collect();

    for &id in &to_remove {
        live.tree_mut().remove(id);
    }

    let head = live.head();
    let mut added = 0;
    if head.is_valid() {
        for &id in &to_add {
            let copy = live.tree_mut().import(incoming.tree(), id);
            live.tree_mut().append_child(head, copy);
            added += 1;
        }
    } else if !to_add.is_empty() {
        tracing::warn!("Live document has no <head>; skipped {} <{}> elements", to_add.len(), tag);
    }

    let stats = ReconcileStats { added, removed: to_remove.len() };
    tracing::debug!("Reconciled <{}[{}]>: +{} -{}", tag, marker, stats.added, stats.removed);
    stats
}

/// Copy the incoming `<title>` text, when there is one
pub fn update_title(live: &mut Document, incoming: &Document) {
    if incoming.has_title() {
        live.set_title(&incoming.title());
    }
}

/// Replace the children of the live content container with copies of the
/// incoming container's children
pub fn replace_content(live: &mut Document, incoming: &Document, selector: &str) -> Result<(), NavError> {
    let not_found = || NavError::ContentNotFound { selector: selector.to_string() };
    let parsed = SimpleSelector::parse(selector).ok_or_else(not_found)?;

    let source = incoming.query_selector(&parsed).ok_or_else(not_found)?;
    let target = live.query_selector(&parsed).ok_or_else(not_found)?;

    live.replace_children_from(target, incoming, source);
    Ok(())
}
