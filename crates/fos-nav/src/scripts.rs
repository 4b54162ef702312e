//! Script reconciliation
//!
//! Scripts are compared by identity rather than markup: external scripts by
//! resolved URL, inline scripts by their id attribute. Scripts already on
//! the page are never recreated; new ones are built fresh and handed to a
//! [`ScriptHost`] to run.

use std::collections::HashSet;

use fos_dom::{Document, ElementData, NodeId, SimpleSelector};
use url::Url;

use crate::ReconcileStats;

/// Executes scripts on behalf of the engine
pub trait ScriptHost {
    /// Run an already-guarded inline script
    fn execute_inline(&mut self, id: &str, source: &str);

    /// Start loading an external script; completion is not awaited
    fn load_external(&mut self, url: &Url);

    /// Run any external scripts that finished loading
    fn run_ready(&mut self) {}
}

/// Identity of a dynamic script
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptIdentity {
    /// Resolved `src` URL
    External(String),
    /// Id attribute of an inline script
    Inline(String),
}

/// Wrap inline source so it runs at most once per page lifetime
pub fn guard_script(id: &str, source: &str) -> String {
    let key = serde_json::Value::String(id.to_string());
    format!(
        "(function() {{\n  if (window[{key}]) return;\n  window[{key}] = true;\n  {source}\n}})();"
    )
}

/// Script diffing plus the id counter that lives as long as the engine
#[derive(Debug)]
pub struct ScriptReconciler {
    marker: String,
    id_attr: String,
    next_id: u64,
}

impl ScriptReconciler {
    pub fn new(marker: &str, id_attr: &str) -> Self {
        Self {
            marker: marker.to_string(),
            id_attr: id_attr.to_string(),
            next_id: 0,
        }
    }

    fn selector(&self) -> SimpleSelector {
        SimpleSelector::tagged("script", &self.marker)
    }

    /// Give every tagged inline script without an id the next `script_<n>`
    ///
    /// Returns the number of ids handed out.
    pub fn assign_ids(&mut self, doc: &mut Document) -> usize {
        let mut assigned = 0;
        for id in doc.query_selector_all(&self.selector()) {
            let needs_id = doc.attr(id, "src").is_none()
                && doc.attr(id, &self.id_attr).is_none()
                && !doc.tree().text_content(id).is_empty();
            if needs_id {
                let script_id = format!("script_{}", self.next_id);
                self.next_id += 1;
                doc.set_attr(id, &self.id_attr, &script_id);
                assigned += 1;
            }
        }
        if assigned > 0 {
            tracing::debug!("Assigned {} inline script ids", assigned);
        }
        assigned
    }

    /// Identity of a script element, `None` for empty inline scripts
    pub fn identity(&self, doc: &Document, id: NodeId) -> Option<ScriptIdentity> {
        if let Some(src) = doc.attr(id, "src") {
            let resolved = Url::parse(doc.url())
                .and_then(|base| base.join(src))
                .map(String::from)
                .unwrap_or_else(|_| src.to_string());
            return Some(ScriptIdentity::External(resolved));
        }
        if doc.tree().text_content(id).is_empty() {
            return None;
        }
        doc.attr(id, &self.id_attr).map(|i| ScriptIdentity::Inline(i.to_string()))
    }

    fn identities(&self, doc: &Document) -> Vec<(NodeId, ScriptIdentity)> {
        doc.query_selector_all(&self.selector())
            .into_iter()
            .filter_map(|id| self.identity(doc, id).map(|ident| (id, ident)))
            .collect()
    }

    /// Run the dynamic scripts already on `doc` through `host`
    ///
    /// For hosts that did not load the page themselves. Inline scripts get
    /// the same guard as fresh ones, so a later visit does not rerun them.
    /// Returns the number of scripts started.
    pub fn run_existing(&self, doc: &Document, host: &mut dyn ScriptHost) -> usize {
        let mut started = 0;
        for (id, identity) in self.identities(doc) {
            match identity {
                ScriptIdentity::External(url) => match Url::parse(&url) {
                    Ok(parsed) => host.load_external(&parsed),
                    Err(e) => {
                        tracing::warn!("Cannot load script {}: {}", url, e);
                        continue;
                    }
                },
                ScriptIdentity::Inline(script_id) => {
                    let wrapped = guard_script(&script_id, &doc.tree().text_content(id));
                    host.execute_inline(&script_id, &wrapped);
                }
            }
            started += 1;
        }
        started
    }

    /// Identities of the dynamic scripts currently on `doc`
    pub fn snapshot(&self, doc: &Document) -> HashSet<ScriptIdentity> {
        self.identities(doc).into_iter().map(|(_, ident)| ident).collect()
    }

    /// Bring the live document's dynamic scripts in line with `incoming`
    pub fn reconcile(&self, live: &mut Document, incoming: &Document, host: &mut dyn ScriptHost) -> ReconcileStats {
        let prior = self.snapshot(live);
        self.reconcile_with(live, incoming, &prior, host)
    }

    /// Reconcile after markup was copied into `live`
    ///
    /// Only identities in `prior` count as already running. Copied script
    /// elements are inert, so a script whose identity is missing from
    /// `prior` is built fresh even when a copy of it is already on the page.
    pub fn reconcile_with(
        &self,
        live: &mut Document,
        incoming: &Document,
        prior: &HashSet<ScriptIdentity>,
        host: &mut dyn ScriptHost,
    ) -> ReconcileStats {
        let current = self.identities(live);
        let wanted = self.identities(incoming);
        let wanted_set: HashSet<&ScriptIdentity> = wanted.iter().map(|(_, i)| i).collect();

        let mut removed = 0;
        let mut present: HashSet<ScriptIdentity> = HashSet::new();
        for (id, identity) in current {
            if !wanted_set.contains(&identity) {
                live.tree_mut().remove(id);
                removed += 1;
            } else if prior.contains(&identity) {
                present.insert(identity);
            }
        }

        let mut added = 0;
        for (src_id, identity) in wanted {
            if !present.insert(identity.clone()) {
                continue;
            }

            let in_head = incoming.tree().parent(src_id) == Some(incoming.head());
            let parent = if in_head { live.head() } else { live.body() };
            if !parent.is_valid() {
                tracing::warn!("No <{}> to place script {:?}", if in_head { "head" } else { "body" }, identity);
                continue;
            }

            let mut elem = ElementData::new("script");
            elem.set_attr(&self.marker, "true");
            match &identity {
                ScriptIdentity::External(url) => {
                    elem.set_attr("src", url.as_str());
                    elem.set_attr("async", "");
                    let node = live.tree_mut().create_element_with(elem);
                    live.tree_mut().append_child(parent, node);

                    match Url::parse(url) {
                        Ok(parsed) => host.load_external(&parsed),
                        Err(e) => tracing::warn!("Cannot load script {}: {}", url, e),
                    }
                }
                ScriptIdentity::Inline(script_id) => {
                    let wrapped = guard_script(script_id, &incoming.tree().text_content(src_id));
                    elem.set_attr(&self.id_attr, script_id.as_str());
                    let node = live.tree_mut().create_element_with(elem);
                    live.tree_mut().append_child(parent, node);
                    live.tree_mut().set_text_content(node, &wrapped);

                    host.execute_inline(script_id, &wrapped);
                }
            }
            added += 1;
        }

        tracing::debug!("Reconciled scripts: +{} -{}", added, removed);
        ReconcileStats { added, removed }
    }
}
