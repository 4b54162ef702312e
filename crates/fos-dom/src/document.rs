//! Document - High-level document API

use crate::{DomTree, HtmlSerializer, NodeId, SimpleSelector};

/// HTML Document
///
/// `Clone` produces a fully independent deep copy.
#[derive(Debug, Clone)]
pub struct Document {
    /// The DOM tree
    tree: DomTree,
    /// Document URL
    url: String,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <head> element
    head_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with an empty html/head/body skeleton
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();

        let html = tree.create_element("html");
        let head = tree.create_element("head");
        let body = tree.create_element("body");

        tree.append_child(tree.root(), html);
        tree.append_child(html, head);
        tree.append_child(html, body);

        Self {
            tree,
            url: url.to_string(),
            html_element: html,
            head_element: head,
            body_element: body,
        }
    }

    /// Wrap an already-built tree, locating html/head/body
    pub fn from_tree(tree: DomTree, url: &str) -> Self {
        let mut doc = Self {
            tree,
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
        };
        doc.finalize();
        doc
    }

    /// Re-resolve the cached html/head/body references
    pub fn finalize(&mut self) {
        self.html_element = self.tree.children(self.tree.root())
            .find(|(_, n)| n.as_element().is_some_and(|e| e.name == "html"))
            .map_or(NodeId::NONE, |(id, _)| id);

        let child_named = |name: &str| {
            self.tree.children(self.html_element)
                .find(|(_, n)| n.as_element().is_some_and(|e| e.name == name))
                .map_or(NodeId::NONE, |(id, _)| id)
        };
        let head = child_named("head");
        let body = child_named("body");
        self.head_element = head;
        self.body_element = body;

        tracing::trace!(
            url = %self.url,
            head = head.is_valid(),
            body = body.is_valid(),
            "document finalized"
        );
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Point the document at a new URL without reloading
    pub fn set_url(&mut self, url: &str) {
        self.url = url.to_string();
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    /// Get <head> element
    pub fn head(&self) -> NodeId {
        self.head_element
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// The first <title> element in document order
    fn title_element(&self) -> Option<NodeId> {
        self.query_selector(&SimpleSelector::Tag("title".into()))
    }

    /// Get document title
    pub fn title(&self) -> String {
        self.title_element()
            .map(|id| self.tree.text_content(id))
            .unwrap_or_default()
    }

    /// Whether the document has a <title> element
    pub fn has_title(&self) -> bool {
        self.title_element().is_some()
    }

    /// Set the document title, creating <title> in <head> when missing
    pub fn set_title(&mut self, title: &str) {
        let id = match self.title_element() {
            Some(id) => id,
            None => {
                if !self.head_element.is_valid() {
                    return;
                }
                let id = self.tree.create_element("title");
                self.tree.append_child(self.head_element, id);
                id
            }
        };
        self.tree.set_text_content(id, title);
    }

    /// All elements matching `selector`, in document order
    pub fn query_selector_all(&self, selector: &SimpleSelector) -> Vec<NodeId> {
        self.tree.descendants(self.tree.root())
            .filter(|(_, n)| n.as_element().is_some_and(|e| selector.matches(e)))
            .map(|(id, _)| id)
            .collect()
    }

    /// First element matching `selector`
    pub fn query_selector(&self, selector: &SimpleSelector) -> Option<NodeId> {
        self.tree.descendants(self.tree.root())
            .find(|(_, n)| n.as_element().is_some_and(|e| selector.matches(e)))
            .map(|(id, _)| id)
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_selector(&SimpleSelector::Id(id.to_string()))
    }

    /// Closest inclusive ancestor of `node` matching `selector`
    pub fn closest(&self, node: NodeId, selector: &SimpleSelector) -> Option<NodeId> {
        let mut current = node;
        while current.is_valid() {
            let n = self.tree.get(current)?;
            if n.as_element().is_some_and(|e| selector.matches(e)) {
                return Some(current);
            }
            current = n.parent;
        }
        None
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.element(id).map(|e| e.name.as_str())
    }

    /// Attribute value of an element
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree.element(id)?.get_attr(name)
    }

    /// Set an attribute on an element
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(elem) = self.tree.element_mut(id) {
            elem.set_attr(name, value);
        }
    }

    /// Replace the children of `target` with deep copies of the children of
    /// `src_node` in `src`
    pub fn replace_children_from(&mut self, target: NodeId, src: &Document, src_node: NodeId) {
        self.tree.clear_children(target);
        for (child, _) in src.tree.children(src_node) {
            let copy = self.tree.import(&src.tree, child);
            self.tree.append_child(target, copy);
        }
    }

    /// innerHTML of a node
    pub fn inner_html(&self, id: NodeId) -> String {
        HtmlSerializer::new().serialize_inner(&self.tree, id)
    }

    /// outerHTML of a node
    pub fn outer_html(&self, id: NodeId) -> String {
        HtmlSerializer::new().serialize_outer(&self.tree, id)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        HtmlSerializer::new().serialize_inner(&self.tree, self.tree.root())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new("https://example.com/");
        assert!(doc.head().is_valid());
        assert!(doc.body().is_valid());
        assert_eq!(doc.tag_name(doc.document_element()), Some("html"));
        assert_eq!(doc.title(), "");
        assert!(!doc.has_title());
    }

    #[test]
    fn test_set_title_creates_element() {
        let mut doc = Document::default();
        doc.set_title("About");
        assert!(doc.has_title());
        assert_eq!(doc.title(), "About");

        doc.set_title("Blog");
        assert_eq!(doc.title(), "Blog");
        assert_eq!(doc.query_selector_all(&SimpleSelector::Tag("title".into())).len(), 1);
    }

    #[test]
    fn test_closest_and_lookup() {
        let mut doc = Document::default();
        let body = doc.body();
        let tree = doc.tree_mut();
        let a = tree.create_element("a");
        let span = tree.create_element("span");
        tree.append_child(body, a);
        tree.append_child(a, span);
        doc.set_attr(a, "href", "/about");
        doc.set_attr(a, "id", "about-link");

        assert_eq!(doc.closest(span, &SimpleSelector::Tag("a".into())), Some(a));
        assert_eq!(doc.closest(span, &SimpleSelector::Tag("form".into())), None);
        assert_eq!(doc.get_element_by_id("about-link"), Some(a));
        assert_eq!(doc.attr(a, "href"), Some("/about"));
    }

    #[test]
    fn test_replace_children_from() {
        let mut live = Document::default();
        let mut incoming = Document::default();

        let live_body = live.body();
        let old = live.tree_mut().create_text("old");
        live.tree_mut().append_child(live_body, old);

        let incoming_body = incoming.body();
        let p = incoming.tree_mut().create_element("p");
        let text = incoming.tree_mut().create_text("new");
        incoming.tree_mut().append_child(incoming_body, p);
        incoming.tree_mut().append_child(p, text);

        live.replace_children_from(live_body, &incoming, incoming_body);
        assert_eq!(live.inner_html(live_body), "<p>new</p>");
        assert_eq!(live.inner_html(live_body), incoming.inner_html(incoming_body));
    }
}
