//! HTML5 Parser implementation
//!
//! Uses html5ever's build-in RcDom and converts to our DOM format.
//! This is simpler and more reliable than implementing TreeSink directly.

use fos_dom::{Document, DomTree, ElementData, NodeId};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Elements whose whitespace-only text is significant
const PRESERVE_WHITESPACE: &[&str] = &["pre", "textarea", "script", "style"];

/// HTML5 parser
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new HTML parser
    pub fn new() -> Self {
        Self
    }

    /// Parse HTML string into a Document
    pub fn parse(&self, html: &str) -> Document {
        self.parse_with_url(html, "about:blank")
    }

    /// Parse HTML with a base URL
    pub fn parse_with_url(&self, html: &str, url: &str) -> Document {
        tracing::debug!("Parsing HTML document: {}", url);

        let dom = parse_document(RcDom::default(), Default::default()).one(html);

        let mut tree = DomTree::new();
        let root = tree.root();
        self.convert_children(&dom.document, &mut tree, root, false);

        let document = Document::from_tree(tree, url);
        tracing::debug!("Parsed {} nodes", document.tree().len());
        document
    }

    fn convert_children(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, keep_ws: bool) {
        for child in handle.children.borrow().iter() {
            self.convert_node(child, tree, parent, keep_ws);
        }
    }

    /// Convert an RcDom node to our DOM format
    fn convert_node(&self, handle: &Handle, tree: &mut DomTree, parent: NodeId, keep_ws: bool) {
        match &handle.data {
            RcNodeData::Document => {
                self.convert_children(handle, tree, parent, keep_ws);
            }
            RcNodeData::Doctype { name, public_id, system_id } => {
                let id = tree.create_doctype(name, public_id, system_id);
                tree.append_child(parent, id);
            }
            RcNodeData::Text { contents } => {
                let text = contents.borrow();
                if keep_ws || !text.trim().is_empty() {
                    let id = tree.create_text(&text);
                    tree.append_child(parent, id);
                }
            }
            RcNodeData::Comment { contents } => {
                let id = tree.create_comment(contents);
                tree.append_child(parent, id);
            }
            RcNodeData::Element { name, attrs, template_contents, .. } => {
                let mut elem = ElementData::new(&name.local);
                for attr in attrs.borrow().iter() {
                    let attr_name = match &attr.name.prefix {
                        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
                        None => attr.name.local.to_string(),
                    };
                    elem.set_attr(&attr_name, attr.value.to_string());
                }

                let keep_ws = keep_ws || PRESERVE_WHITESPACE.contains(&elem.name.as_str());
                let id = tree.create_element_with(elem);
                tree.append_child(parent, id);

                // <template> children live in a separate fragment
                if let Some(contents) = template_contents.borrow().as_ref() {
                    self.convert_children(contents, tree, id, keep_ws);
                }
                self.convert_children(handle, tree, id, keep_ws);
            }
            RcNodeData::ProcessingInstruction { .. } => {
                // Ignore processing instructions for now
            }
        }
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}
