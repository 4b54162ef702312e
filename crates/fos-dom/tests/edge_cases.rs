//! Edge case tests for fos-dom
//!
//! Arena reuse, cross-tree copies and structural equality.

use fos_dom::*;

fn element(tree: &mut DomTree, parent: NodeId, name: &str, attrs: &[(&str, &str)]) -> NodeId {
    let mut data = ElementData::new(name);
    for (k, v) in attrs {
        data.set_attr(k, *v);
    }
    let id = tree.create_element_with(data);
    tree.append_child(parent, id);
    id
}

// ============================================================================
// ARENA
// ============================================================================

#[test]
fn test_removed_slots_are_reused() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let list = element(&mut tree, root, "ul", &[]);
    for _ in 0..4 {
        element(&mut tree, list, "li", &[]);
    }
    let size = tree.len();

    for _ in 0..10 {
        tree.clear_children(list);
        for _ in 0..4 {
            element(&mut tree, list, "li", &[]);
        }
    }
    assert_eq!(tree.len(), size);
    assert_eq!(tree.children(list).count(), 4);
}

#[test]
fn test_removed_node_is_gone() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = element(&mut tree, root, "div", &[]);
    let span = element(&mut tree, div, "span", &[]);

    tree.remove(div);
    assert!(tree.get(div).is_none());
    assert!(tree.get(span).is_none());
    assert_eq!(tree.children(root).count(), 0);

    // Removing twice or removing the root is a no-op
    tree.remove(div);
    tree.remove(root);
    assert!(tree.get(root).is_some());
}

#[test]
fn test_append_moves_node() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = element(&mut tree, root, "div", &[]);
    let b = element(&mut tree, root, "div", &[]);
    let child = element(&mut tree, a, "p", &[]);

    tree.append_child(b, child);
    assert_eq!(tree.children(a).count(), 0);
    assert_eq!(tree.parent(child), Some(b));
}

// ============================================================================
// EQUALITY AND COPIES
// ============================================================================

#[test]
fn test_equality_across_trees() {
    let mut left = DomTree::new();
    let mut right = DomTree::new();
    let (lr, rr) = (left.root(), right.root());

    let l = element(&mut left, lr, "link", &[("rel", "stylesheet"), ("href", "/a.css")]);
    let r = element(&mut right, rr, "link", &[("href", "/a.css"), ("rel", "stylesheet")]);
    assert!(left.is_equal_node(l, &right, r));

    right.element_mut(r).unwrap().set_attr("href", "/b.css");
    assert!(!left.is_equal_node(l, &right, r));
}

#[test]
fn test_equality_checks_children() {
    let mut left = DomTree::new();
    let mut right = DomTree::new();
    let (lr, rr) = (left.root(), right.root());

    let l = element(&mut left, lr, "style", &[]);
    let text = left.create_text("a{}");
    left.append_child(l, text);

    let r = element(&mut right, rr, "style", &[]);
    assert!(!left.is_equal_node(l, &right, r));

    let text = right.create_text("a{}");
    right.append_child(r, text);
    assert!(left.is_equal_node(l, &right, r));
}

#[test]
fn test_import_is_independent() {
    let mut src = Document::default();
    let body = src.body();
    let p = element(src.tree_mut(), body, "p", &[("class", "lead")]);
    let text = src.tree_mut().create_text("hello");
    src.tree_mut().append_child(p, text);

    let mut dst = Document::default();
    let copy = dst.tree_mut().import(src.tree(), p);
    let dst_body = dst.body();
    dst.tree_mut().append_child(dst_body, copy);
    assert!(dst.tree().is_equal_node(copy, src.tree(), p));

    src.tree_mut().set_text_content(p, "changed");
    assert_eq!(dst.inner_html(dst_body), "<p class=\"lead\">hello</p>");
}

#[test]
fn test_document_clone_is_deep() {
    let mut original = Document::new("http://localhost/");
    original.set_title("One");
    let copy = original.clone();

    original.set_title("Two");
    assert_eq!(copy.title(), "One");
    assert_eq!(copy.url(), "http://localhost/");
}
