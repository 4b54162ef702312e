//! Edge case tests for fos-html
//!
//! Page shapes the navigator receives from servers: full documents,
//! content-only fragments, malformed markup and head resources.

use fos_html::{HtmlParser, Document};
use fos_dom::SimpleSelector;

fn app_html(doc: &Document) -> String {
    let app = doc.get_element_by_id("app").expect("missing #app");
    doc.inner_html(app)
}

// ============================================================================
// EMPTY AND MINIMAL INPUT
// ============================================================================

#[test]
fn test_parse_empty_has_skeleton() {
    let doc = HtmlParser::new().parse("");
    assert!(doc.document_element().is_valid());
    assert!(doc.head().is_valid());
    assert!(doc.body().is_valid());
    assert_eq!(doc.title(), "");
}

#[test]
fn test_parse_only_doctype() {
    let doc = HtmlParser::new().parse("<!DOCTYPE html>");
    assert!(doc.to_html().starts_with("<!DOCTYPE html>"));
}

#[test]
fn test_parse_null_bytes() {
    let doc = HtmlParser::new().parse("Hello\0World");
    assert!(doc.tree().text_content(doc.body()).starts_with("Hello"));
}

// ============================================================================
// MALFORMED HTML
// ============================================================================

#[test]
fn test_parse_unclosed_tags() {
    let doc = HtmlParser::new().parse("<div id=\"app\"><p><span>text");
    assert_eq!(app_html(&doc), "<p><span>text</span></p>");
}

#[test]
fn test_parse_mismatched_tags() {
    let doc = HtmlParser::new().parse("<div id=\"app\"><b><i>x</b></i></div>");
    assert!(app_html(&doc).starts_with("<b><i>x</i></b>"));
}

// ============================================================================
// PAGE STRUCTURE
// ============================================================================

#[test]
fn test_parse_full_page() {
    let html = r#"<!DOCTYPE html>
        <html>
            <head>
                <title>About us</title>
                <link rel="stylesheet" href="/shell.css">
                <link data-dynamic rel="stylesheet" href="/about.css">
                <style data-dynamic>.team { color: red; }</style>
            </head>
            <body>
                <nav><a href="/">Home</a></nav>
                <div id="app"><h1>About</h1><p>We build things.</p></div>
                <script data-dynamic src="/about.js"></script>
            </body>
        </html>"#;
    let doc = HtmlParser::new().parse_with_url(html, "http://localhost/about");

    assert_eq!(doc.title(), "About us");
    assert_eq!(app_html(&doc), "<h1>About</h1><p>We build things.</p>");
    assert_eq!(doc.query_selector_all(&SimpleSelector::Tag("link".into())).len(), 2);
    assert_eq!(doc.query_selector_all(&SimpleSelector::tagged("link", "data-dynamic")).len(), 1);

    let style = doc.query_selector(&SimpleSelector::tagged("style", "data-dynamic")).unwrap();
    assert_eq!(doc.tree().text_content(style), ".team { color: red; }");

    let script = doc.query_selector(&SimpleSelector::tagged("script", "data-dynamic")).unwrap();
    assert_eq!(doc.tree().parent(script), Some(doc.body()));
}

#[test]
fn test_parse_content_fragment_response() {
    // Servers may answer navigation requests with the content fragment only
    let doc = HtmlParser::new().parse("<title>Blog</title><div id=\"app\"><ul><li>post</li></ul></div>");
    assert_eq!(doc.title(), "Blog");
    assert_eq!(app_html(&doc), "<ul><li>post</li></ul>");
}

#[test]
fn test_parse_entities_round_trip() {
    let doc = HtmlParser::new().parse("<div id=\"app\">a &amp; b &lt;c&gt; &copy;</div>");
    assert_eq!(app_html(&doc), "a &amp; b &lt;c&gt; \u{a9}");
}

#[test]
fn test_parse_script_text_untouched() {
    let html = "<script data-dynamic>if (a < b && c > d) { run(); }</script>";
    let doc = HtmlParser::new().parse(html);
    let script = doc.query_selector(&SimpleSelector::Tag("script".into())).unwrap();
    assert_eq!(doc.tree().text_content(script), "if (a < b && c > d) { run(); }");
}

#[test]
fn test_parse_template_contents() {
    let doc = HtmlParser::new().parse("<div id=\"app\"><template><p>row</p></template></div>");
    assert_eq!(app_html(&doc), "<template><p>row</p></template>");
}

#[test]
fn test_parse_attribute_forms() {
    let html = r#"<div id="app"><a href=/x download target="_blank" data-x='y'>x</a></div>"#;
    let doc = HtmlParser::new().parse(html);
    let a = doc.query_selector(&SimpleSelector::Tag("a".into())).unwrap();
    assert_eq!(doc.attr(a, "href"), Some("/x"));
    assert_eq!(doc.attr(a, "download"), Some(""));
    assert_eq!(doc.attr(a, "target"), Some("_blank"));
    assert_eq!(doc.attr(a, "data-x"), Some("y"));
}

#[test]
fn test_parse_deeply_nested() {
    let depth = 200;
    let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
    let doc = HtmlParser::new().parse(&html);
    assert_eq!(doc.tree().descendants(doc.body()).count(), depth + 1);
}
