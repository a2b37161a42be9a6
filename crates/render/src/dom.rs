//! Thin helpers over the kuchiki tree for fragment-level work.
//!
//! Fragments arrive as bare region markup, not full documents; kuchiki
//! always parses into an `<html><body>` wrapper, so most operations here
//! are "parse, work on the body, serialize the body's children back out".

use kuchiki::traits::TendrilSink;
use kuchiki::NodeRef;

/// Parse markup into a document tree. html5ever recovers from arbitrarily
/// malformed input, so this cannot fail.
pub fn parse_document(html: &str) -> NodeRef {
    kuchiki::parse_html().one(html)
}

/// The `<body>` node of a parsed document.
pub fn body(doc: &NodeRef) -> Option<NodeRef> {
    doc.select_first("body")
        .ok()
        .map(|body| body.as_node().clone())
}

/// Serialize a single node, including the node itself.
pub fn serialize_node(node: &NodeRef) -> String {
    let mut out = Vec::new();
    if node.serialize(&mut out).is_err() {
        return String::new();
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Serialize the children of a node, i.e. its inner HTML.
pub fn inner_html(node: &NodeRef) -> String {
    node.children().map(|child| serialize_node(&child)).collect()
}

/// Parse a trusted markup snippet and return its top-level nodes, detached
/// from the wrapper document.
pub fn snippet_nodes(html: &str) -> Vec<NodeRef> {
    let doc = parse_document(html);
    let Some(body) = body(&doc) else {
        return Vec::new();
    };
    let nodes: Vec<NodeRef> = body.children().collect();
    for node in &nodes {
        node.detach();
    }
    nodes
}

/// Serialize a parsed fragment document back to region markup.
///
/// The parser hoists leading `<style>`/`<script>` nodes into the `<head>`
/// wrapper; those belong to the fragment and are emitted first.
pub fn fragment_html(doc: &NodeRef) -> String {
    let mut html = String::new();
    if let Ok(head) = doc.select_first("head") {
        html.push_str(&inner_html(head.as_node()));
    }
    if let Some(body) = body(doc) {
        html.push_str(&inner_html(&body));
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_fragment_round_trip() {
        let doc = parse_document(r#"<div class="hero"><p>Hi</p></div>"#);
        assert_eq!(fragment_html(&doc), r#"<div class="hero"><p>Hi</p></div>"#);
    }

    #[test]
    fn test_malformed_markup_recovers() {
        let doc = parse_document("<div><p>unclosed");
        let html = fragment_html(&doc);
        assert!(html.contains("unclosed"));
    }

    #[test]
    fn test_snippet_nodes() {
        let nodes = snippet_nodes("<span>a</span><span>b</span>");
        assert_eq!(nodes.len(), 2);
        assert_eq!(serialize_node(&nodes[0]), "<span>a</span>");
    }

    #[test]
    fn test_empty_input() {
        let doc = parse_document("");
        assert_eq!(fragment_html(&doc), "");
        assert!(snippet_nodes("").is_empty());
    }
}
