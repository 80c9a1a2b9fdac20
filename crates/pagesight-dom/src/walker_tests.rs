use super::*;
use crate::memory::{ElementSpec, PageBuilder};

#[test]
fn test_full_tree_preorder() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let outer = b.append(body, ElementSpec::new("DIV").id("outer"));
    b.append(outer, ElementSpec::new("SPAN").id("inner"));
    b.append(body, ElementSpec::new("P").id("after"));
    let dom = b.finish();

    let ids: Vec<String> = DomWalker::full_tree(&dom)
        .map(|s| dom.attr(s.node, "id").unwrap_or_else(|| dom.node(s.node).tag.clone()))
        .collect();
    assert_eq!(ids, vec!["HTML", "BODY", "outer", "inner", "after"]);
}

#[test]
fn test_shadow_subtree_comes_before_light_children() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let host = b.append(body, ElementSpec::new("MY-WIDGET").id("host"));
    b.append(host, ElementSpec::new("SPAN").id("light-child"));
    let shadow = b.attach_shadow(host);
    let shadow_div = b.append(shadow, ElementSpec::new("DIV").id("shadow-child"));
    b.append(shadow_div, ElementSpec::new("BUTTON").id("shadow-grandchild"));
    let dom = b.finish();

    let steps: Vec<(String, bool)> = DomWalker::full_tree(&dom)
        .map(|s| {
            let label =
                dom.attr(s.node, "id").unwrap_or_else(|| dom.node(s.node).tag.clone());
            (label, s.entered_shadow)
        })
        .collect();
    assert_eq!(
        steps,
        vec![
            ("HTML".to_string(), false),
            ("BODY".to_string(), false),
            ("host".to_string(), false),
            ("shadow-child".to_string(), true),
            ("shadow-grandchild".to_string(), false),
            ("light-child".to_string(), false),
        ]
    );
}

#[test]
fn test_light_tree_skips_shadow_content() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let host = b.append(body, ElementSpec::new("MY-WIDGET"));
    let shadow = b.attach_shadow(host);
    b.append(shadow, ElementSpec::new("BUTTON").id("hidden-in-shadow"));
    let dom = b.finish();

    assert!(
        DomWalker::light_tree(&dom)
            .all(|s| dom.attr(s.node, "id").as_deref() != Some("hidden-in-shadow"))
    );
}

#[test]
fn test_walker_does_not_enter_nested_documents() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let frame = b.append(body, ElementSpec::new("IFRAME"));
    let doc = b.attach_document(frame);
    b.append(doc, ElementSpec::new("DIV").id("framed"));
    let dom = b.finish();

    assert!(
        DomWalker::full_tree(&dom).all(|s| dom.attr(s.node, "id").as_deref() != Some("framed"))
    );
}

#[test]
fn test_ancestor_chain_starts_at_node() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let outer = b.append(body, ElementSpec::new("DIV"));
    let inner = b.append(outer, ElementSpec::new("SPAN"));
    let dom = b.finish();

    let chain: Vec<NodeId> = AncestorChain::new(&dom, inner).map(|s| s.node).collect();
    assert_eq!(chain, vec![inner, outer, body, dom.document_element().unwrap()]);
}

#[test]
fn test_ancestor_chain_crosses_shadow_boundary_to_host() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let host = b.append(body, ElementSpec::new("MY-WIDGET"));
    let shadow = b.attach_shadow(host);
    let inner = b.append(shadow, ElementSpec::new("BUTTON"));
    let dom = b.finish();

    let steps: Vec<AncestorStep> = AncestorChain::new(&dom, inner).collect();
    assert_eq!(steps[0], AncestorStep { node: inner, crossed_shadow: false });
    assert_eq!(steps[1], AncestorStep { node: host, crossed_shadow: true });
    assert_eq!(steps[2].node, body);
    assert!(!steps[2].crossed_shadow);
}
