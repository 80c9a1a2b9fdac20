use super::*;
use pagesight_dom::{ElementSpec, PageBuilder};

use crate::clickable::{CollectOptions, collect_clickables};

#[test]
fn test_apply_then_find_round_trip() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let link = b.append(body, ElementSpec::new("A").rect(0.0, 0.0, 80.0, 20.0).text("Home"));
    let button = b.append(body, ElementSpec::new("BUTTON").rect(0.0, 30.0, 120.0, 32.0).text("Go"));
    let dom = b.finish();

    let report = collect_clickables(&dom, &CollectOptions::default());
    let written = apply_markers(&dom, &report.markers, DEFAULT_MARKER_ATTR);
    assert_eq!(written, 2);
    assert_eq!(dom.attr(link, DEFAULT_MARKER_ATTR).as_deref(), Some("0"));

    assert_eq!(find_by_marker(&dom, 0, DEFAULT_MARKER_ATTR), Some(link));
    assert_eq!(find_by_marker(&dom, 1, DEFAULT_MARKER_ATTR), Some(button));
    assert_eq!(find_by_marker(&dom, 99, DEFAULT_MARKER_ATTR), None);
}

#[test]
fn test_find_descends_into_shadow_trees() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let host = b.append(body, ElementSpec::new("MY-CARD").rect(0.0, 0.0, 200.0, 100.0));
    let shadow = b.attach_shadow(host);
    let inner = b.append(shadow, ElementSpec::new("BUTTON").rect(0.0, 0.0, 90.0, 30.0).text("More"));
    let dom = b.finish();

    apply_markers(&dom, &[ClickMarker { node: inner, index: 7 }], DEFAULT_MARKER_ATTR);
    assert_eq!(find_by_marker(&dom, 7, DEFAULT_MARKER_ATTR), Some(inner));
}

#[test]
fn test_find_descends_into_frame_documents() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let frame = b.append(body, ElementSpec::new("IFRAME").rect(0.0, 0.0, 600.0, 400.0));
    let frame_doc = b.attach_document(frame);
    let inner = b.append(
        frame_doc,
        ElementSpec::new("A").rect(10.0, 10.0, 80.0, 20.0).attr(DEFAULT_MARKER_ATTR, "3"),
    );
    let dom = b.finish();

    assert_eq!(find_by_marker(&dom, 3, DEFAULT_MARKER_ATTR), Some(inner));
}

#[test]
fn test_clear_sweeps_what_a_selector_reaches() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let link =
        b.append(body, ElementSpec::new("A").rect(0.0, 0.0, 80.0, 20.0).attr(DEFAULT_MARKER_ATTR, "0"));
    let host = b.append(body, ElementSpec::new("MY-CARD").rect(0.0, 30.0, 200.0, 100.0));
    let shadow = b.attach_shadow(host);
    let inner = b.append(
        shadow,
        ElementSpec::new("BUTTON").rect(0.0, 30.0, 90.0, 30.0).attr(DEFAULT_MARKER_ATTR, "1"),
    );
    let dom = b.finish();

    let removed = clear_markers(&dom, DEFAULT_MARKER_ATTR);
    assert_eq!(removed, 1);
    assert_eq!(dom.attr(link, DEFAULT_MARKER_ATTR), None);
    // Shadow content sits outside the attribute-selector sweep.
    assert_eq!(dom.attr(inner, DEFAULT_MARKER_ATTR).as_deref(), Some("1"));
    assert_eq!(find_by_marker(&dom, 0, DEFAULT_MARKER_ATTR), None);
    assert_eq!(find_by_marker(&dom, 1, DEFAULT_MARKER_ATTR), Some(inner));
}

#[test]
fn test_lookup_depth_is_bounded() {
    let mut b = PageBuilder::new();
    let mut parent = b.body();
    let mut docs = Vec::new();
    for _ in 0..12 {
        let frame = b.append(parent, ElementSpec::new("IFRAME").rect(0.0, 0.0, 400.0, 300.0));
        let doc = b.attach_document(frame);
        docs.push(doc);
        parent = doc;
    }
    b.append(docs[1], ElementSpec::new("DIV").attr(DEFAULT_MARKER_ATTR, "6"));
    b.append(docs[11], ElementSpec::new("DIV").attr(DEFAULT_MARKER_ATTR, "5"));
    let dom = b.finish();

    assert!(find_by_marker(&dom, 6, DEFAULT_MARKER_ATTR).is_some());
    assert_eq!(find_by_marker(&dom, 5, DEFAULT_MARKER_ATTR), None);
}

#[test]
fn test_editable_hit_testing() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let input = b.append(body, ElementSpec::new("INPUT").rect(0.0, 0.0, 200.0, 30.0));
    b.append(body, ElementSpec::new("DIV").rect(0.0, 40.0, 200.0, 30.0).text("prose"));
    let editor = b.append(
        body,
        ElementSpec::new("DIV").rect(0.0, 80.0, 400.0, 200.0).attr("contenteditable", "true"),
    );
    let line = b.append(editor, ElementSpec::new("P").rect(10.0, 90.0, 380.0, 24.0).text("draft"));
    let dom = b.finish();

    let hit = editable_at_point(&dom, 100.0, 15.0).unwrap();
    assert_eq!(hit.node, input);

    assert_eq!(editable_at_point(&dom, 100.0, 55.0), None);

    // Inherited editability follows the hit down to the child.
    let hit = editable_at_point(&dom, 100.0, 100.0).unwrap();
    assert_eq!(hit.node, line);

    assert_eq!(editable_at_point(&dom, 900.0, 600.0), None);
}

#[test]
fn test_editable_tokens_are_stamped() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let input = b.append(body, ElementSpec::new("INPUT").rect(0.0, 0.0, 200.0, 30.0));
    let dom = b.finish();

    let hit = editable_at_point(&dom, 50.0, 10.0).unwrap();
    assert!(hit.token.starts_with("id-"));
    assert_eq!(hit.token.split('-').count(), 3);

    tag_editable(&dom, &hit);
    assert_eq!(dom.attr(input, EDITABLE_TOKEN_ATTR), Some(hit.token.clone()));

    let second = editable_at_point(&dom, 50.0, 10.0).unwrap();
    assert_ne!(second.token, hit.token);
}
