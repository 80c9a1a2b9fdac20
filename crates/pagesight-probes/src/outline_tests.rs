use super::*;
use pagesight_dom::{ElementSpec, PageBuilder};

#[test]
fn test_text_leaf_becomes_the_tree_root() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(
        body,
        ElementSpec::new("DIV").class("card").rect(10.0, 20.0, 300.0, 100.0).text("Hello world"),
    );
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    assert_eq!(root.tag, "DIV");
    assert_eq!(root.top, 20);
    assert_eq!(root.bottom, 120);
    assert_eq!(root.width, 300);
    assert_eq!(root.height, 100);
    assert_eq!(root.class_name, "card");
    assert_eq!(root.direct_text, "Hello world");
    assert_eq!(root.depth, 0);
    assert_eq!(root.parent.as_deref(), Some("BODY"));
    assert_eq!(report.elements.len(), 1);
}

#[test]
fn test_display_none_drops_the_whole_subtree() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let hidden =
        b.append(body, ElementSpec::new("DIV").rect(0.0, 0.0, 400.0, 200.0).display("none"));
    b.append(hidden, ElementSpec::new("SPAN").rect(0.0, 0.0, 100.0, 20.0).text("invisible"));
    b.append(body, ElementSpec::new("P").rect(0.0, 200.0, 400.0, 20.0).text("shown"));
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    assert_eq!(root.tag, "P");
    assert!(report.elements.iter().all(|e| e.direct_text != "invisible"));
}

#[test]
fn test_zero_size_text_is_dropped() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("DIV").text("collapsed"));
    let report = build_outline(&b.finish());

    assert!(report.tree.is_none());
    assert!(report.elements.is_empty());
}

#[test]
fn test_media_recorded_even_at_zero_size() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("svg"));
    b.append(body, ElementSpec::new("IMG").attr("alt", "diagram"));
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    assert_eq!(root.tag, "ROOT");
    let tags: Vec<&str> = root.children.iter().map(|c| c.tag.as_str()).collect();
    assert_eq!(tags, ["svg", "IMG"]);
    assert_eq!(root.children[1].direct_text, "diagram");
    assert_eq!(report.elements.len(), 3);
}

#[test]
fn test_plain_wrapper_kept_only_over_surviving_children() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let wrap = b.append(body, ElementSpec::new("DIV").rect(0.0, 0.0, 600.0, 300.0));
    b.append(wrap, ElementSpec::new("P").rect(10.0, 10.0, 200.0, 30.0).text("inside"));
    b.append(body, ElementSpec::new("DIV").rect(0.0, 300.0, 600.0, 300.0));
    let report = build_outline(&b.finish());

    // The childless sibling vanished, so the wrapper is the single root.
    let root = report.tree.as_ref().unwrap();
    assert_eq!(root.tag, "DIV");
    assert_eq!(root.class_name, "");
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].tag, "P");
    assert_eq!(root.children[0].depth, 1);
    assert_eq!(root.children[0].parent.as_deref(), Some("DIV"));
}

#[test]
fn test_multiple_roots_get_a_synthetic_wrapper() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let nav = b.append(body, ElementSpec::new("DIV").class("nav").rect(0.0, 0.0, 1280.0, 60.0));
    b.append(nav, ElementSpec::new("SPAN").rect(10.0, 10.0, 50.0, 20.0).text("Home"));
    b.append(body, ElementSpec::new("P").rect(0.0, 80.0, 600.0, 30.0).text("Intro"));
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    assert_eq!(root.tag, "ROOT");
    assert_eq!(root.depth, 0);
    assert_eq!(root.children.len(), 2);

    // Flattening is pre-order over the whole tree.
    let tags: Vec<&str> = report.elements.iter().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, ["ROOT", "DIV", "SPAN", "P"]);
    assert_eq!(report.elements[1].depth, 0);
    assert_eq!(report.elements[2].depth, 1);
    assert_eq!(report.elements[2].parent.as_deref(), Some("nav"));
}

#[test]
fn test_cover_image_reports_painted_bottom() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(
        body,
        ElementSpec::new("IMG")
            .rect(0.0, 100.0, 300.0, 150.0)
            .natural_size(100.0, 200.0)
            .style(|s| s.object_fit = "cover".to_string())
            .attr("alt", "banner"),
    );
    b.append(body, ElementSpec::new("IMG").rect(0.0, 400.0, 300.0, 150.0).attr("alt", "plain"));
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    // 100x200 in a 300x150 box: rendered height is 300 / (100/200) = 600.
    assert_eq!(root.children[0].bottom, 250);
    assert_eq!(root.children[0].actual_bottom, 700);
    // Without cover the painted bottom is the layout bottom.
    assert_eq!(root.children[1].actual_bottom, 550);
}

#[test]
fn test_image_alt_fallback() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("IMG").rect(0.0, 0.0, 100.0, 80.0));
    b.append(body, ElementSpec::new("IMG").rect(0.0, 100.0, 100.0, 80.0).attr("alt", ""));
    b.append(body, ElementSpec::new("IMG").rect(0.0, 200.0, 100.0, 80.0).attr("alt", "Logo"));
    let report = build_outline(&b.finish());

    let root = report.tree.as_ref().unwrap();
    let texts: Vec<&str> = root.children.iter().map(|c| c.direct_text.as_str()).collect();
    assert_eq!(texts, ["no alt", "no alt", "Logo"]);
}

#[test]
fn test_attribute_size_fallback_for_unpainted_svg() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let sized = b.append(body, ElementSpec::new("svg").attr("width", "24").attr("height", "24"));
    let zeroed = b.append(
        body,
        ElementSpec::new("svg").attr("width", "0").attr("height", "24").attr("viewBox", "0 0 24 24"),
    );
    let boxed = b.append(body, ElementSpec::new("svg").attr("viewBox", "0 0 24 24"));
    let padded = b.append(body, ElementSpec::new("svg").attr("viewBox", " 0 0 24 24"));
    let div = b.append(body, ElementSpec::new("DIV").attr("width", "24").attr("height", "24"));
    let dom = b.finish();

    assert!(has_valid_size(&dom, sized, "SVG"));
    // A zero width attribute consumes the check; the viewBox is not consulted.
    assert!(!has_valid_size(&dom, zeroed, "SVG"));
    assert!(has_valid_size(&dom, boxed, "SVG"));
    // Leading whitespace shifts the split, losing the size slots.
    assert!(!has_valid_size(&dom, padded, "SVG"));
    // Attribute sizes only rescue svg and canvas.
    assert!(!has_valid_size(&dom, div, "DIV"));
}

#[test]
fn test_report_carries_page_heights() {
    let mut b = PageBuilder::new();
    let html = b.html();
    let body = b.body();
    b.update(html, |d| d.rect.height = 2400.0);
    b.append(body, ElementSpec::new("P").rect(0.0, 0.0, 100.0, 20.0).text("x"));
    let report = build_outline(&b.finish());

    assert_eq!(report.html_height, 2400);
    assert_eq!(report.body_height, 720);
    assert_eq!(report.viewport_height, 720);
}

#[test]
fn test_outline_serialization_shape() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("H1").rect(0.0, 0.0, 600.0, 40.0).text("Title"));
    let report = build_outline(&b.finish());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["tree"]["tag"], "H1");
    assert_eq!(json["tree"]["actualBottom"], 40);
    assert_eq!(json["tree"]["className"], "");
    assert_eq!(json["tree"]["directText"], "Title");
    assert!(json["tree"]["parent"].is_string());
    assert_eq!(json["bodyHeight"], 720);
    assert_eq!(json["viewportHeight"], 720);
}
