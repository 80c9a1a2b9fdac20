use super::*;
use crate::page::PageDom;

fn load(json: &str) -> MemoryDom {
    MemoryDom::from_json(json).unwrap()
}

#[test]
fn test_load_minimal_page() {
    let dom = load(
        r#"{
            "url": "https://example.test/",
            "title": "Example",
            "viewport": {"width": 1024, "height": 768},
            "root": {
                "tag": "HTML",
                "children": [
                    {
                        "tag": "BODY",
                        "rect": {"x": 0, "y": 0, "width": 1024, "height": 768},
                        "children": [
                            {
                                "tag": "DIV",
                                "attributes": {"id": "greeting"},
                                "rect": {"x": 10, "y": 20, "width": 200, "height": 40},
                                "text": ["hello"]
                            }
                        ]
                    }
                ]
            }
        }"#,
    );

    assert_eq!(dom.title(), "Example");
    assert_eq!(dom.url(), "https://example.test/");
    assert_eq!(dom.viewport().width, 1024.0);
    assert_eq!(dom.viewport().device_pixel_ratio, 1.0);

    let body = dom.body().unwrap();
    let div = dom.children(body)[0];
    assert_eq!(dom.node(div).tag, "DIV");
    assert_eq!(dom.attr(div, "id").as_deref(), Some("greeting"));
    assert_eq!(dom.node(div).rect.y, 20.0);
    assert_eq!(dom.direct_text(div), "hello");
    // Unstated style fields default to a visible block.
    assert_eq!(dom.node(div).style.display, "block");
}

#[test]
fn test_geometry_defaults_derive_from_rect() {
    let dom = load(
        r#"{
            "root": {"tag": "html", "children": [{"tag": "body", "children": [
                {"tag": "DIV", "rect": {"x": 0, "y": 0, "width": 300, "height": 150},
                 "scrollHeight": 900}
            ]}]}
        }"#,
    );
    let div = dom.children(dom.body().unwrap())[0];
    let data = dom.node(div);
    assert_eq!(data.client_width, 300.0);
    assert_eq!(data.client_height, 150.0);
    assert_eq!(data.scroll_width, 300.0);
    assert_eq!(data.scroll_height, 900.0);
}

#[test]
fn test_svg_class_name_object_resolves() {
    let dom = load(
        r#"{
            "root": {"tag": "HTML", "children": [{"tag": "BODY", "children": [
                {"tag": "svg", "className": {"baseVal": "icon chart"}},
                {"tag": "DIV", "className": "plain"},
                {"tag": "P", "attributes": {"class": "wins"}, "className": "loses"}
            ]}]}
        }"#,
    );
    let body = dom.body().unwrap();
    let kids = dom.children(body);
    assert_eq!(dom.class_name(kids[0]), "icon chart");
    assert_eq!(dom.class_name(kids[1]), "plain");
    assert_eq!(dom.class_name(kids[2]), "wins");
}

#[test]
fn test_shadow_root_and_content_document_load() {
    let dom = load(
        r#"{
            "root": {"tag": "HTML", "children": [{"tag": "BODY", "children": [
                {"tag": "MY-WIDGET", "shadowRoot": [{"tag": "BUTTON", "attributes": {"id": "sb"}}]},
                {"tag": "IFRAME", "contentDocument": {"tag": "HTML", "children": [
                    {"tag": "BODY", "children": [{"tag": "DIV", "attributes": {"id": "framed"}}]}
                ]}}
            ]}]}
        }"#,
    );
    let body = dom.body().unwrap();
    let host = dom.children(body)[0];
    let shadow = dom.shadow_root(host).unwrap();
    let button = dom.children(shadow)[0];
    assert_eq!(dom.attr(button, "id").as_deref(), Some("sb"));
    assert_eq!(dom.shadow_host(shadow), Some(host));

    let frame = dom.children(body)[1];
    let doc = dom.content_document(frame).unwrap();
    let framed_html = dom.children(doc)[0];
    assert_eq!(dom.node(framed_html).tag, "HTML");
}

#[test]
fn test_scrolling_element_body() {
    let dom = load(
        r#"{
            "scrollingElement": "body",
            "root": {"tag": "HTML", "children": [{"tag": "BODY"}]}
        }"#,
    );
    assert_eq!(dom.scrolling_element(), dom.body());
}

#[test]
fn test_unknown_scrolling_element_rejected() {
    let err = MemoryDom::from_json(
        r#"{
            "scrollingElement": "main",
            "root": {"tag": "HTML", "children": [{"tag": "BODY"}]}
        }"#,
    )
    .unwrap_err();
    assert!(matches!(err, DomError::UnknownScrollingElement(name) if name == "main"));
}

#[test]
fn test_non_html_root_rejected() {
    let err = MemoryDom::from_json(r#"{"root": {"tag": "DIV"}}"#).unwrap_err();
    assert!(matches!(err, DomError::UnexpectedRoot(tag) if tag == "DIV"));
}

#[test]
fn test_page_without_body() {
    let dom = load(r#"{"root": {"tag": "HTML", "children": [{"tag": "HEAD"}]}}"#);
    assert!(dom.body().is_none());
    let html = dom.document_element().unwrap();
    assert_eq!(dom.node(dom.children(html)[0]).tag, "HEAD");
}

#[test]
fn test_parse_error_is_tagged() {
    let err = MemoryDom::from_json("{not json").unwrap_err();
    assert!(matches!(err, DomError::Parse(_)));
}
