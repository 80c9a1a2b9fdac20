use super::*;
use pagesight_dom::{ElementSpec, PageBuilder};

#[test]
fn test_page_metrics_take_the_largest_report() {
    let mut b = PageBuilder::new();
    let html = b.html();
    let body = b.body();
    b.update(body, |d| {
        d.scroll_width = 1280.0;
        d.scroll_height = 1500.0;
    });
    b.update(html, |d| {
        d.scroll_width = 1280.0;
        d.scroll_height = 2200.0;
    });
    let dom = b.finish();

    let metrics = page_metrics(&dom);
    assert_eq!(metrics, PageMetrics { width: 1280.0, height: 2200.0 });
}

#[test]
fn test_page_metrics_without_a_body() {
    let mut b = PageBuilder::new();
    b.without_body();
    let dom = b.finish();

    // The root still reports its backfilled viewport extent.
    let metrics = page_metrics(&dom);
    assert_eq!(metrics, PageMetrics { width: 1280.0, height: 720.0 });
}

#[test]
fn test_content_below_ignores_layout_spacers() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("DIV").rect(0.0, 0.0, 800.0, 2600.0));
    let dom = b.finish();
    assert!(!content_below(&dom, 2000.0));

    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("DIV").rect(0.0, 0.0, 800.0, 2600.0));
    b.append(body, ElementSpec::new("P").rect(0.0, 2400.0, 200.0, 40.0).text("fine print"));
    let dom = b.finish();
    assert!(content_below(&dom, 2000.0));
    assert!(!content_below(&dom, 2500.0));
}

#[test]
fn test_content_below_skips_hidden_and_counts_bare_tags() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(
        body,
        ElementSpec::new("P")
            .rect(0.0, 2400.0, 200.0, 40.0)
            .text("hidden footnote")
            .style(|s| s.display = "none".to_string()),
    );
    let dom = b.finish();
    assert!(!content_below(&dom, 2000.0));

    // A text-level tag counts even with no text of its own.
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("SPAN").rect(0.0, 2400.0, 50.0, 20.0));
    let dom = b.finish();
    assert!(content_below(&dom, 2000.0));
}

#[test]
fn test_content_matching_is_tag_case_exact() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("svg").rect(0.0, 2400.0, 100.0, 80.0));
    let dom = b.finish();
    assert!(!content_below(&dom, 2000.0));

    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("IMG").rect(0.0, 2400.0, 100.0, 80.0));
    let dom = b.finish();
    assert!(content_below(&dom, 2000.0));
}

#[test]
fn test_content_below_gates_on_the_layout_box() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(
        body,
        ElementSpec::new("IMG")
            .rect(0.0, 1800.0, 300.0, 150.0)
            .natural_size(100.0, 200.0)
            .style(|s| s.object_fit = "cover".to_string()),
    );
    let dom = b.finish();

    // Layout bottom 1950, painted bottom 2400. The painted extent counts
    // once the layout box reaches the fold, and never before.
    assert!(content_below(&dom, 1900.0));
    assert!(!content_below(&dom, 2200.0));
}

#[test]
fn test_canvas_hit_uses_the_target_center() {
    let mut b = PageBuilder::new();
    let body = b.body();
    b.append(body, ElementSpec::new("CANVAS").rect(100.0, 100.0, 400.0, 300.0));
    let inside = b.append(body, ElementSpec::new("BUTTON").rect(230.0, 200.0, 100.0, 30.0));
    let outside = b.append(body, ElementSpec::new("BUTTON").rect(680.0, 100.0, 100.0, 30.0));
    let dom = b.finish();

    let hit = canvas_hit(&dom, inside);
    assert!(hit.has_canvas);
    assert!(hit.intersects_target);

    let hit = canvas_hit(&dom, outside);
    assert!(hit.has_canvas);
    assert!(!hit.intersects_target);
}

#[test]
fn test_canvas_absent() {
    let mut b = PageBuilder::new();
    let body = b.body();
    let button = b.append(body, ElementSpec::new("BUTTON").rect(10.0, 10.0, 100.0, 30.0));
    let dom = b.finish();

    let hit = canvas_hit(&dom, button);
    assert_eq!(hit, CanvasHit { has_canvas: false, intersects_target: false });

    let json = serde_json::to_value(hit).unwrap();
    assert_eq!(json["has_canvas"], false);
    assert_eq!(json["intersects_target"], false);
}
