//! Whole-page measurements: document extent, content past a fold line,
//! and canvas occlusion.

use pagesight_dom::{DomWalker, NodeId, PageDom};
use serde::Serialize;
use tracing::debug;

use crate::outline::rendered_image_bottom;

const CONTENT_TAGS: &[&str] =
    &["H1", "H2", "H3", "H4", "H5", "H6", "P", "SPAN", "STRONG", "EM", "I", "B"];

const IMPORTANT_TAGS: &[&str] =
    &["IMG", "SVG", "CANVAS", "VIDEO", "IFRAME", "TABLE", "TR", "TD", "TH"];

/// Full document extent, the larger of what body and html report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageMetrics {
    pub width: f64,
    pub height: f64,
}

/// Measure the document. A missing body or root contributes nothing, so
/// a bare frame document measures zero.
pub fn page_metrics<D: PageDom>(dom: &D) -> PageMetrics {
    let body = dom.body().map(|id| dom.node(id));
    let html = dom.document_element().map(|id| dom.node(id));
    let width = [
        body.map(|b| b.scroll_width),
        body.map(|b| b.offset_width),
        body.map(|b| b.client_width),
        html.map(|h| h.scroll_width),
    ]
    .into_iter()
    .flatten()
    .fold(0.0, f64::max);
    let height = [
        body.map(|b| b.scroll_height),
        body.map(|b| b.offset_height),
        body.map(|b| b.client_height),
        html.map(|h| h.scroll_height),
    ]
    .into_iter()
    .flatten()
    .fold(0.0, f64::max);
    debug!(width, height, "page size measured");
    PageMetrics { width, height }
}

/// Whether meaningful content sits at or below `threshold` page pixels.
///
/// Content means an element with its own text, a text-level tag, or one
/// of the media and table tags. Anonymous layout wrappers do not count,
/// so an empty spacer stretching past the fold reports nothing. The fold
/// test runs on the layout box; cover images only refine how far past it
/// their pixels reach.
pub fn content_below<D: PageDom>(dom: &D, threshold: f64) -> bool {
    let Some(body) = dom.body() else {
        return false;
    };
    for step in DomWalker::subtree(dom, body, false) {
        let data = dom.node(step.node);
        if data.tag == "HTML" || data.tag == "BODY" {
            continue;
        }
        if data.style.display_none() || data.style.visibility == "hidden" {
            continue;
        }
        let rect = data.rect;
        if rect.height <= 0.0 || rect.width <= 0.0 || rect.bottom() < threshold {
            continue;
        }
        let has_direct_text = !data.direct_text().is_empty();
        let is_content = CONTENT_TAGS.contains(&data.tag.as_str());
        let is_important = IMPORTANT_TAGS.contains(&data.tag.as_str());
        let bottom = if data.tag == "IMG" { rendered_image_bottom(data) } else { rect.bottom() };
        if (has_direct_text || is_content || is_important) && bottom >= threshold {
            return true;
        }
    }
    false
}

/// Canvas occlusion check for a prospective click target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CanvasHit {
    pub has_canvas: bool,
    pub intersects_target: bool,
}

/// Whether any canvas exists on the page and whether the target's center
/// lands inside one. Canvas apps swallow clicks meant for what they draw,
/// so a hit here routes the click through raw coordinates instead.
pub fn canvas_hit<D: PageDom>(dom: &D, target: NodeId) -> CanvasHit {
    let (cx, cy) = dom.node(target).rect.center();
    let mut has_canvas = false;
    let mut intersects_target = false;
    for step in DomWalker::light_tree(dom) {
        let data = dom.node(step.node);
        if !data.tag_is("canvas") {
            continue;
        }
        has_canvas = true;
        let r = data.rect;
        if cx >= r.left() && cx <= r.right() && cy >= r.top() && cy <= r.bottom() {
            intersects_target = true;
            break;
        }
    }
    CanvasHit { has_canvas, intersects_target }
}

#[cfg(test)]
#[path = "survey_tests.rs"]
mod tests;
