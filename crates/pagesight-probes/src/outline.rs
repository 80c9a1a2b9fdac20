//! Page outline: the filtered element tree a planner reads instead of raw
//! HTML.
//!
//! Elements survive the filter when they carry meaning on their own:
//! media, tables and headings always, text leaves, and named containers
//! whose subtree kept something. Anonymous wrappers collapse away unless
//! a surviving child needs them as structure.

use pagesight_dom::{NodeData, NodeId, PageDom, parse_float_prefix, round_half_up};
use serde::Serialize;
use tracing::debug;

/// Tags recorded regardless of text or children. Zero-size ones are still
/// dropped unless their attributes claim a drawable size.
const IMPORTANT_TAGS: &[&str] = &[
    "IMG", "SVG", "CANVAS", "VIDEO", "IFRAME", "TABLE", "TR", "TD", "TH", "H1", "H2", "H3",
    "H4", "H5", "H6",
];

/// One recorded element. Coordinates are rounded viewport pixels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineNode {
    pub tag: String,
    pub top: i32,
    pub bottom: i32,
    /// Bottom corrected for object-fit: cover images that render taller
    /// than their layout box.
    pub actual_bottom: i32,
    pub height: i32,
    pub width: i32,
    pub class_name: String,
    pub id: String,
    pub direct_text: String,
    pub depth: u32,
    /// Parent hint: its class, else its id, else its tag.
    pub parent: Option<String>,
    pub children: Vec<OutlineNode>,
}

/// The outline plus the page heights a planner pairs it with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineReport {
    /// Pre-order flattening of `tree`, subtrees included.
    pub elements: Vec<OutlineNode>,
    pub tree: Option<OutlineNode>,
    pub body_height: i32,
    pub html_height: i32,
    pub viewport_height: i32,
}

/// Build the outline for a page. A page without a body yields an empty
/// report.
pub fn build_outline<D: PageDom>(dom: &D) -> OutlineReport {
    let tree = dom.body().and_then(|body| finish_root(process_element(dom, body, None, 0)));
    let mut elements = Vec::new();
    if let Some(t) = &tree {
        flatten(t, &mut elements);
    }
    let report = OutlineReport {
        elements,
        tree,
        body_height: dom.body().map_or(0, |b| round_half_up(dom.node(b).rect.height)),
        html_height: dom
            .document_element()
            .map_or(0, |h| round_half_up(dom.node(h).rect.height)),
        viewport_height: round_half_up(dom.viewport().height),
    };
    debug!(elements = report.elements.len(), "page outline built");
    report
}

/// Unwrap the synthetic body wrapper: a single surviving child becomes the
/// root, several get a ROOT wrapper, none means no tree.
fn finish_root(root: Option<OutlineNode>) -> Option<OutlineNode> {
    let mut root = root?;
    if root.tag == "BODY" {
        match root.children.len() {
            0 => None,
            1 => Some(root.children.remove(0)),
            _ => Some(synthetic("ROOT", root.children)),
        }
    } else {
        Some(root)
    }
}

fn synthetic(tag: &str, children: Vec<OutlineNode>) -> OutlineNode {
    OutlineNode {
        tag: tag.to_string(),
        top: 0,
        bottom: 0,
        actual_bottom: 0,
        height: 0,
        width: 0,
        class_name: String::new(),
        id: String::new(),
        direct_text: String::new(),
        depth: 0,
        parent: None,
        children,
    }
}

fn process_element<D: PageDom>(
    dom: &D,
    el: NodeId,
    parent: Option<NodeId>,
    depth: u32,
) -> Option<OutlineNode> {
    let data = dom.node(el);
    let tag_upper = data.tag.to_ascii_uppercase();

    // html and body are containers, not content; their children sit at the
    // same depth.
    if tag_upper == "HTML" || tag_upper == "BODY" {
        let mut results = Vec::new();
        for &child in dom.children(el) {
            if let Some(node) = process_element(dom, child, Some(el), depth) {
                results.push(node);
            }
        }
        if results.is_empty() {
            return None;
        }
        return Some(synthetic("BODY", results));
    }

    let important = IMPORTANT_TAGS.contains(&tag_upper.as_str());
    if data.style.display_none() || (!has_valid_size(dom, el, &tag_upper) && !important) {
        return None;
    }

    let direct_text = dom.direct_text(el);
    let mut children = Vec::new();
    for &child in dom.children(el) {
        if let Some(node) = process_element(dom, child, Some(el), depth + 1) {
            children.push(node);
        }
    }

    let class_name = dom.class_name(el);
    let has_text = !direct_text.is_empty();
    let has_children = !children.is_empty();
    let has_class = !class_name.trim().is_empty();
    let should_record = important
        || (has_text && !has_children)
        || (!has_text && has_children && has_class);

    // Unrecorded nodes survive only as structure over surviving children.
    if !should_record && !has_children {
        return None;
    }

    let rect = data.rect;
    let actual_bottom =
        if tag_upper == "IMG" { rendered_image_bottom(data) } else { rect.bottom() };
    let direct_text = if tag_upper == "IMG" && direct_text.is_empty() {
        match dom.attr(el, "alt") {
            Some(alt) if !alt.is_empty() => alt,
            _ => "no alt".to_string(),
        }
    } else {
        direct_text
    };
    let parent_hint = parent.map(|p| {
        let class = dom.class_name(p);
        if !class.is_empty() {
            return class;
        }
        match dom.attr(p, "id") {
            Some(id) if !id.is_empty() => id,
            _ => dom.node(p).tag.clone(),
        }
    });

    Some(OutlineNode {
        tag: data.tag.clone(),
        top: round_half_up(rect.top()),
        bottom: round_half_up(rect.bottom()),
        actual_bottom: round_half_up(actual_bottom),
        height: round_half_up(rect.height),
        width: round_half_up(rect.width),
        class_name,
        id: dom.attr(el, "id").unwrap_or_default(),
        direct_text,
        depth,
        parent: parent_hint,
        children,
    })
}

/// Layout size, with an attribute fallback for svg and canvas which can
/// report a zero rect before paint. Width/height attributes take priority
/// over the viewBox when both are present.
fn has_valid_size<D: PageDom>(dom: &D, el: NodeId, tag_upper: &str) -> bool {
    let rect = dom.node(el).rect;
    if rect.width > 0.0 && rect.height > 0.0 {
        return true;
    }
    if tag_upper != "SVG" && tag_upper != "CANVAS" {
        return false;
    }
    let attr_width = dom.attr(el, "width").filter(|v| !v.is_empty());
    let attr_height = dom.attr(el, "height").filter(|v| !v.is_empty());
    if let (Some(w), Some(h)) = (attr_width, attr_height) {
        return matches!(
            (parse_float_prefix(&w), parse_float_prefix(&h)),
            (Some(w), Some(h)) if w > 0.0 && h > 0.0
        );
    }
    if let Some(view_box) = dom.attr(el, "viewbox").filter(|v| !v.is_empty()) {
        let parts = split_dimension_list(&view_box);
        return parts.len() >= 4
            && parse_float_prefix(&parts[2]).is_some_and(|v| v > 0.0)
            && parse_float_prefix(&parts[3]).is_some_and(|v| v > 0.0);
    }
    false
}

/// Split on runs of whitespace and commas, keeping the boundary empties a
/// regex split would produce, so " 0 0 5 5" misparses the same way a page
/// script does.
fn split_dimension_list(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut cur = String::new();
    let mut prev_sep = false;
    for ch in s.chars() {
        if ch.is_whitespace() || ch == ',' {
            if !prev_sep {
                parts.push(std::mem::take(&mut cur));
                prev_sep = true;
            }
        } else {
            cur.push(ch);
            prev_sep = false;
        }
    }
    parts.push(cur);
    parts
}

/// Bottom edge an object-fit: cover image actually paints to. When the
/// image is taller than its box proportionally, the rendered height is
/// width over image ratio.
pub(crate) fn rendered_image_bottom(data: &NodeData) -> f64 {
    let rect = data.rect;
    if data.style.object_fit == "cover"
        && data.natural_width > 0.0
        && data.natural_height > 0.0
        && rect.width > 0.0
        && rect.height > 0.0
    {
        let image_ratio = data.natural_width / data.natural_height;
        let container_ratio = rect.width / rect.height;
        if image_ratio < container_ratio {
            return rect.top() + rect.width / image_ratio;
        }
    }
    rect.bottom()
}

fn flatten(node: &OutlineNode, out: &mut Vec<OutlineNode>) {
    out.push(node.clone());
    for child in &node.children {
        flatten(child, out);
    }
}

#[cfg(test)]
#[path = "outline_tests.rs"]
mod tests;
