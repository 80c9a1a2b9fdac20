//! Marker attributes: how an index from a clickable report becomes
//! something a later action can find again.
//!
//! Applying markers stamps each collected node with its index. Lookup
//! searches the main document, then shadow trees and same-origin frames,
//! bounded so a pathological frame pyramid cannot hang the walk.

use std::collections::HashSet;

use chrono::Utc;
use pagesight_dom::{AttrWrite, DomWalker, NodeId, PageDom};
use tracing::debug;
use uuid::Uuid;

use crate::clickable::ClickMarker;

/// Attribute carrying a clickable index.
pub const DEFAULT_MARKER_ATTR: &str = "data-pagesight-click-id";

/// Attribute carrying a one-shot token for an editable element.
pub const EDITABLE_TOKEN_ATTR: &str = "data-pagesight-temp-id";

/// Shadow and frame nesting bound for marker lookup.
const MAX_SEARCH_DEPTH: u32 = 10;

/// Stamp every collected node with its index. Returns how many were
/// written.
pub fn apply_markers<D: AttrWrite>(dom: &D, markers: &[ClickMarker], attr: &str) -> usize {
    for m in markers {
        dom.set_attr(m.node, attr, &m.index.to_string());
    }
    debug!(count = markers.len(), attr, "click markers applied");
    markers.len()
}

/// Remove every marker attribute in the light tree, the set an attribute
/// selector reaches. Returns how many were removed.
pub fn clear_markers<D: PageDom + AttrWrite>(dom: &D, attr: &str) -> usize {
    let hits: Vec<NodeId> =
        DomWalker::light_tree(dom).map(|s| s.node).filter(|&n| dom.attr(n, attr).is_some()).collect();
    for &id in &hits {
        dom.remove_attr(id, attr);
    }
    debug!(count = hits.len(), attr, "click markers cleared");
    hits.len()
}

/// Find the node carrying `index`, searching shadow trees and nested
/// documents up to the depth bound.
pub fn find_by_marker<D: PageDom>(dom: &D, index: u64, attr: &str) -> Option<NodeId> {
    let target = index.to_string();
    let mut visited = HashSet::new();
    search_document(dom, dom.document(), &target, attr, 0, &mut visited)
}

fn search_document<D: PageDom>(
    dom: &D,
    doc: NodeId,
    target: &str,
    attr: &str,
    depth: u32,
    visited: &mut HashSet<NodeId>,
) -> Option<NodeId> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    if let Some(found) = walk_tree(dom, doc, target, attr, depth) {
        return Some(found);
    }
    let frames: Vec<NodeId> = DomWalker::subtree(dom, doc, false)
        .map(|s| s.node)
        .filter(|&n| {
            let d = dom.node(n);
            d.tag_is("iframe") || d.tag_is("frame")
        })
        .collect();
    for frame in frames {
        if !visited.insert(frame) {
            continue;
        }
        if let Some(child) = dom.content_document(frame) {
            if let Some(found) = search_document(dom, child, target, attr, depth + 1, visited) {
                return Some(found);
            }
        }
    }
    None
}

fn walk_tree<D: PageDom>(
    dom: &D,
    root: NodeId,
    target: &str,
    attr: &str,
    depth: u32,
) -> Option<NodeId> {
    if depth > MAX_SEARCH_DEPTH {
        return None;
    }
    for step in DomWalker::subtree(dom, root, false) {
        let id = step.node;
        if dom.attr(id, attr).as_deref() == Some(target) {
            return Some(id);
        }
        if let Some(shadow) = dom.shadow_root(id) {
            if let Some(found) = walk_tree(dom, shadow, target, attr, depth + 1) {
                return Some(found);
            }
        }
    }
    None
}

/// An editable element resolved under a point, paired with a fresh token
/// that can stamp it for a follow-up focus or fill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableHit {
    pub node: NodeId,
    pub token: String,
}

/// Hit test for something typeable: an input, a textarea, or a
/// contenteditable region. Anything else resolves to None.
pub fn editable_at_point<D: PageDom>(dom: &D, x: f64, y: f64) -> Option<EditableHit> {
    let id = dom.element_from_point(x, y)?;
    let data = dom.node(id);
    let editable =
        data.tag_is("input") || data.tag_is("textarea") || dom.is_content_editable(id);
    if !editable {
        return None;
    }
    Some(EditableHit { node: id, token: fresh_token() })
}

/// Write the hit's token to [`EDITABLE_TOKEN_ATTR`] so a selector can
/// reacquire the element.
pub fn tag_editable<D: AttrWrite>(dom: &D, hit: &EditableHit) {
    dom.set_attr(hit.node, EDITABLE_TOKEN_ATTR, &hit.token);
}

fn fresh_token() -> String {
    let rand = Uuid::new_v4().simple().to_string();
    format!("id-{}-{}", Utc::now().timestamp_millis(), &rand[..7])
}

#[cfg(test)]
#[path = "markers_tests.rs"]
mod tests;
