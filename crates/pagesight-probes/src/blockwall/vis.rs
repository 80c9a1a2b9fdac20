//! Visibility rules tuned for wall widgets.
//!
//! These differ from the clickable collector's rules on purpose: a wall
//! widget with one zero dimension can still block, and an off-viewport
//! widget cannot.

use pagesight_dom::{DomWalker, NodeId, PageDom};

/// Whether a wall element is actually shown. `min_size` rejects widgets
/// smaller than it in both dimensions; one large dimension is enough to
/// pass.
pub(super) fn is_element_visible<D: PageDom>(dom: &D, id: NodeId, min_size: f64) -> bool {
    let data = dom.node(id);
    let style = &data.style;
    if style.display_none() || style.visibility == "hidden" {
        return false;
    }
    let rect = data.rect;
    if rect.width == 0.0 && rect.height == 0.0 {
        return false;
    }
    if style.opacity_value() == Some(0.0) {
        return false;
    }
    if min_size > 0.0 && rect.width < min_size && rect.height < min_size {
        return false;
    }
    let vp = dom.viewport();
    if rect.bottom() < 0.0 || rect.top() > vp.height {
        return false;
    }
    if rect.right() < 0.0 || rect.left() > vp.width {
        return false;
    }
    true
}

/// Whether the element's center lands in the middle half of the viewport,
/// where it would sit on top of the page's main content.
pub(super) fn is_in_center_region<D: PageDom>(dom: &D, id: NodeId) -> bool {
    let vp = dom.viewport();
    let (cx, cy) = dom.node(id).rect.center();
    (cx - vp.width / 2.0).abs() < vp.width * 0.25
        && (cy - vp.height / 2.0).abs() < vp.height * 0.25
}

/// Whether a fixed, high z-index layer covers most of the viewport with
/// a visible tint.
pub(super) fn has_blocking_overlay<D: PageDom>(dom: &D) -> bool {
    let vp = dom.viewport();
    DomWalker::light_tree(dom).any(|step| {
        let data = dom.node(step.node);
        let z = match data.style.z_index_value() {
            Some(z) => z,
            None => return false,
        };
        if z <= 1000 || data.style.position != "fixed" {
            return false;
        }
        let rect = data.rect;
        if rect.width <= vp.width * 0.8 || rect.height <= vp.height * 0.8 {
            return false;
        }
        data.style.background_color != "rgba(0, 0, 0, 0)"
            || matches!(data.style.opacity_value(), Some(o) if o < 1.0)
    })
}
