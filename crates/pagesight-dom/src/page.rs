//! The read handle analyzers run against.
//!
//! Every analyzer takes a [`PageDom`] instead of touching page globals, so
//! the same code runs over a live-page adapter and over the in-memory
//! fixtures used in tests.

use crate::geometry::Viewport;
use crate::node::{NodeData, NodeId, NodeKind};

/// Read access to one page snapshot: tree shape, per-node layout facts,
/// document metadata, and hit testing.
///
/// Shadow roots and nested documents are separate entries reached through
/// [`shadow_root`](Self::shadow_root) and
/// [`content_document`](Self::content_document); plain
/// [`children`](Self::children) never cross either boundary.
pub trait PageDom {
    /// The document entry itself. Never an element.
    fn document(&self) -> NodeId;

    /// The root element, html on any well-formed page.
    fn document_element(&self) -> Option<NodeId>;

    fn body(&self) -> Option<NodeId>;

    /// The element whose scroll position is the page scroll. Defaults to
    /// the document element, as in standards mode.
    fn scrolling_element(&self) -> Option<NodeId> {
        self.document_element()
    }

    fn node(&self, id: NodeId) -> &NodeData;

    /// Element children in document order. Text is carried on the parent's
    /// [`NodeData::text_runs`], not as children.
    fn children(&self, id: NodeId) -> &[NodeId];

    /// Structural parent. For a direct child of a shadow root this is the
    /// shadow root entry, not the host element.
    fn parent(&self, id: NodeId) -> Option<NodeId>;

    /// The shadow root attached to a host element, if any.
    fn shadow_root(&self, id: NodeId) -> Option<NodeId>;

    /// The host element of a shadow root entry.
    fn shadow_host(&self, root: NodeId) -> Option<NodeId>;

    /// The nested document of an iframe or frame element, if captured.
    fn content_document(&self, id: NodeId) -> Option<NodeId>;

    fn title(&self) -> &str;

    fn url(&self) -> &str;

    fn viewport(&self) -> Viewport;

    /// Hit test in viewport coordinates. Resolves to the topmost element
    /// at the point, retargeted to light DOM (shadow content reports its
    /// host).
    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId>;

    /// Attribute lookup. Implementations with pending attribute writes
    /// resolve them here.
    fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.node(id).attr(name).map(str::to_string)
    }

    /// Parent in the flattened tree: shadow children resolve to the host
    /// element, document roots to None.
    fn flat_parent(&self, id: NodeId) -> Option<NodeId> {
        let p = self.parent(id)?;
        match self.node(p).kind {
            NodeKind::Element => Some(p),
            NodeKind::ShadowRoot => self.shadow_host(p),
            NodeKind::Document => None,
        }
    }

    /// The class attribute, or empty when absent.
    fn class_name(&self, id: NodeId) -> String {
        self.attr(id, "class").unwrap_or_default()
    }

    fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_name(id).split_whitespace().any(|c| c == class)
    }

    /// Own text runs, trimmed and space-joined.
    fn direct_text(&self, id: NodeId) -> String {
        self.node(id).direct_text()
    }

    /// Rendered text of the subtree: light-DOM descent skipping
    /// display:none elements, runs trimmed and space-joined.
    fn inner_text(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        collect_inner_text(self, id, false, &mut parts);
        parts.join(" ")
    }

    /// Raw text of the subtree. Unlike [`inner_text`](Self::inner_text)
    /// this includes display:none content, matching textContent.
    fn text_content(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        collect_inner_text(self, id, true, &mut parts);
        parts.join(" ")
    }

    /// Whether the node is editable, honoring contenteditable inheritance
    /// through the flattened tree. An explicit "false" stops the walk.
    fn is_content_editable(&self, id: NodeId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if self.node(c).is_element() {
                if let Some(v) = self.attr(c, "contenteditable") {
                    return !v.trim().eq_ignore_ascii_case("false");
                }
            }
            cur = self.flat_parent(c);
        }
        false
    }
}

fn collect_inner_text<D: PageDom + ?Sized>(dom: &D, id: NodeId, raw: bool, out: &mut Vec<String>) {
    let data = dom.node(id);
    if !raw && data.is_element() && data.style.display_none() {
        return;
    }
    for run in &data.text_runs {
        let t = run.trim();
        if !t.is_empty() {
            out.push(t.to_string());
        }
    }
    for &child in dom.children(id) {
        collect_inner_text(dom, child, raw, out);
    }
}

/// Attribute writes, used by marker tagging. In-memory pages overlay the
/// snapshot; live-page adapters forward to the document.
pub trait AttrWrite {
    fn set_attr(&self, id: NodeId, name: &str, value: &str);
    fn remove_attr(&self, id: NodeId, name: &str);
}
