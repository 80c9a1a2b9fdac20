//! Node identity and per-node snapshot data.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Rect};
use crate::style::ComputedStyle;

/// Handle to a node within one page snapshot. Only meaningful against the
/// [`PageDom`](crate::PageDom) that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// What kind of tree entry a node is.
///
/// Shadow roots and nested documents appear as their own entries so that
/// traversal can tell a boundary crossing from an ordinary parent link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Document,
    Element,
    ShadowRoot,
}

/// Layout and markup facts captured for one node.
///
/// `tag` keeps the casing the document reports: HTML elements come back
/// uppercase ("DIV"), foreign elements keep their source case ("svg").
/// Comparisons should go through [`NodeData::tag_is`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeData {
    pub kind: NodeKind,
    pub tag: String,
    /// Attribute map, names lowercased at ingestion.
    pub attrs: BTreeMap<String, String>,
    pub rect: Rect,
    pub style: ComputedStyle,
    /// Direct text children in document order, untrimmed.
    pub text_runs: Vec<String>,
    /// Intrinsic image dimensions. Zero when unknown or not an image.
    pub natural_width: f64,
    pub natural_height: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
    pub client_width: f64,
    pub client_height: f64,
    pub offset_width: f64,
    pub offset_height: f64,
}

impl Default for NodeData {
    fn default() -> Self {
        Self {
            kind: NodeKind::Element,
            tag: String::new(),
            attrs: BTreeMap::new(),
            rect: Rect::default(),
            style: ComputedStyle::default(),
            text_runs: Vec::new(),
            natural_width: 0.0,
            natural_height: 0.0,
            scroll_width: 0.0,
            scroll_height: 0.0,
            client_width: 0.0,
            client_height: 0.0,
            offset_width: 0.0,
            offset_height: 0.0,
        }
    }
}

impl NodeData {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Case-insensitive tag comparison.
    pub fn tag_is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn tag_lower(&self) -> String {
        self.tag.to_ascii_lowercase()
    }

    /// Own text runs trimmed and joined with single spaces. Text nested in
    /// child elements is not included.
    pub fn direct_text(&self) -> String {
        self.text_runs
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    pub fn scroll_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.scroll_width,
            Axis::Y => self.scroll_height,
        }
    }

    pub fn client_extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.client_width,
            Axis::Y => self.client_height,
        }
    }

    /// Overflow along an axis: content extent past the client box.
    pub fn scroll_space(&self, axis: Axis) -> f64 {
        self.scroll_extent(axis) - self.client_extent(axis)
    }

    /// Furthest scroll offset reachable along an axis, never negative.
    pub fn max_scroll_offset(&self, axis: Axis) -> f64 {
        self.scroll_space(axis).max(0.0)
    }
}
