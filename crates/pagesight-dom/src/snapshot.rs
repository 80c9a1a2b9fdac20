//! JSON snapshot interchange: a captured page tree that loads into a
//! [`MemoryDom`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::geometry::{Rect, Viewport};
use crate::memory::{ElementSpec, MemoryDom, PageBuilder};
use crate::node::NodeId;
use crate::style::ComputedStyle;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("snapshot parse failed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("snapshot root must be an html element, got {0:?}")]
    UnexpectedRoot(String),

    #[error("unknown scrolling element {0:?}, expected \"html\" or \"body\"")]
    UnknownScrollingElement(String),
}

/// The class attribute as captured. SVG elements report an animated
/// string object where HTML elements report plain text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassValue {
    Text(String),
    Animated {
        #[serde(rename = "baseVal")]
        base_val: String,
    },
}

impl ClassValue {
    pub fn resolve(&self) -> &str {
        match self {
            ClassValue::Text(s) => s,
            ClassValue::Animated { base_val } => base_val,
        }
    }
}

/// One captured element. Geometry fields that a capture script did not
/// record default to no-overflow values derived from the layout rect.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapturedNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    /// Used for the class attribute only when `attributes` lacks one.
    pub class_name: Option<ClassValue>,
    pub rect: Rect,
    pub style: ComputedStyle,
    /// Direct text runs.
    pub text: Vec<String>,
    pub natural_width: Option<f64>,
    pub natural_height: Option<f64>,
    pub scroll_width: Option<f64>,
    pub scroll_height: Option<f64>,
    pub client_width: Option<f64>,
    pub client_height: Option<f64>,
    pub offset_width: Option<f64>,
    pub offset_height: Option<f64>,
    pub scroll_left: f64,
    pub scroll_top: f64,
    pub children: Vec<CapturedNode>,
    pub shadow_root: Vec<CapturedNode>,
    pub content_document: Option<Box<CapturedNode>>,
}

impl CapturedNode {
    fn to_spec(&self) -> ElementSpec {
        let mut spec = ElementSpec::new(&self.tag);
        for (name, value) in &self.attributes {
            spec = spec.attr(name, value);
        }
        if !spec.attrs.contains_key("class") {
            if let Some(class) = &self.class_name {
                spec = spec.attr("class", class.resolve());
            }
        }
        spec.rect = self.rect;
        spec.style = self.style.clone();
        spec.text = self.text.clone();
        if let (Some(w), Some(h)) = (self.natural_width, self.natural_height) {
            spec.natural_size = Some((w, h));
        }
        let client_w = self.client_width.unwrap_or(self.rect.width);
        let client_h = self.client_height.unwrap_or(self.rect.height);
        spec.client_size = Some((client_w, client_h));
        spec.scroll_size = Some((
            self.scroll_width.unwrap_or(client_w),
            self.scroll_height.unwrap_or(client_h),
        ));
        spec.offset_size = Some((
            self.offset_width.unwrap_or(self.rect.width),
            self.offset_height.unwrap_or(self.rect.height),
        ));
        spec.scroll_left = self.scroll_left;
        spec.scroll_top = self.scroll_top;
        spec
    }
}

/// A whole captured page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapture {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub viewport: Viewport,
    /// "html" (default) or "body".
    #[serde(default)]
    pub scrolling_element: Option<String>,
    /// The html element.
    pub root: CapturedNode,
}

impl MemoryDom {
    pub fn from_json(json: &str) -> Result<MemoryDom, DomError> {
        let capture: PageCapture = serde_json::from_str(json)?;
        Self::from_capture(capture)
    }

    pub fn from_capture(capture: PageCapture) -> Result<MemoryDom, DomError> {
        if !capture.root.tag.eq_ignore_ascii_case("html") {
            return Err(DomError::UnexpectedRoot(capture.root.tag.clone()));
        }

        let mut builder = PageBuilder::new();
        builder
            .title(&capture.title)
            .url(&capture.url)
            .viewport(capture.viewport.width, capture.viewport.height)
            .device_pixel_ratio(capture.viewport.device_pixel_ratio);
        let html = builder.html();
        let body = builder.body();

        apply_onto(&mut builder, html, &capture.root);

        let mut body_seen = false;
        for child in &capture.root.children {
            if !body_seen && child.tag.eq_ignore_ascii_case("body") {
                body_seen = true;
                apply_onto(&mut builder, body, child);
                for grandchild in &child.children {
                    append_tree(&mut builder, body, grandchild);
                }
                attach_subtrees(&mut builder, body, child);
            } else {
                append_tree(&mut builder, html, child);
            }
        }
        if !body_seen {
            builder.without_body();
        }

        match capture.scrolling_element.as_deref() {
            None => {}
            Some(name) if name.eq_ignore_ascii_case("html") => {}
            Some(name) if name.eq_ignore_ascii_case("body") => {
                if !body_seen {
                    return Err(DomError::UnknownScrollingElement(name.to_string()));
                }
                builder.scrolling_element(body);
            }
            Some(other) => return Err(DomError::UnknownScrollingElement(other.to_string())),
        }

        debug!(url = %capture.url, "page snapshot loaded");
        Ok(builder.finish())
    }
}

/// Replace a pre-built node (html or body) with captured data.
fn apply_onto(builder: &mut PageBuilder, target: NodeId, node: &CapturedNode) {
    let spec = node.to_spec();
    let (left, top) = (spec.scroll_left, spec.scroll_top);
    let (data, _) = spec.into_data();
    builder.update(target, |d| *d = data);
    if left != 0.0 || top != 0.0 {
        builder.set_scroll_pos(target, left, top);
    }
}

fn append_tree(builder: &mut PageBuilder, parent: NodeId, node: &CapturedNode) {
    let id = builder.append(parent, node.to_spec());
    for child in &node.children {
        append_tree(builder, id, child);
    }
    attach_subtrees(builder, id, node);
}

fn attach_subtrees(builder: &mut PageBuilder, id: NodeId, node: &CapturedNode) {
    if !node.shadow_root.is_empty() {
        let shadow = builder.attach_shadow(id);
        for child in &node.shadow_root {
            append_tree(builder, shadow, child);
        }
    }
    if let Some(doc) = &node.content_document {
        let entry = builder.attach_document(id);
        append_tree(builder, entry, doc);
    }
}

#[cfg(test)]
#[path = "snapshot_tests.rs"]
mod tests;
