//! Clickable element collection: every interactive element on the page,
//! indexed so a planner can point at "element 17" instead of a selector.
//!
//! Candidates come from tag and role sets, contenteditable regions, and an
//! opt-in flag attribute pages can set on custom widgets. Invisible
//! candidates are dropped. Indices start at the caller's watermark and the
//! report carries the next free one, so repeated passes over a changing
//! page never reuse an index.

use pagesight_dom::{DomWalker, NodeId, PageDom, Viewport};
use serde::{Deserialize, Serialize};
use tracing::debug;

const CLICKABLE_TAGS: &[&str] =
    &["a", "button", "input", "select", "textarea", "summary", "option", "canvas"];

const CLICKABLE_ROLES: &[&str] = &[
    "button",
    "tab",
    "link",
    "checkbox",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "radio",
];

/// Attribute that force-includes an element regardless of tag or role.
pub const DEFAULT_FLAG_ATTR: &str = "data-pagesight-clickable";

/// Collection knobs. Defaults suit a first pass over a fresh page.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectOptions {
    /// First index to assign. Chain from a prior report's `next_index` to
    /// keep indices unique across passes.
    pub start_index: u64,
    /// Presence of this attribute marks an element clickable even when
    /// nothing else about it does.
    pub flag_attr: String,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self { start_index: 0, flag_attr: DEFAULT_FLAG_ATTR.to_string() }
    }
}

/// One collected element. Coordinates are raw viewport pixels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickableElement {
    pub index: u64,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub tag: String,
    /// Normalized type attribute for inputs, null for everything else.
    pub input_type: Option<String>,
    /// One line a planner reads: tag, attribute hints, primary text.
    pub description: String,
}

/// A pending index assignment. The collector only records which node got
/// which index; writing markers back is the caller's move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClickMarker {
    pub node: NodeId,
    pub index: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickableReport {
    pub elements: Vec<ClickableElement>,
    /// The `start_index` for the next collection pass.
    pub next_index: u64,
    pub viewport: Viewport,
    /// Node assignments for marker writes. Not serialized; node ids mean
    /// nothing outside this snapshot.
    #[serde(skip)]
    pub markers: Vec<ClickMarker>,
}

/// Collect every visible interactive element, shadow trees included.
/// Nested documents are left to their own collection pass.
pub fn collect_clickables<D: PageDom>(dom: &D, opts: &CollectOptions) -> ClickableReport {
    let mut elements = Vec::new();
    let mut markers = Vec::new();
    let mut index = opts.start_index;
    for step in DomWalker::full_tree(dom) {
        let id = step.node;
        let data = dom.node(id);
        if !data.is_element() {
            continue;
        }
        let tag = data.tag_lower();
        if !is_probably_clickable(dom, id, &tag, &opts.flag_attr) || !is_visible(dom, id) {
            continue;
        }
        let input_type = if tag == "input" {
            let raw = dom
                .attr(id, "type")
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string());
            Some(raw.to_ascii_lowercase())
        } else {
            None
        };
        let text = primary_text(dom, id, &tag, input_type.as_deref());
        let description = build_description(dom, id, &tag, &text, input_type.as_deref());
        elements.push(ClickableElement {
            index,
            x: data.rect.x,
            y: data.rect.y,
            width: data.rect.width,
            height: data.rect.height,
            tag,
            input_type,
            description,
        });
        markers.push(ClickMarker { node: id, index });
        index += 1;
    }
    debug!(found = elements.len(), next_index = index, "clickable elements collected");
    ClickableReport { elements, next_index: index, viewport: dom.viewport(), markers }
}

fn is_probably_clickable<D: PageDom>(dom: &D, id: NodeId, tag: &str, flag_attr: &str) -> bool {
    if dom.attr(id, flag_attr).is_some() {
        return true;
    }
    if CLICKABLE_TAGS.contains(&tag) {
        return true;
    }
    if let Some(role) = dom.attr(id, "role") {
        let hit = role.split(' ').any(|r| {
            let r = r.trim().to_ascii_lowercase();
            CLICKABLE_ROLES.contains(&r.as_str())
        });
        if hit {
            return true;
        }
    }
    // Own attribute only. Inherited editability belongs to the region's
    // root, which carries the attribute itself.
    match dom.attr(id, "contenteditable") {
        Some(v) => !v.is_empty() && !v.eq_ignore_ascii_case("false"),
        None => false,
    }
}

fn is_visible<D: PageDom>(dom: &D, id: NodeId) -> bool {
    let data = dom.node(id);
    if data.rect.width <= 1.0 || data.rect.height <= 1.0 {
        return false;
    }
    let style = &data.style;
    if style.display_none() || style.visibility == "hidden" || style.visibility == "collapse" {
        return false;
    }
    if style.pointer_events == "none" {
        return false;
    }
    // Unparseable opacity counts as visible.
    !matches!(style.opacity_value(), Some(o) if o <= 0.0)
}

/// The text a planner sees for the element. Inputs prefer their value,
/// then placeholder; selects list their first options; everything else
/// falls back to rendered text.
fn primary_text<D: PageDom>(dom: &D, id: NodeId, tag: &str, input_type: Option<&str>) -> String {
    if tag == "input" || tag == "textarea" {
        let value = dom.attr(id, "value").filter(|v| !v.is_empty()).or_else(|| {
            // A textarea's value is its text content.
            (tag == "textarea").then(|| dom.text_content(id)).filter(|t| !t.is_empty())
        });
        if let Some(v) = value {
            return normalize_text(&v, 120);
        }
        if let Some(p) = dom.attr(id, "placeholder").filter(|p| !p.is_empty()) {
            return normalize_text(&p, 120);
        }
    }
    if tag == "option" {
        let text = dom.inner_text(id);
        let text = if text.is_empty() { dom.text_content(id) } else { text };
        return normalize_text(&text, 120);
    }
    if tag == "select" {
        let options: Vec<NodeId> = DomWalker::subtree(dom, id, false)
            .map(|s| s.node)
            .filter(|&n| dom.node(n).tag_is("option"))
            .take(5)
            .collect();
        let texts: Vec<String> = options
            .iter()
            .enumerate()
            .filter_map(|(i, &opt)| {
                let val = normalize_text(&dom.text_content(opt), 120);
                if val.is_empty() { None } else { Some(format!("option#{i}:{val}")) }
            })
            .collect();
        if !texts.is_empty() {
            return texts.join(", ");
        }
    }
    let inner = dom.inner_text(id);
    let inner = if inner.is_empty() { dom.text_content(id) } else { inner };
    let text = normalize_text(&inner, 120);
    if !text.is_empty() {
        return text;
    }
    if matches!(input_type, Some("submit" | "button")) {
        let value =
            dom.attr(id, "value").filter(|v| !v.is_empty()).unwrap_or_else(|| "submit".to_string());
        return normalize_text(&value, 120);
    }
    String::new()
}

fn build_description<D: PageDom>(
    dom: &D,
    id: NodeId,
    tag: &str,
    text: &str,
    input_type: Option<&str>,
) -> String {
    let mut hints = Vec::new();
    let id_value = normalize_text(&dom.attr(id, "id").unwrap_or_default(), 60);
    if !id_value.is_empty() {
        hints.push(format!("id:\"{id_value}\""));
    }
    let label = dom
        .attr(id, "aria-label")
        .filter(|v| !v.is_empty())
        .or_else(|| dom.attr(id, "title"))
        .unwrap_or_default();
    let label = normalize_text(&label, 80);
    if !label.is_empty() {
        hints.push(format!("hint:\"{label}\""));
    }
    let placeholder = normalize_text(&dom.attr(id, "placeholder").unwrap_or_default(), 80);
    if !placeholder.is_empty() {
        hints.push(format!("placeholder:\"{placeholder}\""));
    }
    let role = normalize_text(&dom.attr(id, "role").unwrap_or_default(), 40);
    if !role.is_empty() {
        hints.push(format!("role:\"{role}\""));
    }
    if let Some(t) = input_type {
        hints.push(format!("type:\"{t}\""));
    }
    let hint_text =
        if hints.is_empty() { "{}".to_string() } else { format!("{{{}}}", hints.join(",")) };
    if text.is_empty() { format!("{tag} {hint_text}") } else { format!("{tag} {hint_text} {text}") }
}

/// Collapse whitespace runs to single spaces, trim, and cap the length,
/// marking a cut with a trailing ellipsis.
fn normalize_text(value: &str, limit: usize) -> String {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > limit {
        let cut: String = collapsed.chars().take(limit).collect();
        format!("{cut}...")
    } else {
        collapsed
    }
}

#[cfg(test)]
#[path = "clickable_tests.rs"]
mod tests;
