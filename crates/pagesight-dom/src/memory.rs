//! In-memory page: the [`PageDom`] and [`ScrollHost`] implementation used
//! by fixtures, snapshot replay, and tests.
//!
//! Scroll writes can be configured to land immediately, after a number of
//! animation frames, after simulated time, or never. Waits advance a
//! virtual clock instead of sleeping, so settle behavior is testable
//! without real delays.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::geometry::{Axis, Rect, Viewport};
use crate::host::{ScrollHost, ScrollIoError};
use crate::node::{NodeData, NodeId, NodeKind};
use crate::page::{AttrWrite, PageDom};

/// When a scroll write becomes observable through position reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollLatency {
    /// Position changes before `scroll_to` returns.
    Immediate,
    /// Position changes after this many animation frames.
    AfterFrames(u32),
    /// Position changes after this much simulated time.
    AfterMillis(u64),
    /// Write is accepted but the position never moves.
    Never,
}

#[derive(Debug)]
struct NodeRecord {
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    shadow_root: Option<NodeId>,
    shadow_host: Option<NodeId>,
    content_document: Option<NodeId>,
}

impl NodeRecord {
    fn new(data: NodeData, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            children: Vec::new(),
            shadow_root: None,
            shadow_host: None,
            content_document: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Due {
    AtFrame(u64),
    AtMillis(u64),
}

#[derive(Debug)]
struct PendingScroll {
    id: NodeId,
    axis: Axis,
    position: f64,
    due: Due,
}

#[derive(Debug, Default)]
struct LiveState {
    /// Committed scroll positions as (left, top). Missing entry reads 0.
    scroll: HashMap<NodeId, (f64, f64)>,
    /// Attribute writes layered over the snapshot. None marks removal.
    attr_overlay: HashMap<(NodeId, String), Option<String>>,
    pending: Vec<PendingScroll>,
    frame: u64,
    clock_ms: u64,
}

/// A complete page held in memory.
#[derive(Debug)]
pub struct MemoryDom {
    records: Vec<NodeRecord>,
    document: NodeId,
    document_element: Option<NodeId>,
    body: Option<NodeId>,
    scrolling: Option<NodeId>,
    title: String,
    url: String,
    viewport: Viewport,
    latency: ScrollLatency,
    scroll_error: Option<String>,
    state: Mutex<LiveState>,
}

impl MemoryDom {
    pub fn builder() -> PageBuilder {
        PageBuilder::new()
    }

    /// Body and document element alias the page scroller, the way window
    /// scroll is shared between the two.
    fn scroll_alias(&self, id: NodeId) -> NodeId {
        let is_root = Some(id) == self.body || Some(id) == self.document_element;
        if is_root { self.scrolling.unwrap_or(id) } else { id }
    }

    fn commit_scroll(state: &mut LiveState, id: NodeId, axis: Axis, position: f64) {
        let entry = state.scroll.entry(id).or_insert((0.0, 0.0));
        match axis {
            Axis::X => entry.0 = position,
            Axis::Y => entry.1 = position,
        }
    }

    fn flush_due(state: &mut LiveState) {
        let frame = state.frame;
        let clock = state.clock_ms;
        let mut ready = Vec::new();
        state.pending.retain(|p| {
            let due = match p.due {
                Due::AtFrame(f) => frame >= f,
                Due::AtMillis(t) => clock >= t,
            };
            if due {
                ready.push((p.id, p.axis, p.position));
            }
            !due
        });
        for (id, axis, position) in ready {
            Self::commit_scroll(state, id, axis, position);
        }
    }
}

impl PageDom for MemoryDom {
    fn document(&self) -> NodeId {
        self.document
    }

    fn document_element(&self) -> Option<NodeId> {
        self.document_element
    }

    fn body(&self) -> Option<NodeId> {
        self.body
    }

    fn scrolling_element(&self) -> Option<NodeId> {
        self.scrolling
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.records[id.index()].data
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        &self.records[id.index()].children
    }

    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.records[id.index()].parent
    }

    fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        self.records[id.index()].shadow_root
    }

    fn shadow_host(&self, root: NodeId) -> Option<NodeId> {
        self.records[root.index()].shadow_host
    }

    fn content_document(&self, id: NodeId) -> Option<NodeId> {
        self.records[id.index()].content_document
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for step in crate::walker::DomWalker::light_tree(self) {
            let data = self.node(step.node);
            if !data.rect.contains(x, y) {
                continue;
            }
            if data.style.display_none()
                || data.style.visibility == "hidden"
                || data.style.visibility == "collapse"
                || data.style.pointer_events == "none"
            {
                continue;
            }
            let area = data.rect.area();
            // Smallest box wins; on ties the later node is painted on top.
            match best {
                Some((_, best_area)) if area > best_area => {}
                _ => best = Some((step.node, area)),
            }
        }
        best.map(|(id, _)| id)
    }

    fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        let state = self.state.lock();
        match state.attr_overlay.get(&(id, name.to_string())) {
            Some(Some(v)) => Some(v.clone()),
            Some(None) => None,
            None => self.node(id).attr(name).map(str::to_string),
        }
    }
}

impl AttrWrite for MemoryDom {
    fn set_attr(&self, id: NodeId, name: &str, value: &str) {
        let mut state = self.state.lock();
        state.attr_overlay.insert((id, name.to_string()), Some(value.to_string()));
    }

    fn remove_attr(&self, id: NodeId, name: &str) {
        let mut state = self.state.lock();
        state.attr_overlay.insert((id, name.to_string()), None);
    }
}

#[async_trait]
impl ScrollHost for MemoryDom {
    fn read_position(&self, id: NodeId, axis: Axis) -> f64 {
        let alias = self.scroll_alias(id);
        let state = self.state.lock();
        let (left, top) = state.scroll.get(&alias).copied().unwrap_or((0.0, 0.0));
        match axis {
            Axis::X => left,
            Axis::Y => top,
        }
    }

    async fn scroll_to(&self, id: NodeId, axis: Axis, position: f64) -> Result<(), ScrollIoError> {
        if let Some(msg) = &self.scroll_error {
            return Err(ScrollIoError::Rejected(msg.clone()));
        }
        if !position.is_finite() {
            return Ok(());
        }
        let alias = self.scroll_alias(id);
        let clamped = position.clamp(0.0, self.node(alias).max_scroll_offset(axis));
        let mut state = self.state.lock();
        match self.latency {
            ScrollLatency::Immediate => Self::commit_scroll(&mut state, alias, axis, clamped),
            ScrollLatency::AfterFrames(n) => {
                let due = Due::AtFrame(state.frame + u64::from(n));
                state.pending.push(PendingScroll { id: alias, axis, position: clamped, due });
            }
            ScrollLatency::AfterMillis(ms) => {
                let due = Due::AtMillis(state.clock_ms + ms);
                state.pending.push(PendingScroll { id: alias, axis, position: clamped, due });
            }
            ScrollLatency::Never => {}
        }
        Ok(())
    }

    async fn wait_frame(&self) {
        let mut state = self.state.lock();
        state.frame += 1;
        Self::flush_due(&mut state);
    }

    async fn wait_millis(&self, ms: u64) {
        let mut state = self.state.lock();
        state.clock_ms += ms;
        Self::flush_due(&mut state);
    }
}

/// Spec for one element appended to a [`PageBuilder`].
///
/// Client boxes default to the layout rect, scroll extents to the client
/// box, so a plain element has no scrollable overflow.
#[derive(Debug, Clone)]
pub struct ElementSpec {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub style: crate::style::ComputedStyle,
    pub rect: Rect,
    pub text: Vec<String>,
    pub natural_size: Option<(f64, f64)>,
    pub client_size: Option<(f64, f64)>,
    pub scroll_size: Option<(f64, f64)>,
    pub offset_size: Option<(f64, f64)>,
    pub scroll_left: f64,
    pub scroll_top: f64,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: BTreeMap::new(),
            style: crate::style::ComputedStyle::default(),
            rect: Rect::default(),
            text: Vec::new(),
            natural_size: None,
            client_size: None,
            scroll_size: None,
            offset_size: None,
            scroll_left: 0.0,
            scroll_top: 0.0,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Rect::new(x, y, width, height);
        self
    }

    pub fn text(mut self, run: &str) -> Self {
        self.text.push(run.to_string());
        self
    }

    pub fn display(mut self, display: &str) -> Self {
        self.style.display = display.to_string();
        self
    }

    pub fn visibility(mut self, visibility: &str) -> Self {
        self.style.visibility = visibility.to_string();
        self
    }

    /// Edit the rest of the computed style in place.
    pub fn style(mut self, f: impl FnOnce(&mut crate::style::ComputedStyle)) -> Self {
        f(&mut self.style);
        self
    }

    pub fn natural_size(mut self, width: f64, height: f64) -> Self {
        self.natural_size = Some((width, height));
        self
    }

    pub fn client_size(mut self, width: f64, height: f64) -> Self {
        self.client_size = Some((width, height));
        self
    }

    pub fn scroll_size(mut self, width: f64, height: f64) -> Self {
        self.scroll_size = Some((width, height));
        self
    }

    pub fn scroll_pos(mut self, left: f64, top: f64) -> Self {
        self.scroll_left = left;
        self.scroll_top = top;
        self
    }

    pub(crate) fn into_data(self) -> (NodeData, (f64, f64)) {
        let (client_w, client_h) =
            self.client_size.unwrap_or((self.rect.width, self.rect.height));
        let (scroll_w, scroll_h) = self.scroll_size.unwrap_or((client_w, client_h));
        let (offset_w, offset_h) =
            self.offset_size.unwrap_or((self.rect.width, self.rect.height));
        let data = NodeData {
            kind: NodeKind::Element,
            tag: self.tag,
            attrs: self.attrs,
            rect: self.rect,
            style: self.style,
            text_runs: self.text,
            natural_width: self.natural_size.map_or(0.0, |(w, _)| w),
            natural_height: self.natural_size.map_or(0.0, |(_, h)| h),
            scroll_width: scroll_w,
            scroll_height: scroll_h,
            client_width: client_w,
            client_height: client_h,
            offset_width: offset_w,
            offset_height: offset_h,
        };
        (data, (self.scroll_left, self.scroll_top))
    }
}

/// Builds a [`MemoryDom`]. Starts with document, html, and body already
/// in place; append everything else under [`PageBuilder::body`].
pub struct PageBuilder {
    records: Vec<NodeRecord>,
    document: NodeId,
    html: NodeId,
    body: NodeId,
    title: String,
    url: String,
    viewport: Viewport,
    scrolling: Option<NodeId>,
    latency: ScrollLatency,
    scroll_error: Option<String>,
    initial_scroll: Vec<(NodeId, f64, f64)>,
    body_removed: bool,
}

impl Default for PageBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PageBuilder {
    pub fn new() -> Self {
        let mut records = Vec::new();

        let mut doc_data = NodeData { kind: NodeKind::Document, ..NodeData::default() };
        doc_data.tag = "#document".to_string();
        records.push(NodeRecord::new(doc_data, None));
        let document = NodeId(0);

        let html_data = NodeData { tag: "HTML".to_string(), ..NodeData::default() };
        records.push(NodeRecord::new(html_data, Some(document)));
        let html = NodeId(1);
        records[document.index()].children.push(html);

        let body_data = NodeData { tag: "BODY".to_string(), ..NodeData::default() };
        records.push(NodeRecord::new(body_data, Some(html)));
        let body = NodeId(2);
        records[html.index()].children.push(body);

        Self {
            records,
            document,
            html,
            body,
            title: String::new(),
            url: "about:blank".to_string(),
            viewport: Viewport::default(),
            scrolling: None,
            latency: ScrollLatency::Immediate,
            scroll_error: None,
            initial_scroll: Vec::new(),
            body_removed: false,
        }
    }

    /// Detach the pre-built body, for modeling documents without one.
    pub fn without_body(&mut self) -> &mut Self {
        let body = self.body;
        self.records[self.html.index()].children.retain(|&c| c != body);
        self.body_removed = true;
        self
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn html(&self) -> NodeId {
        self.html
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    pub fn url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }

    pub fn viewport(&mut self, width: f64, height: f64) -> &mut Self {
        self.viewport = Viewport { width, height, ..self.viewport };
        self
    }

    pub fn device_pixel_ratio(&mut self, ratio: f64) -> &mut Self {
        self.viewport.device_pixel_ratio = ratio;
        self
    }

    /// Override which element carries the page scroll. Defaults to html.
    pub fn scrolling_element(&mut self, id: NodeId) -> &mut Self {
        self.scrolling = Some(id);
        self
    }

    pub fn latency(&mut self, latency: ScrollLatency) -> &mut Self {
        self.latency = latency;
        self
    }

    /// Make every scroll write fail with this message.
    pub fn scroll_error(&mut self, message: &str) -> &mut Self {
        self.scroll_error = Some(message.to_string());
        self
    }

    /// Append an element under `parent`, which may be an element, a shadow
    /// root, or a document entry. Returns the new node's id.
    pub fn append(&mut self, parent: NodeId, spec: ElementSpec) -> NodeId {
        let (data, (left, top)) = spec.into_data();
        let id = NodeId(self.records.len() as u32);
        self.records.push(NodeRecord::new(data, Some(parent)));
        self.records[parent.index()].children.push(id);
        if left != 0.0 || top != 0.0 {
            self.initial_scroll.push((id, left, top));
        }
        id
    }

    /// Attach a shadow root to `host`. Shadow children go under the
    /// returned id.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let mut data = NodeData { kind: NodeKind::ShadowRoot, ..NodeData::default() };
        data.tag = "#shadow-root".to_string();
        let id = NodeId(self.records.len() as u32);
        let mut record = NodeRecord::new(data, Some(host));
        record.shadow_host = Some(host);
        self.records.push(record);
        self.records[host.index()].shadow_root = Some(id);
        id
    }

    /// Attach a nested document to a frame element. Frame content goes
    /// under the returned id.
    pub fn attach_document(&mut self, frame: NodeId) -> NodeId {
        let mut data = NodeData { kind: NodeKind::Document, ..NodeData::default() };
        data.tag = "#document".to_string();
        let id = NodeId(self.records.len() as u32);
        self.records.push(NodeRecord::new(data, None));
        self.records[frame.index()].content_document = Some(id);
        id
    }

    /// Edit a node's data in place, for adjusting html or body geometry.
    pub fn update(&mut self, id: NodeId, f: impl FnOnce(&mut NodeData)) -> &mut Self {
        f(&mut self.records[id.index()].data);
        self
    }

    pub fn set_scroll_pos(&mut self, id: NodeId, left: f64, top: f64) -> &mut Self {
        self.initial_scroll.push((id, left, top));
        self
    }

    pub fn finish(mut self) -> MemoryDom {
        let viewport_rect = self.viewport.rect();
        let mut roots = vec![self.html];
        if !self.body_removed {
            roots.push(self.body);
        }
        for root in roots {
            let data = &mut self.records[root.index()].data;
            if data.rect == Rect::default() {
                data.rect = viewport_rect;
            }
            if data.client_width == 0.0 && data.client_height == 0.0 {
                data.client_width = data.rect.width;
                data.client_height = data.rect.height;
            }
            if data.scroll_width == 0.0 && data.scroll_height == 0.0 {
                data.scroll_width = data.client_width;
                data.scroll_height = data.client_height;
            }
            if data.offset_width == 0.0 && data.offset_height == 0.0 {
                data.offset_width = data.rect.width;
                data.offset_height = data.rect.height;
            }
        }

        let mut state = LiveState::default();
        for (id, left, top) in self.initial_scroll.drain(..) {
            state.scroll.insert(id, (left, top));
        }

        debug!(nodes = self.records.len(), "memory page built");

        let body = if self.body_removed { None } else { Some(self.body) };
        MemoryDom {
            records: self.records,
            document: self.document,
            document_element: Some(self.html),
            body,
            scrolling: Some(self.scrolling.unwrap_or(self.html)),
            title: self.title,
            url: self.url,
            viewport: self.viewport,
            latency: self.latency,
            scroll_error: self.scroll_error,
            state: Mutex::new(state),
        }
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
