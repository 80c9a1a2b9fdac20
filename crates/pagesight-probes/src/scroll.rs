//! Scroll target resolution and execution.
//!
//! Three resolvers feed one executor. Page scroll moves the document's
//! scrolling element. Point scroll hit-tests a coordinate and climbs to
//! the nearest scrollable ancestor. Nested scroll picks an inner
//! container, either under a point or the highest-capacity one on the
//! page.
//!
//! Every variant reports the same outcome shape and never returns an
//! error: failures come back as a tagged reason so a planner can branch
//! on them.

use std::collections::HashSet;

use pagesight_dom::{
    AncestorChain, Axis, DomWalker, NodeId, PageDom, ScrollHost, ScrollIoError, round_half_up,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Positions within this distance of an edge count as at the edge, and
/// moves no larger than it count as not moved. Sub-pixel rounding keeps
/// real pages off exact values.
const EDGE_SLACK: f64 = 1.0;

/// Delay before the last settle read.
const SETTLE_MILLIS: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Strict parse of the four direction names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    /// Lenient parse: anything unrecognized scrolls down.
    pub fn parse_lenient(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::Down)
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Up | Self::Down => Axis::Y,
            Self::Left | Self::Right => Axis::X,
        }
    }

    /// Sign of the offset change: negative toward the start edge.
    pub fn sign(self) -> f64 {
        match self {
            Self::Up | Self::Left => -1.0,
            Self::Down | Self::Right => 1.0,
        }
    }
}

fn default_direction() -> String {
    "down".to_string()
}

/// Request to scroll the page itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageScrollRequest {
    pub direction: String,
    pub to_edge: bool,
    /// Step override in pixels. Non-finite or non-positive values fall
    /// back to half the viewport.
    pub delta: Option<f64>,
}

impl Default for PageScrollRequest {
    fn default() -> Self {
        Self { direction: default_direction(), to_edge: false, delta: None }
    }
}

/// Request to scroll whatever container sits under a point.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointScrollRequest {
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_direction")]
    pub direction: String,
    #[serde(default)]
    pub to_edge: bool,
    #[serde(default)]
    pub pixel_delta: Option<f64>,
}

/// Request to scroll an inner container.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NestedScrollRequest {
    pub direction: String,
    pub to_edge: bool,
    pub pixel_delta: Option<f64>,
    /// Where to start the ancestor climb. Ignored when `prefer_largest`
    /// is set.
    pub target_point: Option<(f64, f64)>,
    /// Skip the point climb and take the highest-capacity scrollable on
    /// the page.
    pub prefer_largest: bool,
    /// With `prefer_largest`, reject containers smaller than this
    /// fraction of the viewport in either dimension.
    pub min_viewport_ratio: f64,
}

impl Default for NestedScrollRequest {
    fn default() -> Self {
        Self {
            direction: default_direction(),
            to_edge: false,
            pixel_delta: None,
            target_point: None,
            prefer_largest: false,
            min_viewport_ratio: 0.0,
        }
    }
}

/// Why a scroll resolved to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScrollFailure {
    InvalidDirection,
    NoRoot,
    NoTarget,
    NoScrollableAtPoint,
    NoScrollableTarget,
    NoLargeContainer,
    ScrollFailed,
}

/// What one scroll attempt did. Failures carry only `scrolled` and
/// `reason`; positional fields are filled when a target was driven.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollOutcome {
    pub scrolled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_boundary: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boundary_before: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_offset: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ScrollFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrollOutcome {
    fn failed(reason: ScrollFailure) -> Self {
        Self {
            scrolled: false,
            target_description: None,
            path: None,
            before: None,
            after: None,
            at_boundary: None,
            boundary_before: None,
            max_offset: None,
            reason: Some(reason),
            error: None,
        }
    }
}

/// Scroll the page scrolling element one step, or to an edge.
pub async fn scroll_page<D, H>(dom: &D, host: &H, req: &PageScrollRequest) -> ScrollOutcome
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let dir = Direction::parse_lenient(&req.direction);
    let axis = dir.axis();
    let Some(root) = page_root(dom) else {
        return ScrollOutcome::failed(ScrollFailure::NoRoot);
    };
    let client = dom.node(root).client_extent(axis);
    let raw_size = if client > 0.0 { client } else { viewport_extent(dom, axis) };
    let viewport_size = if raw_size.is_finite() && raw_size > 0.0 { raw_size } else { 240.0 };
    let step = match req.delta {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => (viewport_size * 0.5).max(120.0),
    };
    let mut outcome = drive(dom, host, root, axis, dir.sign(), req.to_edge, step).await;
    outcome.target_description = Some(describe_root(dom, root));
    debug!(scrolled = outcome.scrolled, ?axis, "page scroll");
    outcome
}

/// Scroll the nearest scrollable ancestor of the element under a point.
pub async fn scroll_at_point<D, H>(dom: &D, host: &H, req: &PointScrollRequest) -> ScrollOutcome
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let Some(dir) = Direction::parse(&req.direction) else {
        return ScrollOutcome::failed(ScrollFailure::InvalidDirection);
    };
    let axis = dir.axis();
    let step = match req.pixel_delta {
        Some(d) if d.is_finite() && d > 0.0 => d,
        _ => fallback_step(dom, axis),
    };
    let Some(start) = dom.element_from_point(req.x, req.y) else {
        return ScrollOutcome::failed(ScrollFailure::NoTarget);
    };
    let target = AncestorChain::new(dom, start)
        .take(80)
        .map(|s| s.node)
        .find(|&n| is_scrollable(dom, n, axis));
    let Some(target) = target else {
        return ScrollOutcome::failed(ScrollFailure::NoScrollableAtPoint);
    };
    let mut outcome = drive(dom, host, target, axis, dir.sign(), req.to_edge, step).await;
    outcome.target_description = Some(describe_element(dom, target));
    outcome.path = Some(build_path(dom, target));
    debug!(scrolled = outcome.scrolled, x = req.x, y = req.y, "point scroll");
    outcome
}

/// Scroll an inner container: the first scrollable ancestor of the target
/// point, or with `prefer_largest` the highest-capacity scrollable on the
/// page.
pub async fn scroll_nested<D, H>(dom: &D, host: &H, req: &NestedScrollRequest) -> ScrollOutcome
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let Some(dir) = Direction::parse(&req.direction) else {
        return ScrollOutcome::failed(ScrollFailure::InvalidDirection);
    };
    let axis = dir.axis();
    let target = resolve_nested_target(dom, req, axis);
    let target = match target {
        Some(t) if is_scrollable(dom, t, axis) => t,
        _ => {
            let reason = if req.prefer_largest && req.min_viewport_ratio > 0.0 {
                ScrollFailure::NoLargeContainer
            } else {
                ScrollFailure::NoScrollableTarget
            };
            return ScrollOutcome::failed(reason);
        }
    };
    let client = dom.node(target).client_extent(axis);
    let step = if client.is_finite() && client > 0.0 {
        client
    } else {
        match req.pixel_delta {
            Some(d) if d.is_finite() && d > 0.0 => d,
            _ => fallback_step(dom, axis),
        }
    };
    let mut outcome = drive(dom, host, target, axis, dir.sign(), req.to_edge, step).await;
    outcome.target_description = Some(describe_element(dom, target));
    outcome.path = Some(build_path(dom, target));
    debug!(scrolled = outcome.scrolled, prefer_largest = req.prefer_largest, "nested scroll");
    outcome
}

fn resolve_nested_target<D: PageDom>(
    dom: &D,
    req: &NestedScrollRequest,
    axis: Axis,
) -> Option<NodeId> {
    if req.prefer_largest {
        return pick_largest(dom, req.min_viewport_ratio, axis);
    }
    let (px, py) = req.target_point?;
    let start = dom.element_from_point(px, py)?;
    AncestorChain::new(dom, start)
        .take(50)
        .map(|s| s.node)
        .find(|&n| is_scrollable(dom, n, axis))
}

/// Highest-capacity scrollable: overflow along the axis weighted by
/// client area. Document roots compete alongside inner containers.
fn pick_largest<D: PageDom>(dom: &D, min_ratio: f64, axis: Axis) -> Option<NodeId> {
    let vp = dom.viewport();
    let min_width = (vp.width * min_ratio).max(0.0);
    let min_height = (vp.height * min_ratio).max(0.0);
    let mut seen = HashSet::new();
    let mut candidates: Vec<NodeId> = Vec::new();
    let roots = [dom.scrolling_element(), dom.document_element(), dom.body()];
    for id in roots.into_iter().flatten() {
        if seen.insert(id) {
            candidates.push(id);
        }
    }
    for step in DomWalker::light_tree(dom) {
        if seen.insert(step.node) {
            candidates.push(step.node);
        }
    }
    let mut best: Option<(NodeId, f64)> = None;
    for id in candidates {
        if !is_scrollable(dom, id, axis) {
            continue;
        }
        let data = dom.node(id);
        if min_ratio > 0.0 && (data.rect.width < min_width || data.rect.height < min_height) {
            continue;
        }
        let capacity = data.max_scroll_offset(axis)
            * data.client_width.max(1.0)
            * data.client_height.max(1.0);
        // Ties keep the earlier candidate, so document roots win them.
        match best {
            Some((_, cap)) if capacity <= cap => {}
            _ => best = Some((id, capacity)),
        }
    }
    best.map(|(id, _)| id)
}

/// One scroll against a resolved target: clamp, write, settle, compare.
async fn drive<D, H>(
    dom: &D,
    host: &H,
    target: NodeId,
    axis: Axis,
    sign: f64,
    to_edge: bool,
    step: f64,
) -> ScrollOutcome
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let max_offset = dom.node(target).max_scroll_offset(axis);
    let before = host.read_position(target, axis);
    let boundary_before = if sign < 0.0 {
        before <= EDGE_SLACK
    } else {
        before >= max_offset - EDGE_SLACK
    };
    let goal = if to_edge {
        if sign < 0.0 { 0.0 } else { max_offset }
    } else {
        (before + sign * step).clamp(0.0, max_offset)
    };
    if let Err(e) = host.scroll_to(target, axis, goal).await {
        let mut outcome = ScrollOutcome::failed(ScrollFailure::ScrollFailed);
        outcome.error = Some(e.to_string());
        return outcome;
    }
    let after = settle(host, target, axis, before).await;
    let at_boundary =
        if sign < 0.0 { after <= EDGE_SLACK } else { after >= max_offset - EDGE_SLACK };
    ScrollOutcome {
        scrolled: (after - before).abs() > EDGE_SLACK,
        target_description: None,
        path: None,
        before: Some(before),
        after: Some(after),
        at_boundary: Some(at_boundary),
        boundary_before: Some(boundary_before),
        max_offset: Some(max_offset),
        reason: None,
        error: None,
    }
}

/// Read the settled position: immediately, after one frame, then after a
/// short delay. Smooth-scrolling pages move late; each tier returns as
/// soon as movement shows.
async fn settle<H>(host: &H, target: NodeId, axis: Axis, before: f64) -> f64
where
    H: ScrollHost + ?Sized,
{
    let immediate = host.read_position(target, axis);
    if (immediate - before).abs() > EDGE_SLACK {
        return immediate;
    }
    host.wait_frame().await;
    let after_frame = host.read_position(target, axis);
    if (after_frame - before).abs() > EDGE_SLACK {
        return after_frame;
    }
    host.wait_millis(SETTLE_MILLIS).await;
    host.read_position(target, axis)
}

/// Whether a container can move along the axis: laid out, not hidden,
/// and holding more than a pixel of overflow.
fn is_scrollable<D: PageDom>(dom: &D, id: NodeId, axis: Axis) -> bool {
    let data = dom.node(id);
    if !data.is_element() {
        return false;
    }
    if data.client_height == 0.0 || data.client_width == 0.0 {
        return false;
    }
    if data.style.display_none() || data.style.visibility == "hidden" {
        return false;
    }
    let space = data.scroll_space(axis);
    space > EDGE_SLACK && space.is_finite()
}

fn page_root<D: PageDom>(dom: &D) -> Option<NodeId> {
    dom.scrolling_element().or_else(|| dom.document_element()).or_else(|| dom.body())
}

fn describe_root<D: PageDom>(dom: &D, root: NodeId) -> String {
    let mut desc = "page";
    if dom.document_element() == Some(root) {
        desc = "html";
    }
    if dom.body() == Some(root) {
        desc = "body";
    }
    desc.to_string()
}

/// Compact selector-ish label: tag, id, first two classes, aria-label.
fn describe_element<D: PageDom>(dom: &D, id: NodeId) -> String {
    let data = dom.node(id);
    let tag = data.tag_lower();
    let tag = if tag.is_empty() { "element".to_string() } else { tag };
    let id_part = dom
        .attr(id, "id")
        .filter(|v| !v.is_empty())
        .map(|v| format!("#{v}"))
        .unwrap_or_default();
    let classes: Vec<String> =
        dom.class_name(id).split_whitespace().take(2).map(str::to_string).collect();
    let class_part =
        if classes.is_empty() { String::new() } else { format!(".{}", classes.join(".")) };
    let aria_part = dom
        .attr(id, "aria-label")
        .filter(|v| !v.is_empty())
        .map(|v| format!("[aria-label=\"{}\"]", v.chars().take(40).collect::<String>()))
        .unwrap_or_default();
    format!("{tag}{id_part}{class_part}{aria_part}")
}

/// Root-first chain of labels down to the element, eight hops at most.
fn build_path<D: PageDom>(dom: &D, id: NodeId) -> String {
    let mut parts: Vec<String> =
        AncestorChain::new(dom, id).take(8).map(|s| describe_element(dom, s.node)).collect();
    parts.reverse();
    parts.join(" > ")
}

fn viewport_extent<D: PageDom>(dom: &D, axis: Axis) -> f64 {
    match axis {
        Axis::X => dom.viewport().width,
        Axis::Y => dom.viewport().height,
    }
}

fn fallback_step<D: PageDom>(dom: &D, axis: Axis) -> f64 {
    f64::from(round_half_up(viewport_extent(dom, axis) * 0.6)).max(120.0)
}

/// The page-level scroll state a status probe reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalScrollStatus {
    pub has_global: bool,
    /// "html" when the page scrolls, null otherwise.
    pub element: Option<String>,
    pub reason: GlobalScrollReason,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_height: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GlobalScrollReason {
    NoRoot,
    RootOverflowHidden,
    NoRootScrollSpace,
    RootScrollableX,
    RootScrollableY,
}

/// Whether the page itself can scroll along an axis, and why not when it
/// cannot.
pub fn global_scroll_status<D: PageDom>(dom: &D, axis: Axis) -> GlobalScrollStatus {
    let no = |reason| GlobalScrollStatus {
        has_global: false,
        element: None,
        reason,
        scroll_width: None,
        client_width: None,
        scroll_height: None,
        client_height: None,
    };
    let Some(root) = dom.scrolling_element().or_else(|| dom.document_element()) else {
        return no(GlobalScrollReason::NoRoot);
    };
    let data = dom.node(root);
    let overflow = match axis {
        Axis::X => &data.style.overflow_x,
        Axis::Y => &data.style.overflow_y,
    };
    if overflow == "hidden" || overflow == "clip" {
        return no(GlobalScrollReason::RootOverflowHidden);
    }
    let space = data.scroll_space(axis);
    if !space.is_finite() || space <= 2.0 {
        return no(GlobalScrollReason::NoRootScrollSpace);
    }
    GlobalScrollStatus {
        has_global: true,
        element: Some("html".to_string()),
        reason: match axis {
            Axis::X => GlobalScrollReason::RootScrollableX,
            Axis::Y => GlobalScrollReason::RootScrollableY,
        },
        scroll_width: Some(data.scroll_width),
        client_width: Some(data.client_width),
        scroll_height: Some(data.scroll_height),
        client_height: Some(data.client_height),
    }
}

/// Whether any viewport-scale container on the page can scroll. Half the
/// viewport in both dimensions counts as viewport-scale.
pub fn has_large_scrollable<D: PageDom>(dom: &D) -> bool {
    let vp = dom.viewport();
    let vw = if vp.width == 0.0 { 1.0 } else { vp.width };
    let vh = if vp.height == 0.0 { 1.0 } else { vp.height };
    let min_width = vw * 0.5;
    let min_height = vh * 0.5;
    DomWalker::light_tree(dom).any(|step| {
        let data = dom.node(step.node);
        if data.rect.width < min_width || data.rect.height < min_height {
            return false;
        }
        let scrollable_x = data.scroll_space(Axis::X) > 2.0
            && data.style.overflow_x != "hidden"
            && data.style.overflow_x != "clip";
        let scrollable_y = data.scroll_space(Axis::Y) > 2.0
            && data.style.overflow_y != "hidden"
            && data.style.overflow_y != "clip";
        scrollable_x || scrollable_y
    })
}

/// Move the page root by a raw delta. No settle, no outcome; the wheel
/// path uses this between full scrolls.
pub async fn nudge<D, H>(dom: &D, host: &H, axis: Axis, delta: f64) -> Result<(), ScrollIoError>
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let Some(root) = page_root(dom) else {
        return Ok(());
    };
    let before = host.read_position(root, axis);
    host.scroll_to(root, axis, before + delta).await
}

/// Throw the page root to an edge. The goal overshoots on purpose; the
/// host clamps it to the real maximum.
pub async fn jump_to_edge<D, H>(
    dom: &D,
    host: &H,
    axis: Axis,
    to_start: bool,
) -> Result<(), ScrollIoError>
where
    D: PageDom,
    H: ScrollHost + ?Sized,
{
    let Some(root) = page_root(dom) else {
        return Ok(());
    };
    let goal = if to_start { 0.0 } else { dom.node(root).scroll_extent(axis) };
    host.scroll_to(root, axis, goal).await
}

#[cfg(test)]
#[path = "scroll_tests.rs"]
mod tests;
