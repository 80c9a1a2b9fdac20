//! Page perception probes.
//!
//! Four analyzer families turn a captured page into planner-sized
//! answers:
//!
//! - [`outline`]: the filtered element tree and page heights.
//! - [`clickable`] and [`markers`]: indexed interactive elements and the
//!   attribute markers that make an index addressable later.
//! - [`scroll`]: scroll target resolution, execution, and page scroll
//!   status.
//! - [`blockwall`]: CAPTCHA and access-wall detection with confidence.
//!
//! Plus [`survey`] for the page-extent measurements the scroll loop reads
//! between moves.
//!
//! Every probe takes a [`PageDom`](pagesight_dom::PageDom) handle, never
//! a global, and reports failure as tagged data instead of errors. The
//! scroll probes additionally drive a
//! [`ScrollHost`](pagesight_dom::ScrollHost) and are async for its sake.

pub mod blockwall;
pub mod clickable;
pub mod markers;
pub mod outline;
pub mod scroll;
pub mod survey;

pub use blockwall::{BlockKind, BlockVerdict, detect_blockers};
pub use clickable::{
    ClickMarker, ClickableElement, ClickableReport, CollectOptions, DEFAULT_FLAG_ATTR,
    collect_clickables,
};
pub use markers::{
    DEFAULT_MARKER_ATTR, EDITABLE_TOKEN_ATTR, EditableHit, apply_markers, clear_markers,
    editable_at_point, find_by_marker, tag_editable,
};
pub use outline::{OutlineNode, OutlineReport, build_outline};
pub use scroll::{
    Direction, GlobalScrollReason, GlobalScrollStatus, NestedScrollRequest, PageScrollRequest,
    PointScrollRequest, ScrollFailure, ScrollOutcome, global_scroll_status, has_large_scrollable,
    jump_to_edge, nudge, scroll_at_point, scroll_nested, scroll_page,
};
pub use survey::{CanvasHit, PageMetrics, canvas_hit, content_below, page_metrics};
