//! Scroll side effects behind a trait, so settle logic is testable.

use async_trait::async_trait;
use thiserror::Error;

use crate::geometry::Axis;
use crate::node::NodeId;

/// Failure surfaced by a scroll host. Analyzers fold these into tagged
/// outcomes instead of propagating them.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrollIoError {
    #[error("scroll command rejected: {0}")]
    Rejected(String),

    #[error("scroll host detached")]
    Detached,
}

/// The mutating half of a page handle: scroll position reads and writes
/// plus the waits a settle loop needs.
///
/// Position reads are synchronous because settle checks happen between
/// waits on the same snapshot. Writes are absolute; hosts clamp to the
/// reachable range. For the root scroller, reads and writes through the
/// body or the document element alias the page scroll, mirroring how
/// window scroll is shared between the two.
#[async_trait]
pub trait ScrollHost: Send + Sync {
    fn read_position(&self, id: NodeId, axis: Axis) -> f64;

    async fn scroll_to(&self, id: NodeId, axis: Axis, position: f64) -> Result<(), ScrollIoError>;

    /// Wait one animation frame.
    async fn wait_frame(&self);

    /// Wait a fixed number of milliseconds.
    async fn wait_millis(&self, ms: u64);
}
