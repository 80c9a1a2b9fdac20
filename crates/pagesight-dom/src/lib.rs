//! DOM model for Pagesight analyzers.
//!
//! Analyzers never touch a live page directly. They read through the
//! [`PageDom`] trait and scroll through the [`ScrollHost`] trait, so the
//! same analyzer code runs against a browser adapter and against the
//! in-memory pages used in tests and snapshot replay.
//!
//! ```text
//! ┌──────────────────┐   PageDom / ScrollHost   ┌───────────────────┐
//! │    analyzers     │ ◄──────────────────────► │ MemoryDom         │
//! │ (pagesight-probes)│                          │ snapshot replay   │
//! └──────────────────┘                          │ browser adapters  │
//!                                               └───────────────────┘
//! ```
//!
//! ## Tree shape
//!
//! A page is an arena of nodes addressed by [`NodeId`]. Elements carry
//! their layout rect, computed style strings, attributes, and direct text
//! runs. Shadow roots and nested documents are separate entries, so plain
//! child links never cross a composition boundary; [`DomWalker`] and
//! [`AncestorChain`] make those crossings explicit.
//!
//! ## In-memory pages
//!
//! [`MemoryDom`] implements both traits over a static snapshot plus a
//! small mutable layer (scroll positions, attribute writes). Scroll waits
//! advance a virtual clock, and scroll application latency is
//! programmable, so settle behavior is fully testable without sleeping.
//! Pages come from [`PageBuilder`] or from the JSON snapshot format in
//! [`snapshot`].

mod geometry;
mod host;
mod memory;
mod node;
mod page;
pub mod snapshot;
mod style;
mod walker;

pub use geometry::{Axis, Rect, Viewport, round_half_up};
pub use host::{ScrollHost, ScrollIoError};
pub use memory::{ElementSpec, MemoryDom, PageBuilder, ScrollLatency};
pub use node::{NodeData, NodeId, NodeKind};
pub use page::{AttrWrite, PageDom};
pub use snapshot::{CapturedNode, ClassValue, DomError, PageCapture};
pub use style::{ComputedStyle, parse_float_prefix, parse_int_prefix};
pub use walker::{AncestorChain, AncestorStep, DomWalker, WalkStep};
