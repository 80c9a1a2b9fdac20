//! CLI definitions for pagesight.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pagesight CLI.
#[derive(Parser)]
#[command(name = "pagesight")]
#[command(about = "Page perception analyzers for browser-driving agents")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build the filtered element outline of a snapshot
    Outline {
        /// Page snapshot JSON
        snapshot: PathBuf,
    },

    /// Collect and index clickable elements
    Clickables {
        /// Page snapshot JSON
        snapshot: PathBuf,

        /// First index to assign (overrides the config file)
        #[arg(long)]
        start_index: Option<u64>,

        /// Stamp marker attributes onto the loaded snapshot
        #[arg(long)]
        mark: bool,
    },

    /// Scroll the page one step, or to an edge
    ScrollPage {
        /// Page snapshot JSON
        snapshot: PathBuf,

        /// up, down, left, or right; anything else scrolls down
        #[arg(long, default_value = "down")]
        direction: String,

        /// Scroll all the way instead of one step
        #[arg(long)]
        to_edge: bool,

        /// Step size in pixels (default: half the viewport)
        #[arg(long)]
        delta: Option<f64>,
    },

    /// Scroll the nearest scrollable container under a point
    ScrollAt {
        /// Page snapshot JSON
        snapshot: PathBuf,

        /// Viewport x coordinate
        x: f64,

        /// Viewport y coordinate
        y: f64,

        /// up, down, left, or right
        #[arg(long, default_value = "down")]
        direction: String,

        /// Scroll all the way instead of one step
        #[arg(long)]
        to_edge: bool,

        /// Step size in pixels
        #[arg(long)]
        pixel_delta: Option<f64>,
    },

    /// Scroll an inner container: under a point, or the largest on the page
    ScrollNested {
        /// Page snapshot JSON
        snapshot: PathBuf,

        /// up, down, left, or right
        #[arg(long, default_value = "down")]
        direction: String,

        /// Scroll all the way instead of one step
        #[arg(long)]
        to_edge: bool,

        /// Step size in pixels when the container reports no viewport
        #[arg(long)]
        pixel_delta: Option<f64>,

        /// Viewport x coordinate to start the ancestor climb from
        #[arg(long, requires = "y")]
        x: Option<f64>,

        /// Viewport y coordinate to start the ancestor climb from
        #[arg(long, requires = "x")]
        y: Option<f64>,

        /// Take the highest-capacity scrollable instead of a point climb
        #[arg(long, conflicts_with_all = ["x", "y"])]
        largest: bool,

        /// With --largest, reject containers smaller than this fraction of
        /// the viewport in either dimension
        #[arg(long, default_value_t = 0.0)]
        min_ratio: f64,
    },

    /// Detect block pages and CAPTCHA walls
    Detect {
        /// Page snapshot JSON
        snapshot: PathBuf,
    },

    /// Measure page extent, scrollability, and content below a fold line
    Survey {
        /// Page snapshot JSON
        snapshot: PathBuf,

        /// Fold line in page pixels for the content check
        #[arg(long)]
        below: Option<f64>,
    },
}
