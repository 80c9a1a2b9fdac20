//! Pagesight CLI.
//!
//! Loads a captured page snapshot, runs one analyzer against it, and
//! prints the JSON report. This is the debugging surface for the
//! analyzers; an agent host calls the library crates directly.

mod cli;
mod config;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagesight_dom::{Axis, MemoryDom, PageCapture, PageDom};
use pagesight_probes::{
    GlobalScrollStatus, NestedScrollRequest, PageMetrics, PageScrollRequest, PointScrollRequest,
    apply_markers, build_outline, collect_clickables, content_below, detect_blockers,
    global_scroll_status, has_large_scrollable, page_metrics, scroll_at_point, scroll_nested,
    scroll_page,
};

use crate::cli::{Cli, Commands};
use crate::config::Config;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Outline { snapshot } => {
            let dom = load_snapshot(&snapshot, &config)?;
            print_report(&build_outline(&dom))
        }
        Commands::Clickables { snapshot, start_index, mark } => {
            let dom = load_snapshot(&snapshot, &config)?;
            let mut options = config.collect_options();
            if let Some(start) = start_index {
                options.start_index = start;
            }
            let report = collect_clickables(&dom, &options);
            if mark {
                let stamped = apply_markers(&dom, &report.markers, &config.markers.attr);
                info!(stamped, attr = %config.markers.attr, "markers applied");
            }
            print_report(&report)
        }
        Commands::ScrollPage { snapshot, direction, to_edge, delta } => {
            let dom = load_snapshot(&snapshot, &config)?;
            let req = PageScrollRequest { direction, to_edge, delta };
            print_report(&scroll_page(&dom, &dom, &req).await)
        }
        Commands::ScrollAt { snapshot, x, y, direction, to_edge, pixel_delta } => {
            let dom = load_snapshot(&snapshot, &config)?;
            let req = PointScrollRequest { x, y, direction, to_edge, pixel_delta };
            print_report(&scroll_at_point(&dom, &dom, &req).await)
        }
        Commands::ScrollNested {
            snapshot,
            direction,
            to_edge,
            pixel_delta,
            x,
            y,
            largest,
            min_ratio,
        } => {
            let dom = load_snapshot(&snapshot, &config)?;
            let req = NestedScrollRequest {
                direction,
                to_edge,
                pixel_delta,
                target_point: x.zip(y),
                prefer_largest: largest,
                min_viewport_ratio: min_ratio,
            };
            print_report(&scroll_nested(&dom, &dom, &req).await)
        }
        Commands::Detect { snapshot } => {
            let dom = load_snapshot(&snapshot, &config)?;
            print_report(&detect_blockers(&dom))
        }
        Commands::Survey { snapshot, below } => {
            let dom = load_snapshot(&snapshot, &config)?;
            let report = SurveyReport {
                metrics: page_metrics(&dom),
                content_below: below.map(|threshold| content_below(&dom, threshold)),
                vertical: global_scroll_status(&dom, Axis::Y),
                has_large_scrollable: has_large_scrollable(&dom),
            };
            print_report(&report)
        }
    }
}

/// The survey bundle a scroll planner reads between moves.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SurveyReport {
    metrics: PageMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    content_below: Option<bool>,
    vertical: GlobalScrollStatus,
    has_large_scrollable: bool,
}

fn load_snapshot(path: &Path, config: &Config) -> Result<MemoryDom> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let dom = match config.viewport {
        Some(viewport) => {
            let mut capture: PageCapture = serde_json::from_str(&json)
                .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
            capture.viewport = viewport;
            MemoryDom::from_capture(capture)?
        }
        None => MemoryDom::from_json(&json)?,
    };
    info!(url = dom.url(), "snapshot loaded");
    Ok(dom)
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
