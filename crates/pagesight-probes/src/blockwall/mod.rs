//! Block and CAPTCHA wall detection.
//!
//! The detector answers one question: is something on this page stopping
//! an automated session right now? Widgets that merely exist, like a
//! recaptcha v3 badge in a corner, must not trigger it. Probes therefore
//! check visibility, size, and position, not just presence.
//!
//! Probes run in a fixed order and feed a monotonic-max reducer: the
//! highest-confidence finding names the wall, later equal or weaker
//! findings only add evidence lines.

mod signals;
mod verdict;
mod vis;

use pagesight_dom::PageDom;
use tracing::debug;

pub use verdict::{BlockKind, BlockVerdict};

use signals::PageText;
use verdict::Tally;

/// Run the full probe battery against a page.
pub fn detect_blockers<D: PageDom>(dom: &D) -> BlockVerdict {
    let text = PageText::capture(dom);
    let battery = [
        signals::cloudflare_challenge_title(&text),
        signals::cloudflare_block_text(&text),
        signals::cloudflare_challenge_form(dom),
        signals::cloudflare_turnstile(dom),
        signals::recaptcha_checkbox(dom),
        signals::recaptcha_iframes(dom),
        signals::recaptcha_text(&text),
        signals::hcaptcha_widget(dom),
        signals::funcaptcha_widget(dom),
        signals::aws_title(&text),
        signals::aws_containers(dom),
        signals::geetest_widget(dom),
        signals::datadome_widget(dom),
        signals::datadome_text(&text),
        signals::access_blocked_text(&text),
        signals::sucuri_text(&text),
        signals::forbidden_403(&text),
        signals::device_verification_text(&text),
        signals::reddit_block(dom),
    ];
    let mut tally = Tally::default();
    for signal in battery {
        tally.absorb_opt(signal);
    }

    if tally.detected && tally.confidence >= 70 && vis::has_blocking_overlay(dom) {
        tally.confidence = (tally.confidence + 5).min(100);
        tally.indicators.push("overlay: blocking overlay detected".to_string());
    }

    let result = tally.into_verdict(dom.url());
    debug!(
        detected = result.detected,
        kind = ?result.kind,
        confidence = result.confidence,
        "wall detection finished"
    );
    result
}

#[cfg(test)]
#[path = "blockwall_tests.rs"]
mod tests;
