//! Verdict types and the confidence reducer.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// The wall families the detector can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    None,
    CloudflareChallenge,
    CloudflareBlock,
    CloudflareTurnstile,
    RecaptchaV2,
    Recaptcha,
    Hcaptcha,
    Funcaptcha,
    AwsCaptcha,
    Geetest,
    Datadome,
    AccessBlocked,
    SucuriFirewall,
    #[serde(rename = "access_denied_403")]
    AccessDenied403,
    DeviceVerification,
    RedditSecurityBlock,
}

/// The detector's answer for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockVerdict {
    pub detected: bool,
    #[serde(rename = "type")]
    pub kind: BlockKind,
    /// 0 to 100. Zero exactly when nothing was detected.
    pub confidence: u8,
    /// Human-readable evidence lines, strongest finding first.
    pub indicators: Vec<String>,
    pub url: String,
    /// RFC 3339 with millisecond precision.
    pub timestamp: String,
}

/// One piece of evidence from a probe.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Signal {
    pub kind: BlockKind,
    pub confidence: u8,
    pub indicator: String,
}

/// Monotonic-max fold over signals. A stronger signal replaces the
/// verdict and restarts the evidence list; equal or weaker signals only
/// add evidence, and weaker ones only once something is detected.
#[derive(Debug, Default)]
pub(super) struct Tally {
    pub detected: bool,
    pub kind: Option<BlockKind>,
    pub confidence: u8,
    pub indicators: Vec<String>,
}

impl Tally {
    pub(super) fn absorb(&mut self, signal: Signal) {
        if signal.confidence > self.confidence {
            self.detected = true;
            self.kind = Some(signal.kind);
            self.confidence = signal.confidence;
            self.indicators = vec![signal.indicator];
        } else if signal.confidence == self.confidence {
            self.detected = true;
            self.indicators.push(signal.indicator);
        } else if self.detected {
            self.indicators.push(signal.indicator);
        }
    }

    pub(super) fn absorb_opt(&mut self, signal: Option<Signal>) {
        if let Some(s) = signal {
            self.absorb(s);
        }
    }

    pub(super) fn into_verdict(self, url: &str) -> BlockVerdict {
        let kind = if self.detected { self.kind.unwrap_or(BlockKind::None) } else { BlockKind::None };
        BlockVerdict {
            detected: self.detected,
            kind,
            confidence: self.confidence,
            indicators: self.indicators,
            url: url.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
