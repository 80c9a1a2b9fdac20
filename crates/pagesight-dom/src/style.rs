//! Computed style strings and CSS value parsing.

use serde::{Deserialize, Serialize};

/// The subset of computed style an analyzer consults, kept as raw CSS
/// strings exactly as a layout engine reports them.
///
/// Missing fields deserialize to browser defaults, so sparse snapshots
/// describe only what deviates from a plain visible block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub pointer_events: String,
    pub opacity: String,
    pub position: String,
    pub z_index: String,
    pub overflow_x: String,
    pub overflow_y: String,
    pub object_fit: String,
    pub background_color: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            pointer_events: "auto".to_string(),
            opacity: "1".to_string(),
            position: "static".to_string(),
            z_index: "auto".to_string(),
            overflow_x: "visible".to_string(),
            overflow_y: "visible".to_string(),
            object_fit: "fill".to_string(),
            background_color: "rgba(0, 0, 0, 0)".to_string(),
        }
    }
}

impl ComputedStyle {
    pub fn display_none(&self) -> bool {
        self.display == "none"
    }

    /// Opacity as a number, or None when the string has no leading digits.
    pub fn opacity_value(&self) -> Option<f64> {
        parse_float_prefix(&self.opacity)
    }

    /// z-index as an integer. "auto" parses to None.
    pub fn z_index_value(&self) -> Option<i64> {
        parse_int_prefix(&self.z_index)
    }
}

/// Parse a leading decimal number out of a CSS value string, ignoring any
/// trailing unit ("12px" parses to 12.0). Returns None when no digits lead
/// the string.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut has_digits = i > int_start;
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        has_digits = has_digits || i > frac_start;
    }
    if !has_digits {
        return None;
    }
    let mut end = i;
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+') | Some(b'-')) {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            end = j;
        }
    }
    t[..end].parse().ok()
}

/// Parse a leading base-10 integer, ignoring any trailing text. Returns
/// None when no digits lead the string ("auto", "").
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let bytes = t.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        i += 1;
    }
    let digit_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digit_start {
        return None;
    }
    t[..i].parse().ok()
}

#[cfg(test)]
#[path = "style_tests.rs"]
mod tests;
