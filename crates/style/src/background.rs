//! Utilities over background property values: comma-separated layer
//! splitting, `url(...)` detection, and color extraction from the
//! `background` shorthand.

use crate::color::{Rgba, parse_css_color};

/// Split a value on top-level commas, ignoring commas inside parentheses
/// (so `rgb(0, 0, 0)` or data URIs stay in one layer).
pub fn split_layers(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (index, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(value[start..index].trim());
                start = index + 1;
            }
            _ => {}
        }
    }
    out.push(value[start..].trim());
    out
}

/// Whether any layer of the value declares a `url(...)` image.
pub fn declares_url_layer(value: &str) -> bool {
    split_layers(value)
        .iter()
        .any(|layer| layer.contains("url("))
}

/// Extract a color from a `background` shorthand value: the first
/// whitespace-separated top-level token that parses as a color.
pub fn shorthand_color(value: &str) -> Option<Rgba> {
    split_top_level_tokens(value)
        .into_iter()
        .find_map(parse_css_color)
}

/// Split on top-level whitespace, keeping function arguments together.
fn split_top_level_tokens(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (index, ch) in value.char_indices() {
        match ch {
            '(' => {
                depth += 1;
                if start.is_none() {
                    start = Some(index);
                }
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(from) = start.take() {
                    out.push(&value[from..index]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(index);
                }
            }
        }
    }
    if let Some(from) = start {
        out.push(&value[from..]);
    }
    out
}
