//! Element exemption policy. Decides which elements must be counter-filtered
//! out of the page-wide invert, and applies the decision through the
//! registry.

use anyhow::Result;
use dom::{Document, NodeKey};
use log::trace;
use style::StyleResolver;

use crate::{DarkModeConfig, InvertedRegistry, classify_light};

/// Why an element was exempted from the page-wide invert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    /// Media-like content that must always render with original colors.
    MustRevert,
    /// A background-bearing container whose own background is already dark.
    DarkBackground,
    /// An element painting an image background.
    UrlBackground,
}

/// Evaluate the exemption rules for one element, first match wins. Returns
/// `None` when the element should follow the page-wide invert.
pub fn evaluate(
    doc: &Document,
    styles: &StyleResolver,
    config: &DarkModeConfig,
    node: NodeKey,
) -> Option<Exemption> {
    // The page filter lives on the root element; counter-filtering it would
    // cancel the page inversion outright.
    if Some(node) == doc.document_element() {
        return None;
    }
    let tag = doc.tag(node)?;

    if config.must_revert_tags.contains(tag) {
        return Some(Exemption::MustRevert);
    }
    if config.background_bearing_tags.contains(tag)
        && !classify_light(styles.background_color(doc, node))
    {
        return Some(Exemption::DarkBackground);
    }
    if styles.has_url_background(doc, node) {
        return Some(Exemption::UrlBackground);
    }
    None
}

/// Evaluate `node` and bring its registration in line with the verdict.
/// Detached or dead nodes are skipped. Returns the exemption applied, if any.
pub fn enforce(
    doc: &mut Document,
    styles: &StyleResolver,
    registry: &mut InvertedRegistry,
    config: &DarkModeConfig,
    enabled: bool,
    node: NodeKey,
) -> Result<Option<Exemption>> {
    if !doc.is_alive(node) || !doc.is_connected(node) {
        return Ok(None);
    }

    match evaluate(doc, styles, config, node) {
        Some(reason) => {
            let filter = enabled.then_some(config.counter_filter.as_str());
            registry.register(doc, node, filter)?;
            trace!("exempting {node:?} from inversion: {reason:?}");
            Ok(Some(reason))
        }
        None => {
            // Only touch elements this engine previously filtered. An author
            // `filter` on an element that was never registered stays intact.
            if registry.contains(node) {
                registry.unregister(doc, node)?;
            }
            Ok(None)
        }
    }
}
