//! Selective dark-mode engine: a page-level inversion filter plus an
//! incremental pipeline that exempts media elements and already-dark regions
//! so they are not visually broken by the inversion.
//!
//! The flow is controller-driven: [`DarkModeController::enable`] applies the
//! page filter, seeds exemptions over the current tree, and attaches a
//! mutation watch; subsequent DOM changes are coalesced by
//! [`MutationBatcher`] and drained through the exclusion policy, which keeps
//! [`InvertedRegistry`] and the elements' local filters up to date.

use anyhow::Result;
use dom::{Document, NodeKey};
use style::with_style_property;

mod batcher;
mod config;
mod controller;
mod luminance;
mod policy;
mod registry;
mod store;

pub use batcher::{DrainReport, DrainState, MutationBatcher};
pub use config::DarkModeConfig;
pub use controller::{DarkModeController, PumpOutcome};
pub use luminance::{LIGHT_THRESHOLD, classify_light, composite_over_white, perceived_luminance};
pub use policy::{Exemption, enforce, evaluate};
pub use registry::InvertedRegistry;
pub use store::{MemoryStore, PreferenceStore};

/// Set or clear the `filter` property inside an element's style attribute.
///
/// Returns whether the attribute was actually written; writes that would not
/// change the property are skipped, so they emit no mutation record and the
/// drain-evaluate-write loop settles instead of echoing.
pub(crate) fn set_local_filter(
    doc: &mut Document,
    node: NodeKey,
    value: Option<&str>,
) -> Result<bool> {
    let attr = doc
        .attribute(node, "style")
        .map(str::to_owned)
        .unwrap_or_default();
    match with_style_property(&attr, "filter", value) {
        Some(updated) => {
            doc.set_attribute(node, "style", &updated)?;
            Ok(true)
        }
        None => Ok(false),
    }
}
