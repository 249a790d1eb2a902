//! Arena-backed document model and mutation watching primitives.
//! This crate centralizes the node store and change-notification plumbing that
//! the style resolver, the dark-mode engine, and the HTML loader share.

use std::collections::HashMap;

mod document;
mod node;
mod watch;

pub use document::Document;
pub use node::{ElementData, NodeData};
pub use watch::{DomWatcher, MutationRecord, WatchConfig};

// ============================
// Stable node keys
// ============================

/// A 64-bit stable key for document nodes.
///
/// Keys are minted from a monotonic counter and never reused, so holding a key
/// weakly is safe: a key absent from the arena is a node that no longer
/// exists, never a recycled slot pointing at an unrelated node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct NodeKey(pub u64);

impl NodeKey {
    /// The document node key (always present).
    pub const DOCUMENT: NodeKey = NodeKey(0);
}

/// Mints fresh NodeKeys for one document.
#[derive(Debug)]
pub(crate) struct KeyMinter {
    next: u64,
}

impl KeyMinter {
    pub(crate) fn new() -> Self {
        // 0 is reserved for the document node.
        Self { next: 1 }
    }

    #[inline]
    pub(crate) fn mint(&mut self) -> NodeKey {
        let key = NodeKey(self.next);
        self.next += 1;
        key
    }
}

/// Convenience alias for the arena's backing map.
pub(crate) type NodeMap = HashMap<NodeKey, document::NodeRecord>;
