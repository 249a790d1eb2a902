//! Registry of elements currently carrying a counter-filter. Keys are held
//! weakly: a registered element that has since been removed from its document
//! is pruned the next time the registry is walked, so the registry never
//! keeps detached subtrees reachable.

use anyhow::Result;
use dom::{Document, NodeKey};
use log::trace;

use crate::set_local_filter;

/// Tracks which elements hold a counter-filter, deduplicating nested
/// registrations so only the outermost element in any ancestor chain keeps
/// its filter.
#[derive(Debug, Default)]
pub struct InvertedRegistry {
    entries: Vec<NodeKey>,
    pruned_total: u64,
}

impl InvertedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `node` as counter-filtered and write `filter` onto it, unless
    /// an already-registered ancestor covers it. Covered nodes get their
    /// local filter cleared instead. Returns whether the node now holds its
    /// own registration.
    ///
    /// Every call walks the registry once, dropping entries whose nodes have
    /// died or been disconnected since they were registered.
    pub fn register(
        &mut self,
        doc: &mut Document,
        node: NodeKey,
        filter: Option<&str>,
    ) -> Result<bool> {
        self.entries.retain(|key| *key != node);

        let mut covered = false;
        let mut kept = Vec::with_capacity(self.entries.len());
        for key in self.entries.drain(..) {
            if !doc.is_alive(key) || !doc.is_connected(key) {
                self.pruned_total += 1;
                trace!("pruning stale counter-filter entry {key:?}");
                continue;
            }
            if doc.contains(key, node) {
                covered = true;
            }
            kept.push(key);
        }
        self.entries = kept;

        if covered {
            set_local_filter(doc, node, None)?;
            return Ok(false);
        }

        set_local_filter(doc, node, filter)?;
        self.entries.push(node);
        Ok(true)
    }

    /// Drop `node` from the registry and clear its local filter. Returns
    /// whether anything changed on the node or in the registry.
    pub fn unregister(&mut self, doc: &mut Document, node: NodeKey) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|key| *key != node);
        let had_entry = self.entries.len() != before;
        let cleared = set_local_filter(doc, node, None)?;
        Ok(had_entry || cleared)
    }

    /// Clear every registered filter and empty the registry. Dead nodes are
    /// skipped silently.
    pub fn clear_all(&mut self, doc: &mut Document) -> Result<()> {
        for key in std::mem::take(&mut self.entries) {
            if doc.is_alive(key) {
                set_local_filter(doc, key, None)?;
            }
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, node: NodeKey) -> bool {
        self.entries.contains(&node)
    }

    #[inline]
    pub fn entries(&self) -> &[NodeKey] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries dropped by lazy pruning since construction.
    #[inline]
    pub fn pruned_total(&self) -> u64 {
        self.pruned_total
    }
}
