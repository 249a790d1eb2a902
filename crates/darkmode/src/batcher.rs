//! Mutation batching. Observed DOM mutations are coalesced into a pending
//! set and re-evaluated in one drain pass, so a burst of mutations costs one
//! pass instead of one evaluation per record.

use std::collections::{HashSet, VecDeque};

use dom::{Document, MutationRecord, NodeKey};
use log::{debug, warn};
use style::StyleResolver;

use crate::{DarkModeConfig, InvertedRegistry, policy};

/// Whether a drain pass is currently owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainState {
    Idle,
    Draining,
}

/// Outcome of one drain pass.
#[derive(Debug, Default)]
pub struct DrainReport {
    /// Elements evaluated this pass.
    pub processed: usize,
    /// Elements that ended the pass exempted from the page invert.
    pub exempted: usize,
    /// Elements whose evaluation failed and was skipped.
    pub failures: usize,
    /// Shadow hosts discovered this pass that were not tracked before.
    pub shadow_hosts: Vec<NodeKey>,
}

/// Coalesces mutation records into a deduplicated pending set and drains it
/// in scheduled passes.
#[derive(Debug)]
pub struct MutationBatcher {
    pending_queue: VecDeque<NodeKey>,
    pending_set: HashSet<NodeKey>,
    category_tags: HashSet<String>,
    state: DrainState,
    shadow_tracked: HashSet<NodeKey>,
    perf_scheduled_passes: u64,
    perf_drain_passes: u64,
    perf_processed_total: u64,
    perf_isolated_failures: u64,
}

impl MutationBatcher {
    /// `category_tags` selects which descendant tags of an inserted subtree
    /// get enqueued alongside the insertion target.
    pub fn new(category_tags: HashSet<String>) -> Self {
        Self {
            pending_queue: VecDeque::new(),
            pending_set: HashSet::new(),
            category_tags,
            state: DrainState::Idle,
            shadow_tracked: HashSet::new(),
            perf_scheduled_passes: 0,
            perf_drain_passes: 0,
            perf_processed_total: 0,
            perf_isolated_failures: 0,
        }
    }

    /// Fold a batch of mutation records into the pending set. Returns whether
    /// this call scheduled a new drain pass.
    pub fn observe(&mut self, doc: &Document, records: &[MutationRecord]) -> bool {
        for record in records {
            self.enqueue(record.target());
            for &added in record.added() {
                self.enqueue(added);
                // New subtrees arrive as one record for the insertion root.
                // Pull out the descendants the policy cares about so nested
                // media and containers get their own evaluation.
                for descendant in doc.descendants_with_tags(added, &self.category_tags) {
                    self.enqueue(descendant);
                }
            }
        }

        if self.state == DrainState::Idle && !self.pending_queue.is_empty() {
            self.state = DrainState::Draining;
            self.perf_scheduled_passes += 1;
            return true;
        }
        false
    }

    fn enqueue(&mut self, node: NodeKey) {
        if self.pending_set.insert(node) {
            self.pending_queue.push_back(node);
        }
    }

    /// Run one drain pass over the nodes pending at entry. Nodes enqueued by
    /// the pass itself stay pending for the next one. Per-node failures are
    /// logged and skipped so one bad element cannot stall the rest.
    pub fn drain(
        &mut self,
        doc: &mut Document,
        styles: &StyleResolver,
        registry: &mut InvertedRegistry,
        config: &DarkModeConfig,
        enabled: bool,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        if self.state != DrainState::Draining {
            return report;
        }

        let batch = std::mem::take(&mut self.pending_queue);
        self.pending_set.clear();
        self.perf_drain_passes += 1;

        for node in batch {
            match policy::enforce(doc, styles, registry, config, enabled, node) {
                Ok(outcome) => {
                    if outcome.is_some() {
                        report.exempted += 1;
                    }
                }
                Err(error) => {
                    warn!("dark mode evaluation failed for {node:?}: {error:#}");
                    report.failures += 1;
                    self.perf_isolated_failures += 1;
                }
            }
            report.processed += 1;
            self.perf_processed_total += 1;

            if self.track_shadow_host(doc, node) {
                report.shadow_hosts.push(node);
            }
        }

        if self.pending_queue.is_empty() {
            self.state = DrainState::Idle;
        } else {
            debug!(
                "drain pass left {} node(s) pending, keeping a pass scheduled",
                self.pending_queue.len()
            );
            self.perf_scheduled_passes += 1;
        }
        report
    }

    /// Record `node` as a tracked shadow host if it is a custom element with
    /// an attached shadow root. Returns whether it is newly tracked. Tracking
    /// is monotonic: entries survive resets and disablement.
    pub fn track_shadow_host(&mut self, doc: &Document, node: NodeKey) -> bool {
        let is_custom_host = doc
            .tag(node)
            .is_some_and(|tag| tag.contains('-') && doc.shadow_root(node).is_some());
        if !is_custom_host {
            return false;
        }
        self.shadow_tracked.insert(node)
    }

    /// Drop everything pending and return to idle. Shadow host tracking is
    /// monotonic and survives the reset.
    pub fn reset_pending(&mut self) {
        self.pending_queue.clear();
        self.pending_set.clear();
        self.state = DrainState::Idle;
    }

    #[inline]
    pub fn state(&self) -> DrainState {
        self.state
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.state == DrainState::Draining
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending_queue.len()
    }

    #[inline]
    pub fn is_shadow_tracked(&self, node: NodeKey) -> bool {
        self.shadow_tracked.contains(&node)
    }

    #[inline]
    pub fn shadow_tracked_len(&self) -> usize {
        self.shadow_tracked.len()
    }

    /// Passes scheduled since construction.
    #[inline]
    pub fn scheduled_passes(&self) -> u64 {
        self.perf_scheduled_passes
    }

    /// Drain passes actually run since construction.
    #[inline]
    pub fn drain_passes(&self) -> u64 {
        self.perf_drain_passes
    }

    /// Nodes evaluated across all drain passes.
    #[inline]
    pub fn processed_total(&self) -> u64 {
        self.perf_processed_total
    }

    /// Per-node evaluation failures skipped across all drain passes.
    #[inline]
    pub fn isolated_failures(&self) -> u64 {
        self.perf_isolated_failures
    }
}
