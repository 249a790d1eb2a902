//! Global toggle controller. Owns the registry, the batcher, the mutation
//! watches, and the persisted preference, and drives the whole pipeline
//! through enable/disable/pump.

use anyhow::{Result, bail};
use dom::{Document, DomWatcher, MutationRecord, NodeKey, WatchConfig};
use log::{debug, info, warn};
use style::StyleResolver;

use crate::{
    DarkModeConfig, InvertedRegistry, MutationBatcher, PreferenceStore, policy, set_local_filter,
};

/// What one `pump` call accomplished.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpOutcome {
    /// Elements evaluated by this pump's drain pass.
    pub processed: usize,
    /// Elements that ended the pass exempted from the page invert.
    pub exempted: usize,
    /// Elements whose evaluation failed and was skipped.
    pub failures: usize,
    /// Whether another drain pass remains scheduled after this pump.
    pub scheduled: bool,
}

/// Drives the page-wide dark mode effect over one document.
pub struct DarkModeController {
    config: DarkModeConfig,
    store: Box<dyn PreferenceStore>,
    registry: InvertedRegistry,
    batcher: MutationBatcher,
    watches: Vec<DomWatcher>,
    enabled: bool,
}

impl DarkModeController {
    pub fn new(config: DarkModeConfig, store: Box<dyn PreferenceStore>) -> Self {
        let batcher = MutationBatcher::new(config.category_tags());
        Self {
            config,
            store,
            registry: InvertedRegistry::new(),
            batcher,
            watches: Vec::new(),
            enabled: false,
        }
    }

    /// Restore the persisted preference. A stored `"true"` enables the
    /// effect immediately; anything else leaves it off.
    pub fn initialize(&mut self, doc: &mut Document, styles: &StyleResolver) -> Result<()> {
        let stored = self.store.read(&self.config.preference_key);
        debug!("stored dark mode preference: {stored:?}");
        if stored.as_deref() == Some("true") {
            self.enable(doc, styles)?;
        }
        Ok(())
    }

    /// Turn the effect on: persist the preference, apply the page filter to
    /// the root element, seed the registry from every element currently under
    /// the body, then start watching for mutations. Watches attach after the
    /// seed pass so the seed's own filter writes do not echo into the
    /// batcher. Idempotent while already enabled.
    pub fn enable(&mut self, doc: &mut Document, styles: &StyleResolver) -> Result<()> {
        if self.enabled {
            return Ok(());
        }
        let Some(root) = doc.document_element() else {
            bail!("document has no root element to carry the page filter");
        };
        self.enabled = true;
        self.store.write(&self.config.preference_key, "true");
        set_local_filter(doc, root, Some(&self.config.page_filter))?;

        let scope = doc.body().unwrap_or(root);
        let mut hosts = Vec::new();
        for node in doc.descendant_elements(scope) {
            if let Err(error) =
                policy::enforce(doc, styles, &mut self.registry, &self.config, true, node)
            {
                warn!("seed evaluation failed for {node:?}: {error:#}");
            }
            // Watches were dropped on the last disable, so every tracked host
            // in the tree needs its shadow watch back, not just new ones.
            self.batcher.track_shadow_host(doc, node);
            if self.batcher.is_shadow_tracked(node) {
                hosts.push(node);
            }
        }

        self.watches.push(doc.watch(scope, watch_config()));
        self.attach_shadow_watches(doc, &hosts);

        info!(
            "dark mode enabled, {} element(s) counter-filtered at seed",
            self.registry.len()
        );
        Ok(())
    }

    /// Turn the effect off: stop watching, clear every counter-filter and the
    /// page filter, drop pending work, and persist the preference. Shadow
    /// host tracking is monotonic and survives the disable. Idempotent while
    /// already disabled.
    pub fn disable(&mut self, doc: &mut Document) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        self.watches.clear();
        self.registry.clear_all(doc)?;
        if let Some(root) = doc.document_element() {
            set_local_filter(doc, root, None)?;
        }
        self.batcher.reset_pending();
        self.enabled = false;
        self.store.write(&self.config.preference_key, "false");
        info!("dark mode disabled");
        Ok(())
    }

    /// Flip the effect and return the new state.
    pub fn toggle(&mut self, doc: &mut Document, styles: &StyleResolver) -> Result<bool> {
        if self.enabled {
            self.disable(doc)?;
        } else {
            self.enable(doc, styles)?;
        }
        Ok(self.enabled)
    }

    /// Collect pending mutation records, run at most one drain pass, and
    /// queue any records the pass itself produced for the next pump. Returns
    /// what the pass did and whether more work remains scheduled.
    pub fn pump(&mut self, doc: &mut Document, styles: &StyleResolver) -> Result<PumpOutcome> {
        let mut outcome = PumpOutcome::default();
        if !self.enabled {
            return Ok(outcome);
        }

        let records = self.collect_records(doc);
        self.batcher.observe(doc, &records);

        let report = self
            .batcher
            .drain(doc, styles, &mut self.registry, &self.config, self.enabled);
        outcome.processed = report.processed;
        outcome.exempted = report.exempted;
        outcome.failures = report.failures;
        self.attach_shadow_watches(doc, &report.shadow_hosts);

        // The drain's own filter writes come back as attribute records.
        // Queue them now; re-evaluating them next pump is a no-op write, so
        // the pipeline settles instead of echoing forever.
        let echoes = self.collect_records(doc);
        self.batcher.observe(doc, &echoes);

        outcome.scheduled = self.batcher.is_scheduled();
        Ok(outcome)
    }

    fn collect_records(&mut self, doc: &Document) -> Vec<MutationRecord> {
        let mut records = Vec::new();
        for watch in &mut self.watches {
            records.extend(watch.collect(doc));
        }
        records
    }

    fn attach_shadow_watches(&mut self, doc: &Document, hosts: &[NodeKey]) {
        for &host in hosts {
            if let Some(shadow) = doc.shadow_root(host) {
                debug!("watching shadow root of {host:?}");
                self.watches.push(doc.watch(shadow, watch_config()));
            }
        }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn registry(&self) -> &InvertedRegistry {
        &self.registry
    }

    #[inline]
    pub fn batcher(&self) -> &MutationBatcher {
        &self.batcher
    }

    #[inline]
    pub fn config(&self) -> &DarkModeConfig {
        &self.config
    }

    #[inline]
    pub fn store(&self) -> &dyn PreferenceStore {
        self.store.as_ref()
    }
}

fn watch_config() -> WatchConfig {
    WatchConfig {
        subtree: true,
        child_list: true,
        attributes: true,
        attribute_filter: vec!["style".to_string(), "class".to_string()],
    }
}
