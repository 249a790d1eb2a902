//! Session layer tying the pieces together: parse a page, build its style
//! resolver, and drive the dark mode controller over the live document.

use anyhow::Result;
use darkmode::{DarkModeConfig, DarkModeController, PreferenceStore, PumpOutcome};
use dom::Document;
use log::debug;
use style::StyleResolver;
use tracing::info_span;

mod store;

pub use store::JsonFileStore;

/// One loaded page plus the dark mode machinery attached to it.
pub struct PageSession {
    doc: Document,
    styles: StyleResolver,
    dark: DarkModeController,
}

impl PageSession {
    /// Parse `markup` and `stylesheet`, then restore the persisted
    /// preference; a stored `"true"` turns the effect on before this returns.
    pub fn new(
        markup: &str,
        stylesheet: &str,
        config: DarkModeConfig,
        store: Box<dyn PreferenceStore>,
    ) -> Result<Self> {
        let doc = html::parse_document(markup)?;
        let styles = StyleResolver::from_css(stylesheet);
        debug!(
            "page loaded: {} node(s), {} rule(s)",
            doc.node_count(),
            styles.rule_count()
        );
        let mut session = Self {
            doc,
            styles,
            dark: DarkModeController::new(config, store),
        };
        session.dark.initialize(&mut session.doc, &session.styles)?;
        Ok(session)
    }

    pub fn enable(&mut self) -> Result<()> {
        self.dark.enable(&mut self.doc, &self.styles)
    }

    pub fn disable(&mut self) -> Result<()> {
        self.dark.disable(&mut self.doc)
    }

    /// Flip the effect and return the new state.
    pub fn toggle(&mut self) -> Result<bool> {
        self.dark.toggle(&mut self.doc, &self.styles)
    }

    /// Run one observation/drain cycle.
    pub fn pump(&mut self) -> Result<PumpOutcome> {
        let _span = info_span!("page.pump").entered();
        self.dark.pump(&mut self.doc, &self.styles)
    }

    /// Pump until nothing remains scheduled, bounded by `max_pumps`. Returns
    /// whether the pipeline settled within that many pumps.
    pub fn pump_until_settled(&mut self, max_pumps: usize) -> Result<bool> {
        for _ in 0..max_pumps {
            let outcome = self.pump()?;
            if !outcome.scheduled && outcome.processed == 0 {
                return Ok(true);
            }
        }
        debug!("pipeline still busy after {max_pumps} pump(s)");
        Ok(false)
    }

    #[inline]
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access for hosts driving DOM changes between pumps.
    #[inline]
    pub fn doc_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    #[inline]
    pub fn styles(&self) -> &StyleResolver {
        &self.styles
    }

    #[inline]
    pub fn dark(&self) -> &DarkModeController {
        &self.dark
    }
}
