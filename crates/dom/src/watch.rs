use crate::{Document, NodeKey};
use log::trace;
use tokio::sync::broadcast;

/// One observed document change.
#[derive(Debug, Clone)]
pub enum MutationRecord {
    /// Children were added to or removed from `target`.
    ChildList {
        target: NodeKey,
        added: Vec<NodeKey>,
        removed: Vec<NodeKey>,
    },
    /// An attribute of `target` changed (set or removed).
    Attribute { target: NodeKey, name: String },
}

impl MutationRecord {
    /// The node the change happened on.
    #[inline]
    pub fn target(&self) -> NodeKey {
        match self {
            MutationRecord::ChildList { target, .. } | MutationRecord::Attribute { target, .. } => {
                *target
            }
        }
    }

    /// Nodes structurally added by this record, if any.
    pub fn added(&self) -> &[NodeKey] {
        match self {
            MutationRecord::ChildList { added, .. } => added.as_slice(),
            MutationRecord::Attribute { .. } => &[],
        }
    }
}

/// Which changes a watcher wants to see.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Accept changes anywhere below the watch root, not just on it.
    pub subtree: bool,
    /// Accept child-list changes.
    pub child_list: bool,
    /// Accept attribute changes.
    pub attributes: bool,
    /// When non-empty, only these attribute names pass the filter.
    pub attribute_filter: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            subtree: true,
            child_list: true,
            attributes: true,
            attribute_filter: Vec::new(),
        }
    }
}

/// A scoped, filtered subscription to a document's mutation records.
///
/// Collection is pull-based and never blocks: hosts call [`DomWatcher::collect`]
/// at their own pace and feed the result to whatever consumes changes.
#[derive(Debug)]
pub struct DomWatcher {
    receiver: broadcast::Receiver<Vec<MutationRecord>>,
    root: NodeKey,
    config: WatchConfig,
}

impl DomWatcher {
    pub(crate) fn new(
        receiver: broadcast::Receiver<Vec<MutationRecord>>,
        root: NodeKey,
        config: WatchConfig,
    ) -> Self {
        Self {
            receiver,
            root,
            config,
        }
    }

    /// The node this watcher is scoped to.
    #[inline]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Drain every record published since the last call, keeping the ones
    /// that pass the kind, attribute-name, and scope filters. A receiver that
    /// lagged past the channel capacity skips ahead.
    pub fn collect(&mut self, doc: &Document) -> Vec<MutationRecord> {
        use tokio::sync::broadcast::error::TryRecvError;
        let mut out = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(batch) => {
                    for record in batch {
                        if self.accepts(doc, &record) {
                            out.push(record);
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    trace!("mutation watcher lagged, skipped {skipped} records");
                    continue;
                }
                Err(TryRecvError::Closed) => break,
            }
        }
        out
    }

    fn accepts(&self, doc: &Document, record: &MutationRecord) -> bool {
        match record {
            MutationRecord::ChildList { .. } if !self.config.child_list => return false,
            MutationRecord::Attribute { name, .. } => {
                if !self.config.attributes {
                    return false;
                }
                if !self.config.attribute_filter.is_empty()
                    && !self.config.attribute_filter.iter().any(|f| f == name)
                {
                    return false;
                }
            }
            MutationRecord::ChildList { .. } => {}
        }
        let target = record.target();
        if target == self.root {
            return true;
        }
        self.config.subtree && doc.contains(self.root, target)
    }
}
