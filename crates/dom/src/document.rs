use crate::node::{ElementData, NodeData};
use crate::watch::{DomWatcher, MutationRecord, WatchConfig};
use crate::{KeyMinter, NodeKey, NodeMap};
use anyhow::{Result, bail};
use std::collections::HashSet;
use tokio::sync::broadcast;

/// Sized for large insertion bursts; a watcher that falls further behind than
/// this skips ahead and relies on later records to re-converge.
const RECORD_CHANNEL_CAPACITY: usize = 4096;

/// One arena slot: payload plus tree links.
#[derive(Debug, Clone)]
pub(crate) struct NodeRecord {
    pub(crate) data: NodeData,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

/// Arena-backed document. Every mutating operation validates its inputs,
/// applies the change, and fans a [`MutationRecord`] out to watchers.
#[derive(Debug)]
pub struct Document {
    nodes: NodeMap,
    minter: KeyMinter,
    records: broadcast::Sender<Vec<MutationRecord>>,
}

impl Document {
    /// Create a document containing only the document node.
    pub fn new() -> Self {
        let (records, _) = broadcast::channel(RECORD_CHANNEL_CAPACITY);
        let mut nodes = NodeMap::new();
        nodes.insert(
            NodeKey::DOCUMENT,
            NodeRecord {
                data: NodeData::Document,
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            minter: KeyMinter::new(),
            records,
        }
    }

    // ============================
    // Node creation and structure
    // ============================

    /// Create a detached element. No record is emitted until it is attached.
    pub fn create_element(&mut self, tag: &str) -> NodeKey {
        self.insert_record(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeKey {
        self.insert_record(NodeData::Text(text.to_string()))
    }

    fn insert_record(&mut self, data: NodeData) -> NodeKey {
        let key = self.minter.mint();
        self.nodes.insert(
            key,
            NodeRecord {
                data,
                parent: None,
                children: Vec::new(),
            },
        );
        key
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first. Both detach and attach emit child-list records.
    pub fn append_child(&mut self, parent: NodeKey, child: NodeKey) -> Result<()> {
        self.attach_at(parent, child, None)
    }

    /// Insert `child` immediately before `sibling` under the sibling's parent.
    pub fn insert_before(&mut self, sibling: NodeKey, child: NodeKey) -> Result<()> {
        let Some(parent) = self.parent(sibling) else {
            bail!("sibling {sibling:?} has no parent to insert under");
        };
        let index = self
            .nodes
            .get(&parent)
            .and_then(|rec| rec.children.iter().position(|key| *key == sibling));
        let Some(index) = index else {
            bail!("sibling {sibling:?} is not listed under its parent");
        };
        self.attach_at(parent, child, Some(index))
    }

    fn attach_at(&mut self, parent: NodeKey, child: NodeKey, index: Option<usize>) -> Result<()> {
        match self.nodes.get(&parent) {
            Some(rec) if rec.data.is_container() => {}
            Some(_) => bail!("node {parent:?} cannot hold children"),
            None => bail!("unknown parent node {parent:?}"),
        }
        if !self.nodes.contains_key(&child) {
            bail!("unknown child node {child:?}");
        }
        if child == NodeKey::DOCUMENT {
            bail!("the document node cannot be reparented");
        }
        if self.contains(child, parent) {
            bail!("cannot attach a node inside its own subtree");
        }
        self.detach(child);
        if let Some(rec) = self.nodes.get_mut(&parent) {
            match index {
                Some(at) if at <= rec.children.len() => rec.children.insert(at, child),
                _ => rec.children.push(child),
            }
        }
        if let Some(rec) = self.nodes.get_mut(&child) {
            rec.parent = Some(parent);
        }
        self.emit(MutationRecord::ChildList {
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
        Ok(())
    }

    /// Remove a node and destroy its whole subtree, shadow subtrees included.
    /// The keys of destroyed nodes are never reused, so stale handles held by
    /// trackers read as dead rather than aliasing a future node.
    pub fn remove_node(&mut self, node: NodeKey) -> Result<()> {
        if node == NodeKey::DOCUMENT {
            bail!("the document node cannot be removed");
        }
        if !self.nodes.contains_key(&node) {
            bail!("unknown node {node:?}");
        }
        self.detach(node);
        let mut stack = vec![node];
        while let Some(key) = stack.pop() {
            if let Some(rec) = self.nodes.remove(&key) {
                stack.extend(rec.children);
                if let NodeData::Element(el) = rec.data
                    && let Some(shadow) = el.shadow_root
                {
                    stack.push(shadow);
                }
            }
        }
        Ok(())
    }

    /// Detach from the current parent, emitting the removal record.
    fn detach(&mut self, child: NodeKey) {
        let Some(old_parent) = self.nodes.get(&child).and_then(|rec| rec.parent) else {
            return;
        };
        if let Some(rec) = self.nodes.get_mut(&old_parent) {
            rec.children.retain(|key| *key != child);
        }
        if let Some(rec) = self.nodes.get_mut(&child) {
            rec.parent = None;
        }
        self.emit(MutationRecord::ChildList {
            target: old_parent,
            added: Vec::new(),
            removed: vec![child],
        });
    }

    /// Move every child of `from` to the end of `to`'s child list.
    pub fn reparent_children(&mut self, from: NodeKey, to: NodeKey) -> Result<()> {
        let moved = self.children(from).to_vec();
        for child in moved {
            self.append_child(to, child)?;
        }
        Ok(())
    }

    /// Attach a shadow root to a host element. Emits no record; shadow
    /// internals are observed separately from the host's tree.
    pub fn attach_shadow(&mut self, host: NodeKey) -> Result<NodeKey> {
        match self.nodes.get(&host) {
            Some(rec) => match &rec.data {
                NodeData::Element(el) if el.shadow_root.is_some() => {
                    bail!("node {host:?} already has a shadow root");
                }
                NodeData::Element(_) => {}
                _ => bail!("node {host:?} is not an element"),
            },
            None => bail!("unknown node {host:?}"),
        }
        let shadow = self.insert_record(NodeData::ShadowRoot { host });
        if let Some(rec) = self.nodes.get_mut(&host)
            && let NodeData::Element(el) = &mut rec.data
        {
            el.shadow_root = Some(shadow);
        }
        Ok(shadow)
    }

    // ============================
    // Attributes and text
    // ============================

    /// Set an attribute, emitting a record only when the value actually
    /// changes. The suppression is what lets re-applied styles settle instead
    /// of echoing through watchers forever.
    pub fn set_attribute(&mut self, node: NodeKey, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let Some(rec) = self.nodes.get_mut(&node) else {
            bail!("unknown node {node:?}");
        };
        let NodeData::Element(el) = &mut rec.data else {
            bail!("node {node:?} is not an element");
        };
        if el.attributes.get(&name).is_some_and(|old| old == value) {
            return Ok(());
        }
        el.attributes.insert(name.clone(), value.to_string());
        self.emit(MutationRecord::Attribute { target: node, name });
        Ok(())
    }

    /// Remove an attribute; absent attributes are a silent no-op.
    pub fn remove_attribute(&mut self, node: NodeKey, name: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let Some(rec) = self.nodes.get_mut(&node) else {
            bail!("unknown node {node:?}");
        };
        let NodeData::Element(el) = &mut rec.data else {
            bail!("node {node:?} is not an element");
        };
        if el.attributes.remove(&name).is_none() {
            return Ok(());
        }
        self.emit(MutationRecord::Attribute { target: node, name });
        Ok(())
    }

    /// Append to an existing text node (parser-side sibling merging).
    pub fn append_text(&mut self, node: NodeKey, more: &str) -> Result<()> {
        match self.nodes.get_mut(&node) {
            Some(NodeRecord {
                data: NodeData::Text(text),
                ..
            }) => {
                text.push_str(more);
                Ok(())
            }
            Some(_) => bail!("node {node:?} is not a text node"),
            None => bail!("unknown node {node:?}"),
        }
    }

    // ============================
    // Queries
    // ============================

    /// Whether the key still names a live arena node.
    #[inline]
    pub fn is_alive(&self, node: NodeKey) -> bool {
        self.nodes.contains_key(&node)
    }

    #[inline]
    pub fn is_element(&self, node: NodeKey) -> bool {
        matches!(
            self.nodes.get(&node),
            Some(NodeRecord {
                data: NodeData::Element(_),
                ..
            })
        )
    }

    pub fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        self.nodes.get(&node).and_then(|rec| rec.parent)
    }

    pub fn children(&self, node: NodeKey) -> &[NodeKey] {
        self.nodes
            .get(&node)
            .map_or(&[][..], |rec| rec.children.as_slice())
    }

    /// Lowercased tag name, for elements only.
    pub fn tag(&self, node: NodeKey) -> Option<&str> {
        match self.nodes.get(&node) {
            Some(NodeRecord {
                data: NodeData::Element(el),
                ..
            }) => Some(el.tag.as_str()),
            _ => None,
        }
    }

    pub fn attribute(&self, node: NodeKey, name: &str) -> Option<&str> {
        match self.nodes.get(&node) {
            Some(NodeRecord {
                data: NodeData::Element(el),
                ..
            }) => el
                .attributes
                .get(&name.to_ascii_lowercase())
                .map(String::as_str),
            _ => None,
        }
    }

    pub fn text(&self, node: NodeKey) -> Option<&str> {
        match self.nodes.get(&node) {
            Some(NodeRecord {
                data: NodeData::Text(text),
                ..
            }) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn shadow_root(&self, host: NodeKey) -> Option<NodeKey> {
        match self.nodes.get(&host) {
            Some(NodeRecord {
                data: NodeData::Element(el),
                ..
            }) => el.shadow_root,
            _ => None,
        }
    }

    /// Inclusive same-tree containment. Walks parent links only, so the check
    /// never crosses a shadow boundary.
    pub fn contains(&self, ancestor: NodeKey, node: NodeKey) -> bool {
        let mut cursor = Some(node);
        while let Some(key) = cursor {
            if key == ancestor {
                return true;
            }
            cursor = self.nodes.get(&key).and_then(|rec| rec.parent);
        }
        false
    }

    /// Whether the node reaches the document node through parents, hopping
    /// from shadow roots to their hosts.
    pub fn is_connected(&self, node: NodeKey) -> bool {
        let mut cursor = node;
        loop {
            if cursor == NodeKey::DOCUMENT {
                return true;
            }
            let Some(rec) = self.nodes.get(&cursor) else {
                return false;
            };
            cursor = match (&rec.data, rec.parent) {
                (NodeData::ShadowRoot { host }, _) => *host,
                (_, Some(parent)) => parent,
                (_, None) => return false,
            };
        }
    }

    /// The root element (first element child of the document node).
    pub fn document_element(&self) -> Option<NodeKey> {
        self.children(NodeKey::DOCUMENT)
            .iter()
            .copied()
            .find(|key| self.is_element(*key))
    }

    /// The body element, when the document has the usual html/body shape.
    pub fn body(&self) -> Option<NodeKey> {
        let root = self.document_element()?;
        self.children(root)
            .iter()
            .copied()
            .find(|key| self.tag(*key) == Some("body"))
    }

    /// All element descendants of `root` in document order, excluding `root`
    /// itself. Stays within one tree; shadow subtrees are not entered.
    pub fn descendant_elements(&self, root: NodeKey) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(root).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            if self.is_element(key) {
                out.push(key);
            }
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    /// Element descendants of `root` whose tag is in `tags`, document order,
    /// excluding `root`. This is the targeted category query mutation
    /// batching uses to pick nested nodes out of freshly inserted subtrees.
    pub fn descendants_with_tags(&self, root: NodeKey, tags: &HashSet<String>) -> Vec<NodeKey> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeKey> = self.children(root).iter().rev().copied().collect();
        while let Some(key) = stack.pop() {
            if let Some(tag) = self.tag(key)
                && tags.contains(tag)
            {
                out.push(key);
            }
            stack.extend(self.children(key).iter().rev().copied());
        }
        out
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ============================
    // Watching
    // ============================

    /// Subscribe a watcher scoped to `root` with the given change filters.
    /// Dropping the watcher detaches it.
    pub fn watch(&self, root: NodeKey, config: WatchConfig) -> DomWatcher {
        DomWatcher::new(self.records.subscribe(), root, config)
    }

    fn emit(&self, record: MutationRecord) {
        // No receivers is fine; records are only of interest while watched.
        let _ = self.records.send(vec![record]);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
