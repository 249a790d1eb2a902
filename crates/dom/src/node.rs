use crate::NodeKey;
use std::collections::HashMap;

/// Payload of an element node: lowercased tag plus lowercase-keyed attributes.
#[derive(Debug, Clone)]
pub struct ElementData {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    /// Attached shadow subtree root, if any. Shadow roots are not part of the
    /// host's child list; traversal only crosses the boundary where a query
    /// explicitly asks for it.
    pub shadow_root: Option<NodeKey>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: HashMap::new(),
            shadow_root: None,
        }
    }
}

/// Node payload variants stored in the document arena.
#[derive(Debug, Clone)]
pub enum NodeData {
    /// The unique document node; parent of the root element.
    Document,
    Element(ElementData),
    Text(String),
    /// Root of a shadow subtree. Has no parent link; connectivity flows
    /// through the host element instead.
    ShadowRoot { host: NodeKey },
}

impl NodeData {
    /// Whether this node kind may hold children.
    #[inline]
    pub fn is_container(&self) -> bool {
        !matches!(self, NodeData::Text(_))
    }
}
