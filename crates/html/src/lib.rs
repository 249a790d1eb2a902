//! HTML loading: parse markup with html5ever and build a [`dom::Document`].
//! The parser runs through `markup5ever_rcdom` and the resulting tree is
//! converted into the arena, so tree-builder fixups (implied tags, foster
//! parenting) are already applied by the time nodes land in the document.

use anyhow::{Context, Result};
use dom::{Document, NodeKey};
use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document as parse_with_sink};
use log::debug;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};

/// Parse an HTML document into a fresh arena document.
pub fn parse_document(markup: &str) -> Result<Document> {
    let rc: RcDom = parse_with_sink(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut markup.as_bytes())
        .context("reading markup into the parser")?;
    let mut doc = Document::new();
    convert_children(&mut doc, &rc.document, NodeKey::DOCUMENT)?;
    debug!("parsed document with {} nodes", doc.node_count());
    Ok(doc)
}

fn convert_children(doc: &mut Document, rc_node: &Handle, parent: NodeKey) -> Result<()> {
    for child in rc_node.children.borrow().iter() {
        convert_node(doc, child, parent)?;
    }
    Ok(())
}

fn convert_node(doc: &mut Document, rc_node: &Handle, parent: NodeKey) -> Result<()> {
    match &rc_node.data {
        RcNodeData::Element { name, attrs, .. } => {
            let node = doc.create_element(&name.local);
            for attr in attrs.borrow().iter() {
                doc.set_attribute(node, &attr.name.local, &attr.value)?;
            }
            doc.append_child(parent, node)?;
            // Template contents live in a separate fragment and are not part
            // of the rendered tree; they are not converted.
            convert_children(doc, rc_node, node)
        }
        RcNodeData::Text { contents } => {
            let text = contents.borrow();
            if text.trim().is_empty() {
                return Ok(());
            }
            let node = doc.create_text(&text);
            doc.append_child(parent, node)
        }
        // Doctype, comments, and processing instructions carry nothing the
        // engine looks at.
        _ => Ok(()),
    }
}
