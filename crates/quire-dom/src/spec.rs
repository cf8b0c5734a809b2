//! Serialized node descriptions.
//!
//! Jobs handed to the command line describe their content as nested JSON
//! nodes. [`NodeSpec`] mirrors that shape and is turned into arena nodes by
//! [`DomTree::from_specs`](crate::DomTree::from_specs).

use serde::Deserialize;

use crate::{AttributesMap, Declaration, DomTree, ElementData, NodeId, NodeType};

/// A node in its nested, serialized form.
///
/// ```json
/// { "type": "element", "tag": "p", "style": "margin-top: 1em",
///   "children": [ { "type": "text", "text": "Hello" } ] }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeSpec {
    /// An element with attributes, cascaded declarations and children.
    Element {
        /// Tag name.
        tag: String,
        /// Raw HTML attributes.
        #[serde(default)]
        attrs: AttributesMap,
        /// Cascaded declarations as a declaration block.
        #[serde(default)]
        style: String,
        /// Child nodes in document order.
        #[serde(default)]
        children: Vec<NodeSpec>,
    },
    /// A text node.
    Text {
        /// Character data.
        text: String,
    },
    /// A comment node.
    Comment {
        /// Comment data.
        #[serde(default)]
        text: String,
    },
}

impl NodeSpec {
    /// Allocate this node (and its descendants) under `parent`.
    pub fn build_into(&self, tree: &mut DomTree, parent: NodeId) -> NodeId {
        match self {
            Self::Element {
                tag,
                attrs,
                style,
                children,
            } => {
                let mut data = ElementData::new(tag);
                data.attrs = attrs
                    .iter()
                    .map(|(k, v)| (k.to_ascii_lowercase(), v.clone()))
                    .collect();
                data.declarations = Declaration::parse_block(style);
                let id = tree.append_element(parent, data);
                for child in children {
                    let _ = child.build_into(tree, id);
                }
                id
            }
            Self::Text { text } => tree.append_text(parent, text),
            Self::Comment { text } => {
                let id = tree.alloc(NodeType::Comment(text.clone()));
                tree.append_child(parent, id);
                id
            }
        }
    }
}
