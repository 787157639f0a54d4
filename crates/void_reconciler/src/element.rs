//! Declarative element trees
//!
//! An element describes a desired scene node: its type, props and ordered
//! children. Trees are immutable per revision; a new revision is a new tree.
//!
//! ```json
//! {
//!   "type": "threeMesh",
//!   "props": { "rotation": { "x": 0, "y": 0 } },
//!   "children": [{ "type": "threeBoxGeometry", "props": { "width": 1 } }]
//! }
//! ```

use crate::value::{Props, Value};
use serde::{Deserialize, Serialize};

/// A typed node with props and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element type name, e.g. `threeMesh`
    #[serde(rename = "type")]
    pub type_name: String,
    /// Identity among siblings; positional when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub props: Props,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            key: None,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Set the sibling key
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set a prop
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Append a child
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }
}

/// A child position in the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Raw text; this host has no text leaves
    Text(String),
    Element(Element),
}

impl Node {
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Element(e) => e.key.as_deref(),
            Self::Text(_) => None,
        }
    }

    /// Parse a tree from JSON
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let mesh = Element::new("threeMesh")
            .key("cube")
            .prop("rotation", [("x", 0.0), ("y", 0.0)].into_iter().collect::<Value>())
            .child(Element::new("threeBoxGeometry").prop("width", 1));

        assert_eq!(mesh.key.as_deref(), Some("cube"));
        assert_eq!(mesh.children.len(), 1);
        assert!(mesh.props.contains_key("rotation"));
    }

    #[test]
    fn test_from_json() {
        let node = Node::from_json(
            r#"{
                "type": "threeScene",
                "children": [
                    { "type": "threeMesh", "key": "a", "props": { "rotation": { "x": 1 } } },
                    "label"
                ]
            }"#,
        )
        .unwrap();

        let Node::Element(scene) = node else {
            panic!("Expected element");
        };
        assert_eq!(scene.type_name, "threeScene");
        assert!(scene.props.is_empty());
        assert_eq!(scene.children[0].key(), Some("a"));
        assert_eq!(scene.children[1], Node::Text("label".into()));
    }
}
