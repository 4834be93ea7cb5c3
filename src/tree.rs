//! Document tree for structured data.
//!
//! JSON, YAML and TOML documents are parsed into [`Node`]. A node is a
//! dynamic wrapper: comparing two nodes unwraps each to its concrete payload
//! (`f64`, `String`, `Vec<Node>`, ...) so that documents are compared the
//! same way as any other reflected value.

use crate::reflect::{Kind, Reflect};
use std::collections::BTreeMap;

/// A node representing a value in structured data (JSON, YAML, TOML).
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Object(BTreeMap<String, Node>),
    Array(Vec<Node>),
}

impl Node {
    pub fn kind_name(&self) -> &str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Object(_) => "object",
            Node::Array(_) => "array",
        }
    }

    /// Looks up a dotted path of object keys and `#<index>` segments.
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        if path.is_empty() {
            return Some(self);
        }
        path.split('.').try_fold(self, |node, segment| match node {
            Node::Object(map) => map.get(segment),
            Node::Array(items) => segment
                .strip_prefix('#')
                .and_then(|index| index.parse::<usize>().ok())
                .and_then(|index| items.get(index)),
            _ => None,
        })
    }
}

impl Reflect for Node {
    fn reflect(&self) -> Kind<'_> {
        match self {
            Node::Null => Kind::Dyn(None),
            Node::Bool(b) => Kind::Dyn(Some(b)),
            Node::Number(n) => Kind::Dyn(Some(n)),
            Node::String(s) => Kind::Dyn(Some(s)),
            Node::Object(map) => Kind::Dyn(Some(map)),
            Node::Array(items) => Kind::Dyn(Some(items)),
        }
    }
}
