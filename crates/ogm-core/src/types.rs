//! Core data types shared by the access and model layers.
//!
//! Property values are plain `serde_json` values: scalars and arrays are what
//! the graph can store on a node, and JSON keeps records printable as-is.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;

/// Name of the generated identity property carried by every node.
pub const ID_PROPERTY: &str = "_id";

/// A node's property bag, keyed by property name.
pub type PropertyMap = serde_json::Map<String, Value>;

// ── Node Records ──────────────────────────────────────────────────

/// A graph node normalized at the driver boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub labels: Vec<String>,
    pub properties: PropertyMap,
}

impl NodeRecord {
    pub fn new(labels: Vec<String>, properties: PropertyMap) -> Self {
        Self { labels, properties }
    }

    /// The node's `_id`, if it carries a string one.
    pub fn id(&self) -> Option<&str> {
        self.properties.get(ID_PROPERTY).and_then(Value::as_str)
    }

    /// Drop the labels and keep the plain property map.
    pub fn into_properties(self) -> PropertyMap {
        self.properties
    }
}

// ── Node References ───────────────────────────────────────────────

/// Target of an operation: a raw `_id` or a node record carrying one.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Id(&'a str),
    Node(&'a NodeRecord),
    Properties(&'a PropertyMap),
}

impl<'a> NodeRef<'a> {
    /// Resolve the `_id` this reference points at.
    pub fn id(&self) -> Result<&'a str, ValidationError> {
        match *self {
            Self::Id(id) => Ok(id),
            Self::Node(node) => node.id().ok_or(ValidationError::MissingNodeId),
            Self::Properties(props) => props
                .get(ID_PROPERTY)
                .and_then(Value::as_str)
                .ok_or(ValidationError::MissingNodeId),
        }
    }
}

impl<'a> From<&'a str> for NodeRef<'a> {
    fn from(id: &'a str) -> Self {
        Self::Id(id)
    }
}

impl<'a> From<&'a String> for NodeRef<'a> {
    fn from(id: &'a String) -> Self {
        Self::Id(id.as_str())
    }
}

impl<'a> From<&'a NodeRecord> for NodeRef<'a> {
    fn from(node: &'a NodeRecord) -> Self {
        Self::Node(node)
    }
}

impl<'a> From<&'a PropertyMap> for NodeRef<'a> {
    fn from(props: &'a PropertyMap) -> Self {
        Self::Properties(props)
    }
}
