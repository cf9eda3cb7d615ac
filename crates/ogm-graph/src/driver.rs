//! The database-client capability the access layer is constructed with.
//!
//! A driver hands out sessions; a session runs parameterized statements and
//! is closed when the operation that opened it is done. Implementations must
//! be `Send + Sync` so one driver can back many concurrent operations.

use async_trait::async_trait;
use serde_json::Value;

use ogm_core::{NodeRecord, PropertyMap};

use crate::client::GraphError;

/// A Cypher statement with its bound parameters.
///
/// `text` only ever contains escaped names; every value lives in `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    pub params: PropertyMap,
}

impl Statement {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: PropertyMap::new(),
        }
    }

    /// Bind a parameter, referenced in the text as `$key`.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Names of the bound parameters, for logging without values.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.keys().map(String::as_str).collect()
    }
}

/// Rows returned by a statement, each reduced to the node in its first column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    pub records: Vec<NodeRecord>,
}

impl QueryResult {
    /// Properties of the first returned node, if any.
    pub fn first_properties(self) -> Option<PropertyMap> {
        self.records
            .into_iter()
            .next()
            .map(NodeRecord::into_properties)
    }

    /// Properties of every returned node, in result order.
    pub fn into_properties(self) -> Vec<PropertyMap> {
        self.records
            .into_iter()
            .map(NodeRecord::into_properties)
            .collect()
    }
}

/// Opens sessions against a graph database.
#[async_trait]
pub trait GraphDriver: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, GraphError>;
}

/// A short-lived handle used to submit statements.
#[async_trait]
pub trait GraphSession: Send {
    async fn run(&mut self, statement: &Statement) -> Result<QueryResult, GraphError>;

    /// Release the session. Called exactly once, after the last `run`.
    async fn close(self: Box<Self>) -> Result<(), GraphError>;
}
