//! ogm-graph: the node data-access layer.
//!
//! Builds parameterized Cypher statements from structured options, runs each
//! one on its own session, and normalizes driver rows into plain property
//! maps. All graph reads and writes made by the model layer flow through
//! [`NodeAccess`].

pub mod access;
pub mod bolt;
pub mod client;
pub mod driver;
pub mod mutations;
pub mod queries;
pub mod statements;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use access::{
    report_failure, DeleteOptions, FindOptions, NodeAccess, QueryEvent, QueryLogger,
    SetAllPropertiesOptions, SetPropertyOptions,
};
pub use client::{GraphError, Neo4jDriver};
pub use driver::{GraphDriver, GraphSession, QueryResult, Statement};
pub use ogm_core::{FailurePolicy, GraphConfig, NodeRecord, NodeRef, PropertyMap};
