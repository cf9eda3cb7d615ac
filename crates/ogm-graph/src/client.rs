//! Neo4j connection management and the neo4rs-backed driver.

use async_trait::async_trait;
use neo4rs::{ConfigBuilder, Graph, Query};

use ogm_core::{GraphConfig, ValidationError};

use crate::bolt::{node_to_record, to_bolt};
use crate::driver::{GraphDriver, GraphSession, QueryResult, Statement};
use crate::statements::NODE_ALIAS;

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(#[from] neo4rs::Error),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Statement returned no node: {statement}")]
    EmptyResult { statement: String },
}

impl GraphError {
    /// Whether the call was rejected before reaching the database.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Neo4j driver over a pooled `neo4rs::Graph`.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct Neo4jDriver {
    graph: Graph,
}

impl Neo4jDriver {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let mut builder = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size);
        if let Some(db) = &config.database {
            builder = builder.db(db.as_str());
        }
        let neo_config = builder
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }

    /// Get a reference to the underlying neo4rs Graph for direct operations.
    pub fn inner(&self) -> &Graph {
        &self.graph
    }
}

#[async_trait]
impl GraphDriver for Neo4jDriver {
    async fn open_session(&self) -> Result<Box<dyn GraphSession>, GraphError> {
        Ok(Box::new(Neo4jSession {
            graph: self.graph.clone(),
            statements: 0,
        }))
    }
}

/// Auto-commit session: each statement borrows a pooled connection for the
/// duration of its result stream.
struct Neo4jSession {
    graph: Graph,
    statements: usize,
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&mut self, statement: &Statement) -> Result<QueryResult, GraphError> {
        self.statements += 1;
        let mut stream = self.graph.execute(to_query(statement)).await?;

        let mut records = Vec::new();
        while let Some(row) = stream.next().await? {
            // Write-only statements (DELETE) return no node column.
            if let Ok(node) = row.get::<neo4rs::Node>(NODE_ALIAS) {
                records.push(node_to_record(&node)?);
            }
        }
        Ok(QueryResult { records })
    }

    async fn close(self: Box<Self>) -> Result<(), GraphError> {
        tracing::trace!(statements = self.statements, "Closing Neo4j session");
        Ok(())
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params
        .iter()
        .fold(neo4rs::query(&statement.text), |q, (key, value)| {
            q.param(key, to_bolt(value))
        })
}
