//! Error types for the ogm-model crate.

use thiserror::Error;

use ogm_core::ValidationError;
use ogm_graph::GraphError;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Model {name} is already defined with fields {existing:?}")]
    Conflict { name: String, existing: Vec<String> },

    #[error("Delete task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ModelError {
    /// Whether the call was rejected before reaching the database.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Validation(_) => true,
            Self::Graph(e) => e.is_validation(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
