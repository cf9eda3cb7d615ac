//! ogm-model: typed models over the OGM access layer.
//!
//! A model is a label plus a fixed set of allowed fields. Every instance
//! and every where-filter is checked against that set before any query is
//! issued; persistence is delegated to [`ogm_graph::NodeAccess`].

pub mod definition;
pub mod error;
pub mod instance;
pub mod model;
pub mod registry;

pub use definition::{ModelDefinition, ModelSpec};
pub use error::{ModelError, Result};
pub use instance::Instance;
pub use model::Model;
pub use registry::ModelRegistry;
