//! ogm-core: Shared types, escaping, configuration, and error handling for the OGM.
//!
//! This crate provides the foundational pieces used by the access and model layers:
//! - Property maps and normalized node records
//! - The sanitizing functions for text interpolated into Cypher
//! - Configuration loading (connection settings, failure policy)
//! - Validation error types

pub mod config;
pub mod error;
pub mod escape;
pub mod types;

pub use config::{FailurePolicy, GraphConfig, OgmConfig};
pub use error::{ConfigError, ValidationError};
pub use escape::{escape_identifier, escape_literal};
pub use types::{NodeRecord, NodeRef, PropertyMap, ID_PROPERTY};
