use thiserror::Error;

/// Errors raised before any query is issued.
///
/// These always propagate to the caller regardless of the configured
/// [`FailurePolicy`](crate::FailurePolicy).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Unknown field in 'where': {field}")]
    UnknownWhereField { field: String },

    #[error("'{field}' is not defined on model {model}")]
    FieldNotDefined { field: String, model: String },

    #[error("You must specify property to set")]
    MissingProperty,

    #[error("Property to set must contain exactly one key, got {count}")]
    PropertyArity { count: usize },

    #[error("Node has no string '_id' property")]
    MissingNodeId,

    #[error("Invalid identifier {name:?}: {reason}")]
    InvalidIdentifier { name: String, reason: &'static str },

    #[error("Invalid model name {name:?}")]
    InvalidModelName { name: String },
}

/// Configuration loading failures.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}
