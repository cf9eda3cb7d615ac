//! The node access layer: session lifecycle, failure policy, and options.
//!
//! Every operation opens exactly one session, runs exactly one statement,
//! and closes the session before returning, on success and failure alike.

use std::sync::Arc;

use serde_json::Value;

use ogm_core::{FailurePolicy, PropertyMap};

use crate::client::GraphError;
use crate::driver::{GraphDriver, QueryResult, Statement};

/// What a per-call logging hook is told about.
#[derive(Debug)]
pub enum QueryEvent<'a> {
    /// Final statement text, just before it runs.
    Statement(&'a str),
    /// A database error absorbed under [`FailurePolicy::Soft`].
    Failure(&'a GraphError),
}

/// Per-call logging hook.
pub type QueryLogger = Arc<dyn Fn(QueryEvent<'_>) + Send + Sync>;

/// Options for [`NodeAccess::delete_node`].
#[derive(Clone, Default)]
pub struct DeleteOptions {
    /// Detach (remove) all relationships before deleting.
    pub force: bool,
    pub logging: Option<QueryLogger>,
}

/// Options for [`NodeAccess::set_property_on_node`].
#[derive(Clone, Default)]
pub struct SetPropertyOptions {
    /// Exactly one `name => value` pair.
    pub property: Option<PropertyMap>,
    pub logging: Option<QueryLogger>,
}

impl SetPropertyOptions {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        let mut property = PropertyMap::new();
        property.insert(key.into(), value.into());
        Self {
            property: Some(property),
            logging: None,
        }
    }
}

/// Options for [`NodeAccess::set_all_properties_on_node`].
#[derive(Clone, Default)]
pub struct SetAllPropertiesOptions {
    pub properties: PropertyMap,
    pub logging: Option<QueryLogger>,
}

/// Options for [`NodeAccess::find_nodes`].
#[derive(Clone, Default)]
pub struct FindOptions {
    pub label: Option<String>,
    /// Exact-match where-filter; all entries must hold.
    pub filter: PropertyMap,
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub logging: Option<QueryLogger>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Require `field` to equal `value`.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn logging(mut self, logger: QueryLogger) -> Self {
        self.logging = Some(logger);
        self
    }
}

/// Entry point for node CRUD against an injected driver.
///
/// Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct NodeAccess {
    driver: Arc<dyn GraphDriver>,
    policy: FailurePolicy,
}

impl NodeAccess {
    pub fn new(driver: Arc<dyn GraphDriver>) -> Self {
        Self {
            driver,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Run one statement on a fresh session, closing it afterwards.
    pub(crate) async fn execute(
        &self,
        statement: &Statement,
        logging: Option<&QueryLogger>,
    ) -> Result<QueryResult, GraphError> {
        if let Some(log) = logging {
            log(QueryEvent::Statement(&statement.text));
        }
        tracing::debug!(
            statement = %statement.text,
            params = ?statement.param_names(),
            "Running statement"
        );

        let mut session = self.driver.open_session().await?;
        let result = session.run(statement).await;
        if let Err(e) = session.close().await {
            tracing::warn!(error = %e, "Failed to close graph session");
        }
        result
    }

    /// Apply the failure policy to a database result.
    ///
    /// Validation errors always pass through.
    pub(crate) fn absorb<T>(
        &self,
        result: Result<T, GraphError>,
        logging: Option<&QueryLogger>,
        fallback: impl FnOnce() -> T,
    ) -> Result<T, GraphError> {
        match result {
            Ok(value) => Ok(value),
            Err(err) if err.is_validation() => Err(err),
            Err(err) => match self.policy {
                FailurePolicy::Strict => Err(err),
                FailurePolicy::Soft => {
                    report_failure(logging, &err);
                    Ok(fallback())
                }
            },
        }
    }
}

/// Hand an absorbed error to the hook, or to `tracing` when there is none.
pub fn report_failure(logging: Option<&QueryLogger>, err: &GraphError) {
    match logging {
        Some(log) => log(QueryEvent::Failure(err)),
        None => tracing::error!(error = %err, "Graph operation failed"),
    }
}
