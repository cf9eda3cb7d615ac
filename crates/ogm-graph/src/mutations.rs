//! Write operations on nodes.
//!
//! `create_node` always propagates database errors. The other writes hand
//! them to the failure policy, so under `Soft` a failed delete looks like a
//! successful one and a failed update looks like "no such node".

use uuid::Uuid;

use ogm_core::{escape_literal, NodeRef, PropertyMap, ValidationError};

use crate::access::{DeleteOptions, NodeAccess, SetAllPropertiesOptions, SetPropertyOptions};
use crate::client::GraphError;
use crate::statements;

impl NodeAccess {
    /// Create a node with a freshly generated `_id` and return its properties.
    pub async fn create_node(
        &self,
        label: &str,
        properties: Option<&PropertyMap>,
    ) -> Result<PropertyMap, GraphError> {
        let id = escape_literal(&Uuid::new_v4().to_string());
        let statement = statements::create_node(label, &id, properties)?;

        let created = self
            .execute(&statement, None)
            .await?
            .first_properties()
            .ok_or(GraphError::EmptyResult {
                statement: statement.text,
            })?;

        tracing::debug!(label, id = %id, "Created node");
        Ok(created)
    }

    /// Delete a node by id or record. `force` detaches its relationships first.
    pub async fn delete_node<'a>(
        &self,
        target: impl Into<NodeRef<'a>>,
        options: &DeleteOptions,
    ) -> Result<(), GraphError> {
        let id = target.into().id()?;
        let statement = statements::delete_node(id, options.force);
        let logging = options.logging.as_ref();

        let result = self.execute(&statement, logging).await.map(|_| ());
        self.absorb(result, logging, || ())
    }

    /// Set exactly one property; `None` when no node matched.
    pub async fn set_property_on_node<'a>(
        &self,
        target: impl Into<NodeRef<'a>>,
        options: &SetPropertyOptions,
    ) -> Result<Option<PropertyMap>, GraphError> {
        let id = target.into().id()?;
        let property = options
            .property
            .as_ref()
            .ok_or(ValidationError::MissingProperty)?;

        let mut entries = property.iter();
        let (key, value) = match (entries.next(), entries.next()) {
            (Some(entry), None) => entry,
            _ => {
                return Err(ValidationError::PropertyArity {
                    count: property.len(),
                }
                .into())
            }
        };

        let statement = statements::set_property(id, key, value)?;
        let logging = options.logging.as_ref();

        let result = self
            .execute(&statement, logging)
            .await
            .map(|r| r.first_properties());
        self.absorb(result, logging, || None)
    }

    /// Replace the whole property bag, keeping `_id`; `None` when no node matched.
    pub async fn set_all_properties_on_node<'a>(
        &self,
        target: impl Into<NodeRef<'a>>,
        options: &SetAllPropertiesOptions,
    ) -> Result<Option<PropertyMap>, GraphError> {
        let id = target.into().id()?;
        let statement = statements::set_all_properties(id, &options.properties);
        let logging = options.logging.as_ref();

        let result = self
            .execute(&statement, logging)
            .await
            .map(|r| r.first_properties());
        self.absorb(result, logging, || None)
    }
}
