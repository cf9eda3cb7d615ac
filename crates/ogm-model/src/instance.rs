//! In-memory model instances.

use std::sync::Arc;

use serde_json::Value;

use ogm_core::{PropertyMap, ValidationError, ID_PROPERTY};

use crate::definition::ModelDefinition;

/// A record holding a value for every allowed field of its model.
///
/// Not linked to the database: after `create` the instance only remembers
/// the generated `_id`. Later changes are not written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    definition: Arc<ModelDefinition>,
    id: Option<String>,
    fields: PropertyMap,
}

impl Instance {
    /// All fields start as `null`, then `properties` is applied.
    pub(crate) fn new(
        definition: Arc<ModelDefinition>,
        properties: &PropertyMap,
    ) -> Result<Self, ValidationError> {
        let fields = definition
            .fields()
            .iter()
            .map(|field| (field.clone(), Value::Null))
            .collect();
        let mut instance = Self {
            definition,
            id: None,
            fields,
        };
        instance.set_properties(properties)?;
        Ok(instance)
    }

    /// Rebuild an instance from a stored property map.
    pub(crate) fn from_stored(
        definition: Arc<ModelDefinition>,
        mut properties: PropertyMap,
    ) -> Result<Self, ValidationError> {
        let id = match properties.remove(ID_PROPERTY) {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };
        let mut instance = Self::new(definition, &properties)?;
        instance.id = id;
        Ok(instance)
    }

    /// Assign the given fields. Fails without changing anything if any key
    /// is not defined on the model.
    pub fn set_properties(&mut self, properties: &PropertyMap) -> Result<&mut Self, ValidationError> {
        for key in properties.keys() {
            self.definition.check_field(key)?;
        }
        for (key, value) in properties {
            self.fields.insert(key.clone(), value.clone());
        }
        Ok(self)
    }

    /// Assign a single field.
    pub fn set(
        &mut self,
        field: &str,
        value: impl Into<Value>,
    ) -> Result<&mut Self, ValidationError> {
        self.definition.check_field(field)?;
        self.fields.insert(field.to_string(), value.into());
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The `_id` of the node this instance was persisted as.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn set_id(&mut self, id: String) {
        self.id = Some(id);
    }

    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    /// Field values only, without `_id`.
    pub fn fields(&self) -> &PropertyMap {
        &self.fields
    }

    /// No-op: instances are never re-synced with the database.
    pub fn save(&mut self) -> &mut Self {
        self
    }

    /// Field values plus `_id` once persisted.
    pub fn to_object(&self) -> PropertyMap {
        let mut object = self.fields.clone();
        if let Some(id) = &self.id {
            object.insert(ID_PROPERTY.to_string(), Value::from(id.as_str()));
        }
        object
    }
}
