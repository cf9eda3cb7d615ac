//! Model definitions: a label and its whitelist of fields.

use std::collections::HashSet;

use ogm_core::{escape_identifier, PropertyMap, ValidationError};

/// What a caller declares: a model name and its allowed fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSpec {
    pub name: String,
    pub fields: Vec<String>,
}

impl ModelSpec {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

/// An immutable, validated model definition.
///
/// The label is the declared name upper-cased. Fields keep their declared
/// order with duplicates dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    name: String,
    label: String,
    fields: Vec<String>,
    allowed: HashSet<String>,
}

impl ModelDefinition {
    pub fn new(spec: ModelSpec) -> Result<Self, ValidationError> {
        let name = spec.name.trim().to_string();
        if name.is_empty() || escape_identifier(&name).is_err() {
            return Err(ValidationError::InvalidModelName { name: spec.name });
        }

        let mut fields = Vec::with_capacity(spec.fields.len());
        let mut allowed = HashSet::with_capacity(spec.fields.len());
        for field in spec.fields {
            escape_identifier(&field)?;
            if allowed.insert(field.clone()) {
                fields.push(field);
            }
        }

        Ok(Self {
            label: name.to_uppercase(),
            name,
            fields,
            allowed,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn allows(&self, field: &str) -> bool {
        self.allowed.contains(field)
    }

    /// Reject a property that is not one of the model's fields.
    pub fn check_field(&self, field: &str) -> Result<(), ValidationError> {
        if self.allows(field) {
            Ok(())
        } else {
            Err(ValidationError::FieldNotDefined {
                field: field.to_string(),
                model: self.name.clone(),
            })
        }
    }

    /// Reject a where-filter naming any field outside the whitelist.
    pub fn check_filter(&self, filter: &PropertyMap) -> Result<(), ValidationError> {
        match filter.keys().find(|key| !self.allows(key)) {
            Some(field) => Err(ValidationError::UnknownWhereField {
                field: field.clone(),
            }),
            None => Ok(()),
        }
    }
}
