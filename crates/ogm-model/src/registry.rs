//! Process-wide registry of defined models.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use ogm_graph::NodeAccess;

use crate::definition::{ModelDefinition, ModelSpec};
use crate::error::{ModelError, Result};
use crate::model::Model;

/// Defines models against one access layer and keeps them by label.
pub struct ModelRegistry {
    access: NodeAccess,
    models: RwLock<HashMap<String, Model>>,
}

impl ModelRegistry {
    pub fn new(access: NodeAccess) -> Self {
        Self {
            access,
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Define (or look up) a model.
    ///
    /// Defining the same label twice with the same fields returns the
    /// existing model; different fields are a conflict.
    pub fn define_model(&self, spec: ModelSpec) -> Result<Model> {
        let definition = ModelDefinition::new(spec)?;
        let mut models = self.models.write().unwrap_or_else(PoisonError::into_inner);

        if let Some(existing) = models.get(definition.label()) {
            if existing.definition().fields() == definition.fields() {
                return Ok(existing.clone());
            }
            return Err(ModelError::Conflict {
                name: definition.name().to_string(),
                existing: existing.definition().fields().to_vec(),
            });
        }

        tracing::info!(
            model = %definition.name(),
            label = %definition.label(),
            fields = ?definition.fields(),
            "Defined model"
        );
        let model = Model::new(definition, self.access.clone());
        models.insert(model.label().to_string(), model.clone());
        Ok(model)
    }

    /// Look up a model by its declared name (case-insensitive).
    pub fn model(&self, name: &str) -> Option<Model> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        models.get(&name.trim().to_uppercase()).cloned()
    }

    /// All defined models, ordered by label.
    pub fn models(&self) -> Vec<Model> {
        let models = self.models.read().unwrap_or_else(PoisonError::into_inner);
        let mut all: Vec<Model> = models.values().cloned().collect();
        all.sort_by(|a, b| a.label().cmp(b.label()));
        all
    }
}
