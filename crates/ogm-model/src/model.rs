//! Model-level operations delegating to the access layer.

use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinSet;

use ogm_core::{FailurePolicy, PropertyMap, ID_PROPERTY};
use ogm_graph::{report_failure, DeleteOptions, FindOptions, NodeAccess};

use crate::definition::ModelDefinition;
use crate::error::Result;
use crate::instance::Instance;

/// A defined model bound to an access layer.
///
/// Clone is cheap (inner Arcs).
#[derive(Clone)]
pub struct Model {
    definition: Arc<ModelDefinition>,
    access: NodeAccess,
}

impl Model {
    pub fn new(definition: ModelDefinition, access: NodeAccess) -> Self {
        Self {
            definition: Arc::new(definition),
            access,
        }
    }

    pub fn definition(&self) -> &ModelDefinition {
        &self.definition
    }

    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn label(&self) -> &str {
        self.definition.label()
    }

    /// Construct an unsaved instance.
    pub fn instance(&self, properties: &PropertyMap) -> Result<Instance> {
        Ok(Instance::new(self.definition.clone(), properties)?)
    }

    /// Construct an instance and persist it as a new node.
    ///
    /// Under [`FailurePolicy::Soft`] a database failure is logged and the
    /// unsaved instance (without `_id`) is still returned.
    pub async fn create(&self, properties: &PropertyMap) -> Result<Instance> {
        let mut instance = self.instance(properties)?;

        match self
            .access
            .create_node(self.label(), Some(&instance.to_object()))
            .await
        {
            Ok(created) => {
                if let Some(id) = created.get(ID_PROPERTY).and_then(Value::as_str) {
                    instance.set_id(id.to_string());
                }
            }
            Err(e) if e.is_validation() || self.access.policy() == FailurePolicy::Strict => {
                return Err(e.into());
            }
            Err(e) => report_failure(None, &e),
        }

        Ok(instance)
    }

    /// Find every node of this model matching the where-filter.
    ///
    /// The label is always this model's; any label in `options` is replaced.
    pub async fn find_all(&self, options: FindOptions) -> Result<Vec<PropertyMap>> {
        self.definition.check_filter(&options.filter)?;
        let options = FindOptions {
            label: Some(self.label().to_string()),
            ..options
        };
        Ok(self.access.find_nodes(&options).await?)
    }

    /// First match of [`find_all`](Self::find_all), or `None`.
    pub async fn find_one(&self, options: FindOptions) -> Result<Option<PropertyMap>> {
        let found = self.find_all(FindOptions {
            limit: Some(1),
            ..options
        });
        Ok(found.await?.into_iter().next())
    }

    /// Load the node with `id` as an instance of this model.
    ///
    /// Nodes carrying another model's label are not matched.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Instance>> {
        match self.access.find_labeled_by_id(self.label(), id).await? {
            Some(properties) => Ok(Some(Instance::from_stored(
                self.definition.clone(),
                properties,
            )?)),
            None => Ok(None),
        }
    }

    /// Delete every node matching the where-filter.
    ///
    /// See [`delete_with`](Self::delete_with). Under [`FailurePolicy::Soft`]
    /// a refused delete is logged and still counted, so the result is an
    /// upper bound on the nodes actually removed.
    pub async fn delete(&self, options: FindOptions) -> Result<usize> {
        let delete_options = DeleteOptions {
            force: false,
            logging: options.logging.clone(),
        };
        self.delete_with(options, delete_options).await
    }

    /// Delete every match independently and concurrently.
    ///
    /// There is no atomicity: a failure on one node does not stop or undo
    /// the others. Returns how many deletes finished without a surfaced
    /// error; under [`FailurePolicy::Strict`] the first error is returned
    /// once all deletes have finished.
    pub async fn delete_with(
        &self,
        options: FindOptions,
        delete_options: DeleteOptions,
    ) -> Result<usize> {
        let matches = self.find_all(options).await?;

        let mut tasks = JoinSet::new();
        for properties in matches {
            let Some(id) = properties
                .get(ID_PROPERTY)
                .and_then(Value::as_str)
                .map(str::to_string)
            else {
                tracing::warn!(label = %self.label(), "Skipping matched node without _id");
                continue;
            };
            let access = self.access.clone();
            let delete_options = delete_options.clone();
            tasks.spawn(async move { access.delete_node(id.as_str(), &delete_options).await });
        }

        let mut deleted = 0;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            match joined? {
                Ok(()) => deleted += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                tracing::debug!(label = %self.label(), deleted, "Deleted nodes");
                Ok(deleted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::definition::ModelSpec;
    use crate::error::ModelError;
    use ogm_core::ValidationError;
    use ogm_graph::testing::ScriptedDriver;

    fn props(value: Value) -> PropertyMap {
        value.as_object().cloned().unwrap()
    }

    fn wizard(access: NodeAccess) -> Model {
        let def = ModelDefinition::new(ModelSpec::new("Wizard", ["name", "house"])).unwrap();
        Model::new(def, access)
    }

    #[tokio::test]
    async fn test_create_persists_fields_and_records_id() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(
            json!({"_id": "gen-1", "name": "Harry", "house": "Gryffindor"}),
        )]);
        let model = wizard(driver.access());

        let harry = model
            .create(&props(json!({"name": "Harry", "house": "Gryffindor"})))
            .await
            .unwrap();

        assert_eq!(harry.id(), Some("gen-1"));
        assert_eq!(
            harry.to_object(),
            props(json!({"_id": "gen-1", "name": "Harry", "house": "Gryffindor"}))
        );
        let statement = &driver.statements()[0];
        assert!(statement.text.starts_with("CREATE (n:`WIZARD`"));
        assert_eq!(statement.params["properties"]["name"], json!("Harry"));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_field_before_query() {
        let driver = ScriptedDriver::new();
        let model = wizard(driver.access());

        let result = model.create(&props(json!({"wand": "holly"}))).await;

        assert!(matches!(
            result,
            Err(ModelError::Validation(ValidationError::FieldNotDefined { .. }))
        ));
        assert!(driver.statements().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_soft_returns_unsaved_instance() {
        let driver = ScriptedDriver::new();
        driver.push_failure("offline");
        let model = wizard(driver.access());

        let harry = model.create(&props(json!({"name": "Harry"}))).await.unwrap();

        assert_eq!(harry.id(), None);
        assert_eq!(harry.get("name"), Some(&json!("Harry")));
    }

    #[tokio::test]
    async fn test_create_failure_strict_propagates() {
        let driver = ScriptedDriver::new();
        driver.push_failure("offline");
        let model = wizard(driver.access().with_policy(FailurePolicy::Strict));

        let result = model.create(&props(json!({"name": "Harry"}))).await;

        assert!(matches!(result, Err(ModelError::Graph(_))));
    }

    #[tokio::test]
    async fn test_find_all_rejects_unknown_where_field() {
        let driver = ScriptedDriver::new();
        let model = wizard(driver.access());

        let result = model
            .find_all(FindOptions::new().where_eq("patronus", "stag"))
            .await;

        assert!(matches!(
            result,
            Err(ModelError::Validation(ValidationError::UnknownWhereField { field })) if field == "patronus"
        ));
        assert_eq!(driver.sessions_opened(), 0);
    }

    #[tokio::test]
    async fn test_find_all_forces_model_label() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(json!({"_id": "1", "name": "Harry"}))]);
        let model = wizard(driver.access());

        let found = model
            .find_all(FindOptions::new().label("OWL").where_eq("name", "Harry"))
            .await
            .unwrap();

        assert_eq!(found, vec![props(json!({"_id": "1", "name": "Harry"}))]);
        assert_eq!(
            driver.statements()[0].text,
            "MATCH (n:`WIZARD`) WHERE n.`name` = $where_0 RETURN n"
        );
    }

    #[tokio::test]
    async fn test_find_one_limits_to_one() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(json!({"_id": "1", "name": "Harry"}))]);
        let model = wizard(driver.access());

        let found = model
            .find_one(FindOptions::new().where_eq("name", "Harry"))
            .await
            .unwrap();

        assert_eq!(found.unwrap()["_id"], json!("1"));
        assert_eq!(driver.statements()[0].params["limit"], json!(1));
    }

    #[tokio::test]
    async fn test_find_one_without_match_is_none() {
        let driver = ScriptedDriver::new();
        let model = wizard(driver.access());
        let found = model.find_one(FindOptions::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_find_by_id_rehydrates_instance() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(
            json!({"_id": "1", "name": "Harry", "house": "Gryffindor"}),
        )]);
        let model = wizard(driver.access());

        let harry = model.find_by_id("1").await.unwrap().unwrap();

        assert_eq!(harry.id(), Some("1"));
        assert_eq!(harry.get("house"), Some(&json!("Gryffindor")));
        assert_eq!(
            driver.statements()[0].text,
            "MATCH (n:`WIZARD`) WHERE n._id = $_id RETURN n"
        );
    }

    #[tokio::test]
    async fn test_find_by_id_skips_other_models_nodes() {
        let driver = ScriptedDriver::new();
        let model = wizard(driver.access());

        // An OWL node with this id exists, but the label scope excludes it.
        let found = model.find_by_id("owl-1").await.unwrap();

        assert!(found.is_none());
        let statement = &driver.statements()[0];
        assert!(statement.text.starts_with("MATCH (n:`WIZARD`)"));
        assert_eq!(statement.params["_id"], json!("owl-1"));
    }

    #[tokio::test]
    async fn test_delete_removes_every_match_by_id() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![
            props(json!({"_id": "1", "house": "Gryffindor"})),
            props(json!({"_id": "2", "house": "Gryffindor"})),
            props(json!({"house": "Gryffindor"})),
        ]);
        let model = wizard(driver.access());

        let deleted = model
            .delete(FindOptions::new().where_eq("house", "Gryffindor"))
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        let statements = driver.statements();
        assert_eq!(statements.len(), 3);
        let mut ids: Vec<_> = statements[1..]
            .iter()
            .map(|s| {
                assert_eq!(s.text, "MATCH (n) WHERE n._id = $_id DELETE n");
                s.params["_id"].as_str().unwrap().to_string()
            })
            .collect();
        ids.sort();
        assert_eq!(ids, ["1", "2"]);
        assert_eq!(driver.sessions_opened(), driver.sessions_closed());
    }

    #[tokio::test]
    async fn test_delete_rejects_unknown_where_field() {
        let driver = ScriptedDriver::new();
        let model = wizard(driver.access());
        let result = model.delete(FindOptions::new().where_eq("pet", "owl")).await;
        assert!(matches!(result, Err(e) if e.is_validation()));
    }

    #[tokio::test]
    async fn test_delete_soft_counts_refused_deletes() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(json!({"_id": "1"})), props(json!({"_id": "2"}))]);
        driver.push_failure("still has relationships");
        let model = wizard(driver.access());

        let deleted = model.delete(FindOptions::new()).await.unwrap();

        assert_eq!(deleted, 2);
        assert_eq!(driver.statements().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_strict_reports_failure_after_all_attempts() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(json!({"_id": "1"})), props(json!({"_id": "2"}))]);
        driver.push_failure("still has relationships");
        let model = wizard(driver.access().with_policy(FailurePolicy::Strict));

        let result = model.delete(FindOptions::new()).await;

        assert!(matches!(result, Err(ModelError::Graph(_))));
        // Both deletes ran even though one failed.
        assert_eq!(driver.statements().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_with_force_detaches() {
        let driver = ScriptedDriver::new();
        driver.push_properties(vec![props(json!({"_id": "1"}))]);
        let model = wizard(driver.access());

        let options = DeleteOptions {
            force: true,
            logging: None,
        };
        model.delete_with(FindOptions::new(), options).await.unwrap();

        assert!(driver.statements()[1].text.ends_with("DETACH DELETE n"));
    }

    #[test]
    fn test_models_share_definition() {
        let model = wizard(ScriptedDriver::new().access());
        let clone = model.clone();
        assert!(Arc::ptr_eq(&model.definition, &clone.definition));
    }
}
