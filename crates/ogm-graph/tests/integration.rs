//! Integration tests for ogm-graph against a live Neo4j instance.
//!
//! Run with: cargo test --package ogm-graph --test integration -- --ignored
//!
//! Connection settings come from `OGM__NEO4J__*` variables (see ogm-core).
//! Skipped automatically if Neo4j is not available.

use std::sync::Arc;

use serde_json::{json, Value};

use ogm_core::OgmConfig;
use ogm_graph::{
    DeleteOptions, FailurePolicy, FindOptions, GraphDriver, Neo4jDriver, NodeAccess, PropertyMap,
    SetAllPropertiesOptions, SetPropertyOptions,
};

async fn connect_or_skip() -> Option<(Neo4jDriver, NodeAccess)> {
    let config = OgmConfig::load("ogm").unwrap_or_default();
    match Neo4jDriver::connect(&config.neo4j).await {
        Ok(driver) => {
            let access = NodeAccess::new(Arc::new(driver.clone()) as Arc<dyn GraphDriver>);
            Some((driver, access))
        }
        Err(e) => {
            eprintln!("Skipping integration test (Neo4j not available): {e}");
            None
        }
    }
}

/// A label no other test run will collide with.
fn unique_label() -> String {
    format!("OGM_TEST_{}", uuid::Uuid::new_v4().simple())
}

async fn cleanup(driver: &Neo4jDriver, label: &str) {
    let q = neo4rs::query(&format!("MATCH (n:`{label}`) DETACH DELETE n"));
    let _ = driver.inner().run(q).await;
}

fn props(value: Value) -> PropertyMap {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_create_and_find_by_id() {
    let Some((driver, access)) = connect_or_skip().await else {
        return;
    };
    let label = unique_label();

    let created = access
        .create_node(&label, Some(&props(json!({"name": "Harry", "house": "Gryffindor"}))))
        .await
        .unwrap();
    let id = created["_id"].as_str().unwrap().to_string();

    let found = access.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(found["name"], json!("Harry"));
    assert_eq!(found["house"], json!("Gryffindor"));
    assert_eq!(found["_id"], json!(id));

    cleanup(&driver, &label).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_find_by_missing_id_is_none() {
    let Some((_driver, access)) = connect_or_skip().await else {
        return;
    };
    let missing = uuid::Uuid::new_v4().to_string();
    assert!(access.find_by_id(&missing).await.unwrap().is_none());
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_find_nodes_with_filter_and_limit() {
    let Some((driver, access)) = connect_or_skip().await else {
        return;
    };
    let label = unique_label();

    for (name, house) in [
        ("Harry", "Gryffindor"),
        ("Hermione", "Gryffindor"),
        ("Draco", "Slytherin"),
    ] {
        access
            .create_node(&label, Some(&props(json!({"name": name, "house": house}))))
            .await
            .unwrap();
    }

    let gryffindors = access
        .find_nodes(&FindOptions::new().label(&label).where_eq("house", "Gryffindor"))
        .await
        .unwrap();
    assert_eq!(gryffindors.len(), 2);

    let one = access
        .find_nodes(&FindOptions::new().label(&label).limit(1))
        .await
        .unwrap();
    assert_eq!(one.len(), 1);

    let none = access
        .find_nodes(&FindOptions::new().label(&label).where_eq("house", "Ravenclaw"))
        .await
        .unwrap();
    assert!(none.is_empty());

    cleanup(&driver, &label).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_set_property_and_set_all() {
    let Some((driver, access)) = connect_or_skip().await else {
        return;
    };
    let label = unique_label();

    let created = access
        .create_node(&label, Some(&props(json!({"name": "Neville"}))))
        .await
        .unwrap();
    let id = created["_id"].as_str().unwrap().to_string();

    let updated = access
        .set_property_on_node(&id, &SetPropertyOptions::new("house", "Gryffindor"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated["house"], json!("Gryffindor"));

    let replaced = access
        .set_all_properties_on_node(
            &id,
            &SetAllPropertiesOptions {
                properties: props(json!({"name": "Luna"})),
                logging: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(replaced["name"], json!("Luna"));
    assert_eq!(replaced["_id"], json!(id));
    assert!(replaced.get("house").is_none());

    cleanup(&driver, &label).await;
}

#[tokio::test]
#[ignore = "requires live Neo4j"]
async fn test_delete_connected_node_requires_force() {
    let Some((driver, access)) = connect_or_skip().await else {
        return;
    };
    let label = unique_label();
    let strict = access.clone().with_policy(FailurePolicy::Strict);

    let a = access.create_node(&label, None).await.unwrap();
    let b = access.create_node(&label, None).await.unwrap();
    let a_id = a["_id"].as_str().unwrap().to_string();
    let b_id = b["_id"].as_str().unwrap().to_string();

    let link = neo4rs::query(&format!(
        "MATCH (a:`{label}` {{_id: $a}}), (b:`{label}` {{_id: $b}}) CREATE (a)-[:KNOWS]->(b)"
    ))
    .param("a", a_id.clone())
    .param("b", b_id.clone());
    driver.inner().run(link).await.unwrap();

    // Plain delete of a connected node is refused and surfaces as an error.
    let refused = strict.delete_node(&a_id, &DeleteOptions::default()).await;
    assert!(refused.is_err());
    assert!(access.find_by_id(&a_id).await.unwrap().is_some());

    let forced = DeleteOptions {
        force: true,
        ..Default::default()
    };
    strict.delete_node(&a_id, &forced).await.unwrap();
    assert!(access.find_by_id(&a_id).await.unwrap().is_none());
    assert!(access.find_by_id(&b_id).await.unwrap().is_some());

    cleanup(&driver, &label).await;
}
