//! CLI entry point for the wizard walkthrough.
//!
//! Defines a `Wizard` model, creates a few wizards, queries them back and
//! deletes them again, printing every result as JSON.

use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};
use tracing_subscriber::{fmt, EnvFilter};

use ogm_core::{FailurePolicy, OgmConfig, PropertyMap};
use ogm_graph::{FindOptions, Neo4jDriver, NodeAccess, QueryEvent, QueryLogger};
use ogm_model::{ModelRegistry, ModelSpec};

#[derive(Parser)]
#[command(name = "ogm-wizards")]
#[command(about = "Create, query and delete wizards through the OGM")]
struct Cli {
    /// House the created wizards belong to.
    #[arg(long, default_value = "Gryffindor")]
    house: String,

    /// Failure policy override: soft, strict.
    #[arg(short, long)]
    policy: Option<String>,

    /// Leave the created wizards in the database.
    #[arg(long)]
    keep: bool,

    /// Log every statement text before it runs.
    #[arg(long)]
    log_queries: bool,

    /// Config file prefix (default: ogm).
    #[arg(short, long, default_value = "ogm")]
    config: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let config = OgmConfig::load(&cli.config)?;
    let policy = match cli.policy.as_deref() {
        Some(raw) => parse_policy(raw)?,
        None => config.failure_policy,
    };

    let driver = Neo4jDriver::connect(&config.neo4j).await?;
    let access = NodeAccess::new(Arc::new(driver)).with_policy(policy);
    let registry = ModelRegistry::new(access);
    let wizard = registry.define_model(ModelSpec::new("Wizard", ["name", "house"]))?;

    let logger = cli.log_queries.then(query_logger);
    let by_house = || {
        let options = FindOptions::new().where_eq("house", cli.house.as_str());
        match &logger {
            Some(logger) => options.logging(logger.clone()),
            None => options,
        }
    };

    for name in ["Harry", "Hermione", "Ron"] {
        let created = wizard
            .create(&properties(json!({"name": name, "house": cli.house})))
            .await?;
        print_json("created", &Value::Object(created.to_object()));
    }

    let harry = wizard
        .find_one(FindOptions::new().where_eq("name", "Harry"))
        .await?;
    print_json("find_one", &json!(harry));

    let housemates = wizard.find_all(by_house()).await?;
    print_json("find_all", &json!(housemates));

    if cli.keep {
        tracing::info!(count = housemates.len(), "Keeping wizards");
        return Ok(());
    }

    let deleted = wizard.delete(by_house()).await?;
    tracing::info!(deleted, house = %cli.house, "Deleted wizards");

    let remaining = wizard.find_all(by_house()).await?;
    print_json("after_delete", &json!(remaining));

    Ok(())
}

fn parse_policy(s: &str) -> anyhow::Result<FailurePolicy> {
    match s.to_lowercase().as_str() {
        "soft" => Ok(FailurePolicy::Soft),
        "strict" => Ok(FailurePolicy::Strict),
        _ => anyhow::bail!("Invalid policy: {s}. Choose: soft, strict"),
    }
}

fn query_logger() -> QueryLogger {
    Arc::new(|event: QueryEvent<'_>| match event {
        QueryEvent::Statement(text) => tracing::info!(statement = %text, "Cypher"),
        QueryEvent::Failure(err) => tracing::error!(error = %err, "Query failed"),
    })
}

fn properties(value: Value) -> PropertyMap {
    match value {
        Value::Object(map) => map,
        _ => PropertyMap::new(),
    }
}

fn print_json(step: &str, value: &Value) {
    println!("{}", json!({ "step": step, "result": value }));
}
