//! Cypher statement builders.
//!
//! Labels and property names are interpolated only after passing through
//! [`escape_identifier`]; every value is bound as a parameter. Filter values
//! are bound under positional names (`where_0`, `where_1`, ...) so a field
//! name never becomes a parameter name.

use serde_json::Value;

use ogm_core::{escape_identifier, PropertyMap, ValidationError, ID_PROPERTY};

use crate::driver::Statement;

/// Variable every statement binds the matched node to, and returns.
pub const NODE_ALIAS: &str = "n";

const MATCH_BY_ID: &str = "MATCH (n) WHERE n._id = $_id";

/// `CREATE` a labeled node carrying `id`, and optionally a full property bag.
pub fn create_node(
    label: &str,
    id: &str,
    properties: Option<&PropertyMap>,
) -> Result<Statement, ValidationError> {
    let label = escape_identifier(label)?;
    let statement = match properties {
        Some(props) => Statement::new(format!(
            "CREATE (n:{label} {{_id: $_id}}) SET n = $properties RETURN n"
        ))
        .param("properties", with_id(props, id)),
        None => Statement::new(format!("CREATE (n:{label} {{_id: $_id}}) RETURN n")),
    };
    Ok(statement.param(ID_PROPERTY, id))
}

/// Delete the node with `id`; `force` also removes its relationships.
pub fn delete_node(id: &str, force: bool) -> Statement {
    let verb = if force { "DETACH DELETE" } else { "DELETE" };
    Statement::new(format!("{MATCH_BY_ID} {verb} n")).param(ID_PROPERTY, id)
}

/// Set a single property on the node with `id`.
pub fn set_property(id: &str, key: &str, value: &Value) -> Result<Statement, ValidationError> {
    let key = escape_identifier(key)?;
    Ok(
        Statement::new(format!("{MATCH_BY_ID} SET n.{key} = $value RETURN n"))
            .param(ID_PROPERTY, id)
            .param("value", value.clone()),
    )
}

/// Replace the whole property bag of the node with `id`, keeping its `_id`.
pub fn set_all_properties(id: &str, properties: &PropertyMap) -> Statement {
    Statement::new(format!("{MATCH_BY_ID} SET n = $properties RETURN n"))
        .param(ID_PROPERTY, id)
        .param("properties", with_id(properties, id))
}

/// Match the node with `id`, optionally only if it carries `label`.
pub fn find_by_id(label: Option<&str>, id: &str) -> Result<Statement, ValidationError> {
    let text = match non_empty(label) {
        Some(label) => format!(
            "MATCH (n:{}) WHERE n._id = $_id RETURN n",
            escape_identifier(label)?
        ),
        None => format!("{MATCH_BY_ID} RETURN n"),
    };
    Ok(Statement::new(text).param(ID_PROPERTY, id))
}

/// Match nodes by optional label and an exact-match conjunctive filter.
///
/// An empty label matches any label, and a `limit` of zero means no limit.
pub fn find_nodes(
    label: Option<&str>,
    filter: &PropertyMap,
    skip: Option<u64>,
    limit: Option<u64>,
) -> Result<Statement, ValidationError> {
    let mut text = match non_empty(label) {
        Some(label) => format!("MATCH (n:{})", escape_identifier(label)?),
        None => "MATCH (n)".to_string(),
    };
    let mut statement = Statement::new(String::new());

    if !filter.is_empty() {
        let mut clauses = Vec::with_capacity(filter.len());
        for (i, (field, value)) in filter.iter().enumerate() {
            let param = format!("where_{i}");
            clauses.push(format!("n.{} = ${param}", escape_identifier(field)?));
            statement = statement.param(param, value.clone());
        }
        text.push_str(" WHERE ");
        text.push_str(&clauses.join(" AND "));
    }

    text.push_str(" RETURN n");
    if let Some(skip) = skip.filter(|s| *s > 0) {
        text.push_str(" SKIP $skip");
        statement = statement.param("skip", skip);
    }
    if let Some(limit) = limit.filter(|l| *l > 0) {
        text.push_str(" LIMIT $limit");
        statement = statement.param("limit", limit);
    }

    statement.text = text;
    Ok(statement)
}

fn non_empty(label: Option<&str>) -> Option<&str> {
    label.filter(|l| !l.is_empty())
}

/// The caller's properties with `_id` forced to `id`.
fn with_id(properties: &PropertyMap, id: &str) -> PropertyMap {
    let mut merged = properties.clone();
    merged.insert(ID_PROPERTY.to_string(), Value::from(id));
    merged
}
