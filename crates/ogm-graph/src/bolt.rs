//! Conversion between JSON property values and Bolt values.

use neo4rs::{BoltList, BoltMap, BoltNull, BoltString, BoltType};
use serde_json::Value;

use crate::client::GraphError;
use ogm_core::{NodeRecord, PropertyMap};

/// Convert a JSON value into a Bolt parameter value.
///
/// Integers that fit in `i64` stay integers; everything else numeric is sent
/// as a float.
pub fn to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => BoltType::from(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => BoltType::from(i),
            None => BoltType::from(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => BoltType::from(s.as_str()),
        Value::Array(items) => {
            let mut list = BoltList::new();
            for item in items {
                list.push(to_bolt(item));
            }
            BoltType::List(list)
        }
        Value::Object(map) => {
            let mut bolt = BoltMap::new();
            for (key, item) in map {
                bolt.put(BoltString::from(key.as_str()), to_bolt(item));
            }
            BoltType::Map(bolt)
        }
    }
}

/// Convert a neo4rs node into a normalized record.
pub fn node_to_record(node: &neo4rs::Node) -> Result<NodeRecord, GraphError> {
    let labels = node.labels().into_iter().map(str::to_string).collect();

    let mut properties = PropertyMap::new();
    for key in node.keys() {
        let value: Value = node.get(key).map_err(|e| {
            GraphError::Serialization(format!("Failed to read property {key}: {e}"))
        })?;
        properties.insert(key.to_string(), value);
    }

    Ok(NodeRecord::new(labels, properties))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalars_convert() {
        assert_eq!(to_bolt(&json!(null)), BoltType::Null(BoltNull));
        assert_eq!(to_bolt(&json!(true)), BoltType::from(true));
        assert_eq!(to_bolt(&json!(42)), BoltType::from(42_i64));
        assert_eq!(to_bolt(&json!(1.5)), BoltType::from(1.5_f64));
        assert_eq!(to_bolt(&json!("Harry")), BoltType::from("Harry"));
    }

    #[test]
    fn test_oversized_integer_becomes_float() {
        let big = json!(u64::MAX);
        assert!(matches!(to_bolt(&big), BoltType::Float(_)));
    }

    #[test]
    fn test_nested_values_convert() {
        let value = to_bolt(&json!({"tags": ["a", "b"], "_id": "x"}));
        let BoltType::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map.value.len(), 2);
        assert!(matches!(
            map.value.get(&BoltString::from("tags")),
            Some(BoltType::List(list)) if list.value.len() == 2
        ));
    }
}
