use crate::utils::error::{GraphError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

pub const DEFAULT_LABEL: &str = "Unnamed";

/// A decoded document as handed back by a store scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub fields: HashMap<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: HashMap<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Build from a JSON object; anything else yields an empty document.
    pub fn from_json(id: impl Into<String>, value: Value) -> Self {
        let fields = match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self::new(id, fields)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Typed view of a user document.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub name: Option<String>,
    pub score: Option<f64>,
    pub tasks: Vec<Value>,
}

impl UserRecord {
    pub fn decode(document: &Document) -> Result<Self> {
        let name = match document.fields.get("name") {
            None => None,
            // explicit null clears the label rather than defaulting it
            Some(Value::Null) => Some(String::new()),
            Some(Value::String(name)) => Some(name.clone()),
            Some(other) => {
                return Err(GraphError::decode(
                    &document.id,
                    format!("name must be a string, got {}", type_name(other)),
                ))
            }
        };

        let score = match document.fields.get("score") {
            None => None,
            Some(value) => coerce_score(value).map_err(|message| {
                GraphError::decode(&document.id, format!("score {}", message))
            })?,
        };

        // tasks are carried along but never fail the decode
        let tasks = match document.fields.get("tasks") {
            Some(Value::Array(tasks)) => tasks.clone(),
            _ => Vec::new(),
        };

        Ok(Self {
            id: document.id.clone(),
            name,
            score,
            tasks,
        })
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_LABEL)
    }

    pub fn value(&self) -> f64 {
        self.score.unwrap_or(0.0)
    }

    pub fn into_point(self) -> GraphPoint {
        let value = self.value();
        GraphPoint {
            label: self.name.unwrap_or_else(|| DEFAULT_LABEL.to_string()),
            value,
        }
    }
}

/// `Ok(None)` for null; numbers, booleans and numeric strings coerce to f64.
pub fn coerce_score(value: &Value) -> std::result::Result<Option<f64>, String> {
    match value {
        Value::Null => Ok(None),
        Value::Number(number) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("{} is out of range for a float", number)),
        Value::Bool(flag) => Ok(Some(if *flag { 1.0 } else { 0.0 })),
        Value::String(text) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("could not convert string to float: '{}'", text)),
        other => Err(format!("must be a number, got {}", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "map",
    }
}

/// One charted (label, value) pair. Serializes as the gateway's JSON item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPoint {
    pub label: String,
    pub value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> Document {
        Document::from_json("user-1", fields)
    }

    #[test]
    fn test_absent_and_null_score_become_zero() {
        let absent = UserRecord::decode(&doc(json!({"name": "Ana"}))).unwrap();
        let null = UserRecord::decode(&doc(json!({"name": "Ana", "score": null}))).unwrap();

        assert_eq!(absent.value(), 0.0);
        assert_eq!(null.value(), 0.0);
        assert_eq!(null.into_point().value, 0.0);
    }

    #[test]
    fn test_absent_name_uses_default_label() {
        let record = UserRecord::decode(&doc(json!({"score": 7}))).unwrap();

        assert_eq!(record.label(), "Unnamed");
        let point = record.into_point();
        assert_eq!(point.label, DEFAULT_LABEL);
        assert_eq!(point.value, 7.0);
    }

    #[test]
    fn test_null_name_gives_empty_label() {
        let point = UserRecord::decode(&doc(json!({"name": null, "score": 1})))
            .unwrap()
            .into_point();

        assert_eq!(point.label, "");
        assert_eq!(point.value, 1.0);
    }

    #[test]
    fn test_numeric_variants_coerce() {
        assert_eq!(coerce_score(&json!(42)).unwrap(), Some(42.0));
        assert_eq!(coerce_score(&json!(2.5)).unwrap(), Some(2.5));
        assert_eq!(coerce_score(&json!(true)).unwrap(), Some(1.0));
        assert_eq!(coerce_score(&json!(" 12.5 ")).unwrap(), Some(12.5));
    }

    #[test]
    fn test_non_numeric_score_is_decode_error() {
        let err = UserRecord::decode(&doc(json!({"name": "Bo", "score": "lots"}))).unwrap_err();

        match err {
            GraphError::DecodeError { document, message } => {
                assert_eq!(document, "user-1");
                assert!(message.contains("lots"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(UserRecord::decode(&doc(json!({"score": [1, 2]}))).is_err());
        assert!(UserRecord::decode(&doc(json!({"score": {"v": 1}}))).is_err());
    }

    #[test]
    fn test_non_string_name_is_decode_error() {
        assert!(UserRecord::decode(&doc(json!({"name": 12, "score": 1}))).is_err());
    }

    #[test]
    fn test_tasks_are_lenient() {
        let record = UserRecord::decode(&doc(json!({
            "name": "Cy",
            "score": 3,
            "tasks": [{"id": "t1", "title": "write", "status": "open"}]
        })))
        .unwrap();
        assert_eq!(record.tasks.len(), 1);

        let odd = UserRecord::decode(&doc(json!({"name": "Cy", "tasks": "nope"}))).unwrap();
        assert!(odd.tasks.is_empty());
    }

    #[test]
    fn test_from_json_non_object_is_empty() {
        assert!(Document::from_json("x", json!(null)).is_empty());
        assert!(Document::from_json("x", json!([1])).is_empty());
        assert!(!doc(json!({"name": "A"})).is_empty());
    }

    #[test]
    fn test_point_serializes_as_label_value() {
        let point = GraphPoint {
            label: "User1".to_string(),
            value: 10.0,
        };
        assert_eq!(
            serde_json::to_string(&point).unwrap(),
            r#"{"label":"User1","value":10.0}"#
        );
    }
}
