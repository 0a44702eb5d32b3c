//! Response field filtering.
//!
//! A filter is either a bare list of fields to keep, or an object with
//! `include` or `exclude`. Inclusion always keeps `ok`. Giving both `include`
//! and `exclude` is a configuration error.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::AnalysisError;

const ALWAYS_KEPT: &str = "ok";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldFilter {
    Fields(Vec<String>),
    Spec {
        #[serde(default)]
        include: Option<Vec<String>>,
        #[serde(default)]
        exclude: Option<Vec<String>>,
    },
}

impl FieldFilter {
    pub fn include<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::Fields(fields.into_iter().map(Into::into).collect())
    }

    pub fn exclude<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldFilter::Spec {
            include: None,
            exclude: Some(fields.into_iter().map(Into::into).collect()),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        match self {
            FieldFilter::Spec {
                include: Some(_),
                exclude: Some(_),
            } => Err(AnalysisError::ConflictingFieldFilter),
            _ => Ok(()),
        }
    }

    /// Apply to a record. Non-object values pass through unchanged.
    pub fn apply(&self, record: Value) -> Result<Value, AnalysisError> {
        self.validate()?;
        let Value::Object(fields) = record else {
            return Ok(record);
        };

        let projected = match self {
            FieldFilter::Fields(keep)
            | FieldFilter::Spec {
                include: Some(keep),
                exclude: None,
            } => keep_fields(fields, keep),
            FieldFilter::Spec {
                include: None,
                exclude: Some(drop),
            } => drop_fields(fields, drop),
            _ => fields,
        };
        Ok(Value::Object(projected))
    }
}

fn keep_fields(fields: Map<String, Value>, keep: &[String]) -> Map<String, Value> {
    fields
        .into_iter()
        .filter(|(name, _)| name == ALWAYS_KEPT || keep.iter().any(|k| k == name))
        .collect()
}

fn drop_fields(mut fields: Map<String, Value>, drop: &[String]) -> Map<String, Value> {
    for name in drop {
        fields.remove(name);
    }
    fields
}

/// Apply an optional filter; `None` returns the record unchanged.
pub fn project(record: Value, filter: Option<&FieldFilter>) -> Result<Value, AnalysisError> {
    match filter {
        Some(filter) => filter.apply(record),
        None => Ok(record),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record() -> Value {
        json!({
            "ok": true,
            "summary": "Short.",
            "topics": ["science"],
            "language": "en"
        })
    }

    #[test]
    fn test_include_keeps_ok() {
        let filter = FieldFilter::include(["summary"]);
        let projected = filter.apply(record()).unwrap();
        assert_eq!(projected, json!({"ok": true, "summary": "Short."}));
    }

    #[test]
    fn test_include_and_exclude_conflict() {
        let filter: FieldFilter =
            serde_json::from_value(json!({"include": ["summary"], "exclude": ["topics"]})).unwrap();
        assert!(matches!(filter.apply(record()), Err(AnalysisError::ConflictingFieldFilter)));
    }

    #[test]
    fn test_include_object_form() {
        let filter: FieldFilter = serde_json::from_value(json!({"include": ["summary"]})).unwrap();
        let projected = filter.apply(record()).unwrap();
        let keys: Vec<&String> = projected.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 2);
        assert!(projected.get("ok").is_some());
        assert!(projected.get("summary").is_some());
    }

    #[test]
    fn test_exclude() {
        let filter = FieldFilter::exclude(["topics", "language"]);
        let projected = filter.apply(record()).unwrap();
        assert_eq!(projected, json!({"ok": true, "summary": "Short."}));
    }

    #[test]
    fn test_neither_passes_through() {
        let filter: FieldFilter = serde_json::from_value(json!({})).unwrap();
        assert_eq!(filter.apply(record()).unwrap(), record());
        assert_eq!(project(record(), None).unwrap(), record());
    }

    #[test]
    fn test_array_form_deserializes() {
        let filter: FieldFilter = serde_json::from_value(json!(["summary", "topics"])).unwrap();
        assert_eq!(filter, FieldFilter::include(["summary", "topics"]));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let filter = FieldFilter::include(["missing"]);
        assert_eq!(filter.apply(record()).unwrap(), json!({"ok": true}));
    }
}
