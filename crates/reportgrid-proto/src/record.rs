//! Records: flat mappings from field id to value.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::value::Value;

/// A single row of the record set.
///
/// Fields keep the order they were supplied in, which is the order the
/// search term walks them and the order a table shows them when no columns
/// are configured.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a field, replacing any previous value for the same id.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == field) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Get a field value by id.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, v)| v)
    }

    /// Get a field value by id, treating a missing field as null.
    pub fn value(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.get(field).unwrap_or(&NULL)
    }

    /// Iterate over `(field id, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, v)| (name.as_str(), v))
    }

    /// Iterate over the field ids.
    pub fn field_ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (field, value) in iter {
            record.insert(field, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field ids to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
        let mut record = Record {
            fields: Vec::with_capacity(access.size_hint().unwrap_or(0)),
        };
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            record.insert(name, value);
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_missing() {
        let record = Record::new().with("id", 1).with("status", "pending");

        assert_eq!(record.get("status"), Some(&Value::from("pending")));
        assert_eq!(record.get("analyst"), None);
        assert_eq!(record.value("analyst"), &Value::Null);
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut record = Record::new().with("status", "pending");
        record.insert("status", "completed");

        assert_eq!(record.len(), 1);
        assert_eq!(record.value("status"), &Value::from("completed"));
    }

    #[test]
    fn test_json_preserves_field_order() {
        let record: Record =
            serde_json::from_str(r#"{"zeta": 1, "alpha": "a", "mid": null}"#).unwrap();

        let ids: Vec<&str> = record.field_ids().collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"zeta":1,"alpha":"a","mid":null}"#);
    }

    #[test]
    fn test_json_roundtrip_keeps_numbers_exact() {
        let input = r#"{"id":1,"batch":9007199254740993,"ratio":0.25}"#;
        let record: Record = serde_json::from_str(input).unwrap();

        assert_eq!(record.value("batch").as_i64(), Some(9_007_199_254_740_993));
        assert_eq!(serde_json::to_string(&record).unwrap(), input);
    }

    #[test]
    fn test_from_iterator() {
        let record: Record = vec![("a", Value::from(1)), ("b", Value::Bool(true))]
            .into_iter()
            .collect();
        assert_eq!(record.value("b"), &Value::Bool(true));
    }
}
