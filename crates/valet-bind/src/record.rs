//! Records
//!
//! A record maps field names to a scalar string or an ordered sequence of
//! strings. `@id` and `@type` are ordinary fields with reserved names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity field
pub const ID_FIELD: &str = "@id";

/// Type field
pub const TYPE_FIELD: &str = "@type";

/// Value of one record field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Many(Vec<String>),
}

impl FieldValue {
    /// First scalar: the scalar itself or the head of the sequence
    pub fn first(&self) -> Option<&str> {
        self.values().first().map(String::as_str)
    }

    /// All scalars in order
    pub fn values(&self) -> &[String] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// Single-string rendering; sequences are joined with `,`
    pub fn to_scalar(&self) -> String {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Many(values) => values.join(","),
        }
    }

    /// Append `other`, promoting a scalar to a sequence
    pub fn append(&mut self, other: FieldValue) {
        let mut values = match std::mem::replace(self, Self::Many(Vec::new())) {
            Self::Scalar(value) => vec![value],
            Self::Many(values) => values,
        };
        match other {
            Self::Scalar(value) => values.push(value),
            Self::Many(more) => values.extend(more),
        }
        *self = Self::Many(values);
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Field map of one record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Record::set`]
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Field value
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// First scalar of a field
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::first)
    }

    /// Replace a field
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Remove a field
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Add a value under `name`: the first occurrence is stored as is, later
    /// ones turn the field into a sequence in arrival order
    pub fn accumulate(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.get_mut(name) {
            Some(existing) => existing.append(value),
            None => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }

    /// `@id` field
    pub fn id(&self) -> Option<&str> {
        self.first(ID_FIELD)
    }

    /// `@type` field
    pub fn type_name(&self) -> Option<&str> {
        self.first(TYPE_FIELD)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_promotes_in_order() {
        let mut record = Record::new();
        record.accumulate("tag", "a");
        assert_eq!(record.get("tag"), Some(&FieldValue::from("a")));

        record.accumulate("tag", "b");
        record.accumulate("tag", "c");
        assert_eq!(record.get("tag"), Some(&FieldValue::from(vec!["a", "b", "c"])));
    }

    #[test]
    fn test_accumulate_flattens_sequences() {
        let mut record = Record::new();
        record.accumulate("tag", "a");
        record.accumulate("tag", vec!["b", "c"]);
        record.accumulate("tag", "d");

        let expected: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        assert_eq!(record.get("tag").map(FieldValue::values), Some(expected.as_slice()));
    }

    #[test]
    fn test_first_helper() {
        assert_eq!(FieldValue::from("x").first(), Some("x"));
        assert_eq!(FieldValue::from(vec!["y", "z"]).first(), Some("y"));
        assert_eq!(FieldValue::Many(Vec::new()).first(), None);
    }

    #[test]
    fn test_json_shape() {
        let record = Record::new()
            .with(ID_FIELD, "p1")
            .with("name", "Alice")
            .with("tag", vec!["a", "b"]);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"@id": "p1", "name": "Alice", "tag": ["a", "b"]})
        );

        let back: Record = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.id(), Some("p1"));
        assert_eq!(back.type_name(), None);
    }

    #[test]
    fn test_to_scalar_joins() {
        assert_eq!(FieldValue::from(vec!["a", "b"]).to_scalar(), "a,b");
        assert_eq!(FieldValue::from("a").to_scalar(), "a");
    }
}
