//! Immutable document data containers.
//!
//! [`ObjectValue`] wraps a JSON object and exposes persistent-style
//! operations: `set` and `delete` return a new container and never touch
//! the original. This keeps documents shareable values, which the apply
//! paths in [`crate::mutation`] rely on.

use crate::error::{Error, Result};
use crate::{FieldPath, FieldValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An immutable container of document fields, addressed by [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectValue {
    fields: Map<String, Value>,
}

impl ObjectValue {
    /// The empty container.
    pub fn empty() -> Self {
        Self { fields: Map::new() }
    }

    /// Create a container from a JSON value.
    ///
    /// Returns [`Error::NotAnObject`] if the value is not a JSON object.
    pub fn from_value(value: FieldValue) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(Error::NotAnObject(other.to_string())),
        }
    }

    /// Create a container directly from a field map.
    pub fn from_map(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Look up the value at `path`, walking nested objects.
    ///
    /// Returns `None` if any step of the path is missing or runs through
    /// a non-object value.
    pub fn field(&self, path: &FieldPath) -> Option<&FieldValue> {
        let (last, parents) = path.segments().split_last().expect("non-empty path");
        let mut current = &self.fields;
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        current.get(last)
    }

    /// Return a new container with `value` stored at `path`.
    ///
    /// Missing intermediate objects are created; intermediate values that
    /// are not objects are overwritten with fresh objects.
    pub fn set(&self, path: &FieldPath, value: FieldValue) -> Self {
        let mut fields = self.fields.clone();
        let (last, parents) = path.segments().split_last().expect("non-empty path");
        let mut current = &mut fields;
        for segment in parents {
            let entry = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            current = entry.as_object_mut().expect("entry was just made an object");
        }
        current.insert(last.clone(), value);
        Self { fields }
    }

    /// Return a new container with the value at `path` removed.
    ///
    /// If the path does not resolve (a step is missing or not an object),
    /// the result equals the original container.
    pub fn delete(&self, path: &FieldPath) -> Self {
        let mut fields = self.fields.clone();
        let (last, parents) = path.segments().split_last().expect("non-empty path");
        let mut current = &mut fields;
        for segment in parents {
            match current.get_mut(segment).and_then(Value::as_object_mut) {
                Some(next) => current = next,
                None => return Self { fields: self.fields.clone() },
            }
        }
        current.remove(last);
        Self { fields }
    }

    /// Whether the container holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The underlying field map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Convert into a plain JSON value.
    pub fn into_value(self) -> FieldValue {
        Value::Object(self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    fn object(value: Value) -> ObjectValue {
        ObjectValue::from_value(value).unwrap()
    }

    #[test]
    fn from_value_rejects_non_objects() {
        assert_eq!(
            ObjectValue::from_value(json!(null)),
            Err(Error::NotAnObject("null".into()))
        );
        assert!(ObjectValue::from_value(json!([1, 2])).is_err());
        assert!(ObjectValue::from_value(json!("text")).is_err());
    }

    #[test]
    fn field_top_level() {
        let obj = object(json!({"name": "Alice", "age": 30}));
        assert_eq!(obj.field(&path("name")), Some(&json!("Alice")));
        assert_eq!(obj.field(&path("age")), Some(&json!(30)));
        assert_eq!(obj.field(&path("missing")), None);
    }

    #[test]
    fn field_nested() {
        let obj = object(json!({"address": {"city": {"zip": "10001"}}}));
        assert_eq!(obj.field(&path("address.city.zip")), Some(&json!("10001")));
        assert_eq!(obj.field(&path("address.city")), Some(&json!({"zip": "10001"})));
        assert_eq!(obj.field(&path("address.street")), None);
    }

    #[test]
    fn field_through_non_object_is_absent() {
        let obj = object(json!({"a": 1}));
        assert_eq!(obj.field(&path("a.b")), None);
    }

    #[test]
    fn set_leaves_original_untouched() {
        let obj = object(json!({"a": 1}));
        let updated = obj.set(&path("b"), json!(2));

        assert_eq!(obj, object(json!({"a": 1})));
        assert_eq!(updated, object(json!({"a": 1, "b": 2})));
    }

    #[test]
    fn set_creates_intermediate_objects() {
        let obj = ObjectValue::empty();
        let updated = obj.set(&path("a.b.c"), json!(1));
        assert_eq!(updated, object(json!({"a": {"b": {"c": 1}}})));
    }

    #[test]
    fn set_overwrites_non_object_intermediate() {
        let obj = object(json!({"a": 5}));
        let updated = obj.set(&path("a.b"), json!(1));
        assert_eq!(updated, object(json!({"a": {"b": 1}})));
    }

    #[test]
    fn set_preserves_siblings() {
        let obj = object(json!({"a": {"x": 1, "y": 2}}));
        let updated = obj.set(&path("a.x"), json!(9));
        assert_eq!(updated, object(json!({"a": {"x": 9, "y": 2}})));
    }

    #[test]
    fn delete_removes_leaf() {
        let obj = object(json!({"a": {"b": 1, "c": 2}}));
        let updated = obj.delete(&path("a.b"));
        assert_eq!(updated, object(json!({"a": {"c": 2}})));
        // original untouched
        assert_eq!(obj.field(&path("a.b")), Some(&json!(1)));
    }

    #[test]
    fn delete_missing_path_is_noop() {
        let obj = object(json!({"a": 1}));
        assert_eq!(obj.delete(&path("b")), obj);
        assert_eq!(obj.delete(&path("b.c")), obj);
        assert_eq!(obj.delete(&path("a.b")), obj); // "a" is not an object
    }

    #[test]
    fn empty_container() {
        let obj = ObjectValue::empty();
        assert!(obj.is_empty());
        assert_eq!(obj, ObjectValue::default());
        assert_eq!(obj.into_value(), json!({}));
    }

    #[test]
    fn serialization_is_transparent() {
        let obj = object(json!({"name": "Alice"}));
        let json = serde_json::to_string(&obj).unwrap();
        assert_eq!(json, r#"{"name":"Alice"}"#);

        let parsed: ObjectValue = serde_json::from_str(&json).unwrap();
        assert_eq!(obj, parsed);
    }
}
