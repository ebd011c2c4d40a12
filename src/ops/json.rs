//! [`JsonOps`]: the reference [`DynamicOps`] backend, over [`serde_json::Value`].
//!
//! This is the one concrete backend the engine ships with, mirroring how a format-agnostic
//! migration engine still needs at least one reference implementation to bootstrap against
//! and to exercise in tests. YAML, TOML, or binary-tree backends are external collaborators
//! that implement the same [`DynamicOps`] contract.

use serde_json::{
    Map,
    Number as JsonNumber,
    Value,
};

use crate::{
    ops::{
        DynamicOps,
        Number,
    },
    result::DataResult,
};

/// A [`DynamicOps`] implementation backed by [`serde_json::Value`].
///
/// `JsonOps` is a zero-sized, stateless handle; two instances are always interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonOps;

impl DynamicOps<Value> for JsonOps {
    fn empty_map(&self) -> Value {
        Value::Object(Map::new())
    }

    fn empty_list(&self) -> Value {
        Value::Array(Vec::new())
    }

    fn is_map(&self, value: &Value) -> bool {
        value.is_object()
    }

    fn is_list(&self, value: &Value) -> bool {
        value.is_array()
    }

    fn is_string(&self, value: &Value) -> bool {
        value.is_string()
    }

    fn is_number(&self, value: &Value) -> bool {
        value.is_number()
    }

    fn is_boolean(&self, value: &Value) -> bool {
        value.is_boolean()
    }

    fn create_string(&self, value: &str) -> Value {
        Value::String(value.to_owned())
    }

    fn create_int(&self, value: i32) -> Value {
        Value::Number(value.into())
    }

    fn create_long(&self, value: i64) -> Value {
        Value::Number(value.into())
    }

    fn create_float(&self, value: f32) -> Value {
        self.create_double(value as f64)
    }

    fn create_double(&self, value: f64) -> Value {
        JsonNumber::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }

    fn create_byte(&self, value: i8) -> Value {
        self.create_int(value as i32)
    }

    fn create_short(&self, value: i16) -> Value {
        self.create_int(value as i32)
    }

    fn create_boolean(&self, value: bool) -> Value {
        Value::Bool(value)
    }

    fn get_string_value(&self, value: &Value) -> DataResult<String> {
        match value.as_str() {
            Some(s) => DataResult::Success(s.to_owned()),
            None => DataResult::Error(format!("not a string: {value}")),
        }
    }

    fn get_number_value(&self, value: &Value) -> DataResult<Number> {
        match value.as_number() {
            Some(n) => {
                if let Some(i) = n.as_i64() {
                    if let Ok(i) = i32::try_from(i) {
                        DataResult::Success(Number::Int(i))
                    } else {
                        DataResult::Success(Number::Long(i))
                    }
                } else if let Some(f) = n.as_f64() {
                    DataResult::Success(Number::Double(f))
                } else {
                    DataResult::Error(format!("unrepresentable number: {value}"))
                }
            }
            None => DataResult::Error(format!("not a number: {value}")),
        }
    }

    fn get_boolean_value(&self, value: &Value) -> DataResult<bool> {
        match value.as_bool() {
            Some(b) => DataResult::Success(b),
            None => DataResult::Error(format!("not a boolean: {value}")),
        }
    }

    fn create_list(&self, items: Vec<Value>) -> Value {
        Value::Array(items)
    }

    fn get_list(&self, value: &Value) -> DataResult<Vec<Value>> {
        match value.as_array() {
            Some(items) => DataResult::Success(items.clone()),
            None => DataResult::Error(format!("not a list: {value}")),
        }
    }

    fn create_map(&self, entries: Vec<(Value, Value)>) -> Value {
        let mut map = Map::new();
        for (key, value) in entries {
            if let Some(key) = key.as_str() {
                map.insert(key.to_owned(), value);
            }
        }
        Value::Object(map)
    }

    fn get_map_entries(&self, value: &Value) -> DataResult<Vec<(Value, Value)>> {
        match value.as_object() {
            Some(map) => DataResult::Success(
                map.iter()
                    .map(|(k, v)| (Value::String(k.clone()), v.clone()))
                    .collect(),
            ),
            None => DataResult::Error(format!("not a map: {value}")),
        }
    }

    fn get(&self, map: &Value, key: &str) -> Option<Value> {
        map.as_object()?.get(key).cloned()
    }

    fn set(&self, map: &Value, key: &str, value: Value) -> Value {
        let mut map = map.as_object().cloned().unwrap_or_default();
        map.insert(key.to_owned(), value);
        Value::Object(map)
    }

    fn remove(&self, map: &Value, key: &str) -> Value {
        let mut map = map.as_object().cloned().unwrap_or_default();
        map.remove(key);
        Value::Object(map)
    }

    fn has(&self, map: &Value, key: &str) -> bool {
        map.as_object().is_some_and(|m| m.contains_key(key))
    }

    fn debug(&self, value: &Value) -> String {
        value.to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn primitive_round_trip() {
        let ops = JsonOps;
        assert_eq!(ops.get_string_value(&ops.create_string("hi")), DataResult::Success("hi".to_owned()));
        assert_eq!(ops.get_boolean_value(&ops.create_boolean(true)), DataResult::Success(true));
        assert_eq!(ops.get_number_value(&ops.create_int(42)).value(), Some(Number::Int(42)));
    }

    #[test]
    fn map_set_get_has_remove() {
        let ops = JsonOps;
        let map = ops.empty_map();
        let map = ops.set(&map, "a", ops.create_int(1));
        assert!(ops.has(&map, "a"));
        assert_eq!(ops.get(&map, "a"), Some(ops.create_int(1)));

        let removed = ops.remove(&map, "a");
        assert!(!ops.has(&removed, "a"));
    }

    #[test]
    fn remove_after_set_is_identity_modulo_order() {
        let ops = JsonOps;
        let original = ops.empty_map();
        let set = ops.set(&original, "k", ops.create_int(5));
        let back = ops.remove(&set, "k");
        assert_eq!(back, original);
    }

    #[test]
    fn merge_to_list_errors_on_non_list() {
        let ops = JsonOps;
        let not_list = ops.create_int(1);
        assert!(ops.merge_to_list(&not_list, ops.create_int(2)).is_error());
    }
}
