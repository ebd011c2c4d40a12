//! The format-agnostic operations interface: the contract every serialization backend
//! implements so that rewrite rules can be written once and run against any backend.

pub mod json;

use crate::result::DataResult;

/// A widened numeric value, as produced by [`DynamicOps::get_number_value`] and consumed by
/// [`DynamicOps::create_numeric`].
///
/// Narrower numeric constructors (`create_byte`, `create_short`, ...) may be widened by a
/// backend, but must round-trip through the matching accessor without loss within the
/// declared precision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    /// An 8-bit signed integer.
    Byte(i8),
    /// A 16-bit signed integer.
    Short(i16),
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A 32-bit float.
    Float(f32),
    /// A 64-bit float.
    Double(f64),
}

impl Number {
    /// Widens this number to an `i32`, truncating floats.
    pub fn as_i32(self) -> i32 {
        match self {
            Number::Byte(v) => v as i32,
            Number::Short(v) => v as i32,
            Number::Int(v) => v,
            Number::Long(v) => v as i32,
            Number::Float(v) => v as i32,
            Number::Double(v) => v as i32,
        }
    }

    /// Widens this number to an `i64`, truncating floats.
    pub fn as_i64(self) -> i64 {
        match self {
            Number::Byte(v) => v as i64,
            Number::Short(v) => v as i64,
            Number::Int(v) => v as i64,
            Number::Long(v) => v,
            Number::Float(v) => v as i64,
            Number::Double(v) => v as i64,
        }
    }

    /// Widens this number to an `f32`.
    pub fn as_f32(self) -> f32 {
        match self {
            Number::Byte(v) => v as f32,
            Number::Short(v) => v as f32,
            Number::Int(v) => v as f32,
            Number::Long(v) => v as f32,
            Number::Float(v) => v,
            Number::Double(v) => v as f32,
        }
    }

    /// Widens this number to an `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Byte(v) => v as f64,
            Number::Short(v) => v as f64,
            Number::Int(v) => v as f64,
            Number::Long(v) => v as f64,
            Number::Float(v) => v as f64,
            Number::Double(v) => v,
        }
    }
}

/// The contract a concrete serialization backend implements so [`crate::dynamic::Dynamic`] and
/// the rewrite-rule layer never need to see the concrete tree type.
///
/// `T` is the backend's tree node type (e.g. `serde_json::Value`). Implementations should be
/// cheap to clone (most are zero-sized) since a new [`Dynamic`](crate::dynamic::Dynamic) is
/// produced on every mutation-named operation.
pub trait DynamicOps<T>: Clone {
    /// Returns the canonical empty value (typically equivalent to an empty map).
    fn empty(&self) -> T {
        self.empty_map()
    }

    /// Returns a canonical empty map.
    fn empty_map(&self) -> T;

    /// Returns a canonical empty list.
    fn empty_list(&self) -> T;

    /// Returns `true` if `value` is a map node.
    fn is_map(&self, value: &T) -> bool;

    /// Returns `true` if `value` is a list node.
    fn is_list(&self, value: &T) -> bool;

    /// Returns `true` if `value` is a string node.
    fn is_string(&self, value: &T) -> bool;

    /// Returns `true` if `value` is a number node.
    fn is_number(&self, value: &T) -> bool;

    /// Returns `true` if `value` is a boolean node.
    fn is_boolean(&self, value: &T) -> bool;

    /// Builds a string node.
    fn create_string(&self, value: &str) -> T;

    /// Builds an `i32` node.
    fn create_int(&self, value: i32) -> T;

    /// Builds an `i64` node.
    fn create_long(&self, value: i64) -> T;

    /// Builds an `f32` node.
    fn create_float(&self, value: f32) -> T;

    /// Builds an `f64` node.
    fn create_double(&self, value: f64) -> T;

    /// Builds an `i8` node.
    fn create_byte(&self, value: i8) -> T;

    /// Builds an `i16` node.
    fn create_short(&self, value: i16) -> T;

    /// Builds a boolean node.
    fn create_boolean(&self, value: bool) -> T;

    /// Builds a number node from an already-widened [`Number`].
    fn create_numeric(&self, value: Number) -> T {
        match value {
            Number::Byte(v) => self.create_byte(v),
            Number::Short(v) => self.create_short(v),
            Number::Int(v) => self.create_int(v),
            Number::Long(v) => self.create_long(v),
            Number::Float(v) => self.create_float(v),
            Number::Double(v) => self.create_double(v),
        }
    }

    /// Reads a string node. `Error` if `value` is not a string.
    fn get_string_value(&self, value: &T) -> DataResult<String>;

    /// Reads a number node. `Error` if `value` is not a number.
    fn get_number_value(&self, value: &T) -> DataResult<Number>;

    /// Reads a boolean node. `Error` if `value` is not a boolean.
    fn get_boolean_value(&self, value: &T) -> DataResult<bool>;

    /// Builds a list node from a sequence of elements.
    fn create_list(&self, items: Vec<T>) -> T;

    /// Reads a list node's elements. `Error` if `value` is not a list.
    fn get_list(&self, value: &T) -> DataResult<Vec<T>>;

    /// Appends `value` to `list`. `Error` if `list` is not a list.
    fn merge_to_list(&self, list: &T, value: T) -> DataResult<T> {
        match self.get_list(list) {
            DataResult::Error(m) => DataResult::Error(m),
            DataResult::Success(mut items) => {
                items.push(value);
                DataResult::Success(self.create_list(items))
            }
            DataResult::Partial(mut items, m) => {
                items.push(value);
                DataResult::Partial(self.create_list(items), m)
            }
        }
    }

    /// Builds a map node from key/value entries.
    fn create_map(&self, entries: Vec<(T, T)>) -> T;

    /// Reads a map node's entries. `Error` if `value` is not a map.
    fn get_map_entries(&self, value: &T) -> DataResult<Vec<(T, T)>>;

    /// Returns the child at `key`, or `None` if absent or `map` is not a map.
    fn get(&self, map: &T, key: &str) -> Option<T>;

    /// Returns a new map with `key` set to `value` (inserting or overwriting).
    fn set(&self, map: &T, key: &str, value: T) -> T;

    /// Returns a new map with `key` absent.
    fn remove(&self, map: &T, key: &str) -> T;

    /// Returns `true` if `map` has a child at `key`.
    fn has(&self, map: &T, key: &str) -> bool {
        self.get(map, key).is_some()
    }

    /// The `Result`-returning variant of [`DynamicOps::set`]. `Error` if `map` is not a map.
    fn merge_to_map_entry(&self, map: &T, key: &str, value: T) -> DataResult<T> {
        if !self.is_map(map) {
            return DataResult::Error(format!("not a map: {:?}", self.debug(map)));
        }
        DataResult::Success(self.set(map, key, value))
    }

    /// Merges `other`'s entries into `map`, right-biased on key collision.
    fn merge_to_map(&self, map: &T, other: &T) -> DataResult<T>
    where
        T: Clone,
    {
        if !self.is_map(map) || !self.is_map(other) {
            return DataResult::Error("merge_to_map requires two maps".to_owned());
        }
        let entries = match self.get_map_entries(other) {
            DataResult::Success(e) | DataResult::Partial(e, _) => e,
            DataResult::Error(m) => return DataResult::Error(m),
        };
        let mut result = map.clone();
        for (key, value) in entries {
            let key = match self.get_string_value(&key) {
                DataResult::Success(k) | DataResult::Partial(k, _) => k,
                DataResult::Error(m) => return DataResult::Error(m),
            };
            result = self.set(&result, &key, value);
        }
        DataResult::Success(result)
    }

    /// Converts `value` into another backend's tree, by structural recursion.
    ///
    /// The round-trip invariant (`convert_to(a, convert_to(b, x)) ≡ x`) holds modulo numeric
    /// widening and map-key ordering, for any structurally well-formed `value`.
    fn convert_to<U>(&self, other: &impl DynamicOps<U>, value: &T) -> U {
        if self.is_map(value) {
            let entries = match self.get_map_entries(value) {
                DataResult::Success(e) | DataResult::Partial(e, _) => e,
                DataResult::Error(_) => Vec::new(),
            };
            let converted = entries
                .into_iter()
                .map(|(k, v)| (self.convert_to(other, &k), self.convert_to(other, &v)))
                .collect();
            other.create_map(converted)
        } else if self.is_list(value) {
            let items = match self.get_list(value) {
                DataResult::Success(i) | DataResult::Partial(i, _) => i,
                DataResult::Error(_) => Vec::new(),
            };
            let converted = items.into_iter().map(|v| self.convert_to(other, &v)).collect();
            other.create_list(converted)
        } else if self.is_string(value) {
            match self.get_string_value(value) {
                DataResult::Success(s) | DataResult::Partial(s, _) => other.create_string(&s),
                DataResult::Error(_) => other.empty(),
            }
        } else if self.is_boolean(value) {
            match self.get_boolean_value(value) {
                DataResult::Success(b) | DataResult::Partial(b, _) => other.create_boolean(b),
                DataResult::Error(_) => other.empty(),
            }
        } else if self.is_number(value) {
            match self.get_number_value(value) {
                DataResult::Success(n) | DataResult::Partial(n, _) => other.create_numeric(n),
                DataResult::Error(_) => other.empty(),
            }
        } else {
            other.empty()
        }
    }

    /// A best-effort debug rendering of a node, used only for error messages.
    fn debug(&self, value: &T) -> String {
        if self.is_map(value) {
            "<map>".to_owned()
        } else if self.is_list(value) {
            "<list>".to_owned()
        } else {
            "<value>".to_owned()
        }
    }
}
