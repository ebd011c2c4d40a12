//! [`Dynamic`]: the format-agnostic tree wrapper every rewrite rule and codec operates on.

use crate::{
    ops::{
        DynamicOps,
        Number,
    },
    result::DataResult,
    type_ref::TypeReference,
};

/// A pair of (operations table, tree value). [`Dynamic`] is the unit every rewrite rule,
/// codec, and optic focused on the tree operates against.
///
/// `Dynamic` is immutable: every operation named as a mutation returns a new `Dynamic` rather
/// than observably modifying `self`. The operations table is fixed for the lifetime of a
/// `Dynamic`; there is no way to change backends in place short of [`DynamicOps::convert_to`].
#[derive(Clone)]
pub struct Dynamic<T, O> {
    ops: O,
    value: T,
}

impl<T, O> Dynamic<T, O>
where
    O: DynamicOps<T>,
{
    /// Wraps a value with its operations table.
    pub fn new(ops: O, value: T) -> Self {
        Self { ops, value }
    }

    /// Returns a `Dynamic` wrapping the backend's canonical empty map.
    pub fn empty_map(&self) -> Self {
        Self::new(self.ops.clone(), self.ops.empty_map())
    }

    /// Returns a `Dynamic` wrapping the backend's canonical empty list.
    pub fn empty_list(&self) -> Self {
        Self::new(self.ops.clone(), self.ops.empty_list())
    }

    /// Returns the underlying tree value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the `Dynamic`, returning the underlying tree value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Returns the operations table backing this `Dynamic`.
    pub fn ops(&self) -> &O {
        &self.ops
    }

    /// Attaches a [`TypeReference`], producing a [`TaggedDynamic`].
    pub fn tagged(self, type_ref: TypeReference) -> TaggedDynamic<T, O> {
        TaggedDynamic::new(type_ref, self)
    }

    /// Builds a string-valued `Dynamic` using this tree's operations table.
    pub fn create_string(&self, value: &str) -> Self {
        Self::new(self.ops.clone(), self.ops.create_string(value))
    }

    /// Builds an `i32`-valued `Dynamic`.
    pub fn create_int(&self, value: i32) -> Self {
        Self::new(self.ops.clone(), self.ops.create_int(value))
    }

    /// Builds an `i64`-valued `Dynamic`.
    pub fn create_long(&self, value: i64) -> Self {
        Self::new(self.ops.clone(), self.ops.create_long(value))
    }

    /// Builds an `f32`-valued `Dynamic`.
    pub fn create_float(&self, value: f32) -> Self {
        Self::new(self.ops.clone(), self.ops.create_float(value))
    }

    /// Builds an `f64`-valued `Dynamic`.
    pub fn create_double(&self, value: f64) -> Self {
        Self::new(self.ops.clone(), self.ops.create_double(value))
    }

    /// Builds a boolean-valued `Dynamic`.
    pub fn create_boolean(&self, value: bool) -> Self {
        Self::new(self.ops.clone(), self.ops.create_boolean(value))
    }

    /// Builds a number-valued `Dynamic` from an already-widened [`Number`].
    pub fn create_numeric(&self, value: Number) -> Self {
        Self::new(self.ops.clone(), self.ops.create_numeric(value))
    }

    /// Reads this `Dynamic` as a string.
    pub fn as_string(&self) -> DataResult<String> {
        self.ops.get_string_value(&self.value)
    }

    /// Reads this `Dynamic` as an `i32`.
    pub fn as_int(&self) -> DataResult<i32> {
        self.ops.get_number_value(&self.value).map(Number::as_i32)
    }

    /// Reads this `Dynamic` as an `i64`.
    pub fn as_long(&self) -> DataResult<i64> {
        self.ops.get_number_value(&self.value).map(Number::as_i64)
    }

    /// Reads this `Dynamic` as an `f32`.
    pub fn as_float(&self) -> DataResult<f32> {
        self.ops.get_number_value(&self.value).map(Number::as_f32)
    }

    /// Reads this `Dynamic` as an `f64`.
    pub fn as_double(&self) -> DataResult<f64> {
        self.ops.get_number_value(&self.value).map(Number::as_f64)
    }

    /// Reads this `Dynamic` as a boolean.
    pub fn as_boolean(&self) -> DataResult<bool> {
        self.ops.get_boolean_value(&self.value)
    }

    /// Reads this `Dynamic` as a list of `Dynamic`s.
    pub fn as_list(&self) -> DataResult<Vec<Self>> {
        self.ops
            .get_list(&self.value)
            .map(|items| items.into_iter().map(|v| Self::new(self.ops.clone(), v)).collect())
    }

    /// Reads this `Dynamic` as a map of string keys to `Dynamic` values.
    pub fn as_map(&self) -> DataResult<Vec<(String, Self)>> {
        self.ops.get_map_entries(&self.value).flat_map(|entries| {
            let mut out = Vec::with_capacity(entries.len());
            for (k, v) in entries {
                match self.ops.get_string_value(&k) {
                    DataResult::Success(k) | DataResult::Partial(k, _) => {
                        out.push((k, Self::new(self.ops.clone(), v)));
                    }
                    DataResult::Error(m) => return DataResult::Error(m),
                }
            }
            DataResult::Success(out)
        })
    }

    /// Navigates into the field at `key`. Missing fields flow through as `Error`, so chained
    /// navigation (`dynamic.get("a").get("b").as_string()`) never panics on a missing
    /// intermediate.
    pub fn get(&self, key: &str) -> Self {
        match self.ops.get(&self.value, key) {
            Some(child) => Self::new(self.ops.clone(), child),
            None => Self::new(self.ops.clone(), self.missing_marker()),
        }
    }

    /// Returns a new `Dynamic` with `key` set to `value`.
    ///
    /// If `self` is not a map, the result is the unchanged original wrapped as an `Error` at
    /// the rule layer (see [`crate::rewrite`]): the caller still gets back a valid `Dynamic`,
    /// but it is structurally identical to `self`.
    pub fn set(&self, key: &str, value: Self) -> Self
    where
        T: Clone,
    {
        if self.ops.is_map(&self.value) {
            Self::new(self.ops.clone(), self.ops.set(&self.value, key, value.value))
        } else {
            self.clone()
        }
    }

    /// Returns a new `Dynamic` with `key` removed.
    pub fn remove(&self, key: &str) -> Self
    where
        T: Clone,
    {
        if self.ops.is_map(&self.value) {
            Self::new(self.ops.clone(), self.ops.remove(&self.value, key))
        } else {
            self.clone()
        }
    }

    /// Returns `true` if this `Dynamic` has a field at `key`.
    pub fn has(&self, key: &str) -> bool {
        self.ops.has(&self.value, key)
    }

    /// Replaces the field at `key` with the result of `f`, if present.
    pub fn update(&self, key: &str, f: impl FnOnce(Self) -> Self) -> Self
    where
        T: Clone,
    {
        if self.has(key) {
            let updated = f(self.get(key));
            self.set(key, updated)
        } else {
            self.clone()
        }
    }

    /// Converts this `Dynamic` into another backend, by structural recursion.
    pub fn convert_to<U, P: DynamicOps<U>>(&self, other: P) -> Dynamic<U, P> {
        let converted = self.ops.convert_to(&other, &self.value);
        Dynamic::new(other, converted)
    }

    fn missing_marker(&self) -> T {
        self.ops.empty()
    }
}

impl<T, O> PartialEq for Dynamic<T, O>
where
    T: PartialEq,
    O: DynamicOps<T> + PartialEq,
{
    /// Two `Dynamic`s are equal only if backed by the same operations table (by value equality
    /// of `O`) and equal trees.
    fn eq(&self, other: &Self) -> bool {
        self.ops == other.ops && self.value == other.value
    }
}

impl<T: std::fmt::Debug, O> std::fmt::Debug for Dynamic<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dynamic").field("value", &self.value).finish()
    }
}

/// A [`Dynamic`] paired with the [`TypeReference`] that routes it: the unit the migration
/// driver consumes and produces.
#[derive(Clone)]
pub struct TaggedDynamic<T, O> {
    type_ref: TypeReference,
    dynamic: Dynamic<T, O>,
}

impl<T, O> TaggedDynamic<T, O>
where
    O: DynamicOps<T>,
{
    /// Pairs a [`TypeReference`] with a [`Dynamic`].
    pub fn new(type_ref: TypeReference, dynamic: Dynamic<T, O>) -> Self {
        Self { type_ref, dynamic }
    }

    /// Returns the routing [`TypeReference`].
    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    /// Returns the wrapped [`Dynamic`].
    pub fn dynamic(&self) -> &Dynamic<T, O> {
        &self.dynamic
    }

    /// Consumes the `TaggedDynamic`, returning its parts.
    pub fn into_parts(self) -> (TypeReference, Dynamic<T, O>) {
        (self.type_ref, self.dynamic)
    }

    /// Replaces the wrapped [`Dynamic`], keeping the same [`TypeReference`].
    pub fn with_dynamic(self, dynamic: Dynamic<T, O>) -> Self {
        Self {
            type_ref: self.type_ref,
            dynamic,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    fn root() -> Dynamic<serde_json::Value, JsonOps> {
        Dynamic::new(JsonOps, JsonOps.empty_map())
    }

    #[test]
    fn chained_navigation_through_missing_is_error_not_panic() {
        let d = root();
        let result = d.get("a").get("b").as_string();
        assert!(result.is_error());
    }

    #[test]
    fn set_then_get_round_trips() {
        let d = root();
        let v = d.create_string("hi");
        let updated = d.set("k", v.clone());
        assert_eq!(updated.get("k").as_string(), DataResult::Success("hi".to_owned()));
    }

    #[test]
    fn remove_after_set_has_no_field() {
        let d = root();
        let v = d.create_int(1);
        let updated = d.set("k", v);
        let removed = updated.remove("k");
        assert!(!removed.has("k"));
    }

    #[test]
    fn set_on_non_map_is_unchanged() {
        let d = root();
        let scalar = d.create_int(5);
        let result = scalar.set("k", d.create_int(1));
        assert_eq!(result.as_int(), DataResult::Success(5));
    }
}
