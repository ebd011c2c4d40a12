//! [`BatchTransform`]: a single-pass accumulator for atomic field operations.
//!
//! Semantically equivalent to the corresponding [`crate::rewrite::seq`] of individual rules,
//! but avoids building an intermediate rule (and its `Arc`) per operation when many operations
//! touch the same map node.

use crate::{
    dynamic::Dynamic,
    ops::DynamicOps,
    result::DataResult,
    rewrite::TypeRewriteRule,
};

enum Op<T, O> {
    Rename(String, String),
    Remove(String),
    Set(String, Box<dyn Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>>>),
    SetFn(String, Box<dyn Fn(&Dynamic<T, O>) -> Dynamic<T, O>>),
    SetStatic(String, Dynamic<T, O>),
    AddIfMissing(String, Box<dyn Fn(&Dynamic<T, O>) -> Dynamic<T, O>>),
    AddIfMissingStatic(String, Dynamic<T, O>),
}

/// Accumulates field operations to apply in a single pass, in insertion order.
pub struct BatchTransform<T, O> {
    ops: Vec<Op<T, O>>,
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> BatchTransform<T, O> {
    /// Creates an empty batch.
    pub fn new() -> Self {
        Self { ops: Vec::new() }
    }

    /// Moves the value at `from` to `to`; no-op if `from` is absent.
    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.ops.push(Op::Rename(from.into(), to.into()));
        self
    }

    /// Removes the named field, if present.
    pub fn remove(mut self, name: impl Into<String>) -> Self {
        self.ops.push(Op::Remove(name.into()));
        self
    }

    /// Replaces the value at `name` with `f(old_value)`; no-op if absent.
    pub fn transform(mut self, name: impl Into<String>, f: impl Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + 'static) -> Self {
        self.ops.push(Op::Set(name.into(), Box::new(f)));
        self
    }

    /// Overwrites `name` unconditionally with the value produced by `value_fn`.
    pub fn set(mut self, name: impl Into<String>, value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static) -> Self {
        self.ops.push(Op::SetFn(name.into(), Box::new(value_fn)));
        self
    }

    /// Overwrites `name` unconditionally with the already-constructed `value`.
    pub fn set_static(mut self, name: impl Into<String>, value: Dynamic<T, O>) -> Self {
        self.ops.push(Op::SetStatic(name.into(), value));
        self
    }

    /// Adds `name` with the value produced by `value_fn`, only if absent.
    pub fn add_if_missing(mut self, name: impl Into<String>, value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static) -> Self {
        self.ops.push(Op::AddIfMissing(name.into(), Box::new(value_fn)));
        self
    }

    /// Adds `name` with the already-constructed `value`, only if absent.
    pub fn add_if_missing_static(mut self, name: impl Into<String>, value: Dynamic<T, O>) -> Self {
        self.ops.push(Op::AddIfMissingStatic(name.into(), value));
        self
    }

    /// Applies every accumulated operation, in insertion order, to `dynamic`.
    pub fn apply(&self, dynamic: &Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        self.ops.iter().fold(DataResult::Success(dynamic.clone()), |acc, op| {
            acc.flat_map(|current| match op {
                Op::Rename(from, to) => {
                    if current.has(from) {
                        DataResult::Success(current.remove(from).set(to, current.get(from)))
                    } else {
                        DataResult::Success(current)
                    }
                },
                Op::Remove(name) => DataResult::Success(current.remove(name)),
                Op::Set(name, f) => {
                    if current.has(name) {
                        f(current.get(name)).map(|new_value| current.set(name, new_value))
                    } else {
                        DataResult::Success(current)
                    }
                },
                Op::SetFn(name, f) => {
                    let value = f(&current);
                    DataResult::Success(current.set(name, value))
                },
                Op::SetStatic(name, value) => DataResult::Success(current.set(name, value.clone())),
                Op::AddIfMissing(name, f) => {
                    if current.has(name) {
                        DataResult::Success(current)
                    } else {
                        let value = f(&current);
                        DataResult::Success(current.set(name, value))
                    }
                },
                Op::AddIfMissingStatic(name, value) => {
                    if current.has(name) {
                        DataResult::Success(current)
                    } else {
                        DataResult::Success(current.set(name, value.clone()))
                    }
                },
            })
        })
    }

    /// Builds a [`TypeRewriteRule`] that applies this batch.
    pub fn build(self) -> TypeRewriteRule<T, O> {
        TypeRewriteRule::new("batch", move |d| self.apply(d))
    }
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> Default for BatchTransform<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    #[test]
    fn batch_applies_operations_in_insertion_order() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let input = root.set("a", root.create_string("x")).set("b", root.create_int(1));

        let batch = BatchTransform::new().rename("a", "renamed").set("b", |d: &Dynamic<_, _>| d.create_int(2)).add_if_missing("c", |d: &Dynamic<_, _>| d.create_int(9));

        let output = batch.apply(&input).value().unwrap();
        assert_eq!(output.get("renamed").as_string().value().unwrap(), "x");
        assert_eq!(output.get("b").as_int().value().unwrap(), 2);
        assert_eq!(output.get("c").as_int().value().unwrap(), 9);
    }

    #[test]
    fn add_if_missing_skips_present_fields() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let input = root.set("a", root.create_int(1));

        let batch = BatchTransform::new().add_if_missing("a", |d: &Dynamic<_, _>| d.create_int(99));
        let output = batch.apply(&input).value().unwrap();
        assert_eq!(output.get("a").as_int().value().unwrap(), 1);
    }

    #[test]
    fn static_variants_take_an_already_constructed_value_not_a_closure() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let input = root.set("a", root.create_int(1));

        let batch = BatchTransform::new().set_static("a", root.create_int(2)).add_if_missing_static("b", root.create_int(9)).add_if_missing_static("a", root.create_int(404));
        let output = batch.apply(&input).value().unwrap();
        assert_eq!(output.get("a").as_int().value().unwrap(), 2);
        assert_eq!(output.get("b").as_int().value().unwrap(), 9);
    }
}
