//! The rewrite-rule algebra: format-level transformation combinators over [`Dynamic`].
//!
//! A [`TypeRewriteRule`] is the unit a [`crate::fix::DataFix`] produces and the driver applies.
//! Rules are plain data (an `Arc`-held closure plus an optional routing predicate), so they are
//! cheap to clone and compose.

pub mod batch;
pub mod path;

use std::sync::Arc;

use path::Path;

use crate::{
    dynamic::Dynamic,
    ops::DynamicOps,
    result::DataResult,
    type_ref::TypeReference,
};

/// A literal value compared against a field by [`if_field_equals`]. Comparison is
/// kind-aware: an integer literal compares numerically (with widening), a string literal
/// compares as a string, and so on.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    /// Compares against a string field.
    Str(String),
    /// Compares against a numeric field (any width), via widened `i64` comparison.
    Int(i64),
    /// Compares against a numeric field (any width), via widened `f64` comparison.
    Float(f64),
    /// Compares against a boolean field.
    Bool(bool),
}

impl Literal {
    fn matches<T, O: DynamicOps<T>>(&self, value: &Dynamic<T, O>) -> bool {
        match self {
            Literal::Str(expected) => value.as_string().value().is_some_and(|actual| actual == *expected),
            Literal::Int(expected) => value.as_long().value().is_some_and(|actual| actual == *expected),
            Literal::Float(expected) => value.as_double().value().is_some_and(|actual| (actual - *expected).abs() < f64::EPSILON),
            Literal::Bool(expected) => value.as_boolean().value().is_some_and(|actual| actual == *expected),
        }
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::Str(value.to_owned())
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Int(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Float(value)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

/// A unit of transformation: a function from [`Dynamic`] to a (possibly failing) [`Dynamic`],
/// optionally restricted to a single [`TypeReference`].
///
/// Rules never fail silently: a transformation that cannot proceed returns
/// [`DataResult::Error`], which the driver converts into a halted, `Partial` migration.
pub struct TypeRewriteRule<T, O> {
    name: String,
    restrict_to: Option<TypeReference>,
    apply: Arc<dyn Fn(&Dynamic<T, O>) -> DataResult<Dynamic<T, O>>>,
}

impl<T, O> Clone for TypeRewriteRule<T, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            restrict_to: self.restrict_to.clone(),
            apply: self.apply.clone(),
        }
    }
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> TypeRewriteRule<T, O> {
    /// Builds a rule from a diagnostic name and a (possibly failing) transform function.
    pub fn new(name: impl Into<String>, apply: impl Fn(&Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + 'static) -> Self {
        Self {
            name: name.into(),
            restrict_to: None,
            apply: Arc::new(apply),
        }
    }

    /// Builds a rule from an infallible transform.
    pub fn infallible(name: impl Into<String>, apply: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static) -> Self {
        Self::new(name, move |d| DataResult::Success(apply(d)))
    }

    /// Restricts this rule to only apply when the routing [`TypeReference`] equals `type_ref`.
    pub fn for_type(mut self, type_ref: TypeReference) -> Self {
        self.restrict_to = Some(type_ref);
        self
    }

    /// Returns this rule's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this rule applies to `type_ref` (always `true` unless restricted via
    /// [`TypeRewriteRule::for_type`]).
    pub fn applies_to(&self, type_ref: &TypeReference) -> bool {
        self.restrict_to.as_ref().map_or(true, |restricted| restricted == type_ref)
    }

    /// Applies this rule to `dynamic`, unconditionally.
    pub fn apply(&self, dynamic: &Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        (self.apply)(dynamic)
    }

    /// Applies this rule to `dynamic` if it is routed for `type_ref`; otherwise returns
    /// `dynamic` unchanged.
    pub fn apply_for(&self, type_ref: &TypeReference, dynamic: &Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        if self.applies_to(type_ref) {
            self.apply(dynamic)
        } else {
            DataResult::Success(dynamic.clone())
        }
    }
}

/// A rule that returns its input unchanged.
pub fn noop<T: Clone + 'static, O: DynamicOps<T> + 'static>() -> TypeRewriteRule<T, O> {
    TypeRewriteRule::infallible("noop", Dynamic::clone)
}

/// Applies each rule in order, threading the previous rule's output into the next. `seq` of a
/// single rule is that rule; `seq` of zero rules is [`noop`].
pub fn seq<T: Clone + 'static, O: DynamicOps<T> + 'static>(rules: Vec<TypeRewriteRule<T, O>>) -> TypeRewriteRule<T, O> {
    TypeRewriteRule::new("seq", move |d| {
        rules.iter().fold(DataResult::Success(d.clone()), |acc, rule| acc.flat_map(|current| rule.apply(&current)))
    })
}

/// Applies every rule to the same starting value. Implemented as [`seq`]; callers assert
/// order-independence as a correctness claim the engine does not verify.
pub fn all<T: Clone + 'static, O: DynamicOps<T> + 'static>(rules: Vec<TypeRewriteRule<T, O>>) -> TypeRewriteRule<T, O> {
    seq(rules)
}

/// Moves the value at `from` to `to`. A no-op if `from` is absent.
pub fn rename_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(from: impl Into<String>, to: impl Into<String>) -> TypeRewriteRule<T, O> {
    let from = from.into();
    let to = to.into();
    TypeRewriteRule::infallible(format!("renameField({from}, {to})"), move |d| {
        if d.has(&from) {
            d.remove(&from).set(&to, d.get(&from))
        } else {
            d.clone()
        }
    })
}

/// Applies many renames in a single pass; equivalent to a [`seq`] of [`rename_field`] calls but
/// avoids the intermediate rule allocations.
pub fn rename_fields<T: Clone + 'static, O: DynamicOps<T> + 'static>(renames: Vec<(String, String)>) -> TypeRewriteRule<T, O> {
    TypeRewriteRule::infallible("renameFields", move |d| {
        renames.iter().fold(d.clone(), |current, (from, to)| {
            if current.has(from) {
                current.remove(from).set(to, current.get(from))
            } else {
                current
            }
        })
    })
}

/// Removes the named field, if present.
pub fn remove_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::infallible(format!("removeField({name})"), move |d| d.remove(&name))
}

/// Removes every named field, in order.
pub fn remove_fields<T: Clone + 'static, O: DynamicOps<T> + 'static>(names: Vec<String>) -> TypeRewriteRule<T, O> {
    TypeRewriteRule::infallible("removeFields", move |d| names.iter().fold(d.clone(), |current, name| current.remove(name)))
}

/// Adds `name` with the value produced by `value_fn`, only if absent.
pub fn add_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    name: impl Into<String>,
    value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static,
) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::infallible(format!("addField({name})"), move |d| {
        if d.has(&name) {
            d.clone()
        } else {
            let value = value_fn(d);
            d.set(&name, value)
        }
    })
}

/// Overwrites `name` unconditionally with the value produced by `value_fn`.
pub fn set_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    name: impl Into<String>,
    value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static,
) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::infallible(format!("setField({name})"), move |d| {
        let value = value_fn(d);
        d.set(&name, value)
    })
}

/// Replaces the value at `name` with `f(old_value)`. A no-op if `name` is absent.
pub fn transform_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    name: impl Into<String>,
    f: impl Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + 'static,
) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::new(format!("transformField({name})"), move |d| {
        if !d.has(&name) {
            return DataResult::Success(d.clone());
        }
        f(d.get(&name)).map(|new_value| d.set(&name, new_value))
    })
}

/// Extracts the named siblings into a new nested map under `target`, removing them from the
/// top level.
pub fn group_fields<T: Clone + 'static, O: DynamicOps<T> + 'static>(target: impl Into<String>, fields: Vec<String>) -> TypeRewriteRule<T, O> {
    let target = target.into();
    TypeRewriteRule::infallible(format!("groupFields({target})"), move |d| {
        let mut group = d.empty_map();
        let mut result = d.clone();
        for field in &fields {
            if result.has(field) {
                group = group.set(field, result.get(field));
                result = result.remove(field);
            }
        }
        result.set(&target, group)
    })
}

/// Promotes the nested map's fields at `name` up to the parent and removes `name`. The inverse
/// of [`group_fields`].
pub fn flatten_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::infallible(format!("flattenField({name})"), move |d| {
        if !d.has(&name) {
            return d.clone();
        }
        let nested = d.get(&name);
        let Some(entries) = nested.as_map().value() else {
            return d.clone();
        };
        let mut result = d.remove(&name);
        for (key, value) in entries {
            result = result.set(&key, value);
        }
        result
    })
}

fn navigate<T: Clone, O: DynamicOps<T>>(root: &Dynamic<T, O>, segments: &[String]) -> Dynamic<T, O> {
    segments.iter().fold(root.clone(), |current, segment| current.get(segment))
}

fn rebuild_at<T: Clone, O: DynamicOps<T>>(root: &Dynamic<T, O>, segments: &[String], new_leaf: Dynamic<T, O>) -> Dynamic<T, O> {
    match segments.split_first() {
        None => new_leaf,
        Some((head, rest)) => {
            let child = root.get(head);
            let updated_child = rebuild_at(&child, rest, new_leaf);
            root.set(head, updated_child)
        },
    }
}

/// Applies `rule` at the map node addressed by `path`, rebuilding every ancestor on the way
/// back out. Missing intermediate nodes make the operation a no-op.
pub fn at_path<T: Clone + 'static, O: DynamicOps<T> + 'static>(path: impl AsRef<str>, rule: TypeRewriteRule<T, O>) -> TypeRewriteRule<T, O> {
    let path = Path::parse(path.as_ref());
    TypeRewriteRule::new(format!("at({})", path.segments().join(".")), move |d| {
        let segments = path.segments();
        for len in 0..segments.len() {
            let probe = navigate(d, &segments[..len]);
            if !probe.has(&segments[len]) {
                return DataResult::Success(d.clone());
            }
        }
        let focused = navigate(d, segments);
        rule.apply(&focused).map(|new_focus| rebuild_at(d, segments, new_focus))
    })
}

/// Path-addressed [`rename_field`]: `path` names the containing map.
pub fn rename_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    path: impl AsRef<str>,
    from: impl Into<String>,
    to: impl Into<String>,
) -> TypeRewriteRule<T, O> {
    at_path(path, rename_field(from, to))
}

/// Path-addressed [`remove_field`]: `path` names the containing map.
pub fn remove_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(path: impl AsRef<str>, name: impl Into<String>) -> TypeRewriteRule<T, O> {
    at_path(path, remove_field(name))
}

/// Path-addressed [`set_field`]: `path` names the containing map.
pub fn set_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    path: impl AsRef<str>,
    name: impl Into<String>,
    value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static,
) -> TypeRewriteRule<T, O> {
    at_path(path, set_field(name, value_fn))
}

/// Path-addressed [`group_fields`]: `path` names the containing map.
pub fn group_fields_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(path: impl AsRef<str>, target: impl Into<String>, fields: Vec<String>) -> TypeRewriteRule<T, O> {
    at_path(path, group_fields(target, fields))
}

/// Path-addressed [`flatten_field`]: `path` names the containing map.
pub fn flatten_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(path: impl AsRef<str>, name: impl Into<String>) -> TypeRewriteRule<T, O> {
    at_path(path, flatten_field(name))
}

/// Path-addressed [`add_field`]: unlike the other `…At` siblings, missing intermediate maps
/// are created rather than making the operation a no-op.
pub fn add_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    path: impl AsRef<str>,
    name: impl Into<String>,
    value_fn: impl Fn(&Dynamic<T, O>) -> Dynamic<T, O> + 'static,
) -> TypeRewriteRule<T, O> {
    let path = Path::parse(path.as_ref());
    let name = name.into();
    TypeRewriteRule::infallible(format!("addFieldAt({}, {name})", path.segments().join(".")), move |d| {
        fn create_intermediate<T: Clone, O: DynamicOps<T>>(root: &Dynamic<T, O>, segments: &[String], name: &str, value: Dynamic<T, O>) -> Dynamic<T, O> {
            match segments.split_first() {
                None => {
                    if root.has(name) {
                        root.clone()
                    } else {
                        root.set(name, value)
                    }
                },
                Some((head, rest)) => {
                    let child = if root.has(head) { root.get(head) } else { root.empty_map() };
                    let updated_child = create_intermediate(&child, rest, name, value);
                    root.set(head, updated_child)
                },
            }
        }
        let value = value_fn(d);
        create_intermediate(d, path.segments(), &name, value)
    })
}

/// Path-addressed [`transform_field`]: `path` names the containing map.
pub fn transform_field_at<T: Clone + 'static, O: DynamicOps<T> + 'static>(
    path: impl AsRef<str>,
    name: impl Into<String>,
    f: impl Fn(Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + 'static,
) -> TypeRewriteRule<T, O> {
    at_path(path, transform_field(name, f))
}

/// Moves the value at `source_path` to `target_path`, both dot-separated. A no-op if the
/// source is missing.
pub fn move_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(source_path: impl AsRef<str>, target_path: impl AsRef<str>) -> TypeRewriteRule<T, O> {
    let source = Path::parse(source_path.as_ref());
    let target = Path::parse(target_path.as_ref());
    TypeRewriteRule::infallible(format!("moveField({}, {})", source.segments().join("."), target.segments().join(".")), move |d| {
        let Some((parent, leaf)) = source.split_last() else {
            return d.clone();
        };
        let parent_node = navigate(d, parent);
        if !parent_node.has(leaf) {
            return d.clone();
        }
        let value = parent_node.get(leaf);
        let without_source = rebuild_at(d, parent, parent_node.remove(leaf));
        rebuild_at_leaf(&without_source, target.segments(), value)
    })
}

/// Copies the value at `source_path` to `target_path`, both dot-separated. A no-op if the
/// source is missing.
pub fn copy_field<T: Clone + 'static, O: DynamicOps<T> + 'static>(source_path: impl AsRef<str>, target_path: impl AsRef<str>) -> TypeRewriteRule<T, O> {
    let source = Path::parse(source_path.as_ref());
    let target = Path::parse(target_path.as_ref());
    TypeRewriteRule::infallible(format!("copyField({}, {})", source.segments().join("."), target.segments().join(".")), move |d| {
        let Some((parent, leaf)) = source.split_last() else {
            return d.clone();
        };
        let parent_node = navigate(d, parent);
        if !parent_node.has(leaf) {
            return d.clone();
        }
        let value = parent_node.get(leaf);
        rebuild_at_leaf(d, target.segments(), value)
    })
}

fn rebuild_at_leaf<T: Clone, O: DynamicOps<T>>(root: &Dynamic<T, O>, target_segments: &[String], value: Dynamic<T, O>) -> Dynamic<T, O> {
    let Some((parent, leaf)) = target_segments.split_last() else {
        return root.clone();
    };
    fn set_creating<T: Clone, O: DynamicOps<T>>(root: &Dynamic<T, O>, segments: &[String], leaf: &str, value: Dynamic<T, O>) -> Dynamic<T, O> {
        match segments.split_first() {
            None => root.set(leaf, value),
            Some((head, rest)) => {
                let child = if root.has(head) { root.get(head) } else { root.empty_map() };
                let updated_child = set_creating(&child, rest, leaf, value);
                root.set(head, updated_child)
            },
        }
    }
    set_creating(root, parent, leaf, value)
}

/// Applies `rule` only if `name` is present.
pub fn if_field_exists<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>, rule: TypeRewriteRule<T, O>) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::new(format!("ifFieldExists({name})"), move |d| if d.has(&name) { rule.apply(d) } else { DataResult::Success(d.clone()) })
}

/// Applies `rule` only if `name` is absent.
pub fn if_field_missing<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>, rule: TypeRewriteRule<T, O>) -> TypeRewriteRule<T, O> {
    let name = name.into();
    TypeRewriteRule::new(format!("ifFieldMissing({name})"), move |d| if d.has(&name) { DataResult::Success(d.clone()) } else { rule.apply(d) })
}

/// Applies `rule` only if the field at `name` equals `literal` (kind-aware comparison).
pub fn if_field_equals<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>, literal: impl Into<Literal>, rule: TypeRewriteRule<T, O>) -> TypeRewriteRule<T, O> {
    let name = name.into();
    let literal = literal.into();
    TypeRewriteRule::new(format!("ifFieldEquals({name})"), move |d| {
        if d.has(&name) && literal.matches(&d.get(&name)) {
            rule.apply(d)
        } else {
            DataResult::Success(d.clone())
        }
    })
}

/// The escape hatch: applies an arbitrary, possibly-failing function to the whole value.
pub fn transform<T: Clone + 'static, O: DynamicOps<T> + 'static>(name: impl Into<String>, f: impl Fn(&Dynamic<T, O>) -> DataResult<Dynamic<T, O>> + 'static) -> TypeRewriteRule<T, O> {
    TypeRewriteRule::new(name, f)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    fn dynamic_with(entries: &[(&str, &str)]) -> Dynamic<serde_json::Value, JsonOps> {
        let ops = JsonOps;
        entries.iter().fold(Dynamic::new(ops, ops.empty_map()), |d, (k, v)| {
            let value = d.create_string(v);
            d.set(k, value)
        })
    }

    #[test]
    fn seq_of_one_rule_behaves_like_that_rule() {
        let d = dynamic_with(&[("a", "1")]);
        let single = seq(vec![rename_field("a", "b")]);
        let direct = rename_field("a", "b");
        assert_eq!(single.apply(&d).value().unwrap().get("b").as_string(), direct.apply(&d).value().unwrap().get("b").as_string());
    }

    #[test]
    fn seq_with_noop_is_identity() {
        let d = dynamic_with(&[("a", "1")]);
        let r = rename_field::<serde_json::Value, JsonOps>("a", "b");
        let via_noop = seq(vec![noop(), r.clone()]);
        let direct = r;
        assert_eq!(via_noop.apply(&d).value().unwrap().get("b").as_string(), direct.apply(&d).value().unwrap().get("b").as_string());
    }

    #[test]
    fn rename_then_rename_back_is_identity() {
        let d = dynamic_with(&[("a", "1")]);
        let there_and_back = seq(vec![rename_field("a", "b"), rename_field("b", "a")]);
        let result = there_and_back.apply(&d).value().unwrap();
        assert_eq!(result.get("a").as_string().value().unwrap(), "1");
        assert!(!result.has("b"));
    }

    #[test]
    fn rename_with_preservation_scenario() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let xp = root.create_int(1500);
        let name = root.create_string("Steve");
        let custom = root.set("k", root.create_int(1));
        let input = root.set("playerName", name).set("xp", xp).set("customMod", custom);

        let rule = seq(vec![rename_field("playerName", "name"), rename_field("xp", "experience")]);
        let output = rule.apply(&input).value().unwrap();

        assert_eq!(output.get("name").as_string().value().unwrap(), "Steve");
        assert_eq!(output.get("experience").as_int().value().unwrap(), 1500);
        assert_eq!(output.get("customMod").get("k").as_int().value().unwrap(), 1);
        assert!(!output.has("playerName"));
        assert!(!output.has("xp"));
    }

    #[test]
    fn type_restructuring_scenario() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let input = root.set("x", root.create_double(1.5)).set("y", root.create_double(2.5)).set("z", root.create_double(3.5));

        let rule = group_fields("position", vec!["x".to_owned(), "y".to_owned(), "z".to_owned()]);
        let output = rule.apply(&input).value().unwrap();

        assert!(!output.has("x"));
        let position = output.get("position");
        assert_eq!(position.get("x").as_double().value().unwrap(), 1.5);
        assert_eq!(position.get("z").as_double().value().unwrap(), 3.5);
    }

    #[test]
    fn conditional_migration_scenario() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let v1_input = root.set("playerName", root.create_string("A")).set("version", root.create_int(1));
        let v2_input = root.set("name", root.create_string("B")).set("version", root.create_int(2));

        let rule = if_field_equals("version", 1, seq(vec![rename_field("playerName", "name"), set_field("version", |d: &Dynamic<_, _>| d.create_int(2))]));

        let migrated = rule.apply(&v1_input).value().unwrap();
        assert_eq!(migrated.get("name").as_string().value().unwrap(), "A");
        assert_eq!(migrated.get("version").as_int().value().unwrap(), 2);

        let unchanged = rule.apply(&v2_input).value().unwrap();
        assert_eq!(unchanged.get("name").as_string().value().unwrap(), "B");
    }

    #[test]
    fn transform_field_with_identity_is_a_no_op() {
        let d = dynamic_with(&[("a", "1")]);
        let rule = transform_field("a", |v: Dynamic<_, _>| DataResult::Success(v));
        assert_eq!(rule.apply(&d).value().unwrap().get("a").as_string(), d.get("a").as_string());
    }

    #[test]
    fn add_field_is_a_no_op_if_present() {
        let d = dynamic_with(&[("a", "1")]);
        let rule = add_field("a", |dy: &Dynamic<_, _>| dy.create_string("2"));
        assert_eq!(rule.apply(&d).value().unwrap().get("a").as_string().value().unwrap(), "1");
    }

    #[test]
    fn set_field_always_overwrites() {
        let d = dynamic_with(&[("a", "1")]);
        let rule = set_field("a", |dy: &Dynamic<_, _>| dy.create_string("2"));
        assert_eq!(rule.apply(&d).value().unwrap().get("a").as_string().value().unwrap(), "2");
    }

    #[test]
    fn rule_failure_propagates_as_error() {
        let d = dynamic_with(&[("a", "1")]);
        let rule = transform_field("a", |_v: Dynamic<_, _>| DataResult::Error("bad value".to_owned()));
        assert!(rule.apply(&d).is_error());
    }

    #[test]
    fn move_field_relocates_a_nested_value() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let input = root.set("a", root.create_string("hi"));

        let rule = move_field("a", "b.c");
        let output = rule.apply(&input).value().unwrap();

        assert!(!output.has("a"));
        assert_eq!(output.get("b").get("c").as_string().value().unwrap(), "hi");
    }

    #[test]
    fn group_fields_at_groups_inside_the_addressed_map() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let transform = root.set("x", root.create_double(1.5)).set("y", root.create_double(2.5));
        let input = root.set("transform", transform);

        let rule = group_fields_at("transform", "position", vec!["x".to_owned(), "y".to_owned()]);
        let output = rule.apply(&input).value().unwrap();

        let transform = output.get("transform");
        assert!(!transform.has("x"));
        let position = transform.get("position");
        assert_eq!(position.get("x").as_double().value().unwrap(), 1.5);
        assert_eq!(position.get("y").as_double().value().unwrap(), 2.5);
    }

    #[test]
    fn flatten_field_at_is_the_inverse_of_group_fields_at() {
        let ops = JsonOps;
        let root = Dynamic::new(ops, ops.empty_map());
        let position = root.set("x", root.create_double(1.5)).set("y", root.create_double(2.5));
        let transform = root.set("position", position);
        let input = root.set("transform", transform);

        let rule = flatten_field_at("transform", "position");
        let output = rule.apply(&input).value().unwrap();

        let transform = output.get("transform");
        assert!(!transform.has("position"));
        assert_eq!(transform.get("x").as_double().value().unwrap(), 1.5);
        assert_eq!(transform.get("y").as_double().value().unwrap(), 2.5);
    }

    #[test]
    fn group_fields_at_is_a_no_op_when_the_path_is_missing() {
        let d = dynamic_with(&[("a", "1")]);
        let rule = group_fields_at("missing", "grouped", vec!["a".to_owned()]);
        let output = rule.apply(&d).value().unwrap();
        assert!(!output.has("grouped"));
        assert_eq!(output.get("a").as_string().value().unwrap(), "1");
    }
}
