//! [`DataFix`] and [`FixRegistry`]: per-type, per-version-step transformations, derived from
//! rewrite rules against a fix's input and output [`Schema`]s.

use std::{
    collections::HashMap,
    sync::Arc,
};

use crate::{
    error::Error,
    ops::DynamicOps,
    rewrite::TypeRewriteRule,
    schema::Schema,
    type_ref::TypeReference,
    version::DataVersion,
};

/// A single transformation step for one [`TypeReference`], covering one version range.
///
/// A `DataFix` must be stateless: the engine may invoke it from any thread, and it is expected
/// to derive its [`TypeRewriteRule`] purely from the input and output schemas it is handed.
pub struct DataFix<T, O> {
    name: String,
    type_ref: TypeReference,
    from_version: DataVersion,
    to_version: DataVersion,
    to_rule: Arc<dyn Fn(&Schema<T, O>, &Schema<T, O>) -> TypeRewriteRule<T, O>>,
}

impl<T, O> Clone for DataFix<T, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            type_ref: self.type_ref.clone(),
            from_version: self.from_version,
            to_version: self.to_version,
            to_rule: self.to_rule.clone(),
        }
    }
}

impl<T: 'static, O: DynamicOps<T> + 'static> DataFix<T, O> {
    /// Builds a fix targeting `type_ref` across `(from_version, to_version)`. `to_rule`
    /// consults the input schema (at `from_version`) and output schema (at `to_version`) to
    /// produce the rewrite rule this fix applies. Fails if `from_version >= to_version`.
    pub fn new(
        name: impl Into<String>,
        type_ref: TypeReference,
        from_version: DataVersion,
        to_version: DataVersion,
        to_rule: impl Fn(&Schema<T, O>, &Schema<T, O>) -> TypeRewriteRule<T, O> + 'static,
    ) -> Result<Self, Error> {
        let name = name.into();
        if from_version >= to_version {
            return Err(Error::NonIncreasingFixRange {
                name,
                from: from_version,
                to: to_version,
            });
        }
        Ok(Self {
            name,
            type_ref,
            from_version,
            to_version,
            to_rule: Arc::new(to_rule),
        })
    }

    /// Returns this fix's diagnostic name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the [`TypeReference`] this fix targets.
    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    /// Returns this fix's source version.
    pub fn from_version(&self) -> DataVersion {
        self.from_version
    }

    /// Returns this fix's target version.
    pub fn to_version(&self) -> DataVersion {
        self.to_version
    }

    /// Derives this fix's rewrite rule from its input and output schemas.
    pub fn rule(&self, input: &Schema<T, O>, output: &Schema<T, O>) -> TypeRewriteRule<T, O> {
        (self.to_rule)(input, output)
    }
}

/// An index from [`TypeReference`] to an ordered sequence of [`DataFix`]es, keyed further by
/// each fix's `fromVersion`.
///
/// Two fixes for the same `(TypeReference, fromVersion)` are rejected as a configuration error
/// at registration time; a caller who wants both applied registers a single fix whose rule is
/// a [`crate::rewrite::seq`] of both underlying rules.
pub struct FixRegistry<T, O> {
    by_type: HashMap<TypeReference, Vec<DataFix<T, O>>>,
    frozen: bool,
}

impl<T, O> FixRegistry<T, O> {
    /// Creates an empty, unfrozen registry.
    pub fn new() -> Self {
        Self {
            by_type: HashMap::new(),
            frozen: false,
        }
    }

    /// Registers `fix`. Fails if the registry is frozen, or if a fix is already registered for
    /// the same `(TypeReference, fromVersion)` pair.
    pub fn register(&mut self, fix: DataFix<T, O>) -> Result<&mut Self, Error> {
        if self.frozen {
            return Err(Error::custom("fix registry is frozen"));
        }

        let existing = self.by_type.entry(fix.type_ref.clone()).or_default();
        if let Some(collision) = existing.iter().find(|f| f.from_version == fix.from_version) {
            return Err(Error::DuplicateFixRegistration {
                type_ref: fix.type_ref.clone(),
                from: fix.from_version,
                first_name: collision.name.clone(),
                second_name: fix.name.clone(),
            });
        }

        existing.push(fix);
        Ok(self)
    }

    /// Freezes the registry, rejecting any further registration.
    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    /// Returns `true` once [`FixRegistry::freeze`] has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns every fix registered for `type_ref`, in registration order (not necessarily
    /// sorted by version — callers needing plan order should sort by `fromVersion`).
    pub fn fixes_for(&self, type_ref: &TypeReference) -> &[DataFix<T, O>] {
        self.by_type.get(type_ref).map_or(&[], Vec::as_slice)
    }

    /// Returns every registered [`TypeReference`].
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeReference> {
        self.by_type.keys()
    }
}

impl<T, O> Default for FixRegistry<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ops::json::JsonOps,
        rewrite::noop,
    };

    fn fix(type_ref: &'static str, from: i32, to: i32) -> DataFix<serde_json::Value, JsonOps> {
        DataFix::new(format!("{type_ref}-{from}-{to}"), TypeReference::new(type_ref), DataVersion::new(from), DataVersion::new(to), |_input, _output| noop()).unwrap()
    }

    #[test]
    fn rejects_non_increasing_version_range() {
        let result = DataFix::<serde_json::Value, JsonOps>::new("bad", TypeReference::new("player"), DataVersion::new(2), DataVersion::new(1), |_i, _o| noop());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_from_version_for_same_type() {
        let mut registry = FixRegistry::new();
        registry.register(fix("player", 1, 2)).unwrap();
        let result = registry.register(fix("player", 1, 3));
        assert!(result.is_err());
    }

    #[test]
    fn allows_same_from_version_for_different_types() {
        let mut registry = FixRegistry::new();
        registry.register(fix("player", 1, 2)).unwrap();
        assert!(registry.register(fix("world", 1, 2)).is_ok());
    }

    #[test]
    fn unknown_type_has_no_fixes() {
        let registry = FixRegistry::<serde_json::Value, JsonOps>::new();
        assert!(registry.fixes_for(&TypeReference::new("missing")).is_empty());
    }
}
