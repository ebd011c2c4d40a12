//! Versioned catalogues of expected shapes: [`Type`], [`TypeRegistry`], [`Schema`], and
//! [`SchemaRegistry`].

use std::{
    collections::HashMap,
    sync::Arc,
};

use crate::{
    codec::Codec,
    dsl::DynValue,
    error::Error,
    ops::DynamicOps,
    type_ref::TypeReference,
    version::DataVersion,
};

/// A [`TypeReference`] bound to a [`Codec`]. Every DSL-derived codec decodes into [`DynValue`],
/// so heterogeneous types can share one registry without the engine ever needing a concrete
/// Rust struct per type.
pub struct Type<T, O: DynamicOps<T>> {
    type_ref: TypeReference,
    codec: Arc<dyn Codec<DynValue, T, O>>,
}

impl<T, O: DynamicOps<T>> Type<T, O> {
    /// Binds a [`TypeReference`] to a codec.
    pub fn new(type_ref: TypeReference, codec: Arc<dyn Codec<DynValue, T, O>>) -> Self {
        Self { type_ref, codec }
    }

    /// Returns the bound [`TypeReference`].
    pub fn type_ref(&self) -> &TypeReference {
        &self.type_ref
    }

    /// Returns the bound codec.
    pub fn codec(&self) -> &Arc<dyn Codec<DynValue, T, O>> {
        &self.codec
    }
}

impl<T, O: DynamicOps<T>> Clone for Type<T, O> {
    fn clone(&self) -> Self {
        Self {
            type_ref: self.type_ref.clone(),
            codec: self.codec.clone(),
        }
    }
}

/// An in-progress [`TypeRegistry`], populated by a Schema's one-shot `register_types` hook
/// before being frozen.
pub struct TypeRegistryBuilder<T, O: DynamicOps<T>> {
    types: HashMap<TypeReference, Type<T, O>>,
}

impl<T, O: DynamicOps<T>> TypeRegistryBuilder<T, O> {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self { types: HashMap::new() }
    }

    /// Registers `type_ref` against `codec`, overwriting any prior registration under the same
    /// key within this builder.
    pub fn register(&mut self, type_ref: TypeReference, codec: Arc<dyn Codec<DynValue, T, O>>) -> &mut Self {
        self.types.insert(type_ref.clone(), Type::new(type_ref, codec));
        self
    }

    fn freeze(self) -> TypeRegistry<T, O> {
        TypeRegistry { types: self.types }
    }
}

impl<T, O: DynamicOps<T>> Default for TypeRegistryBuilder<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

/// An immutable, frozen mapping from [`TypeReference`] to [`Type`].
pub struct TypeRegistry<T, O: DynamicOps<T>> {
    types: HashMap<TypeReference, Type<T, O>>,
}

impl<T, O: DynamicOps<T>> TypeRegistry<T, O> {
    /// Returns the [`Type`] registered under `type_ref` at this level, if any.
    pub fn get(&self, type_ref: &TypeReference) -> Option<&Type<T, O>> {
        self.types.get(type_ref)
    }
}

/// A tuple of (version, optional parent, type registry) describing the expected shape of every
/// type at one point in a data format's history.
///
/// Construction is two-phase: a caller-supplied `register_types` hook runs exactly once,
/// populating a [`TypeRegistryBuilder`], which is then frozen. A `Schema` is immutable after
/// that.
pub struct Schema<T, O: DynamicOps<T>> {
    version: DataVersion,
    parent: Option<Arc<Schema<T, O>>>,
    types: TypeRegistry<T, O>,
}

impl<T, O: DynamicOps<T>> Schema<T, O> {
    /// Builds a schema at `version`, optionally extending `parent` (which must be at a strictly
    /// lower version), registering its own types via `register_types`.
    pub fn new(
        version: DataVersion,
        parent: Option<Arc<Schema<T, O>>>,
        register_types: impl FnOnce(&mut TypeRegistryBuilder<T, O>),
    ) -> Result<Self, Error> {
        if let Some(p) = &parent {
            if p.version >= version {
                return Err(Error::InvalidParentSchema {
                    version,
                    parent_version: p.version,
                });
            }
        }

        let mut builder = TypeRegistryBuilder::new();
        register_types(&mut builder);

        Ok(Self {
            version,
            parent,
            types: builder.freeze(),
        })
    }

    /// Returns this schema's version.
    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Returns the parent schema, if any.
    pub fn parent(&self) -> Option<&Arc<Schema<T, O>>> {
        self.parent.as_ref()
    }

    /// Looks up a type at this schema level, falling back to the parent chain.
    pub fn get_type(&self, type_ref: &TypeReference) -> Option<&Type<T, O>> {
        self.types
            .get(type_ref)
            .or_else(|| self.parent.as_ref().and_then(|p| p.get_type(type_ref)))
    }
}

/// An ordered `version -> Schema` catalogue. Registration is strictly increasing by version;
/// once [`SchemaRegistry::freeze`] is called no further registrations are accepted.
pub struct SchemaRegistry<T, O: DynamicOps<T>> {
    schemas: Vec<(DataVersion, Arc<Schema<T, O>>)>,
    frozen: bool,
}

impl<T, O: DynamicOps<T>> SchemaRegistry<T, O> {
    /// Creates an empty, unfrozen registry.
    pub fn new() -> Self {
        Self {
            schemas: Vec::new(),
            frozen: false,
        }
    }

    /// Registers `schema`. Fails if the registry is frozen or `schema`'s version is not
    /// strictly greater than the current maximum.
    pub fn register(&mut self, schema: Arc<Schema<T, O>>) -> Result<&mut Self, Error> {
        if self.frozen {
            return Err(Error::custom("schema registry is frozen"));
        }
        if let Some((max_version, _)) = self.schemas.last() {
            if schema.version() <= *max_version {
                return Err(Error::UnorderedSchemaRegistration {
                    version: schema.version(),
                    current_max: *max_version,
                });
            }
        }
        self.schemas.push((schema.version(), schema));
        Ok(self)
    }

    /// Freezes the registry, rejecting any further registration.
    pub fn freeze(&mut self) -> &mut Self {
        self.frozen = true;
        self
    }

    /// Returns `true` once [`SchemaRegistry::freeze`] has been called.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Returns the schema registered at exactly `version`, if any.
    pub fn get(&self, version: DataVersion) -> Option<&Arc<Schema<T, O>>> {
        self.schemas
            .binary_search_by_key(&version, |(v, _)| *v)
            .ok()
            .map(|i| &self.schemas[i].1)
    }

    /// Returns the schema at the largest registered version not exceeding `version`.
    pub fn closest_or_below(&self, version: DataVersion) -> Option<&Arc<Schema<T, O>>> {
        match self.schemas.binary_search_by_key(&version, |(v, _)| *v) {
            Ok(i) => Some(&self.schemas[i].1),
            Err(0) => None,
            Err(i) => Some(&self.schemas[i - 1].1),
        }
    }

    /// Returns the highest registered version, if any schema has been registered.
    pub fn max_version(&self) -> Option<DataVersion> {
        self.schemas.last().map(|(v, _)| *v)
    }
}

impl<T, O: DynamicOps<T>> Default for SchemaRegistry<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dsl::{
            field,
            string,
            TypeFamily,
        },
        ops::json::JsonOps,
    };

    fn leaf_type(name: &str) -> Type<serde_json::Value, JsonOps> {
        let template = field(name, string());
        let family = TypeFamily::new();
        Type::new(TypeReference::new(name), Arc::new(template.codec(&family)))
    }

    #[test]
    fn schema_rejects_parent_at_or_above_its_own_version() {
        let parent = Arc::new(Schema::<serde_json::Value, JsonOps>::new(DataVersion::new(5), None, |_| {}).unwrap());
        let result = Schema::<serde_json::Value, JsonOps>::new(DataVersion::new(5), Some(parent), |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn get_type_falls_back_to_parent_chain() {
        let parent = Arc::new(
            Schema::<serde_json::Value, JsonOps>::new(DataVersion::new(1), None, |b| {
                b.register(TypeReference::new("player"), leaf_type("player").codec().clone());
            })
            .unwrap(),
        );
        let child = Schema::<serde_json::Value, JsonOps>::new(DataVersion::new(2), Some(parent), |_| {}).unwrap();

        assert!(child.get_type(&TypeReference::new("player")).is_some());
        assert!(child.get_type(&TypeReference::new("missing")).is_none());
    }

    #[test]
    fn schema_registry_rejects_non_increasing_versions() {
        let mut registry = SchemaRegistry::<serde_json::Value, JsonOps>::new();
        let v1 = Arc::new(Schema::new(DataVersion::new(1), None, |_| {}).unwrap());
        let v1_again = Arc::new(Schema::new(DataVersion::new(1), None, |_| {}).unwrap());

        registry.register(v1).unwrap();
        assert!(registry.register(v1_again).is_err());
    }

    #[test]
    fn closest_or_below_finds_the_largest_non_exceeding_version() {
        let mut registry = SchemaRegistry::<serde_json::Value, JsonOps>::new();
        registry.register(Arc::new(Schema::new(DataVersion::new(1), None, |_| {}).unwrap())).unwrap();
        registry.register(Arc::new(Schema::new(DataVersion::new(3), None, |_| {}).unwrap())).unwrap();
        registry.freeze();

        assert_eq!(registry.closest_or_below(DataVersion::new(2)).unwrap().version(), DataVersion::new(1));
        assert_eq!(registry.closest_or_below(DataVersion::new(3)).unwrap().version(), DataVersion::new(3));
        assert!(registry.closest_or_below(DataVersion::new(0)).is_none());
        assert!(registry.get(DataVersion::new(2)).is_none());
    }
}
