//! The type DSL: declarative construction of [`TypeTemplate`] blueprints, and the generic
//! structural value ([`DynValue`]) they decode into.
//!
//! A [`TypeTemplate`] is type-erased: it does not know about any particular Rust struct. It
//! describes the *shape* of a data type (fields, products, sums, lists, unknown-field
//! remainders) and, via [`TypeTemplate::codec`], emits a [`crate::codec::Codec`] that bridges
//! a [`crate::dynamic::Dynamic`] tree and a [`DynValue`] — a generic structural
//! representation every DSL-described type decodes into. This mirrors how the engine never
//! needs to instantiate a concrete user struct to migrate a tree: the DSL's job is only to
//! describe enough shape to drive codecs and documentation, not to bind to application types.

mod codec_impl;
mod value;

pub use value::DynValue;

use std::collections::HashMap;

use crate::type_ref::TypeReference;

/// The shape primitives a [`TypeTemplate`] can describe.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateKind {
    /// A UTF-8 string.
    String,
    /// A 32-bit integer.
    Int,
    /// A 64-bit integer.
    Long,
    /// A 32-bit float.
    Float,
    /// A 64-bit float.
    Double,
    /// A boolean.
    Bool,
    /// An 8-bit integer.
    Byte,
    /// A 16-bit integer.
    Short,
    /// An ordered named slot within a surrounding product.
    Field {
        /// The field's name.
        name: String,
        /// The field's shape.
        inner: Box<TypeTemplate>,
    },
    /// A named slot that may be absent within a surrounding product.
    Optional {
        /// The field's name.
        name: String,
        /// The field's shape, present only when the field exists.
        inner: Box<TypeTemplate>,
    },
    /// A product of templates applying simultaneously at the same map node. Their named
    /// fields must be disjoint by declaration; at most one element may be [`TemplateKind::Remainder`].
    And(Vec<TypeTemplate>),
    /// A homogeneous list.
    List(Box<TypeTemplate>),
    /// A sum type selected by the value of a named discriminator field.
    TaggedChoice {
        /// The name of the discriminator field.
        discriminator: String,
        /// The variants, keyed by the discriminator's string value.
        variants: Vec<(String, TypeTemplate)>,
    },
    /// Captures every map entry not claimed by sibling templates in the surrounding
    /// [`TemplateKind::And`]. This is how forward compatibility is preserved: unknown fields
    /// survive migration untouched.
    Remainder,
    /// A named reference to another type in the same [`TypeFamily`], resolved lazily to
    /// support recursive/self-referential shapes.
    Reference(TypeReference),
}

/// A type-erased blueprint describing the shape of a data type at one schema version.
#[derive(Clone, Debug, PartialEq)]
pub struct TypeTemplate {
    label: Option<String>,
    kind: TemplateKind,
}

impl TypeTemplate {
    fn new(kind: TemplateKind) -> Self {
        Self { label: None, kind }
    }

    /// Attaches a debug label to this template, without changing its behaviour.
    pub fn bind(mut self, name: impl Into<String>) -> Self {
        self.label = Some(name.into());
        self
    }

    /// Returns the debug label, if one was attached via [`TypeTemplate::bind`].
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the template's shape.
    pub fn kind(&self) -> &TemplateKind {
        &self.kind
    }
}

/// An ordered named slot.
pub fn field(name: impl Into<String>, inner: TypeTemplate) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Field {
        name: name.into(),
        inner: Box::new(inner),
    })
}

/// A named slot that may be absent.
pub fn optional(name: impl Into<String>, inner: TypeTemplate) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Optional {
        name: name.into(),
        inner: Box::new(inner),
    })
}

/// A product type: every template applies simultaneously at the same map node.
pub fn and(templates: impl IntoIterator<Item = TypeTemplate>) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::And(templates.into_iter().collect()))
}

/// A homogeneous list.
pub fn list(inner: TypeTemplate) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::List(Box::new(inner)))
}

/// A sum type selected by the value of `discriminator`.
pub fn tagged_choice(
    discriminator: impl Into<String>,
    variants: impl IntoIterator<Item = (String, TypeTemplate)>,
) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::TaggedChoice {
        discriminator: discriminator.into(),
        variants: variants.into_iter().collect(),
    })
}

/// Captures every map entry not claimed by sibling templates in an enclosing [`and`].
pub fn remainder() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Remainder)
}

/// A named reference to another type, resolved through a [`TypeFamily`] at codec-emission
/// time. Used for recursive or mutually-referential shapes.
pub fn reference(type_ref: TypeReference) -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Reference(type_ref))
}

/// A UTF-8 string.
pub fn string() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::String)
}

/// A 32-bit integer.
pub fn int_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Int)
}

/// A 64-bit integer.
pub fn long_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Long)
}

/// A 32-bit float.
pub fn float_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Float)
}

/// A 64-bit float.
pub fn double_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Double)
}

/// A boolean.
pub fn bool_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Bool)
}

/// An 8-bit integer.
pub fn byte_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Byte)
}

/// A 16-bit integer.
pub fn short_type() -> TypeTemplate {
    TypeTemplate::new(TemplateKind::Short)
}

/// Resolves [`TemplateKind::Reference`] templates against sibling types registered in the same
/// family, so recursive and mutually-referential shapes can be described without forward
/// declarations.
#[derive(Clone, Default)]
pub struct TypeFamily {
    members: HashMap<TypeReference, TypeTemplate>,
}

impl TypeFamily {
    /// Creates an empty family.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a member template under `type_ref`, making it resolvable from
    /// [`reference`] templates elsewhere in the family.
    pub fn insert(&mut self, type_ref: TypeReference, template: TypeTemplate) -> &mut Self {
        self.members.insert(type_ref, template);
        self
    }

    /// Resolves a member template by its [`TypeReference`].
    pub fn resolve(&self, type_ref: &TypeReference) -> Option<&TypeTemplate> {
        self.members.get(type_ref)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bind_attaches_label_without_changing_kind() {
        let t = string().bind("name");
        assert_eq!(t.label(), Some("name"));
        assert_eq!(t.kind(), &TemplateKind::String);
    }

    #[test]
    fn and_collects_all_members() {
        let t = and([field("x", double_type()), field("y", double_type()), remainder()]);
        match t.kind() {
            TemplateKind::And(members) => assert_eq!(members.len(), 3),
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn family_resolves_recursive_reference() {
        let mut family = TypeFamily::new();
        family.insert(TypeReference::new("node"), and([
            field("value", int_type()),
            optional("next", reference(TypeReference::new("node"))),
        ]));

        assert!(family.resolve(&TypeReference::new("node")).is_some());
        assert!(family.resolve(&TypeReference::new("missing")).is_none());
    }
}
