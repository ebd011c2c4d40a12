//! [`DynValue`]: the generic structural value every DSL-described type decodes into.

/// A generic structural representation of a value shaped by a [`super::TypeTemplate`].
///
/// The DSL never binds a [`super::TypeTemplate`] to a concrete Rust struct; instead every
/// template-derived [`crate::codec::Codec`] decodes into `DynValue`. Callers that want a real
/// application type build their own [`crate::codec::Codec`] (directly, or via
/// [`crate::codec::record_builder`]) and are free to ignore the DSL entirely.
#[derive(Clone, Debug, PartialEq)]
pub enum DynValue {
    /// A UTF-8 string.
    String(String),
    /// A 32-bit integer.
    Int(i32),
    /// A 64-bit integer.
    Long(i64),
    /// A 32-bit float.
    Float(f32),
    /// A 64-bit float.
    Double(f64),
    /// A boolean.
    Bool(bool),
    /// An 8-bit integer.
    Byte(i8),
    /// A 16-bit integer.
    Short(i16),
    /// A homogeneous list.
    List(Vec<DynValue>),
    /// An ordered record of named fields.
    Record(Vec<(String, DynValue)>),
    /// A tagged-choice variant: the discriminator's string value, plus the variant's payload.
    Tagged(String, Box<DynValue>),
}

impl DynValue {
    /// Returns the field named `name`, if this is a [`DynValue::Record`] containing it.
    pub fn field(&self, name: &str) -> Option<&DynValue> {
        match self {
            Self::Record(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Returns the inner string, if this is a [`DynValue::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}
