//! [`Codec`] and [`MapCodec`]: the opaque bidirectional bridge between a user type and a
//! [`crate::dynamic::Dynamic`] tree.
//!
//! The migration engine never looks inside a codec to find transformations — codecs are used
//! by callers at the boundary to materialise application types from (or to) a `Dynamic`. The
//! combinators here (`xmap`, `flat_xmap`, `list_of`, `field_of`, `optional_field_of`, and the
//! record builder) are how callers compose small codecs into whole-record ones.

mod combinators;
pub mod primitive;
mod record;

pub use combinators::{
    FlatXmap,
    ListOf,
    Xmap,
};
pub use record::{
    OptionalFieldOf,
    Record2,
    Record3,
    Record4,
    Record5,
    SingleFieldCodec,
    record2,
    record3,
    record4,
    record5,
};

use crate::{
    dynamic::Dynamic,
    ops::DynamicOps,
    result::{
        DataResult,
        Pair,
    },
};

/// A bidirectional bridge between a user type `A` and a [`Dynamic<T, O>`] tree.
///
/// Implementations are expected to be cheap to clone (most carry no state beyond closures or
/// field names).
pub trait Codec<A, T, O: DynamicOps<T>> {
    /// Builds a tree node for `value`, merging into `prefix` if the caller supplies a
    /// non-empty one.
    fn encode(&self, value: &A, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>>;

    /// Parses a tree into `A`, returning the leftover tree (useful for structural
    /// composition, e.g. a record codec that only claims some of a map's fields).
    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<A, Dynamic<T, O>>>;

    /// The canonical encode, starting from the operations table's empty tree.
    fn encode_start(&self, ops: &O, value: &A) -> DataResult<Dynamic<T, O>> {
        self.encode(value, Dynamic::new(ops.clone(), ops.empty()))
    }

    /// Bidirectionally transforms this codec's value type with a pure pair of functions.
    fn xmap<B>(
        self,
        to: impl Fn(A) -> B + Clone + 'static,
        from: impl Fn(&B) -> A + Clone + 'static,
    ) -> Xmap<Self, A, B>
    where
        Self: Sized,
    {
        Xmap::new(self, to, from)
    }

    /// Bidirectionally transforms this codec's value type with `Result`-returning, validating
    /// functions.
    fn flat_xmap<B>(
        self,
        to: impl Fn(A) -> DataResult<B> + Clone + 'static,
        from: impl Fn(&B) -> DataResult<A> + Clone + 'static,
    ) -> FlatXmap<Self, A, B>
    where
        Self: Sized,
    {
        FlatXmap::new(self, to, from)
    }

    /// Lifts this codec into one decoding a homogeneous list.
    fn list_of(self) -> ListOf<Self>
    where
        Self: Sized,
    {
        ListOf::new(self)
    }

    /// Lifts this codec to a [`MapCodec`] targeting the single named slot `name`.
    fn field_of(self, name: impl Into<String>) -> SingleFieldCodec<Self>
    where
        Self: Sized,
    {
        SingleFieldCodec::new(name.into(), self)
    }

    /// Lifts this codec to a [`MapCodec`] targeting `name`, defaulting to `default` when the
    /// field is absent.
    fn optional_field_of(self, name: impl Into<String>, default: A) -> OptionalFieldOf<Self, A>
    where
        Self: Sized,
        A: Clone,
    {
        OptionalFieldOf::new(name.into(), self, default)
    }
}

/// A [`Codec`] specialised to map-node context: it reads and writes one or more named fields
/// in a surrounding map, rather than claiming the whole node.
pub trait MapCodec<A, T, O: DynamicOps<T>> {
    /// Writes this codec's fields into `map`, returning the updated map.
    fn encode_into(&self, value: &A, ops: &O, map: Dynamic<T, O>) -> DataResult<Dynamic<T, O>>;

    /// Reads this codec's fields out of `map`.
    fn decode_from(&self, ops: &O, map: &Dynamic<T, O>) -> DataResult<A>;
}
