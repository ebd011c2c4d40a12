//! [`MapCodec`] field lifts and the record builder: combining several `MapCodec`s plus a
//! constructor function into a whole-record [`Codec`].

use crate::{
    codec::{
        Codec,
        MapCodec,
    },
    dynamic::Dynamic,
    ops::DynamicOps,
    result::{
        DataResult,
        Pair,
    },
};

/// A [`MapCodec`] produced by [`Codec::field_of`]: reads/writes one named, always-present
/// field.
pub struct SingleFieldCodec<C> {
    name: String,
    inner: C,
}

impl<C> SingleFieldCodec<C> {
    pub(crate) fn new(name: String, inner: C) -> Self {
        Self { name, inner }
    }
}

impl<C, A, T, O> MapCodec<A, T, O> for SingleFieldCodec<C>
where
    C: Codec<A, T, O>,
    O: DynamicOps<T>,
    T: Clone,
{
    fn encode_into(&self, value: &A, ops: &O, map: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        match self.inner.encode_start(ops, value) {
            DataResult::Success(encoded) => DataResult::Success(map.set(&self.name, encoded)),
            DataResult::Partial(encoded, m) => DataResult::Partial(map.set(&self.name, encoded), m),
            DataResult::Error(m) => DataResult::Error(m),
        }
    }

    fn decode_from(&self, _ops: &O, map: &Dynamic<T, O>) -> DataResult<A> {
        if !map.has(&self.name) {
            return DataResult::Error(format!("missing field: {}", self.name));
        }
        self.inner.decode(&map.get(&self.name)).map(|pair| pair.0)
    }
}

/// A [`MapCodec`] produced by [`Codec::optional_field_of`]: reads/writes a named field that
/// falls back to `default` when absent, and is omitted on encode when equal to `default`.
pub struct OptionalFieldOf<C, A> {
    name: String,
    inner: C,
    default: A,
}

impl<C, A> OptionalFieldOf<C, A> {
    pub(crate) fn new(name: String, inner: C, default: A) -> Self {
        Self { name, inner, default }
    }
}

impl<C, A, T, O> MapCodec<A, T, O> for OptionalFieldOf<C, A>
where
    C: Codec<A, T, O>,
    O: DynamicOps<T>,
    A: Clone + PartialEq,
    T: Clone,
{
    fn encode_into(&self, value: &A, ops: &O, map: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        if *value == self.default {
            return DataResult::Success(map);
        }
        match self.inner.encode_start(ops, value) {
            DataResult::Success(encoded) => DataResult::Success(map.set(&self.name, encoded)),
            DataResult::Partial(encoded, m) => DataResult::Partial(map.set(&self.name, encoded), m),
            DataResult::Error(m) => DataResult::Error(m),
        }
    }

    fn decode_from(&self, _ops: &O, map: &Dynamic<T, O>) -> DataResult<A> {
        if !map.has(&self.name) {
            return DataResult::Success(self.default.clone());
        }
        self.inner.decode(&map.get(&self.name)).map(|pair| pair.0)
    }
}

/// A [`Codec`] produced by [`record2`], [`record3`], ... : decodes every field in parallel,
/// reporting the union of errors, then applies a constructor function.
macro_rules! record_builder {
    ($name:ident, $apply_fn:ident, $(($field:ident, $gen:ident, $idx:tt)),+) => {
        #[doc = concat!("A record codec combining ", stringify!($name), " named fields.")]
        pub struct $name<$($gen,)+ Out, $($field,)+> {
            $($field: $field,)+
            build: std::sync::Arc<dyn Fn($($gen),+) -> Out>,
            decompose: std::sync::Arc<dyn Fn(&Out) -> ($($gen,)+)>,
        }

        impl<$($gen,)+ Out, $($field,)+> $name<$($gen,)+ Out, $($field,)+> {
            #[doc = "Builds the record codec from its field codecs, a constructor, and a decomposer."]
            pub fn new(
                $($field: $field,)+
                build: impl Fn($($gen),+) -> Out + 'static,
                decompose: impl Fn(&Out) -> ($($gen,)+) + 'static,
            ) -> Self {
                Self {
                    $($field,)+
                    build: std::sync::Arc::new(build),
                    decompose: std::sync::Arc::new(decompose),
                }
            }
        }

        impl<$($gen,)+ Out, $($field,)+ T, O> Codec<Out, T, O> for $name<$($gen,)+ Out, $($field,)+>
        where
            O: DynamicOps<T>,
            $($field: MapCodec<$gen, T, O>,)+
            T: Clone,
        {
            fn encode(&self, value: &Out, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
                let ops = prefix.ops().clone();
                let ($($field,)+) = (self.decompose)(value);
                let mut current = prefix;
                let mut warnings = Vec::new();
                $(
                    match self.$field.encode_into(&$field, &ops, current) {
                        DataResult::Success(next) => current = next,
                        DataResult::Partial(next, m) => {
                            current = next;
                            warnings.push(m);
                        }
                        DataResult::Error(m) => return DataResult::Error(m),
                    }
                )+
                if warnings.is_empty() {
                    DataResult::Success(current)
                } else {
                    DataResult::Partial(current, warnings.join("; "))
                }
            }

            fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<Out, Dynamic<T, O>>> {
                let ops = input.ops().clone();
                let mut errors = Vec::new();
                $(
                    let $field = match self.$field.decode_from(&ops, input) {
                        DataResult::Success(v) => Some(v),
                        DataResult::Partial(v, m) => {
                            errors.push(m);
                            Some(v)
                        }
                        DataResult::Error(m) => {
                            errors.push(m);
                            None
                        }
                    };
                )+

                $(let $field = match $field {
                    Some(v) => v,
                    None => return DataResult::Error(errors.join("; ")),
                };)+

                let value = (self.build)($($field),+);
                if errors.is_empty() {
                    DataResult::Success(Pair(value, input.clone()))
                } else {
                    DataResult::Partial(Pair(value, input.clone()), errors.join("; "))
                }
            }
        }

        #[doc = concat!("Builds a ", stringify!($name), " from field codecs, a constructor, and a decomposer.")]
        pub fn $apply_fn<$($gen,)+ Out, $($field,)+>(
            $($field: $field,)+
            build: impl Fn($($gen),+) -> Out + 'static,
            decompose: impl Fn(&Out) -> ($($gen,)+) + 'static,
        ) -> $name<$($gen,)+ Out, $($field,)+> {
            $name::new($($field,)+ build, decompose)
        }
    };
}

record_builder!(Record2, record2, (c0, A0, 0), (c1, A1, 1));
record_builder!(Record3, record3, (c0, A0, 0), (c1, A1, 1), (c2, A2, 2));
record_builder!(Record4, record4, (c0, A0, 0), (c1, A1, 1), (c2, A2, 2), (c3, A3, 3));
record_builder!(
    Record5,
    record5,
    (c0, A0, 0),
    (c1, A1, 1),
    (c2, A2, 2),
    (c3, A3, 3),
    (c4, A4, 4)
);

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        codec::primitive::StringCodec,
        ops::json::JsonOps,
    };

    #[derive(Clone, Debug, PartialEq)]
    struct Player {
        name: String,
        class: String,
    }

    #[test]
    fn record2_round_trips() {
        let codec = record2(
            StringCodec.field_of("name"),
            StringCodec.field_of("class"),
            |name, class| Player { name, class },
            |p: &Player| (p.name.clone(), p.class.clone()),
        );

        let ops = JsonOps;
        let player = Player {
            name: "Steve".to_owned(),
            class: "Warrior".to_owned(),
        };

        let encoded = codec.encode_start(&ops, &player).value().unwrap();
        let Pair(decoded, _) = codec.decode(&encoded).value().unwrap();
        assert_eq!(decoded, player);
    }

    #[test]
    fn record2_reports_missing_field_error() {
        let codec = record2(
            StringCodec.field_of("name"),
            StringCodec.field_of("class"),
            |name, class| Player { name, class },
            |p: &Player| (p.name.clone(), p.class.clone()),
        );

        let ops = JsonOps;
        let incomplete = Dynamic::new(ops, ops.empty_map()).set("name", Dynamic::new(ops, ops.create_string("Steve")));
        assert!(codec.decode(&incomplete).is_error());
    }
}
