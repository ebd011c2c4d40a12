//! Primitive leaf codecs: the base case every composed codec bottoms out at.

use crate::{
    codec::Codec,
    dynamic::Dynamic,
    ops::DynamicOps,
    result::{
        DataResult,
        Pair,
    },
};

/// A codec for a UTF-8 string leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<String, T, O> for StringCodec {
    fn encode(&self, value: &String, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_string(value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<String, Dynamic<T, O>>> {
        input.as_string().map(|s| Pair(s, input.clone()))
    }
}

/// A codec for an `i32` leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<i32, T, O> for IntCodec {
    fn encode(&self, value: &i32, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_int(*value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<i32, Dynamic<T, O>>> {
        input.as_int().map(|v| Pair(v, input.clone()))
    }
}

/// A codec for an `i64` leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<i64, T, O> for LongCodec {
    fn encode(&self, value: &i64, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_long(*value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<i64, Dynamic<T, O>>> {
        input.as_long().map(|v| Pair(v, input.clone()))
    }
}

/// A codec for an `f32` leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct FloatCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<f32, T, O> for FloatCodec {
    fn encode(&self, value: &f32, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_float(*value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<f32, Dynamic<T, O>>> {
        input.as_float().map(|v| Pair(v, input.clone()))
    }
}

/// A codec for an `f64` leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoubleCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<f64, T, O> for DoubleCodec {
    fn encode(&self, value: &f64, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_double(*value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<f64, Dynamic<T, O>>> {
        input.as_double().map(|v| Pair(v, input.clone()))
    }
}

/// A codec for a boolean leaf.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl<T: Clone, O: DynamicOps<T>> Codec<bool, T, O> for BoolCodec {
    fn encode(&self, value: &bool, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        DataResult::Success(prefix.create_boolean(*value))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<bool, Dynamic<T, O>>> {
        input.as_boolean().map(|v| Pair(v, input.clone()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    #[test]
    fn string_codec_round_trips() {
        let ops = JsonOps;
        let encoded = StringCodec.encode_start(&ops, &"hi".to_owned()).value().unwrap();
        assert_eq!(StringCodec.decode(&encoded).value().unwrap().0, "hi");
    }

    #[test]
    fn int_codec_round_trips() {
        let ops = JsonOps;
        let encoded = IntCodec.encode_start(&ops, &42).value().unwrap();
        assert_eq!(IntCodec.decode(&encoded).value().unwrap().0, 42);
    }
}
