//! Pure and validating transforms over an existing [`Codec`].

use std::marker::PhantomData;

use crate::{
    codec::Codec,
    dynamic::Dynamic,
    ops::DynamicOps,
    result::{
        DataResult,
        Pair,
    },
};

/// A codec produced by [`Codec::xmap`]: a bidirectional pure transform over an inner codec.
pub struct Xmap<C, A, B> {
    inner: C,
    to: Box<dyn Fn(A) -> B>,
    from: Box<dyn Fn(&B) -> A>,
    _marker: PhantomData<(A, B)>,
}

impl<C, A, B> Xmap<C, A, B> {
    pub(crate) fn new(inner: C, to: impl Fn(A) -> B + 'static, from: impl Fn(&B) -> A + 'static) -> Self {
        Self {
            inner,
            to: Box::new(to),
            from: Box::new(from),
            _marker: PhantomData,
        }
    }
}

impl<C, A, B, T, O> Codec<B, T, O> for Xmap<C, A, B>
where
    C: Codec<A, T, O>,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &B, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        self.inner.encode(&(self.from)(value), prefix)
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<B, Dynamic<T, O>>> {
        self.inner
            .decode(input)
            .map(|pair| pair.map_first(|a| (self.to)(a)))
    }
}

/// A codec produced by [`Codec::flat_xmap`]: a validating, `Result`-returning transform over an
/// inner codec.
pub struct FlatXmap<C, A, B> {
    inner: C,
    to: Box<dyn Fn(A) -> DataResult<B>>,
    from: Box<dyn Fn(&B) -> DataResult<A>>,
    _marker: PhantomData<(A, B)>,
}

impl<C, A, B> FlatXmap<C, A, B> {
    pub(crate) fn new(
        inner: C,
        to: impl Fn(A) -> DataResult<B> + 'static,
        from: impl Fn(&B) -> DataResult<A> + 'static,
    ) -> Self {
        Self {
            inner,
            to: Box::new(to),
            from: Box::new(from),
            _marker: PhantomData,
        }
    }
}

impl<C, A, B, T, O> Codec<B, T, O> for FlatXmap<C, A, B>
where
    C: Codec<A, T, O>,
    O: DynamicOps<T>,
{
    fn encode(&self, value: &B, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        match (self.from)(value) {
            DataResult::Success(a) => self.inner.encode(&a, prefix),
            DataResult::Partial(a, m) => self.inner.encode(&a, prefix).map_error(|m2| format!("{m}; {m2}")),
            DataResult::Error(m) => DataResult::Error(m),
        }
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<B, Dynamic<T, O>>> {
        self.inner.decode(input).flat_map(|Pair(a, rest)| match (self.to)(a) {
            DataResult::Success(b) => DataResult::Success(Pair(b, rest)),
            DataResult::Partial(b, m) => DataResult::Partial(Pair(b, rest), m),
            DataResult::Error(m) => DataResult::Error(m),
        })
    }
}

/// A codec produced by [`Codec::list_of`]: lifts an element codec to a homogeneous-list codec.
pub struct ListOf<C> {
    element: C,
}

impl<C> ListOf<C> {
    pub(crate) fn new(element: C) -> Self {
        Self { element }
    }
}

impl<C, A, T, O> Codec<Vec<A>, T, O> for ListOf<C>
where
    C: Codec<A, T, O>,
    O: DynamicOps<T>,
    T: Clone,
{
    fn encode(&self, value: &Vec<A>, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        let ops = prefix.ops().clone();
        let mut items = Vec::with_capacity(value.len());
        let mut warnings = Vec::new();
        for item in value {
            match self.element.encode_start(&ops, item) {
                DataResult::Success(d) => items.push(d.into_value()),
                DataResult::Partial(d, m) => {
                    items.push(d.into_value());
                    warnings.push(m);
                }
                DataResult::Error(m) => return DataResult::Error(m),
            }
        }
        let list_value = ops.create_list(items);
        let list = Dynamic::new(ops, list_value);
        if warnings.is_empty() {
            DataResult::Success(list)
        } else {
            DataResult::Partial(list, warnings.join("; "))
        }
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<Vec<A>, Dynamic<T, O>>> {
        input.as_list().flat_map(|elements| {
            let mut out = Vec::with_capacity(elements.len());
            let mut warnings = Vec::new();
            for element in elements {
                match self.element.decode(&element) {
                    DataResult::Success(Pair(a, _)) => out.push(a),
                    DataResult::Partial(Pair(a, _), m) => {
                        out.push(a);
                        warnings.push(m);
                    }
                    DataResult::Error(m) => return DataResult::Error(m),
                }
            }
            if warnings.is_empty() {
                DataResult::Success(Pair(out, input.empty_list()))
            } else {
                DataResult::Partial(Pair(out, input.empty_list()), warnings.join("; "))
            }
        })
    }
}
