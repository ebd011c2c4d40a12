//! [`Iso`]: a lossless, reversible focus.

use std::sync::Arc;

use crate::optics::{
    join_id,
    lens::Lens,
    prism::Prism,
};

/// A bijection between `S` and `A`: every value of one side has exactly one corresponding value
/// on the other.
///
/// Laws: `from(to(s)) == s` and `to(from(a)) == a` (round trip, both directions).
pub struct Iso<S, A> {
    id: String,
    to: Arc<dyn Fn(&S) -> A>,
    from: Arc<dyn Fn(&A) -> S>,
}

impl<S, A> Clone for Iso<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            to: self.to.clone(),
            from: self.from.clone(),
        }
    }
}

impl<S, A> Iso<S, A> {
    /// Builds an iso from its id and both directions.
    pub fn new(id: impl Into<String>, to: impl Fn(&S) -> A + 'static, from: impl Fn(&A) -> S + 'static) -> Self {
        Self {
            id: id.into(),
            to: Arc::new(to),
            from: Arc::new(from),
        }
    }

    /// Returns this iso's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Converts `S` to `A`.
    pub fn to(&self, s: &S) -> A {
        (self.to)(s)
    }

    /// Converts `A` back to `S`.
    pub fn from(&self, a: &A) -> S {
        (self.from)(a)
    }
}

impl<S: 'static, A: 'static> Iso<S, A> {
    /// Flips the direction of this iso.
    pub fn reverse(self) -> Iso<A, S> {
        Iso {
            id: self.id,
            to: Arc::new(move |a: &A| (self.from)(a)),
            from: Arc::new({
                let to = self.to.clone();
                move |s: &S| to(s)
            }),
        }
    }

    /// Iso ∘ Iso → Iso.
    pub fn compose<B: 'static>(self, other: Iso<A, B>) -> Iso<S, B> {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let inner = other;
        let outer_for_from = outer.clone();
        let inner_for_from = inner.clone();

        Iso::new(
            id,
            move |s: &S| inner.to(&outer.to(s)),
            move |b: &B| outer_for_from.from(&inner_for_from.from(b)),
        )
    }

    /// Iso ∘ Lens → Lens: re-expresses a lens on `A` as one on `S`.
    pub fn compose_lens<B: 'static>(self, other: Lens<A, B>) -> Lens<S, B> {
        let id = join_id(&self.id, other.id());
        let outer = self;
        let outer_for_set = outer.clone();
        let inner = other;
        let inner_for_set = inner.clone();

        Lens::new(
            id,
            move |s: &S| inner.get(&outer.to(s)),
            move |s: &S, b: B| {
                let a = outer_for_set.to(s);
                outer_for_set.from(&inner_for_set.set(&a, b))
            },
        )
    }

    /// Iso ∘ Prism → Prism: re-expresses a prism on `A` as one on `S`.
    pub fn compose_prism<B: 'static>(self, other: Prism<A, B>) -> Prism<S, B> {
        let id = join_id(&self.id, other.id());
        let outer = self;
        let outer_for_build = outer.clone();
        let inner = other;
        let inner_for_build = inner.clone();

        Prism::new(
            id,
            move |s: &S| inner.match_(&outer.to(s)),
            move |b: B| outer_for_build.from(&inner_for_build.build(b)),
        )
    }

    /// Views this iso as a lens whose setter discards the old value entirely and rebuilds from
    /// the new one.
    pub fn as_lens(self) -> Lens<S, A> {
        let id = self.id.clone();
        let outer = self;
        let outer_for_set = outer.clone();
        Lens::new(id, move |s: &S| outer.to(s), move |_s: &S, a: A| outer_for_set.from(&a))
    }

    /// Views this iso as a prism that always matches.
    pub fn as_prism(self) -> Prism<S, A> {
        let id = self.id.clone();
        let outer = self;
        let outer_for_build = outer.clone();
        Prism::new(id, move |s: &S| Some(outer.to(s)), move |a: A| outer_for_build.from(&a))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn celsius_fahrenheit() -> Iso<f64, f64> {
        Iso::new("celsius_to_fahrenheit", |c: &f64| c * 9.0 / 5.0 + 32.0, |f: &f64| (f - 32.0) * 5.0 / 9.0)
    }

    #[test]
    fn round_trips_in_both_directions() {
        let iso = celsius_fahrenheit();
        assert!((iso.from(&iso.to(&100.0)) - 100.0).abs() < 1e-9);
        assert!((iso.to(&iso.from(&32.0)) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn reverse_flips_direction() {
        let iso = celsius_fahrenheit();
        let reversed = iso.reverse();
        assert!((reversed.to(&32.0) - 0.0).abs() < 1e-9);
    }
}
