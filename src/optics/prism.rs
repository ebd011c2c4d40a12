//! [`Prism`]: partial focus on sum types.

use std::sync::Arc;

use crate::optics::{
    affine::Affine,
    join_id,
    lens::Lens,
    traversal::Traversal,
};

/// A focused accessor on a sum type: `A` may or may not be present in `S`, but whenever it is
/// built from `A` the round trip holds.
///
/// Laws: `match(build(a)) == Some(a)` (partial-put-get); if `match(s) == Some(a)` then
/// `build(a)` is equivalent to `s` (get-put-partial).
pub struct Prism<S, A> {
    id: String,
    match_: Arc<dyn Fn(&S) -> Option<A>>,
    build: Arc<dyn Fn(A) -> S>,
}

impl<S, A> Clone for Prism<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            match_: self.match_.clone(),
            build: self.build.clone(),
        }
    }
}

impl<S, A> Prism<S, A> {
    /// Builds a prism from its id, matcher, and constructor.
    pub fn new(id: impl Into<String>, match_: impl Fn(&S) -> Option<A> + 'static, build: impl Fn(A) -> S + 'static) -> Self {
        Self {
            id: id.into(),
            match_: Arc::new(match_),
            build: Arc::new(build),
        }
    }

    /// Returns this prism's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attempts to read the focused value.
    pub fn match_(&self, s: &S) -> Option<A> {
        (self.match_)(s)
    }

    /// Builds the whole from the focused value.
    pub fn build(&self, a: A) -> S {
        (self.build)(a)
    }
}

impl<S: 'static, A: 'static> Prism<S, A> {
    /// Prism ∘ Prism → Prism.
    pub fn compose<B: 'static>(self, other: Prism<A, B>) -> Prism<S, B> {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let outer_for_build = outer.clone();
        let inner = other;
        let inner_for_build = inner.clone();
        Prism::new(
            id,
            move |s: &S| outer.match_(s).and_then(|a| inner.match_(&a)),
            move |b: B| outer_for_build.build(inner_for_build.build(b)),
        )
    }

    /// Prism ∘ Lens → Affine (the prism's case may not match; the lens's field is always
    /// present once it does).
    pub fn compose_lens<B: 'static>(self, other: Lens<A, B>) -> Affine<S, B>
    where
        S: Clone,
    {
        let id = join_id(&self.id, other.id());
        let outer = self;
        let outer_for_set = outer.clone();
        let inner = other;
        let inner_for_set = inner.clone();

        Affine::new(
            id,
            move |s: &S| outer.match_(s).map(|a| inner.get(&a)),
            move |s: &S, b: B| match outer_for_set.match_(s) {
                Some(a) => outer_for_set.build(inner_for_set.set(&a, b)),
                None => s.clone(),
            },
        )
    }

    /// Lifts this prism into a zero-or-one-element traversal.
    pub fn to_traversal(self) -> Traversal<S, A>
    where
        A: Clone,
        S: Clone,
    {
        let id = self.id.clone();
        let outer = self;
        let outer_for_modify = outer.clone();

        Traversal::new(
            id,
            move |s: &S| outer.match_(s).into_iter().collect(),
            move |s: &S, f: &dyn Fn(A) -> A| match outer_for_modify.match_(s) {
                Some(a) => outer_for_modify.build(f(a)),
                None => s.clone(),
            },
        )
    }
}
