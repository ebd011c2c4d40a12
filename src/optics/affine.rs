//! [`Affine`]: optional focus on a product-shaped slot.

use std::sync::Arc;

use crate::optics::{
    join_id,
    traversal::Traversal,
};

/// An optional focus that need not arise from a sum type (unlike [`crate::optics::Prism`]):
/// `match` may miss, and `set` updates when present (though implementations may choose to
/// insert unconditionally — the match-then-set contract is the one callers may rely on).
pub struct Affine<S, A> {
    id: String,
    match_: Arc<dyn Fn(&S) -> Option<A>>,
    set: Arc<dyn Fn(&S, A) -> S>,
}

impl<S, A> Clone for Affine<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            match_: self.match_.clone(),
            set: self.set.clone(),
        }
    }
}

impl<S, A> Affine<S, A> {
    /// Builds an affine from its id, matcher, and setter.
    pub fn new(id: impl Into<String>, match_: impl Fn(&S) -> Option<A> + 'static, set: impl Fn(&S, A) -> S + 'static) -> Self {
        Self {
            id: id.into(),
            match_: Arc::new(match_),
            set: Arc::new(set),
        }
    }

    /// Returns this affine's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Attempts to read the focused value.
    pub fn match_(&self, s: &S) -> Option<A> {
        (self.match_)(s)
    }

    /// Writes the focused value, returning the updated whole.
    pub fn set(&self, s: &S, a: A) -> S {
        (self.set)(s, a)
    }

    /// Replaces the focused value with `f` applied to the current one, if present; otherwise
    /// returns `s` unchanged.
    pub fn modify(&self, s: &S, f: impl FnOnce(A) -> A) -> S
    where
        S: Clone,
    {
        match self.match_(s) {
            Some(a) => self.set(s, f(a)),
            None => s.clone(),
        }
    }
}

impl<S: 'static, A: 'static> Affine<S, A> {
    /// Affine ∘ Affine → Affine.
    pub fn compose<B: 'static>(self, other: Affine<A, B>) -> Affine<S, B>
    where
        S: Clone,
    {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let outer_for_set = outer.clone();
        let inner = other;
        let inner_for_set = inner.clone();

        Affine::new(
            id,
            move |s: &S| outer.match_(s).and_then(|a| inner.match_(&a)),
            move |s: &S, b: B| match outer_for_set.match_(s) {
                Some(a) => outer_for_set.set(s, inner_for_set.set(&a, b)),
                None => s.clone(),
            },
        )
    }

    /// Lifts this affine into a zero-or-one-element traversal.
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
                Some(a) => outer_for_modify.set(s, f(a)),
                None => s.clone(),
            },
        )
    }
}
