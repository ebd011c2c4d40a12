//! [`Lens`]: always-succeeds focused access on product types.

use std::sync::Arc;

use crate::optics::{
    affine::Affine,
    join_id,
    prism::Prism,
    traversal::Traversal,
};

/// A focused accessor on a product type: `A` is always present in `S`.
///
/// Laws: `set(s, get(s)) == s` (get-set), `get(set(s, a)) == a` (set-get),
/// `set(set(s, a), b) == set(s, b)` (set-set).
pub struct Lens<S, A> {
    id: String,
    get: Arc<dyn Fn(&S) -> A>,
    set: Arc<dyn Fn(&S, A) -> S>,
}

impl<S, A> Clone for Lens<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<S, A> Lens<S, A> {
    /// Builds a lens from its id, getter, and setter.
    pub fn new(id: impl Into<String>, get: impl Fn(&S) -> A + 'static, set: impl Fn(&S, A) -> S + 'static) -> Self {
        Self {
            id: id.into(),
            get: Arc::new(get),
            set: Arc::new(set),
        }
    }

    /// Returns this lens's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reads the focused value.
    pub fn get(&self, s: &S) -> A {
        (self.get)(s)
    }

    /// Writes the focused value, returning the updated whole.
    pub fn set(&self, s: &S, a: A) -> S {
        (self.set)(s, a)
    }

    /// Replaces the focused value with `f` applied to the current one.
    pub fn modify(&self, s: &S, f: impl FnOnce(A) -> A) -> S
    where
        S: Clone,
    {
        let current = self.get(s);
        self.set(s, f(current))
    }
}

impl<S: 'static, A: 'static> Lens<S, A> {
    /// Lens ∘ Lens → Lens.
    pub fn compose<B: 'static>(self, other: Lens<A, B>) -> Lens<S, B> {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let outer_for_set = outer.clone();
        let inner = other;
        let inner_for_set = inner.clone();

        Lens::new(
            id,
            move |s: &S| inner.get(&outer.get(s)),
            move |s: &S, b: B| {
                let current = outer_for_set.get(s);
                let updated = inner_for_set.set(&current, b);
                outer_for_set.set(s, updated)
            },
        )
    }

    /// Lens ∘ Prism → Affine (the lens's product is always present; the prism's case may not
    /// match).
    pub fn compose_prism<B: 'static>(self, other: Prism<A, B>) -> Affine<S, B> {
        let id = join_id(&self.id, other.id());
        let outer = self;
        let inner = other;
        let inner_for_set = inner.clone();
        let outer_for_set = outer.clone();

        Affine::new(
            id,
            move |s: &S| inner.match_(&outer.get(s)),
            move |s: &S, b: B| outer_for_set.set(s, inner_for_set.build(b)),
        )
    }

    /// Anything ∘ Traversal → Traversal, specialised for Lens on the left.
    pub fn compose_traversal<B: 'static>(self, other: Traversal<A, B>) -> Traversal<S, B>
    where
        A: Clone,
    {
        let id = join_id(&self.id, other.id());
        let outer = self;
        let outer_for_modify = outer.clone();
        let inner = other;
        let inner_for_modify = inner.clone();

        Traversal::new(
            id,
            move |s: &S| inner.to_vec(&outer.get(s)),
            move |s: &S, f: &dyn Fn(B) -> B| {
                let current = outer_for_modify.get(s);
                let updated = inner_for_modify.modify_all(&current, f);
                outer_for_modify.set(s, updated)
            },
        )
    }

    /// Lifts this lens into a single-element traversal.
    pub fn to_traversal(self) -> Traversal<S, A>
    where
        A: Clone,
    {
        let id = self.id.clone();
        let outer = self;
        let outer_for_modify = outer.clone();

        Traversal::new(
            id,
            move |s: &S| vec![outer.get(s)],
            move |s: &S, f: &dyn Fn(A) -> A| {
                let current = outer_for_modify.get(s);
                outer_for_modify.set(s, f(current))
            },
        )
    }
}
