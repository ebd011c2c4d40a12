//! [`Getter`]: read-only focus.

use std::sync::Arc;

use crate::optics::{
    join_id,
    traversal::Traversal,
};

/// A read-only focus on `A` within `S`. Carries no law of its own beyond being a pure function
/// of `S` — it exists to compose read access without exposing a setter.
pub struct Getter<S, A> {
    id: String,
    get: Arc<dyn Fn(&S) -> A>,
}

impl<S, A> Clone for Getter<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            get: self.get.clone(),
        }
    }
}

impl<S, A> Getter<S, A> {
    /// Builds a getter from its id and accessor.
    pub fn new(id: impl Into<String>, get: impl Fn(&S) -> A + 'static) -> Self {
        Self {
            id: id.into(),
            get: Arc::new(get),
        }
    }

    /// Returns this getter's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Reads the focused value.
    pub fn get(&self, s: &S) -> A {
        (self.get)(s)
    }
}

impl<S: 'static, A: 'static> Getter<S, A> {
    /// Getter ∘ Getter → Getter.
    pub fn compose<B: 'static>(self, other: Getter<A, B>) -> Getter<S, B> {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let inner = other;
        Getter::new(id, move |s: &S| inner.get(&outer.get(s)))
    }

    /// Lifts this getter into a single-element, read-only traversal (its `modify_all` is
    /// necessarily a no-op pass-through for the focused slot since there is no setter to call).
    pub fn to_traversal(self) -> Traversal<S, A>
    where
        S: Clone,
    {
        let id = self.id.clone();
        let outer = self;
        Traversal::new(id, move |s: &S| vec![outer.get(s)], |s: &S, _f: &dyn Fn(A) -> A| s.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone)]
    struct Point {
        x: i32,
    }

    #[test]
    fn getter_reads_through_composition() {
        let point_x = Getter::new("x", |p: &Point| p.x);
        let doubled = Getter::new("doubled", |x: &i32| x * 2).compose(Getter::new("noop", |x: &i32| *x));
        let composed = point_x.compose(doubled);
        assert_eq!(composed.get(&Point { x: 21 }), 42);
    }
}
