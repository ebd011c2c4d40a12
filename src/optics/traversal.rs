//! [`Traversal`]: focus on zero or more elements at once.

use std::sync::Arc;

use crate::optics::{
    affine::Affine,
    join_id,
};

/// A focus on an arbitrary number of elements within `S`.
///
/// Law: `modify_all(s, id) == s` (modify-identity).
pub struct Traversal<S, A> {
    id: String,
    to_vec: Arc<dyn Fn(&S) -> Vec<A>>,
    modify_all: Arc<dyn Fn(&S, &dyn Fn(A) -> A) -> S>,
}

impl<S, A> Clone for Traversal<S, A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            to_vec: self.to_vec.clone(),
            modify_all: self.modify_all.clone(),
        }
    }
}

impl<S, A> Traversal<S, A> {
    /// Builds a traversal from its id, a function collecting every focused element, and a
    /// function rebuilding the whole from an element-wise update.
    pub fn new(
        id: impl Into<String>,
        to_vec: impl Fn(&S) -> Vec<A> + 'static,
        modify_all: impl Fn(&S, &dyn Fn(A) -> A) -> S + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            to_vec: Arc::new(to_vec),
            modify_all: Arc::new(modify_all),
        }
    }

    /// Returns this traversal's dotted identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collects every value currently focused.
    pub fn to_vec(&self, s: &S) -> Vec<A> {
        (self.to_vec)(s)
    }

    /// Rebuilds the whole, replacing every focused value with `f` applied to it.
    pub fn modify_all(&self, s: &S, f: &dyn Fn(A) -> A) -> S {
        (self.modify_all)(s, f)
    }

    /// Rebuilds the whole, replacing every focused value with `f` applied to it.
    pub fn modify(&self, s: &S, f: impl Fn(A) -> A) -> S {
        self.modify_all(s, &f)
    }
}

impl<S: 'static, A: 'static> Traversal<S, A> {
    /// Traversal ∘ Traversal → Traversal: every element reached through the outer traversal is
    /// itself traversed by the inner one.
    pub fn compose<B: 'static>(self, other: Traversal<A, B>) -> Traversal<S, B> {
        let id = join_id(&self.id, &other.id);
        let outer = self;
        let outer_for_modify = outer.clone();
        let inner = other;
        let inner_for_modify = inner.clone();

        Traversal::new(
            id,
            move |s: &S| outer.to_vec(s).iter().flat_map(|a| inner.to_vec(a)).collect(),
            move |s: &S, f: &dyn Fn(B) -> B| outer_for_modify.modify_all(s, &|a| inner_for_modify.modify_all(&a, f)),
        )
    }

    /// Anything ∘ Traversal → Traversal, specialised for Traversal on the left and an [`Affine`]
    /// on the right: elements the affine doesn't match pass through unchanged and are skipped
    /// by `to_vec`.
    pub fn compose_affine<B: 'static>(self, other: Affine<A, B>) -> Traversal<S, B>
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
            move |s: &S| outer.to_vec(s).iter().filter_map(|a| inner.match_(a)).collect(),
            move |s: &S, f: &dyn Fn(B) -> B| {
                outer_for_modify.modify_all(s, &|a: A| match inner_for_modify.match_(&a) {
                    Some(b) => inner_for_modify.set(&a, f(b)),
                    None => a,
                })
            },
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Bag {
        items: Vec<i32>,
    }

    fn items_traversal() -> Traversal<Bag, i32> {
        Traversal::new(
            "items",
            |b: &Bag| b.items.clone(),
            |b: &Bag, f: &dyn Fn(i32) -> i32| Bag {
                items: b.items.iter().copied().map(f).collect(),
            },
        )
    }

    #[test]
    fn modify_identity_preserves_the_whole() {
        let traversal = items_traversal();
        let bag = Bag { items: vec![1, 2, 3] };
        assert_eq!(traversal.modify(&bag, |x| x), bag);
    }

    #[test]
    fn modify_all_applies_to_every_element() {
        let traversal = items_traversal();
        let bag = Bag { items: vec![1, 2, 3] };
        let doubled = traversal.modify(&bag, |x| x * 2);
        assert_eq!(doubled.items, vec![2, 4, 6]);
    }
}
