//! [`Finder`]: a path-step builder that composes an [`Affine`] or [`Traversal`] directly over
//! [`Dynamic`] trees, without requiring a [`crate::schema::Schema`].

use crate::{
    dynamic::Dynamic,
    ops::DynamicOps,
    result::Either,
};

use super::{
    Affine,
    Traversal,
};

/// The composed optic a [`Finder`] chain has built so far: an [`Affine`] while every step has
/// stayed single-valued, a [`Traversal`] once a step has fanned out to many elements (for
/// example [`Finder::all_elements`]). Once promoted to a traversal a chain never demotes back.
pub type FinderFocus<T, O> = Either<Affine<Dynamic<T, O>, Dynamic<T, O>>, Traversal<Dynamic<T, O>, Dynamic<T, O>>>;

/// Builds a [`FinderFocus`] by chaining path steps over [`Dynamic`] trees.
pub struct Finder<T, O> {
    id: String,
    focus: FinderFocus<T, O>,
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> Finder<T, O> {
    /// Starts a chain that focuses on the whole value.
    pub fn new() -> Self {
        Self {
            id: String::new(),
            focus: Either::Left(Affine::new("root", |d: &Dynamic<T, O>| Some(d.clone()), |_d: &Dynamic<T, O>, a: Dynamic<T, O>| a)),
        }
    }

    /// Returns the dotted identifier accumulated so far.
    pub fn id(&self) -> &str {
        &self.id
    }

    fn push(mut self, id_step: &str, step: Affine<Dynamic<T, O>, Dynamic<T, O>>) -> Self {
        self.id = if self.id.is_empty() { id_step.to_owned() } else { format!("{}.{}", self.id, id_step) };
        self.focus = match self.focus {
            Either::Left(affine) => Either::Left(affine.compose(step)),
            Either::Right(traversal) => Either::Right(traversal.compose_affine(step)),
        };
        self
    }

    /// Steps into the named field of a record.
    pub fn field(self, name: impl Into<String>) -> Self {
        let name = name.into();
        let id_step = format!("field({name})");
        let match_name = name.clone();
        let set_name = name;
        let step = Affine::new(
            id_step.clone(),
            move |d: &Dynamic<T, O>| if d.has(&match_name) { Some(d.get(&match_name)) } else { None },
            move |d: &Dynamic<T, O>, a: Dynamic<T, O>| d.set(&set_name, a),
        );
        self.push(&id_step, step)
    }

    /// Steps into the list element at `index`.
    pub fn element(self, index: usize) -> Self {
        let id_step = format!("element({index})");
        let step = Affine::new(
            id_step.clone(),
            move |d: &Dynamic<T, O>| d.as_list().value().and_then(|list| list.get(index).cloned()),
            move |d: &Dynamic<T, O>, a: Dynamic<T, O>| match d.as_list().value() {
                Some(mut list) if index < list.len() => {
                    list[index] = a;
                    rebuild_list(d, list)
                },
                _ => d.clone(),
            },
        );
        self.push(&id_step, step)
    }

    /// Promotes the chain into a traversal over every element of the current list focus.
    pub fn all_elements(self) -> Self {
        let id_step = "allElements()".to_owned();
        let id = if self.id.is_empty() { id_step.clone() } else { format!("{}.{}", self.id, id_step) };
        let traversal = Traversal::new(
            id_step.clone(),
            |d: &Dynamic<T, O>| d.as_list().value().unwrap_or_default(),
            |d: &Dynamic<T, O>, f: &dyn Fn(Dynamic<T, O>) -> Dynamic<T, O>| match d.as_list().value() {
                Some(list) => rebuild_list(d, list.into_iter().map(f).collect()),
                None => d.clone(),
            },
        );
        let focus = match self.focus {
            Either::Left(affine) => Either::Right(affine.to_traversal().compose(traversal)),
            Either::Right(existing) => Either::Right(existing.compose(traversal)),
        };
        Self { id, focus }
    }

    /// Steps into the first list element satisfying `predicate`.
    pub fn element_where(self, predicate: impl Fn(&Dynamic<T, O>) -> bool + Clone + 'static) -> Self {
        let id_step = "elementWhere(..)".to_owned();
        let match_predicate = predicate.clone();
        let set_predicate = predicate;
        let step = Affine::new(
            id_step.clone(),
            move |d: &Dynamic<T, O>| d.as_list().value().and_then(|list| list.into_iter().find(|e| match_predicate(e))),
            move |d: &Dynamic<T, O>, a: Dynamic<T, O>| match d.as_list().value() {
                Some(list) => {
                    let position = list.iter().position(|e| set_predicate(e));
                    match position {
                        Some(i) => {
                            let mut list = list;
                            list[i] = a;
                            rebuild_list(d, list)
                        },
                        None => d.clone(),
                    }
                },
                None => d.clone(),
            },
        );
        self.push(&id_step, step)
    }

    /// Finalises the chain into its composed optic.
    pub fn finish(self) -> FinderFocus<T, O> {
        self.focus
    }
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> Default for Finder<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

fn rebuild_list<T: Clone, O: DynamicOps<T>>(template: &Dynamic<T, O>, elements: Vec<Dynamic<T, O>>) -> Dynamic<T, O> {
    let ops = template.ops().clone();
    let values = elements.into_iter().map(Dynamic::into_value).collect();
    Dynamic::new(ops.clone(), ops.create_list(values))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    fn sample() -> Dynamic<serde_json::Value, JsonOps> {
        let ops = JsonOps;
        let root = Dynamic::new(ops.clone(), ops.empty_map());
        let name = root.create_string("Steve");
        root.set("name", name)
    }

    #[test]
    fn field_step_builds_an_affine() {
        let focus = Finder::new().field("name").finish();
        let affine = focus.left().expect("field chain stays affine");
        let dynamic = sample();
        let found = affine.match_(&dynamic).unwrap();
        assert_eq!(found.as_string().value().unwrap(), "Steve");
    }

    #[test]
    fn all_elements_promotes_to_a_traversal() {
        let ops = JsonOps;
        let root = Dynamic::new(ops.clone(), ops.empty_map());
        let a = root.create_int(1);
        let b = root.create_int(2);
        let list = Dynamic::new(ops.clone(), ops.create_list(vec![a.into_value(), b.into_value()]));
        let with_list = root.set("items", list);

        let focus = Finder::new().field("items").all_elements().finish();
        let traversal = focus.right().expect("all_elements promotes to a traversal");
        let values = traversal.to_vec(&with_list);
        assert_eq!(values.len(), 2);
    }
}
