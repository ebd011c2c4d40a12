//! Composable, law-abiding focused accessors.
//!
//! The general shape from the literature is `Optic<S, T, A, B>` (polymorphic update: focus `A`
//! in `S`, produce `B` to get `T`). In practice almost every optic here is used monomorphically
//! (`Optic<S, S, A, A>`), so each variant is implemented with two type parameters; [`Iso`] is
//! the one place the polymorphic shape surfaces, via [`Iso::reverse`].
//!
//! Every optic carries a dotted `id` used purely for diagnostics; composing two optics
//! concatenates their ids with a `.` (see [`join_id`]).

mod affine;
mod finder;
mod getter;
mod iso;
mod lens;
mod prism;
mod traversal;

pub use affine::Affine;
pub use finder::{
    Finder,
    FinderFocus,
};
pub use getter::Getter;
pub use iso::Iso;
pub use lens::Lens;
pub use prism::Prism;
pub use traversal::Traversal;

pub(crate) fn join_id(parent: &str, child: &str) -> String {
    format!("{parent}.{child}")
}

#[cfg(test)]
mod test {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn x_lens() -> Lens<Point, i32> {
        Lens::new("x", |p: &Point| p.x, |p: &Point, x| Point { x, ..p.clone() })
    }

    fn y_lens() -> Lens<Point, i32> {
        Lens::new("y", |p: &Point| p.y, |p: &Point, y| Point { y, ..p.clone() })
    }

    #[test]
    fn composed_lens_id_concatenates_with_a_dot() {
        #[derive(Clone, Debug, PartialEq)]
        struct Line {
            start: Point,
        }
        let start = Lens::new("start", |l: &Line| l.start.clone(), |l: &Line, start| Line { start });
        let composed = start.compose(x_lens());
        assert_eq!(composed.id(), "start.x");
    }

    #[test]
    fn lens_laws_hold() {
        let lens = x_lens();
        let p = Point { x: 1, y: 2 };

        assert_eq!(lens.set(&p, lens.get(&p)), p);
        assert_eq!(lens.get(&lens.set(&p, 9)), 9);
        let once = lens.set(&p, 9);
        let twice = lens.set(&once, 3);
        assert_eq!(lens.set(&p, 3), twice);
    }

    #[test]
    fn two_independent_lenses_compose_to_a_lens() {
        let lens = x_lens();
        let _ = y_lens();
        assert_eq!(lens.id(), "x");
    }
}
