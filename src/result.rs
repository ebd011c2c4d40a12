//! [`DataResult`] and the small value types ([`Pair`], [`Either`]) it is built from.

/// A three-armed result used throughout the migration engine in place of [`std::result::Result`].
///
/// Unlike a plain result, a failed computation can still carry a best-effort value: decoding
/// a record where one field is missing but every other field parsed should not throw away the
/// fields that did parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataResult<A> {
    /// The computation succeeded with a well-formed value.
    Success(A),
    /// The computation failed; only a diagnostic message survives.
    Error(String),
    /// The computation produced a best-effort value alongside a warning.
    Partial(A, String),
}

impl<A> DataResult<A> {
    /// Returns `true` if this is [`DataResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns `true` if this is [`DataResult::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns `true` if this is [`DataResult::Partial`].
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Partial(_, _))
    }

    /// Returns the value if one is present (`Success` or `Partial`).
    pub fn value(self) -> Option<A> {
        match self {
            Self::Success(a) | Self::Partial(a, _) => Some(a),
            Self::Error(_) => None,
        }
    }

    /// Returns the value if present, or the provided default.
    pub fn value_or(self, default: A) -> A {
        self.value().unwrap_or(default)
    }

    /// Returns the warning or error message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Error(m) | Self::Partial(_, m) => Some(m),
        }
    }

    /// Maps the success/partial value, leaving errors untouched.
    pub fn map<B>(self, f: impl FnOnce(A) -> B) -> DataResult<B> {
        match self {
            Self::Success(a) => DataResult::Success(f(a)),
            Self::Error(m) => DataResult::Error(m),
            Self::Partial(a, m) => DataResult::Partial(f(a), m),
        }
    }

    /// Maps the error/warning message, leaving values untouched.
    pub fn map_error(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Self::Success(a) => Self::Success(a),
            Self::Error(m) => Self::Error(f(m)),
            Self::Partial(a, m) => Self::Partial(a, f(m)),
        }
    }

    /// Chains another [`DataResult`]-producing computation onto a successful or partial value.
    ///
    /// A `Partial` flowing through `flat_map` keeps its warning; if the continuation also
    /// produces a warning, the two messages are concatenated.
    pub fn flat_map<B>(self, f: impl FnOnce(A) -> DataResult<B>) -> DataResult<B> {
        match self {
            Self::Success(a) => f(a),
            Self::Error(m) => DataResult::Error(m),
            Self::Partial(a, m) => match f(a) {
                DataResult::Success(b) => DataResult::Partial(b, m),
                DataResult::Error(m2) => DataResult::Error(format!("{m}; {m2}")),
                DataResult::Partial(b, m2) => DataResult::Partial(b, format!("{m}; {m2}")),
            },
        }
    }

    /// Converts a failing result into a partial one, keeping `fallback` as the last-known-good
    /// value. A result that is already `Success` or `Partial` is returned unchanged.
    pub fn or_partial(self, fallback: A) -> Self {
        match self {
            Self::Error(m) => Self::Partial(fallback, m),
            other => other,
        }
    }

    /// Combines two partial results by concatenating their messages, keeping the second value.
    ///
    /// Both arguments must be [`DataResult::Partial`]; non-partial arms are returned as-is via
    /// [`DataResult::flat_map`]-style precedence (an `Error` on either side wins).
    pub fn combine_partial(self, other: DataResult<A>) -> DataResult<A> {
        match (self, other) {
            (Self::Error(m), _) | (_, Self::Error(m)) => DataResult::Error(m),
            (Self::Partial(_, m1), Self::Partial(a2, m2)) => {
                DataResult::Partial(a2, format!("{m1}; {m2}"))
            }
            (Self::Partial(_, m1), Self::Success(a2)) => DataResult::Partial(a2, m1),
            (Self::Success(_), Self::Partial(a2, m2)) => DataResult::Partial(a2, m2),
            (Self::Success(_), Self::Success(a2)) => DataResult::Success(a2),
        }
    }
}

/// An ordered pair of values, used where a computation produces two independent results
/// (decode's leftover tree alongside the decoded value, for instance).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pair<A, B>(pub A, pub B);

impl<A, B> Pair<A, B> {
    /// Creates a new pair.
    pub fn new(first: A, second: B) -> Self {
        Self(first, second)
    }

    /// Returns the first element.
    pub fn first(&self) -> &A {
        &self.0
    }

    /// Returns the second element.
    pub fn second(&self) -> &B {
        &self.1
    }

    /// Maps the first element.
    pub fn map_first<C>(self, f: impl FnOnce(A) -> C) -> Pair<C, B> {
        Pair(f(self.0), self.1)
    }

    /// Maps the second element.
    pub fn map_second<C>(self, f: impl FnOnce(B) -> C) -> Pair<A, C> {
        Pair(self.0, f(self.1))
    }
}

/// A value that is one of two possibilities, used by the DSL's sum-type templates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Either<L, R> {
    /// The left possibility.
    Left(L),
    /// The right possibility.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns `true` if this is [`Either::Left`].
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns `true` if this is [`Either::Right`].
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Returns the left value, if any.
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(l) => Some(l),
            Self::Right(_) => None,
        }
    }

    /// Returns the right value, if any.
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(r) => Some(r),
        }
    }

    /// Maps both arms into a common type.
    pub fn fold<T>(self, left: impl FnOnce(L) -> T, right: impl FnOnce(R) -> T) -> T {
        match self {
            Self::Left(l) => left(l),
            Self::Right(r) => right(r),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn map_preserves_partial_message() {
        let r = DataResult::Partial(1, "warn".to_owned()).map(|v| v + 1);
        assert_eq!(r, DataResult::Partial(2, "warn".to_owned()));
    }

    #[test]
    fn flat_map_short_circuits_on_error() {
        let r: DataResult<i32> = DataResult::Error("boom".to_owned());
        let r = r.flat_map(|v| DataResult::Success(v + 1));
        assert_eq!(r, DataResult::Error("boom".to_owned()));
    }

    #[test]
    fn flat_map_concatenates_partial_messages() {
        let r = DataResult::Partial(1, "a".to_owned());
        let r = r.flat_map(|v| DataResult::Partial(v + 1, "b".to_owned()));
        assert_eq!(r, DataResult::Partial(2, "a; b".to_owned()));
    }

    #[test]
    fn or_partial_keeps_fallback() {
        let r: DataResult<i32> = DataResult::Error("boom".to_owned());
        assert_eq!(r.or_partial(7), DataResult::Partial(7, "boom".to_owned()));

        let r = DataResult::Success(3);
        assert_eq!(r.or_partial(7), DataResult::Success(3));
    }

    #[test]
    fn either_fold() {
        let l: Either<i32, &str> = Either::Left(4);
        assert_eq!(l.fold(|l| l * 2, |_: &str| 0), 8);
    }
}
