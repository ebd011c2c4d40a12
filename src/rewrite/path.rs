//! Dotted-path parsing for path-addressed rewrite operations.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        OnceLock,
    },
};

/// A parsed dotted path: an ordered sequence of map keys, interpreted left to right through
/// nested maps.
///
/// Parsing does not support escaping — a key containing a literal `.` is unreachable through a
/// `Path` and must be handled via [`crate::rewrite::transform`] instead. This is a deliberate
/// simplification; the engine does not attempt to be a JSONPath implementation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path(Vec<String>);

impl Path {
    /// Upper bound on the memoisation cache in [`Path::parse`]. Path strings come from rule
    /// definitions, a small and effectively fixed set per process; this only guards against a
    /// caller feeding in data-derived paths and growing the cache without bound.
    const CACHE_CAP: usize = 4096;

    /// Parses `raw` into its ordered key sequence. Parsing is memoised: repeated calls with the
    /// same string after the first are a cache lookup.
    pub fn parse(raw: &str) -> Self {
        static CACHE: OnceLock<Mutex<HashMap<String, Path>>> = OnceLock::new();
        let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
        let mut guard = cache.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(cached) = guard.get(raw) {
            return cached.clone();
        }

        let parsed = Self(raw.split('.').map(str::to_owned).collect());
        if guard.len() >= Self::CACHE_CAP {
            guard.clear();
        }
        guard.insert(raw.to_owned(), parsed.clone());
        parsed
    }

    /// Returns the ordered key segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Splits this path into its leading segments (the parent path) and its final segment, if
    /// non-empty.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.0.split_last().map(|(last, init)| (init, last.as_str()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parses_dotted_segments() {
        let path = Path::parse("a.b.c");
        assert_eq!(path.segments(), &["a".to_owned(), "b".to_owned(), "c".to_owned()]);
    }

    #[test]
    fn repeated_parses_are_cached_and_equal() {
        let first = Path::parse("x.y");
        let second = Path::parse("x.y");
        assert_eq!(first, second);
    }

    #[test]
    fn split_last_separates_parent_from_leaf() {
        let path = Path::parse("a.b.c");
        let (parent, leaf) = path.split_last().unwrap();
        assert_eq!(parent, &["a".to_owned(), "b".to_owned()]);
        assert_eq!(leaf, "c");
    }
}
