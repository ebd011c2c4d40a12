//! [`DataVersion`]: the monotonically ordered tag used to address schemas and fixes.

use std::fmt;

/// A monotonically ordered integer tag identifying a point in a data type's history.
///
/// Versions are dense only by convention; gaps between registered versions are tolerated
/// everywhere in the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DataVersion(i32);

impl DataVersion {
    /// Creates a version from a raw integer.
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw integer value.
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl From<i32> for DataVersion {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for DataVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn orders_by_integer_value() {
        assert!(DataVersion::new(1) < DataVersion::new(2));
        assert_eq!(DataVersion::new(4), DataVersion::new(4));
    }
}
