//! Hard, bootstrap-time failures: malformed registries and planner defects.
//!
//! These are distinct from [`crate::result::DataResult`], which carries the per-value
//! warnings and best-effort data a single migration call can produce. An [`Error`] here means
//! the caller misconfigured something before any data was ever touched.

use thiserror::Error;

use crate::{
    type_ref::TypeReference,
    version::DataVersion,
};

/// A bootstrap or planning failure: malformed registries, or a planner defect detected before
/// any fix runs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// [`crate::schema::SchemaRegistry::register`] was called with a version that is not
    /// strictly greater than the current maximum.
    #[error("schema version {version} is not greater than the current maximum {current_max}")]
    UnorderedSchemaRegistration {
        /// The version that was rejected.
        version: DataVersion,
        /// The registry's current maximum version.
        current_max: DataVersion,
    },

    /// A [`crate::fix::DataFix`] was registered with `fromVersion >= toVersion`.
    #[error("fix {name:?} has a non-increasing version range ({from} -> {to})")]
    NonIncreasingFixRange {
        /// The fix's diagnostic name.
        name: String,
        /// The fix's declared source version.
        from: DataVersion,
        /// The fix's declared target version.
        to: DataVersion,
    },

    /// Two fixes were registered for the same `(TypeReference, fromVersion)` pair.
    #[error("duplicate fix registered for {type_ref} at version {from}: {first_name:?} and {second_name:?}")]
    DuplicateFixRegistration {
        /// The type the fixes target.
        type_ref: TypeReference,
        /// The shared `fromVersion`.
        from: DataVersion,
        /// The name of the fix already registered.
        first_name: String,
        /// The name of the fix that collided with it.
        second_name: String,
    },

    /// A registered fix references a [`TypeReference`] with no corresponding schema entry.
    #[error("fix {name:?} targets unregistered type {type_ref}")]
    UnknownTypeReference {
        /// The fix's diagnostic name.
        name: String,
        /// The type the fix claims to target.
        type_ref: TypeReference,
    },

    /// A fix's `(fromVersion, toVersion)` cannot be covered by any schema in the registry.
    #[error("fix {name:?} spans ({from} -> {to}), which is not covered by any registered schema")]
    UncoveredFixRange {
        /// The fix's diagnostic name.
        name: String,
        /// The fix's declared source version.
        from: DataVersion,
        /// The fix's declared target version.
        to: DataVersion,
    },

    /// The planner selected two fixes for the same type whose steps overlap.
    #[error("overlapping fix steps for {type_ref}: {prev_to} -> {next_from}")]
    OverlappingFixSteps {
        /// The type the fixes target.
        type_ref: TypeReference,
        /// The end of the earlier fix's range.
        prev_to: DataVersion,
        /// The start of the later fix's range.
        next_from: DataVersion,
    },

    /// A schema was requested that does not exist in the registry, and no `closestOrBelow`
    /// fallback was possible.
    #[error("no schema registered at or below version {version}")]
    NoSchemaCoverage {
        /// The version that could not be resolved.
        version: DataVersion,
    },

    /// A [`crate::schema::Schema`] was constructed with a parent whose version is not strictly
    /// lower than its own.
    #[error("schema at version {version} has a parent at version {parent_version}, which is not lower")]
    InvalidParentSchema {
        /// The schema's own version.
        version: DataVersion,
        /// The parent's version.
        parent_version: DataVersion,
    },

    /// A custom error surfaced by a collaborator (codec, backend adapter, etc).
    #[error("{0}")]
    Custom(String),
}

impl Error {
    /// Wraps an arbitrary displayable error as a [`Error::Custom`].
    pub fn custom(error: impl std::fmt::Display) -> Self {
        Self::Custom(format!("{error}"))
    }
}
