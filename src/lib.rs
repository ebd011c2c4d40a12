#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::module_inception)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::too_many_lines)]
#![doc = include_str!("../README.md")]

pub mod codec;
pub mod diagnostics;
pub mod driver;
pub mod dsl;
pub mod dynamic;
mod error;
pub mod fix;
pub mod ops;
pub mod optics;
pub mod result;
pub mod rewrite;
pub mod schema;
mod type_ref;
mod version;

pub use crate::error::Error;

/// Prelude: convenient import for commonly used items provided by the crate.
#[allow(unused_imports)]
pub mod prelude {
    #[doc(inline)]
    pub use crate::{
        codec::{
            Codec,
            MapCodec,
        },
        diagnostics::{
            DiagnosticContext,
            DiagnosticOptions,
            FixExecution,
            MigrationReport,
            RuleApplication,
        },
        driver::Driver,
        dsl::{
            and,
            bool_type,
            byte_type,
            double_type,
            field,
            float_type,
            int_type,
            list,
            long_type,
            optional,
            reference,
            remainder,
            short_type,
            string,
            tagged_choice,
            DynValue,
            TypeFamily,
            TypeTemplate,
        },
        dynamic::{
            Dynamic,
            TaggedDynamic,
        },
        error::Error,
        fix::{
            DataFix,
            FixRegistry,
        },
        ops::{
            json::JsonOps,
            DynamicOps,
            Number,
        },
        optics::{
            Affine,
            Finder,
            Getter,
            Iso,
            Lens,
            Prism,
            Traversal,
        },
        result::{
            DataResult,
            Either,
            Pair,
        },
        rewrite::{
            batch::BatchTransform,
            TypeRewriteRule,
        },
        schema::{
            Schema,
            SchemaRegistry,
            Type,
            TypeRegistry,
        },
        type_ref::TypeReference,
        version::DataVersion,
    };
}
