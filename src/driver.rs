//! [`Driver`]: bootstrap validation, planning, and execution of a migration chain.
//!
//! The driver is the one operational entry point the rest of the engine exists to support.
//! Construction validates a [`FixRegistry`] against a [`SchemaRegistry`] once, up front;
//! every subsequent [`Driver::update`] call is a synchronous, single-threaded walk of an
//! already-validated plan.

use crate::{
    diagnostics::{
        DiagnosticContext,
        FixExecution,
    },
    dynamic::TaggedDynamic,
    error::Error,
    fix::{
        DataFix,
        FixRegistry,
    },
    ops::DynamicOps,
    result::DataResult,
    schema::SchemaRegistry,
    type_ref::TypeReference,
    version::DataVersion,
};

/// A validated pairing of a [`FixRegistry`] and [`SchemaRegistry`], ready to run migrations.
///
/// Validation happens once, at [`Driver::new`]: every registered fix must target a
/// [`TypeReference`] with a corresponding entry in the schemas covering its version range.
/// After construction a `Driver` never fails for configuration reasons again — only per-call
/// rule failures remain, and those are reported as [`DataResult::Partial`], not [`Error`].
pub struct Driver<T, O> {
    fixes: FixRegistry<T, O>,
    schemas: SchemaRegistry<T, O>,
    current_version: DataVersion,
}

impl<T: Clone + 'static, O: DynamicOps<T> + 'static> Driver<T, O> {
    /// Validates and wraps `fixes` and `schemas`. `current_version` advertises the newest
    /// version this driver knows, for callers that want to migrate "to latest" without naming
    /// a version themselves.
    ///
    /// Fails if any fix targets an unregistered [`TypeReference`], or if a fix's
    /// `(fromVersion, toVersion)` is not covered by any schema via closest-or-below.
    pub fn new(fixes: FixRegistry<T, O>, schemas: SchemaRegistry<T, O>, current_version: DataVersion) -> Result<Self, Error> {
        for type_ref in fixes.type_refs() {
            for fix in fixes.fixes_for(type_ref) {
                validate_fix_coverage(fix, &schemas)?;
            }
        }

        Ok(Self {
            fixes,
            schemas,
            current_version,
        })
    }

    /// Returns the newest version this driver was built with.
    pub fn current_version(&self) -> DataVersion {
        self.current_version
    }

    /// Migrates `tagged` from `from_version` to `to_version`.
    ///
    /// The outer `Result` carries fatal planning defects (an overlapping fix chain); these
    /// indicate a misconfigured registry and are detected before any fix runs. The inner
    /// [`DataResult`] carries the per-call outcome: `Success` when every selected fix applied
    /// cleanly, `Partial` when a rule failed partway through (carrying the last-known-good
    /// tree), and never `Error` — a failure mid-chain is recoverable work, not a fatal one.
    #[tracing::instrument(skip(self, tagged, diagnostics), fields(type_ref = %tagged.type_ref(), from = %from_version, to = %to_version))]
    pub fn update(&self, tagged: TaggedDynamic<T, O>, from_version: DataVersion, to_version: DataVersion, mut diagnostics: Option<&mut DiagnosticContext>) -> Result<DataResult<TaggedDynamic<T, O>>, Error> {
        let (type_ref, dynamic) = tagged.into_parts();

        if let Some(ctx) = diagnostics.as_deref_mut() {
            ctx.record_input(&dynamic);
        }

        if from_version >= to_version {
            tracing::trace!("from >= to, returning input unchanged");
            return Ok(DataResult::Success(dynamic.tagged(type_ref)));
        }

        let plan = self.plan(&type_ref, from_version, to_version)?;
        if plan.is_empty() {
            tracing::debug!(%type_ref, "no fixes apply in range, returning input unchanged");
            return Ok(DataResult::Success(dynamic.tagged(type_ref)));
        }
        tracing::debug!(fix_count = plan.len(), "applying migration plan");

        let mut current = dynamic;
        let mut warning: Option<String> = None;

        for fix in plan {
            let input_schema = self.schemas.closest_or_below(fix.from_version());
            let output_schema = self.schemas.closest_or_below(fix.to_version());
            let (Some(input_schema), Some(output_schema)) = (input_schema, output_schema) else {
                return Err(Error::UncoveredFixRange {
                    name: fix.name().to_owned(),
                    from: fix.from_version(),
                    to: fix.to_version(),
                });
            };

            let started = std::time::Instant::now();
            let before_snapshot = diagnostics.as_deref().filter(|ctx| ctx.options().capture_snapshots).map(|ctx| ctx.snapshot(&current));

            let rule = fix.rule(input_schema, output_schema);
            let result = rule.apply(&current);

            match result {
                DataResult::Success(next) => {
                    if let Some(ctx) = diagnostics.as_deref_mut() {
                        let after_snapshot = before_snapshot.as_ref().map(|_| ctx.snapshot(&next));
                        ctx.record_fix(FixExecution {
                            fix_name: fix.name().to_owned(),
                            from_version: fix.from_version(),
                            to_version: fix.to_version(),
                            duration: started.elapsed(),
                            rule_applications: Vec::new(),
                            before_snapshot,
                            after_snapshot,
                        });
                    }
                    current = next;
                },
                DataResult::Partial(next, message) => {
                    if let Some(ctx) = diagnostics.as_deref_mut() {
                        let after_snapshot = before_snapshot.as_ref().map(|_| ctx.snapshot(&next));
                        ctx.record_fix(FixExecution {
                            fix_name: fix.name().to_owned(),
                            from_version: fix.from_version(),
                            to_version: fix.to_version(),
                            duration: started.elapsed(),
                            rule_applications: Vec::new(),
                            before_snapshot,
                            after_snapshot,
                        });
                        ctx.record_warning(message.clone());
                    }
                    warning = Some(match warning {
                        Some(prior) => format!("{prior}; {message}"),
                        None => message,
                    });
                    current = next;
                },
                DataResult::Error(message) => {
                    tracing::warn!(fix = fix.name(), %message, "rule failed, halting migration chain");
                    if let Some(ctx) = diagnostics.as_deref_mut() {
                        ctx.record_warning(message.clone());
                        ctx.record_fix(FixExecution {
                            fix_name: fix.name().to_owned(),
                            from_version: fix.from_version(),
                            to_version: fix.to_version(),
                            duration: started.elapsed(),
                            rule_applications: Vec::new(),
                            before_snapshot,
                            after_snapshot: None,
                        });
                    }
                    let combined = match warning {
                        Some(prior) => format!("{prior}; {message}"),
                        None => message,
                    };
                    return Ok(DataResult::Partial(current.tagged(type_ref), combined));
                },
            }
        }

        let output = current.tagged(type_ref);
        Ok(match warning {
            Some(message) => DataResult::Partial(output, message),
            None => DataResult::Success(output),
        })
    }

    /// Migrates `tagged` from `from_version` up to [`Driver::current_version`].
    pub fn update_to_current(&self, tagged: TaggedDynamic<T, O>, from_version: DataVersion, diagnostics: Option<&mut DiagnosticContext>) -> Result<DataResult<TaggedDynamic<T, O>>, Error> {
        self.update(tagged, from_version, self.current_version, diagnostics)
    }

    fn plan(&self, type_ref: &TypeReference, from_version: DataVersion, to_version: DataVersion) -> Result<Vec<&DataFix<T, O>>, Error> {
        let mut selected: Vec<&DataFix<T, O>> = self
            .fixes
            .fixes_for(type_ref)
            .iter()
            .filter(|fix| fix.from_version() >= from_version && fix.to_version() <= to_version)
            .collect();

        selected.sort_by_key(|fix| fix.from_version());

        for pair in selected.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if prev.to_version() > next.from_version() {
                return Err(Error::OverlappingFixSteps {
                    type_ref: type_ref.clone(),
                    prev_to: prev.to_version(),
                    next_from: next.from_version(),
                });
            }
        }

        Ok(selected)
    }
}

fn validate_fix_coverage<T: 'static, O: DynamicOps<T> + 'static>(fix: &DataFix<T, O>, schemas: &SchemaRegistry<T, O>) -> Result<(), Error> {
    let input_schema = schemas.closest_or_below(fix.from_version()).ok_or_else(|| Error::UncoveredFixRange {
        name: fix.name().to_owned(),
        from: fix.from_version(),
        to: fix.to_version(),
    })?;
    let output_schema = schemas.closest_or_below(fix.to_version()).ok_or_else(|| Error::UncoveredFixRange {
        name: fix.name().to_owned(),
        from: fix.from_version(),
        to: fix.to_version(),
    })?;

    if input_schema.get_type(fix.type_ref()).is_none() || output_schema.get_type(fix.type_ref()).is_none() {
        return Err(Error::UnknownTypeReference {
            name: fix.name().to_owned(),
            type_ref: fix.type_ref().clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use super::*;
    use crate::{
        dsl::{
            field,
            string,
            TypeFamily,
        },
        dynamic::Dynamic,
        ops::json::JsonOps,
        rewrite::{
            noop,
            rename_field,
        },
        schema::Schema,
    };

    fn leaf_schema(version: i32, type_name: &'static str) -> Arc<Schema<serde_json::Value, JsonOps>> {
        let family = TypeFamily::new();
        let codec = Arc::new(field(type_name, string()).codec(&family));
        Arc::new(
            Schema::new(DataVersion::new(version), None, move |b| {
                b.register(TypeReference::new(type_name), codec.clone());
            })
            .unwrap(),
        )
    }

    fn registry_with_versions(type_name: &'static str, versions: &[i32]) -> SchemaRegistry<serde_json::Value, JsonOps> {
        let mut registry = SchemaRegistry::new();
        for v in versions {
            registry.register(leaf_schema(*v, type_name)).unwrap();
        }
        registry.freeze();
        registry
    }

    #[test]
    fn update_with_no_fixes_in_range_is_unchanged() {
        let schemas = registry_with_versions("player", &[1]);
        let fixes = FixRegistry::new();
        let driver = Driver::new(fixes, schemas, DataVersion::new(1)).unwrap();

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map()).set("name", Dynamic::new(ops, ops.create_string("a")));
        let tagged = dynamic.tagged(TypeReference::new("player"));

        let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(1), None).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn update_applies_a_single_fix_across_its_range() {
        let schemas = registry_with_versions("player", &[1, 2]);
        let mut fixes = FixRegistry::new();
        fixes
            .register(DataFix::new("rename-name", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2), |_input, _output| rename_field("name", "full_name")).unwrap())
            .unwrap();
        let driver = Driver::new(fixes, schemas, DataVersion::new(2)).unwrap();

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map()).set("name", Dynamic::new(ops, ops.create_string("a")));
        let tagged = dynamic.tagged(TypeReference::new("player"));

        let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(2), None).unwrap().value().unwrap();
        assert!(result.dynamic().has("full_name"));
        assert!(!result.dynamic().has("name"));
    }

    #[test]
    fn unknown_type_reference_is_returned_unchanged() {
        let schemas = registry_with_versions("player", &[1]);
        let fixes = FixRegistry::new();
        let driver = Driver::new(fixes, schemas, DataVersion::new(1)).unwrap();

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map());
        let tagged = dynamic.tagged(TypeReference::new("unregistered"));

        let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(5), None).unwrap();
        assert!(result.is_success());
    }

    #[test]
    fn rule_failure_halts_the_chain_and_returns_partial() {
        let schemas = registry_with_versions("player", &[1, 2, 3]);
        let mut fixes = FixRegistry::new();
        fixes
            .register(DataFix::new("step-1", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2), |_i, _o| TypeRewriteRuleAlwaysFails::rule()).unwrap())
            .unwrap();
        fixes
            .register(DataFix::new("step-2", TypeReference::new("player"), DataVersion::new(2), DataVersion::new(3), |_i, _o| noop()).unwrap())
            .unwrap();
        let driver = Driver::new(fixes, schemas, DataVersion::new(3)).unwrap();

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map());
        let tagged = dynamic.tagged(TypeReference::new("player"));

        let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(3), None).unwrap();
        assert!(result.is_partial());
    }

    #[test]
    fn overlapping_fix_steps_are_rejected_at_plan_time() {
        let schemas = registry_with_versions("player", &[1, 2, 3]);
        let mut fixes = FixRegistry::new();
        fixes
            .register(DataFix::new("step-1", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(3), |_i, _o| noop()).unwrap())
            .unwrap();
        fixes
            .register(DataFix::new("step-2", TypeReference::new("player"), DataVersion::new(2), DataVersion::new(3), |_i, _o| noop()).unwrap())
            .unwrap();
        let driver = Driver::new(fixes, schemas, DataVersion::new(3)).unwrap();

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map());
        let tagged = dynamic.tagged(TypeReference::new("player"));

        let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(3), None);
        assert!(result.is_err());
    }

    struct TypeRewriteRuleAlwaysFails;
    impl TypeRewriteRuleAlwaysFails {
        fn rule() -> crate::rewrite::TypeRewriteRule<serde_json::Value, JsonOps> {
            crate::rewrite::TypeRewriteRule::new("always-fails", |_d| DataResult::Error("boom".to_owned()))
        }
    }
}
