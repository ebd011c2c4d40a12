//! Opt-in capture of per-fix timing, rule applications, and before/after snapshots.
//!
//! Diagnostics are orthogonal to the migration itself: a caller that does not pass a
//! [`DiagnosticContext`] to [`crate::driver`] pays no cost for any of this.

use std::time::{
    Duration,
    Instant,
};

use crate::{
    dynamic::Dynamic,
    ops::DynamicOps,
    type_ref::TypeReference,
    version::DataVersion,
};

/// Configuration for what a [`DiagnosticContext`] records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticOptions {
    /// Capture before/after `Dynamic` snapshots for each fix.
    pub capture_snapshots: bool,
    /// Record one [`RuleApplication`] per fix (beyond the coarse per-fix timing).
    pub capture_rule_details: bool,
    /// Snapshots longer than this are truncated with a trailing marker.
    pub max_snapshot_length: usize,
    /// Whether a consuming formatter should pretty-print [`MigrationReport::summary`].
    pub pretty_print: bool,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            capture_snapshots: false,
            capture_rule_details: false,
            max_snapshot_length: 2048,
            pretty_print: false,
        }
    }
}

/// One rule's application within a fix, recorded only when
/// [`DiagnosticOptions::capture_rule_details`] is set.
#[derive(Clone, Debug)]
pub struct RuleApplication {
    /// The rule's diagnostic name.
    pub rule_name: String,
    /// The routing [`TypeReference`] the rule ran against.
    pub type_name: TypeReference,
    /// When the rule started running.
    pub timestamp: Instant,
    /// How long the rule took.
    pub duration: Duration,
    /// Whether the rule actually changed anything it inspected (best-effort; `true` unless the
    /// rule is known to be a no-op for this input).
    pub matched: bool,
    /// An optional human-readable description of what the rule did.
    pub description: Option<String>,
}

/// One fix's execution within a migration, always recorded once diagnostics are enabled.
#[derive(Clone, Debug)]
pub struct FixExecution {
    /// The fix's diagnostic name.
    pub fix_name: String,
    /// The fix's source version.
    pub from_version: DataVersion,
    /// The fix's target version.
    pub to_version: DataVersion,
    /// How long the fix (rule derivation plus application) took.
    pub duration: Duration,
    /// Per-rule detail, populated only when [`DiagnosticOptions::capture_rule_details`] is set.
    pub rule_applications: Vec<RuleApplication>,
    /// The tree before this fix ran, if [`DiagnosticOptions::capture_snapshots`] is set.
    pub before_snapshot: Option<String>,
    /// The tree after this fix ran, if [`DiagnosticOptions::capture_snapshots`] is set.
    pub after_snapshot: Option<String>,
}

/// The immutable record a [`DiagnosticContext`] produces at the end of a migration call.
#[derive(Clone, Debug)]
pub struct MigrationReport {
    /// The routing [`TypeReference`] of the migrated value.
    pub type_ref: TypeReference,
    /// The version migration started from.
    pub from_version: DataVersion,
    /// The version migration targeted.
    pub to_version: DataVersion,
    /// When the migration call started.
    pub start: Instant,
    /// When the migration call ended.
    pub end: Instant,
    /// Every fix applied, in application order.
    pub fix_executions: Vec<FixExecution>,
    /// Every distinct [`TypeReference`] touched (normally just `type_ref`, but kept as a set
    /// for forward compatibility with fixes that might fan out).
    pub touched_types: Vec<TypeReference>,
    /// Warnings accumulated from `Partial` results along the way, in emission order.
    pub warnings: Vec<String>,
    /// The input tree's snapshot, if [`DiagnosticOptions::capture_snapshots`] is set.
    pub input_snapshot: Option<String>,
    /// The output tree's snapshot, if [`DiagnosticOptions::capture_snapshots`] is set.
    pub output_snapshot: Option<String>,
}

impl MigrationReport {
    /// This migration's total wall-clock duration (`end - start`).
    pub fn total_duration(&self) -> Duration {
        self.end.duration_since(self.start)
    }

    /// The total number of rule applications recorded across every fix.
    pub fn rule_application_count(&self) -> usize {
        self.fix_executions.iter().map(|f| f.rule_applications.len()).sum()
    }

    /// A one-line, human-readable summary suitable for logging.
    pub fn summary(&self) -> String {
        format!(
            "{} {} -> {}: {} fix(es), {} warning(s), {:?}",
            self.type_ref,
            self.from_version,
            self.to_version,
            self.fix_executions.len(),
            self.warnings.len(),
            self.total_duration(),
        )
    }
}

/// A mutable, per-call accumulator of timing, warnings, and snapshots. Owned by exactly one
/// migration call; not thread-safe.
pub struct DiagnosticContext {
    options: DiagnosticOptions,
    type_ref: TypeReference,
    from_version: DataVersion,
    to_version: DataVersion,
    start: Instant,
    fix_executions: Vec<FixExecution>,
    touched_types: Vec<TypeReference>,
    warnings: Vec<String>,
    input_snapshot: Option<String>,
}

impl DiagnosticContext {
    /// Starts a new context for a migration of `type_ref` from `from_version` to `to_version`.
    pub fn start(options: DiagnosticOptions, type_ref: TypeReference, from_version: DataVersion, to_version: DataVersion) -> Self {
        Self {
            options,
            type_ref,
            from_version,
            to_version,
            start: Instant::now(),
            fix_executions: Vec::new(),
            touched_types: Vec::new(),
            warnings: Vec::new(),
            input_snapshot: None,
        }
    }

    /// Returns the options this context was configured with.
    pub fn options(&self) -> DiagnosticOptions {
        self.options
    }

    /// Records the input tree's snapshot, if enabled.
    pub fn record_input<T, O: DynamicOps<T>>(&mut self, dynamic: &Dynamic<T, O>) {
        if self.options.capture_snapshots {
            self.input_snapshot = Some(self.snapshot(dynamic));
        }
    }

    /// Records one fix's execution.
    pub fn record_fix(&mut self, fix_execution: FixExecution) {
        self.touched_types.push(self.type_ref.clone());
        self.fix_executions.push(fix_execution);
    }

    /// Records a warning message emitted during the migration.
    pub fn record_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Produces a truncated, best-effort string snapshot of `dynamic`, respecting
    /// [`DiagnosticOptions::max_snapshot_length`].
    pub fn snapshot<T, O: DynamicOps<T>>(&self, dynamic: &Dynamic<T, O>) -> String {
        let rendered = dynamic.ops().debug(dynamic.value());
        if rendered.len() <= self.options.max_snapshot_length {
            rendered
        } else {
            let mut boundary = self.options.max_snapshot_length;
            while boundary > 0 && !rendered.is_char_boundary(boundary) {
                boundary -= 1;
            }
            let mut truncated = rendered;
            truncated.truncate(boundary);
            truncated.push_str("... (truncated)");
            truncated
        }
    }

    /// Finalises this context into an immutable [`MigrationReport`].
    pub fn finish<T, O: DynamicOps<T>>(self, output: Option<&Dynamic<T, O>>) -> MigrationReport {
        let output_snapshot = match (self.options.capture_snapshots, output) {
            (true, Some(dynamic)) => Some(self.snapshot(dynamic)),
            _ => None,
        };

        MigrationReport {
            type_ref: self.type_ref,
            from_version: self.from_version,
            to_version: self.to_version,
            start: self.start,
            end: Instant::now(),
            fix_executions: self.fix_executions,
            touched_types: self.touched_types,
            warnings: self.warnings,
            input_snapshot: self.input_snapshot,
            output_snapshot,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ops::json::JsonOps;

    #[test]
    fn report_captures_one_fix_execution_per_record_fix_call() {
        let options = DiagnosticOptions {
            capture_snapshots: true,
            capture_rule_details: true,
            ..DiagnosticOptions::default()
        };
        let mut context = DiagnosticContext::start(options, TypeReference::new("player"), DataVersion::new(1), DataVersion::new(4));

        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map());
        context.record_input(&dynamic);

        for i in 0..3 {
            context.record_fix(FixExecution {
                fix_name: format!("fix-{i}"),
                from_version: DataVersion::new(i),
                to_version: DataVersion::new(i + 1),
                duration: Duration::from_millis(1),
                rule_applications: Vec::new(),
                before_snapshot: None,
                after_snapshot: None,
            });
        }

        let report = context.finish(Some(&dynamic));
        assert_eq!(report.fix_executions.len(), 3);
        assert_eq!(report.touched_types.len(), 3);
        assert!(report.touched_types.iter().all(|t| *t == TypeReference::new("player")));
        assert!(report.input_snapshot.is_some());
        assert!(report.output_snapshot.is_some());
    }

    #[test]
    fn snapshot_truncates_past_the_configured_length() {
        let options = DiagnosticOptions {
            max_snapshot_length: 4,
            ..DiagnosticOptions::default()
        };
        let context = DiagnosticContext::start(options, TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2));
        let ops = JsonOps;
        let dynamic = Dynamic::new(ops, ops.empty_map());
        let snapshot = context.snapshot(&dynamic);
        assert!(snapshot.ends_with("... (truncated)") || snapshot.len() <= 4);
    }
}
