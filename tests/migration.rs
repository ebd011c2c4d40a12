//! End-to-end tests exercising the full `SchemaRegistry` + `FixRegistry` + `Driver` pipeline
//! together, rather than any one module in isolation.

use std::sync::Arc;

use datafix::prelude::*;

fn player_schema(version: i32, fields: &[&'static str]) -> Arc<Schema<serde_json::Value, JsonOps>> {
    let family = TypeFamily::new();
    let templates: Vec<_> = fields.iter().map(|name| field(name, string())).collect();
    let codec = Arc::new(and(templates).codec(&family));
    Arc::new(
        Schema::new(DataVersion::new(version), None, move |b| {
            b.register(TypeReference::new("player"), codec.clone());
        })
        .unwrap(),
    )
}

fn registry(schemas: Vec<Arc<Schema<serde_json::Value, JsonOps>>>) -> SchemaRegistry<serde_json::Value, JsonOps> {
    let mut registry = SchemaRegistry::new();
    for schema in schemas {
        registry.register(schema).unwrap();
    }
    registry.freeze();
    registry
}

/// Scenario 4: a three-step chain, where calling `update` with a narrower range applies only
/// the fixes whose step falls inside it.
#[test]
fn multi_step_chain_applies_only_fixes_within_the_requested_range() {
    let schemas = registry(vec![
        player_schema(1, &["playerName"]),
        player_schema(2, &["name"]),
        player_schema(3, &["position"]),
        player_schema(4, &["position", "level"]),
    ]);

    let mut fixes = FixRegistry::new();
    fixes
        .register(DataFix::new("rename-name", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2), |_i, _o| rename_field("playerName", "name")).unwrap())
        .unwrap();
    fixes
        .register(
            DataFix::new("group-position", TypeReference::new("player"), DataVersion::new(2), DataVersion::new(3), |_i, _o| {
                datafix::rewrite::group_fields("position", vec!["x".to_owned(), "y".to_owned()])
            })
            .unwrap(),
        )
        .unwrap();
    fixes
        .register(
            DataFix::new("add-level", TypeReference::new("player"), DataVersion::new(3), DataVersion::new(4), |_i, _o| {
                datafix::rewrite::add_field("level", |d: &Dynamic<_, _>| d.create_int(1))
            })
            .unwrap(),
        )
        .unwrap();

    let driver = Driver::new(fixes, schemas, DataVersion::new(4)).unwrap();

    let ops = JsonOps;
    let make_input = || {
        Dynamic::new(ops, ops.empty_map())
            .set("playerName", Dynamic::new(ops, ops.create_string("Steve")))
            .set("x", Dynamic::new(ops, ops.create_int(1)))
            .set("y", Dynamic::new(ops, ops.create_int(2)))
    };

    // v1 -> v4: all three fixes apply.
    let full = driver.update(make_input().tagged(TypeReference::new("player")), DataVersion::new(1), DataVersion::new(4), None).unwrap().value().unwrap();
    let full_dynamic = full.dynamic();
    assert!(full_dynamic.has("name"));
    assert!(!full_dynamic.has("playerName"));
    assert!(full_dynamic.has("position"));
    assert!(full_dynamic.has("level"));

    // v2 -> v4: only the last two fixes apply; `playerName` was never renamed since this
    // caller already has the v2 shape.
    let input_v2 = Dynamic::new(ops, ops.empty_map()).set("name", Dynamic::new(ops, ops.create_string("Steve"))).set("x", Dynamic::new(ops, ops.create_int(1))).set("y", Dynamic::new(ops, ops.create_int(2)));
    let partial_range = driver.update(input_v2.tagged(TypeReference::new("player")), DataVersion::new(2), DataVersion::new(4), None).unwrap().value().unwrap();
    let partial_dynamic = partial_range.dynamic();
    assert!(partial_dynamic.has("position"));
    assert!(partial_dynamic.has("level"));

    // v1 -> v2: only the rename fix applies.
    let only_rename = driver.update(make_input().tagged(TypeReference::new("player")), DataVersion::new(1), DataVersion::new(2), None).unwrap().value().unwrap();
    let only_rename_dynamic = only_rename.dynamic();
    assert!(only_rename_dynamic.has("name"));
    assert!(!only_rename_dynamic.has("position"));
    assert!(!only_rename_dynamic.has("level"));
}

/// Scenario 6: a three-fix chain run with diagnostics enabled produces a report with one
/// `FixExecution` per fix, in order, and an accurate total duration; the same migration run
/// without a context attaches no report at all.
#[test]
fn diagnostics_capture_one_fix_execution_per_fix_in_order() {
    let schemas = registry(vec![player_schema(1, &["a"]), player_schema(2, &["b"]), player_schema(3, &["c"]), player_schema(4, &["d"])]);

    let mut fixes = FixRegistry::new();
    fixes.register(DataFix::new("a-to-b", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2), |_i, _o| rename_field("a", "b")).unwrap()).unwrap();
    fixes.register(DataFix::new("b-to-c", TypeReference::new("player"), DataVersion::new(2), DataVersion::new(3), |_i, _o| rename_field("b", "c")).unwrap()).unwrap();
    fixes.register(DataFix::new("c-to-d", TypeReference::new("player"), DataVersion::new(3), DataVersion::new(4), |_i, _o| rename_field("c", "d")).unwrap()).unwrap();

    let driver = Driver::new(fixes, schemas, DataVersion::new(4)).unwrap();

    let ops = JsonOps;
    let input = Dynamic::new(ops, ops.empty_map()).set("a", Dynamic::new(ops, ops.create_string("x")));
    let tagged = input.tagged(TypeReference::new("player"));

    let options = DiagnosticOptions {
        capture_snapshots: true,
        capture_rule_details: false,
        ..DiagnosticOptions::default()
    };
    let mut context = DiagnosticContext::start(options, TypeReference::new("player"), DataVersion::new(1), DataVersion::new(4));

    let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(4), Some(&mut context)).unwrap();
    let migrated = result.value().unwrap();
    assert!(migrated.dynamic().has("d"));

    let report = context.finish(Some(migrated.dynamic()));
    assert_eq!(report.fix_executions.len(), 3);
    assert_eq!(report.fix_executions[0].fix_name, "a-to-b");
    assert_eq!(report.fix_executions[1].fix_name, "b-to-c");
    assert_eq!(report.fix_executions[2].fix_name, "c-to-d");
    assert_eq!(report.total_duration(), report.end.duration_since(report.start));
    assert!(report.input_snapshot.is_some());
    assert!(report.output_snapshot.is_some());
}

/// Running the same chain with no diagnostic context attaches no report; the driver's
/// behaviour on the data itself is identical either way.
#[test]
fn migration_without_diagnostics_produces_the_same_output_with_no_report() {
    let schemas = registry(vec![player_schema(1, &["a"]), player_schema(2, &["b"])]);

    let mut fixes = FixRegistry::new();
    fixes.register(DataFix::new("a-to-b", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(2), |_i, _o| rename_field("a", "b")).unwrap()).unwrap();

    let driver = Driver::new(fixes, schemas, DataVersion::new(2)).unwrap();

    let ops = JsonOps;
    let input = Dynamic::new(ops, ops.empty_map()).set("a", Dynamic::new(ops, ops.create_string("x")));
    let tagged = input.tagged(TypeReference::new("player"));

    let result = driver.update(tagged, DataVersion::new(1), DataVersion::new(2), None).unwrap();
    let migrated = result.value().unwrap();
    assert!(migrated.dynamic().has("b"));
    assert!(!migrated.dynamic().has("a"));
}

/// A driver built over a fix whose range no schema covers is rejected at construction, before
/// any migration call is attempted.
#[test]
fn driver_construction_rejects_uncovered_fix_ranges() {
    let schemas = registry(vec![player_schema(1, &["a"])]);
    let mut fixes = FixRegistry::new();
    fixes.register(DataFix::new("a-to-b", TypeReference::new("player"), DataVersion::new(1), DataVersion::new(5), |_i, _o| rename_field("a", "b")).unwrap()).unwrap();

    let result = Driver::new(fixes, schemas, DataVersion::new(5));
    assert!(result.is_err());
}
