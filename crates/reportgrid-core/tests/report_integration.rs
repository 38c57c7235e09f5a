//! Integration tests for the report pipeline.

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use reportgrid_core::proto::{
    FieldDef, FieldType, FilterNode, Operator, Record, ReportConfig, ReportQuery, SortKey, Value,
};
use reportgrid_core::{
    sort_records, EngineConfig, Error, ExpandState, FieldCatalog, FilterEvaluator, GroupNode,
    GroupPath, ReportEngine, VisibleRow,
};

fn ids(rows: &[&Record]) -> Vec<i64> {
    rows.iter()
        .filter_map(|r| r.value("id").as_f64())
        .map(|id| id as i64)
        .collect()
}

fn status_records() -> Vec<Record> {
    vec![
        Record::new().with("id", 1).with("status", "pending"),
        Record::new().with("id", 2).with("status", "done"),
        Record::new().with("id", 3).with("status", "pending"),
    ]
}

/// Records with deliberately colliding keys and a sprinkling of nulls.
fn random_records(seed: u64, count: usize) -> Vec<Record> {
    let mut rng = StdRng::seed_from_u64(seed);
    let statuses = ["pending", "in_progress", "done", "failed"];
    let facilities = ["Lab A", "Lab B", "Lab C"];

    (0..count)
        .map(|i| {
            let priority: Value = if rng.gen_bool(0.1) {
                Value::Null
            } else {
                Value::from(rng.gen_range(1..=5i64))
            };
            Record::new()
                .with("id", i as i64)
                .with("status", statuses[rng.gen_range(0..statuses.len())])
                .with("facility", facilities[rng.gen_range(0..facilities.len())])
                .with("priority", priority)
                .with("score", rng.gen_range(0.0..100.0f64))
        })
        .collect()
}

fn sort_specs() -> Vec<Vec<SortKey>> {
    vec![
        vec![],
        vec![SortKey::asc("priority")],
        vec![SortKey::desc("priority"), SortKey::asc("status")],
        vec![SortKey::asc("facility"), SortKey::desc("score")],
    ]
}

fn group_specs() -> Vec<Vec<String>> {
    vec![
        vec![],
        vec!["status".to_string()],
        vec!["facility".to_string(), "status".to_string()],
        vec!["facility".to_string(), "priority".to_string(), "status".to_string()],
    ]
}

#[test]
fn test_scenario_filter_equals() {
    let data = status_records();
    let query = ReportQuery::new().with_filter(FilterNode::and(vec![FilterNode::equals(
        "status", "pending",
    )]));

    let output = ReportEngine::default().run(&data, &query).unwrap();
    assert_eq!(ids(output.rows()), vec![1, 3]);
}

#[test]
fn test_scenario_group_counts() {
    let data = status_records();
    let query = ReportQuery::new().with_group("status");

    let output = ReportEngine::default().run(&data, &query).unwrap();
    let groups = output.groups();

    let keys: Vec<&str> = groups.entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["pending", "done"]);
    assert_eq!(ids(groups.get("pending").unwrap().records()), vec![1, 3]);
    assert_eq!(ids(groups.get("done").unwrap().records()), vec![2]);
    assert_eq!(groups.get("pending").unwrap().count(), 2);
    assert_eq!(groups.get("done").unwrap().count(), 1);
    assert_eq!(output.total(), 3);
}

#[test]
fn test_scenario_sort_tie_break() {
    let data = vec![
        Record::new().with("id", 4).with("priority", 1),
        Record::new().with("id", 3).with("priority", 2),
        Record::new().with("id", 1).with("priority", 2),
        Record::new().with("id", 2).with("priority", 1),
    ];
    let query = ReportQuery::new()
        .with_order(SortKey::desc("priority"))
        .with_order(SortKey::asc("id"));

    let output = ReportEngine::default().run(&data, &query).unwrap();
    assert_eq!(ids(output.rows()), vec![1, 3, 2, 4]);
}

#[test]
fn test_scenario_between_inclusive() {
    let data: Vec<Record> = [5, 10, 15, 20, 25]
        .into_iter()
        .map(|n| Record::new().with("id", n).with("amount", n))
        .collect();
    let query = ReportQuery::new().with_filter(FilterNode::between("amount", 10, 20));

    let output = ReportEngine::default().run(&data, &query).unwrap();
    assert_eq!(ids(output.rows()), vec![10, 15, 20]);
}

#[test]
fn test_scenario_toggle_twice() {
    let mut state: ExpandState = [GroupPath::new(["done"]), GroupPath::new(["pending", "Lab A"])]
        .into_iter()
        .collect();
    let original = state.clone();

    let path = GroupPath::new(["pending"]);
    state.toggle(&path);
    state.toggle(&path);
    assert_eq!(state, original);

    let existing = GroupPath::new(["done"]);
    state.toggle(&existing);
    state.toggle(&existing);
    assert_eq!(state, original);
}

#[test]
fn test_sort_idempotent() {
    let data = random_records(7, 200);
    for spec in sort_specs() {
        let mut once: Vec<&Record> = data.iter().collect();
        sort_records(&mut once, &spec);
        let mut twice = once.clone();
        sort_records(&mut twice, &spec);
        assert_eq!(ids(&once), ids(&twice));
    }
}

#[test]
fn test_sort_stable_for_equal_keys() {
    let data = random_records(11, 200);
    let spec = vec![SortKey::asc("status")];
    let mut rows: Vec<&Record> = data.iter().collect();
    sort_records(&mut rows, &spec);

    // Within each run of equal status, ids keep their input (ascending) order.
    for pair in rows.windows(2) {
        if pair[0].value("status") == pair[1].value("status") {
            assert!(pair[0].value("id").as_f64() < pair[1].value("id").as_f64());
        }
    }
}

#[test]
fn test_empty_groups_vacuously_true() {
    let data = random_records(3, 50);
    let empty_and = FilterNode::and(Vec::new());
    let empty_or = FilterNode::or(Vec::new());

    for record in &data {
        assert!(FilterEvaluator::evaluate(&empty_and, record));
        assert!(FilterEvaluator::evaluate(&empty_or, record));
    }
}

#[test]
fn test_count_conservation() {
    let data = random_records(23, 300);
    let engine = ReportEngine::default();

    for group_by in group_specs() {
        let query = ReportQuery {
            group_by,
            ..ReportQuery::new()
        };
        let output = engine.run(&data, &query).unwrap();
        assert_eq!(output.groups().count(), data.len());
        assert_eq!(output.groups().flatten().len(), data.len());
    }
}

#[test]
fn test_grouping_deterministic() {
    let data = random_records(42, 300);
    let engine = ReportEngine::default();

    for (sort_by, group_by) in sort_specs().into_iter().zip(group_specs()) {
        let query = ReportQuery {
            sort_by,
            group_by,
            ..ReportQuery::new()
        };
        let first = engine.run(&data, &query).unwrap();
        let second = engine.run(&data, &query).unwrap();
        assert_eq!(first.groups(), second.groups());
    }
}

#[test]
fn test_groups_follow_sort_order() {
    let data = random_records(5, 100);
    let query = ReportQuery::new()
        .with_order(SortKey::asc("facility"))
        .with_group("facility");

    let output = ReportEngine::default().run(&data, &query).unwrap();
    let keys: Vec<&str> = output.groups().entries().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["Lab A", "Lab B", "Lab C"]);
}

#[test]
fn test_saved_report_end_to_end() {
    let json = r#"{
        "id": "lab-queue",
        "name": "Lab queue",
        "module": "Laboratory",
        "columns": [
            {"id": "c1", "fieldId": "id", "label": "ID", "visible": true, "sortable": true},
            {"id": "c2", "fieldId": "status", "label": "Status", "visible": true, "sortable": true},
            {"id": "c3", "fieldId": "score", "label": "Score", "visible": false, "sortable": true}
        ],
        "filters": {
            "id": "root",
            "type": "group",
            "operator": "OR",
            "conditions": [
                {"id": "a", "type": "condition", "field": "status", "operator": "equals", "value": "pending"},
                {"id": "b", "type": "condition", "field": "amount", "operator": "greater_than", "value": "15"}
            ]
        },
        "groupBy": [{"fieldId": "status"}],
        "sortBy": [{"fieldId": "amount", "direction": "desc"}],
        "pageSize": 2
    }"#;
    let report: ReportConfig = serde_json::from_str(json).unwrap();
    let visible: Vec<&str> = report.visible_columns().map(|c| c.field_id.as_str()).collect();
    assert_eq!(visible, vec!["id", "status"]);

    let data = vec![
        Record::new().with("id", 1).with("status", "pending").with("amount", 5),
        Record::new().with("id", 2).with("status", "done").with("amount", 30),
        Record::new().with("id", 3).with("status", "pending").with("amount", 12),
        Record::new().with("id", 4).with("status", "done").with("amount", 8),
        Record::new().with("id", 5).with("status", "failed").with("amount", "n/a"),
    ];

    let output = ReportEngine::default().run(&data, &report.query()).unwrap();
    assert_eq!(ids(output.rows()), vec![2, 3, 1]);
    assert_eq!(output.page_count(report.page_size), 2);

    let mut state = ExpandState::new();
    state.expand(GroupPath::new(["pending"]));
    let rendered: Vec<String> = output
        .visible_rows(&state)
        .iter()
        .map(|row| match row {
            VisibleRow::Group(group) => format!("{} ({})", group.key(), group.count),
            VisibleRow::Record { record, .. } => format!("  #{}", record.value("id")),
        })
        .collect();
    assert_eq!(rendered, vec!["done (1)", "pending (2)", "  #3", "  #1"]);
}

#[test]
fn test_expand_all_shows_every_record() {
    let data = random_records(9, 60);
    let query = ReportQuery::new().with_group("facility").with_group("status");
    let output = ReportEngine::default().run(&data, &query).unwrap();

    let mut state = ExpandState::new();
    state.expand_all(output.groups());
    let records = output
        .visible_rows(&state)
        .into_iter()
        .filter(|row| matches!(row, VisibleRow::Record { .. }))
        .count();
    assert_eq!(records, data.len());
}

#[test]
fn test_regrouping_leaves_stale_paths_inert() {
    let data = random_records(13, 40);
    let engine = ReportEngine::default();

    let by_status = engine
        .run(&data, &ReportQuery::new().with_group("status"))
        .unwrap();
    let mut state = ExpandState::new();
    state.expand_all(by_status.groups());

    let by_facility = engine
        .run(&data, &ReportQuery::new().with_group("facility"))
        .unwrap();
    let visible = by_facility.visible_rows(&state);
    assert!(visible.iter().all(|row| matches!(row, VisibleRow::Group(g) if !g.expanded)));
    assert!(matches!(by_facility.groups(), GroupNode::Branch(_)));
}

#[test]
fn test_catalog_rejects_illegal_operator() {
    let catalog = FieldCatalog::new(vec![
        FieldDef::new("status", "Status", FieldType::Select).with_options(vec![
            "pending".to_string(),
            "done".to_string(),
        ]),
        FieldDef::new("amount", "Amount", FieldType::Number),
    ]);
    let engine = ReportEngine::new(EngineConfig::default()).with_catalog(catalog);
    let data = status_records();

    let illegal = ReportQuery::new().with_filter(FilterNode::condition(
        "amount",
        Operator::Contains,
        Value::from("1"),
    ));
    match engine.run(&data, &illegal) {
        Err(Error::InvalidOperator { field, .. }) => assert_eq!(field, "amount"),
        other => panic!("expected InvalidOperator, got {other:?}"),
    }

    let legal = ReportQuery::new().with_filter(FilterNode::one_of("status", vec!["done"]));
    assert_eq!(ids(engine.run(&data, &legal).unwrap().rows()), vec![2]);
}

#[test]
fn test_unknown_operator_fails_open() {
    let json = r#"{"type": "condition", "field": "status", "operator": "sounds_like", "value": "x"}"#;
    let filter: FilterNode = serde_json::from_str(json).unwrap();
    let data = status_records();

    let output = ReportEngine::default()
        .run(&data, &ReportQuery::new().with_filter(filter))
        .unwrap();
    assert_eq!(output.total(), 3);
}
