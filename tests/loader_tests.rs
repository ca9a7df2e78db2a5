// Loader tests: flattening, timestamps, node filter, duration defaulting, file states

mod common;

use benchdash::error::LoadError;
use benchdash::loader::*;
use serde_json::json;

#[test]
fn flatten_nested_objects_to_dotted_keys_in_order() {
    let row = flatten(&json!({
        "timestamp": "t",
        "cpu": {"usage_percent": 42.1, "load_average": {"load_1m": 0.5}},
        "memory": {"used_bytes": 10}
    }));
    let keys: Vec<&str> = row.keys().collect();
    assert_eq!(
        keys,
        vec![
            "timestamp",
            "cpu.usage_percent",
            "cpu.load_average.load_1m",
            "memory.used_bytes"
        ]
    );
    assert_eq!(row.get("cpu.usage_percent"), Some(&json!(42.1)));
}

#[test]
fn flatten_indexes_arrays() {
    let row = flatten(&json!({"gpu": {"devices": [{"temperature_celsius": 61}, {"temperature_celsius": 70}]}}));
    assert_eq!(row.get("gpu.devices.0.temperature_celsius"), Some(&json!(61)));
    assert_eq!(row.get("gpu.devices.1.temperature_celsius"), Some(&json!(70)));
}

#[test]
fn flatten_drops_empty_containers_keeps_null_leaves() {
    let row = flatten(&json!({"a": {}, "b": [], "c": null}));
    assert_eq!(row.len(), 1);
    assert_eq!(row.get("c"), Some(&json!(null)));
}

#[test]
fn parse_timestamp_rfc3339_converts_to_utc() {
    let t = parse_timestamp("2024-05-01T12:00:00+02:00").unwrap();
    assert_eq!(t, common::ts("2024-05-01T10:00:00"));
}

#[test]
fn parse_timestamp_naive_forms() {
    let a = parse_timestamp("2024-05-01T10:00:00.250").unwrap();
    let b = parse_timestamp("2024-05-01 10:00:00.250").unwrap();
    assert_eq!(a, b);
    assert_eq!(a.and_utc().timestamp_subsec_millis(), 250);
    assert!(parse_timestamp("2024-05-01 10:00:00").is_some());
    assert!(parse_timestamp("yesterday").is_none());
}

#[test]
fn retain_with_node_drops_null_and_missing() {
    let rows = vec![
        flatten(&json!({"node_id": 1})),
        flatten(&json!({"node_id": null})),
        flatten(&json!({"other": 1})),
        flatten(&json!({"node_id": "n2"})),
    ];
    let (kept, dropped) = retain_with_node(rows);
    assert_eq!(dropped, 2);
    assert_eq!(kept.len(), 2);
}

#[test]
fn normalize_duration_defaults_to_zero() {
    assert_eq!(normalize_duration(None), 0.0);
    assert_eq!(normalize_duration(Some(&json!(null))), 0.0);
    assert_eq!(normalize_duration(Some(&json!("bogus"))), 0.0);
    assert_eq!(normalize_duration(Some(&json!("2s"))), 2000.0);
    assert_eq!(normalize_duration(Some(&json!(7.5))), 7.5);
}

#[test]
fn parse_operations_excludes_missing_node_keeps_others_unchanged() {
    let rows = common::operations_json().as_array().unwrap().clone();
    let loaded = parse_operations(rows);
    assert_eq!(loaded.records.len(), 3);
    assert_eq!(loaded.report.total_rows, 4);
    assert_eq!(loaded.report.missing_node, 1);
    assert_eq!(loaded.report.dropped(), 1);

    let write = &loaded.records[2];
    assert_eq!(write.node_id, "2");
    assert_eq!(write.worker_id.as_deref(), Some("1"));
    assert_eq!(write.action, "write");
    assert_eq!(write.duration_raw.as_deref(), Some("1.5s"));
    assert_eq!(write.duration_ms, 1500.0);
    assert!(!write.success);
    assert_eq!(write.error.as_deref(), Some("timeout"));
    assert_eq!(write.timestamp, common::ts("2024-05-01T10:00:01"));
}

#[test]
fn parse_operations_drops_bad_timestamp_and_non_objects() {
    let loaded = parse_operations(vec![
        json!({"timestamp": "not a time", "node_id": 1, "action": "read", "success": true}),
        json!(42),
        json!({"timestamp": "2024-05-01T10:00:00Z", "node_id": 1, "action": "read"}),
    ]);
    assert_eq!(loaded.records.len(), 1);
    assert_eq!(loaded.report.bad_timestamp, 1);
    assert_eq!(loaded.report.not_an_object, 1);
    // absent duration and success
    assert_eq!(loaded.records[0].duration_ms, 0.0);
    assert!(!loaded.records[0].success);
}

#[test]
fn parse_metrics_splits_numbers_and_labels() {
    let rows = common::metrics_json().as_array().unwrap().clone();
    let loaded = parse_metrics(rows);
    assert_eq!(loaded.records.len(), 2);
    let first = &loaded.records[0];
    assert_eq!(first.metric("cpu.usage_percent"), Some(50.0));
    assert_eq!(first.metric("cpu.load_average.load_1m"), Some(1.0));
    assert_eq!(first.label("docker.container_name"), Some("cassandra-1"));
    assert_eq!(first.metric("docker.container_name"), None);
    assert_eq!(loaded.records[1].metric("memory.used_bytes"), None);
}

#[test]
fn parse_metrics_keeps_rows_without_node() {
    let loaded = parse_metrics(vec![json!({"timestamp": "2024-05-01T10:00:00Z", "node_id": null, "cpu": {"usage_percent": 1}})]);
    assert_eq!(loaded.records.len(), 1);
}

#[test]
fn load_operations_missing_file_is_unavailable() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = load_operations(&dir.path().join("result.json")).unwrap();
    assert_eq!(result, SourceData::Unavailable);
}

#[test]
fn load_metrics_missing_file_is_unavailable() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = load_metrics(&dir.path().join("system_metrics.json")).unwrap();
    assert!(result.available().is_none());
}

#[test]
fn load_operations_from_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = common::write_json(dir.path(), "result.json", &common::operations_json());
    let loaded = load_operations(&path).unwrap();
    let loaded = loaded.available().expect("available");
    assert_eq!(loaded.records.len(), 3);
}

#[test]
fn load_malformed_file_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("result.json");
    std::fs::write(&path, "[{\"timestamp\": ").unwrap();
    let err = load_operations(&path).unwrap_err();
    assert!(matches!(err, LoadError::Malformed { .. }));
    assert!(err.to_string().contains("result.json"));
}

#[test]
fn load_non_array_is_an_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = common::write_json(dir.path(), "system_metrics.json", &json!({"cpu": 1}));
    let err = load_metrics(&path).unwrap_err();
    assert!(matches!(err, LoadError::NotAnArray { .. }));
}

#[test]
fn load_empty_file_is_empty_source() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("result.json");
    std::fs::write(&path, "\n").unwrap();
    let loaded = load_operations(&path).unwrap();
    assert_eq!(loaded.available().map(|l| l.records.len()), Some(0));
}
