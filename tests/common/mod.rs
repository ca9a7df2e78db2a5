// Shared test helpers
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use benchdash::loader::parse_timestamp;
use benchdash::models::*;
use chrono::NaiveDateTime;

pub fn ts(s: &str) -> NaiveDateTime {
    parse_timestamp(s).expect("valid timestamp")
}

pub fn op(timestamp: &str, node: &str, action: &str, duration_ms: f64, success: bool) -> OperationRecord {
    OperationRecord {
        timestamp: ts(timestamp),
        node_id: node.into(),
        worker_id: Some("1".into()),
        action: action.into(),
        duration_raw: Some(format!("{}ms", duration_ms)),
        duration_ms,
        success,
        error: None,
    }
}

pub fn snapshot(timestamp: &str, metrics: &[(&str, f64)]) -> MetricSnapshot {
    MetricSnapshot {
        timestamp: ts(timestamp),
        metrics: metrics
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>(),
        labels: BTreeMap::new(),
    }
}

pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Three operations across two seconds, plus one without node_id.
pub fn operations_json() -> serde_json::Value {
    serde_json::json!([
        {"worker_id": 1, "timestamp": "2024-05-01T10:00:00Z", "action": "read", "node_id": 1,
         "duration": "10ms", "success": true},
        {"worker_id": 2, "timestamp": "2024-05-01T10:00:00.5Z", "action": "read", "node_id": 1,
         "duration": "20ms", "success": true},
        {"worker_id": 1, "timestamp": "2024-05-01T10:00:01Z", "action": "write", "node_id": 2,
         "employee": {"id": "e1", "name": "a", "dept": "x", "salary": 10},
         "duration": "1.5s", "success": false, "error": "timeout"},
        {"worker_id": 3, "timestamp": "2024-05-01T10:00:01Z", "action": "read", "node_id": null,
         "duration": "5ms", "success": true}
    ])
}

pub fn metrics_json() -> serde_json::Value {
    serde_json::json!([
        {"timestamp": "2024-05-01T10:00:00Z",
         "cpu": {"usage_percent": 50.0, "load_average": {"load_1m": 1.0}},
         "memory": {"usage_percent": 60.0, "used_bytes": 1024},
         "docker": {"container_id": "0123456789abcdef", "container_name": "cassandra-1"}},
        {"timestamp": "2024-05-01T10:00:02Z",
         "cpu": {"usage_percent": 90.0},
         "memory": {"usage_percent": 70.0}}
    ])
}
