// Reads result.json (operation records) and system_metrics.json (metric snapshots).
//
// Per-record problems are absorbed here (dropped or defaulted, and counted);
// only whole-file failures reach the caller as LoadError.

pub mod flatten;
pub mod timestamp;

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use tracing::{instrument, warn};

use crate::duration;
use crate::error::LoadError;
use crate::models::{MetricSnapshot, OperationRecord};
pub use flatten::{FlatRow, flatten};
pub use timestamp::parse_timestamp;

/// A source that may not exist yet (the benchmark or monitor has not written it).
#[derive(Debug, Clone, PartialEq)]
pub enum SourceData<T> {
    Available(T),
    Unavailable,
}

impl<T> SourceData<T> {
    pub fn available(&self) -> Option<&T> {
        match self {
            SourceData::Available(t) => Some(t),
            SourceData::Unavailable => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SourceData<U> {
        match self {
            SourceData::Available(t) => SourceData::Available(f(t)),
            SourceData::Unavailable => SourceData::Unavailable,
        }
    }
}

/// What was dropped while loading, and why.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub total_rows: usize,
    pub missing_node: usize,
    pub bad_timestamp: usize,
    pub not_an_object: usize,
}

impl LoadReport {
    pub fn dropped(&self) -> usize {
        self.missing_node + self.bad_timestamp + self.not_an_object
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

/// Read a JSON array. A missing file is `Unavailable`; a whitespace-only file is an
/// empty array (the benchmark creates the file before writing any result).
pub fn read_rows(path: &Path) -> Result<SourceData<Vec<Value>>, LoadError> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(SourceData::Unavailable);
        }
        Err(source) => {
            return Err(LoadError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if text.trim().is_empty() {
        return Ok(SourceData::Available(Vec::new()));
    }
    let value: Value = serde_json::from_str(&text).map_err(|source| LoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    match value {
        Value::Array(rows) => Ok(SourceData::Available(rows)),
        _ => Err(LoadError::NotAnArray {
            path: path.to_path_buf(),
        }),
    }
}

#[instrument(fields(source = "operations"))]
pub fn load_operations(path: &Path) -> Result<SourceData<Loaded<OperationRecord>>, LoadError> {
    let loaded = read_rows(path)?.map(parse_operations);
    if let SourceData::Available(l) = &loaded {
        log_report(path, &l.report);
    }
    Ok(loaded)
}

#[instrument(fields(source = "metrics"))]
pub fn load_metrics(path: &Path) -> Result<SourceData<Loaded<MetricSnapshot>>, LoadError> {
    let loaded = read_rows(path)?.map(parse_metrics);
    if let SourceData::Available(l) = &loaded {
        log_report(path, &l.report);
    }
    Ok(loaded)
}

fn log_report(path: &Path, report: &LoadReport) {
    if report.dropped() > 0 {
        warn!(
            path = %path.display(),
            total = report.total_rows,
            missing_node = report.missing_node,
            bad_timestamp = report.bad_timestamp,
            not_an_object = report.not_an_object,
            "dropped malformed rows"
        );
    }
}

/// Flatten every object row; non-objects are counted and skipped.
fn flatten_rows(rows: &[Value], report: &mut LoadReport) -> Vec<FlatRow> {
    report.total_rows = rows.len();
    rows.iter()
        .filter_map(|row| {
            if row.is_object() {
                Some(flatten(row))
            } else {
                report.not_an_object += 1;
                None
            }
        })
        .collect()
}

pub fn parse_operations(rows: Vec<Value>) -> Loaded<OperationRecord> {
    let mut report = LoadReport::default();
    let flat = flatten_rows(&rows, &mut report);
    let (flat, missing_node) = retain_with_node(flat);
    report.missing_node = missing_node;

    let mut records = Vec::with_capacity(flat.len());
    for row in &flat {
        match operation_from_row(row) {
            Some(record) => records.push(record),
            None => report.bad_timestamp += 1,
        }
    }
    Loaded { records, report }
}

pub fn parse_metrics(rows: Vec<Value>) -> Loaded<MetricSnapshot> {
    let mut report = LoadReport::default();
    let flat = flatten_rows(&rows, &mut report);

    let mut records = Vec::with_capacity(flat.len());
    for row in &flat {
        match snapshot_from_row(row) {
            Some(snapshot) => records.push(snapshot),
            None => report.bad_timestamp += 1,
        }
    }
    Loaded { records, report }
}

/// Node filtering step: rows whose `node_id` is null or missing are discarded.
/// Returns the kept rows and how many were dropped.
pub fn retain_with_node(rows: Vec<FlatRow>) -> (Vec<FlatRow>, usize) {
    let before = rows.len();
    let kept: Vec<FlatRow> = rows
        .into_iter()
        .filter(|row| row.get("node_id").and_then(text).is_some())
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Duration defaulting step: absent or unparsable durations become 0 ms.
pub fn normalize_duration(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::String(s)) => duration::normalize(Some(s.as_str())),
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        _ => duration::normalize(None),
    }
}

fn operation_from_row(row: &FlatRow) -> Option<OperationRecord> {
    let timestamp = row
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    let node_id = row.get("node_id").and_then(text)?;
    let duration = row.get("duration");
    Some(OperationRecord {
        timestamp,
        node_id,
        worker_id: row.get("worker_id").and_then(text),
        action: row.get("action").and_then(text).unwrap_or_default(),
        duration_raw: duration.and_then(text),
        duration_ms: normalize_duration(duration),
        success: row.get("success").is_some_and(truthy),
        error: row
            .get("error")
            .and_then(text)
            .filter(|e| !e.is_empty()),
    })
}

fn snapshot_from_row(row: &FlatRow) -> Option<MetricSnapshot> {
    let timestamp = row
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    let mut metrics = BTreeMap::new();
    let mut labels = BTreeMap::new();
    for (key, value) in row.iter().filter(|(k, _)| *k != "timestamp") {
        match value {
            Value::Number(n) => {
                if let Some(v) = n.as_f64() {
                    metrics.insert(key.to_string(), v);
                }
            }
            Value::String(s) => {
                labels.insert(key.to_string(), s.clone());
            }
            Value::Bool(b) => {
                labels.insert(key.to_string(), b.to_string());
            }
            _ => {}
        }
    }
    Some(MetricSnapshot {
        timestamp,
        metrics,
        labels,
    })
}

/// Identifier-like leaf as text: strings as-is, numbers and bools formatted, null is absent.
fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
