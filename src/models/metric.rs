// System-resource snapshots (system_metrics.json) and their bucketed forms.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One periodic sample. Keys are dotted paths into the source document
/// (`cpu.usage_percent`, `gpu.devices.0.temperature_celsius`); any key may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSnapshot {
    pub timestamp: NaiveDateTime,
    pub metrics: BTreeMap<String, f64>,
    /// Non-numeric leaves (container name/id, GPU model, ...).
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl MetricSnapshot {
    pub fn metric(&self, key: &str) -> Option<f64> {
        self.metrics.get(key).copied()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

/// Mean of each metric over the snapshots falling in one bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricBucket {
    pub bucket: NaiveDateTime,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Raw points of one metric plus its most recent value ("current" readout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSeries {
    pub key: String,
    pub points: Vec<MetricPoint>,
    pub latest: Option<f64>,
}

/// Identity of the monitored Docker container, when the snapshots carry one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerLabel {
    pub name: String,
    /// Short (12 character) container id.
    pub id: String,
}
