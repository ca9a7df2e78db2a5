// Output of the cross-series correlator.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Advisory threshold on a joined column; a period "violates" it when the value is strictly greater.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Threshold {
    pub metric: String,
    pub threshold: f64,
    /// Human name used in the advisory text; defaults to the metric key.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub unit: String,
    /// Recommendation appended to the advisory text.
    #[serde(default)]
    pub hint: Option<String>,
}

impl Threshold {
    pub fn new(metric: &str, threshold: f64, label: &str, unit: &str) -> Self {
        Self {
            metric: metric.into(),
            threshold,
            label: Some(label.into()),
            unit: unit.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// CPU > 80 %, memory > 85 %, latency > 100 ms.
    pub fn defaults() -> Vec<Threshold> {
        vec![
            Threshold::new("cpu.usage_percent", 80.0, "CPU usage", "%")
                .with_hint("Consider scaling up CPU resources."),
            Threshold::new("memory.usage_percent", 85.0, "Memory usage", "%")
                .with_hint("Consider increasing memory allocation."),
            Threshold::new("duration_ms", 100.0, "Latency", "ms")
                .with_hint("This may indicate performance bottlenecks."),
        ]
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.metric)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub metric: String,
    pub threshold: f64,
    /// Number of joined buckets above the threshold.
    pub periods: usize,
    pub message: String,
}

/// One bucket present on both sides of the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRow {
    pub bucket: NaiveDateTime,
    pub values: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnInsight {
    pub column: String,
    pub mean: f64,
    pub peak: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationResult {
    pub columns: Vec<String>,
    /// `matrix[i][j]` = Pearson(columns[i], columns[j]); `None` where undefined.
    pub matrix: Vec<Vec<Option<f64>>>,
    pub rows: Vec<JoinedRow>,
    pub insights: Vec<ColumnInsight>,
    pub advisories: Vec<Advisory>,
}

impl CorrelationResult {
    pub fn coefficient(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.matrix[i][j]
    }

    pub fn insight(&self, column: &str) -> Option<&ColumnInsight> {
        self.insights.iter().find(|i| i.column == column)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum Correlation {
    /// The two aggregates share no bucket.
    NoOverlap,
    Matrix(CorrelationResult),
}

impl Correlation {
    pub fn result(&self) -> Option<&CorrelationResult> {
        match self {
            Correlation::NoOverlap => None,
            Correlation::Matrix(r) => Some(r),
        }
    }
}
