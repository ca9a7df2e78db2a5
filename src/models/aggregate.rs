// Aggregated rows: one per observed (bucket, dimension values) group.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::operation::{Dimension, dimension_label};

/// Fixed bucket width in whole seconds (never zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketWidth(u32);

impl BucketWidth {
    pub const ONE_SECOND: BucketWidth = BucketWidth(1);
    pub const FIVE_SECONDS: BucketWidth = BucketWidth(5);

    pub fn from_secs(secs: u32) -> Option<Self> {
        (secs > 0).then_some(BucketWidth(secs))
    }

    pub fn secs(&self) -> u32 {
        self.0
    }

    /// Start of the bucket containing `ts`: floor to a multiple of the width on the
    /// UTC epoch timeline (leap seconds ignored, pre-epoch times floor downwards).
    pub fn floor(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let width_ms = i64::from(self.0) * 1000;
        let ms = ts.and_utc().timestamp_millis();
        let start = ms.div_euclid(width_ms) * width_ms;
        DateTime::from_timestamp_millis(start)
            .map(|dt| dt.naive_utc())
            .unwrap_or(ts)
    }
}

/// Which statistics the caller wants per group. `count` is always produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub mean_duration: bool,
    pub success_rate: bool,
}

impl Statistics {
    pub const COUNT: Statistics = Statistics {
        mean_duration: false,
        success_rate: false,
    };
    pub const LATENCY: Statistics = Statistics {
        mean_duration: true,
        success_rate: false,
    };
    pub const SUCCESS_RATE: Statistics = Statistics {
        mean_duration: false,
        success_rate: true,
    };
    pub const ALL: Statistics = Statistics {
        mean_duration: true,
        success_rate: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DimensionValue {
    pub dimension: Dimension,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRow {
    /// Bucket start; absent for un-bucketed (per-dimension only) aggregates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<NaiveDateTime>,
    pub dimensions: Vec<DimensionValue>,
    /// Chart series label, e.g. "Node 1 - read"; empty when there is no dimension split.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean_duration_ms: Option<f64>,
    /// Percentage of successful operations in the group (0..=100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

impl AggregateRow {
    pub fn value(&self, dimension: Dimension) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.dimension == dimension)
            .map(|d| d.value.as_str())
    }

}

/// "Node 1 - read" for `[node=1, action=read]`.
pub fn series_label(dimensions: &[DimensionValue]) -> String {
    dimensions
        .iter()
        .map(|d| dimension_label(d.dimension, &d.value))
        .collect::<Vec<_>>()
        .join(" - ")
}

/// Headline numbers for a whole run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total_operations: u64,
    pub success_rate: f64,
    pub mean_duration_ms: f64,
    /// Seconds between the first and last operation.
    pub duration_secs: f64,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
}
