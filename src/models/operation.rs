// One benchmark operation attempt, as loaded from result.json.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    pub timestamp: NaiveDateTime,
    pub node_id: String,
    #[serde(default)]
    pub worker_id: Option<String>,
    pub action: String,
    /// Duration exactly as written by the benchmark (e.g. "1.52ms", "1m3.2s").
    #[serde(default)]
    pub duration_raw: Option<String>,
    /// Normalized elapsed time; 0 when the raw value is absent or unparsable.
    pub duration_ms: f64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Categorical field used to sub-group records inside a bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Node,
    Worker,
    Action,
}

impl Dimension {
    /// Parse a query/config name ("node", "node_id", "worker", "worker_id", "action").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "node" | "node_id" => Some(Dimension::Node),
            "worker" | "worker_id" => Some(Dimension::Worker),
            "action" => Some(Dimension::Action),
            _ => None,
        }
    }

    /// The record's value for this dimension; records without a worker id are
    /// left out of any grouping that uses `Worker`.
    pub fn value_of<'a>(&self, record: &'a OperationRecord) -> Option<&'a str> {
        match self {
            Dimension::Node => Some(record.node_id.as_str()),
            Dimension::Worker => record.worker_id.as_deref(),
            Dimension::Action => Some(record.action.as_str()),
        }
    }

    fn display_prefix(&self) -> &'static str {
        match self {
            Dimension::Node => "Node ",
            Dimension::Worker => "Worker ",
            Dimension::Action => "",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Dimension::Node => "node",
            Dimension::Worker => "worker",
            Dimension::Action => "action",
        };
        f.write_str(name)
    }
}

/// Parse a comma-separated dimension list ("node,action"). Empty input is no split.
pub fn parse_dimensions(s: &str) -> Result<Vec<Dimension>, crate::error::UnknownDimension> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| Dimension::parse(part).ok_or_else(|| crate::error::UnknownDimension(part.into())))
        .collect()
}

pub(crate) fn dimension_label(dimension: Dimension, value: &str) -> String {
    format!("{}{}", dimension.display_prefix(), value)
}
