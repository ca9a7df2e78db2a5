// Dashboard state: the two sources as last loaded, plus the view built from them.
// Files are read at startup and on explicit refresh only; handlers share the
// current load through an Arc and never block on file I/O.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDateTime, TimeDelta};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::aggregation;
use crate::config::AppConfig;
use crate::correlation;
use crate::error::LoadError;
use crate::loader::{self, LoadReport, Loaded, SourceData};
use crate::models::{
    AggregateRow, BucketWidth, ContainerLabel, Correlation, Dimension, MetricSnapshot,
    OperationRecord, RunSummary, Statistics, Threshold,
};

/// Paths and analysis parameters, resolved from AppConfig.
#[derive(Debug, Clone)]
pub struct DashboardSettings {
    pub operations_path: PathBuf,
    pub metrics_path: PathBuf,
    pub throughput_width: BucketWidth,
    pub correlation_width: BucketWidth,
    pub correlation_metrics: Vec<String>,
    pub thresholds: Vec<Threshold>,
    pub default_range: Option<TimeDelta>,
}

impl DashboardSettings {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let agg = &config.aggregation;
        let width = |secs: u32, name: &str| {
            BucketWidth::from_secs(secs)
                .ok_or_else(|| anyhow::anyhow!("aggregation.{} must be > 0", name))
        };
        Ok(Self {
            operations_path: PathBuf::from(&config.sources.operations_path),
            metrics_path: PathBuf::from(&config.sources.metrics_path),
            throughput_width: width(agg.throughput_interval_secs, "throughput_interval_secs")?,
            correlation_width: width(agg.correlation_interval_secs, "correlation_interval_secs")?,
            correlation_metrics: agg.correlation_metrics.clone(),
            thresholds: config.thresholds.clone(),
            default_range: agg
                .default_range_minutes
                .map(|m| TimeDelta::minutes(i64::from(m))),
        })
    }
}

/// One source after a load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceState<T> {
    Available(Loaded<T>),
    Unavailable,
    Malformed(String),
    /// Present but unreadable (permissions, a directory at the path, ...).
    Failed(String),
}

impl<T> SourceState<T> {
    pub fn records(&self) -> Option<&[T]> {
        match self {
            SourceState::Available(l) => Some(&l.records),
            _ => None,
        }
    }

    pub fn status(&self) -> SourceStatus {
        match self {
            SourceState::Available(l) => SourceStatus::Available {
                rows: l.records.len(),
                report: l.report,
            },
            SourceState::Unavailable => SourceStatus::Unavailable,
            SourceState::Malformed(error) => SourceStatus::Malformed {
                error: error.clone(),
            },
            SourceState::Failed(error) => SourceStatus::Failed {
                error: error.clone(),
            },
        }
    }
}

impl<T> From<Result<SourceData<Loaded<T>>, LoadError>> for SourceState<T> {
    fn from(result: Result<SourceData<Loaded<T>>, LoadError>) -> Self {
        match result {
            Ok(SourceData::Available(loaded)) => SourceState::Available(loaded),
            Ok(SourceData::Unavailable) => SourceState::Unavailable,
            Err(e @ LoadError::Io { .. }) => SourceState::Failed(e.to_string()),
            Err(e) => SourceState::Malformed(e.to_string()),
        }
    }
}

/// Serializable summary of a SourceState.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SourceStatus {
    Available { rows: usize, report: LoadReport },
    Unavailable,
    Malformed { error: String },
    Failed { error: String },
}

#[derive(Debug, Clone)]
pub struct LoadedSources {
    pub loaded_at: NaiveDateTime,
    pub operations: SourceState<OperationRecord>,
    pub metrics: SourceState<MetricSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusView {
    pub loaded_at: NaiveDateTime,
    pub operations: SourceStatus,
    pub metrics: SourceStatus,
}

impl LoadedSources {
    pub fn status(&self) -> StatusView {
        StatusView {
            loaded_at: self.loaded_at,
            operations: self.operations.status(),
            metrics: self.metrics.status(),
        }
    }
}

/// Reads both files. Never fails: each source ends up Available, Unavailable or Malformed.
#[instrument(skip(settings), fields(operations = %settings.operations_path.display(), metrics = %settings.metrics_path.display()))]
pub fn load_sources(settings: &DashboardSettings) -> LoadedSources {
    let operations = SourceState::from(loader::load_operations(&settings.operations_path));
    let metrics = SourceState::from(loader::load_metrics(&settings.metrics_path));
    for (name, status) in [("operations", operations.status()), ("metrics", metrics.status())] {
        match status {
            SourceStatus::Available { rows, .. } => info!(source = name, rows, "source loaded"),
            SourceStatus::Unavailable => warn!(source = name, "source file not found"),
            SourceStatus::Malformed { error } => warn!(source = name, error = %error, "source file malformed"),
            SourceStatus::Failed { error } => warn!(source = name, error = %error, "source file unreadable"),
        }
    }
    LoadedSources {
        loaded_at: chrono::Utc::now().naive_utc(),
        operations,
        metrics,
    }
}

/// Everything the dashboard draws for one refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub status: StatusView,
    pub warnings: Vec<String>,
    pub summary: Option<RunSummary>,
    /// Operations per bucket, per node and action.
    pub throughput: Vec<AggregateRow>,
    /// Mean latency per bucket, per node and action.
    pub latency: Vec<AggregateRow>,
    /// Requests per bucket, per node.
    pub request_rate: Vec<AggregateRow>,
    pub node_latency: Vec<AggregateRow>,
    pub node_success_rate: Vec<AggregateRow>,
    pub node_requests: Vec<AggregateRow>,
    pub worker_operations: Vec<AggregateRow>,
    pub metric_keys: Vec<String>,
    pub container: Option<ContainerLabel>,
    /// Absent unless both sources are available.
    pub correlation: Option<Correlation>,
}

pub fn build_view(sources: &LoadedSources, settings: &DashboardSettings) -> DashboardView {
    let mut warnings = Vec::new();
    source_warning(
        &mut warnings,
        &sources.operations,
        "Benchmark results",
        &settings.operations_path,
    );
    source_warning(
        &mut warnings,
        &sources.metrics,
        "System metrics",
        &settings.metrics_path,
    );

    let ops = sources.operations.records();
    let snapshots = sources.metrics.records();
    let by_node_action = [Dimension::Node, Dimension::Action];
    let per_bucket = |dims: &[Dimension], stats| {
        ops.map(|r| aggregation::aggregate(r, Some(settings.throughput_width), dims, stats))
            .unwrap_or_default()
    };
    let overall = |dims: &[Dimension], stats| {
        ops.map(|r| aggregation::aggregate(r, None, dims, stats))
            .unwrap_or_default()
    };

    let correlation = match (ops, snapshots) {
        (Some(ops), Some(snapshots)) => {
            let result = combined_analysis(ops, snapshots, settings);
            if result == Correlation::NoOverlap {
                warnings.push(
                    "No overlapping data found between benchmark results and system metrics."
                        .to_string(),
                );
            }
            Some(result)
        }
        _ => {
            warnings.push(
                "Both benchmark results and system metrics are required for combined analysis."
                    .to_string(),
            );
            None
        }
    };

    DashboardView {
        status: sources.status(),
        warnings,
        summary: ops.map(aggregation::summarize),
        throughput: per_bucket(&by_node_action, Statistics::COUNT),
        latency: per_bucket(&by_node_action, Statistics::LATENCY),
        request_rate: per_bucket(&[Dimension::Node], Statistics::COUNT),
        node_latency: overall(&by_node_action, Statistics::LATENCY),
        node_success_rate: overall(&by_node_action, Statistics::SUCCESS_RATE),
        node_requests: overall(&[Dimension::Node], Statistics::COUNT),
        worker_operations: overall(&[Dimension::Worker, Dimension::Action], Statistics::COUNT),
        metric_keys: snapshots.map(aggregation::metric_keys).unwrap_or_default(),
        container: snapshots.and_then(aggregation::container_label),
        correlation,
    }
}

/// Latency/success and system metrics at the correlation width, joined and correlated.
pub fn combined_analysis(
    ops: &[OperationRecord],
    snapshots: &[MetricSnapshot],
    settings: &DashboardSettings,
) -> Correlation {
    let benchmark = aggregation::aggregate(
        ops,
        Some(settings.correlation_width),
        &[],
        Statistics::ALL,
    );
    let metrics = aggregation::aggregate_metrics(
        snapshots,
        settings.correlation_width,
        &settings.correlation_metrics,
    );
    correlation::correlate(&benchmark, &metrics, &settings.thresholds)
}

fn source_warning<T>(
    warnings: &mut Vec<String>,
    state: &SourceState<T>,
    name: &str,
    path: &std::path::Path,
) {
    match state {
        SourceState::Available(_) => {}
        SourceState::Unavailable => {
            warnings.push(format!("{} file ({}) not found.", name, path.display()))
        }
        SourceState::Malformed(error) => {
            warnings.push(format!("{} file is malformed: {}", name, error))
        }
        SourceState::Failed(error) => {
            warnings.push(format!("{} file could not be read: {}", name, error))
        }
    }
}

/// Shared handle: settings plus the most recent load.
pub struct Dashboard {
    settings: DashboardSettings,
    current: RwLock<Arc<LoadedSources>>,
}

impl Dashboard {
    /// Loads both sources once.
    pub async fn open(settings: DashboardSettings) -> anyhow::Result<Self> {
        let sources = load_in_background(settings.clone()).await?;
        Ok(Self {
            settings,
            current: RwLock::new(Arc::new(sources)),
        })
    }

    pub fn settings(&self) -> &DashboardSettings {
        &self.settings
    }

    pub async fn current(&self) -> Arc<LoadedSources> {
        self.current.read().await.clone()
    }

    /// Re-reads both files and replaces the current load.
    pub async fn refresh(&self) -> anyhow::Result<Arc<LoadedSources>> {
        let sources = Arc::new(load_in_background(self.settings.clone()).await?);
        *self.current.write().await = sources.clone();
        info!("dashboard refreshed");
        Ok(sources)
    }

    pub async fn view(&self) -> DashboardView {
        let current = self.current().await;
        build_view(&current, &self.settings)
    }
}

async fn load_in_background(settings: DashboardSettings) -> anyhow::Result<LoadedSources> {
    tokio::task::spawn_blocking(move || load_sources(&settings))
        .await
        .map_err(|e| anyhow::anyhow!("source load task: {}", e))
}
