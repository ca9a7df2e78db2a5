// Time-bucketed aggregation: pure functions over loaded records.
// Groups are only created for observed records (no dense fill); output follows discovery order.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{NaiveDateTime, TimeDelta};

use crate::models::{
    AggregateRow, BucketWidth, ContainerLabel, Dimension, DimensionValue, MetricBucket,
    MetricPoint, MetricSeries, MetricSnapshot, OperationRecord, RunSummary, Statistics,
    series_label,
};

const CONTAINER_NAME_KEY: &str = "docker.container_name";
const CONTAINER_ID_KEY: &str = "docker.container_id";
const SHORT_ID_LEN: usize = 12;

#[derive(Debug, Default)]
struct Accumulator {
    count: u64,
    duration_sum: f64,
    successes: u64,
}

impl Accumulator {
    fn add(&mut self, record: &OperationRecord) {
        self.count += 1;
        self.duration_sum += record.duration_ms;
        if record.success {
            self.successes += 1;
        }
    }

    fn mean_duration(&self) -> f64 {
        self.duration_sum / self.count as f64
    }

    fn success_rate(&self) -> f64 {
        self.successes as f64 / self.count as f64 * 100.0
    }
}

type GroupKey<'a> = (Option<NaiveDateTime>, Vec<&'a str>);

/// Aggregates records into one row per observed (bucket, dimension values).
///
/// `width = None` groups by dimensions only. Records lacking a value for one of
/// `dimensions` (a missing worker id) are left out of this grouping.
pub fn aggregate(
    records: &[OperationRecord],
    width: Option<BucketWidth>,
    dimensions: &[Dimension],
    statistics: Statistics,
) -> Vec<AggregateRow> {
    let mut index: HashMap<GroupKey<'_>, usize> = HashMap::new();
    let mut groups: Vec<(GroupKey<'_>, Accumulator)> = Vec::new();

    'records: for record in records {
        let bucket = width.map(|w| w.floor(record.timestamp));
        let mut values = Vec::with_capacity(dimensions.len());
        for dimension in dimensions {
            match dimension.value_of(record) {
                Some(v) => values.push(v),
                None => continue 'records,
            }
        }
        let key = (bucket, values);
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, Accumulator::default()));
                groups.len() - 1
            }
        };
        groups[slot].1.add(record);
    }

    groups
        .into_iter()
        .map(|((bucket, values), acc)| {
            let dimensions: Vec<DimensionValue> = dimensions
                .iter()
                .zip(values)
                .map(|(dimension, value)| DimensionValue {
                    dimension: *dimension,
                    value: value.to_string(),
                })
                .collect();
            AggregateRow {
                bucket,
                label: series_label(&dimensions),
                dimensions,
                count: acc.count,
                mean_duration_ms: statistics.mean_duration.then(|| acc.mean_duration()),
                success_rate: statistics.success_rate.then(|| acc.success_rate()),
            }
        })
        .collect()
}

/// Totals for the whole run. Empty input yields zeros and no time range.
pub fn summarize(records: &[OperationRecord]) -> RunSummary {
    let mut acc = Accumulator::default();
    for record in records {
        acc.add(record);
    }
    let first = records.iter().map(|r| r.timestamp).min();
    let last = records.iter().map(|r| r.timestamp).max();
    let duration_secs = match (first, last) {
        (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    };
    RunSummary {
        total_operations: acc.count,
        success_rate: if acc.count == 0 {
            0.0
        } else {
            acc.success_rate()
        },
        mean_duration_ms: if acc.count == 0 {
            0.0
        } else {
            acc.mean_duration()
        },
        duration_secs,
        first,
        last,
    }
}

/// Mean of each requested metric per bucket, over the snapshots that carry it.
/// Buckets where none of the columns appear are omitted.
pub fn aggregate_metrics(
    snapshots: &[MetricSnapshot],
    width: BucketWidth,
    columns: &[String],
) -> Vec<MetricBucket> {
    let mut index: HashMap<NaiveDateTime, usize> = HashMap::new();
    let mut buckets: Vec<(NaiveDateTime, BTreeMap<&str, (f64, u32)>)> = Vec::new();

    for snapshot in snapshots {
        let present: Vec<(&str, f64)> = columns
            .iter()
            .filter_map(|c| snapshot.metric(c).map(|v| (c.as_str(), v)))
            .collect();
        if present.is_empty() {
            continue;
        }
        let bucket = width.floor(snapshot.timestamp);
        let slot = *index.entry(bucket).or_insert_with(|| {
            buckets.push((bucket, BTreeMap::new()));
            buckets.len() - 1
        });
        for (column, value) in present {
            let sum = buckets[slot].1.entry(column).or_insert((0.0, 0));
            sum.0 += value;
            sum.1 += 1;
        }
    }

    buckets
        .into_iter()
        .map(|(bucket, sums)| MetricBucket {
            bucket,
            values: sums
                .into_iter()
                .map(|(column, (sum, n))| (column.to_string(), sum / f64::from(n)))
                .collect(),
        })
        .collect()
}

/// Snapshots within `range` of the most recent one ("last N minutes"); all when `range` is None.
pub fn within_range(snapshots: &[MetricSnapshot], range: Option<TimeDelta>) -> Vec<&MetricSnapshot> {
    let cutoff = match (range, snapshots.iter().map(|s| s.timestamp).max()) {
        (Some(range), Some(latest)) => Some(latest - range),
        _ => None,
    };
    snapshots
        .iter()
        .filter(|s| cutoff.is_none_or(|c| s.timestamp >= c))
        .collect()
}

/// Raw points for one metric key, optionally limited to the trailing `range`.
pub fn metric_series(
    snapshots: &[MetricSnapshot],
    key: &str,
    range: Option<TimeDelta>,
) -> MetricSeries {
    let points: Vec<MetricPoint> = within_range(snapshots, range)
        .into_iter()
        .filter_map(|s| {
            s.metric(key).map(|value| MetricPoint {
                timestamp: s.timestamp,
                value,
            })
        })
        .collect();
    MetricSeries {
        key: key.to_string(),
        latest: points.last().map(|p| p.value),
        points,
    }
}

/// Every metric key seen in any snapshot, sorted.
pub fn metric_keys(snapshots: &[MetricSnapshot]) -> Vec<String> {
    snapshots
        .iter()
        .flat_map(|s| s.metrics.keys())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}

/// Name and short id of the monitored container, from the first snapshot naming one.
pub fn container_label(snapshots: &[MetricSnapshot]) -> Option<ContainerLabel> {
    let snapshot = snapshots.iter().find(|s| s.label(CONTAINER_NAME_KEY).is_some())?;
    let name = snapshot.label(CONTAINER_NAME_KEY)?.to_string();
    let id = snapshot
        .label(CONTAINER_ID_KEY)
        .map(|id| id.chars().take(SHORT_ID_LEN).collect())
        .unwrap_or_else(|| "unknown".to_string());
    Some(ContainerLabel { name, id })
}
