// Cross-series correlation between benchmark aggregates and system-metric buckets.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::{
    Advisory, AggregateRow, ColumnInsight, Correlation, CorrelationResult, JoinedRow,
    MetricBucket, Threshold,
};

/// Joined column holding the benchmark's mean latency.
pub const LATENCY_COLUMN: &str = "duration_ms";
/// Joined column holding the benchmark's success rate (percent).
pub const SUCCESS_COLUMN: &str = "success_rate";

/// Inner-joins the two series on exact bucket start, then correlates every column pair.
///
/// Benchmark rows without a bucket are ignored. Buckets present on one side only are
/// dropped. No shared bucket gives `Correlation::NoOverlap`.
pub fn correlate(
    benchmark: &[AggregateRow],
    metrics: &[MetricBucket],
    thresholds: &[Threshold],
) -> Correlation {
    let rows = join(benchmark, metrics);
    if rows.is_empty() {
        return Correlation::NoOverlap;
    }

    let columns = columns_of(&rows);
    let series: Vec<Vec<Option<f64>>> = columns
        .iter()
        .map(|c| rows.iter().map(|r| r.values.get(c).copied()).collect())
        .collect();

    let n = columns.len();
    let mut matrix = vec![vec![None; n]; n];
    for i in 0..n {
        matrix[i][i] = Some(1.0);
        for j in (i + 1)..n {
            let (xs, ys): (Vec<f64>, Vec<f64>) = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            let r = pearson(&xs, &ys);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }

    let insights = columns
        .iter()
        .zip(&series)
        .filter_map(|(column, values)| insight(column, values))
        .collect();
    let advisories = advisories(&rows, thresholds);

    Correlation::Matrix(CorrelationResult {
        columns,
        matrix,
        rows,
        insights,
        advisories,
    })
}

fn join(benchmark: &[AggregateRow], metrics: &[MetricBucket]) -> Vec<JoinedRow> {
    let by_bucket: HashMap<NaiveDateTime, &MetricBucket> =
        metrics.iter().map(|m| (m.bucket, m)).collect();

    benchmark
        .iter()
        .filter_map(|row| {
            let bucket = row.bucket?;
            let metric = by_bucket.get(&bucket)?;
            let mut values = metric.values.clone();
            if let Some(d) = row.mean_duration_ms {
                values.insert(LATENCY_COLUMN.to_string(), d);
            }
            if let Some(s) = row.success_rate {
                values.insert(SUCCESS_COLUMN.to_string(), s);
            }
            Some(JoinedRow { bucket, values })
        })
        .collect()
}

/// Benchmark columns first, then metric columns in key order.
fn columns_of(rows: &[JoinedRow]) -> Vec<String> {
    let present = |c: &str| rows.iter().any(|r| r.values.contains_key(c));
    let mut columns: Vec<String> = [LATENCY_COLUMN, SUCCESS_COLUMN]
        .into_iter()
        .filter(|c| present(*c))
        .map(String::from)
        .collect();
    for row in rows {
        for key in row.values.keys() {
            if key != LATENCY_COLUMN && key != SUCCESS_COLUMN && !columns.contains(key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

/// Pearson correlation coefficient. `None` with fewer than two pairs or a constant series.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let (xs, ys) = (&xs[..n], &ys[..n]);
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

fn insight(column: &str, values: &[Option<f64>]) -> Option<ColumnInsight> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.is_empty() {
        return None;
    }
    Some(ColumnInsight {
        column: column.to_string(),
        mean: present.iter().sum::<f64>() / present.len() as f64,
        peak: present.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    })
}

/// One advisory per violated threshold (not per violating bucket).
fn advisories(rows: &[JoinedRow], thresholds: &[Threshold]) -> Vec<Advisory> {
    thresholds
        .iter()
        .filter_map(|t| {
            let periods = rows
                .iter()
                .filter(|r| r.values.get(&t.metric).is_some_and(|v| *v > t.threshold))
                .count();
            if periods == 0 {
                return None;
            }
            let mut message = format!(
                "{} exceeded {}{} for {} time periods.",
                t.display_label(),
                t.threshold,
                t.unit,
                periods
            );
            if let Some(hint) = &t.hint {
                message.push(' ');
                message.push_str(hint);
            }
            Some(Advisory {
                metric: t.metric.clone(),
                threshold: t.threshold,
                periods,
                message,
            })
        })
        .collect()
}
