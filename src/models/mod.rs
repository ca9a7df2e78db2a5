// Domain models: loaded records, aggregates, correlation output.

mod aggregate;
mod correlation;
mod metric;
mod operation;

pub use aggregate::{
    AggregateRow, BucketWidth, DimensionValue, RunSummary, Statistics, series_label,
};
pub use correlation::{
    Advisory, ColumnInsight, Correlation, CorrelationResult, JoinedRow, Threshold,
};
pub use metric::{ContainerLabel, MetricBucket, MetricPoint, MetricSeries, MetricSnapshot};
pub use operation::{Dimension, OperationRecord, parse_dimensions};
