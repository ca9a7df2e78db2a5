use serde::Deserialize;

use crate::models::Threshold;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub sources: SourcesConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
    /// Advisory thresholds for the combined analysis; defaults to CPU/memory/latency.
    #[serde(default = "Threshold::defaults")]
    pub thresholds: Vec<Threshold>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// Benchmark operation records (JSON array).
    pub operations_path: String,
    /// System-metric snapshots (JSON array).
    pub metrics_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_throughput_interval_secs")]
    pub throughput_interval_secs: u32,
    #[serde(default = "default_correlation_interval_secs")]
    pub correlation_interval_secs: u32,
    /// Metric keys joined against benchmark latency in the combined analysis.
    #[serde(default = "default_correlation_metrics")]
    pub correlation_metrics: Vec<String>,
    /// Trailing window applied to metric series when a request does not pick one.
    #[serde(default)]
    pub default_range_minutes: Option<u32>,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            throughput_interval_secs: default_throughput_interval_secs(),
            correlation_interval_secs: default_correlation_interval_secs(),
            correlation_metrics: default_correlation_metrics(),
            default_range_minutes: None,
        }
    }
}

fn default_throughput_interval_secs() -> u32 {
    1
}

fn default_correlation_interval_secs() -> u32 {
    5
}

fn default_correlation_metrics() -> Vec<String> {
    vec!["cpu.usage_percent".into(), "memory.usage_percent".into()]
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.sources.operations_path.is_empty(),
            "sources.operations_path must be non-empty"
        );
        anyhow::ensure!(
            !self.sources.metrics_path.is_empty(),
            "sources.metrics_path must be non-empty"
        );
        anyhow::ensure!(
            self.aggregation.throughput_interval_secs > 0,
            "aggregation.throughput_interval_secs must be > 0, got {}",
            self.aggregation.throughput_interval_secs
        );
        anyhow::ensure!(
            self.aggregation.correlation_interval_secs > 0,
            "aggregation.correlation_interval_secs must be > 0, got {}",
            self.aggregation.correlation_interval_secs
        );
        anyhow::ensure!(
            self.aggregation
                .correlation_metrics
                .iter()
                .all(|m| !m.is_empty()),
            "aggregation.correlation_metrics must not contain empty keys"
        );
        if let Some(minutes) = self.aggregation.default_range_minutes {
            anyhow::ensure!(
                minutes > 0,
                "aggregation.default_range_minutes must be > 0, got {}",
                minutes
            );
        }
        for t in &self.thresholds {
            anyhow::ensure!(!t.metric.is_empty(), "thresholds.metric must be non-empty");
            anyhow::ensure!(
                t.threshold.is_finite(),
                "thresholds.threshold for {} must be finite, got {}",
                t.metric,
                t.threshold
            );
        }
        Ok(())
    }
}
