//! Construction options for the registry and its collectors.
//!
//! Every options type can be deserialized so hosts can keep metric
//! definitions in their own configuration files:
//!
//! ```
//! # use artedi::GaugeOptions;
//! let options: GaugeOptions = serde_json::from_str(r#"{
//!     "name": "pool_connections",
//!     "help": "open connections",
//!     "labels": {"pool": "primary"},
//!     "expires": true,
//!     "expiry_period": "30s"
//! }"#).unwrap();
//! assert_eq!(options.expiry_period, std::time::Duration::from_secs(30));
//! ```

use std::time::Duration;

use serde::Deserialize;

use crate::{
    Error,
    histogram::Buckets,
    labels::{LabelSet, is_valid_name},
    metric::CellOptions,
};

/// Default idle time after which an expiring gauge falls back to its
/// default value.
pub const DEFAULT_EXPIRY_PERIOD: Duration = Duration::from_secs(300);

/// Options for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CollectorOptions {
    /// Labels applied to every collector created by the registry.
    #[serde(default)]
    pub labels: LabelSet,
}

impl CollectorOptions {
    pub fn new(labels: LabelSet) -> Self {
        Self { labels }
    }

    pub(crate) fn static_labels(&self) -> Result<LabelSet, Error> {
        let labels = self.labels.trim();
        labels.validate()?;
        Ok(labels)
    }
}

/// Name, help text and static labels of a counter, gauge or histogram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricOptions {
    pub name: String,
    pub help: String,
    #[serde(default)]
    pub labels: LabelSet,
}

impl MetricOptions {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            labels: LabelSet::new(),
        }
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.labels = labels;
        self
    }

    /// Validates the name and returns this metric's labels merged over the
    /// labels inherited from `parent`.
    pub(crate) fn static_labels(&self, parent: &LabelSet) -> Result<LabelSet, Error> {
        if !is_valid_name(&self.name) {
            return Err(Error::InvalidName {
                name: self.name.clone(),
            });
        }
        let labels = parent.merge(&self.labels.trim());
        labels.validate()?;
        Ok(labels)
    }
}

/// Options for a [`Gauge`](crate::Gauge).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GaugeOptions {
    #[serde(flatten)]
    pub metric: MetricOptions,

    /// Reset each label combination to `default_value` once it has gone
    /// `expiry_period` without an update.
    #[serde(default)]
    pub expires: bool,

    #[serde(default = "default_expiry_period", with = "humantime_serde")]
    pub expiry_period: Duration,

    #[serde(default)]
    pub default_value: f64,
}

fn default_expiry_period() -> Duration {
    DEFAULT_EXPIRY_PERIOD
}

impl GaugeOptions {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::from(MetricOptions::new(name, help))
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.metric.labels = labels;
        self
    }

    /// Enables expiry after `period` without an update.
    pub fn with_expiry(mut self, period: Duration) -> Self {
        self.expires = true;
        self.expiry_period = period;
        self
    }

    pub fn with_default_value(mut self, default_value: f64) -> Self {
        self.default_value = default_value;
        self
    }

    pub(crate) fn cell_options(&self) -> CellOptions {
        CellOptions {
            default_value: self.default_value,
            expiry_period: self.expires.then_some(self.expiry_period),
        }
    }
}

impl From<MetricOptions> for GaugeOptions {
    fn from(metric: MetricOptions) -> Self {
        Self {
            metric,
            expires: false,
            expiry_period: DEFAULT_EXPIRY_PERIOD,
            default_value: 0.0,
        }
    }
}

/// Options for a [`Histogram`](crate::Histogram).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistogramOptions {
    #[serde(flatten)]
    pub metric: MetricOptions,

    #[serde(default)]
    pub buckets: Buckets,
}

impl HistogramOptions {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::from(MetricOptions::new(name, help))
    }

    pub fn with_labels(mut self, labels: LabelSet) -> Self {
        self.metric.labels = labels;
        self
    }

    /// Uses the given bucket boundaries. They are validated when the
    /// histogram is created.
    pub fn with_buckets(mut self, buckets: impl IntoIterator<Item = f64>) -> Self {
        self.buckets = Buckets::Fixed(buckets.into_iter().collect());
        self
    }

    /// Grows buckets on demand using the legacy log-linear scheme.
    pub fn with_dynamic_buckets(mut self) -> Self {
        self.buckets = Buckets::DynamicLogLinear;
        self
    }
}

impl From<MetricOptions> for HistogramOptions {
    fn from(metric: MetricOptions) -> Self {
        Self {
            metric,
            buckets: Buckets::default(),
        }
    }
}
