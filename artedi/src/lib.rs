//! In-process metrics serialized to the Prometheus text exposition format.
//!
//! A [`Registry`] owns named [`Counter`]s, [`Gauge`]s and [`Histogram`]s.
//! Each of them keeps one value per distinct [`LabelSet`], and
//! [`Registry::collect`] renders all of them as a single text document:
//!
//! ```
//! use artedi::{CollectorOptions, FMT_PROM, HistogramOptions, MetricOptions, Registry, labels};
//!
//! let registry = Registry::new(CollectorOptions::new(labels! { "service" => "muskie" })).unwrap();
//!
//! let requests = registry
//!     .counter(MetricOptions::new("http_requests_completed", "count of requests completed"))
//!     .unwrap();
//! requests
//!     .increment(&labels! { "method" => "getobject", "code" => 200 })
//!     .unwrap();
//!
//! let latency = registry
//!     .histogram(
//!         HistogramOptions::new("http_request_latency_ms", "latency of requests")
//!             .with_buckets([10.0, 100.0, 1000.0]),
//!     )
//!     .unwrap();
//! latency.observe(42.0, &labels! { "method" => "getobject" }).unwrap();
//!
//! let text = futures::executor::block_on(registry.collect(FMT_PROM)).unwrap();
//! assert!(text.contains(
//!     r#"http_requests_completed{code="200",method="getobject",service="muskie"} 1"#
//! ));
//! assert!(text.contains(
//!     r#"http_request_latency_ms_bucket{method="getobject",service="muskie",le="100"} 1"#
//! ));
//! ```

use std::fmt::Display;

pub mod buckets;
pub mod counter;
pub mod error;
pub mod gauge;
pub mod histogram;
pub mod labels;
pub mod metric;
pub mod options;
pub mod probe;
pub mod registry;
pub mod vector;

pub use buckets::{
    POSSIBLE_ARTEDI1_BUCKETS, artedi1_buckets, exponential_buckets, linear_buckets,
    log_linear_buckets, validate_buckets,
};
pub use counter::Counter;
pub use error::{BoxError, BucketError, CollectError, CollectFailure, Error};
pub use gauge::Gauge;
pub use histogram::{Buckets, DEFAULT_BUCKETS, Histogram};
pub use labels::{LabelError, LabelSet, LabelValue};
pub use metric::Metric;
pub use options::{
    CollectorOptions, DEFAULT_EXPIRY_PERIOD, GaugeOptions, HistogramOptions, MetricOptions,
};
pub use probe::{NoopProbe, Probe, TracingProbe};
pub use registry::{Collector, CollectorRef, FMT_PROM, FMT_PROM_0_0_4, Registry};
pub use vector::MetricVector;

/// The type of a collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// The name used on the `# TYPE` line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Counter => "counter",
            Self::Gauge => "gauge",
            Self::Histogram => "histogram",
        }
    }
}

impl Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
