//! Introspection hooks fired on every mutation.
//!
//! A [`Registry`](crate::Registry) hands its probe to every collector it
//! creates. The default, [`NoopProbe`], does nothing; [`TracingProbe`] turns
//! each hook into a `tracing` event at `TRACE` level.

use std::{fmt::Debug, sync::Arc};

use tracing::trace;

use crate::labels::LabelSet;

/// Observer of collector and metric operations.
///
/// Every method has an empty default body so implementors only override the
/// hooks they care about.
pub trait Probe: Debug + Send + Sync {
    fn counter_add(&self, _name: &str, _value: f64, _labels: &LabelSet) {}

    fn gauge_add(&self, _name: &str, _value: f64, _labels: &LabelSet) {}

    fn gauge_set(&self, _name: &str, _value: f64, _labels: &LabelSet) {}

    fn histogram_observe(&self, _name: &str, _value: f64, _labels: &LabelSet) {}

    /// A metric vector created a new cell.
    fn create_metric(&self, _name: &str, _labels: &LabelSet) {}

    fn metric_add(&self, _value: f64, _labels: &LabelSet) {}

    fn metric_set(&self, _value: f64, _labels: &LabelSet) {}

    /// An expiring cell fell back to its default value.
    fn metric_reset(&self, _value: f64, _labels: &LabelSet) {}
}

/// A [`Probe`] that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProbe;

impl Probe for NoopProbe {}

/// A [`Probe`] that emits a `TRACE` level event per hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProbe;

impl Probe for TracingProbe {
    fn counter_add(&self, name: &str, value: f64, labels: &LabelSet) {
        trace!(probe = "counter-add", name, value, %labels);
    }

    fn gauge_add(&self, name: &str, value: f64, labels: &LabelSet) {
        trace!(probe = "gauge-add", name, value, %labels);
    }

    fn gauge_set(&self, name: &str, value: f64, labels: &LabelSet) {
        trace!(probe = "gauge-set", name, value, %labels);
    }

    fn histogram_observe(&self, name: &str, value: f64, labels: &LabelSet) {
        trace!(probe = "histogram-observe", name, value, %labels);
    }

    fn create_metric(&self, name: &str, labels: &LabelSet) {
        trace!(probe = "create-metric", name, %labels);
    }

    fn metric_add(&self, value: f64, labels: &LabelSet) {
        trace!(probe = "metric-add", value, %labels);
    }

    fn metric_set(&self, value: f64, labels: &LabelSet) {
        trace!(probe = "metric-set", value, %labels);
    }

    fn metric_reset(&self, value: f64, labels: &LabelSet) {
        trace!(probe = "metric-reset", value, %labels);
    }
}

pub(crate) fn noop() -> Arc<dyn Probe> {
    Arc::new(NoopProbe)
}
