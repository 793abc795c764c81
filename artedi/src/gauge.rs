use std::sync::Arc;

use crate::{
    BoxError, Collector, Error, MetricKind,
    labels::LabelSet,
    metric::CellOptions,
    options::GaugeOptions,
    probe::{self, Probe},
    vector::{MetricVector, write_header},
};

/// A value that can go up and down
///
/// With [`GaugeOptions::with_expiry`] every label combination falls back to
/// the configured default once it has gone the expiry period without an
/// update.
#[derive(Debug)]
pub struct Gauge {
    help: String,
    vector: MetricVector,
    probe: Arc<dyn Probe>,
}

impl Gauge {
    /// Create a standalone `Gauge` that is not attached to a registry
    pub fn new(options: GaugeOptions) -> Result<Self, Error> {
        Self::with_parent(options, &LabelSet::EMPTY, probe::noop())
    }

    pub(crate) fn with_parent(
        options: GaugeOptions,
        parent_labels: &LabelSet,
        probe: Arc<dyn Probe>,
    ) -> Result<Self, Error> {
        let static_labels = options.metric.static_labels(parent_labels)?;
        let cell_options = options.cell_options();
        Ok(Self::from_parts(
            Arc::from(options.metric.name),
            options.metric.help,
            static_labels,
            cell_options,
            probe,
        ))
    }

    pub(crate) fn from_parts(
        name: Arc<str>,
        help: String,
        static_labels: LabelSet,
        cell_options: CellOptions,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            help,
            vector: MetricVector::new(name, static_labels, cell_options, Arc::clone(&probe)),
            probe,
        }
    }

    pub fn name(&self) -> &str {
        self.vector.name()
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn static_labels(&self) -> &LabelSet {
        self.vector.static_labels()
    }

    pub(crate) fn vector(&self) -> &MetricVector {
        &self.vector
    }

    /// Adds `value`, which may be negative, to the gauge for `labels`.
    pub fn add(&self, value: f64, labels: &LabelSet) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::NotANumber);
        }
        self.vector.get_or_create(labels)?.add(value)?;
        self.probe.gauge_add(self.name(), value, labels);
        Ok(())
    }

    pub fn set(&self, value: f64, labels: &LabelSet) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::NotANumber);
        }
        self.vector.get_or_create(labels)?.set(value)?;
        self.probe.gauge_set(self.name(), value, labels);
        Ok(())
    }

    pub fn get_value(&self, labels: &LabelSet) -> Result<f64, Error> {
        self.vector
            .get_existing(labels)
            .map(|metric| metric.value())
            .ok_or_else(|| Error::NotFound {
                labels: labels.clone(),
            })
    }
}

impl Collector for Gauge {
    fn name(&self) -> &str {
        self.vector.name()
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Gauge
    }

    fn render(&self, out: &mut String) -> Result<(), BoxError> {
        write_header(out, self.vector.name(), &self.help, MetricKind::Gauge);
        self.vector.render(out);
        Ok(())
    }
}
