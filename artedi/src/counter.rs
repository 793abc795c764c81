use std::sync::Arc;

use crate::{
    BoxError, Collector, Error, MetricKind,
    labels::LabelSet,
    metric::CellOptions,
    options::MetricOptions,
    probe::{self, Probe},
    vector::{MetricVector, write_header},
};

/// A monotonic counter
#[derive(Debug)]
pub struct Counter {
    help: String,
    vector: MetricVector,
    probe: Arc<dyn Probe>,
}

impl Counter {
    /// Create a standalone `Counter` that is not attached to a registry
    pub fn new(options: MetricOptions) -> Result<Self, Error> {
        Self::with_parent(options, &LabelSet::EMPTY, probe::noop())
    }

    pub(crate) fn with_parent(
        options: MetricOptions,
        parent_labels: &LabelSet,
        probe: Arc<dyn Probe>,
    ) -> Result<Self, Error> {
        let static_labels = options.static_labels(parent_labels)?;
        Ok(Self::from_parts(
            Arc::from(options.name),
            options.help,
            static_labels,
            probe,
        ))
    }

    /// Build from already validated parts
    pub(crate) fn from_parts(
        name: Arc<str>,
        help: String,
        static_labels: LabelSet,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            help,
            vector: MetricVector::new(
                name,
                static_labels,
                CellOptions::default(),
                Arc::clone(&probe),
            ),
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

    pub fn increment(&self, labels: &LabelSet) -> Result<(), Error> {
        self.add(1.0, labels)
    }

    /// Adds `value` to the count for `labels`. Negative values are rejected
    /// and leave the count untouched.
    pub fn add(&self, value: f64, labels: &LabelSet) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::NotANumber);
        }
        if value < 0.0 {
            return Err(Error::NegativeValue { value });
        }

        self.vector.get_or_create(labels)?.add(value)?;
        self.probe.counter_add(self.name(), value, labels);
        Ok(())
    }

    /// Current count for `labels`; never creates a series.
    pub fn get_value(&self, labels: &LabelSet) -> Result<f64, Error> {
        self.vector
            .get_existing(labels)
            .map(|metric| metric.value())
            .ok_or_else(|| Error::NotFound {
                labels: labels.clone(),
            })
    }
}

impl Collector for Counter {
    fn name(&self) -> &str {
        self.vector.name()
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Counter
    }

    fn render(&self, out: &mut String) -> Result<(), BoxError> {
        write_header(out, self.vector.name(), &self.help, MetricKind::Counter);
        self.vector.render(out);
        Ok(())
    }
}
