//! A named collection of [`Metric`] cells keyed by label set.

use std::{fmt::Write, sync::Arc};

use hashbrown::{HashMap, hash_map::Entry};
use parking_lot::{Mutex, MutexGuard};

use crate::{
    MetricKind,
    labels::{LabelError, LabelHash, LabelSet, format_number, write_pair},
    metric::{CellOptions, Metric},
    probe::Probe,
};

/// Owns every cell of one metric name.
///
/// Looking up the same labels twice, in whatever order they were supplied,
/// always yields the same [`Metric`]. The cell map is guarded by a single
/// mutex so concurrent create-or-get calls never race to create duplicates.
#[derive(Debug)]
pub struct MetricVector {
    name: Arc<str>,
    static_labels: LabelSet,
    cell_options: CellOptions,
    probe: Arc<dyn Probe>,
    state: Mutex<VectorState>,
}

#[derive(Debug, Default)]
struct VectorState {
    default: Option<Metric>,
    metrics: HashMap<LabelHash, Metric>,
    /// Bucket boundaries known to a histogram, ascending and de-duplicated.
    buckets: Vec<f64>,
}

impl MetricVector {
    pub(crate) fn new(
        name: Arc<str>,
        static_labels: LabelSet,
        cell_options: CellOptions,
        probe: Arc<dyn Probe>,
    ) -> Self {
        Self {
            name,
            static_labels,
            cell_options,
            probe,
            state: Mutex::new(VectorState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn static_labels(&self) -> &LabelSet {
        &self.static_labels
    }

    /// Locks the vector so several lookups, and any change to the bucket
    /// list, happen as one step.
    pub(crate) fn lock(&self) -> VectorGuard<'_> {
        VectorGuard {
            vector: self,
            state: self.state.lock(),
        }
    }

    /// Returns the cell for `labels`, creating it at the default value if it
    /// does not exist yet. Empty `labels` select the default cell.
    ///
    /// Labels are only validated when a new cell is created.
    pub fn get_or_create(&self, labels: &LabelSet) -> Result<Metric, LabelError> {
        self.lock().get_or_create(labels)
    }

    /// Like [`get_or_create`](Self::get_or_create) but never creates.
    pub fn get_existing(&self, labels: &LabelSet) -> Option<Metric> {
        self.lock().get_existing(labels)
    }

    /// Number of cells created so far.
    pub fn len(&self) -> usize {
        let state = self.state.lock();
        state.metrics.len() + usize::from(state.default.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends one sample line per cell, default cell first.
    pub fn render(&self, out: &mut String) {
        let cells: Vec<Metric> = {
            let state = self.state.lock();
            state
                .default
                .iter()
                .chain(state.metrics.values())
                .cloned()
                .collect()
        };

        for cell in cells {
            write_sample(out, &self.name, cell.labels(), None, cell.value());
        }
    }
}

/// Exclusive access to a [`MetricVector`]'s cells and bucket list.
#[derive(Debug)]
pub(crate) struct VectorGuard<'a> {
    vector: &'a MetricVector,
    state: MutexGuard<'a, VectorState>,
}

impl VectorGuard<'_> {
    pub(crate) fn get_or_create(&mut self, labels: &LabelSet) -> Result<Metric, LabelError> {
        let vector = self.vector;
        match vector.resolve(labels) {
            Lookup::Default => Ok(self
                .state
                .default
                .get_or_insert_with(|| vector.create(vector.static_labels.clone()))
                .clone()),
            Lookup::Labelled(hash, merged) => match self.state.metrics.entry(hash) {
                Entry::Occupied(entry) => Ok(entry.get().clone()),
                Entry::Vacant(entry) => {
                    merged.validate()?;
                    Ok(entry.insert(vector.create(merged)).clone())
                }
            },
        }
    }

    pub(crate) fn get_existing(&self, labels: &LabelSet) -> Option<Metric> {
        match self.vector.resolve(labels) {
            Lookup::Default => self.state.default.clone(),
            Lookup::Labelled(hash, _) => self.state.metrics.get(&hash).cloned(),
        }
    }

    pub(crate) fn buckets(&self) -> &[f64] {
        &self.state.buckets
    }

    /// Merges `new` into the sorted, de-duplicated bucket list.
    pub(crate) fn add_buckets(&mut self, new: &[f64]) {
        let buckets = &mut self.state.buckets;
        for &boundary in new {
            if !buckets.contains(&boundary) {
                buckets.push(boundary);
            }
        }
        buckets.sort_by(f64::total_cmp);
    }
}

enum Lookup {
    Default,
    Labelled(LabelHash, LabelSet),
}

impl MetricVector {
    fn resolve(&self, labels: &LabelSet) -> Lookup {
        if labels.is_empty() {
            return Lookup::Default;
        }

        let merged = self.static_labels.merge(&labels.trim());
        // Restating only the static labels addresses the default cell.
        if merged == self.static_labels {
            return Lookup::Default;
        }
        Lookup::Labelled(merged.canonical_hash(), merged)
    }

    fn create(&self, labels: LabelSet) -> Metric {
        self.probe.create_metric(&self.name, &labels);
        Metric::new(labels, self.cell_options, Arc::clone(&self.probe))
    }
}

/// Writes `name{labels[,extra]} value\n`.
///
/// Braces are always emitted, even for an empty label set.
pub(crate) fn write_sample(
    out: &mut String,
    name: &str,
    labels: &LabelSet,
    extra: Option<(&str, &str)>,
    value: f64,
) {
    out.push_str(name);
    out.push('{');
    labels.write_pairs(out);
    if let Some((key, extra_value)) = extra {
        if !labels.is_empty() {
            out.push(',');
        }
        write_pair(out, key, extra_value);
    }
    let _ = writeln!(out, "}} {}", format_number(value));
}

/// Writes the `# HELP` and `# TYPE` header of a metric family.
pub(crate) fn write_header(out: &mut String, name: &str, help: &str, kind: MetricKind) {
    let help = help.replace('\\', "\\\\").replace('\n', "\\n");
    let _ = writeln!(out, "# HELP {name} {help}");
    let _ = writeln!(out, "# TYPE {name} {kind}");
}
