//! Bucketed distributions of non-negative observations.
//!
//! A [`Histogram`] keeps one [`Counter`] per distinct label combination. Each
//! of those counters is itself keyed by the reserved `le` label, one cell per
//! bucket boundary plus `+Inf`, so a bucket's value is the number of
//! observations less than or equal to its boundary. A companion [`Gauge`]
//! tracks the running sum per combination.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::Deserialize;

use crate::{
    BoxError, Collector, Error, MetricKind,
    buckets::{LINEAR_STEPS, log_linear_order, validate_buckets},
    counter::Counter,
    gauge::Gauge,
    labels::{BUCKET_LABEL, LabelError, LabelHash, LabelSet, LabelValue, format_number},
    metric::CellOptions,
    options::HistogramOptions,
    probe::{self, Probe},
    vector::{VectorGuard, write_header, write_sample},
};

/// Boundaries used when no buckets are configured.
pub const DEFAULT_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// How a histogram chooses its bucket boundaries.
///
/// Deserializes from either a list of boundaries or the string
/// `"dynamic_log_linear"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "BucketsRepr")]
pub enum Buckets {
    /// A strictly increasing list of positive boundaries, fixed for the
    /// lifetime of the histogram.
    Fixed(Vec<f64>),

    /// Boundaries are generated per order of magnitude as observations
    /// arrive. Counts already recorded below a newly added order are carried
    /// into it so buckets stay cumulative.
    DynamicLogLinear,
}

impl Default for Buckets {
    fn default() -> Self {
        Self::Fixed(DEFAULT_BUCKETS.to_vec())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BucketsRepr {
    Fixed(Vec<f64>),
    Named(BucketsMode),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum BucketsMode {
    DynamicLogLinear,
}

impl From<BucketsRepr> for Buckets {
    fn from(repr: BucketsRepr) -> Self {
        match repr {
            BucketsRepr::Fixed(buckets) => Self::Fixed(buckets),
            BucketsRepr::Named(BucketsMode::DynamicLogLinear) => Self::DynamicLogLinear,
        }
    }
}

#[derive(Debug)]
pub struct Histogram {
    name: Arc<str>,
    help: String,
    static_labels: LabelSet,
    buckets: Buckets,
    /// Per label combination, in order of first observation.
    counters: Mutex<IndexMap<LabelHash, Arc<Counter>>>,
    sum: Gauge,
    probe: Arc<dyn Probe>,
}

impl Histogram {
    /// Create a standalone `Histogram` that is not attached to a registry
    pub fn new(options: HistogramOptions) -> Result<Self, Error> {
        Self::with_parent(options, &LabelSet::EMPTY, probe::noop())
    }

    pub(crate) fn with_parent(
        options: HistogramOptions,
        parent_labels: &LabelSet,
        probe: Arc<dyn Probe>,
    ) -> Result<Self, Error> {
        let static_labels = options.metric.static_labels(parent_labels)?;
        reject_bucket_label(&static_labels)?;
        if let Buckets::Fixed(buckets) = &options.buckets {
            validate_buckets(buckets)?;
        }

        let name: Arc<str> = Arc::from(options.metric.name);
        let sum = Gauge::from_parts(
            Arc::from(format!("{name}_sum")),
            String::new(),
            static_labels.clone(),
            CellOptions::default(),
            Arc::clone(&probe),
        );

        Ok(Self {
            name,
            help: options.metric.help,
            static_labels,
            buckets: options.buckets,
            counters: Default::default(),
            sum,
            probe,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn static_labels(&self) -> &LabelSet {
        &self.static_labels
    }

    pub fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Records one observation of `value` for `labels`.
    ///
    /// Fails without recording anything if `value` is negative or NaN, or if
    /// `labels` use the reserved `le` key.
    pub fn observe(&self, value: f64, labels: &LabelSet) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::NotANumber);
        }
        if value < 0.0 {
            return Err(Error::NegativeObservation { value });
        }
        let labels = labels.trim();
        reject_bucket_label(&labels)?;

        let counter = self.counter_for(&labels)?;
        {
            let mut guard = counter.vector().lock();
            if matches!(self.buckets, Buckets::DynamicLogLinear) {
                grow_buckets(&mut guard, value)?;
            }
            increment_buckets(&mut guard, value)?;
        }
        self.sum.add(value, &labels)?;

        self.probe.histogram_observe(&self.name, value, &labels);
        Ok(())
    }

    /// Cumulative count of observations `<= le` for `labels`. Pass
    /// `f64::INFINITY` for the `+Inf` bucket.
    pub fn bucket_value(&self, labels: &LabelSet, le: f64) -> Result<f64, Error> {
        let counter = self.existing_counter(labels)?;
        counter
            .vector()
            .get_existing(&bucket_labels(le))
            .map(|metric| metric.value())
            .ok_or_else(|| Error::NotFound {
                labels: labels.clone().with(BUCKET_LABEL, bucket_label_value(le)),
            })
    }

    /// Number of observations recorded for `labels`.
    pub fn count(&self, labels: &LabelSet) -> Result<f64, Error> {
        self.bucket_value(labels, f64::INFINITY)
    }

    /// Sum of the observations recorded for `labels`.
    pub fn sum(&self, labels: &LabelSet) -> Result<f64, Error> {
        self.sum.get_value(labels)
    }

    fn combination(&self, labels: &LabelSet) -> (LabelSet, LabelHash) {
        let merged = self.static_labels.merge(labels);
        let hash = merged.canonical_hash();
        (merged, hash)
    }

    fn counter_for(&self, labels: &LabelSet) -> Result<Arc<Counter>, Error> {
        let (merged, hash) = self.combination(labels);

        let mut counters = self.counters.lock();
        if let Some(counter) = counters.get(&hash) {
            return Ok(Arc::clone(counter));
        }

        merged.validate()?;
        let counter = Arc::new(Counter::from_parts(
            Arc::clone(&self.name),
            self.help.clone(),
            merged,
            Arc::clone(&self.probe),
        ));
        if let Buckets::Fixed(buckets) = &self.buckets {
            counter.vector().lock().add_buckets(buckets);
        }
        counters.insert(hash, Arc::clone(&counter));
        Ok(counter)
    }

    fn existing_counter(&self, labels: &LabelSet) -> Result<Arc<Counter>, Error> {
        let (_, hash) = self.combination(&labels.trim());
        self.counters
            .lock()
            .get(&hash)
            .cloned()
            .ok_or_else(|| Error::NotFound {
                labels: labels.clone(),
            })
    }
}

impl Collector for Histogram {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> MetricKind {
        MetricKind::Histogram
    }

    fn render(&self, out: &mut String) -> Result<(), BoxError> {
        write_header(out, &self.name, &self.help, MetricKind::Histogram);

        let counters: Vec<Arc<Counter>> = self.counters.lock().values().cloned().collect();
        let bucket_name = format!("{}_bucket", self.name);
        let count_name = format!("{}_count", self.name);

        for counter in counters {
            let labels = counter.static_labels();
            let count = {
                let guard = counter.vector().lock();
                for &le in guard.buckets() {
                    if let Some(cell) = guard.get_existing(&bucket_labels(le)) {
                        let le = format_number(le);
                        write_sample(
                            out,
                            &bucket_name,
                            labels,
                            Some((BUCKET_LABEL, le.as_str())),
                            cell.value(),
                        );
                    }
                }
                guard
                    .get_existing(&bucket_labels(f64::INFINITY))
                    .map_or(0.0, |cell| cell.value())
            };

            write_sample(out, &bucket_name, labels, Some((BUCKET_LABEL, "+Inf")), count);
            write_sample(out, &count_name, labels, None, count);

            let sum = self
                .sum
                .vector()
                .get_existing(labels)
                .map_or(0.0, |cell| cell.value());
            write_sample(out, self.sum.name(), labels, None, sum);
        }
        Ok(())
    }
}

fn reject_bucket_label(labels: &LabelSet) -> Result<(), LabelError> {
    if labels.contains_key(BUCKET_LABEL) {
        return Err(LabelError::ReservedKey {
            key: BUCKET_LABEL.to_string(),
        });
    }
    Ok(())
}

fn bucket_label_value(le: f64) -> LabelValue {
    if le == f64::INFINITY {
        LabelValue::String("+Inf".to_string())
    } else {
        LabelValue::Number(le)
    }
}

fn bucket_labels(le: f64) -> LabelSet {
    LabelSet::new().with(BUCKET_LABEL, bucket_label_value(le))
}

/// Adds the order of magnitude covering `value` to the known boundaries if
/// it is not known yet.
///
/// The largest known boundary below the new ones already counts every
/// earlier observation that the new boundaries must also include, so its
/// count is carried into each of them once.
fn grow_buckets(guard: &mut VectorGuard<'_>, value: f64) -> Result<(), Error> {
    let Some(order) = log_linear_order(value, LINEAR_STEPS) else {
        return Ok(());
    };
    let known = guard.buckets().to_vec();
    let target = order.iter().copied().find(|&le| value <= le);
    if target.is_none_or(|target| known.contains(&target)) {
        return Ok(());
    }

    let new: Vec<f64> = order
        .iter()
        .copied()
        .filter(|le| !known.contains(le))
        .collect();

    let carried = new
        .first()
        .and_then(|&smallest| known.iter().rev().copied().find(|&le| le < smallest))
        .map(|below| {
            guard
                .get_existing(&bucket_labels(below))
                .map_or(0.0, |cell| cell.value())
        })
        .unwrap_or(0.0);

    if carried > 0.0 {
        for &le in &new {
            guard.get_or_create(&bucket_labels(le))?.add(carried)?;
        }
    }

    guard.add_buckets(&order);
    Ok(())
}

/// Counts `value` in every known bucket it fits and in `+Inf`. Buckets it
/// does not fit are still created so they render at zero.
fn increment_buckets(guard: &mut VectorGuard<'_>, value: f64) -> Result<(), Error> {
    let known = guard.buckets().to_vec();
    for le in known {
        let cell = guard.get_or_create(&bucket_labels(le))?;
        if value <= le {
            cell.add(1.0)?;
        }
    }
    guard
        .get_or_create(&bucket_labels(f64::INFINITY))?
        .add(1.0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{error::BucketError, labels, options::MetricOptions};

    fn fixed(buckets: &[f64]) -> Histogram {
        Histogram::new(
            HistogramOptions::new("http_request_latency", "latency of requests")
                .with_buckets(buckets.iter().copied()),
        )
        .unwrap()
    }

    fn dynamic() -> Histogram {
        Histogram::new(
            HistogramOptions::new("http_request_latency", "latency of requests")
                .with_dynamic_buckets(),
        )
        .unwrap()
    }

    fn bucket_values(histogram: &Histogram, labels: &LabelSet, les: &[f64]) -> Vec<f64> {
        les.iter()
            .map(|&le| histogram.bucket_value(labels, le).unwrap())
            .collect()
    }

    fn rendered(histogram: &Histogram) -> String {
        let mut out = String::new();
        histogram.render(&mut out).unwrap();
        out
    }

    #[test]
    fn test_histogram() {
        let histogram = fixed(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let all = [1.0, 2.0, 3.0, 4.0, 5.0, f64::INFINITY];

        histogram.observe(2.0, &LabelSet::EMPTY).unwrap();
        assert_eq!(
            bucket_values(&histogram, &LabelSet::EMPTY, &all),
            vec![0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        );
        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 1.0);
        assert_eq!(histogram.sum(&LabelSet::EMPTY).unwrap(), 2.0);

        histogram.observe(0.5, &LabelSet::EMPTY).unwrap();
        assert_eq!(
            bucket_values(&histogram, &LabelSet::EMPTY, &all),
            vec![1.0, 2.0, 2.0, 2.0, 2.0, 2.0]
        );
        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 2.0);
        assert_eq!(histogram.sum(&LabelSet::EMPTY).unwrap(), 2.5);
    }

    #[test]
    fn observations_past_last_bucket_only_count_in_inf() {
        let histogram = fixed(&[1.0, 2.0]);
        histogram.observe(100.0, &LabelSet::EMPTY).unwrap();

        assert_eq!(
            bucket_values(&histogram, &LabelSet::EMPTY, &[1.0, 2.0, f64::INFINITY]),
            vec![0.0, 0.0, 1.0]
        );
        assert_eq!(histogram.sum(&LabelSet::EMPTY).unwrap(), 100.0);
    }

    #[test]
    fn render_fixed() {
        let histogram = fixed(&[1.0, 2.5, 5.0]);
        histogram.observe(2.0, &LabelSet::EMPTY).unwrap();
        histogram.observe(0.5, &LabelSet::EMPTY).unwrap();

        assert_eq!(
            rendered(&histogram),
            "# HELP http_request_latency latency of requests\n\
             # TYPE http_request_latency histogram\n\
             http_request_latency_bucket{le=\"1\"} 1\n\
             http_request_latency_bucket{le=\"2.5\"} 2\n\
             http_request_latency_bucket{le=\"5\"} 2\n\
             http_request_latency_bucket{le=\"+Inf\"} 2\n\
             http_request_latency_count{} 2\n\
             http_request_latency_sum{} 2.5\n"
        );
        assert_eq!(rendered(&histogram), rendered(&histogram));
    }

    #[test]
    fn render_with_static_and_dynamic_labels() {
        let histogram = Histogram::with_parent(
            HistogramOptions::new("http_request_latency", "latency of requests")
                .with_labels(labels! { "component" => "qball" })
                .with_buckets([1.0]),
            &labels! { "service" => "muskie" },
            probe::noop(),
        )
        .unwrap();

        histogram
            .observe(0.5, &labels! { "method" => "getobject" })
            .unwrap();
        histogram.observe(3.0, &LabelSet::EMPTY).unwrap();

        assert_eq!(
            rendered(&histogram),
            "# HELP http_request_latency latency of requests\n\
             # TYPE http_request_latency histogram\n\
             http_request_latency_bucket{component=\"qball\",method=\"getobject\",service=\"muskie\",le=\"1\"} 1\n\
             http_request_latency_bucket{component=\"qball\",method=\"getobject\",service=\"muskie\",le=\"+Inf\"} 1\n\
             http_request_latency_count{component=\"qball\",method=\"getobject\",service=\"muskie\"} 1\n\
             http_request_latency_sum{component=\"qball\",method=\"getobject\",service=\"muskie\"} 0.5\n\
             http_request_latency_bucket{component=\"qball\",service=\"muskie\",le=\"1\"} 0\n\
             http_request_latency_bucket{component=\"qball\",service=\"muskie\",le=\"+Inf\"} 1\n\
             http_request_latency_count{component=\"qball\",service=\"muskie\"} 1\n\
             http_request_latency_sum{component=\"qball\",service=\"muskie\"} 3\n"
        );
    }

    #[test]
    fn label_combinations_are_independent() {
        let histogram = fixed(&[1.0, 10.0]);
        histogram.observe(5.0, &labels! { "method" => "get" }).unwrap();
        histogram.observe(5.0, &labels! { "method" => "get" }).unwrap();
        histogram.observe(0.1, &labels! { "method" => "put" }).unwrap();

        assert_eq!(histogram.count(&labels! { "method" => "get" }).unwrap(), 2.0);
        assert_eq!(histogram.sum(&labels! { "method" => "get" }).unwrap(), 10.0);
        assert_eq!(
            bucket_values(&histogram, &labels! { "method" => "put" }, &[1.0, 10.0]),
            vec![1.0, 1.0]
        );
        assert!(matches!(
            histogram.count(&labels! { "method" => "delete" }),
            Err(Error::NotFound { .. })
        ));
        assert!(matches!(
            histogram.bucket_value(&labels! { "method" => "get" }, 2.0),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn rejected_observations_change_nothing() {
        let histogram = fixed(&[1.0]);
        histogram.observe(0.5, &LabelSet::EMPTY).unwrap();

        assert!(matches!(
            histogram.observe(-1.0, &LabelSet::EMPTY),
            Err(Error::NegativeObservation { value }) if value == -1.0
        ));
        assert!(matches!(
            histogram.observe(f64::NAN, &LabelSet::EMPTY),
            Err(Error::NotANumber)
        ));
        assert!(matches!(
            histogram.observe(0.5, &labels! { "le" => "1" }),
            Err(Error::InvalidLabels(LabelError::ReservedKey { .. }))
        ));
        assert!(matches!(
            histogram.observe(0.5, &labels! { "bad key" => "1" }),
            Err(Error::InvalidLabels(LabelError::InvalidKey { .. }))
        ));

        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 1.0);
        assert_eq!(histogram.sum(&LabelSet::EMPTY).unwrap(), 0.5);
    }

    #[test]
    fn construction_validates_buckets() {
        let err = Histogram::new(
            HistogramOptions::new("latency", "latency")
                .with_buckets([1.0, 5.0, 10.0, 100.0, 50.0, 1000.0]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidBuckets(BucketError::NotIncreasing { previous, next })
                if previous == 100.0 && next == 50.0
        ));

        let err = Histogram::new(HistogramOptions::new("latency", "latency").with_buckets(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidBuckets(BucketError::Empty)));

        let err = Histogram::new(
            HistogramOptions::new("latency", "latency").with_labels(labels! { "le" => 1 }),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidLabels(LabelError::ReservedKey { .. })
        ));
    }

    #[test]
    fn default_buckets() {
        let histogram = Histogram::new(HistogramOptions::from(MetricOptions::new(
            "latency", "latency",
        )))
        .unwrap();
        assert_eq!(histogram.buckets(), &Buckets::Fixed(DEFAULT_BUCKETS.to_vec()));

        histogram.observe(0.3, &LabelSet::EMPTY).unwrap();
        assert_eq!(
            bucket_values(&histogram, &LabelSet::EMPTY, &DEFAULT_BUCKETS),
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn dynamic_buckets_carry_lower_counts_forward() {
        let histogram = dynamic();

        histogram.observe(1.0, &LabelSet::EMPTY).unwrap();
        assert_eq!(
            bucket_values(&histogram, &LabelSet::EMPTY, &[1.0, 3.0, 5.0, 7.0, 9.0]),
            vec![1.0; 5]
        );

        histogram.observe(100.0, &LabelSet::EMPTY).unwrap();
        assert_eq!(
            bucket_values(
                &histogram,
                &LabelSet::EMPTY,
                &[9.0, 81.0, 243.0, 405.0, 567.0, 729.0, f64::INFINITY]
            ),
            vec![1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 2.0]
        );

        // the order between 9 and 81 was never needed
        assert!(histogram.bucket_value(&LabelSet::EMPTY, 27.0).is_err());
    }

    #[test]
    fn dynamic_buckets_do_not_double_overlapping_counts() {
        let histogram = dynamic();
        for _ in 0..3 {
            histogram.observe(10.0, &LabelSet::EMPTY).unwrap();
        }
        histogram.observe(6157.0, &LabelSet::EMPTY).unwrap();
        histogram.observe(4788.0, &LabelSet::EMPTY).unwrap();

        assert_eq!(
            bucket_values(
                &histogram,
                &LabelSet::EMPTY,
                &[9.0, 27.0, 81.0, 729.0, 2187.0, 3645.0, 5103.0, 6561.0]
            ),
            vec![0.0, 3.0, 3.0, 3.0, 3.0, 3.0, 4.0, 5.0]
        );
        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 5.0);
        assert_eq!(histogram.sum(&LabelSet::EMPTY).unwrap(), 30.0 + 6157.0 + 4788.0);
    }

    #[test]
    fn dynamic_buckets_added_below_start_empty() {
        let histogram = dynamic();
        histogram.observe(500.0, &LabelSet::EMPTY).unwrap();
        histogram.observe(2.0, &LabelSet::EMPTY).unwrap();

        assert_eq!(
            bucket_values(
                &histogram,
                &LabelSet::EMPTY,
                &[1.0, 3.0, 9.0, 81.0, 405.0, 567.0]
            ),
            vec![0.0, 1.0, 1.0, 1.0, 1.0, 2.0]
        );
    }

    #[test]
    fn dynamic_observation_past_last_order() {
        let histogram = dynamic();
        histogram.observe(1e12, &LabelSet::EMPTY).unwrap();

        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 1.0);
        assert_eq!(
            rendered(&histogram),
            "# HELP http_request_latency latency of requests\n\
             # TYPE http_request_latency histogram\n\
             http_request_latency_bucket{le=\"+Inf\"} 1\n\
             http_request_latency_count{} 1\n\
             http_request_latency_sum{} 1000000000000\n"
        );
    }

    #[test]
    fn dynamic_render_is_ascending() {
        let histogram = dynamic();
        histogram.observe(100.0, &LabelSet::EMPTY).unwrap();
        histogram.observe(2.0, &LabelSet::EMPTY).unwrap();

        let boundaries: Vec<f64> = rendered(&histogram)
            .lines()
            .filter_map(|line| line.split("le=\"").nth(1))
            .filter_map(|rest| rest.split('"').next())
            .filter(|le| *le != "+Inf")
            .map(|le| le.parse().unwrap())
            .collect();

        assert_eq!(
            boundaries,
            vec![1.0, 3.0, 5.0, 7.0, 9.0, 81.0, 243.0, 405.0, 567.0, 729.0]
        );
    }

    #[test]
    fn histogram_concurrent_dynamic_growth() {
        let histogram = Arc::new(dynamic());
        let values = [5.0, 100.0, 5000.0, 6157.0, 4788.0];

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let histogram = Arc::clone(&histogram);
                std::thread::spawn(move || {
                    for round in 0..50 {
                        // vary the order so every thread grows buckets differently
                        for i in 0..values.len() {
                            let value = values[(i + worker + round) % values.len()];
                            histogram.observe(value, &LabelSet::EMPTY).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let les = [
            1.0, 3.0, 5.0, 7.0, 9.0, 81.0, 243.0, 405.0, 567.0, 729.0, 2187.0, 3645.0, 5103.0,
            6561.0, f64::INFINITY,
        ];
        let expected: Vec<f64> = les
            .iter()
            .map(|&le| 200.0 * values.iter().filter(|&&v| v <= le).count() as f64)
            .collect();
        assert_eq!(bucket_values(&histogram, &LabelSet::EMPTY, &les), expected);
        assert_eq!(histogram.count(&LabelSet::EMPTY).unwrap(), 1000.0);
        assert_eq!(
            histogram.sum(&LabelSet::EMPTY).unwrap(),
            200.0 * values.iter().sum::<f64>()
        );
    }

    #[test]
    fn deserialize_buckets() {
        let buckets: Buckets = serde_json::from_str("[0.5, 1]").unwrap();
        assert_eq!(buckets, Buckets::Fixed(vec![0.5, 1.0]));

        let buckets: Buckets = serde_json::from_str(r#""dynamic_log_linear""#).unwrap();
        assert_eq!(buckets, Buckets::DynamicLogLinear);

        assert!(serde_json::from_str::<Buckets>(r#""exponential""#).is_err());
    }
}
