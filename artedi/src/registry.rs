//! The collector registry and the `collect` entry point.

use std::{fmt::Debug, future::Future, sync::Arc};

use futures::{FutureExt, StreamExt, future::BoxFuture, stream};
use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    BoxError, Error, MetricKind,
    counter::Counter,
    error::{CollectError, CollectFailure},
    gauge::Gauge,
    histogram::Histogram,
    labels::{LabelSet, is_valid_name},
    options::{CollectorOptions, GaugeOptions, HistogramOptions, MetricOptions},
    probe::{self, Probe},
};

/// Prometheus text exposition format, version 0.0.4.
pub const FMT_PROM_0_0_4: &str = "prometheus-0.0.4";

/// The default and only supported serialization format.
pub const FMT_PROM: &str = FMT_PROM_0_0_4;

/// Maximum number of trigger functions run at once.
const TRIGGER_CONCURRENCY: usize = 5;

/// Maximum number of collectors rendered at once.
const RENDER_CONCURRENCY: usize = 10;

/// Anything the registry can serialize.
///
/// Counters, gauges and histograms implement this; hosts implement it for
/// their own collectors and add them with [`Registry::register`].
pub trait Collector: Debug + Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> MetricKind;

    /// Appends this collector's complete metric family, headers included,
    /// to `out`.
    fn render(&self, out: &mut String) -> Result<(), BoxError>;
}

/// A collector held by a [`Registry`].
#[derive(Debug, Clone)]
pub enum CollectorRef {
    Counter(Arc<Counter>),
    Gauge(Arc<Gauge>),
    Histogram(Arc<Histogram>),
    Custom(Arc<dyn Collector>),
}

impl CollectorRef {
    pub fn as_collector(&self) -> &dyn Collector {
        match self {
            Self::Counter(counter) => counter.as_ref(),
            Self::Gauge(gauge) => gauge.as_ref(),
            Self::Histogram(histogram) => histogram.as_ref(),
            Self::Custom(collector) => collector.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.as_collector().name()
    }

    pub fn kind(&self) -> MetricKind {
        self.as_collector().kind()
    }
}

type TriggerFn = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

#[derive(Clone)]
struct Trigger(TriggerFn);

impl Debug for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Trigger")
    }
}

/// Owns the named top-level collectors of a process.
///
/// Collectors created through the registry inherit its static labels and
/// its [`Probe`].
#[derive(Debug)]
pub struct Registry {
    static_labels: LabelSet,
    probe: Arc<dyn Probe>,
    collectors: Mutex<IndexMap<String, CollectorRef>>,
    triggers: Mutex<Vec<Trigger>>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            static_labels: LabelSet::new(),
            probe: probe::noop(),
            collectors: Default::default(),
            triggers: Default::default(),
        }
    }
}

impl Registry {
    pub fn new(options: CollectorOptions) -> Result<Self, Error> {
        Ok(Self {
            static_labels: options.static_labels()?,
            ..Default::default()
        })
    }

    /// Replaces the probe handed to collectors created from now on.
    pub fn with_probe(mut self, probe: impl Probe + 'static) -> Self {
        self.probe = Arc::new(probe);
        self
    }

    pub fn static_labels(&self) -> &LabelSet {
        &self.static_labels
    }

    /// Returns the counter named `options.name`, creating it if needed.
    ///
    /// An existing counter is returned as is; the rest of `options` is then
    /// ignored.
    pub fn counter(&self, options: MetricOptions) -> Result<Arc<Counter>, Error> {
        let mut collectors = self.collectors.lock();
        match collectors.get(&options.name) {
            Some(CollectorRef::Counter(counter)) => return Ok(Arc::clone(counter)),
            Some(existing) => return Err(conflict(existing, MetricKind::Counter)),
            None => {}
        }

        let name = options.name.clone();
        let counter = Arc::new(Counter::with_parent(
            options,
            &self.static_labels,
            Arc::clone(&self.probe),
        )?);
        debug!(%name, "created counter");
        collectors.insert(name, CollectorRef::Counter(Arc::clone(&counter)));
        Ok(counter)
    }

    pub fn gauge(&self, options: GaugeOptions) -> Result<Arc<Gauge>, Error> {
        let mut collectors = self.collectors.lock();
        match collectors.get(&options.metric.name) {
            Some(CollectorRef::Gauge(gauge)) => return Ok(Arc::clone(gauge)),
            Some(existing) => return Err(conflict(existing, MetricKind::Gauge)),
            None => {}
        }

        let name = options.metric.name.clone();
        let gauge = Arc::new(Gauge::with_parent(
            options,
            &self.static_labels,
            Arc::clone(&self.probe),
        )?);
        debug!(%name, "created gauge");
        collectors.insert(name, CollectorRef::Gauge(Arc::clone(&gauge)));
        Ok(gauge)
    }

    pub fn histogram(&self, options: HistogramOptions) -> Result<Arc<Histogram>, Error> {
        let mut collectors = self.collectors.lock();
        match collectors.get(&options.metric.name) {
            Some(CollectorRef::Histogram(histogram)) => return Ok(Arc::clone(histogram)),
            Some(existing) => return Err(conflict(existing, MetricKind::Histogram)),
            None => {}
        }

        let name = options.metric.name.clone();
        let histogram = Arc::new(Histogram::with_parent(
            options,
            &self.static_labels,
            Arc::clone(&self.probe),
        )?);
        debug!(%name, "created histogram");
        collectors.insert(name, CollectorRef::Histogram(Arc::clone(&histogram)));
        Ok(histogram)
    }

    /// Adds a user-defined collector. Fails if the name is taken.
    pub fn register(&self, collector: Arc<dyn Collector>) -> Result<(), Error> {
        let name = collector.name().to_string();
        if !is_valid_name(&name) {
            return Err(Error::InvalidName { name });
        }

        let mut collectors = self.collectors.lock();
        if collectors.contains_key(&name) {
            return Err(Error::AlreadyRegistered { name });
        }
        debug!(%name, kind = %collector.kind(), "registered collector");
        collectors.insert(name, CollectorRef::Custom(collector));
        Ok(())
    }

    pub fn get_collector(&self, name: &str) -> Option<CollectorRef> {
        self.collectors.lock().get(name).cloned()
    }

    /// Adds a function run before every [`collect`](Self::collect), for
    /// example to refresh a gauge from an external source.
    pub fn add_trigger_function<F, Fut>(&self, trigger: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let trigger: TriggerFn = Arc::new(move || trigger().boxed());
        self.triggers.lock().push(Trigger(trigger));
    }

    /// Runs every trigger, then renders every collector in `format`.
    ///
    /// All triggers complete before the first collector renders. A failing
    /// trigger or collector does not stop the others: the failures are
    /// returned together in [`CollectError::Partial`] along with the text the
    /// remaining collectors produced.
    pub async fn collect(&self, format: &str) -> Result<String, CollectError> {
        if format != FMT_PROM_0_0_4 {
            return Err(CollectError::UnsupportedFormat {
                format: format.to_string(),
            });
        }

        let mut failures = vec![];

        let triggers: Vec<Trigger> = self.triggers.lock().clone();
        let trigger_results: Vec<_> = stream::iter(triggers)
            .map(|Trigger(trigger)| trigger())
            .buffer_unordered(TRIGGER_CONCURRENCY)
            .collect()
            .await;
        for result in trigger_results {
            if let Err(e) = result {
                warn!(error = %e, "trigger function failed");
                failures.push(CollectFailure::Trigger(e));
            }
        }

        let collectors: Vec<CollectorRef> = self.collectors.lock().values().cloned().collect();
        let num_collectors = collectors.len();
        let rendered: Vec<_> = stream::iter(collectors)
            .map(|collector| async move {
                let mut out = String::new();
                match collector.as_collector().render(&mut out) {
                    Ok(()) => Ok(out),
                    Err(source) => Err(CollectFailure::Render {
                        name: collector.name().to_string(),
                        source,
                    }),
                }
            })
            .buffered(RENDER_CONCURRENCY)
            .collect()
            .await;

        let mut text = String::new();
        for result in rendered {
            match result {
                Ok(out) => text.push_str(&out),
                Err(e) => {
                    warn!(error = %e, "collector failed to render");
                    failures.push(e);
                }
            }
        }

        if failures.is_empty() {
            debug!(collectors = num_collectors, bytes = text.len(), "collected metrics");
            Ok(text)
        } else {
            Err(CollectError::Partial { text, failures })
        }
    }
}

fn conflict(existing: &CollectorRef, requested: MetricKind) -> Error {
    match existing {
        CollectorRef::Custom(collector) => Error::AlreadyRegistered {
            name: collector.name().to_string(),
        },
        _ => Error::TypeConflict {
            name: existing.name().to_string(),
            existing: existing.kind(),
            requested,
        },
    }
}
