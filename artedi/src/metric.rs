//! The single-value cell every collector is built from.

use std::{
    sync::{Arc, Weak},
    time::{Duration, SystemTime},
};

use parking_lot::Mutex;
use tokio::{runtime::Handle, task::AbortHandle, time::Instant};

use crate::{Error, labels::LabelSet, probe::Probe};

/// Settings shared by every cell of a vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CellOptions {
    pub(crate) default_value: f64,
    /// When set, a cell falls back to `default_value` once this long has
    /// passed without a mutation.
    pub(crate) expiry_period: Option<Duration>,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            default_value: 0.0,
            expiry_period: None,
        }
    }
}

/// A labelled numeric accumulator.
///
/// `Metric` is a cheap handle: clones share the same underlying value.
#[derive(Debug, Clone)]
pub struct Metric {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    labels: LabelSet,
    options: CellOptions,
    probe: Arc<dyn Probe>,
    state: Mutex<MetricState>,
}

#[derive(Debug)]
struct MetricState {
    value: f64,
    last_updated: Option<SystemTime>,
    expires_at: Option<Instant>,
    pending_expiry: Option<AbortHandle>,
}

impl Metric {
    pub(crate) fn new(labels: LabelSet, options: CellOptions, probe: Arc<dyn Probe>) -> Self {
        Self {
            shared: Arc::new(Shared {
                labels,
                options,
                probe,
                state: Mutex::new(MetricState {
                    value: options.default_value,
                    last_updated: None,
                    expires_at: None,
                    pending_expiry: None,
                }),
            }),
        }
    }

    /// The full label set of this cell, static labels included.
    pub fn labels(&self) -> &LabelSet {
        &self.shared.labels
    }

    /// Adds `delta` to the value. The caller decides whether negative deltas
    /// are allowed.
    pub fn add(&self, delta: f64) -> Result<(), Error> {
        if delta.is_nan() {
            return Err(Error::NotANumber);
        }
        let mut state = self.shared.state.lock();
        self.shared.expire_if_due(&mut state);
        state.value += delta;
        self.touch(&mut state);
        self.shared.probe.metric_add(delta, &self.shared.labels);
        Ok(())
    }

    /// Replaces the value.
    pub fn set(&self, value: f64) -> Result<(), Error> {
        if value.is_nan() {
            return Err(Error::NotANumber);
        }
        let mut state = self.shared.state.lock();
        state.value = value;
        self.touch(&mut state);
        self.shared.probe.metric_set(value, &self.shared.labels);
        Ok(())
    }

    pub fn value(&self) -> f64 {
        let mut state = self.shared.state.lock();
        self.shared.expire_if_due(&mut state);
        state.value
    }

    /// Wall-clock time of the last mutation or expiry, `None` if the cell was
    /// never touched.
    pub fn last_updated(&self) -> Option<SystemTime> {
        let mut state = self.shared.state.lock();
        self.shared.expire_if_due(&mut state);
        state.last_updated
    }

    /// Returns true if both handles refer to the same cell.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.shared, &b.shared)
    }

    fn touch(&self, state: &mut MetricState) {
        state.last_updated = Some(SystemTime::now());

        let Some(period) = self.shared.options.expiry_period else {
            return;
        };

        if let Some(pending) = state.pending_expiry.take() {
            pending.abort();
        }
        // A period too long to represent never elapses.
        let Some(deadline) = Instant::now().checked_add(period) else {
            state.expires_at = None;
            return;
        };
        state.expires_at = Some(deadline);

        // Without a runtime the deadline is still honoured on the next access.
        if let Ok(handle) = Handle::try_current() {
            let shared = Arc::downgrade(&self.shared);
            state.pending_expiry = Some(handle.spawn(expire_at(shared, deadline)).abort_handle());
        }
    }
}

async fn expire_at(shared: Weak<Shared>, deadline: Instant) {
    tokio::time::sleep_until(deadline).await;
    if let Some(shared) = shared.upgrade() {
        let mut state = shared.state.lock();
        shared.expire_if_due(&mut state);
    }
}

impl Shared {
    fn expire_if_due(&self, state: &mut MetricState) {
        let Some(deadline) = state.expires_at else {
            return;
        };
        if Instant::now() < deadline {
            return;
        }

        state.value = self.options.default_value;
        state.last_updated = Some(SystemTime::now());
        state.expires_at = None;
        state.pending_expiry = None;
        self.probe
            .metric_reset(self.options.default_value, &self.labels);
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        if let Some(pending) = self.state.get_mut().pending_expiry.take() {
            pending.abort();
        }
    }
}
