//! Error types returned by collectors and the registry.

use crate::{
    MetricKind,
    labels::{LabelError, LabelSet, NAME_PATTERN},
};

/// Boxed error type returned by trigger functions and user collectors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while constructing or updating collectors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("name {name:?} must match regex \"{pattern}\"", pattern = NAME_PATTERN)]
    InvalidName { name: String },

    #[error("invalid labels: {0}")]
    InvalidLabels(#[from] LabelError),

    #[error("invalid buckets: {0}")]
    InvalidBuckets(#[from] BucketError),

    #[error("adding negative values to counters is not allowed: {value}")]
    NegativeValue { value: f64 },

    #[error("observe must be called with a value >= 0: {value}")]
    NegativeObservation { value: f64 },

    #[error("value must be a number, got NaN")]
    NotANumber,

    #[error("no metric found for labels {labels}")]
    NotFound { labels: LabelSet },

    #[error("collector {name:?} is already registered as a {existing}, not a {requested}")]
    TypeConflict {
        name: String,
        existing: MetricKind,
        requested: MetricKind,
    },

    #[error("collector with name already registered: {name}")]
    AlreadyRegistered { name: String },
}

/// Errors raised while validating or generating histogram bucket boundaries.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BucketError {
    #[error("at least one bucket boundary is required")]
    Empty,

    #[error("bucket boundaries must be positive and finite: {value}")]
    NotPositive { value: f64 },

    #[error("bucket boundaries must be strictly increasing: {previous} is followed by {next}")]
    NotIncreasing { previous: f64, next: f64 },

    #[error("invalid bucket generator argument: {reason}")]
    InvalidArgument { reason: String },
}

/// A single failure recorded while collecting.
#[derive(Debug, thiserror::Error)]
pub enum CollectFailure {
    #[error("trigger function failed: {0}")]
    Trigger(#[source] BoxError),

    #[error("collector {name:?} failed to render: {source}")]
    Render {
        name: String,
        #[source]
        source: BoxError,
    },
}

/// Errors returned by [`Registry::collect`](crate::Registry::collect).
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("unknown serialization format: {format}")]
    UnsupportedFormat { format: String },

    /// One or more triggers or collectors failed. `text` holds everything the
    /// remaining collectors rendered.
    #[error("{} failure(s) during collection: {}", .failures.len(), join_failures(.failures))]
    Partial {
        text: String,
        failures: Vec<CollectFailure>,
    },
}

impl CollectError {
    /// The text rendered despite the failures, if any was produced.
    pub fn partial_text(&self) -> Option<&str> {
        match self {
            Self::UnsupportedFormat { .. } => None,
            Self::Partial { text, .. } => Some(text),
        }
    }

    /// Every individual failure folded into this error.
    pub fn failures(&self) -> &[CollectFailure] {
        match self {
            Self::UnsupportedFormat { .. } => &[],
            Self::Partial { failures, .. } => failures,
        }
    }
}

fn join_failures(failures: &[CollectFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
