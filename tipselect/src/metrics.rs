//! Metrics exposed by the tip selection engine.

use prometheus_client::encoding::{EncodeLabelSet, EncodeLabelValue};
use prometheus_client::metrics::{counter::Counter, family::Family};
use prometheus_client::registry::Registry;

/// The validation rule a candidate was rejected by.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, EncodeLabelValue)]
pub enum Rule {
    /// The candidate could not be resolved to a stored transaction.
    Missing,
    /// The candidate is not the tail of its bundle.
    NotTail,
    /// The candidate's ancestry is not fully resolvable.
    NotSolid,
    /// The candidate's unconfirmed ancestry anchors too far in the past.
    BelowMaxDepth,
    /// Folding the candidate into the walk's diff broke ledger consistency.
    Ledger,
}

/// Label set for per-rule rejection counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct Rejection {
    /// The rule that rejected the candidate.
    pub rule: Rule,
}

impl Rejection {
    /// Creates a label set for the given rule.
    pub fn new(rule: Rule) -> Self {
        Self { rule }
    }
}

/// Counters describing walk activity.
///
/// Cheap to clone; all inner state is shared.
#[derive(Clone, Default)]
pub struct Metrics {
    /// Number of completed random walks.
    pub walks: Counter,
    /// Number of accepted steps across all walks.
    pub steps: Counter,
    /// Candidates rejected during walk validation, by rule.
    pub rejections: Family<Rejection, Counter>,
}

impl Metrics {
    /// Creates and registers a set of metrics.
    pub fn new(registry: &mut Registry) -> Self {
        let metrics = Self::default();
        registry.register(
            "walks",
            "Number of completed random walks",
            metrics.walks.clone(),
        );
        registry.register(
            "walk_steps",
            "Number of accepted steps across all walks",
            metrics.steps.clone(),
        );
        registry.register(
            "walk_rejections",
            "Candidates rejected during walk validation",
            metrics.rejections.clone(),
        );
        metrics
    }
}
