//! Engine run metrics.
//!
//! A small set of structs used to observe and debug engine behavior.
//! Metrics are cheap to collect (a handful of counters plus one clock
//! read), so every run carries them; callers that only want the rewrite
//! can ignore everything but `output` and `calls`.

use crate::CallInvocation;
use std::time::Duration;

/// Per-rule counters for one run, aligned with the rule set's declaration
/// order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuleCounters {
    /// Times the rule was tried against a position (after gate filtering).
    pub attempts: usize,
    /// Times the rule won and its template was expanded.
    pub matches: usize,
}

/// Counters and timing for one scan.
#[derive(Debug, Default, Clone)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Input positions where at least one rule was considered.
    pub positions: usize,
    /// Spans replaced by a rule.
    pub matched: usize,
    /// Characters copied verbatim because no rule matched.
    pub copied: usize,
    /// Per-rule counters, in declaration order.
    pub per_rule: Vec<RuleCounters>,
}

/// Scanner output bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// The rewritten text.
    pub output: String,
    /// Emitted calls, in emission order.
    pub calls: Vec<CallInvocation>,
    /// Counters for the run.
    pub metrics: RunMetrics,
}
