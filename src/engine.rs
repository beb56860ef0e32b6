//! Rewrite engine.
//!
//! This module is the operational core: it takes an immutable, compiled
//! [`RuleSet`](crate::RuleSet) and one input string and produces the
//! rewritten output plus the ordered list of emitted calls.
//!
//! ## How the parts work together
//!
//! ```text
//! rule sources ──┐
//!               │  compile_rule            (compile.rs)
//!               └──────────┬──────────────
//!                          │
//!                          v
//! input ──── scan (scanner.rs) ── one pass, left to right
//!                          │        first matching rule wins per position
//!                          │
//!            matcher.rs ───┤  anchored match at the current position;
//!                          │  greedy runs backtrack on an explicit stack
//!                          │
//!            expand.rs ────┤  template → output text + ordered calls
//!                          │
//!                          v
//!                 RunResult (output, calls, metrics)
//! ```
//!
//! The scan makes exactly one pass: replacement text goes straight to the
//! output buffer and is never reconsidered, which is what makes rewriting
//! total — any rule set terminates on any input, in time bounded by input
//! length times worst-case backtracking depth.
//!
//! ## Responsibilities by module
//!
//! - `matcher.rs`: anchored matching of one pattern at one position, with
//!   explicit-stack backtracking and capture recording.
//! - `scanner.rs`: the outer loop — position advance, rule order,
//!   first-match-wins, verbatim-copy fallback.
//! - `expand.rs`: depth-first template expansion and call emission.
//! - `metrics.rs`: per-run counters surfaced by the verbose API.
//!
//! ## Determinism
//!
//! Matching has no tie-breaking heuristics: rule order decides everything,
//! and identical `(input, ruleset, options)` triples always produce
//! identical output and call lists.

#[path = "engine/expand.rs"]
mod expand;
#[path = "engine/matcher.rs"]
mod matcher;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/scanner.rs"]
mod scanner;

#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use metrics::{RuleCounters, RunMetrics, RunResult};
pub(crate) use scanner::scan;
