//! Single-pass rewrite scan.
//!
//! Left to right over the input; at each position the rules are tried in
//! declaration order and the first match wins, regardless of how long a
//! later rule's match would have been. The winning template is expanded
//! immediately and the scan resumes after the matched span — replacement
//! text is never re-scanned, so a rule whose output contains its own
//! pattern cannot loop.
//!
//! Positions where no rule matches copy one character verbatim. Zero-width
//! matches are refused here (a compiled pattern always has a consuming
//! atom, but a wildcard run can still match nothing); together these keep
//! every step advancing by at least one character.

use std::time::Instant;

use super::expand::expand;
use super::matcher::match_at;
use super::metrics::{RuleCounters, RunMetrics, RunResult};
use crate::api::Options;
use crate::RuleSet;

pub(crate) fn scan(input: &str, rules: &RuleSet, options: &Options) -> RunResult {
    let started = Instant::now();
    let bytes = input.as_bytes();

    let mut output = String::with_capacity(input.len());
    let mut calls = Vec::new();
    let mut metrics = RunMetrics {
        per_rule: vec![RuleCounters::default(); rules.rules.len()],
        ..RunMetrics::default()
    };

    let mut pos = 0usize;
    'scan: while pos < input.len() {
        metrics.positions += 1;

        for (index, rule) in rules.rules.iter().enumerate() {
            if let Some(gate) = rules.gates[index] {
                if bytes[pos] != gate {
                    continue;
                }
            }
            metrics.per_rule[index].attempts += 1;

            let Some(found) = match_at(&rule.pattern, rule.flags, input, pos) else {
                continue;
            };
            if found.span.end == found.span.start {
                continue;
            }

            metrics.per_rule[index].matches += 1;
            metrics.matched += 1;
            tracing::trace!(
                rule = %rule.source,
                start = found.span.start,
                end = found.span.end,
                "rule matched"
            );
            expand(&rule.template, input, &found, options, &mut output, &mut calls);
            pos = found.span.end;
            continue 'scan;
        }

        match input[pos..].chars().next() {
            Some(c) => {
                output.push(c);
                pos += c.len_utf8();
                metrics.copied += 1;
            }
            None => break,
        }
    }

    metrics.total = started.elapsed();
    RunResult {
        output,
        calls,
        metrics,
    }
}
