use std::time::Duration;

use crate::engine;
use crate::error::{CompileError, EngineError};
use crate::{CallInvocation, Rule, RuleSet};

/// Options that affect template expansion.
///
/// This is intentionally minimal; rule behavior itself is controlled by
/// per-rule flags.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Render each call-expression into the output as `$name("arg",...);`
    /// with resolved arguments, for hosts whose downstream renderer
    /// consumes call text. Off by default: calls only reach the call list.
    pub render_calls: bool,
}

/// Receives emitted calls, in emission order.
///
/// Modeled as a capability passed at rewrite time rather than a global
/// side-effecting function. Delivery is fire-and-forget from the engine's
/// point of view; ordering is guaranteed, execution and any locking belong
/// to the implementor.
pub trait CallDispatcher {
    fn invoke(&mut self, name: &str, args: &[String]);
}

/// A dispatcher that just collects invocations — for tests and for hosts
/// that batch execution.
#[derive(Debug, Default)]
pub struct CollectedCalls {
    pub calls: Vec<CallInvocation>,
}

impl CallDispatcher for CollectedCalls {
    fn invoke(&mut self, name: &str, args: &[String]) {
        self.calls.push(CallInvocation {
            name: name.to_string(),
            args: args.to_vec(),
        });
    }
}

/// Result from [`rewrite`] and [`rewrite_with`].
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// The rewritten text.
    pub output: String,
    /// Emitted calls, in emission order.
    pub calls: Vec<CallInvocation>,
    /// Total elapsed time for the rewrite.
    pub elapsed: Duration,
}

/// Per-rule counters surfaced by [`rewrite_verbose_with`].
#[derive(Debug, Clone)]
pub struct RuleStats {
    /// The rule's raw match source.
    pub source: String,
    /// Times the rule was tried against a position.
    pub attempts: usize,
    /// Times the rule won.
    pub matches: usize,
}

/// Additional details returned by [`rewrite_verbose_with`].
///
/// Compact by design: enough to see which rules did the work and what the
/// scan cost, without dumping internal state.
#[derive(Debug, Clone)]
pub struct RunDetails {
    /// Total elapsed time.
    pub total: Duration,
    /// Input positions where at least one rule was considered.
    pub positions: usize,
    /// Spans replaced by a rule.
    pub matched: usize,
    /// Characters copied verbatim.
    pub copied: usize,
    /// Per-rule counters, in declaration order.
    pub rules: Vec<RuleStats>,
}

/// Result from [`rewrite_verbose_with`].
#[derive(Debug, Clone)]
pub struct RewriteResultVerbose {
    pub output: String,
    pub calls: Vec<CallInvocation>,
    pub elapsed: Duration,
    pub details: RunDetails,
}

/// Compile one rule-definition triple: flags, match source, subst source.
///
/// # Example
/// ```
/// let rule = kaeru::compile("", "cat", "dog").unwrap();
/// assert_eq!(rule.source(), "cat");
/// ```
pub fn compile(flags: &str, match_source: &str, subst_source: &str) -> Result<Rule, CompileError> {
    crate::compile::compile_rule(flags, match_source, subst_source)
}

/// Rewrite `input` with `rules`, collecting emitted calls.
pub fn rewrite(input: &str, rules: &RuleSet) -> Result<RewriteResult, EngineError> {
    rewrite_with(input, rules, &Options::default())
}

/// Rewrite `input` with `rules` under the provided `options`.
pub fn rewrite_with(
    input: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<RewriteResult, EngineError> {
    let run = run_scan(input, rules, options)?;
    Ok(RewriteResult {
        output: run.output,
        calls: run.calls,
        elapsed: run.metrics.total,
    })
}

/// Rewrite `input` and deliver every emitted call, in order, to
/// `dispatcher`. The calls are also returned, so the result is the same as
/// [`rewrite_with`] plus the delivery side effect.
pub fn rewrite_dispatch(
    input: &str,
    rules: &RuleSet,
    options: &Options,
    dispatcher: &mut dyn CallDispatcher,
) -> Result<RewriteResult, EngineError> {
    let result = rewrite_with(input, rules, options)?;
    for call in &result.calls {
        dispatcher.invoke(&call.name, &call.args);
    }
    Ok(result)
}

/// Rewrite `input` and return extra (compact) run details.
///
/// Useful for profiling rule sets and debugging why a rule never fires.
pub fn rewrite_verbose_with(
    input: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<RewriteResultVerbose, EngineError> {
    let run = run_scan(input, rules, options)?;

    let stats = rules
        .rules
        .iter()
        .zip(&run.metrics.per_rule)
        .map(|(rule, counters)| RuleStats {
            source: rule.source.clone(),
            attempts: counters.attempts,
            matches: counters.matches,
        })
        .collect();

    Ok(RewriteResultVerbose {
        output: run.output,
        calls: run.calls,
        elapsed: run.metrics.total,
        details: RunDetails {
            total: run.metrics.total,
            positions: run.metrics.positions,
            matched: run.metrics.matched,
            copied: run.metrics.copied,
            rules: stats,
        },
    })
}

fn run_scan(
    input: &str,
    rules: &RuleSet,
    options: &Options,
) -> Result<engine::RunResult, EngineError> {
    if rules.is_empty() {
        return Err(EngineError::NoRulesLoaded);
    }
    Ok(engine::scan(input, rules, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_returns_output_and_calls() {
        let rules = RuleSet::compile(&[("", "(ab)", r#"X$note("\1");"#)]).unwrap();
        let res = rewrite("zabz", &rules).unwrap();

        assert_eq!(res.output, "zXz");
        assert_eq!(
            res.calls,
            vec![CallInvocation {
                name: "note".into(),
                args: vec!["ab".into()],
            }]
        );
    }

    #[test]
    fn dispatch_delivers_in_emission_order() {
        let rules = RuleSet::compile(&[("", "(a)", r#"$f("\1");$g("\1");"#)]).unwrap();
        let mut collected = CollectedCalls::default();
        let res =
            rewrite_dispatch("aa", &rules, &Options::default(), &mut collected).unwrap();

        let names: Vec<&str> = collected.calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["f", "g", "f", "g"]);
        assert_eq!(collected.calls, res.calls);
    }

    #[test]
    fn empty_rule_set_is_a_caller_error() {
        let rules = RuleSet::new(vec![]);
        assert_eq!(rewrite("x", &rules).unwrap_err(), EngineError::NoRulesLoaded);
    }

    #[test]
    fn verbose_details_count_rule_activity() {
        let rules = RuleSet::compile(&[("", "a", "b"), ("", "zz", "y")]).unwrap();
        let res = rewrite_verbose_with("aca", &rules, &Options::default()).unwrap();

        assert_eq!(res.output, "bcb");
        assert_eq!(res.details.matched, 2);
        assert_eq!(res.details.copied, 1);
        assert_eq!(res.details.rules[0].matches, 2);
        assert_eq!(res.details.rules[1].matches, 0);
        // The 'zz' rule is gated on 'z' and never even attempted here.
        assert_eq!(res.details.rules[1].attempts, 0);
    }
}
