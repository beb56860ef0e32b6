//! Rule compilation pipeline.
//!
//! One rule definition arrives as three raw strings — flags, match source,
//! subst source — and leaves as an immutable [`Rule`]. The pipeline:
//!
//! ```text
//! flags ────────── RuleFlags::parse ──────────────┐
//!                                                 │
//! match source ── lex (lexer.rs) ── tokens ──┐    │
//!                                            │    │
//!                       compile_pattern ─────┼────┼── Pattern
//!                       (pattern.rs)         │    │      │ capture count
//!                                            │    │      v
//! subst source ── lex (lexer.rs) ── tokens ──┴── compile_template ── Template
//!                                                (template.rs)
//! ```
//!
//! The lexer resolves exactly one layer of backslash escaping; everything
//! else that looks special (`\1`, `\q`, interior quotes, metacharacters)
//! reaches the pattern and template compilers as typed tokens and is
//! interpreted there. The template compiler receives the pattern's capture
//! count so that dangling capture references are rejected here, at compile
//! time, never during a rewrite.
//!
//! Compilation is a pure function of its inputs and is safe to run
//! concurrently across independent rule definitions.

#[path = "compile/lexer.rs"]
mod lexer;
#[path = "compile/pattern.rs"]
mod pattern;
#[path = "compile/template.rs"]
mod template;

pub(crate) use lexer::{Tok, lex};
#[cfg(test)]
pub(crate) use pattern::compile_pattern;

use crate::error::CompileError;
use crate::{Rule, RuleFlags};

/// Compile one rule-definition triple into a [`Rule`].
pub(crate) fn compile_rule(
    flags_source: &str,
    match_source: &str,
    subst_source: &str,
) -> Result<Rule, CompileError> {
    let flags = RuleFlags::parse(flags_source)?;
    let match_tokens = lexer::lex(match_source)?;
    let subst_tokens = lexer::lex(subst_source)?;
    let pattern = pattern::compile_pattern(&match_tokens)?;
    let template = template::compile_template(&subst_tokens, pattern.captures)?;
    tracing::debug!(
        source = match_source,
        captures = pattern.captures,
        ?flags,
        "compiled rule"
    );
    Ok(Rule {
        flags,
        pattern,
        template,
        source: match_source.to_string(),
    })
}
