//! Error taxonomy for rule compilation and engine use.
//!
//! Every error here is a non-retryable input-validation failure: a failed
//! compilation is fatal to that one rule, and the host decides whether to
//! skip it or abort the whole set. Once a rule set compiles, rewriting
//! cannot fail beyond the empty-set misuse case — matching and expansion
//! are total over any input.

use thiserror::Error;

/// Malformed rule-definition source, caught while tokenizing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LexError {
    /// A quote-delimited literal was opened but never closed.
    #[error("unterminated quoted literal")]
    UnterminatedLiteral,
    /// A backslash was the last character of the source.
    #[error("dangling escape at end of input")]
    DanglingEscape,
}

/// Malformed match pattern.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    /// Capture-group delimiters do not nest correctly.
    #[error("capture group delimiters do not balance")]
    UnbalancedGroup,
    /// The pattern has no atom that consumes input, so applying it could
    /// never advance the scan.
    #[error("pattern cannot consume any input")]
    EmptyPattern,
}

/// Malformed or inconsistent substitution template.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A capture reference names a group the paired pattern does not have.
    #[error("capture reference \\{0} exceeds the pattern's capture count")]
    UndefinedCapture(u32),
    /// Quote delimiters inside a call-expression's argument list cannot be
    /// paired up, or the list itself is unterminated.
    #[error("unbalanced quotes inside call arguments")]
    UnbalancedCallQuotes,
    /// Stray content inside an argument list that is neither a quoted
    /// piece, a capture reference, a nested call, nor spacing.
    #[error("malformed call expression: {0}")]
    MalformedCall(String),
}

/// Umbrella error for compiling one rule-definition triple.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The flags string names an option this engine does not recognize.
    #[error("unknown rule flag '{0}'")]
    UnknownFlag(char),
    /// A directive did not have the `flags/match/subst/` shape.
    #[error("malformed directive (expected flags/match/subst/)")]
    MalformedDirective,
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Pattern(#[from] PatternError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Misuse of the engine API.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Applying an empty rule set is treated as misconfiguration, not a
    /// no-op.
    #[error("no rules loaded")]
    NoRulesLoaded,
}

/// Error from the line-oriented directive loader, tagged with the 1-based
/// line number of the offending directive.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LoadError {
    pub line: usize,
    #[source]
    pub source: CompileError,
}
