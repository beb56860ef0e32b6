extern crate self as kaeru;

#[macro_use]
mod macros;
mod api;
mod compile;
mod engine;
mod error;
mod rules;

pub use api::{
    CallDispatcher, CollectedCalls, Options, RewriteResult, RewriteResultVerbose, RuleStats,
    RunDetails, compile, rewrite, rewrite_dispatch, rewrite_verbose_with, rewrite_with,
};
pub use error::{CompileError, EngineError, LexError, LoadError, PatternError, TemplateError};
pub use rules::stock;

// --- Rule flags -------------------------------------------------------------

bitflags::bitflags! {
    /// Per-rule options parsed from the flags string.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RuleFlags: u8 {
        /// `s`: line boundaries are ordinary matchable characters, and the
        /// edge anchors refer to the whole input instead of one line.
        const SINGLE_LINE = 1 << 0;
        /// `g`: accepted for compatibility with existing rule sources. The
        /// scan already applies a rule at every position, so this is inert.
        const GLOBAL = 1 << 1;
    }
}

impl RuleFlags {
    /// Parse a flags string (`""`, `"s"`, `"sg"`, ...).
    ///
    /// Unknown letters fail compilation rather than being silently ignored.
    pub(crate) fn parse(source: &str) -> Result<Self, CompileError> {
        let mut flags = RuleFlags::empty();
        for ch in source.chars() {
            match ch {
                's' => flags |= RuleFlags::SINGLE_LINE,
                'g' => flags |= RuleFlags::GLOBAL,
                other => return Err(CompileError::UnknownFlag(other)),
            }
        }
        Ok(flags)
    }
}

// --- Compiled pattern -------------------------------------------------------

/// One atom of a compiled match pattern.
///
/// The metacharacter set is deliberately small: `(` `)` capture groups, `.`
/// and `.*`, and the `^`/`$` edge anchors. Everything else is a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PatternAtom {
    /// A run of characters that must appear verbatim.
    Literal(String),
    /// `.`: any single character.
    AnyChar,
    /// `.*`: a greedy any-sequence run, re-evaluated by backtracking when a
    /// later atom fails to align.
    WildcardRun,
    /// `(`: start of capture group `n` (1-based, numbered by opening
    /// position, left to right).
    GroupOpen(u32),
    /// `)`: end of capture group `n`.
    GroupClose(u32),
    /// `^` in leading position.
    LineStart,
    /// `$` in trailing position.
    LineEnd,
}

/// A compiled match pattern: a linear atom sequence plus capture bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub(crate) atoms: Vec<PatternAtom>,
    pub(crate) captures: u32,
}

impl Pattern {
    /// Number of capture groups in this pattern.
    pub fn capture_count(&self) -> u32 {
        self.captures
    }
}

// --- Compiled template ------------------------------------------------------

/// One segment of a compiled substitution template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TemplateSegment {
    /// Verbatim output text.
    Literal(String),
    /// `\n`: the text captured by group `n`.
    Capture(u32),
    /// An opaque two-character escape (`\~`, `\f`, ...) passed through
    /// verbatim for the host renderer to interpret.
    EscapedLiteral(String),
    /// `$name("arg", ...)`: an external-call expression.
    Call(CallExpr),
}

/// A call-expression: function name plus templated arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CallExpr {
    pub name: String,
    pub args: Vec<Template>,
}

/// A compiled substitution template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub(crate) segments: Vec<TemplateSegment>,
}

// --- Rules ------------------------------------------------------------------

/// A compiled rewrite rule: flags + pattern + template.
///
/// Immutable once compiled; lives for the lifetime of its [`RuleSet`].
#[derive(Debug, Clone)]
pub struct Rule {
    pub(crate) flags: RuleFlags,
    pub(crate) pattern: Pattern,
    pub(crate) template: Template,
    /// The raw match source, kept for reporting.
    pub(crate) source: String,
}

impl Rule {
    /// The raw match source this rule was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The rule's flags.
    pub fn flags(&self) -> RuleFlags {
        self.flags
    }

    /// First input byte this rule can possibly match, when statically known.
    ///
    /// The scanner uses this to skip rules cheaply; `None` means the rule
    /// must be tried at every position. The gate is an over-approximation
    /// filter only and never changes which rule wins.
    fn gate_byte(&self) -> Option<u8> {
        for atom in &self.pattern.atoms {
            match atom {
                PatternAtom::GroupOpen(_) | PatternAtom::GroupClose(_) | PatternAtom::LineStart => {
                    continue;
                }
                PatternAtom::Literal(text) => return text.as_bytes().first().copied(),
                _ => return None,
            }
        }
        None
    }
}

/// An ordered rule collection plus a cheap per-rule activation gate.
///
/// Order is significant: the scan tries rules in declaration order and the
/// first match at a position wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    pub(crate) rules: Vec<Rule>,
    /// Leading-byte gates, aligned with `rules`.
    pub(crate) gates: Vec<Option<u8>>,
}

impl RuleSet {
    /// Build a rule set from already-compiled rules, preserving order.
    pub fn new(rules: Vec<Rule>) -> Self {
        let gates = rules.iter().map(Rule::gate_byte).collect();
        RuleSet { rules, gates }
    }

    /// Compile a list of `(flags, match, subst)` triples, in order.
    ///
    /// The first bad triple aborts the whole set; hosts that prefer to skip
    /// bad rules can compile triples one at a time with [`compile`].
    pub fn compile(defs: &[(&str, &str, &str)]) -> Result<Self, CompileError> {
        let rules = defs
            .iter()
            .map(|(flags, m, s)| compile::compile_rule(flags, m, s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// The rules, in declaration order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// --- Match results and emitted calls ----------------------------------------

/// A byte span into the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Start byte index (inclusive).
    pub start: usize,
    /// End byte index (exclusive).
    pub end: usize,
}

/// Result of matching one rule at one position.
#[derive(Debug, Clone)]
pub(crate) struct MatchResult {
    /// The matched span.
    pub span: Span,
    /// Captured spans, indexed by group number minus one. Every group lies
    /// on the single linear match path, so all entries are populated.
    pub captures: Vec<Span>,
}

/// One emitted external call: function name plus fully resolved arguments.
///
/// Emitted in left-to-right, depth-first order as templates expand; an
/// argument's own calls come before the call that encloses them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallInvocation {
    pub name: String,
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_known_letters() {
        assert_eq!(RuleFlags::parse("").unwrap(), RuleFlags::empty());
        assert_eq!(RuleFlags::parse("s").unwrap(), RuleFlags::SINGLE_LINE);
        assert_eq!(
            RuleFlags::parse("sg").unwrap(),
            RuleFlags::SINGLE_LINE | RuleFlags::GLOBAL
        );
    }

    #[test]
    fn flags_reject_unknown_letters() {
        assert_eq!(RuleFlags::parse("x"), Err(CompileError::UnknownFlag('x')));
        assert_eq!(RuleFlags::parse("sx"), Err(CompileError::UnknownFlag('x')));
    }

    #[test]
    fn gate_byte_skips_group_markers() {
        let set = RuleSet::compile(&[("", "(abc)", "\\1")]).unwrap();
        assert_eq!(set.gates[0], Some(b'a'));
    }

    #[test]
    fn gate_byte_is_none_for_wildcard_start() {
        let set = RuleSet::compile(&[("", ".*x", "y")]).unwrap();
        assert_eq!(set.gates[0], None);
    }
}
