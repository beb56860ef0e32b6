//! Stock macro rules and the directive loader.
//!
//! Rule definitions ship as `flags/match/subst/` directives — three
//! `/`-separated fields with `\/` escaping a literal slash — optionally
//! wrapped in a `#subst "..."` line as they appear in script sources. The
//! stock set carries the classic pause and dictionary-registration macros
//! and doubles as a realistic fixture for tests and the CLI.

use once_cell::sync::Lazy;

use crate::error::{CompileError, LoadError};
use crate::{Rule, RuleSet};

static STOCK: Lazy<RuleSet> = Lazy::new(|| {
    RuleSet::from_directives(STOCK_DIRECTIVES).expect("stock directives compile")
});

/// Directives for the built-in macro set.
///
/// - `\q` pauses without displaying anything: it expands to the pause call
///   pair wrapped in `\~` display-control escapes.
/// - `（word）＊` and `＊（word）` register `word` into the conversation
///   dictionary and decorate it with the annotation glyph.
const STOCK_DIRECTIVES: &str = r#"
// pause with no visible text
#subst "s/\q/\~$pause_set_altwink();$pause();\~/"

// dictionary registration, marker after the word
#subst "s/（(.*)）＊/\1\f(12)※\f(#confont_yl@SYSTEM)$dic_add_word_con("\1");*/"

// dictionary registration, marker before the word
#subst "s/＊（(.*)）/\f(12)※\f(#confont_yl@SYSTEM)$dic_add_word_con("\1");*\1/"
"#;

/// The built-in macro rule set.
pub fn stock() -> &'static RuleSet {
    &STOCK
}

impl Rule {
    /// Parse and compile one `flags/match/subst/` directive.
    pub fn from_directive(directive: &str) -> Result<Rule, CompileError> {
        let [flags, match_source, subst_source] =
            split_directive(directive).ok_or(CompileError::MalformedDirective)?;
        crate::compile::compile_rule(&flags, &match_source, &subst_source)
    }
}

impl RuleSet {
    /// Compile a line-oriented directive source, in file order.
    ///
    /// `#subst "..."` lines and bare directives are accepted; blank lines
    /// and `//` comment lines are skipped. Errors carry the 1-based line
    /// number, so a host can report or skip the offending rule.
    pub fn from_directives(source: &str) -> Result<RuleSet, LoadError> {
        let mut rules = Vec::new();
        for (index, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            let directive = match line.strip_prefix("#subst") {
                Some(rest) => unwrap_quoted(rest.trim()),
                None => line,
            };
            let rule = Rule::from_directive(directive).map_err(|source| LoadError {
                line: index + 1,
                source,
            })?;
            rules.push(rule);
        }
        Ok(RuleSet::new(rules))
    }
}

/// Split `flags/match/subst/` on unescaped slashes.
///
/// `\/` collapses to a literal slash here; every other escape is left
/// intact for the lexer, which owns backslash handling.
fn split_directive(directive: &str) -> Option<[String; 3]> {
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = directive.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('/') => current.push('/'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                // A trailing backslash is the lexer's error to report.
                None => current.push('\\'),
            },
            '/' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }

    if fields.len() == 3 && current.is_empty() {
        let mut fields = fields.into_iter();
        Some([fields.next()?, fields.next()?, fields.next()?])
    } else {
        None
    }
}

/// Strip the `"..."` wrapper of a `#subst` payload; interior quotes stay.
fn unwrap_quoted(payload: &str) -> &str {
    if payload.len() >= 2 && payload.starts_with('"') && payload.ends_with('"') {
        &payload[1..payload.len() - 1]
    } else {
        payload
    }
}
