//! Match-pattern compiler.
//!
//! Turns the lexed match source into a linear [`PatternAtom`] sequence.
//! Capture groups are numbered 1-based, left to right, by the position of
//! their opening delimiter — nesting is allowed and follows the usual
//! group-numbering convention. `.` is any-char, `.*` a greedy wildcard run,
//! `^`/`$` anchor at the edges of the pattern only; everywhere else they
//! are plain characters, as is anything the lexer already resolved.
//!
//! Escape tokens the lexer passed through (`\q`, ...) match their own
//! two-character spelling, so a rule written against text that itself
//! contains backslash escapes works without double quoting.

use crate::compile::Tok;
use crate::error::PatternError;
use crate::{Pattern, PatternAtom};

pub(crate) fn compile_pattern(tokens: &[Tok]) -> Result<Pattern, PatternError> {
    let mut atoms: Vec<PatternAtom> = Vec::new();
    let mut literal = String::new();
    let mut open: Vec<u32> = Vec::new();
    let mut next_group: u32 = 0;

    fn flush(atoms: &mut Vec<PatternAtom>, literal: &mut String) {
        if !literal.is_empty() {
            atoms.push(PatternAtom::Literal(std::mem::take(literal)));
        }
    }

    let mut i = 0;
    while i < tokens.len() {
        match tokens[i] {
            Tok::Char('(') => {
                flush(&mut atoms, &mut literal);
                next_group += 1;
                open.push(next_group);
                atoms.push(PatternAtom::GroupOpen(next_group));
            }
            Tok::Char(')') => {
                flush(&mut atoms, &mut literal);
                let group = open.pop().ok_or(PatternError::UnbalancedGroup)?;
                atoms.push(PatternAtom::GroupClose(group));
            }
            Tok::Char('.') => {
                flush(&mut atoms, &mut literal);
                if matches!(tokens.get(i + 1), Some(Tok::Char('*'))) {
                    atoms.push(PatternAtom::WildcardRun);
                    i += 1;
                } else {
                    atoms.push(PatternAtom::AnyChar);
                }
            }
            Tok::Char('^') if i == 0 => atoms.push(PatternAtom::LineStart),
            Tok::Char('$') if i == tokens.len() - 1 => {
                flush(&mut atoms, &mut literal);
                atoms.push(PatternAtom::LineEnd);
            }
            Tok::Char(c) | Tok::Escaped(c) => literal.push(c),
            Tok::Escape(c) => {
                literal.push('\\');
                literal.push(c);
            }
            Tok::Quote => literal.push('"'),
        }
        i += 1;
    }
    flush(&mut atoms, &mut literal);

    if !open.is_empty() {
        return Err(PatternError::UnbalancedGroup);
    }

    let consumes = atoms.iter().any(|atom| {
        matches!(
            atom,
            PatternAtom::Literal(_) | PatternAtom::AnyChar | PatternAtom::WildcardRun
        )
    });
    if !consumes {
        return Err(PatternError::EmptyPattern);
    }

    Ok(Pattern {
        atoms,
        captures: next_group,
    })
}
