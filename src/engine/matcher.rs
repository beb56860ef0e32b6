//! Anchored pattern matcher.
//!
//! Matches one compiled [`Pattern`] at one byte position of the input.
//! Greedy wildcard runs create choice points on an explicit stack; when a
//! later atom fails to align, the most recent run shrinks by one character
//! and matching resumes after it. There is no recursion, so pathological
//! rule/input pairs cannot overflow the call stack — the worst case costs
//! time, never correctness.
//!
//! Capture spans are recorded on a side tape of group open/close events.
//! Each choice point remembers the tape length at its creation, so
//! backtracking rewinds captures together with the position.

use crate::{MatchResult, Pattern, PatternAtom, RuleFlags, Span};

/// A choice point created by a greedy wildcard run.
struct Choice {
    /// Index of the wildcard atom.
    atom: usize,
    /// Byte position where the run started.
    start: usize,
    /// Byte position the run currently extends to.
    end: usize,
    /// Capture-tape length when the choice point was created.
    tape_len: usize,
}

/// A group boundary recorded while matching.
#[derive(Clone, Copy)]
enum CaptureEvent {
    Open(u32, usize),
    Close(u32, usize),
}

/// Try to match `pattern` exactly at byte position `start`.
///
/// `start` must lie on a character boundary. Returns the matched span and
/// all capture spans, or `None`. A successful span may be empty when every
/// consuming atom matched zero characters; the scanner treats that as a
/// non-match to keep the scan advancing.
pub(crate) fn match_at(
    pattern: &Pattern,
    flags: RuleFlags,
    input: &str,
    start: usize,
) -> Option<MatchResult> {
    let single_line = flags.contains(RuleFlags::SINGLE_LINE);
    let atoms = &pattern.atoms;
    let mut stack: Vec<Choice> = Vec::new();
    let mut tape: Vec<CaptureEvent> = Vec::new();
    let mut atom = 0usize;
    let mut pos = start;

    loop {
        if atom == atoms.len() {
            return Some(build_result(pattern, &tape, start, pos));
        }
        let stepped = match &atoms[atom] {
            PatternAtom::Literal(text) => {
                if input[pos..].starts_with(text.as_str()) {
                    pos += text.len();
                    true
                } else {
                    false
                }
            }
            PatternAtom::AnyChar => match input[pos..].chars().next() {
                Some(c) if single_line || c != '\n' => {
                    pos += c.len_utf8();
                    true
                }
                _ => false,
            },
            PatternAtom::WildcardRun => {
                let end = run_end(input, pos, single_line);
                stack.push(Choice {
                    atom,
                    start: pos,
                    end,
                    tape_len: tape.len(),
                });
                pos = end;
                true
            }
            PatternAtom::GroupOpen(n) => {
                tape.push(CaptureEvent::Open(*n, pos));
                true
            }
            PatternAtom::GroupClose(n) => {
                tape.push(CaptureEvent::Close(*n, pos));
                true
            }
            PatternAtom::LineStart => at_line_start(input, pos, single_line),
            PatternAtom::LineEnd => at_line_end(input, pos, single_line),
        };

        if stepped {
            atom += 1;
            continue;
        }

        // Backtrack: shrink the most recent wildcard run by one character
        // and retry everything after it.
        loop {
            let choice = stack.pop()?;
            if choice.end > choice.start {
                let end = prev_char_boundary(input, choice.end);
                tape.truncate(choice.tape_len);
                pos = end;
                atom = choice.atom + 1;
                stack.push(Choice { end, ..choice });
                break;
            }
        }
    }
}

/// How far a wildcard run may extend from `pos`: to the end of the input
/// under single-line matching, otherwise up to (not across) the next line
/// boundary.
fn run_end(input: &str, pos: usize, single_line: bool) -> usize {
    if single_line {
        input.len()
    } else {
        input[pos..].find('\n').map_or(input.len(), |i| pos + i)
    }
}

fn at_line_start(input: &str, pos: usize, single_line: bool) -> bool {
    if single_line {
        pos == 0
    } else {
        pos == 0 || input.as_bytes()[pos - 1] == b'\n'
    }
}

fn at_line_end(input: &str, pos: usize, single_line: bool) -> bool {
    if single_line {
        pos == input.len()
    } else {
        pos == input.len() || input.as_bytes()[pos] == b'\n'
    }
}

fn prev_char_boundary(input: &str, index: usize) -> usize {
    let mut i = index - 1;
    while !input.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn build_result(pattern: &Pattern, tape: &[CaptureEvent], start: usize, end: usize) -> MatchResult {
    let mut captures = vec![Span { start: 0, end: 0 }; pattern.captures as usize];
    for event in tape {
        match *event {
            CaptureEvent::Open(n, pos) => captures[(n - 1) as usize].start = pos,
            CaptureEvent::Close(n, pos) => captures[(n - 1) as usize].end = pos,
        }
    }
    MatchResult {
        span: Span { start, end },
        captures,
    }
}
