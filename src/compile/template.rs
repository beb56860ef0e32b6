//! Substitution-template compiler.
//!
//! Turns the lexed subst source into a [`Template`] segment sequence:
//!
//! - `\1`..`\9` become capture references, checked against the paired
//!   pattern's capture count.
//! - Other passed-through escapes (`\~`, `\f`, ...) become opaque
//!   escaped-literal segments; the host renderer owns their meaning and
//!   they reach the output verbatim.
//! - `$name(...)` with an identifier directly before the `(` is a
//!   call-expression; a bare `$` is just a dollar sign.
//!
//! Call arguments are the delicate part. Each argument is a quoted
//! sub-template, and inside the argument list quote delimiters are scoped
//! to the current argument: an unescaped quote closes the current literal
//! and the next one reopens a literal that concatenates with what came
//! before, so `"prefix"\1"suffix"` is one continuous literal-plus-reference
//! run. Capture references and nested calls may sit both inside and between
//! the quoted pieces; `,` and `)` only count as delimiters while no literal
//! is open. The compiler tracks that state explicitly so an argument's
//! quotes are never confused with the quotes of an enclosing template.

use crate::compile::Tok;
use crate::error::TemplateError;
use crate::{CallExpr, Template, TemplateSegment};

pub(crate) fn compile_template(
    tokens: &[Tok],
    captures: u32,
) -> Result<Template, TemplateError> {
    Parser {
        tokens,
        pos: 0,
        captures,
    }
    .parse_top()
}

struct Parser<'a> {
    tokens: &'a [Tok],
    pos: usize,
    captures: u32,
}

impl Parser<'_> {
    fn parse_top(&mut self) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();

        while let Some(&tok) = self.tokens.get(self.pos) {
            match tok {
                Tok::Char('$') if self.call_ahead() => {
                    flush(&mut segments, &mut literal);
                    let call = self.parse_call()?;
                    segments.push(TemplateSegment::Call(call));
                }
                Tok::Escape(c) if c.is_ascii_digit() => {
                    flush(&mut segments, &mut literal);
                    segments.push(TemplateSegment::Capture(self.capture_ref(c)?));
                    self.pos += 1;
                }
                Tok::Escape(c) => {
                    flush(&mut segments, &mut literal);
                    segments.push(TemplateSegment::EscapedLiteral(format!("\\{c}")));
                    self.pos += 1;
                }
                Tok::Char(c) | Tok::Escaped(c) => {
                    literal.push(c);
                    self.pos += 1;
                }
                Tok::Quote => {
                    literal.push('"');
                    self.pos += 1;
                }
            }
        }
        flush(&mut segments, &mut literal);
        Ok(Template { segments })
    }

    /// True when the tokens at the cursor spell `$ident(`.
    ///
    /// Only plain characters count: an escaped `(` or quote never turns a
    /// dollar sign into a call.
    fn call_ahead(&self) -> bool {
        let mut j = self.pos + 1;
        let mut ident_len = 0;
        while let Some(Tok::Char(c)) = self.tokens.get(j) {
            match c {
                '_' => {}
                c if c.is_ascii_alphabetic() => {}
                c if c.is_ascii_digit() && ident_len > 0 => {}
                '(' => return ident_len > 0,
                _ => return false,
            }
            ident_len += 1;
            j += 1;
        }
        false
    }

    /// Parse `$name(arg, ...)` with an optional trailing `;`.
    ///
    /// The cursor sits on the `$`; `call_ahead` has already vetted the
    /// shape through the opening parenthesis.
    fn parse_call(&mut self) -> Result<CallExpr, TemplateError> {
        self.pos += 1;
        let mut name = String::new();
        while let Some(Tok::Char(c)) = self.tokens.get(self.pos) {
            if *c == '_' || c.is_ascii_alphanumeric() {
                name.push(*c);
                self.pos += 1;
            } else {
                break;
            }
        }
        self.pos += 1; // the '(' vetted by call_ahead

        let mut args = Vec::new();
        if matches!(self.tokens.get(self.pos), Some(Tok::Char(')'))) {
            self.pos += 1;
        } else {
            loop {
                args.push(self.parse_arg(&name)?);
                match self.tokens.get(self.pos) {
                    Some(Tok::Char(',')) => self.pos += 1,
                    Some(Tok::Char(')')) => {
                        self.pos += 1;
                        break;
                    }
                    _ => return Err(TemplateError::UnbalancedCallQuotes),
                }
            }
        }

        if matches!(self.tokens.get(self.pos), Some(Tok::Char(';'))) {
            self.pos += 1;
        }
        Ok(CallExpr { name, args })
    }

    /// Parse one argument sub-template, leaving the cursor on the `,` or
    /// `)` that ended it.
    fn parse_arg(&mut self, call: &str) -> Result<Template, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut in_quotes = false;

        loop {
            let Some(&tok) = self.tokens.get(self.pos) else {
                return Err(TemplateError::UnbalancedCallQuotes);
            };
            match tok {
                Tok::Quote => {
                    // Closing then reopening concatenates; the literal
                    // accumulator just keeps going.
                    in_quotes = !in_quotes;
                    self.pos += 1;
                }
                Tok::Escape(c) if c.is_ascii_digit() => {
                    flush(&mut segments, &mut literal);
                    segments.push(TemplateSegment::Capture(self.capture_ref(c)?));
                    self.pos += 1;
                }
                Tok::Escape(c) => {
                    flush(&mut segments, &mut literal);
                    segments.push(TemplateSegment::EscapedLiteral(format!("\\{c}")));
                    self.pos += 1;
                }
                Tok::Char('$') if !in_quotes && self.call_ahead() => {
                    flush(&mut segments, &mut literal);
                    let call = self.parse_call()?;
                    segments.push(TemplateSegment::Call(call));
                }
                Tok::Char(',' | ')') if !in_quotes => {
                    flush(&mut segments, &mut literal);
                    return Ok(Template { segments });
                }
                Tok::Char(c) if !in_quotes => {
                    if c.is_whitespace() {
                        self.pos += 1;
                    } else {
                        return Err(TemplateError::MalformedCall(format!(
                            "unexpected '{c}' in arguments of ${call}"
                        )));
                    }
                }
                Tok::Char(c) | Tok::Escaped(c) => {
                    literal.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn capture_ref(&self, digit: char) -> Result<u32, TemplateError> {
        let n = u32::from(digit as u8 - b'0');
        if n == 0 || n > self.captures {
            return Err(TemplateError::UndefinedCapture(n));
        }
        Ok(n)
    }
}

fn flush(segments: &mut Vec<TemplateSegment>, literal: &mut String) {
    if !literal.is_empty() {
        segments.push(TemplateSegment::Literal(std::mem::take(literal)));
    }
}
