//! Rule-source tokenizer.
//!
//! Resolves exactly one layer of backslash escaping and strips an optional
//! pair of outer quote delimiters:
//!
//! - `\\` and `\"` become the plain character, marked inert so downstream
//!   compilers never re-interpret it.
//! - Any other `\X` is carried through as a two-character escape token; the
//!   pattern and template compilers decide what `\1`, `\q`, `\f`, ... mean.
//! - An unescaped interior `"` becomes a quote token. The template compiler
//!   uses these as argument delimiters inside call-expressions; everywhere
//!   else they read as a literal quote character.

use crate::error::LexError;

/// One lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tok {
    /// An ordinary character, still subject to downstream interpretation.
    Char(char),
    /// A character produced by resolving `\\` or `\"`; inert downstream.
    Escaped(char),
    /// A two-character escape (`\X`) carried to the next stage.
    Escape(char),
    /// An unescaped interior quote.
    Quote,
}

/// Tokenize one raw source string.
///
/// If the source begins with an unescaped `"` it is quote-delimited: the
/// final character must be an unescaped `"` and both delimiters are
/// stripped. A source not beginning with `"` is taken bare, in full.
pub(crate) fn lex(source: &str) -> Result<Vec<Tok>, LexError> {
    let chars: Vec<char> = source.chars().collect();
    let delimited = chars.first() == Some(&'"');
    let mut tokens = Vec::with_capacity(chars.len());
    let mut closed = false;
    let mut i = usize::from(delimited);

    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            let Some(&next) = chars.get(i + 1) else {
                return Err(LexError::DanglingEscape);
            };
            match next {
                '\\' | '"' => tokens.push(Tok::Escaped(next)),
                other => tokens.push(Tok::Escape(other)),
            }
            i += 2;
            continue;
        }
        if c == '"' {
            if delimited && i == chars.len() - 1 {
                closed = true;
            } else {
                tokens.push(Tok::Quote);
            }
            i += 1;
            continue;
        }
        tokens.push(Tok::Char(c));
        i += 1;
    }

    if delimited && !closed {
        return Err(LexError::UnterminatedLiteral);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_source_is_taken_in_full() {
        assert_eq!(
            lex("ab").unwrap(),
            vec![Tok::Char('a'), Tok::Char('b')]
        );
    }

    #[test]
    fn delimiters_are_stripped() {
        assert_eq!(
            lex("\"ab\"").unwrap(),
            vec![Tok::Char('a'), Tok::Char('b')]
        );
    }

    #[test]
    fn one_escape_layer_is_resolved() {
        // \\ and \" resolve here; \q is someone else's problem.
        assert_eq!(
            lex(r#"\\\"\q"#).unwrap(),
            vec![Tok::Escaped('\\'), Tok::Escaped('"'), Tok::Escape('q')]
        );
    }

    #[test]
    fn interior_quotes_become_quote_tokens() {
        assert_eq!(
            lex(r#"a"b"c"#).unwrap(),
            vec![
                Tok::Char('a'),
                Tok::Quote,
                Tok::Char('b'),
                Tok::Quote,
                Tok::Char('c'),
            ]
        );
    }

    #[test]
    fn interior_quotes_inside_delimited_source() {
        assert_eq!(
            lex(r#""a"b""#).unwrap(),
            vec![Tok::Char('a'), Tok::Quote, Tok::Char('b')]
        );
    }

    #[test]
    fn unterminated_literal_is_rejected() {
        assert_eq!(lex("\"ab"), Err(LexError::UnterminatedLiteral));
        assert_eq!(lex("\""), Err(LexError::UnterminatedLiteral));
        // The would-be closer is escaped, so the literal never ends.
        assert_eq!(lex(r#""ab\""#), Err(LexError::UnterminatedLiteral));
    }

    #[test]
    fn dangling_escape_is_rejected() {
        assert_eq!(lex("ab\\"), Err(LexError::DanglingEscape));
        assert_eq!(lex("\"ab\\"), Err(LexError::DanglingEscape));
    }

    #[test]
    fn empty_sources() {
        assert_eq!(lex("").unwrap(), vec![]);
        assert_eq!(lex("\"\"").unwrap(), vec![]);
    }
}
