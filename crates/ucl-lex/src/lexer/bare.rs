//! Bare (unquoted) string and boolean-literal lexing.
//!
//! A bare atom runs until the first unescaped value-end byte, whitespace,
//! or comment start — except that `[`/`]` and `{`/`}` pairs inside the atom
//! are counted, so a matching pair doesn't terminate it early. Trailing
//! whitespace is stripped. Once the span is known, it's matched
//! case-insensitively against the boolean words and reclassified if it
//! matches.

use crate::charclass::CharClass;
use crate::{Lexer, Token};

const BOOLEAN_WORDS: &[(&str, bool)] = &[
    ("true", true),
    ("yes", true),
    ("on", true),
    ("false", false),
    ("no", false),
    ("off", false),
];

impl<'source> Lexer<'source> {
    pub(crate) fn lex_bare_string(&mut self, start: usize) -> Token<'source> {
        let mut bracket_depth = 0i32;
        let mut brace_depth = 0i32;

        loop {
            let Some(b) = self.cursor.current_byte() else {
                break;
            };

            match b {
                b'[' => {
                    bracket_depth += 1;
                    self.cursor.advance();
                }
                b']' if bracket_depth > 0 => {
                    bracket_depth -= 1;
                    self.cursor.advance();
                }
                b'{' => {
                    brace_depth += 1;
                    self.cursor.advance();
                }
                b'}' if brace_depth > 0 => {
                    brace_depth -= 1;
                    self.cursor.advance();
                }
                b'#' if bracket_depth == 0 && brace_depth == 0 => break,
                b'/' if bracket_depth == 0
                    && brace_depth == 0
                    && self.cursor.peek_byte(1) == Some(b'*') =>
                {
                    break
                }
                _ if bracket_depth == 0
                    && brace_depth == 0
                    && crate::charclass::test_character(
                        b,
                        CharClass::VALUE_END | CharClass::WHITESPACE,
                    ) =>
                {
                    break
                }
                _ => self.cursor.advance(),
            }
        }

        let mut end = self.cursor.position();
        let raw = self.cursor.source();
        while end > start && matches!(raw[end - 1], b' ' | b'\t' | b'\r' | b'\n') {
            end -= 1;
        }
        let span = &raw[start..end];

        if let Ok(text) = std::str::from_utf8(span) {
            let lower = text.to_ascii_lowercase();
            if let Some((_, value)) = BOOLEAN_WORDS.iter().find(|(word, _)| *word == lower) {
                return Token::Bool(*value);
            }
        }

        Token::BareString(span)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};

    #[test]
    fn plain_bare_word() {
        let mut lexer = Lexer::new(b"hello;");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"hello"));
    }

    #[test]
    fn stops_at_whitespace_and_trims() {
        let mut lexer = Lexer::new(b"hello world ;");
        assert_eq!(
            lexer.next_token().unwrap(),
            Token::BareString(b"hello world")
        );
    }

    #[test]
    fn boolean_words_reclassified() {
        for (word, expected) in [
            ("true", true),
            ("yes", true),
            ("on", true),
            ("false", false),
            ("no", false),
            ("off", false),
            ("TRUE", true),
        ] {
            let mut lexer = Lexer::new(word.as_bytes());
            assert_eq!(lexer.next_token().unwrap(), Token::Bool(expected));
        }
    }

    #[test]
    fn bracket_pairs_do_not_terminate() {
        let mut lexer = Lexer::new(b"a[b]c;");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"a[b]c"));
    }

    #[test]
    fn stops_at_comment_start() {
        let mut lexer = Lexer::new(b"hello#comment");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"hello"));
    }
}
