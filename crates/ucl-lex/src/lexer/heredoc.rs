//! Heredoc lexing.
//!
//! `<<TAG\n...\nTAG\n` — `TAG` is one or more uppercase letters. The body is
//! the exact bytes between the newline after `TAG` and a line that is
//! exactly `TAG` at the start of a line; no escape processing happens.

use crate::{Lexer, Token};
use std::borrow::Cow;
use ucl_util::ParseError;

impl<'source> Lexer<'source> {
    pub(crate) fn lex_heredoc(&mut self) -> Result<Token<'source>, ParseError> {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_column = self.cursor.column();

        self.cursor.advance_n(2); // "<<"

        let tag_start = self.cursor.position();
        while self
            .cursor
            .current_byte()
            .is_some_and(|b| b.is_ascii_uppercase())
        {
            self.cursor.advance();
        }
        let tag = self.cursor.slice_from(tag_start);

        if tag.is_empty() {
            return Err(ParseError::syntax(
                "heredoc tag must be one or more uppercase letters",
                self.span_from(start, start_line, start_column),
            ));
        }

        if self.cursor.current_byte() != Some(b'\n') {
            return Err(ParseError::syntax(
                "expected newline after heredoc tag",
                self.span_from(start, start_line, start_column),
            ));
        }
        self.cursor.advance(); // the newline that opens the body

        let body_start = self.cursor.position();
        let source = self.cursor.source();

        loop {
            if self.cursor.is_at_end() {
                return Err(ParseError::syntax(
                    format!("unterminated heredoc, expected closing '{}'", tag_to_str(tag)),
                    self.span_from(start, start_line, start_column),
                ));
            }

            let line_start = self.cursor.position();
            if source[line_start..].starts_with(tag) {
                let after_tag = line_start + tag.len();
                let is_line_end = match source.get(after_tag) {
                    Some(b) => *b == b'\n' || *b == b'\r',
                    None => true,
                };
                if is_line_end {
                    let body = &source[body_start..line_start];
                    self.cursor.advance_n(tag.len());
                    if self.cursor.current_byte() == Some(b'\r') {
                        self.cursor.advance();
                    }
                    if self.cursor.current_byte() == Some(b'\n') {
                        self.cursor.advance();
                    }
                    return Ok(Token::Heredoc(Cow::Borrowed(body)));
                }
            }

            while self.cursor.current_byte().is_some_and(|b| b != b'\n') {
                self.cursor.advance();
            }
            if self.cursor.current_byte() == Some(b'\n') {
                self.cursor.advance();
            }
        }
    }
}

fn tag_to_str(tag: &[u8]) -> &str {
    std::str::from_utf8(tag).unwrap_or("?")
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use std::borrow::Cow;

    #[test]
    fn simple_heredoc() {
        let mut lexer = Lexer::new(b"<<EOF\nhello\nworld\nEOF\n");
        match lexer.next_token().unwrap() {
            Token::Heredoc(Cow::Borrowed(b)) => assert_eq!(b, b"hello\nworld\n"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_body() {
        let mut lexer = Lexer::new(b"<<END\nEND\n");
        match lexer.next_token().unwrap() {
            Token::Heredoc(b) => assert_eq!(&*b, b""),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn tag_substring_inside_body_does_not_close() {
        let mut lexer = Lexer::new(b"<<EOF\nEOFISH\nEOF\n");
        match lexer.next_token().unwrap() {
            Token::Heredoc(b) => assert_eq!(&*b, b"EOFISH\n"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_closing_tag_errors() {
        let mut lexer = Lexer::new(b"<<EOF\nhello\n");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn lowercase_tag_rejected() {
        let mut lexer = Lexer::new(b"<<eof\nhello\neof\n");
        assert!(lexer.next_token().is_err());
    }
}
