//! Comment and whitespace skipping.
//!
//! `#` runs to end of line. `/* ... */` nests, tracked with a depth
//! counter; an unbalanced nesting is a [`ucl_util::ParserErrorKind::Nested`]
//! error rather than a plain syntax error, matching the error taxonomy's
//! distinct `nested` kind.

use crate::Lexer;
use ucl_util::ParseError;

/// Ceiling on `/* */` nesting depth before giving up, mirroring the
/// parser's own include/container recursion ceiling.
const MAX_COMMENT_DEPTH: u32 = 256;

impl<'source> Lexer<'source> {
    pub(crate) fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        if !self.bom_checked {
            self.bom_checked = true;
            const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];
            if self.cursor.remaining().starts_with(&BOM) {
                self.cursor.advance_n(3);
            }
        }

        loop {
            match self.cursor.current_byte() {
                None => return Ok(()),
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.cursor.advance();
                }
                Some(b'#') => {
                    self.skip_line_comment();
                }
                Some(b'/') if self.cursor.peek_byte(1) == Some(b'*') => {
                    self.skip_block_comment()?;
                }
                Some(_) => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.cursor.current_byte().is_some_and(|b| b != b'\n') {
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_column = self.cursor.column();

        self.cursor.advance_n(2); // "/*"
        let mut depth = 1u32;

        while depth > 0 {
            if self.cursor.is_at_end() {
                return Err(ParseError::nested(
                    "unterminated block comment",
                    self.span_from(start, start_line, start_column),
                ));
            }
            if depth > MAX_COMMENT_DEPTH {
                return Err(ParseError::nested(
                    format!("block comment nesting exceeds {MAX_COMMENT_DEPTH} levels"),
                    self.span_from(start, start_line, start_column),
                ));
            }

            if self.cursor.current_byte() == Some(b'/') && self.cursor.peek_byte(1) == Some(b'*')
            {
                self.cursor.advance_n(2);
                depth += 1;
            } else if self.cursor.current_byte() == Some(b'*')
                && self.cursor.peek_byte(1) == Some(b'/')
            {
                self.cursor.advance_n(2);
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};

    #[test]
    fn skips_line_comment() {
        let mut lexer = Lexer::new(b"# hello\nkey");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"key"));
    }

    #[test]
    fn skips_block_comment() {
        let mut lexer = Lexer::new(b"/* hello */key");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"key"));
    }

    #[test]
    fn nested_block_comment_balances() {
        let mut lexer = Lexer::new(b"/* outer /* inner */ outer */key");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"key"));
    }

    #[test]
    fn unbalanced_nesting_errors() {
        let mut lexer = Lexer::new(b"/* outer /* inner */");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn skips_bom() {
        let mut lexer = Lexer::new(b"\xEF\xBB\xBFkey");
        assert_eq!(lexer.next_token().unwrap(), Token::BareString(b"key"));
    }
}
