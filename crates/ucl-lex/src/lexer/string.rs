//! Quoted-string lexing.
//!
//! `"..."` is JSON-style: control bytes below `0x20` are rejected inside the
//! literal, and `\" \\ \/ \b \f \n \r \t \uXXXX` are the only recognised
//! escapes. `\u` always consumes exactly four hex digits; a surrogate-less
//! BMP code point is encoded as 1-3 UTF-8 bytes, non-BMP as 4. A code point
//! above `U+10FFFF` can't arise from a 4-digit `\u` escape, but a lone
//! high/low surrogate is not a valid `char` either — both cases emit `?`
//! rather than failing the whole literal.
use crate::{Lexer, Token};
use std::borrow::Cow;
use ucl_util::ParseError;

impl<'source> Lexer<'source> {
    pub(crate) fn lex_quoted_string(&mut self) -> Result<Token<'source>, ParseError> {
        let start = self.cursor.position();
        let start_line = self.cursor.line();
        let start_column = self.cursor.column();

        self.cursor.advance(); // opening quote
        let body_start = self.cursor.position();
        let mut needs_escape = false;

        // First pass: find the closing quote without allocating, so plain
        // strings (the common case) can be returned as a borrowed slice.
        loop {
            match self.cursor.current_byte() {
                None => {
                    return Err(ParseError::syntax(
                        "unterminated quoted string",
                        self.span_from(start, start_line, start_column),
                    ))
                }
                Some(b'"') => break,
                Some(b'\\') => {
                    needs_escape = true;
                    self.cursor.advance();
                    if self.cursor.current_byte().is_none() {
                        return Err(ParseError::syntax(
                            "unterminated escape sequence",
                            self.span_from(start, start_line, start_column),
                        ));
                    }
                    self.cursor.advance();
                }
                Some(b) if b < 0x20 => {
                    return Err(ParseError::syntax(
                        format!("control byte 0x{b:02x} in quoted string"),
                        self.span_from(start, start_line, start_column),
                    ));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        let body = self.cursor.slice_from(body_start);
        self.cursor.advance(); // closing quote

        if !needs_escape {
            return Ok(Token::QuotedString(Cow::Borrowed(body)));
        }

        Ok(Token::QuotedString(Cow::Owned(decode_escapes(
            body,
            start,
            start_line,
            start_column,
        )?)))
    }
}

fn decode_escapes(
    body: &[u8],
    start: usize,
    start_line: u32,
    start_column: u32,
) -> Result<Vec<u8>, ParseError> {
    let err = |message: String| {
        ParseError::syntax(message, ucl_util::Span::new(start, start, start_line, start_column))
    };

    let mut out = Vec::with_capacity(body.len());
    let mut i = 0usize;
    while i < body.len() {
        let b = body[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        i += 1;
        let escape = *body.get(i).ok_or_else(|| err("truncated escape".into()))?;
        i += 1;
        match escape {
            b'"' => out.push(b'"'),
            b'\\' => out.push(b'\\'),
            b'/' => out.push(b'/'),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0C),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'u' => {
                if i + 4 > body.len() {
                    return Err(err("truncated \\u escape".into()));
                }
                let hex = std::str::from_utf8(&body[i..i + 4])
                    .ok()
                    .and_then(|s| u32::from_str_radix(s, 16).ok())
                    .ok_or_else(|| err("invalid \\u escape".into()))?;
                i += 4;
                match char::from_u32(hex) {
                    Some(c) => {
                        let mut buf = [0u8; 4];
                        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                    }
                    None => out.push(b'?'),
                }
            }
            other => {
                return Err(err(format!("unknown escape '\\{}'", other as char)));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use crate::{Lexer, Token};
    use std::borrow::Cow;

    fn lex_str(source: &[u8]) -> Token<'_> {
        Lexer::new(source).next_token().unwrap()
    }

    #[test]
    fn plain_string_borrows() {
        match lex_str(br#""hello""#) {
            Token::QuotedString(Cow::Borrowed(b)) => assert_eq!(b, b"hello"),
            other => panic!("expected borrowed string, got {other:?}"),
        }
    }

    #[test]
    fn escape_sequences() {
        match lex_str(br#""a\nb\tc\"d""#) {
            Token::QuotedString(s) => assert_eq!(&*s, b"a\nb\tc\"d"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unicode_escape() {
        match lex_str(br#""é""#) {
            Token::QuotedString(s) => assert_eq!(&*s, "é".as_bytes()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn surrogate_escape_emits_question_mark() {
        match lex_str(br#""\ud800""#) {
            Token::QuotedString(s) => assert_eq!(&*s, b"?"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn control_byte_is_error() {
        let mut lexer = Lexer::new(b"\"a\nb\"");
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn unterminated_string_is_error() {
        let mut lexer = Lexer::new(b"\"abc");
        assert!(lexer.next_token().is_err());
    }
}
