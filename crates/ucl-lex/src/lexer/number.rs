//! Number, duration, and size-suffix lexing.
//!
//! A numeric atom is: optional sign, digits, optional `.`-fraction,
//! optional exponent, optional unit suffix. If the suffix fails to match
//! any recognised unit the whole attempt is abandoned — the caller
//! backtracks the cursor and relexes the atom as a bare string.

use crate::{charclass::CharClass, Lexer, Token};
use ucl_util::ParseError;

/// `(suffix, multiplier-in-seconds)`, longest suffixes first so e.g. `min`
/// doesn't lose to a hypothetical shorter prefix match.
const TIME_SUFFIXES: &[(&str, f64)] = &[
    ("ms", 0.001),
    ("min", 60.0),
    ("s", 1.0),
    ("h", 3600.0),
    ("d", 86400.0),
    ("w", 604800.0),
    ("y", 31536000.0),
];

/// `(suffix, multiplier)` for decimal (k/m/g) and binary (kb/mb/gb) size
/// units.
const SIZE_SUFFIXES: &[(&str, i64)] = &[
    ("kb", 1024),
    ("mb", 1024 * 1024),
    ("gb", 1024 * 1024 * 1024),
    ("k", 1_000),
    ("m", 1_000_000),
    ("g", 1_000_000_000),
];

impl<'source> Lexer<'source> {
    /// Attempts to lex a number starting at the cursor. Returns `Ok(None)`
    /// (leaving the cursor wherever it ended up — the caller restores it)
    /// when the atom doesn't end up looking like a valid, terminated
    /// number, so the caller can retry as a bare string.
    pub(crate) fn lex_number(
        &mut self,
        start: usize,
        start_line: u32,
        start_column: u32,
    ) -> Result<Option<Token<'source>>, ParseError> {
        let digits_start = self.cursor.position();

        if matches!(self.cursor.current_byte(), Some(b'+') | Some(b'-')) {
            self.cursor.advance();
        }

        let mut saw_digit = false;
        while self
            .cursor
            .current_byte()
            .is_some_and(|b| b.is_ascii_digit())
        {
            saw_digit = true;
            self.cursor.advance();
        }

        if !saw_digit {
            return Ok(None);
        }

        let mut is_float = false;

        if self.cursor.current_byte() == Some(b'.')
            && self.cursor.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            while self
                .cursor
                .current_byte()
                .is_some_and(|b| b.is_ascii_digit())
            {
                self.cursor.advance();
            }
        }

        if matches!(self.cursor.current_byte(), Some(b'e') | Some(b'E')) {
            let exp_snapshot = self.cursor.snapshot();
            self.cursor.advance();
            if matches!(self.cursor.current_byte(), Some(b'+') | Some(b'-')) {
                self.cursor.advance();
            }
            let exp_digits_start = self.cursor.position();
            while self
                .cursor
                .current_byte()
                .is_some_and(|b| b.is_ascii_digit())
            {
                self.cursor.advance();
            }
            if self.cursor.position() == exp_digits_start {
                // No exponent digits after all; this wasn't a float exponent.
                self.cursor.restore(exp_snapshot);
            } else {
                is_float = true;
            }
        }

        let text = std::str::from_utf8(self.cursor.slice_from(digits_start))
            .expect("ascii digits, sign, '.', 'e' are all valid UTF-8");

        // A terminator right after the digits: plain int64/float64, no suffix.
        if self.at_number_terminator() {
            return Ok(Some(self.finish_plain_number(
                text,
                is_float,
                start,
                start_line,
                start_column,
            )?));
        }

        // Otherwise a unit suffix may follow, letters only, ending at a
        // terminator.
        let suffix_start = self.cursor.position();
        while self
            .cursor
            .current_byte()
            .is_some_and(|b| b.is_ascii_alphabetic())
        {
            self.cursor.advance();
        }
        let suffix_end = self.cursor.position();

        if suffix_start == suffix_end || !self.at_number_terminator() {
            return Ok(None);
        }

        let suffix_bytes = self.cursor.slice_from(suffix_start);
        let suffix = match std::str::from_utf8(suffix_bytes) {
            Ok(s) => s,
            Err(_) => return Ok(None),
        };
        let suffix_lower = suffix.to_ascii_lowercase();

        if let Some((_, multiplier)) = TIME_SUFFIXES.iter().find(|(s, _)| *s == suffix_lower) {
            let value: f64 = text.parse().map_err(|_| {
                ParseError::syntax(
                    format!("number '{text}' out of range"),
                    self.span_from(start, start_line, start_column),
                )
            })?;
            return Ok(Some(Token::Time(value * multiplier)));
        }

        if let Some((_, multiplier)) = SIZE_SUFFIXES.iter().find(|(s, _)| *s == suffix_lower) {
            if is_float {
                let value: f64 = text.parse().map_err(|_| {
                    ParseError::syntax(
                        format!("number '{text}' out of range"),
                        self.span_from(start, start_line, start_column),
                    )
                })?;
                return Ok(Some(Token::Float(value * *multiplier as f64)));
            }
            let value: i64 = text.parse().map_err(|_| {
                ParseError::syntax(
                    format!("number '{text}' out of range"),
                    self.span_from(start, start_line, start_column),
                )
            })?;
            let scaled = value.checked_mul(*multiplier).ok_or_else(|| {
                ParseError::syntax(
                    format!("number '{text}{suffix}' out of range"),
                    self.span_from(start, start_line, start_column),
                )
            })?;
            return Ok(Some(Token::Int(scaled)));
        }

        // Suffix didn't match any known unit: let the caller backtrack and
        // relex the whole atom as a string.
        Ok(None)
    }

    fn at_number_terminator(&self) -> bool {
        match self.cursor.current_byte() {
            None => true,
            Some(b) => {
                crate::charclass::test_character(b, CharClass::VALUE_END)
                    || crate::charclass::test_character(b, CharClass::WHITESPACE)
                    || b == b'#'
                    || (b == b'/' && self.cursor.peek_byte(1) == Some(b'*'))
            }
        }
    }

    fn finish_plain_number(
        &self,
        text: &str,
        is_float: bool,
        start: usize,
        start_line: u32,
        start_column: u32,
    ) -> Result<Token<'source>, ParseError> {
        if is_float {
            text.parse::<f64>().map(Token::Float).map_err(|_| {
                ParseError::syntax(
                    format!("number '{text}' out of range"),
                    self.span_from(start, start_line, start_column),
                )
            })
        } else {
            text.parse::<i64>().map(Token::Int).map_err(|_| {
                ParseError::syntax(
                    format!("number '{text}' out of range"),
                    self.span_from(start, start_line, start_column),
                )
            })
        }
    }
}
