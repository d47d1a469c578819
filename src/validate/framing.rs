//! Strict quote framing
//!
//! The `csv` reader is lenient about quotes: a `"` inside an unquoted field is
//! kept as a literal, text after a closing quote is appended to the field, and
//! a quote left open runs to the end of input. None of these are well-formed
//! CSV, so each record's raw bytes are re-scanned here before the record is
//! accepted.

use std::fmt;

/// Quote framing violation inside one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteError {
    pub line: u64,
    pub column: usize,
    pub kind: QuoteErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteErrorKind {
    /// `"` inside a field that did not start with a quote
    BareQuote,
    /// Quoted field never closed, or closed and followed by other text
    Quote,
}

impl fmt::Display for QuoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self.kind {
            QuoteErrorKind::BareQuote => "bare \" in non-quoted-field",
            QuoteErrorKind::Quote => "extraneous or missing \" in quoted-field",
        };
        write!(
            f,
            "parse error on line {}, column {}: {}",
            self.line, self.column, message
        )
    }
}

impl std::error::Error for QuoteError {}

#[derive(Clone, Copy)]
enum State {
    FieldStart,
    Unquoted,
    Quoted,
    /// Just saw a `"` inside a quoted field: either an escape or the close
    QuoteInQuoted,
}

/// Check the raw bytes of one record
///
/// `first_line` is the 1-based line the record starts on. The slice may
/// include the record terminator and any blank lines skipped before it.
pub fn check_quoting(raw: &[u8], first_line: u64) -> Result<(), QuoteError> {
    let mut state = State::FieldStart;
    let mut line = first_line;
    let mut column = 0usize;

    for &byte in raw {
        column += 1;
        let fail = |kind| QuoteError { line, column, kind };

        state = match (state, byte) {
            (State::FieldStart, b'"') => State::Quoted,
            (State::Unquoted, b'"') => return Err(fail(QuoteErrorKind::BareQuote)),
            (State::FieldStart | State::Unquoted | State::QuoteInQuoted, b',') => {
                State::FieldStart
            }
            (State::FieldStart | State::Unquoted | State::QuoteInQuoted, b'\n' | b'\r') => {
                State::FieldStart
            }
            (State::FieldStart | State::Unquoted, _) => State::Unquoted,
            (State::Quoted, b'"') => State::QuoteInQuoted,
            (State::Quoted, _) => State::Quoted,
            (State::QuoteInQuoted, b'"') => State::Quoted,
            (State::QuoteInQuoted, _) => return Err(fail(QuoteErrorKind::Quote)),
        };

        if byte == b'\n' {
            line += 1;
            column = 0;
        }
    }

    match state {
        State::Quoted => Err(QuoteError {
            line,
            column: column + 1,
            kind: QuoteErrorKind::Quote,
        }),
        _ => Ok(()),
    }
}
