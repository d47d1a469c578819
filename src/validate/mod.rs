//! Transaction CSV schema validation
//!
//! Checks that an uploaded file is a well-formed transactions CSV before it
//! is allowed anywhere near storage. Validation is a gate, not a transform:
//! on success nothing is produced, on failure the first violation is returned.
//!
//! # Schema
//!
//! ```text
//! Id,Date,Transaction[,extra columns...]
//! 1,7/15,-50.25
//! 2,12/1,+10
//! ```
//!
//! - `Id` parses as a signed decimal integer
//! - `Date` is `M/D` with no year (`7/15`, `12/1`)
//! - `Transaction` parses as a floating-point amount
//!
//! Fields are trimmed before checking. Rows are streamed one at a time and the
//! first error wins. Quoting is strict: a `"` may only open a field, close it,
//! or escape another `"` inside it.
//!
//! # Example
//!
//! ```
//! use txn_uploadr::validate::{validate_transactions_csv, ValidationErrorKind};
//!
//! assert!(validate_transactions_csv(b"Id,Date,Transaction\n1,7/15,-50.25\n").is_ok());
//!
//! let err = validate_transactions_csv(b"Id,Date,Transaction\nabc,7/15,1\n").unwrap_err();
//! assert_eq!(err.kind(), ValidationErrorKind::Id);
//! assert_eq!(err.row(), Some(1));
//! ```

mod fields;
mod framing;

pub use fields::{parse_amount, parse_date, parse_id, MonthDay};

use thiserror::Error;

/// Expected leading header columns, in order
pub const EXPECTED_HEADER: [&str; 3] = ["Id", "Date", "Transaction"];

/// Human-readable form of the accepted date pattern
pub const DATE_PATTERN: &str = "M/D like 7/15";

/// Validation errors
///
/// Every variant carries the structured context needed to self-diagnose
/// (row number, offending text). Rows are 1-based and count data rows only,
/// so the first row after the header is row 1.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("CSV is empty")]
    Empty,

    #[error("reading header: {reason}")]
    MalformedHeader { reason: String },

    #[error("header must have at least 3 columns")]
    HeaderTooShort { columns: usize },

    #[error("invalid header, expected 'Id,Date,Transaction', got {header:?}")]
    InvalidHeader { header: Vec<String> },

    #[error("row {row} has invalid field count")]
    FieldCount { row: usize },

    #[error("reading row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },

    #[error("row {row} has less than 3 columns")]
    TooFewColumns { row: usize },

    #[error("row {row}: invalid Id {value:?}")]
    InvalidId { row: usize, value: String },

    #[error("row {row}: invalid Date {value:?}, expected M/D like 7/15")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid Transaction {value:?}")]
    InvalidTransaction { row: usize, value: String },

    #[error("CSV has no data rows.")]
    NoDataRows,
}

/// Machine-inspectable category of a [`ValidationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    EmptyFile,
    Malformed,
    Header,
    FieldCount,
    Id,
    Date,
    Transaction,
    NoDataRows,
}

impl ValidationError {
    /// Category of this error
    pub fn kind(&self) -> ValidationErrorKind {
        match self {
            Self::Empty => ValidationErrorKind::EmptyFile,
            Self::MalformedHeader { .. } | Self::MalformedRow { .. } => {
                ValidationErrorKind::Malformed
            }
            Self::HeaderTooShort { .. } | Self::InvalidHeader { .. } => ValidationErrorKind::Header,
            Self::FieldCount { .. } | Self::TooFewColumns { .. } => ValidationErrorKind::FieldCount,
            Self::InvalidId { .. } => ValidationErrorKind::Id,
            Self::InvalidDate { .. } => ValidationErrorKind::Date,
            Self::InvalidTransaction { .. } => ValidationErrorKind::Transaction,
            Self::NoDataRows => ValidationErrorKind::NoDataRows,
        }
    }

    /// 1-based data row the error refers to, if any
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::FieldCount { row }
            | Self::MalformedRow { row, .. }
            | Self::TooFewColumns { row }
            | Self::InvalidId { row, .. }
            | Self::InvalidDate { row, .. }
            | Self::InvalidTransaction { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Offending field text, for field-level errors
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::InvalidId { value, .. }
            | Self::InvalidDate { value, .. }
            | Self::InvalidTransaction { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Validate raw bytes against the transactions schema
///
/// Fail-fast: returns the first violation found. Rows are pulled from the
/// reader one at a time; the input is never collected into records up front.
#[tracing::instrument(
    name = "csv.validate",
    skip(data),
    fields(csv.bytes = data.len(), csv.rows = tracing::field::Empty)
)]
pub fn validate_transactions_csv(data: &[u8]) -> Result<(), ValidationError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(data);
    let mut record = csv::StringRecord::new();

    match read_framed(&mut reader, data, &mut record) {
        Ok(true) => {}
        Ok(false) => return Err(ValidationError::Empty),
        Err(e) => {
            return Err(ValidationError::MalformedHeader {
                reason: e.to_string(),
            })
        }
    }

    check_header(&record)?;

    let mut row_count = 0usize;

    loop {
        let row = row_count + 1;
        match read_framed(&mut reader, data, &mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(ReadError::FieldCount) => return Err(ValidationError::FieldCount { row }),
            Err(e) => {
                return Err(ValidationError::MalformedRow {
                    row,
                    reason: e.to_string(),
                })
            }
        }
        row_count = row;

        check_row(row, &record)?;
    }

    tracing::Span::current().record("csv.rows", row_count);

    if row_count == 0 {
        return Err(ValidationError::NoDataRows);
    }

    Ok(())
}

#[derive(Debug, Error)]
enum ReadError {
    #[error("wrong number of fields")]
    FieldCount,

    #[error(transparent)]
    Quote(#[from] framing::QuoteError),

    #[error(transparent)]
    Csv(csv::Error),
}

/// Read the next record, then check its raw bytes for quote framing
///
/// A quote violation wins over any error the reader raised for the same
/// record.
fn read_framed(
    reader: &mut csv::Reader<&[u8]>,
    data: &[u8],
    record: &mut csv::StringRecord,
) -> Result<bool, ReadError> {
    let start = reader.position().clone();
    let result = reader.read_record(record);

    let from = offset(&start, data);
    let to = offset(reader.position(), data).max(from);
    framing::check_quoting(&data[from..to], start.line())?;

    result.map_err(|e| {
        if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) {
            ReadError::FieldCount
        } else {
            ReadError::Csv(e)
        }
    })
}

fn offset(position: &csv::Position, data: &[u8]) -> usize {
    usize::try_from(position.byte()).map_or(data.len(), |b| b.min(data.len()))
}

fn check_header(header: &csv::StringRecord) -> Result<(), ValidationError> {
    if header.len() < EXPECTED_HEADER.len() {
        return Err(ValidationError::HeaderTooShort {
            columns: header.len(),
        });
    }

    let matches = header
        .iter()
        .zip(EXPECTED_HEADER)
        .all(|(actual, expected)| actual.trim() == expected);

    if !matches {
        return Err(ValidationError::InvalidHeader {
            header: header.iter().map(str::to_string).collect(),
        });
    }

    Ok(())
}

fn check_row(row: usize, record: &csv::StringRecord) -> Result<(), ValidationError> {
    let (id, date, amount) = match (record.get(0), record.get(1), record.get(2)) {
        (Some(id), Some(date), Some(amount)) => (id.trim(), date.trim(), amount.trim()),
        _ => return Err(ValidationError::TooFewColumns { row }),
    };

    if parse_id(id).is_none() {
        return Err(ValidationError::InvalidId {
            row,
            value: id.to_string(),
        });
    }

    if parse_date(date).is_none() {
        return Err(ValidationError::InvalidDate {
            row,
            value: date.to_string(),
        });
    }

    if parse_amount(amount).is_none() {
        return Err(ValidationError::InvalidTransaction {
            row,
            value: amount.to_string(),
        });
    }

    Ok(())
}
