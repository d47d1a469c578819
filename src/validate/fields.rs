//! Field parsers for transaction rows
//!
//! Each parser takes an already-trimmed field and returns `None` when the
//! text does not match.

/// Month and day of a transaction date (no year)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthDay {
    pub month: u8,
    pub day: u8,
}

/// Parse an `Id` field as a sign-optional decimal integer
pub fn parse_id(field: &str) -> Option<i64> {
    field.parse().ok()
}

/// Parse a `Date` field in `M/D` form
///
/// Month and day are one or two ASCII digits each; leading zeros are allowed
/// but not required. Values are not range-checked, so `13/40` parses.
pub fn parse_date(field: &str) -> Option<MonthDay> {
    let (month, day) = field.split_once('/')?;
    Some(MonthDay {
        month: parse_date_component(month)?,
        day: parse_date_component(day)?,
    })
}

fn parse_date_component(s: &str) -> Option<u8> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse a `Transaction` field as a floating-point amount
///
/// Accepts an optional sign, optional fractional part and optional exponent.
/// Finite text that overflows `f64` is rejected; only a literal `inf` or
/// `infinity` yields an infinite amount.
pub fn parse_amount(field: &str) -> Option<f64> {
    let value: f64 = field.parse().ok()?;
    if value.is_infinite() && !is_infinity_literal(field) {
        return None;
    }
    Some(value)
}

fn is_infinity_literal(field: &str) -> bool {
    let unsigned = field.strip_prefix(['+', '-']).unwrap_or(field);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}
