//! Human-friendly duration parsing.
//!
//! Accepts `<n>y` (365-day years), `<n>d` (days) and the usual
//! `<number><unit>` sequences such as `720h`, `1h30m` or `1.5s`.

use std::num::ParseIntError;

use thiserror::Error;
use time::Duration;

use crate::error::{EasyCertError, Result};

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Inner cause of an [`EasyCertError::InvalidDurationFormat`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    #[error("invalid count: {0}")]
    InvalidCount(#[from] ParseIntError),

    #[error("invalid duration")]
    Malformed,

    #[error("missing unit in duration")]
    MissingUnit,

    #[error("unknown unit {0:?} in duration")]
    UnknownUnit(String),

    #[error("duration out of range")]
    Overflow,
}

/// Parses `input` into a [`Duration`].
///
/// # Examples
/// ```
/// use easycert::duration::parse_duration;
///
/// assert_eq!(parse_duration("10d").unwrap(), time::Duration::hours(240));
/// assert_eq!(parse_duration("90m").unwrap(), time::Duration::minutes(90));
/// assert!(parse_duration("notaduration").is_err());
/// ```
pub fn parse_duration(input: &str) -> Result<Duration> {
    parse(input).map_err(|source| EasyCertError::InvalidDurationFormat {
        input: input.to_string(),
        source,
    })
}

fn parse(input: &str) -> std::result::Result<Duration, DurationError> {
    if let Some(years) = input.strip_suffix('y') {
        let count: i64 = years.parse()?;
        return count
            .checked_mul(365 * 24)
            .and_then(|hours| hours.checked_mul(3600))
            .map(Duration::seconds)
            .ok_or(DurationError::Overflow);
    }
    if let Some(days) = input.strip_suffix('d') {
        let count: i64 = days.parse()?;
        return count
            .checked_mul(24 * 3600)
            .map(Duration::seconds)
            .ok_or(DurationError::Overflow);
    }
    parse_standard(input)
}

/// Parses a signed sequence of `<number><unit>` pairs.
fn parse_standard(input: &str) -> std::result::Result<Duration, DurationError> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(DurationError::Malformed);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (whole, after_whole) = take_digits(rest);
        let mut value = match whole {
            "" => 0,
            digits => digits.parse::<u128>().map_err(|_| DurationError::Overflow)?,
        };
        rest = after_whole;

        let mut fraction = 0u128;
        let mut scale = 1u128;
        let mut has_fraction = false;
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (digits, after_fraction) = take_digits(after_dot);
            has_fraction = !digits.is_empty();
            for digit in digits.bytes() {
                // Further digits are below nanosecond precision for every unit.
                if scale >= 10u128.pow(18) {
                    break;
                }
                fraction = fraction * 10 + u128::from(digit - b'0');
                scale *= 10;
            }
            rest = after_fraction;
        }
        if whole.is_empty() && !has_fraction {
            return Err(DurationError::Malformed);
        }

        let unit_len = rest
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (unit, after_unit) = rest.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationError::MissingUnit);
        }
        let unit_nanos = unit_nanos(unit).ok_or_else(|| DurationError::UnknownUnit(unit.into()))?;
        rest = after_unit;

        value = value
            .checked_mul(unit_nanos)
            .and_then(|v| v.checked_add(fraction * unit_nanos / scale))
            .ok_or(DurationError::Overflow)?;
        total = total.checked_add(value).ok_or(DurationError::Overflow)?;
        if total > 1u128 << 63 {
            return Err(DurationError::Overflow);
        }
    }

    let nanos = if negative {
        -(total as i128)
    } else {
        total as i128
    };
    let nanos = i64::try_from(nanos).map_err(|_| DurationError::Overflow)?;
    Ok(Duration::nanoseconds(nanos))
}

fn take_digits(s: &str) -> (&str, &str) {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    s.split_at(end)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(NANOS_PER_MICRO),
        "ms" => Some(NANOS_PER_MILLI),
        "s" => Some(NANOS_PER_SECOND),
        "m" => Some(NANOS_PER_MINUTE),
        "h" => Some(NANOS_PER_HOUR),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cause(input: &str) -> DurationError {
        match parse_duration(input) {
            Err(EasyCertError::InvalidDurationFormat { input: got, source }) => {
                assert_eq!(got, input);
                source
            }
            other => panic!("expected InvalidDurationFormat for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_years_and_days() {
        assert_eq!(parse_duration("3y").unwrap(), Duration::hours(3 * 365 * 24));
        assert_eq!(parse_duration("1y").unwrap(), Duration::days(365));
        assert_eq!(parse_duration("10d").unwrap(), Duration::hours(240));
        assert_eq!(parse_duration("0d").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("-2d").unwrap(), Duration::days(-2));
    }

    #[test]
    fn test_standard_units() {
        assert_eq!(parse_duration("90m").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("720h").unwrap(), Duration::hours(720));
        assert_eq!(
            parse_duration("1h30m15s").unwrap(),
            Duration::seconds(3600 + 30 * 60 + 15)
        );
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::milliseconds(1500));
        assert_eq!(parse_duration(".5m").unwrap(), Duration::seconds(30));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::milliseconds(250));
        assert_eq!(parse_duration("3us").unwrap(), Duration::microseconds(3));
        assert_eq!(parse_duration("3µs").unwrap(), Duration::microseconds(3));
        assert_eq!(parse_duration("7ns").unwrap(), Duration::nanoseconds(7));
        assert_eq!(parse_duration("-1h").unwrap(), Duration::hours(-1));
        assert_eq!(parse_duration("+1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_duration("0").unwrap(), Duration::ZERO);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(cause("notaduration"), DurationError::Malformed);
        assert_eq!(cause(""), DurationError::Malformed);
        assert_eq!(cause("-"), DurationError::Malformed);
        assert_eq!(cause("10"), DurationError::MissingUnit);
        assert_eq!(cause("10w"), DurationError::UnknownUnit("w".to_string()));
        assert_eq!(cause("."), DurationError::Malformed);
        assert!(matches!(cause("1.5d"), DurationError::InvalidCount(_)));
        assert!(matches!(cause("ay"), DurationError::InvalidCount(_)));
        assert!(matches!(cause("5h3d"), DurationError::InvalidCount(_)));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(cause("9999999999999999999h"), DurationError::Overflow);
        assert!(matches!(
            cause("99999999999999999999d"),
            DurationError::InvalidCount(_)
        ));
    }
}
