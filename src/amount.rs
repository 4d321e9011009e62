// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Enter a valid number")]
    NotANumber,
    #[error("Amount out of range")]
    OutOfRange,
}

static SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(-?[0-9.,]+)\s*([km])$").unwrap());

/// Parse free-form display input ("12.34", "12,34", "$1.234,56", "R$ 45,50",
/// "1k", "2.5M") into integer cents.
///
/// Thousands/decimal separator disambiguation is heuristic: the rightmost
/// `.` or `,` is the decimal separator when exactly 1-2 digits follow it,
/// otherwise every separator is a grouping separator. "1.234" therefore
/// parses as 1234 whole units, not 1.234.
pub fn parse_display_amount(input: &str) -> Result<i64, AmountError> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | 'k' | 'K' | 'm' | 'M'))
        .collect();

    // Magnitude shorthand: the prefix is a whole-currency-unit quantity,
    // scaled by the suffix factor before conversion to cents.
    if let Some(caps) = SUFFIX_RE.captures(&cleaned) {
        let units = parse_units(&caps[1])?;
        let factor = match caps[2].to_ascii_lowercase().as_str() {
            "k" => 1_000.0,
            _ => 1_000_000.0,
        };
        return to_cents(units * factor);
    }

    to_cents(parse_units(&cleaned)?)
}

/// Numeric input is a whole-currency-unit amount; scale to cents with the
/// same rounding as string input. Pre-computed integer cents never go
/// through here, they are accepted as-is at the call boundary.
pub fn cents_from_major(value: f64) -> Result<i64, AmountError> {
    to_cents(value)
}

fn parse_units(s: &str) -> Result<f64, AmountError> {
    // `s` is ASCII by construction, byte indexing is safe.
    let normalized = match s.rfind(['.', ',']) {
        None => s.to_string(),
        Some(pos) => {
            let tail = &s[pos + 1..];
            let is_decimal =
                (1..=2).contains(&tail.len()) && tail.bytes().all(|b| b.is_ascii_digit());
            s.char_indices()
                .filter_map(|(i, c)| match c {
                    '.' | ',' if i == pos && is_decimal => Some('.'),
                    '.' | ',' => None,
                    _ => Some(c),
                })
                .collect()
        }
    };
    let n: f64 = normalized.parse().map_err(|_| AmountError::NotANumber)?;
    if !n.is_finite() {
        return Err(AmountError::NotANumber);
    }
    Ok(n)
}

fn to_cents(units: f64) -> Result<i64, AmountError> {
    if !units.is_finite() {
        return Err(AmountError::NotANumber);
    }
    // Round half away from zero, matching currency display rounding.
    let cents = (units * 100.0).round();
    if cents.abs() >= i64::MAX as f64 {
        return Err(AmountError::OutOfRange);
    }
    Ok(cents as i64)
}
