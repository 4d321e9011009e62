// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Currency;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::str::FromStr;

const UA: &str = concat!(
    "ledgerly/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/ledgerly/ledgerly)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Render integer cents as a decimal amount with its currency code,
/// e.g. `fmt_cents(123456, Currency::Usd)` -> "USD 1234.56".
pub fn fmt_cents(cents: i64, ccy: Currency) -> String {
    format!("{} {}", ccy.as_str(), Decimal::new(cents, 2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

// Reporting currency settings (conversions snapshot into this currency)
pub fn get_reporting_currency(conn: &Connection) -> Result<Currency> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='reporting_currency'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => Currency::from_str(&s)
            .with_context(|| format!("Stored reporting currency '{}' is unsupported", s)),
        None => Ok(Currency::Usd),
    }
}

pub fn set_reporting_currency(conn: &Connection, ccy: Currency) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('reporting_currency', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![ccy.as_str()],
    )?;
    Ok(())
}
