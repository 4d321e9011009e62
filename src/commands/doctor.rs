// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::Currency;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Currency codes outside the supported set (rows predating a schema
    //    check, or written by another tool)
    let mut stmt = conn.prepare(
        "SELECT DISTINCT currency FROM transactions
         UNION SELECT DISTINCT converted_currency FROM transactions
         WHERE converted_currency IS NOT NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let c: Option<String> = r.get(0)?;
        if let Some(c) = c {
            if Currency::from_str(&c).is_err() {
                rows.push(vec!["unsupported_currency".into(), c]);
            }
        }
    }

    // 2) Partial conversion snapshots: all four columns must be set together
    let mut stmt2 = conn.prepare(
        "SELECT id FROM transactions
         WHERE (converted_amount_cents IS NULL) != (converted_currency IS NULL)
            OR (converted_amount_cents IS NULL) != (exchange_rate IS NULL)
            OR (converted_amount_cents IS NULL) != (rate_timestamp IS NULL)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["partial_snapshot".into(), format!("tx {}", id)]);
    }

    // 3) Non-positive amounts
    let mut stmt3 = conn.prepare("SELECT id FROM transactions WHERE amount_cents <= 0")?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["non_positive_amount".into(), format!("tx {}", id)]);
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
