// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

type ExportRow = (
    i64,
    String,
    String,
    i64,
    String,
    String,
    Option<String>,
    Option<i64>,
    Option<String>,
    Option<f64>,
    Option<String>,
);

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT id, date, type, amount_cents, currency, category, description,
                converted_amount_cents, converted_currency, exchange_rate, rate_timestamp
         FROM transactions ORDER BY date, id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, i64>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<i64>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, Option<f64>>(9)?,
            r.get::<_, Option<String>>(10)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "type",
                "amount_cents",
                "currency",
                "category",
                "description",
                "converted_amount_cents",
                "converted_currency",
                "exchange_rate",
                "rate_timestamp",
            ])?;
            for row in rows {
                let (id, d, t, cents, ccy, cat, desc, conv, conv_ccy, rate, ts): ExportRow = row?;
                wtr.write_record([
                    id.to_string(),
                    d,
                    t,
                    cents.to_string(),
                    ccy,
                    cat,
                    desc.unwrap_or_default(),
                    conv.map(|v| v.to_string()).unwrap_or_default(),
                    conv_ccy.unwrap_or_default(),
                    rate.map(|v| v.to_string()).unwrap_or_default(),
                    ts.unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (id, d, t, cents, ccy, cat, desc, conv, conv_ccy, rate, ts): ExportRow = row?;
                items.push(json!({
                    "id": id, "date": d, "type": t, "amount_cents": cents, "currency": ccy,
                    "category": cat, "description": desc,
                    "converted_amount_cents": conv, "converted_currency": conv_ccy,
                    "exchange_rate": rate, "rate_timestamp": ts
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
