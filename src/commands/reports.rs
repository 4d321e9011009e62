// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::convert::convert;
use crate::currency::Currency;
use crate::models::TransactionType;
use crate::rates::RateProvider;
use crate::utils::{fmt_cents, get_reporting_currency, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, provider: &RateProvider, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, provider, sub),
        _ => Ok(()),
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Summary {
    pub currency: String,
    pub income_cents: i64,
    pub expense_cents: i64,
    pub net_cents: i64,
}

/// Totals across transactions, each amount converted into `target` with
/// current rates. Stored snapshots are historical facts and stay untouched;
/// the summary is a live view.
pub fn compute_summary(
    conn: &Connection,
    provider: &RateProvider,
    month: Option<&str>,
    target: Currency,
) -> Result<Summary> {
    let mut sql = String::from("SELECT type, amount_cents, currency FROM transactions");
    if month.is_some() {
        sql.push_str(" WHERE substr(date,1,7)=?1");
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match month {
        Some(m) => stmt.query([m])?,
        None => stmt.query([])?,
    };

    let mut income = 0i64;
    let mut expense = 0i64;
    while let Some(r) = rows.next()? {
        let r#type: String = r.get(0)?;
        let cents: i64 = r.get(1)?;
        let ccy = Currency::from_str(&r.get::<_, String>(2)?)?;
        let converted = convert(provider, cents, ccy, target).converted_cents;
        match TransactionType::from_str(&r#type)? {
            TransactionType::Income => income += converted,
            TransactionType::Expense => expense += converted,
        }
    }
    Ok(Summary {
        currency: target.as_str().to_string(),
        income_cents: income,
        expense_cents: expense,
        net_cents: income - expense,
    })
}

fn summary(conn: &Connection, provider: &RateProvider, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let target = match sub.get_one::<String>("currency") {
        Some(c) => Currency::from_str(c)?,
        None => get_reporting_currency(conn)?,
    };

    let s = compute_summary(conn, provider, month, target)?;
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let rows = vec![
            vec!["In".to_string(), fmt_cents(s.income_cents, target)],
            vec!["Out".to_string(), fmt_cents(s.expense_cents, target)],
            vec!["Total".to_string(), fmt_cents(s.net_cents, target)],
        ];
        println!("{}", pretty_table(&["", &format!("Amount ({})", target)], rows));
    }
    Ok(())
}
