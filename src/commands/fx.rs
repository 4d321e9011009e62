// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amount::parse_display_amount;
use crate::convert::convert;
use crate::currency::Currency;
use crate::rates::RateProvider;
use crate::utils::{
    fmt_cents, get_reporting_currency, maybe_print_json, pretty_table, set_reporting_currency,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use std::str::FromStr;

pub fn handle(conn: &Connection, provider: &RateProvider, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("rates", sub)) => rates(conn, provider, sub)?,
        Some(("convert", sub)) => convert_amount(provider, sub)?,
        Some(("set-reporting", sub)) => {
            let ccy = Currency::from_str(sub.get_one::<String>("currency").unwrap())?;
            set_reporting_currency(conn, ccy)?;
            println!("Reporting currency set to {}", ccy);
        }
        _ => {}
    }
    Ok(())
}

fn rates(conn: &Connection, provider: &RateProvider, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let table = provider.get_rates();
    if !maybe_print_json(json_flag, jsonl_flag, &table)? {
        let rows = Currency::ALL
            .iter()
            .map(|c| vec![c.as_str().to_string(), format!("{:.4}", table.rate(*c))])
            .collect();
        println!("{}", pretty_table(&["Currency", "Rate (per USD)"], rows));
        println!("Reporting currency: {}", get_reporting_currency(conn)?);
    }
    Ok(())
}

fn convert_amount(provider: &RateProvider, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("amount").unwrap();
    let cents = parse_display_amount(raw).with_context(|| format!("Invalid amount '{}'", raw))?;
    let from = Currency::from_str(sub.get_one::<String>("from").unwrap())?;
    let to = Currency::from_str(sub.get_one::<String>("to").unwrap())?;
    let res = convert(provider, cents, from, to);
    println!(
        "{} -> {} (rate {:.4})",
        fmt_cents(cents, from),
        fmt_cents(res.converted_cents, to),
        res.rate
    );
    Ok(())
}
