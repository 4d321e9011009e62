// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amount::parse_display_amount;
use crate::convert::convert_with_snapshot;
use crate::currency::Currency;
use crate::models::{
    ConversionSnapshot, Transaction, TransactionDraft, TransactionPatch, TransactionType,
};
use crate::rates::RateProvider;
use crate::utils::{
    fmt_cents, get_reporting_currency, maybe_print_json, parse_date, pretty_table,
};
use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, provider: &RateProvider, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, provider, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, provider, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            delete_transaction(conn, id)?;
            println!("Deleted transaction {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, provider: &RateProvider, sub: &clap::ArgMatches) -> Result<()> {
    let amount_cents = if let Some(s) = sub.get_one::<String>("amount") {
        parse_display_amount(s).with_context(|| format!("Invalid amount '{}'", s))?
    } else {
        *sub.get_one::<i64>("cents").unwrap()
    };
    let currency = Currency::from_str(sub.get_one::<String>("currency").unwrap())?;
    let r#type = TransactionType::from_str(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().to_string();
    let description = sub
        .get_one::<String>("description")
        .filter(|s| !s.is_empty())
        .cloned();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Utc::now().date_naive(),
    };

    let supplied = supplied_snapshot(sub)?;
    let draft = TransactionDraft {
        r#type,
        amount_cents,
        currency,
        category,
        description,
        date,
    };
    let tx = create_transaction(conn, provider, &draft, supplied)?;

    println!(
        "Recorded {} {} '{}' on {} (id: {})",
        tx.r#type.as_str(),
        fmt_cents(tx.amount_cents, tx.currency),
        tx.category,
        tx.date,
        tx.id
    );
    if let Some(s) = tx.converted {
        println!(
            "Converted: {} at rate {:.4}",
            fmt_cents(s.amount_cents, s.currency),
            s.rate
        );
    }
    Ok(())
}

/// Clients may hand over a pre-computed conversion instead of having one
/// computed here; all four snapshot fields must come together.
fn supplied_snapshot(sub: &clap::ArgMatches) -> Result<Option<ConversionSnapshot>> {
    let cents = sub.get_one::<i64>("converted-cents").copied();
    let currency = sub.get_one::<String>("converted-currency");
    let rate = sub.get_one::<f64>("rate").copied();
    let timestamp = sub.get_one::<String>("rate-timestamp");

    match (cents, currency, rate, timestamp) {
        (None, None, None, None) => Ok(None),
        (Some(cents), Some(currency), Some(rate), Some(ts)) => {
            let timestamp = DateTime::parse_from_rfc3339(ts)
                .with_context(|| format!("Invalid rate timestamp '{}'", ts))?
                .with_timezone(&Utc);
            Ok(Some(ConversionSnapshot {
                amount_cents: cents,
                currency: Currency::from_str(currency)?,
                rate,
                timestamp,
            }))
        }
        _ => bail!(
            "Supply all of --converted-cents, --converted-currency, --rate and --rate-timestamp, or none"
        ),
    }
}

/// Validate, compute the conversion snapshot, and insert the row in a single
/// write. Amount and snapshot are computed together; a validation or
/// conversion problem means nothing is persisted.
pub fn create_transaction(
    conn: &Connection,
    provider: &RateProvider,
    draft: &TransactionDraft,
    supplied: Option<ConversionSnapshot>,
) -> Result<Transaction> {
    draft.validate()?;
    let reporting = get_reporting_currency(conn)?;
    let snapshot = match supplied {
        Some(s) => Some(s),
        None if draft.currency != reporting => Some(convert_with_snapshot(
            provider,
            draft.amount_cents,
            draft.currency,
            reporting,
        )),
        None => None,
    };

    conn.execute(
        "INSERT INTO transactions(date, type, amount_cents, currency, category, description,
             converted_amount_cents, converted_currency, exchange_rate, rate_timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            draft.date.to_string(),
            draft.r#type.as_str(),
            draft.amount_cents,
            draft.currency.as_str(),
            draft.category,
            draft.description,
            snapshot.map(|s| s.amount_cents),
            snapshot.map(|s| s.currency.as_str()),
            snapshot.map(|s| s.rate),
            snapshot.map(|s| s.timestamp.to_rfc3339()),
        ],
    )?;
    Ok(Transaction {
        id: conn.last_insert_rowid(),
        r#type: draft.r#type,
        amount_cents: draft.amount_cents,
        currency: draft.currency,
        category: draft.category.clone(),
        description: draft.description.clone(),
        date: draft.date,
        converted: snapshot,
    })
}

fn edit(conn: &Connection, provider: &RateProvider, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let mut patch = TransactionPatch::default();
    if let Some(s) = sub.get_one::<String>("amount") {
        patch.amount_cents =
            Some(parse_display_amount(s).with_context(|| format!("Invalid amount '{}'", s))?);
    }
    if let Some(c) = sub.get_one::<i64>("cents") {
        patch.amount_cents = Some(*c);
    }
    if let Some(c) = sub.get_one::<String>("currency") {
        patch.currency = Some(Currency::from_str(c)?);
    }
    if let Some(t) = sub.get_one::<String>("type") {
        patch.r#type = Some(TransactionType::from_str(t)?);
    }
    if let Some(c) = sub.get_one::<String>("category") {
        patch.category = Some(c.to_string());
    }
    if let Some(d) = sub.get_one::<String>("description") {
        patch.description = Some(d.to_string());
    }
    if let Some(d) = sub.get_one::<String>("date") {
        patch.date = Some(parse_date(d)?);
    }

    update_transaction(conn, provider, id, &patch)?;
    println!("Updated transaction {}", id);
    Ok(())
}

/// Partial update. When the amount or currency changes, the conversion
/// snapshot is recomputed against the reporting currency and written in the
/// same UPDATE, so a row never carries a snapshot for a stale amount.
pub fn update_transaction(
    conn: &Connection,
    provider: &RateProvider,
    id: i64,
    patch: &TransactionPatch,
) -> Result<()> {
    if patch.is_empty() {
        bail!("Nothing to update");
    }
    patch.validate()?;

    let existing = conn
        .query_row(
            "SELECT amount_cents, currency FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?)),
        )
        .optional()?;
    let (cur_cents, cur_ccy) = existing.ok_or_else(|| anyhow!("Transaction {} not found", id))?;
    let cur_ccy = Currency::from_str(&cur_ccy)?;

    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(t) = patch.r#type {
        sets.push("type=?");
        values.push(Box::new(t.as_str().to_string()));
    }
    if let Some(cat) = &patch.category {
        sets.push("category=?");
        values.push(Box::new(cat.clone()));
    }
    if let Some(desc) = &patch.description {
        sets.push("description=?");
        let cleared: Option<String> = if desc.is_empty() {
            None
        } else {
            Some(desc.clone())
        };
        values.push(Box::new(cleared));
    }
    if let Some(date) = patch.date {
        sets.push("date=?");
        values.push(Box::new(date.to_string()));
    }

    let new_cents = patch.amount_cents.unwrap_or(cur_cents);
    let new_ccy = patch.currency.unwrap_or(cur_ccy);
    if new_cents != cur_cents || new_ccy != cur_ccy {
        let reporting = get_reporting_currency(conn)?;
        let snapshot = if new_ccy != reporting {
            Some(convert_with_snapshot(provider, new_cents, new_ccy, reporting))
        } else {
            None
        };
        sets.push("amount_cents=?");
        values.push(Box::new(new_cents));
        sets.push("currency=?");
        values.push(Box::new(new_ccy.as_str().to_string()));
        sets.push("converted_amount_cents=?");
        values.push(Box::new(snapshot.map(|s| s.amount_cents)));
        sets.push("converted_currency=?");
        values.push(Box::new(snapshot.map(|s| s.currency.as_str().to_string())));
        sets.push("exchange_rate=?");
        values.push(Box::new(snapshot.map(|s| s.rate)));
        sets.push("rate_timestamp=?");
        values.push(Box::new(snapshot.map(|s| s.timestamp.to_rfc3339())));
    }

    if sets.is_empty() {
        return Ok(());
    }
    let sql = format!("UPDATE transactions SET {} WHERE id=?", sets.join(", "));
    values.push(Box::new(id));
    conn.execute(
        &sql,
        rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
    )?;
    Ok(())
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<()> {
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        bail!("Transaction {} not found", id);
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let mut rows = Vec::new();
        for r in &data {
            let ccy = Currency::from_str(&r.currency)?;
            let converted = match (r.converted_amount_cents, &r.converted_currency, r.exchange_rate)
            {
                (Some(cents), Some(ccy), Some(rate)) => {
                    format!("{} @ {:.4}", fmt_cents(cents, Currency::from_str(ccy)?), rate)
                }
                _ => String::new(),
            };
            rows.push(vec![
                r.id.to_string(),
                r.date.clone(),
                r.r#type.clone(),
                fmt_cents(r.amount_cents, ccy),
                r.category.clone(),
                r.description.clone(),
                converted,
            ]);
        }
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Type", "Amount", "Category", "Description", "Converted"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub amount_cents: i64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub converted_amount_cents: Option<i64>,
    pub converted_currency: Option<String>,
    pub exchange_rate: Option<f64>,
    pub rate_timestamp: Option<String>,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT id, date, type, amount_cents, currency, category, description,
                converted_amount_cents, converted_currency, exchange_rate, rate_timestamp
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND category=?");
        params_vec.push(cat.into());
    }
    if let Some(t) = sub.get_one::<String>("type") {
        sql.push_str(" AND type=?");
        params_vec.push(t.into());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(TransactionRow {
            id: r.get(0)?,
            date: r.get(1)?,
            r#type: r.get(2)?,
            amount_cents: r.get(3)?,
            currency: r.get(4)?,
            category: r.get(5)?,
            description: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
            converted_amount_cents: r.get(7)?,
            converted_currency: r.get(8)?,
            exchange_rate: r.get(9)?,
            rate_timestamp: r.get(10)?,
        });
    }
    Ok(data)
}
