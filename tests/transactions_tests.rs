// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, TimeZone, Utc};
use ledgerly::commands::transactions::{create_transaction, delete_transaction, update_transaction};
use ledgerly::currency::{Currency, RateTable};
use ledgerly::models::{ConversionSnapshot, TransactionDraft, TransactionPatch, TransactionType};
use ledgerly::rates::RateProvider;
use ledgerly::{cli, commands::transactions};
use rusqlite::{Connection, params};

const TABLE: RateTable = RateTable {
    usd: 1.0,
    eur: 0.92,
    brl: 0.19,
};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            type TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            currency TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT,
            converted_amount_cents INTEGER,
            converted_currency TEXT,
            exchange_rate REAL,
            rate_timestamp TEXT
        );
        "#,
    )
    .unwrap();
    conn
}

fn provider() -> RateProvider {
    RateProvider::fixed(TABLE)
}

fn draft(cents: i64, ccy: Currency) -> TransactionDraft {
    TransactionDraft {
        r#type: TransactionType::Expense,
        amount_cents: cents,
        currency: ccy,
        category: "Food".into(),
        description: Some("lunch".into()),
        date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
    }
}

fn snapshot_row(conn: &Connection, id: i64) -> (Option<i64>, Option<String>, Option<f64>, Option<String>) {
    conn.query_row(
        "SELECT converted_amount_cents, converted_currency, exchange_rate, rate_timestamp
         FROM transactions WHERE id=?1",
        params![id],
        |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
    )
    .unwrap()
}

#[test]
fn create_converts_into_the_reporting_currency() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(4550, Currency::Brl), None).unwrap();

    let (cents, ccy, rate, ts) = snapshot_row(&conn, tx.id);
    assert_eq!(cents, Some(23947));
    assert_eq!(ccy.as_deref(), Some("USD"));
    assert!((rate.unwrap() - 1.0 / 0.19).abs() < 1e-9);
    assert!(ts.is_some());
    assert_eq!(tx.converted.unwrap().amount_cents, 23947);
}

#[test]
fn create_in_the_reporting_currency_stores_no_snapshot() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(1000, Currency::Usd), None).unwrap();
    assert!(tx.converted.is_none());
    assert_eq!(snapshot_row(&conn, tx.id), (None, None, None, None));
}

#[test]
fn client_supplied_snapshot_is_stored_verbatim() {
    let conn = setup();
    let ts = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
    let supplied = ConversionSnapshot {
        amount_cents: 1111,
        currency: Currency::Usd,
        rate: 0.2442,
        timestamp: ts,
    };
    let tx = create_transaction(&conn, &provider(), &draft(4550, Currency::Brl), Some(supplied))
        .unwrap();

    let (cents, _, rate, stored_ts) = snapshot_row(&conn, tx.id);
    assert_eq!(cents, Some(1111));
    assert_eq!(rate, Some(0.2442));
    assert_eq!(stored_ts, Some(ts.to_rfc3339()));
}

#[test]
fn validation_failure_persists_nothing() {
    let conn = setup();
    let mut bad = draft(0, Currency::Brl);
    bad.category = "".into();
    assert!(create_transaction(&conn, &provider(), &bad, None).is_err());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn edit_recomputes_the_snapshot_when_money_changes() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(4550, Currency::Brl), None).unwrap();

    let patch = TransactionPatch {
        amount_cents: Some(9100),
        ..Default::default()
    };
    update_transaction(&conn, &provider(), tx.id, &patch).unwrap();

    let (cents, ccy, _, _) = snapshot_row(&conn, tx.id);
    // 9100 / 0.19 = 47894.74 -> 47895
    assert_eq!(cents, Some(47895));
    assert_eq!(ccy.as_deref(), Some("USD"));
}

#[test]
fn edit_of_other_fields_leaves_the_snapshot_untouched() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(4550, Currency::Brl), None).unwrap();
    let id = tx.id;
    let before = snapshot_row(&conn, id);

    let patch = TransactionPatch {
        category: Some("Transport".into()),
        description: Some("".into()),
        ..Default::default()
    };
    update_transaction(&conn, &provider(), id, &patch).unwrap();

    assert_eq!(snapshot_row(&conn, id), before);
    let (cat, desc): (String, Option<String>) = conn
        .query_row(
            "SELECT category, description FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(cat, "Transport");
    assert_eq!(desc, None);
}

#[test]
fn edit_to_the_reporting_currency_clears_the_snapshot() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(4550, Currency::Brl), None).unwrap();

    let patch = TransactionPatch {
        currency: Some(Currency::Usd),
        ..Default::default()
    };
    update_transaction(&conn, &provider(), tx.id, &patch).unwrap();
    assert_eq!(snapshot_row(&conn, tx.id), (None, None, None, None));
}

#[test]
fn edit_of_missing_transaction_fails() {
    let conn = setup();
    let patch = TransactionPatch {
        category: Some("Bills".into()),
        ..Default::default()
    };
    assert!(update_transaction(&conn, &provider(), 42, &patch).is_err());
}

#[test]
fn delete_removes_the_row_once() {
    let conn = setup();
    let tx = create_transaction(&conn, &provider(), &draft(1000, Currency::Usd), None).unwrap();
    delete_transaction(&conn, tx.id).unwrap();
    assert!(delete_transaction(&conn, tx.id).is_err());
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(date, type, amount_cents, currency, category)
             VALUES (?1, 'expense', 1000, 'USD', 'Food')",
            params![format!("2025-01-0{}", i)],
        )
        .unwrap();
    }
    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["ledgerly", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_filters_by_type_and_month() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(date, type, amount_cents, currency, category)
         VALUES ('2025-01-15', 'income', 5000, 'USD', 'Salary')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(date, type, amount_cents, currency, category)
         VALUES ('2025-02-15', 'expense', 1000, 'USD', 'Food')",
        [],
    )
    .unwrap();

    let matches = cli::build_cli().get_matches_from([
        "ledgerly", "tx", "list", "--month", "2025-01", "--type", "income",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand")
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand")
    };
    let rows = transactions::query_rows(&conn, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "Salary");
}
