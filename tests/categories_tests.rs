// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use ledgerly::commands::categories::add_category;
use ledgerly::models::TransactionType;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE categories(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            icon TEXT NOT NULL DEFAULT '📌',
            type TEXT NOT NULL DEFAULT 'expense'
        );
        "#,
    )
    .unwrap();
    conn
}

#[test]
fn add_stores_name_icon_and_type() {
    let conn = setup();
    add_category(&conn, "Food", Some("🍔"), TransactionType::Expense).unwrap();
    add_category(&conn, "Salary", None, TransactionType::Income).unwrap();

    let (icon, t): (String, String) = conn
        .query_row(
            "SELECT icon, type FROM categories WHERE name='Food'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(icon, "🍔");
    assert_eq!(t, "expense");

    let icon: String = conn
        .query_row("SELECT icon FROM categories WHERE name='Salary'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(icon, "📌");
}

#[test]
fn duplicate_names_are_rejected() {
    let conn = setup();
    add_category(&conn, "Food", None, TransactionType::Expense).unwrap();
    assert!(add_category(&conn, "Food", None, TransactionType::Expense).is_err());
}

#[test]
fn name_length_is_bounded() {
    let conn = setup();
    assert!(add_category(&conn, "", None, TransactionType::Expense).is_err());
    assert!(add_category(&conn, "x".repeat(13).as_str(), None, TransactionType::Expense).is_err());
    assert!(add_category(&conn, "x".repeat(12).as_str(), None, TransactionType::Expense).is_ok());
}
