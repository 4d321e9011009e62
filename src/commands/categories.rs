// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CATEGORY_NAME_MAX, Category, TransactionType};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let icon = sub.get_one::<String>("icon").map(|s| s.as_str());
            let r#type = TransactionType::from_str(sub.get_one::<String>("type").unwrap())?;
            add_category(conn, name, icon, r#type)?;
            println!("Added category '{}'", name);
        }
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let n = conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            if n == 0 {
                bail!("Category '{}' not found", name);
            }
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn add_category(
    conn: &Connection,
    name: &str,
    icon: Option<&str>,
    r#type: TransactionType,
) -> Result<i64> {
    if name.trim().is_empty() {
        bail!("Category name is required");
    }
    if name.chars().count() > CATEGORY_NAME_MAX {
        bail!("Category name limit is {} characters", CATEGORY_NAME_MAX);
    }
    if let Some(icon) = icon {
        if icon.chars().count() > 2 || icon.is_empty() {
            bail!("Icon must be 1-2 characters");
        }
    }
    let n = conn.execute(
        "INSERT OR IGNORE INTO categories(name, icon, type) VALUES (?1, ?2, ?3)",
        params![name, icon.unwrap_or("📌"), r#type.as_str()],
    )?;
    if n == 0 {
        bail!("Category '{}' already exists", name);
    }
    Ok(conn.last_insert_rowid())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut sql = String::from("SELECT id, name, icon, type FROM categories WHERE 1=1");
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(t) = sub.get_one::<String>("type") {
        sql.push_str(" AND type=?");
        params_vec.push(t.into());
    }
    sql.push_str(" ORDER BY name");

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

    let mut data: Vec<Category> = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            icon: r.get(2)?,
            r#type: TransactionType::from_str(&r.get::<_, String>(3)?)?,
        });
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.icon.clone(),
                    c.name.clone(),
                    c.r#type.as_str().to_string(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Icon", "Category", "Type"], rows));
    }
    Ok(())
}
