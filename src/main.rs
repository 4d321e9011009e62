// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use ledgerly::{cli, commands, db, rates::RateProvider};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    // No network access happens until a conversion actually needs rates.
    let provider = RateProvider::live();

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, &provider, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&conn, &provider, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &provider, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
