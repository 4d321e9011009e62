// Copyright (c) Ledgerly.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, ArgGroup, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print JSON instead of a table")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print one JSON object per line")
            .action(ArgAction::SetTrue),
    )
}

pub fn build_cli() -> Command {
    Command::new("ledgerly")
        .about("Ledgerly: multi-currency personal finance tracking")
        .arg_required_else_help(false)
        .subcommand(Command::new("init").about("Initialize the local database"))
        .subcommand(tx_cmd())
        .subcommand(category_cmd())
        .subcommand(fx_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(Command::new("doctor").about("Check the ledger for inconsistencies"))
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Manage transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .help("Display amount, e.g. '12.34', 'R$ 45,50', '1k'"),
                )
                .arg(
                    Arg::new("cents")
                        .long("cents")
                        .help("Pre-computed amount in integer cents")
                        .value_parser(value_parser!(i64)),
                )
                .group(
                    ArgGroup::new("value")
                        .args(["amount", "cents"])
                        .required(true),
                )
                .arg(
                    Arg::new("currency")
                        .long("currency")
                        .default_value("USD")
                        .help("USD, EUR or BRL"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .help("'income' or 'expense'"),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("description").long("description"))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("YYYY-MM-DD, defaults to today"),
                )
                .arg(
                    Arg::new("converted-cents")
                        .long("converted-cents")
                        .help("Client-supplied converted amount in cents")
                        .value_parser(value_parser!(i64)),
                )
                .arg(
                    Arg::new("converted-currency")
                        .long("converted-currency")
                        .help("Currency of the supplied converted amount"),
                )
                .arg(
                    Arg::new("rate")
                        .long("rate")
                        .help("Client-supplied effective exchange rate")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("rate-timestamp")
                        .long("rate-timestamp")
                        .help("RFC 3339 timestamp of the supplied rate"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("category").long("category"))
                .arg(Arg::new("type").long("type"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("edit")
                .about("Update fields of a transaction")
                .arg(
                    Arg::new("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("amount").long("amount"))
                .arg(
                    Arg::new("cents")
                        .long("cents")
                        .value_parser(value_parser!(i64)),
                )
                .arg(Arg::new("currency").long("currency"))
                .arg(Arg::new("type").long("type"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("description")
                        .long("description")
                        .help("New description; pass '' to clear"),
                )
                .arg(Arg::new("date").long("date")),
        )
        .subcommand(
            Command::new("rm").about("Delete a transaction").arg(
                Arg::new("id")
                    .required(true)
                    .value_parser(value_parser!(i64)),
            ),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .arg(Arg::new("name").required(true))
                .arg(Arg::new("icon").long("icon"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("expense")
                        .help("'income' or 'expense'"),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").arg(Arg::new("type").long("type")),
        ))
        .subcommand(Command::new("rm").arg(Arg::new("name").required(true)))
}

fn fx_cmd() -> Command {
    Command::new("fx")
        .about("Exchange rates and conversions")
        .subcommand(json_flags(
            Command::new("rates").about("Show the current rate table (relative to USD)"),
        ))
        .subcommand(
            Command::new("convert")
                .about("Convert an amount between currencies")
                .arg(Arg::new("amount").long("amount").required(true))
                .arg(Arg::new("from").long("from").required(true))
                .arg(Arg::new("to").long("to").required(true)),
        )
        .subcommand(
            Command::new("set-reporting")
                .about("Set the reporting currency for conversion snapshots")
                .arg(Arg::new("currency").required(true)),
        )
}

fn report_cmd() -> Command {
    Command::new("report").about("Aggregated views").subcommand(json_flags(
        Command::new("summary")
            .about("Income/expense/net totals in one currency")
            .arg(Arg::new("month").long("month").help("YYYY-MM"))
            .arg(Arg::new("currency").long("currency")),
    ))
}

fn export_cmd() -> Command {
    Command::new("export").about("Export data").subcommand(
        Command::new("transactions")
            .arg(
                Arg::new("format")
                    .long("format")
                    .default_value("csv")
                    .help("csv or json"),
            )
            .arg(Arg::new("out").long("out").required(true)),
    )
}
