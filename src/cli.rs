// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .value_parser(value_parser!(i64))
        .help("Act as this user id (defaults to the active user setting)")
}

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON instead of a table"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("spendwatch")
        .about("Personal finance tracking with budget alerts")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Active user")
                .subcommand(
                    Command::new("use").about("Switch the active user").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(Command::new("show").about("Show the active user")),
        )
        .subcommand(
            Command::new("category")
                .about("Spending categories")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(user_arg()),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income or expense"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("tags").long("tags"))
                        .arg(user_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(Arg::new("from").long("from").help("YYYY-MM-DD inclusive"))
                        .arg(Arg::new("to").long("to").help("YYYY-MM-DD exclusive"))
                        .arg(Arg::new("category").long("category"))
                        .arg(user_arg()),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Correct description or category")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(user_arg()),
                )
                .subcommand(
                    Command::new("rm")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Spending ceilings")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .required(true)
                                .help("monthly, quarterly or yearly"),
                        )
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true))
                        .arg(
                            Arg::new("threshold")
                                .long("threshold")
                                .default_value("80")
                                .help("Alert threshold percent, 0-100"),
                        )
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .action(ArgAction::Append)
                                .help("Restrict to these categories (repeatable)"),
                        )
                        .arg(user_arg()),
                )
                .subcommand(json_flags(Command::new("list").arg(user_arg())))
                .subcommand(
                    Command::new("edit")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("name").long("name"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("threshold").long("threshold"))
                        .arg(user_arg()),
                )
                .subcommand(
                    Command::new("deactivate")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(user_arg()),
                )
                .subcommand(json_flags(
                    Command::new("progress")
                        .about("Evaluate active budgets against current spend")
                        .arg(Arg::new("as-of").long("as-of").help("YYYY-MM-DD, default today"))
                        .arg(user_arg()),
                )),
        )
        .subcommand(
            Command::new("notify")
                .about("Budget and overspending notifications")
                .subcommand(
                    Command::new("check")
                        .about("Derive and persist new notifications")
                        .arg(Arg::new("as-of").long("as-of").help("YYYY-MM-DD, default today"))
                        .arg(user_arg()),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(
                            Arg::new("unread")
                                .long("unread")
                                .action(ArgAction::SetTrue)
                                .help("Only unread notifications"),
                        )
                        .arg(user_arg()),
                ))
                .subcommand(
                    Command::new("read")
                        .about("Mark a notification as read")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("report").about("Statistics").subcommand(json_flags(
                Command::new("summary")
                    .arg(Arg::new("from").long("from").required(true))
                    .arg(Arg::new("to").long("to").required(true).help("exclusive"))
                    .arg(user_arg()),
            )),
        )
        .subcommand(
            Command::new("export")
                .about("Write reports to CSV or JSON files")
                .subcommand(
                    Command::new("summary")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(user_arg()),
                )
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv or json"),
                        )
                        .arg(Arg::new("out").long("out").required(true))
                        .arg(user_arg()),
                ),
        )
}
