use clap::{Arg, ArgAction, Command};

pub fn build_cli() -> Command {
    Command::new("sweeper")
        .about("Delete cloud resources left behind by test runs")
        .version(env!("CARGO_PKG_VERSION"))
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show info-level logs (default shows warnings and errors only)")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .help("Disable colored output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Sweep leftover resources in one or more regions")
                .arg(
                    Arg::new("region")
                        .long("region")
                        .short('r')
                        .help("Target region(s), comma separated (defaults to sweep.regions from config)")
                        .value_delimiter(',')
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("sweepers")
                        .long("sweepers")
                        .short('s')
                        .help("Only run these sweepers, comma separated (see `sweeper list`)")
                        .value_delimiter(',')
                        .action(ArgAction::Append),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .short('c')
                        .help("Maximum concurrent describe/delete calls")
                        .value_parser(clap::value_parser!(usize)),
                )
                .arg(
                    Arg::new("allow-failures")
                        .long("allow-failures")
                        .help("Exit successfully even if some resources could not be swept")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output reports as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("list")
                .about("List registered sweepers")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Output as JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
}
