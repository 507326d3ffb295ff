use clap::ArgMatches;
use tracing::error;

use sweeper_config::SweeperConfig;

use crate::color;

mod json_types;
mod list;
mod run;

pub async fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    match matches.subcommand() {
        Some(("run", sub_matches)) => run::handle_run_command(sub_matches).await,
        Some(("list", sub_matches)) => list::handle_list_command(sub_matches),
        _ => {
            error!(event = "cli.command_unknown");
            Err("Unknown command".into())
        }
    }
}

/// Load the config file, reporting a broken file to the user.
fn load_config() -> Result<SweeperConfig, Box<dyn std::error::Error>> {
    match sweeper_config::load() {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!("{}", color::error(&format!("Failed to load config: {}", e)));
            error!(event = "cli.config_load_failed", error = %e);
            Err(e.into())
        }
    }
}
