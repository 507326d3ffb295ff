use clap::ArgMatches;
use tracing::info;

use super::json_types::SweeperListJson;
use super::load_config;
use crate::color;

pub(crate) fn handle_list_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let json_output = matches.get_flag("json");
    info!(event = "cli.list_started", json_output = json_output);

    let config = load_config()?;
    let registry = sweeper_aws::default_registry(&config)?;
    let names = registry.names();

    if json_output {
        let list = SweeperListJson {
            sweepers: names.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
    } else if names.is_empty() {
        println!("No sweepers registered.");
    } else {
        println!("{}", color::bold("Registered sweepers:"));
        for name in &names {
            println!("  {}", name);
        }
    }

    info!(event = "cli.list_completed", count = names.len());
    Ok(())
}
