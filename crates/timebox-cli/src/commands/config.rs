use clap::Subcommand;

use super::open_store;
use crate::GlobalArgs;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file path
    Path,
    /// Print the configuration as JSON
    Show,
}

pub fn run(global: &GlobalArgs, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(global)?;
    match action {
        ConfigAction::Path => {
            println!("{}", store.config_path().display());
        }
        ConfigAction::Show => {
            let json = serde_json::to_string_pretty(store.configuration())?;
            println!("{json}");
        }
    }
    Ok(())
}
