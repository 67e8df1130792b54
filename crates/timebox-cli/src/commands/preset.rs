//! Preset management commands for the active context.

use clap::Subcommand;
use timebox_core::FormInput;

use super::open_store;
use crate::GlobalArgs;

#[derive(Subcommand)]
pub enum PresetAction {
    /// List presets in the active context
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a preset as it would populate the form
    Show {
        /// Preset name
        name: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save (insert or overwrite) a preset
    Save {
        /// Preset name
        name: String,
        /// Task name
        #[arg(long)]
        task: String,
        /// Definition of done, one item per line ("- " prefixes are stripped)
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        dod: String,
        /// Time limit in minutes
        #[arg(long)]
        minutes: String,
    },
    /// Delete a preset
    Delete {
        /// Preset name
        name: String,
    },
}

pub fn run(global: &GlobalArgs, action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;

    match action {
        PresetAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.presets())?);
                return Ok(());
            }
            if store.presets().is_empty() {
                println!("No presets in context '{}'.", store.active_context());
            }
            for (name, preset) in store.presets() {
                println!(
                    "  {name} - {} ({} min, {} items)",
                    preset.task,
                    preset.duration_minutes,
                    preset.checklist.len()
                );
            }
        }
        PresetAction::Show { name, json } => {
            let preset = store.require_preset(&name)?;
            let form = FormInput::from_preset(preset);
            if json {
                println!("{}", serde_json::to_string_pretty(&form)?);
            } else {
                println!("Task: {}", form.task);
                println!("Minutes: {}", form.minutes_text);
                println!("Definition of Done:");
                for line in form.checklist_text.lines() {
                    println!("  {line}");
                }
            }
        }
        PresetAction::Save {
            name,
            task,
            dod,
            minutes,
        } => {
            let request = FormInput::new(task, dod, minutes).submit()?;
            store.upsert_preset(&name, &request.task, &request.checklist, request.minutes)?;
            println!("Saved preset '{name}' in context '{}'", store.active_context());
        }
        PresetAction::Delete { name } => {
            if store.delete_preset(&name)? {
                println!("Deleted preset '{name}'");
            } else {
                println!("No preset named '{name}'");
            }
        }
    }

    Ok(())
}
