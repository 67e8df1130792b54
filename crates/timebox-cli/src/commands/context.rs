//! Context management commands.
//!
//! Each context is a separate preset collection stored in its own file.

use clap::Subcommand;

use super::{confirm, open_store};
use crate::GlobalArgs;

#[derive(Subcommand)]
pub enum ContextAction {
    /// List all contexts
    List,
    /// Show the active and default contexts
    Current,
    /// Create an empty context and make it active
    Create {
        /// Context name
        name: String,
    },
    /// Switch to another context
    Switch {
        /// Context name
        name: String,
    },
    /// Rename a context
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },
    /// Delete a context and all of its presets
    Delete {
        /// Context name
        name: String,
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Make the active context the default (combine with --context)
    SetDefault,
}

pub fn run(global: &GlobalArgs, action: ContextAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(global)?;

    match action {
        ContextAction::List => {
            for name in store.list_contexts()? {
                let mut tags = Vec::new();
                if name == store.active_context() {
                    tags.push("active");
                }
                if name == store.default_context() {
                    tags.push("default");
                }
                if tags.is_empty() {
                    println!("  {name}");
                } else {
                    println!("  {name} [{}]", tags.join(", "));
                }
            }
        }
        ContextAction::Current => {
            println!("Active context: {}", store.active_context());
            println!("Default context: {}", store.default_context());
        }
        ContextAction::Create { name } => {
            store.create_context(&name)?;
            println!("Created context: {}", store.active_context());
        }
        ContextAction::Switch { name } => {
            let _ = store.switch_context(&name)?;
            println!(
                "Active context: {} ({} presets)",
                store.active_context(),
                store.presets().len()
            );
        }
        ContextAction::Rename { old, new } => {
            store.rename_context(&old, &new)?;
            println!("Renamed context: {old} -> {new}");
        }
        ContextAction::Delete { name, yes } => {
            if !yes && !confirm(&format!("Delete context '{name}' and all its presets?"))? {
                println!("Aborted.");
                return Ok(());
            }
            store.delete_context(&name)?;
            println!("Deleted context: {name}");
        }
        ContextAction::SetDefault => {
            store.set_default_context()?;
            println!("Default context: {}", store.default_context());
        }
    }

    Ok(())
}
