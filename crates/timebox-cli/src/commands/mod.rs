pub mod config;
pub mod context;
pub mod preset;
pub mod start;

use std::io::{BufRead, Write};

use timebox_core::PresetStore;

use crate::GlobalArgs;

/// Open the preset store and activate `--context` if given.
pub fn open_store(global: &GlobalArgs) -> Result<PresetStore, Box<dyn std::error::Error>> {
    let mut store = match &global.config {
        Some(path) => PresetStore::open_at(path)?,
        None => PresetStore::open()?,
    };
    if let Some(name) = &global.context {
        // No form is open yet, so there is nothing to clear.
        let _ = store.switch_context(name)?;
    }
    Ok(store)
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
pub fn confirm(prompt: &str) -> Result<bool, Box<dyn std::error::Error>> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
