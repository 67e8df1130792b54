//! Run a timebox countdown in the terminal.
//!
//! While the countdown runs, typing an item number and Enter toggles that
//! checklist item; `q` closes the session.

use std::io::Write;

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use timebox_core::{
    CountdownSession, Event, FormInput, SessionCommand, SessionDriver, SessionOutcome,
    SessionSnapshot,
};

use super::open_store;
use crate::GlobalArgs;

#[derive(Args)]
pub struct StartArgs {
    /// Start from a saved preset in the active context
    #[arg(long, conflicts_with_all = ["task", "dod", "minutes"])]
    preset: Option<String>,

    /// Task name
    #[arg(long, required_unless_present = "preset")]
    task: Option<String>,

    /// Definition of done, one item per line ("- " prefixes are stripped)
    #[arg(long, allow_hyphen_values = true)]
    dod: Option<String>,

    /// Time limit in minutes
    #[arg(long, required_unless_present = "preset")]
    minutes: Option<String>,

    /// Print events as JSON lines instead of a live display
    #[arg(long)]
    json: bool,
}

/// Rings the terminal bell and prints a notice.
struct TerminalAlert {
    json: bool,
}

impl timebox_core::Alert for TerminalAlert {
    fn expired(&self, snapshot: &SessionSnapshot) {
        if self.json {
            // Keep stdout pure JSON lines.
            eprint!("\x07");
            let _ = std::io::stderr().flush();
            return;
        }
        println!("\x07");
        println!("Time Box Done: your time box for '{}' has ended!", snapshot.task);
        if !snapshot.checklist.is_empty() {
            println!(
                "Definition of Done: {}/{} complete",
                snapshot.completed_items,
                snapshot.checklist.len()
            );
        }
    }
}

pub fn run(global: &GlobalArgs, args: StartArgs) -> Result<(), Box<dyn std::error::Error>> {
    let form = match &args.preset {
        Some(name) => {
            let store = open_store(global)?;
            FormInput::from_preset(store.require_preset(name)?)
        }
        None => FormInput::new(
            args.task.clone().unwrap_or_default(),
            args.dod.clone().unwrap_or_default(),
            args.minutes.clone().unwrap_or_default(),
        ),
    };
    let session = form.submit()?.start();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let json = args.json;
    let outcome = runtime.block_on(drive(session, json));
    // A pending stdin read must not hold up exit.
    runtime.shutdown_background();

    if !json {
        print_summary(&outcome);
    }
    Ok(())
}

async fn drive(session: CountdownSession, json: bool) -> SessionOutcome {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(read_commands(tx));

    SessionDriver::new(session, TerminalAlert { json })
        .run(rx, |event, session| {
            if json {
                if let Ok(line) = serde_json::to_string(event) {
                    println!("{line}");
                }
            } else {
                render(event, session);
            }
        })
        .await
}

/// Forward stdin lines as session commands until `q` or end of input.
async fn read_commands(tx: mpsc::UnboundedSender<SessionCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!("stopped reading input: {e}");
                return;
            }
        };
        let command = match line.trim() {
            "" => continue,
            "q" | "quit" => SessionCommand::Close,
            other => match other.parse::<usize>() {
                Ok(n) if n > 0 => SessionCommand::Toggle(n - 1),
                _ => {
                    eprintln!("type an item number to toggle it, or q to close");
                    continue;
                }
            },
        };
        let closing = command == SessionCommand::Close;
        if tx.send(command).is_err() || closing {
            return;
        }
    }
}

fn render(event: &Event, session: &CountdownSession) {
    match event {
        Event::SessionStarted { task, .. } => {
            println!("Task: {task}");
            print_checklist(session);
            print_clock(session);
        }
        Event::SessionTick { .. } | Event::WarningEntered { .. } | Event::SessionExpired { .. } => {
            print_clock(session);
        }
        Event::ItemToggled { .. } => {
            println!();
            print_checklist(session);
            print_clock(session);
        }
        Event::SessionAbandoned { .. } => println!(),
    }
}

fn print_clock(session: &CountdownSession) {
    let marker = if session.is_warning() { " !" } else { "" };
    print!("\r{}{marker}  ", session.display());
    let _ = std::io::stdout().flush();
}

fn print_checklist(session: &CountdownSession) {
    for (i, item) in session.checklist().iter().enumerate() {
        let mark = if item.done { "x" } else { " " };
        println!("  {}. [{mark}] {}", i + 1, item.text);
    }
}

fn print_summary(outcome: &SessionOutcome) {
    if let SessionOutcome::Abandoned(session) = outcome {
        println!("Closed with {} left.", session.display());
    }
    let session = outcome.session();
    if session.all_done() && !session.checklist().is_empty() {
        println!("All done!");
    }
}
