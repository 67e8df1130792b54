//! # Timebox Core Library
//!
//! Core logic for the Timebox timer: define a task, a definition-of-done
//! checklist and a time limit, count down, alert on expiry. Front ends (the
//! `timebox` CLI) are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Storage**: JSON configuration plus one JSON preset document per
//!   context, with the active context held by an explicit [`PresetStore`]
//! - **Form**: submit-time validation of raw form text into a
//!   [`TimeboxRequest`]
//! - **Timer**: the [`CountdownSession`] state machine and the
//!   [`SessionDriver`] that ticks it once per second on the caller's thread
//!
//! ## Key Components
//!
//! - [`PresetStore`]: context lifecycle and preset CRUD
//! - [`CountdownSession`]: `Running -> Expired` countdown with checklist state
//! - [`Alert`]: collaborator invoked once on expiry

pub mod error;
pub mod events;
pub mod form;
pub mod storage;
pub mod timer;

pub use error::{CoreError, EntityKind, StorageError, ValidationError};
pub use events::Event;
pub use form::{FormInput, TimeboxRequest};
pub use storage::{Configuration, ContextSwitch, Preset, PresetMap, PresetStore};
pub use timer::{
    Alert, CountdownSession, SessionCommand, SessionDriver, SessionOutcome, SessionSnapshot,
    SessionState,
};
