mod driver;
mod session;

pub use driver::{Alert, SessionCommand, SessionDriver, SessionOutcome, TICK_INTERVAL};
pub use session::{
    format_mm_ss, ChecklistItem, CountdownSession, SessionSnapshot, SessionState,
    WARNING_THRESHOLD_SECS,
};
