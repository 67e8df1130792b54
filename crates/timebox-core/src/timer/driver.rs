//! Drives a [`CountdownSession`] from the runtime's interval timer.
//!
//! Everything runs on the caller's thread: the driver is a future that
//! waits on a one-second interval and on a command channel. Several drivers
//! may be polled side by side on one current-thread runtime; they share no
//! state. Closing a session is an explicit [`SessionCommand::Close`].

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};

use super::session::{CountdownSession, SessionSnapshot};
use crate::events::Event;

/// Time between ticks.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Shortest tick period accepted by [`SessionDriver::with_interval`].
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Invoked exactly once when a session expires.
pub trait Alert {
    fn expired(&self, snapshot: &SessionSnapshot);
}

impl<F> Alert for F
where
    F: Fn(&SessionSnapshot),
{
    fn expired(&self, snapshot: &SessionSnapshot) {
        self(snapshot)
    }
}

/// Input from the session's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Flip checklist item at this index.
    Toggle(usize),
    /// Abandon the session.
    Close,
}

/// How a driven session ended. The session is handed back so its checklist
/// stays usable after the countdown stops.
#[derive(Debug)]
pub enum SessionOutcome {
    Expired(CountdownSession),
    Abandoned(CountdownSession),
}

impl SessionOutcome {
    pub fn session(&self) -> &CountdownSession {
        match self {
            SessionOutcome::Expired(s) | SessionOutcome::Abandoned(s) => s,
        }
    }

    pub fn into_session(self) -> CountdownSession {
        match self {
            SessionOutcome::Expired(s) | SessionOutcome::Abandoned(s) => s,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, SessionOutcome::Expired(_))
    }
}

pub struct SessionDriver<A> {
    session: CountdownSession,
    alert: A,
    interval: Duration,
}

impl<A: Alert> SessionDriver<A> {
    pub fn new(session: CountdownSession, alert: A) -> Self {
        Self {
            session,
            alert,
            interval: TICK_INTERVAL,
        }
    }

    /// Override the tick period. Periods below one millisecond are raised
    /// to one millisecond.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn session(&self) -> &CountdownSession {
        &self.session
    }

    /// Run until the session expires or a `Close` command arrives.
    ///
    /// `on_event` sees every event, including `SessionStarted` up front and
    /// the terminal one. Once the command channel is closed the countdown
    /// keeps running without input. Missed ticks are delayed, not replayed.
    pub async fn run<F>(
        mut self,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut on_event: F,
    ) -> SessionOutcome
    where
        F: FnMut(&Event, &CountdownSession),
    {
        on_event(&self.session.started_event(), &self.session);
        tracing::info!(
            task = self.session.task(),
            duration_secs = self.session.duration_secs(),
            "countdown started"
        );

        let mut ticker = time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut commands_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let Some(event) = self.session.tick() else {
                        continue;
                    };
                    on_event(&event, &self.session);
                    if let Event::SessionExpired { .. } = event {
                        tracing::info!(task = self.session.task(), "countdown expired");
                        self.alert.expired(&self.session.snapshot());
                        return SessionOutcome::Expired(self.session);
                    }
                }
                command = commands.recv(), if commands_open => match command {
                    Some(SessionCommand::Toggle(index)) => match self.session.toggle(index) {
                        Ok(event) => on_event(&event, &self.session),
                        Err(e) => tracing::warn!("ignoring toggle: {e}"),
                    },
                    Some(SessionCommand::Close) => {
                        let event = self.session.abandoned_event();
                        on_event(&event, &self.session);
                        tracing::info!(
                            task = self.session.task(),
                            remaining_secs = self.session.remaining_secs(),
                            "countdown abandoned"
                        );
                        return SessionOutcome::Abandoned(self.session);
                    }
                    None => commands_open = false,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting_alert() -> (Rc<Cell<u32>>, impl Fn(&SessionSnapshot)) {
        let fired = Rc::new(Cell::new(0));
        let counter = fired.clone();
        (fired, move |_: &SessionSnapshot| counter.set(counter.get() + 1))
    }

    #[tokio::test(start_paused = true)]
    async fn six_second_session_ticks_six_times_then_alerts_once() {
        let (fired, alert) = counting_alert();
        let session = CountdownSession::new("Focus", vec![], 0.1);
        let (_tx, rx) = mpsc::unbounded_channel();

        let start = Instant::now();
        let mut ticks = 0;
        let outcome = SessionDriver::new(session, alert)
            .run(rx, |event, _| {
                if matches!(
                    event,
                    Event::SessionTick { .. } | Event::WarningEntered { .. } | Event::SessionExpired { .. }
                ) {
                    ticks += 1;
                }
            })
            .await;

        assert!(outcome.is_expired());
        assert_eq!(ticks, 6);
        assert_eq!(fired.get(), 1);
        assert!(start.elapsed() >= Duration::from_secs(6));
        assert!(start.elapsed() < Duration::from_secs(7));

        // Window left open: nothing else fires.
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(fired.get(), 1);
        assert_eq!(outcome.session().remaining_secs(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped() {
        let (fired, alert) = counting_alert();
        let session = CountdownSession::new("Blink", vec![], 0.05);
        let (_tx, rx) = mpsc::unbounded_channel();

        let start = Instant::now();
        let outcome = SessionDriver::new(session, alert)
            .with_interval(Duration::ZERO)
            .run(rx, |_, _| {})
            .await;

        assert!(outcome.is_expired());
        assert_eq!(fired.get(), 1);
        assert!(start.elapsed() >= Duration::from_millis(3));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn close_abandons_without_alert() {
        let (fired, alert) = counting_alert();
        let session = CountdownSession::new("Focus", vec![], 10.0);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(SessionCommand::Close).unwrap();

        let outcome = SessionDriver::new(session, alert).run(rx, |_, _| {}).await;

        assert!(!outcome.is_expired());
        assert_eq!(fired.get(), 0);
        assert_eq!(outcome.session().remaining_secs(), 600);
    }

    #[tokio::test(start_paused = true)]
    async fn toggles_are_applied_while_running() {
        let (_fired, alert) = counting_alert();
        let session = CountdownSession::new("Ship", vec!["Build".into(), "Tag".into()], 0.05);
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(SessionCommand::Toggle(1)).unwrap();
        tx.send(SessionCommand::Toggle(7)).unwrap();
        drop(tx);

        let mut toggled = Vec::new();
        let outcome = SessionDriver::new(session, alert)
            .run(rx, |event, _| {
                if let Event::ItemToggled { index, done, .. } = event {
                    toggled.push((*index, *done));
                }
            })
            .await;

        assert_eq!(toggled, vec![(1, true)]);
        let session = outcome.into_session();
        assert!(session.checklist()[1].done);
        assert!(!session.checklist()[0].done);
        assert!(session.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn sessions_run_side_by_side() {
        let (fired_a, alert_a) = counting_alert();
        let (fired_b, alert_b) = counting_alert();
        let (_tx_a, rx_a) = mpsc::unbounded_channel();
        let (tx_b, rx_b) = mpsc::unbounded_channel();

        let a = SessionDriver::new(CountdownSession::new("A", vec![], 0.05), alert_a)
            .run(rx_a, |_, _| {});
        let b = SessionDriver::new(CountdownSession::new("B", vec![], 1.0), alert_b)
            .run(rx_b, |_, _| {});
        let close_b = async {
            time::sleep(Duration::from_millis(4500)).await;
            tx_b.send(SessionCommand::Close).unwrap();
        };

        let (a, b, ()) = tokio::join!(a, b, close_b);

        assert!(a.is_expired());
        assert!(!b.is_expired());
        assert_eq!(b.session().remaining_secs(), 56);
        assert_eq!(fired_a.get(), 1);
        assert_eq!(fired_b.get(), 0);
    }
}
