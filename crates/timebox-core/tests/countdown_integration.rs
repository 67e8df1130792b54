//! Integration tests for starting and driving countdown sessions.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use timebox_core::{
    Event, FormInput, PresetStore, SessionCommand, SessionDriver, SessionSnapshot, SessionState,
};

#[test]
fn test_initial_remaining_matches_minutes() {
    for (minutes, expected) in [("0.1", 6), ("1", 60), ("25", 1500), ("2.5", 150)] {
        let session = FormInput::new("Task", "", minutes).submit().unwrap().start();
        assert_eq!(session.remaining_secs(), expected, "minutes = {minutes}");
        assert_eq!(session.state(), SessionState::Running);
    }
}

#[test]
fn test_empty_checklist_has_no_rows() {
    let mut session = FormInput::new("Task", "   \n\n", "0.05").submit().unwrap().start();
    assert!(session.checklist().is_empty());
    assert!(session.all_done());

    let mut ticks = 0;
    while session.tick().is_some() {
        ticks += 1;
    }
    assert_eq!(ticks, 3);
}

#[tokio::test(start_paused = true)]
async fn test_preset_to_expiry() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = PresetStore::open_at(dir.path().join("config.json")).unwrap();
    store
        .upsert_preset("quick", "Quick fix", ["Reproduce", "Patch"], 0.1)
        .unwrap();

    let form = FormInput::from_preset(store.get_preset("quick").unwrap());
    let session = form.submit().unwrap().start();
    assert_eq!(session.checklist().len(), 2);

    let alerts = Rc::new(Cell::new(0));
    let counter = alerts.clone();
    let alert = move |snapshot: &SessionSnapshot| {
        assert_eq!(snapshot.display, "00:00");
        assert_eq!(snapshot.completed_items, 1);
        counter.set(counter.get() + 1);
    };

    let (tx, rx) = mpsc::unbounded_channel();
    tx.send(SessionCommand::Toggle(0)).unwrap();

    let mut displays = Vec::new();
    let outcome = SessionDriver::new(session, alert)
        .run(rx, |event, _| {
            if let Event::SessionTick { display, .. } = event {
                displays.push(display.clone());
            }
        })
        .await;

    assert!(outcome.is_expired());
    assert_eq!(alerts.get(), 1);
    assert_eq!(displays, vec!["00:05", "00:04", "00:03", "00:02", "00:01"]);

    // Still open after expiry: toggling works, no more alerts.
    drop(tx);
    tokio::time::sleep(Duration::from_secs(30)).await;
    let mut session = outcome.into_session();
    session.toggle(1).unwrap();
    assert_eq!(session.completed_items(), 2);
    assert_eq!(alerts.get(), 1);
}
