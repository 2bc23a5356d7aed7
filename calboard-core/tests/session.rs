use std::future::Future;
use std::sync::Mutex;
use std::time::Duration;

use calboard_core::{Event, EventDraft, EventSource, MemoryStore, Selection, Session, StaticSource};
use tokio::sync::oneshot;

/// Resolves only when the test says so.
struct GateSource(Mutex<Option<oneshot::Receiver<Vec<Event>>>>);

impl GateSource {
    fn new() -> (Self, oneshot::Sender<Vec<Event>>) {
        let (tx, rx) = oneshot::channel();
        (GateSource(Mutex::new(Some(rx))), tx)
    }
}

impl EventSource for GateSource {
    fn fetch(&self) -> impl Future<Output = Vec<Event>> + Send {
        let rx = self.0.lock().unwrap().take();
        async move {
            match rx {
                Some(rx) => rx.await.unwrap_or_default(),
                None => Vec::new(),
            }
        }
    }
}

fn republic_day() -> Event {
    Event::global("g1", "Republic Day", "2024-01-26")
}

const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn usable_before_holidays_arrive() {
    let (source, gate) = GateSource::new();
    let mut session = Session::start(MemoryStore::new(), source, QUIET);

    assert!(session.is_fetching());
    assert!(session.visible().is_empty());
    assert!(!session.poll_global());

    let gym = session
        .add_event(&EventDraft::new("Gym", "2024-01-27T08:00", "2024-01-27T09:00"))
        .unwrap();
    assert_eq!(session.visible(), &[gym.clone()]);

    gate.send(vec![republic_day()]).unwrap();
    assert!(session.wait_for_global(Duration::from_secs(1)).await);

    assert!(!session.is_fetching());
    assert_eq!(session.visible(), &[republic_day(), gym]);
}

#[tokio::test]
async fn failed_fetch_leaves_global_partition_empty() {
    let (source, gate) = GateSource::new();
    let mut session = Session::start(MemoryStore::new(), source, QUIET);

    drop(gate);
    session.wait_for_global(Duration::from_secs(1)).await;
    assert!(session.repository().global().is_empty());
    assert!(!session.is_fetching());
}

#[tokio::test(start_paused = true)]
async fn slow_fetch_does_not_block() {
    let (source, _gate) = GateSource::new();
    let mut session = Session::start(MemoryStore::new(), source, QUIET);

    assert!(!session.wait_for_global(Duration::from_millis(50)).await);
    assert!(session.is_fetching());
    assert!(session.begin_add());
}

#[tokio::test]
async fn static_source_backfills() {
    let mut session = Session::start(
        MemoryStore::new(),
        StaticSource(vec![republic_day()]),
        QUIET,
    );
    assert!(session.wait_for_global(Duration::from_secs(1)).await);
    assert_eq!(session.visible(), &[republic_day()]);
}

#[tokio::test(start_paused = true)]
async fn typing_is_debounced() {
    let mut session = Session::offline(MemoryStore::new(), QUIET);
    session
        .add_event(&EventDraft::new("Gym", "2024-01-27T08:00", "2024-01-27T09:00"))
        .unwrap();
    session
        .add_event(&EventDraft::new("Dentist", "2024-01-29T14:00", "2024-01-29T15:00"))
        .unwrap();

    session.type_query("d");
    tokio::time::advance(Duration::from_millis(100)).await;
    session.type_query("de");
    tokio::time::advance(Duration::from_millis(100)).await;
    session.type_query("den");

    tokio::time::advance(Duration::from_millis(200)).await;
    assert!(!session.tick());
    assert_eq!(session.query(), "");
    assert_eq!(session.visible().len(), 2);

    tokio::time::advance(Duration::from_millis(100)).await;
    assert!(session.tick());
    assert_eq!(session.query(), "den");
    assert_eq!(session.visible().len(), 1);
    assert_eq!(session.visible()[0].title, "Dentist");

    assert!(!session.tick());
}

#[tokio::test(start_paused = true)]
async fn settle_query_applies_latest_input() {
    let mut session = Session::offline(MemoryStore::new(), QUIET);
    session
        .add_event(&EventDraft::new("Gym", "2024-01-27T08:00", "2024-01-27T09:00"))
        .unwrap();

    session.type_query("x");
    session.type_query("GYM");
    assert!(session.settle_query().await);

    assert_eq!(session.visible().len(), 1);
}

#[tokio::test]
async fn filter_stays_applied_across_mutations() {
    let mut session = Session::offline(MemoryStore::new(), QUIET);
    session.set_query("gym");

    let gym = session
        .add_event(&EventDraft::new("Gym", "2024-01-27T08:00", "2024-01-27T09:00"))
        .unwrap();
    session
        .add_event(&EventDraft::new("Dentist", "2024-01-29T14:00", "2024-01-29T15:00"))
        .unwrap();
    assert_eq!(session.visible(), &[gym.clone()]);

    session
        .update_event(&gym.id, &EventDraft::new("Yoga", "2024-01-27T08:00", "2024-01-27T09:00"))
        .unwrap();
    assert!(session.visible().is_empty());
    assert_eq!(session.repository().merged().len(), 2);
}

#[tokio::test]
async fn clicks_drive_the_edit_flow() {
    let mut session = Session::start(
        MemoryStore::new(),
        StaticSource(vec![republic_day()]),
        QUIET,
    );
    session.wait_for_global(Duration::from_secs(1)).await;

    assert!(!session.click_event("g1"));
    assert!(!session.click_event("nope"));

    assert!(session.click_date("2024-01-27"));
    session.selection_mut().set_title("Picnic");
    let picnic = session.commit().unwrap().unwrap();
    assert_eq!(session.visible().len(), 2);

    assert!(session.click_event(&picnic.id));
    assert!(!session.click_date("2024-01-28"));
    session.selection_mut().set_title("Beach picnic");
    session.commit().unwrap();
    assert_eq!(session.visible()[1].title, "Beach picnic");

    assert!(session.click_event(&picnic.id));
    assert!(session.dismiss());
    assert_eq!(session.selection().state(), &Selection::Idle);

    session.click_event(&picnic.id);
    session.delete_selected().unwrap();
    assert_eq!(session.visible(), &[republic_day()]);
}
