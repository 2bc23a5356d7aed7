//! Title filter over the merged view, and the debouncer that feeds it.

use std::time::Duration;

use tokio::time::Instant;

use crate::event::Event;

/// Quiet period after the last keystroke before the filter runs.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Events whose title contains `query`, ignoring case. Order is preserved;
/// an empty query keeps everything.
pub fn apply(events: &[Event], query: &str) -> Vec<Event> {
    if query.is_empty() {
        return events.to_vec();
    }

    let needle = query.to_lowercase();
    events
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Trailing-edge debouncer.
///
/// Each `push` replaces the pending value and restarts the quiet period.
/// The value is released once, after the period elapses with no further
/// pushes; intermediate values are discarded.
#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.quiet));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Release the pending value if its quiet period is over.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if deadline <= now => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Wait out the quiet period and release the latest value.
    pub async fn settled(&mut self) -> Option<T> {
        let deadline = self.deadline()?;
        tokio::time::sleep_until(deadline).await;
        self.pending.take().map(|(value, _)| value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Debouncer::new(DEFAULT_QUIET_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventDraft;

    fn events() -> Vec<Event> {
        vec![
            Event::global("g1", "Republic Day", "2024-01-26"),
            Event::global("g2", "Holi", "2024-03-25"),
            Event::user(
                "u1",
                &EventDraft::new("REPUBLIC day brunch", "2024-01-26T11:00", "2024-01-26T13:00"),
            ),
        ]
    }

    #[test]
    fn empty_query_is_identity() {
        assert_eq!(apply(&events(), ""), events());
    }

    #[test]
    fn matches_case_insensitively_in_order() {
        let ids: Vec<_> = apply(&events(), "RePuBlIc")
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["g1", "u1"]);
    }

    #[test]
    fn matches_substrings() {
        assert_eq!(apply(&events(), "ol").len(), 1);
        assert!(apply(&events(), "diwali").is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        for q in ["", "day", "HOLI", "x"] {
            let once = apply(&events(), q);
            assert_eq!(apply(&once, q), once);
        }
    }

    #[test]
    fn releases_latest_value_after_quiet_period() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push("r", t0);
        debouncer.push("re", t0 + Duration::from_millis(100));
        debouncer.push("rep", t0 + Duration::from_millis(200));

        assert_eq!(debouncer.poll(t0 + Duration::from_millis(450)), None);
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(500)), Some("rep"));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(900)), None);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn each_push_restarts_the_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(Duration::from_millis(300));

        debouncer.push(1, t0);
        assert_eq!(debouncer.deadline(), Some(t0 + Duration::from_millis(300)));
        debouncer.push(2, t0 + Duration::from_millis(250));
        assert_eq!(debouncer.deadline(), Some(t0 + Duration::from_millis(550)));
        assert_eq!(debouncer.poll(t0 + Duration::from_millis(300)), None);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_waits_for_the_quiet_period() {
        let mut debouncer = Debouncer::default();
        let start = Instant::now();

        debouncer.push("holi".to_string(), start);
        let value = debouncer.settled().await;

        assert_eq!(value.as_deref(), Some("holi"));
        assert!(start.elapsed() >= DEFAULT_QUIET_PERIOD);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_without_input_returns_none() {
        let mut debouncer: Debouncer<String> = Debouncer::default();
        assert_eq!(debouncer.settled().await, None);
    }
}
