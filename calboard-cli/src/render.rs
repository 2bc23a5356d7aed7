//! Terminal rendering for calboard events.
//!
//! The core hands out events in partition order; sorting by date for
//! display happens here.

use calboard_core::{Event, EventTime};
use chrono::NaiveDate;
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Event {
    fn render(&self) -> String {
        let time = self
            .start_time()
            .map(|t| format_time(&t))
            .unwrap_or_else(|| format!("{:>7}", "?"));

        if self.is_global {
            format!("  {} {} {}", time, self.title.cyan(), "[holiday]".dimmed())
        } else {
            let end = self.end.as_deref().unwrap_or("");
            format!(
                "  {} {} {}",
                time,
                self.title,
                format!("(until {end}) {}", self.id).dimmed()
            )
        }
    }
}

/// Events ordered by start; unparseable starts go last.
///
/// At the same instant all-day events come first, then ties keep their order.
pub fn sort_for_display(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by_key(|e| {
        let start = e.start_time();
        let timed = start.is_some_and(|t| !t.is_all_day());
        (start.is_none(), start, timed)
    });
    sorted
}

/// Print events grouped under a heading per day.
pub fn print_agenda(events: &[Event]) {
    if events.is_empty() {
        println!("{}", "No events found".dimmed());
        return;
    }

    let mut current_date: Option<String> = None;

    for event in sort_for_display(events) {
        let date_label = event
            .start_time()
            .map(|t| format_date_label(t.date()))
            .unwrap_or_else(|| event.start.clone());

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        println!("{}", event.render());
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25 2026")
fn format_date_label(date: NaiveDate) -> String {
    let today = chrono::Local::now().date_naive();

    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}

/// Format the time portion of an event (e.g. "15:00" or "all-day")
fn format_time(time: &EventTime) -> String {
    match time {
        EventTime::Date(_) => "all-day".to_string(),
        EventTime::DateTime(dt) => format!("{:>7}", dt.format("%H:%M")),
        EventTime::DateTimeOffset(dt) => format!("{:>7}", dt.format("%H:%M")),
    }
}
