//! Holiday provider client.
//!
//! Fetches the public holidays for one country and year in a single request
//! and turns them into global events. The fetch never fails from the
//! caller's point of view: any problem is logged and yields no holidays.
//! There is no retry; a failed fetch leaves the session without holidays.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use log::{info, warn};
use serde::Deserialize;

use crate::config::HolidayConfig;
use crate::error::{CalboardError, CalboardResult};
use crate::event::{Event, EventTime};

/// A one-shot supplier of global events.
pub trait EventSource {
    fn fetch(&self) -> impl Future<Output = Vec<Event>> + Send;
}

/// Fixed set of global events, for offline sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub Vec<Event>);

impl EventSource for StaticSource {
    fn fetch(&self) -> impl Future<Output = Vec<Event>> + Send {
        let events = self.0.clone();
        async move { events }
    }
}

/// Calendarific-style holiday endpoint.
pub struct HolidaySource {
    client: reqwest::Client,
    config: HolidayConfig,
}

impl HolidaySource {
    pub fn new(config: HolidayConfig) -> CalboardResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(HolidaySource { client, config })
    }

    async fn try_fetch(&self) -> CalboardResult<Vec<Event>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| CalboardError::Fetch("no holidays.api_key configured".into()))?;

        let year = self.config.year.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[
                ("api_key", api_key),
                ("country", self.config.country.as_str()),
                ("year", year.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        parse_holidays(&body)
    }
}

impl EventSource for HolidaySource {
    fn fetch(&self) -> impl Future<Output = Vec<Event>> + Send {
        async move {
            match self.try_fetch().await {
                Ok(events) => {
                    info!(
                        "Fetched {} holiday(s) for {} {}",
                        events.len(),
                        self.config.country,
                        self.config.year
                    );
                    events
                }
                Err(e) => {
                    warn!("{e}; continuing without holidays");
                    Vec::new()
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct HolidayEnvelope {
    response: HolidayResponse,
}

#[derive(Deserialize)]
struct HolidayResponse {
    holidays: Vec<HolidayRecord>,
}

#[derive(Deserialize)]
struct HolidayRecord {
    name: String,
    date: HolidayDate,
}

#[derive(Deserialize)]
struct HolidayDate {
    iso: String,
}

/// Parse a provider payload of the shape
/// `{ "response": { "holidays": [ { "name", "date": { "iso" } } ] } }`.
///
/// Any deviation rejects the whole payload.
pub fn parse_holidays(body: &str) -> CalboardResult<Vec<Event>> {
    let envelope: HolidayEnvelope = serde_json::from_str(body)
        .map_err(|e| CalboardError::Fetch(format!("Unexpected holiday payload: {e}")))?;

    let mut seen = HashSet::new();
    let mut events = Vec::with_capacity(envelope.response.holidays.len());

    for record in envelope.response.holidays {
        if record.name.trim().is_empty() {
            return Err(CalboardError::Fetch("Holiday without a name".into()));
        }
        if EventTime::parse(&record.date.iso).is_none() {
            return Err(CalboardError::Fetch(format!(
                "Holiday '{}' has an invalid date '{}'",
                record.name, record.date.iso
            )));
        }

        let id = unique_holiday_id(&record, &mut seen);
        events.push(Event::global(id, record.name, record.date.iso));
    }

    Ok(events)
}

/// `holiday-<date>-<slug>`, suffixed `-2`, `-3`, ... when the provider lists
/// the same name on the same day more than once (regional observances).
fn unique_holiday_id(record: &HolidayRecord, seen: &mut HashSet<String>) -> String {
    let date = EventTime::parse(&record.date.iso)
        .map(|t| t.date().format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| record.date.iso.clone());
    let base = format!("holiday-{}-{}", date, slug::slugify(&record.name));

    if seen.insert(base.clone()) {
        return base;
    }

    let mut n = 2;
    loop {
        let suffixed = format!("{}-{}", base, n);
        if seen.insert(suffixed.clone()) {
            return suffixed;
        }
        n += 1;
    }
}
