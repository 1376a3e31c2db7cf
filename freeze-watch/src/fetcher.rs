//! Event fetcher: window computation, lookup and payload decoding.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::FetchError;
use crate::filter::FilterSet;
use crate::models::{EventRecord, RawEvent, TimeWindow};
use crate::source::EventSource;


pub fn compute_window(now: DateTime<Utc>, lookback: TimeDelta) -> Result<TimeWindow, FetchError> {
    TimeWindow::trailing(now, lookback)
}

#[derive(Debug, Clone, Default)]
pub struct FetchedEvents {
    /// Events the source returned, decodable or not.
    pub found: usize,
    pub records: Vec<EventRecord>,
}

/// Looks up matching events and decodes their payloads, keeping the order
/// the source returned. Payloads that are missing or not valid JSON are
/// logged and dropped; the rest of the batch is still returned.
pub async fn fetch_events(
    source: &dyn EventSource,
    window: &TimeWindow,
    filters: &FilterSet,
) -> Result<FetchedEvents, FetchError> {
    let raw_events = source.lookup_events(window, filters).await?;

    Ok(FetchedEvents {
        found: raw_events.len(),
        records: raw_events.iter().filter_map(decode_event).collect(),
    })
}

fn decode_event(raw: &RawEvent) -> Option<EventRecord> {
    let event_id = raw.event_id.as_deref().unwrap_or("<no id>");

    let payload = match raw.payload {
        Some(ref payload) => payload,
        None => {
            tracing::warn!("Event {} has no payload, skipping.", event_id);
            return None;
        }
    };

    match serde_json::from_str::<EventRecord>(payload) {
        Ok(record) => {
            tracing::debug!("Event details: {:?}", record);
            Some(record)
        }
        Err(err) => {
            tracing::error!("Failed to parse payload of event {} as JSON: {}", event_id, err);
            None
        }
    }
}
