//! Audit-log lookup capability.
//!
//! CloudTrail's `LookupEvents` accepts a single lookup attribute and compares
//! values exactly, so name patterns cannot be pushed down to the service.
//! [`CloudTrailSource`] narrows the query to write events (`ReadOnly=false`)
//! and applies the [`FilterSet`] to each page itself.

use async_trait::async_trait;
use aws_sdk_cloudtrail::Client;
use aws_sdk_cloudtrail::primitives::DateTime;
use aws_sdk_cloudtrail::types::{Event, LookupAttribute, LookupAttributeKey};

use crate::error::FetchError;
use crate::filter::FilterSet;
use crate::models::{RawEvent, TimeWindow};

/// Upper bound CloudTrail allows for `MaxResults`.
const PAGE_SIZE: i32 = 50;


#[async_trait]
pub trait EventSource: Send + Sync {
    /// Events inside `window` whose name matches any pattern in `filters`,
    /// in the order the service returned them.
    async fn lookup_events(&self, window: &TimeWindow, filters: &FilterSet) -> Result<Vec<RawEvent>, FetchError>;
}


pub struct CloudTrailSource {
    client: Client,
    max_pages: u32,
}

impl CloudTrailSource {
    pub fn new(client: Client, max_pages: u32) -> Self {
        Self { client, max_pages }
    }
}

#[async_trait]
impl EventSource for CloudTrailSource {
    async fn lookup_events(&self, window: &TimeWindow, filters: &FilterSet) -> Result<Vec<RawEvent>, FetchError> {
        let write_events_only = LookupAttribute::builder()
            .attribute_key(LookupAttributeKey::ReadOnly)
            .attribute_value("false")
            .build()?;

        let mut events = Vec::new();
        let mut next_token: Option<String> = None;
        let mut pages = 0;

        loop {
            let output = self.client
                .lookup_events()
                .start_time(DateTime::from_millis(window.start().timestamp_millis()))
                .end_time(DateTime::from_millis(window.end().timestamp_millis()))
                .lookup_attributes(write_events_only.clone())
                .max_results(PAGE_SIZE)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(aws_sdk_cloudtrail::Error::from)?;
            pages += 1;

            let page = output.events();
            tracing::debug!("CloudTrail page {} returned {} events", pages, page.len());
            events.extend(select_matching(page, filters));

            match next_page(output.next_token(), pages, self.max_pages) {
                NextPage::Fetch(token) => next_token = Some(token),
                NextPage::Done => break,
                NextPage::Truncated => {
                    tracing::warn!("Stopping CloudTrail lookup after {} pages, more events remain in the window", pages);
                    break;
                }
            }
        }

        Ok(events)
    }
}


/// What to do after reading a page.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NextPage {
    Fetch(String),
    Done,
    /// The service has more pages but the page budget is spent.
    Truncated,
}

fn next_page(next_token: Option<&str>, pages_read: u32, max_pages: u32) -> NextPage {
    match next_token {
        None => NextPage::Done,
        Some(_) if pages_read >= max_pages => NextPage::Truncated,
        Some(token) => NextPage::Fetch(token.to_string()),
    }
}

/// Keeps the events of one page whose name matches any filter, in page order.
fn select_matching(page: &[Event], filters: &FilterSet) -> Vec<RawEvent> {
    page.iter()
        .filter(|event| match event.event_name() {
            Some(name) => filters.matches(name),
            None => {
                tracing::warn!("Skipping CloudTrail event {:?} with no event name", event.event_id());
                false
            }
        })
        .map(|event| RawEvent {
            event_id: event.event_id().map(str::to_string),
            payload: event.cloud_trail_event().map(str::to_string),
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, name: Option<&str>) -> Event {
        Event::builder()
            .event_id(id)
            .set_event_name(name.map(str::to_string))
            .cloud_trail_event(format!(r#"{{"eventID":"{}"}}"#, id))
            .build()
    }

    #[test]
    fn page_keeps_only_named_events_matching_any_filter() {
        let page = [
            event("1", Some("CreateBucket")),
            event("2", Some("DeleteBucket")),
            event("3", None),
            event("4", Some("ModifyDBInstance")),
            event("5", Some("PutObject")),
            event("6", Some("UpdateTable")),
        ];

        let selected = select_matching(&page, &FilterSet::default());

        let ids: Vec<_> = selected.iter().map(|e| e.event_id.as_deref().unwrap()).collect();
        assert_eq!(ids, ["1", "4", "6"]);
        assert_eq!(selected[0].payload.as_deref(), Some(r#"{"eventID":"1"}"#));
    }

    #[test]
    fn event_matching_several_patterns_is_selected_once() {
        // CreateBucket matches both the exact entry and Create*
        let selected = select_matching(&[event("1", Some("CreateBucket"))], &FilterSet::default());
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn last_page_without_token_ends_lookup() {
        assert_eq!(next_page(None, 1, 10), NextPage::Done);
        assert_eq!(next_page(None, 10, 10), NextPage::Done);
    }

    #[test]
    fn token_within_budget_fetches_next_page() {
        assert_eq!(next_page(Some("page-2"), 1, 10), NextPage::Fetch("page-2".to_string()));
        assert_eq!(next_page(Some("page-10"), 9, 10), NextPage::Fetch("page-10".to_string()));
    }

    #[test]
    fn token_past_budget_truncates() {
        assert_eq!(next_page(Some("page-2"), 1, 1), NextPage::Truncated);
        assert_eq!(next_page(Some("page-11"), 10, 10), NextPage::Truncated);
    }
}
