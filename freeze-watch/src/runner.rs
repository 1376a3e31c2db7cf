//! Single invocation: fetch the window's events, then mail each one.
//!
//! Neither a failed lookup nor a failed delivery aborts the run. Both are
//! logged, and the returned [`RunReport`] keeps a failed lookup apart from a
//! lookup that found nothing.

use chrono::{DateTime, Utc};
use mailer::Mailer;

use crate::config::Config;
use crate::fetcher;
use crate::models::TimeWindow;
use crate::notifier;
use crate::source::EventSource;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// `found` events came back from the lookup, `decoded` of them were usable.
    Fetched { found: usize, decoded: usize },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub window: Option<TimeWindow>,
    pub fetch: FetchOutcome,
    pub sent: usize,
    pub failed: usize,
}

pub async fn run(
    source: &dyn EventSource,
    mailer: &dyn Mailer,
    config: &Config,
    now: DateTime<Utc>,
) -> RunReport {
    tracing::info!("Freeze watch run started.");

    let mut report = RunReport {
        window: None,
        fetch: FetchOutcome::Failed,
        sent: 0,
        failed: 0,
    };

    let window = match fetcher::compute_window(now, config.lookback) {
        Ok(window) => window,
        Err(err) => {
            tracing::error!("Error computing lookup window: {}", err);
            tracing::info!("Freeze watch run finished.");
            return report;
        }
    };
    report.window = Some(window);

    tracing::info!(
        "Checking CloudTrail events from {} to {} matching {}...",
        window.start(),
        window.end(),
        config.filters
    );

    let fetched = match fetcher::fetch_events(source, &window, &config.filters).await {
        Ok(fetched) => fetched,
        Err(err) => {
            tracing::error!("Error fetching CloudTrail events: {}", err);
            tracing::info!("Freeze watch run finished.");
            return report;
        }
    };
    let records = fetched.records;
    report.fetch = FetchOutcome::Fetched {
        found: fetched.found,
        decoded: records.len(),
    };

    if fetched.found == 0 {
        tracing::info!("No CloudTrail events detected.");
    } else if records.is_empty() {
        tracing::warn!("CloudTrail returned {} events but none could be decoded.", fetched.found);
    } else {
        tracing::info!(
            "Events detected: {} ({} found, {} undecodable)",
            records.len(),
            fetched.found,
            fetched.found - records.len()
        );

        for record in &records {
            match notifier::notify(mailer, &config.sender, &config.recipient, record).await {
                Ok(receipt) => {
                    report.sent += 1;
                    tracing::info!(
                        "Email sent for {} event {}, message id {}",
                        record.name(),
                        record.id(),
                        receipt.message_id.as_deref().unwrap_or("<none>")
                    );
                }
                Err(err) => {
                    report.failed += 1;
                    tracing::error!("Error sending email for event {}: {}", record.id(), err);
                }
            }
        }
    }

    tracing::info!("Freeze watch run finished: {} sent, {} failed.", report.sent, report.failed);
    report
}
