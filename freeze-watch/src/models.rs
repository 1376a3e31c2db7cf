use chrono::{DateTime, TimeDelta, Utc};

use crate::error::FetchError;

pub const UNKNOWN_EVENT: &str = "Unknown Event";
pub const UNKNOWN_TIME: &str = "Unknown Time";
pub const UNKNOWN_ID: &str = "Unknown ID";
pub const UNKNOWN_ACCOUNT: &str = "Unknown Account";
pub const UNKNOWN_USER: &str = "Unknown User";


/// One lookup result as returned by the audit-log service. `payload` is the
/// full event serialized as JSON text.
#[derive(Debug, Clone, Default)]
pub struct RawEvent {
    pub event_id: Option<String>,
    pub payload: Option<String>,
}

/// The decoded CloudTrail event. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub event_name: Option<String>,
    pub event_time: Option<String>,
    #[serde(rename = "eventID")]
    pub event_id: Option<String>,
    pub event_source: Option<String>,
    pub aws_region: Option<String>,
    pub user_identity: Option<UserIdentity>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub account_id: Option<String>,
    pub arn: Option<String>,
}

impl EventRecord {
    pub fn name(&self) -> &str {
        self.event_name.as_deref().unwrap_or(UNKNOWN_EVENT)
    }

    pub fn time(&self) -> &str {
        self.event_time.as_deref().unwrap_or(UNKNOWN_TIME)
    }

    pub fn id(&self) -> &str {
        self.event_id.as_deref().unwrap_or(UNKNOWN_ID)
    }

    pub fn account_id(&self) -> &str {
        self.user_identity
            .as_ref()
            .and_then(|identity| identity.account_id.as_deref())
            .unwrap_or(UNKNOWN_ACCOUNT)
    }

    pub fn actor(&self) -> &str {
        self.user_identity
            .as_ref()
            .and_then(|identity| identity.arn.as_deref())
            .unwrap_or(UNKNOWN_USER)
    }
}


/// Trailing lookup range. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// The window of length `lookback` ending at `end`.
    pub fn trailing(end: DateTime<Utc>, lookback: TimeDelta) -> Result<Self, FetchError> {
        if lookback <= TimeDelta::zero() {
            return Err(FetchError::InvalidWindow(lookback.num_seconds()));
        }
        let start = end
            .checked_sub_signed(lookback)
            .ok_or(FetchError::InvalidWindow(lookback.num_seconds()))?;

        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}
