//! Runtime configuration, read from environment variables.
//!
//! | Variable                      | Required | Default                                | Description                        |
//! |-------------------------------|----------|----------------------------------------|------------------------------------|
//! | `FREEZE_WATCH_SENDER`         | yes      | --                                     | Verified SES sender address        |
//! | `FREEZE_WATCH_RECIPIENT`      | yes      | --                                     | Notification recipient             |
//! | `FREEZE_WATCH_LOOKBACK_HOURS` | no       | `24`                                   | Length of the trailing window      |
//! | `FREEZE_WATCH_EVENT_FILTERS`  | no       | `CreateBucket,Create*,Update*,Modify*` | Comma-separated event-name filters |
//! | `FREEZE_WATCH_MAX_PAGES`      | no       | `10`                                   | CloudTrail pages read per run      |
//!
//! The CloudTrail lookup only returns write events (`ReadOnly=false`), so
//! `FREEZE_WATCH_EVENT_FILTERS` selects among mutations. Read-only names such
//! as `Describe*` or `Get*` never match.

use std::env;

use chrono::TimeDelta;

use crate::error::ConfigError;
use crate::filter::FilterSet;

pub const DEFAULT_LOOKBACK_HOURS: i64 = 24;
pub const DEFAULT_MAX_PAGES: u32 = 10;

const SENDER_VAR: &str = "FREEZE_WATCH_SENDER";
const RECIPIENT_VAR: &str = "FREEZE_WATCH_RECIPIENT";
const LOOKBACK_VAR: &str = "FREEZE_WATCH_LOOKBACK_HOURS";
const FILTERS_VAR: &str = "FREEZE_WATCH_EVENT_FILTERS";
const MAX_PAGES_VAR: &str = "FREEZE_WATCH_MAX_PAGES";


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sender: String,
    pub recipient: String,
    pub lookback: TimeDelta,
    pub filters: FilterSet,
    pub max_pages: u32,
}

impl Config {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            lookback: TimeDelta::hours(DEFAULT_LOOKBACK_HOURS),
            filters: FilterSet::default(),
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let sender = get(SENDER_VAR).ok_or(ConfigError::Missing(SENDER_VAR))?;
        let recipient = get(RECIPIENT_VAR).ok_or(ConfigError::Missing(RECIPIENT_VAR))?;
        let mut config = Config::new(sender, recipient);

        if let Some(hours) = get(LOOKBACK_VAR) {
            let hours = parse_positive::<i64>(LOOKBACK_VAR, &hours)?;
            config.lookback = TimeDelta::try_hours(hours).ok_or_else(|| ConfigError::Invalid {
                var: LOOKBACK_VAR,
                reason: format!("{} hours is out of range", hours),
            })?;
        }

        if let Some(filters) = get(FILTERS_VAR) {
            config.filters = FilterSet::parse(&filters)?;
        }

        if let Some(pages) = get(MAX_PAGES_VAR) {
            config.max_pages = parse_positive::<u32>(MAX_PAGES_VAR, &pages)?;
        }

        Ok(config)
    }
}

fn parse_positive<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let parsed = value.parse::<T>().map_err(|err| ConfigError::Invalid {
        var,
        reason: format!("{:?}: {}", value, err),
    })?;

    if parsed <= T::default() {
        return Err(ConfigError::Invalid {
            var,
            reason: format!("{:?}: must be greater than zero", value),
        });
    }
    Ok(parsed)
}
