use thiserror::Error;

/// The audit-log lookup could not produce events for this run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("lookback window must be positive, got {0} seconds")]
    InvalidWindow(i64),

    #[error("CloudTrail lookup failed: {0}")]
    CloudTrail(#[from] aws_sdk_cloudtrail::Error),

    #[error("invalid lookup request: {0}")]
    Request(#[from] aws_sdk_cloudtrail::error::BuildError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("filter set must contain at least one pattern")]
    Empty,

    #[error("filter set contains a blank pattern")]
    Blank,

    #[error("unsupported pattern {0:?}: only a single trailing '*' is allowed")]
    UnsupportedWildcard(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("FREEZE_WATCH_EVENT_FILTERS is invalid: {0}")]
    Filters(#[from] FilterError),
}
