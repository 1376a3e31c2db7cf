//! Event-name patterns.
//!
//! A [`FilterSet`] is an ordered list of patterns combined with OR: an event
//! name is selected if any pattern matches it. A pattern with a trailing `*`
//! matches by prefix, anything else must match the whole name.

use std::fmt;

use crate::error::FilterError;

pub const DEFAULT_FILTERS: [&str; 4] = ["CreateBucket", "Create*", "Update*", "Modify*"];


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamePattern {
    Exact(String),
    Prefix(String),
}

impl NamePattern {
    pub fn parse(raw: &str) -> Result<Self, FilterError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(FilterError::Blank);
        }

        match raw.strip_suffix('*') {
            Some(prefix) if !prefix.contains('*') => Ok(NamePattern::Prefix(prefix.to_string())),
            Some(_) => Err(FilterError::UnsupportedWildcard(raw.to_string())),
            None if raw.contains('*') => Err(FilterError::UnsupportedWildcard(raw.to_string())),
            None => Ok(NamePattern::Exact(raw.to_string())),
        }
    }

    pub fn matches(&self, event_name: &str) -> bool {
        match self {
            NamePattern::Exact(name) => event_name == name,
            NamePattern::Prefix(prefix) => event_name.starts_with(prefix.as_str()),
        }
    }
}

impl fmt::Display for NamePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamePattern::Exact(name) => write!(f, "{}", name),
            NamePattern::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}


#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSet {
    patterns: Vec<NamePattern>,
}

impl FilterSet {
    pub fn new(patterns: Vec<NamePattern>) -> Result<Self, FilterError> {
        if patterns.is_empty() {
            return Err(FilterError::Empty);
        }
        Ok(Self { patterns })
    }

    /// Parses a comma-separated list such as `CreateBucket,Create*`.
    pub fn parse(list: &str) -> Result<Self, FilterError> {
        let patterns = list
            .split(',')
            .map(NamePattern::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(patterns)
    }

    pub fn patterns(&self) -> &[NamePattern] {
        &self.patterns
    }

    pub fn matches(&self, event_name: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(event_name))
    }
}

impl Default for FilterSet {
    fn default() -> Self {
        // DEFAULT_FILTERS are all well-formed; see default_set_keeps_every_default_filter
        Self {
            patterns: DEFAULT_FILTERS
                .iter()
                .filter_map(|raw| NamePattern::parse(raw).ok())
                .collect(),
        }
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, pattern) in self.patterns.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", pattern)?;
        }
        Ok(())
    }
}
