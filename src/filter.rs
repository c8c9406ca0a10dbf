//! Call-name filtering for the per-call report

use anyhow::{Context, Result};
use regex::Regex;

/// Restricts which calls the per-call report shows.
#[derive(Debug, Clone)]
pub struct CallFilter {
    pattern: Option<Regex>,
}

impl CallFilter {
    /// A filter that matches every call.
    pub fn all() -> Self {
        Self { pattern: None }
    }

    /// Build a filter from a regular expression over call names.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .with_context(|| format!("invalid call filter pattern: {pattern:?}"))?;
        Ok(Self {
            pattern: Some(regex),
        })
    }

    /// Whether a call with this name passes the filter.
    pub fn matches(&self, name: &str) -> bool {
        match &self.pattern {
            Some(regex) => regex.is_match(name),
            None => true,
        }
    }
}

impl Default for CallFilter {
    fn default() -> Self {
        Self::all()
    }
}
