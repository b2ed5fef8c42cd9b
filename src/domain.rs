use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ListeningError;

/// Raw post data as handed over by a collector (API client, CSV reader,
/// scraper-export reader) before validation
pub type RawPostData = serde_json::Value;

/// Canonical, validated representation of one social-media post.
///
/// Constructed once during ingestion and immutable afterward; downstream
/// analysis receives the dataset by reference and must not mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRecord {
    /// Unique identifier within a loaded dataset
    pub post_id: String,
    /// Display name of the post author, never blank
    pub author: String,
    /// Author's professional title, when the source provides one
    pub title: Option<String>,
    /// Post body; may be empty but never absent
    pub text: String,
    /// Calendar date the post was published, normalized to ISO
    pub date: NaiveDate,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    /// Permalink to the post, only kept when well-formed
    pub url: Option<String>,
}

/// Which collector produced a batch of raw rows.
///
/// Selects the field-mapping table used during normalization; the same
/// concept travels under different names per source (e.g. API `likeCount`
/// vs. CSV `likes`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Official platform API responses
    Api,
    /// Manually-authored CSV rows
    Csv,
    /// Third-party scraper exports
    Scrape,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Api, SourceKind::Csv, SourceKind::Scrape];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Api => "api",
            SourceKind::Csv => "csv",
            SourceKind::Scrape => "scrape",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceKind {
    type Err = ListeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "api" => Ok(SourceKind::Api),
            "csv" => Ok(SourceKind::Csv),
            "scrape" => Ok(SourceKind::Scrape),
            other => Err(ListeningError::UnknownSource(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_parses_case_insensitively() {
        assert_eq!("API".parse::<SourceKind>().unwrap(), SourceKind::Api);
        assert_eq!(" csv ".parse::<SourceKind>().unwrap(), SourceKind::Csv);
        assert_eq!("scrape".parse::<SourceKind>().unwrap(), SourceKind::Scrape);
    }

    #[test]
    fn source_kind_rejects_unknown_names() {
        let err = "rss".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, ListeningError::UnknownSource(ref s) if s == "rss"));
    }
}
