use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{PostRecord, RawPostData, SourceKind};
use crate::error::{ListeningError, Result};

pub mod csv;
pub mod dates;
pub mod mapping;

/// Why a raw row (or one of its fields) failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorKind {
    /// Required field absent or null; row excluded
    MissingRequired,
    /// Date matched no accepted format; row excluded
    Unparseable,
    /// `post_id` repeats an already-accepted row; row excluded
    Duplicate,
    /// Field invalid and clamped/dropped; row retained
    Coerced,
}

impl RowErrorKind {
    /// Fatal kinds exclude the row from the output; `Coerced` does not.
    pub fn is_fatal(self) -> bool {
        !matches!(self, RowErrorKind::Coerced)
    }
}

impl fmt::Display for RowErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RowErrorKind::MissingRequired => "missing_required",
            RowErrorKind::Unparseable => "unparseable",
            RowErrorKind::Duplicate => "duplicate",
            RowErrorKind::Coerced => "coerced",
        };
        f.write_str(s)
    }
}

/// Structured description of a per-row validation problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    /// Zero-based index of the row in the input batch
    pub index: usize,
    /// Canonical name of the offending field
    pub field: String,
    pub reason: RowErrorKind,
    /// Human-readable context for reports and logs
    pub detail: Option<String>,
}

impl RowError {
    fn new(index: usize, field: &str, reason: RowErrorKind, detail: impl Into<String>) -> Self {
        Self {
            index,
            field: field.to_string(),
            reason,
            detail: Some(detail.into()),
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} field '{}': {}", self.index, self.field, self.reason)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Result of normalizing one batch of raw rows.
///
/// `errors` is a complete audit trail: every rejected row is explained by
/// at least one fatal error in it. A single row can carry several fatal
/// errors (one per missing required field), so `fatal_errors()` may exceed
/// the rejected-row count; the latter is always input length minus
/// `records.len()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeOutcome {
    pub records: Vec<PostRecord>,
    pub errors: Vec<RowError>,
}

impl NormalizeOutcome {
    pub fn fatal_errors(&self) -> usize {
        self.errors.iter().filter(|e| e.reason.is_fatal()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[a-z0-9][a-z0-9.-]*(?::\d+)?(?:/\S*)?$").unwrap()
});

/// Normalize a batch of heterogeneous raw rows into canonical post records.
///
/// Rows are processed in input order; accepted rows keep that order in the
/// output. Bad data never raises: per-row problems land in
/// [`NormalizeOutcome::errors`]. Only a structural precondition violation
/// (a row that is not a JSON object) is an `Err`.
///
/// Output guarantees: no duplicate `post_id` (first occurrence wins), all
/// dates canonical, all engagement counts non-negative.
pub fn normalize(raw_rows: &[RawPostData], source: SourceKind) -> Result<NormalizeOutcome> {
    let mut outcome = NormalizeOutcome::default();
    let mut seen_ids: HashSet<String> = HashSet::with_capacity(raw_rows.len());

    for (index, raw) in raw_rows.iter().enumerate() {
        let row = raw
            .as_object()
            .ok_or_else(|| ListeningError::MalformedInput {
                expected: "mapping per row",
                context: format!("row {} is {}", index, json_type_name(raw)),
            })?;

        match normalize_row(index, row, source, &mut seen_ids, &mut outcome.errors) {
            Some(record) => outcome.records.push(record),
            None => debug!(index, "row rejected"),
        }
    }

    debug!(
        source = %source,
        input = raw_rows.len(),
        accepted = outcome.records.len(),
        errors = outcome.errors.len(),
        "batch normalized"
    );
    Ok(outcome)
}

/// Process one row. Returns `None` when the row is rejected; every rejection
/// and coercion has already been pushed onto `errors`.
fn normalize_row(
    index: usize,
    raw: &Map<String, Value>,
    source: SourceKind,
    seen_ids: &mut HashSet<String>,
    errors: &mut Vec<RowError>,
) -> Option<PostRecord> {
    let row = mapping::resolve(source, raw);

    // Required fields first; report all that are missing before rejecting.
    let mut missing = false;
    for field in mapping::REQUIRED_FIELDS {
        let ok = match field {
            // author must also be non-blank
            mapping::AUTHOR => scalar_string(row.get(field))
                .map(|s| !s.trim().is_empty())
                .unwrap_or(false),
            _ => row.get(field).map(|v| !v.is_null()).unwrap_or(false),
        };
        if !ok {
            errors.push(RowError::new(
                index,
                field,
                RowErrorKind::MissingRequired,
                "required field absent, null, or blank",
            ));
            missing = true;
        }
    }
    if missing {
        return None;
    }

    // Required scalars must be representable as strings
    let post_id = match scalar_string(row.get(mapping::POST_ID)) {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => {
            errors.push(RowError::new(
                index,
                mapping::POST_ID,
                RowErrorKind::MissingRequired,
                "identifier is not a usable scalar",
            ));
            return None;
        }
    };
    let author = scalar_string(row.get(mapping::AUTHOR)).unwrap_or_default();
    let text = match scalar_string(row.get(mapping::TEXT)) {
        Some(s) => s,
        None => {
            errors.push(RowError::new(
                index,
                mapping::TEXT,
                RowErrorKind::MissingRequired,
                "post body is not a usable scalar",
            ));
            return None;
        }
    };

    // Date coercion: ordered candidate formats, first match wins
    let date = match dates::coerce_date(&row[mapping::DATE]) {
        Some(d) => d,
        None => {
            errors.push(RowError::new(
                index,
                mapping::DATE,
                RowErrorKind::Unparseable,
                format!("no accepted format matched {}", row[mapping::DATE]),
            ));
            return None;
        }
    };

    // Dedupe: first occurrence wins, later repeats are rejected (and reported)
    if !seen_ids.insert(post_id.clone()) {
        errors.push(RowError::new(
            index,
            mapping::POST_ID,
            RowErrorKind::Duplicate,
            format!("'{}' already accepted earlier in this batch", post_id),
        ));
        return None;
    }

    let mut counts = [0u64; 3];
    for (slot, field) in counts.iter_mut().zip(mapping::COUNT_FIELDS) {
        let (value, coerced) = coerce_count(row.get(field));
        if coerced {
            warn!(index, field, "engagement count clamped to 0");
            errors.push(RowError::new(
                index,
                field,
                RowErrorKind::Coerced,
                "negative or non-numeric count clamped to 0",
            ));
        }
        *slot = value;
    }
    let [likes, comments, shares] = counts;

    let url = match row.get(mapping::URL).and_then(scalar_string_opt) {
        Some(u) if URL_RE.is_match(u.trim()) => Some(u.trim().to_string()),
        Some(u) if u.trim().is_empty() => None,
        Some(_) => {
            // Optional field: same policy as counts, drop it and keep the row
            errors.push(RowError::new(
                index,
                mapping::URL,
                RowErrorKind::Coerced,
                "malformed url dropped",
            ));
            None
        }
        None => None,
    };

    let title = row
        .get(mapping::TITLE)
        .and_then(scalar_string_opt)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Some(PostRecord {
        post_id,
        author: author.trim().to_string(),
        title,
        text,
        date,
        likes,
        comments,
        shares,
        url,
    })
}

/// Accept strings and numbers where a string is expected; API payloads
/// routinely carry numeric identifiers.
fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_string_opt(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        other => scalar_string(Some(other)),
    }
}

/// Coerce an engagement count. Returns `(value, coerced)`; absent and null
/// default to 0 without an error, everything invalid clamps to 0 with one.
fn coerce_count(value: Option<&Value>) -> (u64, bool) {
    let value = match value {
        None | Some(Value::Null) => return (0, false),
        Some(v) => v,
    };
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                (u, false)
            } else if let Some(f) = n.as_f64() {
                if f >= 0.0 && f.fract() == 0.0 {
                    (f as u64, false)
                } else {
                    (f.max(0.0).trunc() as u64, true)
                }
            } else {
                // negative i64
                (0, true)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            // An empty CSV cell means absent, not invalid
            if s.is_empty() {
                return (0, false);
            }
            if let Ok(i) = s.parse::<i64>() {
                if i >= 0 {
                    (i as u64, false)
                } else {
                    (0, true)
                }
            } else if let Ok(f) = s.parse::<f64>() {
                (f.max(0.0).trunc() as u64, true)
            } else {
                (0, true)
            }
        }
        _ => (0, true),
    }
}

fn json_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a bool",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
