use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{Map, Value};

use crate::domain::SourceKind;

/// Canonical field names produced by mapping, consumed by the normalizer.
pub const POST_ID: &str = "post_id";
pub const AUTHOR: &str = "author";
pub const TITLE: &str = "title";
pub const TEXT: &str = "text";
pub const DATE: &str = "date";
pub const LIKES: &str = "likes";
pub const COMMENTS: &str = "comments";
pub const SHARES: &str = "shares";
pub const URL: &str = "url";

/// Fields that must be present and non-null for a row to be accepted.
pub const REQUIRED_FIELDS: [&str; 4] = [POST_ID, AUTHOR, TEXT, DATE];

/// Engagement count fields, coerced (never fatal) during normalization.
pub const COUNT_FIELDS: [&str; 3] = [LIKES, COMMENTS, SHARES];

static API_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("id", POST_ID),
        ("postId", POST_ID),
        ("urn", POST_ID),
        ("authorName", AUTHOR),
        ("author", AUTHOR),
        ("authorHeadline", TITLE),
        ("headline", TITLE),
        ("commentary", TEXT),
        ("text", TEXT),
        ("createdAt", DATE),
        ("publishedAt", DATE),
        ("likeCount", LIKES),
        ("commentCount", COMMENTS),
        ("shareCount", SHARES),
        ("permalink", URL),
        ("url", URL),
    ])
});

// Canonical manual-entry columns map onto themselves so an already-canonical
// row round-trips untouched.
static CSV_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (POST_ID, POST_ID),
        (AUTHOR, AUTHOR),
        (TITLE, TITLE),
        (TEXT, TEXT),
        (DATE, DATE),
        (LIKES, LIKES),
        (COMMENTS, COMMENTS),
        (SHARES, SHARES),
        (URL, URL),
    ])
});

static SCRAPE_FIELDS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("postUrn", POST_ID),
        ("post_id", POST_ID),
        ("profileName", AUTHOR),
        ("profileTitle", TITLE),
        ("postText", TEXT),
        ("postDate", DATE),
        ("postTimestamp", DATE),
        ("numLikes", LIKES),
        ("numComments", COMMENTS),
        ("numShares", SHARES),
        ("postUrl", URL),
    ])
});

fn table(source: SourceKind) -> &'static HashMap<&'static str, &'static str> {
    match source {
        SourceKind::Api => &API_FIELDS,
        SourceKind::Csv => &CSV_FIELDS,
        SourceKind::Scrape => &SCRAPE_FIELDS,
    }
}

/// Resolve a raw row's field names to canonical ones through the table for
/// `source`. Unknown input keys are dropped, not errors. When two input keys
/// map to the same canonical field the first resolved value wins.
pub fn resolve(source: SourceKind, raw: &Map<String, Value>) -> Map<String, Value> {
    let mapping = table(source);
    let mut resolved = Map::new();
    for (key, value) in raw {
        if let Some(&canonical) = mapping.get(key.as_str()) {
            resolved
                .entry(canonical.to_string())
                .or_insert_with(|| value.clone());
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn api_fields_resolve_to_canonical_names() {
        let raw = as_map(json!({
            "id": "p1",
            "authorName": "A",
            "commentary": "hello",
            "createdAt": "2024-01-15",
            "likeCount": 10,
            "permalink": "https://example.com/p1"
        }));

        let resolved = resolve(SourceKind::Api, &raw);
        assert_eq!(resolved[POST_ID], json!("p1"));
        assert_eq!(resolved[AUTHOR], json!("A"));
        assert_eq!(resolved[TEXT], json!("hello"));
        assert_eq!(resolved[DATE], json!("2024-01-15"));
        assert_eq!(resolved[LIKES], json!(10));
        assert_eq!(resolved[URL], json!("https://example.com/p1"));
    }

    #[test]
    fn csv_fields_pass_through_unchanged() {
        let raw = as_map(json!({
            "post_id": "p1",
            "author": "A",
            "text": "hello",
            "date": "2024-01-15"
        }));

        let resolved = resolve(SourceKind::Csv, &raw);
        assert_eq!(resolved, raw);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let raw = as_map(json!({
            "postUrn": "p1",
            "reactions_breakdown": {"praise": 3}
        }));

        let resolved = resolve(SourceKind::Scrape, &raw);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[POST_ID], json!("p1"));
    }
}
