use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::PostRecord;

static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").unwrap());

/// Hashtags in one text, lowercased, without the leading `#`.
pub fn hashtags(text: &str) -> Vec<String> {
    HASHTAG_RE
        .captures_iter(text)
        .map(|c| c[1].to_ascii_lowercase())
        .collect()
}

/// The `n` most frequent hashtags across the dataset, most frequent first;
/// ties break alphabetically for determinism.
pub fn top_hashtags(records: &[PostRecord], n: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for tag in hashtags(&record.text) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn post(text: &str) -> PostRecord {
        PostRecord {
            post_id: text.to_string(),
            author: "A".to_string(),
            title: None,
            text: text.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            likes: 0,
            comments: 0,
            shares: 0,
            url: None,
        }
    }

    #[test]
    fn extracts_and_lowercases_hashtags() {
        assert_eq!(
            hashtags("Proud day! #NetZero #Sustainability"),
            vec!["netzero", "sustainability"]
        );
    }

    #[test]
    fn text_without_hashtags_yields_nothing() {
        assert!(hashtags("no tags here").is_empty());
    }

    #[test]
    fn top_hashtags_ranks_by_count_then_alphabetically() {
        let records = vec![
            post("#climateaction #netzero"),
            post("#NetZero again"),
            post("#alpha"),
        ];
        let top = top_hashtags(&records, 3);
        assert_eq!(
            top,
            vec![
                ("netzero".to_string(), 2),
                ("alpha".to_string(), 1),
                ("climateaction".to_string(), 1),
            ]
        );
    }
}
