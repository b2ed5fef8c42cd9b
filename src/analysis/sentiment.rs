//! Lexicon-based sentiment scoring.
//!
//! Each post gets a polarity in [-1.0, 1.0]: sentiment-bearing tokens score
//! +1 or -1 (flipped when preceded by a negator) and the polarity is their
//! mean. Posts with no sentiment-bearing tokens are neutral at 0.0.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::PostRecord;

/// Polarity above this is labeled positive
pub const POSITIVE_THRESHOLD: f64 = 0.1;
/// Polarity below this is labeled negative
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "accurate",
        "amazing",
        "beneficial",
        "best",
        "breakthrough",
        "clear",
        "effective",
        "efficient",
        "excellent",
        "exciting",
        "fantastic",
        "good",
        "great",
        "helpful",
        "impressive",
        "innovative",
        "inspiring",
        "love",
        "outstanding",
        "perfect",
        "positive",
        "proud",
        "recommend",
        "reliable",
        "revolutionary",
        "smooth",
        "smoother",
        "streamlined",
        "strong",
        "success",
        "successful",
        "transformative",
        "valuable",
        "win",
        "wonderful",
    ])
});

static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "bad",
        "broken",
        "challenge",
        "challenges",
        "complex",
        "complexity",
        "concern",
        "concerns",
        "confusing",
        "costly",
        "difficult",
        "disappointing",
        "doubt",
        "expensive",
        "fail",
        "failed",
        "failure",
        "frustrating",
        "hard",
        "inaccurate",
        "issue",
        "issues",
        "lacking",
        "negative",
        "poor",
        "problem",
        "problems",
        "risk",
        "slow",
        "struggle",
        "terrible",
        "unclear",
        "unreliable",
        "worst",
        "worry",
    ])
});

static NEGATORS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["not", "no", "never", "without", "hardly", "isn't", "don't"]));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentScore {
    pub label: Sentiment,
    pub polarity: f64,
}

/// Score one text. Pure; tokenization lowercases and strips punctuation
/// except in-word apostrophes.
pub fn analyze(text: &str) -> SentimentScore {
    let tokens = tokenize(text);
    let mut sum = 0i64;
    let mut hits = 0u64;

    for (i, token) in tokens.iter().enumerate() {
        let value = if POSITIVE_WORDS.contains(token.as_str()) {
            1
        } else if NEGATIVE_WORDS.contains(token.as_str()) {
            -1
        } else {
            continue;
        };
        let negated = i > 0 && NEGATORS.contains(tokens[i - 1].as_str());
        sum += if negated { -value } else { value };
        hits += 1;
    }

    let polarity = if hits == 0 {
        0.0
    } else {
        (sum as f64 / hits as f64).clamp(-1.0, 1.0)
    };
    SentimentScore {
        label: label_for(polarity),
        polarity,
    }
}

pub fn label_for(polarity: f64) -> Sentiment {
    if polarity > POSITIVE_THRESHOLD {
        Sentiment::Positive
    } else if polarity < NEGATIVE_THRESHOLD {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.trim_matches('\'').to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Dataset-level sentiment counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
    pub mean_polarity: f64,
}

pub fn breakdown(records: &[PostRecord]) -> SentimentBreakdown {
    let mut out = SentimentBreakdown::default();
    let mut polarity_sum = 0.0;
    for record in records {
        let score = analyze(&record.text);
        polarity_sum += score.polarity;
        match score.label {
            Sentiment::Positive => out.positive += 1,
            Sentiment::Neutral => out.neutral += 1,
            Sentiment::Negative => out.negative += 1,
        }
    }
    if !records.is_empty() {
        out.mean_polarity = polarity_sum / records.len() as f64;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_text_scores_positive() {
        let score = analyze("Their approach is revolutionary! Highly recommend.");
        assert_eq!(score.label, Sentiment::Positive);
        assert!(score.polarity > POSITIVE_THRESHOLD);
    }

    #[test]
    fn negative_text_scores_negative() {
        let score = analyze("Concerns about the complexity. Implementation is difficult.");
        assert_eq!(score.label, Sentiment::Negative);
        assert!(score.polarity < NEGATIVE_THRESHOLD);
    }

    #[test]
    fn text_without_sentiment_words_is_neutral() {
        let score = analyze("The quarterly report was published on Tuesday.");
        assert_eq!(score.label, Sentiment::Neutral);
        assert_eq!(score.polarity, 0.0);
    }

    #[test]
    fn negation_flips_polarity() {
        let score = analyze("This is not good");
        assert_eq!(score.label, Sentiment::Negative);
    }

    #[test]
    fn label_thresholds_are_exclusive_at_the_boundary() {
        assert_eq!(label_for(0.1), Sentiment::Neutral);
        assert_eq!(label_for(0.10001), Sentiment::Positive);
        assert_eq!(label_for(-0.1), Sentiment::Neutral);
        assert_eq!(label_for(-0.10001), Sentiment::Negative);
    }

    #[test]
    fn mixed_text_averages_out() {
        // one positive, one negative token
        let score = analyze("great product, terrible pricing");
        assert_eq!(score.polarity, 0.0);
        assert_eq!(score.label, Sentiment::Neutral);
    }
}
