use anyhow::Result;
use chrono::NaiveDate;
use serde_json::json;

use social_listening::analysis::{engagement, keywords, sentiment};
use social_listening::domain::SourceKind;
use social_listening::ingest::{self, RowErrorKind};

#[test]
fn test_mixed_batch_end_to_end() -> Result<()> {
    let rows = vec![
        json!({
            "post_id": "post_001",
            "author": "Sarah Johnson",
            "title": "Climate Solutions Architect",
            "text": "Their approach to standardizing carbon accounting is revolutionary! #CarbonMeasures #ClimateAction",
            "likes": 245,
            "comments": 32,
            "shares": 18,
            "date": "2024-01-15",
            "url": "https://linkedin.com/post/001"
        }),
        // duplicate id, must lose to the row above
        json!({
            "post_id": "post_001",
            "author": "Someone Else",
            "text": "dup",
            "date": "2024-01-16"
        }),
        // negative likes clamp but the row survives
        json!({
            "post_id": "post_002",
            "author": "Michael Chen",
            "text": "Concerns about the complexity of implementation. #CarbonMeasures",
            "likes": -5,
            "date": "01/16/2024"
        }),
        // missing author, excluded
        json!({
            "post_id": "post_003",
            "text": "anonymous",
            "date": "2024-01-17"
        }),
        // unparseable date, excluded
        json!({
            "post_id": "post_004",
            "author": "Emma Williams",
            "text": "soon",
            "date": "next tuesday"
        }),
    ];

    let outcome = ingest::normalize(&rows, SourceKind::Csv)?;

    // Two accepted, three fatal errors, one informational coercion
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.fatal_errors(), 3);
    assert_eq!(outcome.errors.len(), 4);
    assert_eq!(rows.len() - outcome.records.len(), outcome.fatal_errors());

    let first = &outcome.records[0];
    assert_eq!(first.post_id, "post_001");
    assert_eq!(first.author, "Sarah Johnson");
    let second = &outcome.records[1];
    assert_eq!(second.likes, 0);
    assert_eq!(second.date, NaiveDate::from_ymd_opt(2024, 1, 16).unwrap());

    let kinds: Vec<RowErrorKind> = outcome.errors.iter().map(|e| e.reason).collect();
    assert_eq!(
        kinds,
        vec![
            RowErrorKind::Duplicate,
            RowErrorKind::Coerced,
            RowErrorKind::MissingRequired,
            RowErrorKind::Unparseable,
        ]
    );

    // Analysis runs over the validated dataset without touching it
    let weights = engagement::EngagementWeights::default();
    let summary = engagement::summarize(&outcome.records, &weights);
    assert_eq!(summary.total_posts, 2);
    assert_eq!(summary.total_engagement, 363); // 245 + 2*32 + 3*18
    assert_eq!(summary.total_reach, 3630);

    let top = engagement::top_posts(&outcome.records, 1, &weights);
    assert_eq!(top[0].0.post_id, "post_001");

    let moods = sentiment::breakdown(&outcome.records);
    assert_eq!(moods.positive, 1);
    assert_eq!(moods.negative, 1);

    let tags = keywords::top_hashtags(&outcome.records, 2);
    assert_eq!(tags[0], ("carbonmeasures".to_string(), 2));

    Ok(())
}

#[test]
fn test_same_post_from_different_sources_normalizes_identically() -> Result<()> {
    let api_row = json!({
        "id": "post_007",
        "authorName": "Rachel Green",
        "authorHeadline": "Chief Sustainability Officer",
        "commentary": "Certification achieved! #NetZero",
        "createdAt": "2024-01-20T12:00:00Z",
        "likeCount": 421,
        "commentCount": 67,
        "shareCount": 34,
        "permalink": "https://linkedin.com/post/007"
    });
    let scrape_row = json!({
        "postUrn": "post_007",
        "profileName": "Rachel Green",
        "profileTitle": "Chief Sustainability Officer",
        "postText": "Certification achieved! #NetZero",
        "postDate": "2024-01-20",
        "numLikes": 421,
        "numComments": 67,
        "numShares": 34,
        "postUrl": "https://linkedin.com/post/007"
    });

    let from_api = ingest::normalize(std::slice::from_ref(&api_row), SourceKind::Api)?;
    let from_scrape = ingest::normalize(std::slice::from_ref(&scrape_row), SourceKind::Scrape)?;

    assert!(from_api.is_clean());
    assert!(from_scrape.is_clean());
    assert_eq!(from_api.records, from_scrape.records);
    Ok(())
}

#[test]
fn test_csv_file_feeds_the_normalizer() -> Result<()> {
    use std::io::Write;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("manual_entry.csv");
    let mut file = std::fs::File::create(&path)?;
    writeln!(file, "post_id,author,title,text,likes,comments,shares,date,url")?;
    writeln!(
        file,
        "p1,David Brown,CFO,\"Transforming how we report, highly recommend.\",312,54,29,2024-01-14,https://linkedin.com/post/004"
    )?;
    writeln!(file, "p2,James Miller,VP Operations,Questions about pricing.,93,38,6,2024-01-09,")?;

    let content = std::fs::read_to_string(&path)?;
    let rows = ingest::csv::read_rows(&content)?;
    let outcome = ingest::normalize(&rows, SourceKind::Csv)?;

    assert!(outcome.is_clean());
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].text, "Transforming how we report, highly recommend.");
    assert_eq!(outcome.records[0].likes, 312);
    assert_eq!(outcome.records[1].url, None);
    Ok(())
}

#[test]
fn test_repeated_invocations_are_independent() -> Result<()> {
    // The same id in two separate batches is not a duplicate: no state
    // survives between invocations.
    let rows = vec![json!({
        "post_id": "p1", "author": "A", "text": "x", "date": "2024-01-15"
    })];

    let first = ingest::normalize(&rows, SourceKind::Csv)?;
    let second = ingest::normalize(&rows, SourceKind::Csv)?;

    assert!(first.is_clean());
    assert!(second.is_clean());
    assert_eq!(first.records, second.records);
    Ok(())
}
