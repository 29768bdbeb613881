//! Tests for end-to-end execution against the review store.

use std::io::Write;
use std::sync::Arc;

use chrono::{Duration, Utc};
use review_lens::{
    Config, ConversationContext, FormattedResponse, Persona, QueryDomain, QueryExecutor,
    QueryInterpreter, ReviewRecord, ReviewStore,
};
use serde_json::{json, Value};

fn record(id: &str, platform: &str, location: &str, rating: u8, text: &str, days_ago: i64) -> ReviewRecord {
    ReviewRecord {
        id: id.to_string(),
        platform: platform.to_string(),
        location: location.to_string(),
        rating,
        text: text.to_string(),
        created_at: Utc::now() - Duration::days(days_ago),
        loyalty_points: 10,
    }
}

fn records() -> Vec<ReviewRecord> {
    vec![
        record("w1", "Google", "Westside", 2, "No parking", 2),
        record("w2", "Yelp", "Westside", 1, "Parking and slow staff", 4),
        record("w3", "Google", "Westside", 4, "Great food", 40),
        record("d1", "Google", "Downtown", 5, "Friendly staff", 3),
        record("d2", "Yelp", "Downtown", 4, "Good value", 8),
        record("u1", "Facebook", "Uptown", 3, "Fine", 12),
    ]
}

fn executor() -> QueryExecutor {
    let store = ReviewStore::from_records(records()).unwrap();
    QueryExecutor::new(QueryInterpreter::new(), Arc::new(store))
}

#[tokio::test]
async fn test_manager_view_of_westside_drop() {
    let result = executor()
        .execute("Why are Westside reviews dropping?", Some(Persona::Manager))
        .await
        .unwrap();

    assert_eq!(result.intent.domain, QueryDomain::Communities);
    assert_eq!(result.derived.filters.location.as_deref(), Some("Westside"));

    let FormattedResponse::Manager(brief) = result.response else {
        panic!("expected manager response");
    };
    assert_eq!(brief.situation, "Westside averages 1.50 stars over 2 reviews");
    assert!(brief.root_causes.is_empty());
    assert_eq!(
        brief.recommended_actions,
        json!([
            "Follow up with reviewers rating 2 stars or below",
            "Address parking complaints (2 low-rated mentions)"
        ])
    );
    assert_eq!(brief.success_metrics["review_volume"], json!(2));
    assert_eq!(brief.success_metrics["current_average_rating"], json!(1.5));
}

#[tokio::test]
async fn test_analyst_view_of_platform_comparison() {
    let result = executor()
        .execute("Compare Google vs Yelp performance", Some(Persona::Analyst))
        .await
        .unwrap();

    assert_eq!(result.intent.domain, QueryDomain::Comparison);

    let FormattedResponse::Analyst(report) = result.response else {
        panic!("expected analyst response");
    };
    // The platform filter keeps the first platform named.
    assert_eq!(report.methodology, "Analyzed 2 records");
    assert_eq!(report.summary, "Google averages 3.50 stars over 2 reviews");
    let Value::Array(rows) = report.detailed_data else {
        panic!("expected full dataset rows");
    };
    assert!(rows.iter().all(|r| r["platform"] == json!("Google")));
    assert_eq!(report.confidence, 0.65);
}

#[tokio::test]
async fn test_loyalty_executive_headline() {
    let result = executor()
        .execute("How many loyalty points awarded all time?", Some(Persona::Executive))
        .await
        .unwrap();

    let FormattedResponse::Executive(brief) = result.response else {
        panic!("expected executive response");
    };
    assert_eq!(brief.headline, "60 loyalty points awarded");
    assert_eq!(brief.key_metric, json!(60));
    assert!(brief.drill_down_available);
}

#[tokio::test]
async fn test_no_matching_reviews() {
    let result = executor()
        .execute("sentiment in midtown", Some(Persona::Executive))
        .await
        .unwrap();

    let FormattedResponse::Executive(brief) = result.response else {
        panic!("expected executive response");
    };
    assert!(brief.headline.starts_with("No reviews found for"));
    assert!(!brief.drill_down_available);
}

#[tokio::test]
async fn test_conversation_history_and_capacity() {
    let context = Arc::new(ConversationContext::with_capacity(2));
    let executor = executor().with_context(context.clone());

    executor.execute("sentiment downtown", None).await.unwrap();
    executor.execute("themes downtown", None).await.unwrap();
    let third = executor.execute("and uptown?", None).await.unwrap();

    assert_eq!(
        third.intent.conversation_context,
        Some(vec![
            "sentiment downtown".to_string(),
            "themes downtown".to_string()
        ])
    );
    assert_eq!(context.len(), 2);
    assert_eq!(
        context.recent_queries(5),
        vec!["themes downtown".to_string(), "and uptown?".to_string()]
    );
    assert_eq!(third.response.persona(), Persona::Casual);
}

#[tokio::test]
async fn test_store_from_configured_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", serde_json::to_string(&records()).unwrap()).unwrap();

    let toml = format!(
        "[formatter]\ndefault_persona = \"executive\"\n\n[store]\ndata_path = {:?}\n",
        file.path().display().to_string()
    );
    let config = Config::from_str(&toml).unwrap();
    let store = ReviewStore::load(&config.data_path().unwrap()).unwrap();
    assert_eq!(store.len(), 6);

    let executor = QueryExecutor::new(QueryInterpreter::new(), Arc::new(store))
        .with_default_persona(config.formatter.default_persona);
    let result = executor.execute("sentiment at downtown", None).await.unwrap();
    assert_eq!(result.response.persona(), Persona::Executive);
}
