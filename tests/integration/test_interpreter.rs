//! Tests for query interpretation.

use std::sync::Arc;

use review_lens::query::{ActionSignals, DomainSignals, SubstringSignal};
use review_lens::{
    ConfidenceFloor, ConversationContext, QueryAction, QueryDomain, QueryInterpreter,
    SignalTable, Timeframe,
};

#[test]
fn test_sentiment_in_westside() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret("What's our sentiment in Westside?", None);

    // "westside" and the "in ..." pattern outweigh the single sentiment keyword.
    assert_eq!(intent.domain, QueryDomain::Communities);
    assert_eq!(intent.action, QueryAction::Summarize);
    assert_eq!(intent.filters.location.as_deref(), Some("Westside"));
    assert_eq!(intent.filters.timeframe, Timeframe::Last30Days);
    assert!(intent.confidence > 0.5);
    assert_eq!(intent.confidence, 0.5 + 0.2 + 0.1);
    assert_eq!(
        intent.reasoning,
        "Understood as: Communities | You want to: Summarize | Filtered to: Westside | \
         Looking at: last 30d | Moderate confidence (80%)"
    );
}

#[test]
fn test_themes_last_week_by_community() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret("Show me themes last week by community", None);

    // communities and time_series both score 3; the earlier domain wins
    assert_eq!(intent.domain, QueryDomain::Communities);
    assert_eq!(intent.filters.timeframe, Timeframe::LastWeek);
    assert!((intent.confidence - 0.75).abs() < 1e-9);
}

#[test]
fn test_compare_platforms() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret("Compare Google vs Yelp performance", None);

    assert_eq!(intent.domain, QueryDomain::Comparison);
    assert_eq!(intent.action, QueryAction::Compare);
    assert_eq!(intent.filters.platform.as_deref(), Some("Google"));
    assert_eq!(intent.confidence, 0.65);
    assert!(intent.reasoning.contains("For platform: Google"));
    assert!(intent.reasoning.ends_with("Moderate confidence (65%)"));
}

#[test]
fn test_loyalty_points() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret("How many loyalty points awarded this month?", None);

    assert_eq!(intent.domain, QueryDomain::Loyalty);
    assert_eq!(intent.action, QueryAction::Calculate);
    assert_eq!(intent.filters.timeframe, Timeframe::Last30Days);
    assert_eq!(intent.confidence, 0.7);
}

#[test]
fn test_confidence_ceiling() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret(
        "compare sentiment trend summary details in downtown this year",
        None,
    );

    assert_eq!(intent.confidence, 0.95);
    assert!(intent.reasoning.ends_with("High confidence (95%)"));
}

#[test]
fn test_timeframe_last_row_wins() {
    let interpreter = QueryInterpreter::new();
    let intent = interpreter.interpret("Ratings last week compared to the quarter", None);
    assert_eq!(intent.filters.timeframe, Timeframe::Last90Days);

    let intent = interpreter.interpret("best reviews of all time", None);
    assert_eq!(intent.filters.timeframe, Timeframe::AllTime);
}

#[test]
fn test_staff_keywords_replace_parking() {
    let interpreter = QueryInterpreter::new();

    let intent = interpreter.interpret("parking complaints", None);
    assert_eq!(intent.filters.keywords, Some(vec!["parking".to_string()]));

    let intent = interpreter.interpret("parking and service complaints", None);
    assert_eq!(
        intent.filters.keywords,
        Some(vec!["staff".to_string(), "service".to_string()])
    );
}

#[test]
fn test_empty_query_under_both_floors() {
    for floor in [ConfidenceFloor::Unbounded, ConfidenceFloor::Zero] {
        let interpreter = QueryInterpreter::new().with_confidence_floor(floor);
        let intent = interpreter.interpret("", None);

        assert_eq!(intent.domain, QueryDomain::Sentiment);
        assert_eq!(intent.action, QueryAction::Summarize);
        assert_eq!(intent.confidence, 0.3);
        assert!(intent.reasoning.ends_with("Low confidence - might need clarification (30%)"));
    }
}

#[test]
fn test_total_over_odd_input() {
    let interpreter = QueryInterpreter::new();
    for query in ["", "   ", "???", "ümlaut ☕ café", "1234567890", "vs vs vs"] {
        let intent = interpreter.interpret(query, None);
        assert!(QueryDomain::ALL.contains(&intent.domain));
        assert!(QueryAction::ALL.contains(&intent.action));
        assert!(intent.confidence <= 0.95);
    }
}

#[test]
fn test_parse_query_idempotent_and_recorded() {
    let interpreter = QueryInterpreter::new();
    let context = ConversationContext::with_capacity(2);

    let a = interpreter.parse_query("sentiment downtown", None, &context);
    let b = interpreter.parse_query("sentiment downtown", None, &context);
    let c = interpreter.parse_query("themes uptown", None, &context);

    assert_eq!(a, b);
    assert_eq!(context.len(), 2);
    assert_eq!(
        context.recent_queries(10),
        vec!["sentiment downtown".to_string(), "themes uptown".to_string()]
    );
    assert_eq!(context.last(), Some(c));
}

#[test]
fn test_shared_context_across_threads() {
    let interpreter = Arc::new(QueryInterpreter::new());
    let context = Arc::new(ConversationContext::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let interpreter = interpreter.clone();
            let context = context.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    interpreter.parse_query(&format!("loyalty points {}", i), None, &context);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(context.len(), 40);
}

#[test]
fn test_injected_signal_table() {
    let table = SignalTable {
        domains: vec![DomainSignals::new(QueryDomain::Forecast)
            .with_keywords(&["crystal ball"])
            .with_pattern(SubstringSignal::new("outlook"))],
        actions: vec![ActionSignals::new(QueryAction::Predict, &["outlook"])],
    };
    let interpreter = QueryInterpreter::new().with_signals(Arc::new(table));

    let intent = interpreter.interpret("what's the outlook", None);
    assert_eq!(intent.domain, QueryDomain::Forecast);
    assert_eq!(intent.action, QueryAction::Predict);

    let intent = interpreter.interpret("sentiment please", None);
    assert_eq!(intent.domain, QueryDomain::Sentiment);
}
