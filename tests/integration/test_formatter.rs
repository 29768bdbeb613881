//! Tests for persona formatting.

use review_lens::{FormattedResponse, Persona, QueryInterpreter, ResponseFormatter};
use serde_json::{json, Map, Value};

fn insights(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[test]
fn test_executive_no_data() {
    let intent = QueryInterpreter::new().interpret("How are we doing?", None);
    let response = ResponseFormatter::format_for_user(&intent, &Map::new(), &[], "executive");

    let value = response.to_value();
    assert_eq!(value["persona"], json!("executive"));
    assert_eq!(value["headline"], json!("No data found"));
    assert_eq!(value["key_metric"], Value::Null);
    assert_eq!(value["drill_down_available"], json!(false));
    assert_eq!(
        value["follow_ups"],
        json!([
            "Want specific numbers?",
            "See the breakdown?",
            "How does this compare?"
        ])
    );
}

#[test]
fn test_analyst_carries_intent() {
    let intent = QueryInterpreter::new().interpret("Compare Google vs Yelp performance", None);
    let mut data = Map::new();
    data.insert("record_count".to_string(), json!(120));

    let response = ResponseFormatter::format_for_user(
        &intent,
        &data,
        &insights(&["Google leads by 0.4 stars", "Yelp volume is up"]),
        "analyst",
    );

    let FormattedResponse::Analyst(report) = response else {
        panic!("expected analyst response");
    };
    assert_eq!(report.methodology, "Analyzed 120 records");
    assert_eq!(report.confidence, intent.confidence);
    assert_eq!(report.reasoning, intent.reasoning);
    assert_eq!(report.supporting_insights, vec!["Yelp volume is up"]);
}

#[test]
fn test_manager_root_causes_capped_at_two() {
    let intent = QueryInterpreter::new().interpret("Why are Westside reviews dropping?", None);
    let response = ResponseFormatter::format(
        &intent,
        &Map::new(),
        &insights(&["Westside fell 0.6 stars", "parking", "wait times", "noise"]),
        Persona::Manager,
    );

    let FormattedResponse::Manager(brief) = response else {
        panic!("expected manager response");
    };
    assert_eq!(brief.situation, "Westside fell 0.6 stars");
    assert_eq!(brief.root_causes, vec!["parking", "wait times"]);
    assert_eq!(brief.recommended_actions, json!([]));
}

#[test]
fn test_unknown_persona_gets_casual_shape() {
    let intent = QueryInterpreter::new().interpret("themes", None);
    let mut data = Map::new();
    data.insert("record_count".to_string(), json!("7"));

    let response = ResponseFormatter::format_for_user(
        &intent,
        &data,
        &insights(&["parking_is_tight", "friendly_staff"]),
        "investor",
    );

    assert_eq!(response.persona(), Persona::Casual);
    let value = response.to_value();
    assert_eq!(value["message"], json!("Parking Is Tight"));
    assert_eq!(value["highlights"], json!(["Friendly Staff"]));
    assert_eq!(value["simple_summary"], json!("Analyzed 7 data points"));
}

#[test]
fn test_persona_tag_is_case_sensitive() {
    let intent = QueryInterpreter::new().interpret("themes", None);
    let response = ResponseFormatter::format_for_user(&intent, &Map::new(), &[], "Analyst");

    assert_eq!(response.persona(), Persona::Casual);
    assert_eq!(response.to_value()["persona"], json!("casual"));
}
