//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use review_lens::utils::truncate_str;
use review_lens::{get_metrics, ExecutedQuery, FormattedResponse};
use serde::Serialize;
use serde_json::Value;

use super::types::{HistoryEntry, ParseResult};

/// Print any serializable value as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

/// Print an interpretation.
pub fn print_parse_result(result: &ParseResult, json: bool) {
    if json {
        print_json(result);
        return;
    }

    let intent = &result.intent;
    println!("Domain:     {}", intent.domain.as_str());
    println!("Action:     {}", intent.action.as_str());
    println!("Timeframe:  {}", intent.filters.timeframe.as_str());
    if let Some(ref location) = intent.filters.location {
        println!("Location:   {}", location);
    }
    if let Some(ref platform) = intent.filters.platform {
        println!("Platform:   {}", platform);
    }
    if let Some(ref keywords) = intent.filters.keywords {
        println!("Keywords:   {}", keywords.join(", "));
    }
    println!("Confidence: {:.2}", intent.confidence);
    println!("Reasoning:  {}", intent.reasoning);
    println!("Query:      {}", result.derived.description);

    if !result.domain_scores.is_empty() {
        let scores: Vec<String> = result
            .domain_scores
            .iter()
            .map(|s| format!("{}={}", s.domain.as_str(), s.score))
            .collect();
        println!("Scores:     {}", scores.join(" "));
    }
}

/// Print an executed query with its persona-shaped answer.
pub fn print_executed(result: &ExecutedQuery, json: bool) {
    if json {
        print_json(result);
        return;
    }

    match &result.response {
        FormattedResponse::Executive(brief) => {
            println!("{}", brief.headline);
            println!("  Key metric: {}", display_value(&brief.key_metric));
            println!("  Trend:      {}", display_value(&brief.trend));
            if brief.drill_down_available {
                println!("  More detail is available.");
            }
            for follow_up in &brief.follow_ups {
                println!("  - {}", follow_up);
            }
        }
        FormattedResponse::Analyst(report) => {
            println!("{}", report.summary);
            println!("  {}", report.methodology);
            println!("  Confidence: {:.0}%", report.confidence * 100.0);
            println!("  Reasoning:  {}", report.reasoning);
            for insight in &report.supporting_insights {
                println!("  - {}", insight);
            }
            if let Value::Array(rows) = &report.detailed_data {
                println!("  Rows: {}", rows.len());
            }
        }
        FormattedResponse::Manager(brief) => {
            println!("Situation: {}", brief.situation);
            if !brief.root_causes.is_empty() {
                println!("Likely causes:");
                for cause in &brief.root_causes {
                    println!("  - {}", cause);
                }
            }
            if let Value::Array(actions) = &brief.recommended_actions {
                if !actions.is_empty() {
                    println!("Recommended actions:");
                    for action in actions {
                        println!("  - {}", display_value(action));
                    }
                }
            }
            if !brief.success_metrics.is_null() {
                println!("Success metrics: {}", display_value(&brief.success_metrics));
            }
        }
        FormattedResponse::Casual(reply) => {
            println!("{}", reply.message);
            for highlight in &reply.highlights {
                println!("  * {}", highlight);
            }
            println!("({})", reply.simple_summary);
            println!("{}", reply.next_question);
        }
    }

    for suggestion in &result.suggestions {
        println!("  hint: {}", suggestion);
    }
    tracing::debug!(
        total_ms = result.stats.total_time_ms,
        query = %result.derived.description,
        "printed answer"
    );
}

/// Print the turns of a chat session.
pub fn print_history(history: &[HistoryEntry], json: bool) {
    if json {
        print_json(&history);
        return;
    }
    if history.is_empty() {
        return;
    }

    println!("\n{:<5} {:<30} {:<6} QUERY", "TURN", "INTERPRETATION", "CONF");
    println!("{}", "-".repeat(80));
    for entry in history {
        println!(
            "{:<5} {:<30} {:<6.2} {}",
            entry.turn,
            entry.interpretation,
            entry.confidence,
            truncate_str(&entry.query, 40)
        );
    }
}

/// Render the metrics collected by this process, as JSON or Prometheus text.
pub fn metrics_report(json: bool) -> String {
    let metrics = get_metrics();
    if json {
        serde_json::to_string_pretty(&metrics.export_json())
            .unwrap_or_else(|e| format!("Failed to serialize metrics: {}", e))
    } else {
        metrics.export_prometheus()
    }
}

/// Print the metrics collected by this process.
pub fn print_metrics(json: bool) {
    if !json {
        println!();
    }
    print!("{}", metrics_report(json));
    if json {
        println!();
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "n/a".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
