//! CLI command handlers.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use review_lens::{
    Config, ConversationContext, DerivedQuery, Persona, QueryExecutor,
    QueryInterpreter, ReviewDataSource, ReviewStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::output;
use super::types::{DomainScore, HistoryEntry, ParseResult};

const EXIT_WORDS: [&str; 3] = ["exit", "quit", ":q"];

/// Run the parse command.
pub fn run_parse(config: &Config, query: String, json_output: bool) -> Result<()> {
    let interpreter = build_interpreter(config);
    let intent = interpreter.interpret(&query, None);

    let mut domain_scores: Vec<DomainScore> = interpreter
        .classifier()
        .domain_scores(&review_lens::query::normalize(&query))
        .into_iter()
        .filter(|(_, score)| *score > 0)
        .map(|(domain, score)| DomainScore { domain, score })
        .collect();
    domain_scores.sort_by(|a, b| b.score.cmp(&a.score));

    let result = ParseResult {
        derived: DerivedQuery::from_intent(&intent),
        intent,
        domain_scores,
    };
    output::print_parse_result(&result, json_output);
    Ok(())
}

/// Run the ask command.
pub async fn run_ask(
    config: &Config,
    query: String,
    persona: Option<String>,
    data: Option<PathBuf>,
    show_metrics: bool,
    json_output: bool,
) -> Result<()> {
    let executor = build_executor(config, data)?;
    let persona = persona.as_deref().map(Persona::parse);
    let result = executor.execute(&query, persona).await?;
    output::print_executed(&result, json_output);
    if show_metrics {
        output::print_metrics(json_output);
    }
    Ok(())
}

/// Run the chat command: one question per line until EOF or an exit word.
pub async fn run_chat(
    config: &Config,
    persona: Option<String>,
    data: Option<PathBuf>,
    show_metrics: bool,
    json_output: bool,
) -> Result<()> {
    let executor = build_executor(config, data)?;
    let persona = persona.as_deref().map(Persona::parse);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !json_output {
        println!("Ask about your reviews. Type \"exit\" to finish.");
    }

    loop {
        if !json_output {
            print!("> ");
            std::io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if EXIT_WORDS.contains(&line.to_lowercase().as_str()) {
            break;
        }

        match executor.execute(line, persona).await {
            Ok(result) => output::print_executed(&result, json_output),
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    let history: Vec<HistoryEntry> = executor
        .context()
        .snapshot()
        .iter()
        .enumerate()
        .map(|(i, intent)| HistoryEntry::from_intent(i + 1, intent))
        .collect();
    output::print_history(&history, json_output);
    if show_metrics {
        output::print_metrics(json_output);
    }
    Ok(())
}

// ============================================================================
// Wiring
// ============================================================================

fn build_interpreter(config: &Config) -> QueryInterpreter {
    QueryInterpreter::new()
        .with_confidence_floor(config.interpreter.confidence_floor)
        .with_low_confidence_threshold(config.interpreter.low_confidence_threshold)
}

fn build_executor(config: &Config, data: Option<PathBuf>) -> Result<QueryExecutor> {
    let source: Arc<dyn ReviewDataSource> = match data.or_else(|| config.data_path()) {
        Some(path) => Arc::new(ReviewStore::load(&path)?),
        None => {
            tracing::info!("No review data configured, using demo data");
            Arc::new(ReviewStore::demo())
        }
    };

    let context = Arc::new(ConversationContext::with_capacity(
        config.interpreter.context_capacity,
    ));

    Ok(QueryExecutor::new(build_interpreter(config), source)
        .with_context(context)
        .with_default_persona(config.formatter.default_persona))
}
