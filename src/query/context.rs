//! Conversation context store.
//!
//! Caller-owned log of the intents parsed during a conversation. Appends are
//! serialized by a mutex so one store can be shared across threads through
//! an `Arc`. The log is bounded; once full, the oldest entry is evicted.

use std::collections::VecDeque;

use parking_lot::Mutex;

use super::types::QueryIntent;

/// Default number of intents retained.
pub const DEFAULT_CONTEXT_CAPACITY: usize = 100;

/// Bounded, thread-safe log of parsed intents.
#[derive(Debug)]
pub struct ConversationContext {
    entries: Mutex<VecDeque<QueryIntent>>,
    capacity: usize,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    /// Create a store with [`DEFAULT_CONTEXT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CONTEXT_CAPACITY)
    }

    /// Create a store retaining at most `capacity` intents (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Append an intent, evicting the oldest entry when full.
    pub fn record(&self, intent: QueryIntent) {
        let mut entries = self.entries.lock();
        if entries.len() == self.capacity {
            entries.pop_front();
            tracing::trace!(capacity = self.capacity, "evicted oldest context entry");
        }
        entries.push_back(intent);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent intent, if any.
    pub fn last(&self) -> Option<QueryIntent> {
        self.entries.lock().back().cloned()
    }

    /// Copy of all retained intents, oldest first.
    pub fn snapshot(&self) -> Vec<QueryIntent> {
        self.entries.lock().iter().cloned().collect()
    }

    /// Raw text of the last `n` queries, oldest first.
    pub fn recent_queries(&self, n: usize) -> Vec<String> {
        let entries = self.entries.lock();
        let skip = entries.len().saturating_sub(n);
        entries
            .iter()
            .skip(skip)
            .map(|i| i.original_query.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::query::types::{QueryAction, QueryDomain, QueryFilters};

    fn intent(query: &str) -> QueryIntent {
        QueryIntent {
            domain: QueryDomain::Sentiment,
            action: QueryAction::Summarize,
            filters: QueryFilters::default(),
            confidence: 0.5,
            original_query: query.to_string(),
            conversation_context: None,
            reasoning: String::new(),
        }
    }

    #[test]
    fn test_record_in_order() {
        let context = ConversationContext::new();
        assert!(context.is_empty());

        context.record(intent("first"));
        context.record(intent("second"));

        assert_eq!(context.len(), 2);
        assert_eq!(context.last().unwrap().original_query, "second");
        assert_eq!(context.recent_queries(10), vec!["first", "second"]);
        assert_eq!(context.recent_queries(1), vec!["second"]);
    }

    #[test]
    fn test_eviction_at_capacity() {
        let context = ConversationContext::with_capacity(2);
        context.record(intent("a"));
        context.record(intent("b"));
        context.record(intent("c"));

        let queries: Vec<_> = context
            .snapshot()
            .into_iter()
            .map(|i| i.original_query)
            .collect();
        assert_eq!(queries, vec!["b", "c"]);
        assert_eq!(context.capacity(), 2);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let context = ConversationContext::with_capacity(0);
        context.record(intent("a"));
        context.record(intent("b"));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_concurrent_appends() {
        let context = Arc::new(ConversationContext::with_capacity(1000));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let context = Arc::clone(&context);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        context.record(intent(&format!("{t}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(context.len(), 400);
    }

    #[test]
    fn test_clear() {
        let context = ConversationContext::new();
        context.record(intent("a"));
        context.clear();
        assert!(context.last().is_none());
    }
}
