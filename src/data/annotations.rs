use std::fs;

use anyhow::{Context, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A reply under a top-level annotation. Replies cannot nest further.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub id: u64,
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub posted: String,
    #[serde(default)]
    pub likes: u64,
}

/// A top-level discussion entry attached to a market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub id: u64,
    pub user: String,
    pub text: String,
    #[serde(default)]
    pub posted: String,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// Read-only discussion threads keyed by market id.
pub struct AnnotationStore {
    threads: DashMap<String, Vec<Annotation>>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self {
            threads: DashMap::new(),
        }
    }

    /// Load threads from a JSON object mapping market id to annotations.
    pub fn from_json_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read annotations file: {}", path))?;

        Self::from_json_str(&contents)
            .with_context(|| format!("Failed to parse annotations file: {}", path))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let threads: std::collections::HashMap<String, Vec<Annotation>> = serde_json::from_str(json)?;
        Ok(Self {
            threads: threads.into_iter().collect(),
        })
    }

    /// Threads seeded for the demonstration markets.
    pub fn demo() -> Self {
        let store = Self::new();

        store.threads.insert("demo-1".to_string(), vec![
            annotation(1, "CryptoWhale", "BTC hitting 120k seems very likely with institutional adoption accelerating. ETFs are eating up supply.", "2 hours ago", 47, vec![
                reply(2, "BearMarket2024", "Disagree. We're seeing distribution patterns from whales. This rally is running out of steam.", "1 hour ago", 23),
            ]),
            annotation(3, "MacroTrader", "Everything depends on Fed policy. If they cut rates aggressively, we could see 150k+", "3 hours ago", 65, vec![]),
        ]);

        store.threads.insert("demo-2".to_string(), vec![
            annotation(4, "PoliticsWatcher", "This is clearly a meme bet, but the 8% is interesting. Shows some contrarian thinking.", "5 hours ago", 12, vec![]),
        ]);

        store.threads.insert("demo-3".to_string(), vec![
            annotation(5, "EconNerd", "CPI is cooling, unemployment ticking up. Fed has room to cut. 67% seems about right.", "1 hour ago", 89, vec![
                reply(6, "InflationHawk", "Powell literally said \"higher for longer\" last week. Market is too optimistic.", "45 min ago", 34),
                reply(7, "EconNerd", "@InflationHawk Actions speak louder than words. Watch the dots plot.", "30 min ago", 21),
            ]),
        ]);

        store.threads.insert("demo-4".to_string(), vec![
            annotation(8, "AIResearcher", "AGI timeline is highly uncertain. 23% seems reasonable given current rate of progress.", "6 hours ago", 156, vec![
                reply(9, "TechOptimist", "You're underestimating scaling laws. We're closer than people think.", "5 hours ago", 78),
            ]),
        ]);

        store
    }

    /// Copy of the thread for a market; empty when the market has none.
    pub fn thread(&self, market_id: &str) -> Vec<Annotation> {
        self.threads
            .get(market_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Run `f` over a market's thread without copying it.
    pub fn with_thread<T>(&self, market_id: &str, f: impl FnOnce(&[Annotation]) -> T) -> T {
        match self.threads.get(market_id) {
            Some(entry) => f(entry.value()),
            None => f(&[]),
        }
    }

    /// Number of markets with a thread.
    pub fn len(&self) -> usize {
        self.threads.len()
    }
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new()
    }
}

fn annotation(id: u64, user: &str, text: &str, posted: &str, likes: u64, replies: Vec<Reply>) -> Annotation {
    Annotation {
        id,
        user: user.to_string(),
        text: text.to_string(),
        posted: posted.to_string(),
        likes,
        replies,
    }
}

fn reply(id: u64, user: &str, text: &str, posted: &str, likes: u64) -> Reply {
    Reply {
        id,
        user: user.to_string(),
        text: text.to_string(),
        posted: posted.to_string(),
        likes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_store_threads() {
        let store = AnnotationStore::demo();
        assert_eq!(store.len(), 4);
        assert_eq!(store.thread("demo-1").len(), 2);
        assert_eq!(store.thread("demo-3")[0].replies.len(), 2);
        assert!(store.thread("demo-8").is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "m1": [
                {"id": 1, "user": "a", "text": "first", "likes": 3,
                 "replies": [{"id": 2, "user": "b", "text": "reply"}]}
            ]
        }"#;

        let store = AnnotationStore::from_json_str(json).unwrap();
        let thread = store.thread("m1");
        assert_eq!(thread.len(), 1);
        assert_eq!(thread[0].likes, 3);
        assert_eq!(thread[0].replies[0].likes, 0);
        assert_eq!(thread[0].posted, "");
    }

    #[test]
    fn test_from_json_str_rejects_bad_input() {
        assert!(AnnotationStore::from_json_str("[1, 2, 3]").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AnnotationStore::from_json_file("/nonexistent/annotations.json").is_err());
    }
}
