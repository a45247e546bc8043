//! Progress persistence boundary.
//!
//! The store is a black-box document store with two operations: write one
//! progress entry per evaluation, and read back the most recent N for the
//! progress display. Evaluation correctness never depends on the store; a
//! failing write or read degrades the response, it does not fail it.

use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::EvaluationResult;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(String),
}

/// One stored progress record, keyed by a generated submission id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressEntry {
  pub submission_id: String,
  pub topic: String,
  pub overall_score: u8,
  pub total_questions: usize,
  pub correct_answers: usize,
  /// Unix seconds at write time.
  pub recorded_at: u64,
}

impl ProgressEntry {
  pub fn from_result(submission_id: String, topic: &str, result: &EvaluationResult) -> Self {
    Self {
      submission_id,
      topic: topic.to_string(),
      overall_score: result.overall_score,
      total_questions: result.per_question.len(),
      correct_answers: result.per_question.iter().filter(|r| r.correct).count(),
      recorded_at: SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0),
    }
  }
}

/// Storage capability: one real in-memory implementation, fakes in tests.
pub trait ProgressStore: Send + Sync {
  fn save(&self, entry: ProgressEntry) -> Result<(), StoreError>;
  /// Most recent entries first, at most `limit`.
  fn recent(&self, limit: usize) -> Result<Vec<ProgressEntry>, StoreError>;
}

/// In-process store backing the progress endpoints. Bounded so a long-running
/// server doesn't grow without limit; oldest entries are evicted first.
pub struct MemoryStore {
  entries: RwLock<Vec<ProgressEntry>>,
  capacity: usize,
}

impl MemoryStore {
  pub fn new(capacity: usize) -> Self {
    Self { entries: RwLock::new(Vec::new()), capacity }
  }
}

impl ProgressStore for MemoryStore {
  fn save(&self, entry: ProgressEntry) -> Result<(), StoreError> {
    let mut entries = self.entries.write()
      .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
    entries.push(entry);
    if entries.len() > self.capacity {
      let excess = entries.len() - self.capacity;
      entries.drain(..excess);
    }
    Ok(())
  }

  fn recent(&self, limit: usize) -> Result<Vec<ProgressEntry>, StoreError> {
    let entries = self.entries.read()
      .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))?;
    Ok(entries.iter().rev().take(limit).cloned().collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry(id: &str, score: u8) -> ProgressEntry {
    ProgressEntry {
      submission_id: id.into(),
      topic: "Python".into(),
      overall_score: score,
      total_questions: 3,
      correct_answers: 2,
      recorded_at: 0,
    }
  }

  #[test]
  fn recent_returns_newest_first() {
    let store = MemoryStore::new(10);
    store.save(entry("a", 40)).unwrap();
    store.save(entry("b", 60)).unwrap();
    store.save(entry("c", 80)).unwrap();
    let got = store.recent(2).unwrap();
    let ids: Vec<&str> = got.iter().map(|e| e.submission_id.as_str()).collect();
    assert_eq!(ids, ["c", "b"]);
  }

  #[test]
  fn capacity_evicts_oldest() {
    let store = MemoryStore::new(2);
    store.save(entry("a", 10)).unwrap();
    store.save(entry("b", 20)).unwrap();
    store.save(entry("c", 30)).unwrap();
    let got = store.recent(10).unwrap();
    let ids: Vec<&str> = got.iter().map(|e| e.submission_id.as_str()).collect();
    assert_eq!(ids, ["c", "b"]);
  }
}
