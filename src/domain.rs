//! Domain models: questions, submitted answers, and evaluation results.

use serde::{Deserialize, Serialize};

/// Assessment question kinds supported by the question generator and the scorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionKind {
  #[serde(rename = "Multiple Choice")]
  MultipleChoice,
  #[serde(rename = "True/False")]
  TrueFalse,
  #[serde(rename = "Short Answer")]
  ShortAnswer,
  #[serde(rename = "Essay")]
  Essay,
}

impl QuestionKind {
  /// Free-text kinds get the substring partial-credit heuristic in fallback scoring.
  pub fn is_free_text(&self) -> bool {
    matches!(self, QuestionKind::ShortAnswer | QuestionKind::Essay)
  }

  /// Wire/display label, matching the serde representation.
  pub fn label(&self) -> &'static str {
    match self {
      QuestionKind::MultipleChoice => "Multiple Choice",
      QuestionKind::TrueFalse => "True/False",
      QuestionKind::ShortAnswer => "Short Answer",
      QuestionKind::Essay => "Essay",
    }
  }
}

impl Default for QuestionKind {
  fn default() -> Self { QuestionKind::MultipleChoice }
}

/// A generated assessment question. Immutable once created.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
  pub id: String,
  pub question: String,
  #[serde(rename = "type")]
  pub kind: QuestionKind,
  /// Ordered choices for multiple-choice questions; empty otherwise.
  #[serde(default)]
  pub options: Vec<String>,
  /// Author-designated canonical answer, used for exact/partial matching.
  #[serde(rename = "correctAnswer")]
  pub correct_answer: String,
  #[serde(default)]
  pub explanation: String,
  #[serde(default)]
  pub difficulty: String,
  /// Cognitive-complexity label (e.g. "Remember", "Analyze"). Carried, not computed.
  #[serde(rename = "bloomLevel", default)]
  pub bloom_level: String,
}

/// One learner answer, referencing a question by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmittedAnswer {
  #[serde(rename = "questionId")]
  pub question_id: String,
  pub answer: String,
}

/// Verdict for a single question. Derived, never stored without its parent result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerQuestionResult {
  pub question_id: String,
  pub correct: bool,
  /// Graded score in [0, 1]. For exact-match kinds this is 0.0 or 1.0.
  pub score: f32,
  /// The canonical answer the submission was checked against.
  pub expected: String,
  pub explanation: String,
}

/// Final outcome of one quiz submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
  /// Integer percentage, always within 0..=100.
  pub overall_score: u8,
  /// One entry per input question, in input order.
  pub per_question: Vec<PerQuestionResult>,
  pub feedback: String,
  pub recommendations: Vec<String>,
}

/// Educational content produced by the content generator (AI or fallback).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedContent {
  pub content: String,
  pub key_concepts: Vec<String>,
  pub learning_objectives: Vec<String>,
  pub study_materials: serde_json::Value,
}
