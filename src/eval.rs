//! Quiz evaluation pipeline: prompt building, the model-grading boundary, and
//! the orchestrator that decides between AI grading and deterministic fallback.
//!
//! Per submission the orchestrator walks a small state machine:
//! AI_ATTEMPTED -> AI_SUCCEEDED, or AI_ATTEMPTED -> AI_FAILED -> FALLBACK_SCORED.
//! Both terminal states produce a complete `EvaluationResult`; nothing past
//! input validation is ever surfaced as an error.

use std::collections::HashSet;

use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::config::Prompts;
use crate::domain::{EvaluationResult, PerQuestionResult, Question, SubmittedAnswer};
use crate::error::{AiUnavailable, ApiError};
use crate::scoring::{answers_by_question, score_question};
use crate::util::{fill_template, percent_rounded};

/// Parsed model grading verdict, as returned by the evaluation boundary.
/// `overall_score` is required in the wire format; everything else defaults.
#[derive(Clone, Debug, Deserialize)]
pub struct AiEvaluation {
  pub overall_score: f64,
  #[serde(default)]
  pub per_question: Vec<AiVerdict>,
  #[serde(default)]
  pub feedback: String,
  #[serde(default)]
  pub recommendations: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AiVerdict {
  pub question_id: String,
  pub correct: bool,
  #[serde(default)]
  pub score: Option<f32>,
  #[serde(default)]
  pub explanation: String,
}

impl AiEvaluation {
  /// Coerce out-of-range numbers to the nearest valid bound.
  pub fn clamp(&mut self) {
    self.overall_score = self.overall_score.clamp(0.0, 100.0);
    for v in &mut self.per_question {
      if let Some(s) = v.score.as_mut() {
        *s = s.clamp(0.0, 1.0);
      }
    }
  }
}

/// Capability boundary for AI answer grading: one hosted-model implementation
/// (`crate::openai::OpenAI`) and fakes in tests. Any recoverable failure comes
/// back as `AiUnavailable`, never a panic or a fatal error.
#[allow(async_fn_in_trait)]
pub trait AnswerEvaluator {
  async fn evaluate(&self, prompts: &Prompts, prompt: &str) -> Result<AiEvaluation, AiUnavailable>;
}

/// Build the single serialized evaluation request sent to the model: for every
/// question its text, kind, canonical answer, and the learner's answer (or an
/// explicit unanswered marker), plus the topic label. Pure transformation.
pub fn build_evaluation_prompt(
  prompts: &Prompts,
  topic: &str,
  questions: &[Question],
  answers: &[SubmittedAnswer],
) -> Result<String, ApiError> {
  if questions.is_empty() {
    return Err(ApiError::InvalidInput("question list must be non-empty".into()));
  }

  let by_question = answers_by_question(answers);
  let blocks: Vec<String> = questions.iter()
    .map(|q| {
      let submitted = by_question
        .get(q.id.as_str())
        .copied()
        .unwrap_or("(unanswered)");
      format!(
        "Question {id} [{kind}]: {text}\nExpected answer: {expected}\nLearner answer: {submitted}",
        id = q.id,
        kind = q.kind.label(),
        text = q.question,
        expected = q.correct_answer,
      )
    })
    .collect();

  Ok(fill_template(
    &prompts.eval_user_template,
    &[("topic", topic), ("questions", &blocks.join("\n\n"))],
  ))
}

/// Validate submission shape before any network call: non-empty question list,
/// and every answer referencing a question present in the same submission.
fn validate_submission(questions: &[Question], answers: &[SubmittedAnswer]) -> Result<(), ApiError> {
  if questions.is_empty() {
    return Err(ApiError::InvalidInput("question list must be non-empty".into()));
  }
  let known: HashSet<&str> = questions.iter().map(|q| q.id.as_str()).collect();
  for a in answers {
    if !known.contains(a.question_id.as_str()) {
      return Err(ApiError::InvalidInput(format!(
        "answer references unknown question id '{}'", a.question_id
      )));
    }
  }
  Ok(())
}

/// Evaluate one quiz submission.
///
/// The AI verdict is trusted only after independent verification: missing
/// per-question entries are back-filled from the deterministic scorer, and
/// whenever back-filling happens the overall score is recomputed over the
/// merged set. On any `AiUnavailable` outcome the whole submission is scored
/// deterministically. Only `InvalidInput` escapes.
#[instrument(level = "info", skip_all, fields(%topic, questions = questions.len(), answers = answers.len()))]
pub async fn evaluate_submission<E: AnswerEvaluator>(
  evaluator: Option<&E>,
  prompts: &Prompts,
  topic: &str,
  questions: &[Question],
  answers: &[SubmittedAnswer],
) -> Result<EvaluationResult, ApiError> {
  validate_submission(questions, answers)?;

  let attempt = match evaluator {
    Some(e) => {
      let prompt = build_evaluation_prompt(prompts, topic, questions, answers)?;
      e.evaluate(prompts, &prompt).await
    }
    None => Err(AiUnavailable::NotConfigured),
  };

  match attempt {
    Ok(ai) => {
      let result = merge_ai_result(ai, questions, answers);
      info!(target: "quiz", score = result.overall_score, "AI evaluation succeeded");
      Ok(result)
    }
    Err(e) => {
      match &e {
        AiUnavailable::NotConfigured => {
          warn!(target: "quiz", "No model configured; scoring locally")
        }
        _ => error!(target: "quiz", error = %e, "AI evaluation unavailable; scoring locally"),
      }
      // score_submission cannot fail here: the question list was validated non-empty.
      crate::scoring::score_submission(questions, answers)
    }
  }
}

/// Merge an AI verdict with the input questions. Verdicts are matched by
/// question id in input order; extras from the model are dropped, gaps are
/// back-filled deterministically.
fn merge_ai_result(
  ai: AiEvaluation,
  questions: &[Question],
  answers: &[SubmittedAnswer],
) -> EvaluationResult {
  let by_question = answers_by_question(answers);
  let mut backfilled = 0usize;

  let per_question: Vec<PerQuestionResult> = questions.iter()
    .map(|q| {
      match ai.per_question.iter().find(|v| v.question_id == q.id) {
        Some(v) => PerQuestionResult {
          question_id: q.id.clone(),
          correct: v.correct,
          score: v.score.unwrap_or(if v.correct { 1.0 } else { 0.0 }),
          expected: q.correct_answer.clone(),
          explanation: v.explanation.clone(),
        },
        None => {
          backfilled += 1;
          score_question(q, by_question.get(q.id.as_str()).copied())
        }
      }
    })
    .collect();

  let overall_score = if backfilled > 0 {
    warn!(target: "quiz", backfilled, total = questions.len(), "AI verdict incomplete; back-filled locally and recomputed score");
    let correct = per_question.iter().filter(|r| r.correct).count();
    percent_rounded(correct, questions.len())
  } else {
    // Clamp again before narrowing; the trusted path still never exceeds 100.
    ai.overall_score.clamp(0.0, 100.0).round() as u8
  };

  EvaluationResult {
    overall_score,
    per_question,
    feedback: ai.feedback,
    recommendations: ai.recommendations,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionKind;
  use crate::scoring::FALLBACK_FEEDBACK;

  struct FakeOk(AiEvaluation);
  impl AnswerEvaluator for FakeOk {
    async fn evaluate(&self, _: &Prompts, _: &str) -> Result<AiEvaluation, AiUnavailable> {
      let mut eval = self.0.clone();
      eval.clamp();
      Ok(eval)
    }
  }

  struct FakeDown;
  impl AnswerEvaluator for FakeDown {
    async fn evaluate(&self, _: &Prompts, _: &str) -> Result<AiEvaluation, AiUnavailable> {
      Err(AiUnavailable::Transport("connection timed out".into()))
    }
  }

  fn question(id: &str, kind: QuestionKind, correct: &str) -> Question {
    Question {
      id: id.into(),
      question: format!("Question {id}"),
      kind,
      options: vec![],
      correct_answer: correct.into(),
      explanation: String::new(),
      difficulty: "Medium".into(),
      bloom_level: "Understand".into(),
    }
  }

  fn answer(id: &str, value: &str) -> SubmittedAnswer {
    SubmittedAnswer { question_id: id.into(), answer: value.into() }
  }

  fn verdict(id: &str, correct: bool) -> AiVerdict {
    AiVerdict { question_id: id.into(), correct, score: None, explanation: "graded".into() }
  }

  #[tokio::test]
  async fn empty_question_list_is_invalid_before_any_call() {
    let err = evaluate_submission(
      Some(&FakeDown), &Prompts::default(), "Python", &[], &[answer("1", "x")],
    ).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
  }

  #[tokio::test]
  async fn orphan_answer_is_invalid_input() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let err = evaluate_submission(
      Some(&FakeDown), &Prompts::default(), "Python", &qs, &[answer("99", "True")],
    ).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
  }

  #[tokio::test]
  async fn unavailable_model_falls_back_with_fixed_feedback() {
    let qs = vec![
      question("1", QuestionKind::TrueFalse, "True"),
      question("2", QuestionKind::MultipleChoice, "#"),
    ];
    let ans = vec![answer("1", "true")];
    let res = evaluate_submission(Some(&FakeDown), &Prompts::default(), "Python", &qs, &ans)
      .await.unwrap();
    assert_eq!(res.overall_score, 50);
    assert_eq!(res.feedback, FALLBACK_FEEDBACK);
    assert!(res.recommendations.is_empty());
    assert_eq!(res.per_question.len(), 2);
  }

  #[tokio::test]
  async fn missing_evaluator_behaves_like_unavailable() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let res = evaluate_submission(
      Option::<&FakeDown>::None, &Prompts::default(), "Python", &qs, &[answer("1", "TRUE")],
    ).await.unwrap();
    assert_eq!(res.overall_score, 100);
    assert_eq!(res.feedback, FALLBACK_FEEDBACK);
  }

  #[tokio::test]
  async fn successful_ai_result_is_used_as_is() {
    let qs = vec![
      question("1", QuestionKind::ShortAnswer, "interpreter"),
      question("2", QuestionKind::TrueFalse, "False"),
    ];
    let fake = FakeOk(AiEvaluation {
      overall_score: 75.0,
      per_question: vec![verdict("1", true), verdict("2", false)],
      feedback: "Solid work.".into(),
      recommendations: vec!["Review compilation vs interpretation".into()],
    });
    let res = evaluate_submission(
      Some(&fake), &Prompts::default(), "Python", &qs, &[answer("1", "interpreter"), answer("2", "True")],
    ).await.unwrap();
    assert_eq!(res.overall_score, 75);
    assert_eq!(res.feedback, "Solid work.");
    assert_eq!(res.recommendations.len(), 1);
    assert!(res.per_question[0].correct);
    assert!(!res.per_question[1].correct);
  }

  #[tokio::test]
  async fn partial_ai_verdicts_are_backfilled_and_score_recomputed() {
    let qs = vec![
      question("1", QuestionKind::TrueFalse, "True"),
      question("2", QuestionKind::TrueFalse, "False"),
      question("3", QuestionKind::TrueFalse, "True"),
    ];
    // Model only grades 2 of 3; question 3 is answered correctly and must be
    // back-filled locally, then the score recomputed: 3/3 correct = 100.
    let fake = FakeOk(AiEvaluation {
      overall_score: 40.0,
      per_question: vec![verdict("1", true), verdict("2", true)],
      feedback: "Partial grading".into(),
      recommendations: vec![],
    });
    let ans = vec![answer("1", "True"), answer("2", "False"), answer("3", "true")];
    let res = evaluate_submission(Some(&fake), &Prompts::default(), "Python", &qs, &ans)
      .await.unwrap();
    assert_eq!(res.per_question.len(), 3);
    assert!(res.per_question[2].correct);
    assert_eq!(res.overall_score, 100, "score must be recomputed over the merged set");
  }

  #[tokio::test]
  async fn out_of_range_ai_scores_are_clamped() {
    let qs = vec![question("1", QuestionKind::Essay, "aspect")];
    let fake = FakeOk(AiEvaluation {
      overall_score: 250.0,
      per_question: vec![AiVerdict {
        question_id: "1".into(),
        correct: true,
        score: Some(3.5),
        explanation: String::new(),
      }],
      feedback: String::new(),
      recommendations: vec![],
    });
    let res = evaluate_submission(
      Some(&fake), &Prompts::default(), "Python", &qs, &[answer("1", "aspect")],
    ).await.unwrap();
    assert_eq!(res.overall_score, 100);
    assert_eq!(res.per_question[0].score, 1.0);
  }

  #[tokio::test]
  async fn extra_ai_verdicts_for_unknown_questions_are_dropped() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let fake = FakeOk(AiEvaluation {
      overall_score: 100.0,
      per_question: vec![verdict("1", true), verdict("ghost", false)],
      feedback: String::new(),
      recommendations: vec![],
    });
    let res = evaluate_submission(
      Some(&fake), &Prompts::default(), "Python", &qs, &[answer("1", "True")],
    ).await.unwrap();
    assert_eq!(res.per_question.len(), 1);
    assert_eq!(res.per_question[0].question_id, "1");
  }

  #[test]
  fn prompt_contains_unanswered_marker_and_topic() {
    let qs = vec![
      question("1", QuestionKind::TrueFalse, "True"),
      question("2", QuestionKind::ShortAnswer, "interpreter"),
    ];
    let prompt = build_evaluation_prompt(
      &Prompts::default(), "Python Basics", &qs, &[answer("1", "True")],
    ).unwrap();
    assert!(prompt.contains("Topic: Python Basics"));
    assert!(prompt.contains("Learner answer: True"));
    assert!(prompt.contains("(unanswered)"));
    assert!(prompt.contains("[True/False]"));
  }

  #[test]
  fn prompt_for_empty_questions_is_invalid_input() {
    let err = build_evaluation_prompt(&Prompts::default(), "Python", &[], &[]).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
  }
}
