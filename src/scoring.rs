//! Deterministic fallback scoring.
//!
//! This is the guaranteed-available path used when the model boundary is down
//! or returns unusable output. It is total over well-formed input: the only
//! failure is an empty question list. Given the same submission it always
//! produces the same result.

use std::collections::HashMap;

use crate::domain::{EvaluationResult, PerQuestionResult, Question, SubmittedAnswer};
use crate::error::ApiError;
use crate::util::{normalize_answer, percent_rounded};

/// Fixed neutral feedback attached when a whole evaluation was scored locally.
pub const FALLBACK_FEEDBACK: &str =
  "Your quiz was scored automatically by exact-answer matching because AI feedback was unavailable.";

/// Index answers by question id. Duplicates resolve last-write-wins.
pub fn answers_by_question(answers: &[SubmittedAnswer]) -> HashMap<&str, &str> {
  let mut map = HashMap::new();
  for a in answers {
    map.insert(a.question_id.as_str(), a.answer.as_str());
  }
  map
}

/// Score a single question against an optional submitted answer.
///
/// Exact-match kinds (multiple choice, true/false) require normalized equality
/// with the canonical answer. Free-text kinds also accept the canonical answer
/// as a substring of the submission; a conservative partial-credit-as-pass
/// heuristic, not semantic grading. Unanswered is always incorrect.
pub fn score_question(question: &Question, submitted: Option<&str>) -> PerQuestionResult {
  let correct = match submitted {
    None => false,
    Some(raw) => {
      let answer = normalize_answer(raw);
      let expected = normalize_answer(&question.correct_answer);
      if question.kind.is_free_text() {
        !expected.is_empty() && (answer == expected || answer.contains(&expected))
      } else {
        answer == expected
      }
    }
  };

  let explanation = if submitted.is_none() {
    format!("Not answered. Expected: {}", question.correct_answer)
  } else if correct {
    question.explanation.clone()
  } else {
    format!("Expected: {}. {}", question.correct_answer, question.explanation)
  };

  PerQuestionResult {
    question_id: question.id.clone(),
    correct,
    score: if correct { 1.0 } else { 0.0 },
    expected: question.correct_answer.clone(),
    explanation,
  }
}

/// Score a full submission locally. One verdict per question, in input order;
/// overall score is `round(100 * correct / total)` with half-up rounding.
pub fn score_submission(
  questions: &[Question],
  answers: &[SubmittedAnswer],
) -> Result<EvaluationResult, ApiError> {
  if questions.is_empty() {
    return Err(ApiError::InvalidInput("question list must be non-empty".into()));
  }

  let by_question = answers_by_question(answers);
  let per_question: Vec<PerQuestionResult> = questions.iter()
    .map(|q| score_question(q, by_question.get(q.id.as_str()).copied()))
    .collect();

  let correct = per_question.iter().filter(|r| r.correct).count();
  Ok(EvaluationResult {
    overall_score: percent_rounded(correct, questions.len()),
    per_question,
    feedback: FALLBACK_FEEDBACK.to_string(),
    recommendations: vec![],
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::QuestionKind;

  fn question(id: &str, kind: QuestionKind, correct: &str) -> Question {
    Question {
      id: id.into(),
      question: format!("Question {id}"),
      kind,
      options: vec![],
      correct_answer: correct.into(),
      explanation: "Because.".into(),
      difficulty: "Easy".into(),
      bloom_level: "Remember".into(),
    }
  }

  fn answer(id: &str, value: &str) -> SubmittedAnswer {
    SubmittedAnswer { question_id: id.into(), answer: value.into() }
  }

  #[test]
  fn true_false_matches_case_insensitively() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let res = score_submission(&qs, &[answer("1", "true")]).unwrap();
    assert!(res.per_question[0].correct);
    assert_eq!(res.overall_score, 100);
  }

  #[test]
  fn unanswered_question_is_incorrect() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let res = score_submission(&qs, &[]).unwrap();
    assert!(!res.per_question[0].correct);
    assert_eq!(res.overall_score, 0);
    assert!(res.per_question[0].explanation.contains("Not answered"));
  }

  #[test]
  fn multiple_choice_requires_exact_normalized_match() {
    let qs = vec![question("1", QuestionKind::MultipleChoice, "A container for storing data")];
    let res = score_submission(&qs, &[answer("1", "  a container for STORING data ")]).unwrap();
    assert!(res.per_question[0].correct);

    let res = score_submission(&qs, &[answer("1", "a container")]).unwrap();
    assert!(!res.per_question[0].correct, "substring must not pass for multiple choice");
  }

  #[test]
  fn short_answer_accepts_canonical_as_substring() {
    let qs = vec![question("1", QuestionKind::ShortAnswer, "interpreter")];
    let res = score_submission(&qs, &[answer("1", "Python runs through an Interpreter.")]).unwrap();
    assert!(res.per_question[0].correct);

    let res = score_submission(&qs, &[answer("1", "a compiler")]).unwrap();
    assert!(!res.per_question[0].correct);
  }

  #[test]
  fn duplicate_answers_last_write_wins() {
    let qs = vec![question("1", QuestionKind::TrueFalse, "True")];
    let res = score_submission(&qs, &[answer("1", "False"), answer("1", "True")]).unwrap();
    assert!(res.per_question[0].correct);
  }

  #[test]
  fn overall_score_rounds_half_up() {
    let qs = vec![
      question("1", QuestionKind::TrueFalse, "True"),
      question("2", QuestionKind::TrueFalse, "True"),
      question("3", QuestionKind::TrueFalse, "True"),
    ];
    let res = score_submission(&qs, &[answer("1", "True")]).unwrap();
    assert_eq!(res.overall_score, 33);
    let res = score_submission(&qs, &[answer("1", "True"), answer("2", "True")]).unwrap();
    assert_eq!(res.overall_score, 67);
  }

  #[test]
  fn empty_question_list_is_invalid_input() {
    let err = score_submission(&[], &[answer("1", "True")]).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
  }

  #[test]
  fn scorer_is_deterministic() {
    let qs = vec![
      question("1", QuestionKind::MultipleChoice, "#"),
      question("2", QuestionKind::Essay, "aspect"),
    ];
    let ans = vec![answer("1", "#"), answer("2", "it marks aspect in the sentence")];
    let first = score_submission(&qs, &ans).unwrap();
    let second = score_submission(&qs, &ans).unwrap();
    assert_eq!(first, second);
  }

  #[test]
  fn result_order_matches_question_order() {
    let qs = vec![
      question("b", QuestionKind::TrueFalse, "True"),
      question("a", QuestionKind::TrueFalse, "False"),
    ];
    let res = score_submission(&qs, &[]).unwrap();
    let ids: Vec<&str> = res.per_question.iter().map(|r| r.question_id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
  }
}
