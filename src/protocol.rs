//! Public request/response structs for the HTTP endpoints (serde ready).
//! Field names mirror the frontend contract (camelCase), so keep this small
//! and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{EvaluationResult, GeneratedContent, PerQuestionResult, Question, SubmittedAnswer};
use crate::store::ProgressEntry;

//
// Content generation
//

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    pub topic: String,
    pub subject: String,
    pub difficulty: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    #[serde(rename = "learningObjectives", default)]
    pub learning_objectives: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
    #[serde(rename = "keyConcepts")]
    pub key_concepts: Vec<String>,
    #[serde(rename = "learningObjectives")]
    pub learning_objectives: Vec<String>,
    #[serde(rename = "studyMaterials")]
    pub study_materials: serde_json::Value,
}

impl From<GeneratedContent> for ContentResponse {
    fn from(g: GeneratedContent) -> Self {
        Self {
            content: g.content,
            key_concepts: g.key_concepts,
            learning_objectives: g.learning_objectives,
            study_materials: g.study_materials,
        }
    }
}

//
// Question generation
//

#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    pub content: String,
    #[serde(rename = "questionCount")]
    pub question_count: usize,
    #[serde(rename = "questionTypes")]
    pub question_types: Vec<String>,
    pub difficulty: String,
    pub subject: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub questions: Vec<Question>,
    pub metadata: serde_json::Value,
}

//
// Quiz evaluation
//

#[derive(Debug, Deserialize)]
pub struct QuizSubmission {
    pub questions: Vec<Question>,
    pub answers: Vec<SubmittedAnswer>,
    /// Used purely for feedback phrasing and progress records.
    #[serde(default)]
    pub topic: String,
}

#[derive(Debug, Serialize)]
pub struct PerQuestionOut {
    #[serde(rename = "questionId")]
    pub question_id: String,
    pub correct: bool,
    pub score: f32,
    pub expected: String,
    pub explanation: String,
}

impl From<&PerQuestionResult> for PerQuestionOut {
    fn from(r: &PerQuestionResult) -> Self {
        Self {
            question_id: r.question_id.clone(),
            correct: r.correct,
            score: r.score,
            expected: r.expected.clone(),
            explanation: r.explanation.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub score: u8,
    #[serde(rename = "perQuestion")]
    pub per_question: Vec<PerQuestionOut>,
    pub feedback: String,
    pub recommendations: Vec<String>,
    #[serde(rename = "detailedAnalysis")]
    pub detailed_analysis: serde_json::Value,
    #[serde(rename = "submissionId")]
    pub submission_id: String,
    /// True when the progress store rejected the write; the result itself is
    /// still complete and valid.
    pub degraded: bool,
}

/// Strengths/weaknesses summary derived from the per-question verdicts.
pub fn detailed_analysis(result: &EvaluationResult) -> serde_json::Value {
    let total = result.per_question.len();
    let correct = result.per_question.iter().filter(|r| r.correct).count();
    let missed: Vec<&str> = result.per_question.iter()
        .filter(|r| !r.correct)
        .map(|r| r.question_id.as_str())
        .collect();
    let areas = if missed.is_empty() {
        vec!["Keep practicing to maintain mastery".to_string()]
    } else {
        vec![
            format!("Review questions: {}", missed.join(", ")),
            "Practice more problems".to_string(),
        ]
    };

    json!({
        "strengths": [format!("Correctly answered {correct} out of {total} questions")],
        "weaknesses": [format!("Missed {} questions", total - correct)],
        "areas_for_improvement": areas,
    })
}

//
// Progress
//

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ProgressOut {
    #[serde(rename = "submissionId")]
    pub submission_id: String,
    pub topic: String,
    pub score: u8,
    #[serde(rename = "totalQuestions")]
    pub total_questions: usize,
    #[serde(rename = "correctAnswers")]
    pub correct_answers: usize,
    #[serde(rename = "recordedAt")]
    pub recorded_at: u64,
}

impl From<ProgressEntry> for ProgressOut {
    fn from(e: ProgressEntry) -> Self {
        Self {
            submission_id: e.submission_id,
            topic: e.topic,
            score: e.overall_score,
            total_questions: e.total_questions,
            correct_answers: e.correct_answers,
            recorded_at: e.recorded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub results: Vec<ProgressOut>,
}

//
// Health + catalogs
//

#[derive(Serialize)]
pub struct HealthOut {
    pub status: &'static str,
    pub agents_loaded: bool,
}

#[derive(Serialize)]
pub struct SubjectsOut {
    pub subjects: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct ContentTypesOut {
    #[serde(rename = "contentTypes")]
    pub content_types: Vec<&'static str>,
}

#[derive(Serialize)]
pub struct QuestionTypesOut {
    #[serde(rename = "questionTypes")]
    pub question_types: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PerQuestionResult;

    fn verdict(id: &str, correct: bool) -> PerQuestionResult {
        PerQuestionResult {
            question_id: id.into(),
            correct,
            score: if correct { 1.0 } else { 0.0 },
            expected: "x".into(),
            explanation: String::new(),
        }
    }

    #[test]
    fn analysis_summarizes_missed_questions() {
        let result = EvaluationResult {
            overall_score: 50,
            per_question: vec![verdict("1", true), verdict("2", false)],
            feedback: String::new(),
            recommendations: vec![],
        };
        let analysis = detailed_analysis(&result);
        assert_eq!(
            analysis["strengths"][0],
            "Correctly answered 1 out of 2 questions"
        );
        assert!(analysis["areas_for_improvement"][0]
            .as_str()
            .unwrap()
            .contains("2"));
    }

    #[test]
    fn perfect_result_keeps_a_positive_improvement_note() {
        let result = EvaluationResult {
            overall_score: 100,
            per_question: vec![verdict("1", true)],
            feedback: String::new(),
            recommendations: vec![],
        };
        let analysis = detailed_analysis(&result);
        assert_eq!(analysis["weaknesses"][0], "Missed 0 questions");
        assert_eq!(
            analysis["areas_for_improvement"][0],
            "Keep practicing to maintain mastery"
        );
    }
}
