//! Loading tutor configuration (prompts + optional fallback question bank) from TOML.
//!
//! See `TutorConfig` and `Prompts` for expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::QuestionKind;

#[derive(Clone, Debug, Deserialize, Default)]
pub struct TutorConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Question entry accepted in TOML configuration. Entries extend the built-in
/// fallback bank served when the model is unavailable.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  #[serde(default)] pub id: Option<String>,
  #[serde(default)] pub kind: Option<QuestionKind>,
  pub question: String,
  pub correct_answer: String,
  #[serde(default)] pub options: Vec<String>,
  #[serde(default)] pub explanation: Option<String>,
  #[serde(default)] pub difficulty: Option<String>,
  #[serde(default)] pub bloom_level: Option<String>,
}

/// Prompts used by the model client. Defaults are sensible for tutoring.
/// You can override them in TOML if you need to tune tone/structure.
#[derive(Clone, Debug, Deserialize)]
pub struct Prompts {
  // Content generation
  pub content_system: String,
  pub content_user_template: String,
  // Question generation
  pub question_system: String,
  pub question_user_template: String,
  // Quiz evaluation
  pub eval_system: String,
  pub eval_user_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      content_system: "You are an expert educator specializing in {subject}. Create engaging educational content appropriate for {difficulty} level learners. Respond ONLY with strict JSON: {\"content\": string (markdown), \"key_concepts\": [string], \"learning_objectives\": [string], \"study_materials\": object}.".into(),
      content_user_template: "Create a {content_type} about: {topic}\n{objectives}\nUse clear explanations, varied examples, and practical applications.".into(),
      question_system: "You are an assessment author. Respond ONLY with strict JSON: {\"questions\": [{\"question\": string, \"type\": string, \"options\": [string], \"correct_answer\": string, \"explanation\": string, \"difficulty\": string, \"bloom_level\": string}]}. Allowed types: Multiple Choice, True/False, Short Answer, Essay. Vary the position of correct multiple-choice options.".into(),
      question_user_template: "Generate exactly {count} questions of types [{types}] at difficulty '{difficulty}' for subject '{subject}' from this material:\n{content}".into(),
      eval_system: "You are a strict but encouraging quiz grader. Output JSON only: {\"overall_score\": number 0-100, \"per_question\": [{\"question_id\": string, \"correct\": boolean, \"score\": number 0-1, \"explanation\": string}], \"feedback\": string, \"recommendations\": [string]}.".into(),
      eval_user_template: "Topic: {topic}\n\nGrade this quiz submission. For each question you are given the prompt, its type, the expected answer, and the learner's answer.\n\n{questions}\n\nReturn an overall percentage score, a verdict per question, short overall feedback, and up to 3 study recommendations.".into(),
    }
  }
}

/// Attempt to load `TutorConfig` from TUTOR_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_tutor_config_from_env() -> Option<TutorConfig> {
  let path = std::env::var("TUTOR_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<TutorConfig>(&s) {
      Ok(cfg) => {
        info!(target: "tutor_backend", %path, "Loaded tutor config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "tutor_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "tutor_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
