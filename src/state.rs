//! Application state: prompts, model client, fallback question bank, and the
//! progress store.
//!
//! Each evaluation request is independent; nothing here is mutated per
//! request except the progress store, which is internally synchronized.

use std::sync::Arc;

use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::config::{load_tutor_config_from_env, Prompts};
use crate::domain::{Question, QuestionKind};
use crate::openai::OpenAI;
use crate::store::{MemoryStore, ProgressStore};

/// Upper bound on retained progress entries.
const PROGRESS_CAPACITY: usize = 1000;

#[derive(Clone)]
pub struct AppState {
  pub openai: Option<OpenAI>,
  pub prompts: Prompts,
  /// Config-supplied questions appended to the built-in fallback bank.
  pub question_bank: Arc<Vec<Question>>,
  pub store: Arc<dyn ProgressStore>,
}

impl AppState {
  /// Build state from env: load config, assemble the bank, init the model client.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let cfg_opt = load_tutor_config_from_env();
    let prompts = cfg_opt
      .as_ref()
      .map(|c| c.prompts.clone())
      .unwrap_or_default();

    let mut question_bank = Vec::new();
    if let Some(cfg) = &cfg_opt {
      for qc in &cfg.questions {
        let id = qc.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        if qc.question.trim().is_empty() || qc.correct_answer.trim().is_empty() {
          error!(target: "tutor_backend", %id, "Skipping bank item: question and correct_answer are required");
          continue;
        }
        question_bank.push(Question {
          id,
          question: qc.question.clone(),
          kind: qc.kind.clone().unwrap_or(QuestionKind::ShortAnswer),
          options: qc.options.clone(),
          correct_answer: qc.correct_answer.clone(),
          explanation: qc.explanation.clone().unwrap_or_default(),
          difficulty: qc.difficulty.clone().unwrap_or_else(|| "Medium".into()),
          bloom_level: qc.bloom_level.clone().unwrap_or_else(|| "Understand".into()),
        });
      }
    }
    if !question_bank.is_empty() {
      info!(target: "tutor_backend", bank = question_bank.len(), "Loaded config question bank");
    }

    let openai = OpenAI::from_env();
    if let Some(oa) = &openai {
      info!(target: "tutor_backend", base_url = %oa.base_url, model = %oa.model, "Model client enabled.");
    } else {
      info!(target: "tutor_backend", "Model client disabled (no OPENAI_API_KEY). Using fallback logic.");
    }

    Self {
      openai,
      prompts,
      question_bank: Arc::new(question_bank),
      store: Arc::new(MemoryStore::new(PROGRESS_CAPACITY)),
    }
  }
}
