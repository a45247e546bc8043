//! Minimal OpenAI-compatible client for our use-cases.
//!
//! We only call chat.completions and always request a strict JSON object.
//! Calls are instrumented and log model names, latencies, and response sizes
//! (not contents).
//!
//! NOTE: We never log the API key and we keep payload truncations short.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::config::Prompts;
use crate::domain::{GeneratedContent, Question, QuestionKind};
use crate::error::AiUnavailable;
use crate::eval::{AiEvaluation, AnswerEvaluator};
use crate::util::fill_template;

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAI {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = std::env::var("OPENAI_API_KEY").ok()?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model =
      std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

    // A bounded wait keeps fallback latency predictable. A timed-out call is
    // treated like any other unavailable-model condition; no retries.
    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(20))
      .build()
      .ok()?;

    Some(Self { client, api_key, base_url, model })
  }

  /// JSON-object chat completion. Generic over the target type T.
  /// Every failure class (transport, status, parse) maps to `AiUnavailable`.
  #[instrument(level = "info", skip(self, system, user), fields(model = %self.model))]
  async fn chat_json<T: for<'a> Deserialize<'a>>(
    &self,
    system: &str,
    user: &str,
    temperature: f32,
  ) -> Result<T, AiUnavailable> {
    let url = format!("{}/chat/completions", self.base_url);
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![
        ChatMessageReq { role: "system".into(), content: system.into() },
        ChatMessageReq { role: "user".into(), content: user.into() },
      ],
      temperature,
      response_format: Some(ResponseFormat { r#type: "json_object".into() }),
    };

    let res = self.client.post(&url)
      .header(USER_AGENT, "tutor-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await
      .map_err(|e| AiUnavailable::Transport(e.to_string()))?;

    if !res.status().is_success() {
      let status = res.status().as_u16();
      let body = res.text().await.unwrap_or_default();
      let message = extract_api_error(&body).unwrap_or(body);
      return Err(AiUnavailable::Status { status, message });
    }

    let body: ChatCompletionResponse = res.json().await
      .map_err(|e| AiUnavailable::Malformed(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "Model usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    serde_json::from_str::<T>(&text)
      .map_err(|e| AiUnavailable::Malformed(format!("JSON parse error: {}", e)))
  }

  // --- High-level helpers (domain-specialized) ---

  /// Generate educational content for a topic.
  #[instrument(
    level = "info",
    skip(self, prompts, objectives),
    fields(%topic, %subject, %difficulty, model = %self.model)
  )]
  pub async fn generate_content(
    &self,
    prompts: &Prompts,
    topic: &str,
    subject: &str,
    difficulty: &str,
    content_type: &str,
    objectives: Option<&str>,
  ) -> Result<GeneratedContent, AiUnavailable> {
    #[derive(Deserialize)]
    struct Gen {
      content: String,
      #[serde(default)] key_concepts: Vec<String>,
      #[serde(default)] learning_objectives: Vec<String>,
      #[serde(default)] study_materials: serde_json::Value,
    }

    let objectives_text = objectives
      .map(|o| format!("Focus on these learning objectives: {o}"))
      .unwrap_or_default();
    let system = fill_template(
      &prompts.content_system,
      &[("subject", subject), ("difficulty", difficulty)],
    );
    let user = fill_template(
      &prompts.content_user_template,
      &[("content_type", content_type), ("topic", topic), ("objectives", &objectives_text)],
    );

    let start = std::time::Instant::now();
    let result = self.chat_json::<Gen>(&system, &user, 0.8).await;
    let elapsed = start.elapsed();

    match &result {
      Ok(_) => info!(?elapsed, "Model content received"),
      Err(e) => error!(?elapsed, error = %e, "Model call failed during content generation"),
    }
    let gen = result?;

    Ok(GeneratedContent {
      content: gen.content,
      key_concepts: gen.key_concepts,
      learning_objectives: gen.learning_objectives,
      study_materials: gen.study_materials,
    })
  }

  /// Generate assessment questions from study material.
  #[instrument(
    level = "info",
    skip(self, prompts, content),
    fields(%difficulty, content_len = content.len(), model = %self.model)
  )]
  pub async fn generate_questions(
    &self,
    prompts: &Prompts,
    content: &str,
    count: usize,
    types: &[String],
    difficulty: &str,
    subject: &str,
  ) -> Result<Vec<Question>, AiUnavailable> {
    #[derive(Deserialize)]
    struct QGen { questions: Vec<QItem> }
    #[derive(Deserialize)]
    struct QItem {
      question: String,
      #[serde(rename = "type", default)]
      kind: QuestionKind,
      #[serde(default)] options: Vec<String>,
      correct_answer: String,
      #[serde(default)] explanation: String,
      #[serde(default)] difficulty: Option<String>,
      #[serde(default)] bloom_level: Option<String>,
    }

    let count_s = count.to_string();
    let user = fill_template(
      &prompts.question_user_template,
      &[
        ("count", count_s.as_str()),
        ("types", &types.join(", ")),
        ("difficulty", difficulty),
        ("subject", subject),
        ("content", content),
      ],
    );

    let gen: QGen = self.chat_json(&prompts.question_system, &user, 0.9).await?;
    if gen.questions.is_empty() {
      return Err(AiUnavailable::Malformed("model returned no questions".into()));
    }

    // Sequential ids keep the frontend contract (answers reference "1".."n").
    let questions = gen.questions.into_iter().enumerate()
      .map(|(i, q)| Question {
        id: (i + 1).to_string(),
        question: q.question,
        kind: q.kind,
        options: q.options,
        correct_answer: q.correct_answer,
        explanation: q.explanation,
        difficulty: q.difficulty.unwrap_or_else(|| difficulty.to_string()),
        bloom_level: q.bloom_level.unwrap_or_else(|| "Understand".into()),
      })
      .take(count)
      .collect();

    Ok(questions)
  }
}

impl AnswerEvaluator for OpenAI {
  /// Send the built evaluation prompt and parse the model's grading verdict.
  /// The raw response is clamped here: overall score to [0,100], per-question
  /// scores to the nearest bound of [0,1].
  #[instrument(level = "info", skip(self, prompts, prompt), fields(prompt_len = prompt.len()))]
  async fn evaluate(&self, prompts: &Prompts, prompt: &str) -> Result<AiEvaluation, AiUnavailable> {
    let mut eval: AiEvaluation = self.chat_json(&prompts.eval_system, prompt, 0.2).await?;
    eval.clamp();
    Ok(eval)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
  temperature: f32,
  #[serde(skip_serializing_if = "Option::is_none")]
  response_format: Option<ResponseFormat>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }
#[derive(Serialize)]
struct ResponseFormat { #[serde(rename = "type")] r#type: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

/// Try to extract a clean error message from an API error body.
fn extract_api_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  match serde_json::from_str::<EWrap>(body) {
    Ok(w) => Some(w.error.message),
    Err(_) => None,
  }
}
