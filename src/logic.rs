//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Content generation (model first, built-in fallback document on failure)
//!   - Question generation (model first, built-in bank on failure)
//!   - Heuristic extraction of key concepts / objectives from markdown when
//!     the model returns prose without structured metadata

use rand::seq::SliceRandom;
use serde_json::json;
use tracing::{error, info, instrument};

use crate::domain::{GeneratedContent, Question, QuestionKind};
use crate::seeds::{fallback_content, fallback_questions};
use crate::state::AppState;

#[instrument(level = "info", skip(state, objectives), fields(%topic, %subject, %difficulty, %content_type))]
pub async fn generate_content(
  state: &AppState,
  topic: &str,
  subject: &str,
  difficulty: &str,
  content_type: &str,
  objectives: Option<&str>,
) -> GeneratedContent {
  if let Some(oa) = &state.openai {
    match oa.generate_content(&state.prompts, topic, subject, difficulty, content_type, objectives).await {
      Ok(mut generated) => {
        // Models often return prose without the structured lists; recover them
        // from the markdown rather than serving empty metadata.
        if generated.key_concepts.is_empty() {
          generated.key_concepts = extract_key_concepts(&generated.content);
        }
        if generated.learning_objectives.is_empty() {
          generated.learning_objectives = extract_learning_objectives(&generated.content, topic);
        }
        info!(target: "tutor_backend", %topic, "Model content generated");
        return generated;
      }
      Err(e) => {
        error!(target: "tutor_backend", %topic, error = %e, "Model content generation failed; using fallback document");
      }
    }
  }
  fallback_content(topic, subject)
}

#[instrument(level = "info", skip(state, content), fields(%difficulty, content_len = content.len()))]
pub async fn generate_questions(
  state: &AppState,
  content: &str,
  count: usize,
  types: &[String],
  difficulty: &str,
  subject: &str,
) -> (Vec<Question>, serde_json::Value) {
  if let Some(oa) = &state.openai {
    match oa.generate_questions(&state.prompts, content, count, types, difficulty, subject).await {
      Ok(questions) => {
        let metadata = json!({
          "topic": "Generated from provided content",
          "subject": subject,
          "difficulty": difficulty,
          "questionTypes": types,
          "total_count": questions.len(),
        });
        info!(target: "tutor_backend", served = questions.len(), "Model questions generated");
        return (questions, metadata);
      }
      Err(e) => {
        error!(target: "tutor_backend", error = %e, "Model question generation failed; using fallback bank");
      }
    }
  }

  let mut bank = fallback_questions(difficulty);
  bank.extend(state.question_bank.iter().cloned().map(|mut q| {
    q.difficulty = difficulty.to_string();
    q
  }));

  let mut questions: Vec<Question> = bank.into_iter().take(count).collect();
  let mut rng = rand::thread_rng();
  for q in &mut questions {
    // Vary option order so the correct choice isn't always in the same slot.
    if q.kind == QuestionKind::MultipleChoice {
      q.options.shuffle(&mut rng);
    }
  }

  let metadata = json!({
    "subject": subject,
    "difficulty": difficulty,
    "questionTypes": types,
    "total_count": questions.len(),
    "bloom_levels": ["Remember", "Understand"],
  });
  (questions, metadata)
}

// -------- Markdown extraction heuristics --------

/// Pull key concepts out of generated markdown: `##` headers and `**bold**`
/// runs inside bullet lines. Falls back to a generic list when nothing matches.
pub fn extract_key_concepts(content: &str) -> Vec<String> {
  let mut concepts = Vec::new();

  for line in content.lines() {
    let line = line.trim();
    if line.starts_with("##") && line.len() > 3 {
      let concept = line.trim_matches(|c| c == '#' || c == '*' || c == ' ').to_string();
      if !concept.is_empty() && concept.len() < 100 {
        concepts.push(concept);
      }
    } else if line.starts_with('*') && line.contains("**") {
      concepts.extend(bold_runs(line));
    }
  }

  concepts.truncate(10);
  if concepts.is_empty() {
    vec![
      "Core Principles".into(),
      "Key Components".into(),
      "Fundamental Concepts".into(),
      "Main Applications".into(),
      "Important Methods".into(),
    ]
  } else {
    concepts
  }
}

/// Pull objective-style sentences (lines with learning verbs, reasonable
/// length) out of generated markdown; generic topic-based defaults otherwise.
pub fn extract_learning_objectives(content: &str, topic: &str) -> Vec<String> {
  const VERBS: &[&str] = &["understand", "learn", "identify", "apply", "analyze", "create"];

  let mut objectives = Vec::new();
  for line in content.lines() {
    let lower = line.trim().to_lowercase();
    if VERBS.iter().any(|v| lower.contains(v)) && lower.len() > 20 && lower.len() < 200 {
      objectives.push(capitalize(&lower));
    }
  }

  objectives.truncate(5);
  if objectives.is_empty() {
    vec![
      format!("Understand the core concepts of {topic}"),
      format!("Identify key components and principles of {topic}"),
      format!("Apply {topic} knowledge to practical scenarios"),
      format!("Analyze real-world applications of {topic}"),
      format!("Evaluate different approaches within {topic}"),
    ]
  } else {
    objectives
  }
}

/// Text between `**` pairs, e.g. `- **Variables**: containers` -> ["Variables"].
fn bold_runs(line: &str) -> Vec<String> {
  line.split("**")
    .skip(1)
    .step_by(2)
    .map(|s| s.trim().to_string())
    .filter(|s| !s.is_empty())
    .collect()
}

fn capitalize(s: &str) -> String {
  let mut chars = s.chars();
  match chars.next() {
    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    None => String::new(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn key_concepts_come_from_headers_and_bold_bullets() {
    let md = "# Title\n\n## Variables and Data Types\nText.\n* **Functions**: reusable blocks\n";
    let concepts = extract_key_concepts(md);
    assert!(concepts.contains(&"Variables and Data Types".to_string()));
    assert!(concepts.contains(&"Functions".to_string()));
  }

  #[test]
  fn key_concepts_default_when_markdown_is_flat() {
    let concepts = extract_key_concepts("plain prose with no structure at all");
    assert_eq!(concepts[0], "Core Principles");
  }

  #[test]
  fn objectives_capture_learning_verb_lines() {
    let md = "You will understand how variables store state in a program.\nshort\n";
    let objectives = extract_learning_objectives(md, "Python");
    assert_eq!(objectives.len(), 1);
    assert!(objectives[0].starts_with("You will understand"));
  }

  #[test]
  fn objectives_default_to_topic_scaffold() {
    let objectives = extract_learning_objectives("", "Recursion");
    assert!(objectives[0].contains("Recursion"));
    assert_eq!(objectives.len(), 5);
  }

  #[test]
  fn bold_runs_extracts_only_emphasized_text() {
    assert_eq!(bold_runs("* **Variables**: containers for **data**"),
               vec!["Variables".to_string(), "data".to_string()]);
  }
}
