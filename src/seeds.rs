//! Seed data and small utilities related to default content.
//!
//! Built-in fallback material keeps the app useful when the model
//! is unreachable or rate-limited: a Python study document, a tiny
//! question bank, and the catalog lists served by the enum endpoints.

use serde_json::json;

use crate::domain::{GeneratedContent, Question, QuestionKind};

pub const SUBJECTS: &[&str] = &[
  "Computer Science", "Mathematics", "Physics", "Chemistry",
  "Biology", "History", "Literature", "Languages", "Business", "Arts",
];

pub const CONTENT_TYPES: &[&str] = &[
  "Study Notes", "Tutorial", "Explanation", "Summary", "Comprehensive Guide",
];

pub const QUESTION_TYPES: &[&str] = &[
  "Multiple Choice", "True/False", "Short Answer", "Essay",
];

/// Fallback study content. Topic-aware for Python (the curated document),
/// generic scaffold for everything else.
pub fn fallback_content(topic: &str, subject: &str) -> GeneratedContent {
  if topic.to_lowercase().contains("python") {
    GeneratedContent {
      content: format!(
        "# {topic}\n\n\
         ## Introduction\n\
         Python is a high-level, interpreted programming language known for its simplicity \
         and readability. It's perfect for beginners and widely used in data science, web \
         development, and automation.\n\n\
         ## Key Concepts\n\n\
         ### 1. Variables and Data Types\n\
         - **Variables**: Containers for storing data\n\
         - **Strings**: Text data (e.g., `\"Hello World\"`)\n\
         - **Integers**: Whole numbers (e.g., `42`)\n\
         - **Floats**: Decimal numbers (e.g., `3.14`)\n\
         - **Lists**: Ordered collections (e.g., `[1, 2, 3]`)\n\n\
         ### 2. Control Structures\n\
         `if`/`else` branches and `for`/`while` loops direct program flow.\n\n\
         ### 3. Functions\n\
         Reusable blocks of code defined with `def`, taking parameters and returning values.\n\n\
         ## Study Tips\n\
         1. Practice daily, starting with small programs\n\
         2. Use online resources: Python.org, Real Python\n\
         3. Join communities: r/learnpython, Stack Overflow\n\n\
         ## Summary\n\
         Focus on understanding basic syntax, practice regularly, and build small projects \
         to reinforce your learning."
      ),
      key_concepts: vec![
        "Variables and Data Types".into(),
        "Basic Syntax and Comments".into(),
        "Control Structures (if/else, loops)".into(),
        "Functions and Parameters".into(),
        "String Formatting".into(),
        "Lists and Collections".into(),
      ],
      learning_objectives: vec![
        "Understand Python syntax and structure".into(),
        "Create and use variables of different types".into(),
        "Write basic control structures and loops".into(),
        "Define and call functions".into(),
        "Apply Python concepts to solve problems".into(),
      ],
      study_materials: json!({
        "flashcards": [
          { "term": "Variable", "definition": "A container for storing data in Python" },
          { "term": "Function", "definition": "A reusable block of code that performs a specific task" },
          { "term": "Loop", "definition": "A control structure that repeats code multiple times" }
        ],
        "summary": "Python basics including variables, data types, control structures, and functions."
      }),
    }
  } else {
    GeneratedContent {
      content: format!(
        "# {topic}\n\nThis is fallback content for {topic} in {subject}. \
         AI content generation is currently unavailable."
      ),
      key_concepts: vec!["Basic concepts".into(), "Fundamental principles".into()],
      learning_objectives: vec![
        format!("Understand {topic}"),
        "Apply basic knowledge".into(),
      ],
      study_materials: json!({}),
    }
  }
}

/// Built-in question bank served when model generation fails.
/// Difficulty is stamped by the caller to match the request.
pub fn fallback_questions(difficulty: &str) -> Vec<Question> {
  vec![
    Question {
      id: "1".into(),
      question: "What is a variable in Python?".into(),
      kind: QuestionKind::MultipleChoice,
      options: vec![
        "A mathematical equation".into(),
        "A container for storing data".into(),
        "A type of loop".into(),
        "A function name".into(),
      ],
      correct_answer: "A container for storing data".into(),
      explanation: "Variables in Python are containers that store data values. They can hold \
                    different types of data like strings, numbers, and lists.".into(),
      difficulty: difficulty.into(),
      bloom_level: "Understand".into(),
    },
    Question {
      id: "2".into(),
      question: "Which symbol is used for comments in Python?".into(),
      kind: QuestionKind::MultipleChoice,
      options: vec!["//".into(), "/*".into(), "#".into(), "--".into()],
      correct_answer: "#".into(),
      explanation: "In Python, the hash symbol (#) is used to create single-line comments. \
                    Comments are not executed by the interpreter.".into(),
      difficulty: difficulty.into(),
      bloom_level: "Remember".into(),
    },
    Question {
      id: "3".into(),
      question: "True or False: Python is a compiled programming language.".into(),
      kind: QuestionKind::TrueFalse,
      options: vec![],
      correct_answer: "False".into(),
      explanation: "Python is an interpreted language, not compiled. The Python interpreter \
                    reads and executes code line by line.".into(),
      difficulty: difficulty.into(),
      bloom_level: "Understand".into(),
    },
  ]
}
