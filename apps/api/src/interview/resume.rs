//! Resume extraction: PDF → text → model-extracted fields, with a regex-only
//! fallback when the model output is unusable.

use std::sync::LazyLock;

use axum::body::Bytes;
use regex::Regex;
use serde_json::Value;
use tracing::{info, warn};

use crate::document::{extract_pdf_text, MIN_TEXT_CHARS};
use crate::errors::AppError;
use crate::interview::models::Resume;
use crate::interview::prompts::RESUME_EXTRACTION_PROMPT;
use crate::llm_client::json::extract_json;
use crate::llm_client::prompts::render;
use crate::llm_client::{GenerationParams, ModelRuntime};

/// Only this much of the resume is shown to the model.
const PROMPT_TEXT_CHARS: usize = 2000;
const EXTRACTION_TEMPERATURE: f32 = 0.1;

const NAME_SCAN_LINES: usize = 5;
const NAME_MAX_WORDS: usize = 4;
const UNKNOWN_NAME: &str = "Unknown";

const SKILL_KEYWORDS: [&str; 10] = [
    "python",
    "java",
    "javascript",
    "react",
    "sql",
    "aws",
    "docker",
    "machine learning",
    "deep learning",
    "nlp",
];

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[\w.-]+@[\w.-]+\.\w+\b").expect("email pattern compiles"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+(]?[0-9][0-9 \-()]{8,}").expect("phone pattern compiles"));

/// Extracts structured resume fields from an uploaded PDF.
pub async fn extract_resume(pdf_bytes: Bytes, model: &ModelRuntime) -> Result<Resume, AppError> {
    let extraction = tokio::task::spawn_blocking(move || extract_pdf_text(&pdf_bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?;

    info!(
        "Extracted {} characters from resume PDF ({})",
        extraction.char_count(),
        extraction.summary()
    );

    extract_resume_from_text(&extraction.text, model).await
}

/// Extracts resume fields from already-extracted text.
///
/// Text shorter than `MIN_TEXT_CHARS` is rejected before the model is called.
pub async fn extract_resume_from_text(
    text: &str,
    model: &ModelRuntime,
) -> Result<Resume, AppError> {
    if text.chars().count() < MIN_TEXT_CHARS {
        return Err(AppError::Extraction(
            "Could not extract text from resume".to_string(),
        ));
    }

    let excerpt: String = text.chars().take(PROMPT_TEXT_CHARS).collect();
    let prompt = render(RESUME_EXTRACTION_PROMPT, &[("resume_text", &excerpt)]);
    let response = model
        .generate(
            &prompt,
            GenerationParams::with_temperature(EXTRACTION_TEMPERATURE),
        )
        .await?;

    match extract_json(&response) {
        Ok(value) => {
            if let Some(resume) = resume_from_model_output(value) {
                return Ok(resume);
            }
            warn!("Model resume JSON has no usable name, using fallback extractor");
        }
        Err(e) => warn!("Model resume output unusable ({e}), using fallback extractor"),
    }

    Ok(extract_resume_basic(text))
}

/// Accepts model output only if it is an object with a non-blank `name`.
fn resume_from_model_output(value: Value) -> Option<Resume> {
    let has_name = value
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    if !value.is_object() || !has_name {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Pattern-only resume extraction. Works without a model and gives no signal
/// about how good its guesses are.
pub fn extract_resume_basic(text: &str) -> Resume {
    let email = EMAIL_PATTERN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let phone = PHONE_PATTERN
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let name = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(NAME_SCAN_LINES)
        .find(|line| line.split_whitespace().count() <= NAME_MAX_WORDS)
        .unwrap_or(UNKNOWN_NAME)
        .to_string();

    let text_lower = text.to_lowercase();
    let skills = SKILL_KEYWORDS
        .iter()
        .filter(|skill| text_lower.contains(*skill))
        .map(|skill| title_case(skill))
        .collect();

    Resume {
        name,
        email,
        phone,
        skills,
        ..Resume::default()
    }
}

/// "machine learning" → "Machine Learning".
fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
