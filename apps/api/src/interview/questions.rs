//! Interview question generation.

use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::interview::models::{Question, Resume};
use crate::interview::prompts::QUESTION_GENERATION_PROMPT;
use crate::llm_client::json::{extract_json_as, JsonShape};
use crate::llm_client::prompts::render;
use crate::llm_client::{GenerationParams, ModelRuntime};

pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Asks the model for `num` questions about `resume`.
///
/// Returns an empty list if the output is not a JSON array. Never pads: the
/// result may hold fewer than `num` questions, and never more.
pub async fn gen_questions(
    resume: &Resume,
    num: usize,
    model: &ModelRuntime,
) -> Result<Vec<Question>, AppError> {
    if num == 0 {
        return Ok(Vec::new());
    }

    let resume_json = serde_json::to_string_pretty(resume)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize resume: {e}")))?;
    let prompt = render(
        QUESTION_GENERATION_PROMPT,
        &[("num", &num.to_string()), ("resume_json", &resume_json)],
    );

    let response = model.generate(&prompt, GenerationParams::default()).await?;

    let items = match extract_json_as(&response, JsonShape::Array) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            warn!("Question output parsed as JSON but is not a list");
            return Ok(Vec::new());
        }
        Err(e) => {
            warn!("Question output unusable: {e}");
            return Ok(Vec::new());
        }
    };

    let questions = number_questions(items, num);
    info!("Generated {} of {} requested questions", questions.len(), num);
    Ok(questions)
}

/// Keeps usable items, truncates to `num`, and assigns ids by position.
fn number_questions(items: Vec<Value>, num: usize) -> Vec<Question> {
    items
        .into_iter()
        .filter_map(question_fields)
        .take(num)
        .zip(1..)
        .map(|((question, focus), id)| Question {
            id,
            question,
            focus,
        })
        .collect()
}

fn question_fields(item: Value) -> Option<(String, String)> {
    match item {
        Value::Object(map) => {
            let field = |key: &str| {
                map.get(key)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            Some((field("question"), field("focus")))
        }
        Value::String(question) => Some((question, String::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::{call_count, runtime_replying};
    use serde_json::json;

    fn sample_resume() -> Resume {
        Resume {
            name: "Jane Doe".to_string(),
            skills: vec!["Rust".to_string(), "Kafka".to_string()],
            ..Resume::default()
        }
    }

    #[tokio::test]
    async fn test_ids_are_reassigned_by_position() {
        let (model, _calls) = runtime_replying(
            r#"Here are your questions:
[
  {"id": 7, "question": "How does Rust ownership work?", "focus": "Rust"},
  {"question": "Describe a Kafka outage you handled.", "focus": "Kafka"},
  {"id": "x", "question": "Why backend?", "focus": "Motivation"}
]"#,
        )
        .await;

        let questions = gen_questions(&sample_resume(), 5, &model).await.unwrap();

        assert_eq!(questions.len(), 3);
        let ids: Vec<u32> = questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(questions[1].focus, "Kafka");
    }

    #[tokio::test]
    async fn test_output_is_truncated_to_num() {
        let (model, _calls) = runtime_replying(
            r#"[{"question": "Q1", "focus": "a"}, {"question": "Q2", "focus": "b"}, {"question": "Q3", "focus": "c"}]"#,
        )
        .await;

        let questions = gen_questions(&sample_resume(), 2, &model).await.unwrap();

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].question, "Q2");
        assert_eq!(questions[1].id, 2);
    }

    #[tokio::test]
    async fn test_non_list_output_yields_empty() {
        let (model, _calls) =
            runtime_replying(r#"{"question": "Only one", "focus": "x"}"#).await;
        let questions = gen_questions(&sample_resume(), 5, &model).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_prose_output_yields_empty() {
        let (model, _calls) = runtime_replying("Sorry, I cannot help with that.").await;
        let questions = gen_questions(&sample_resume(), 5, &model).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_prompt_carries_count_and_resume() {
        let (model, calls) = runtime_replying("[]").await;

        gen_questions(&sample_resume(), 3, &model).await.unwrap();

        let calls = calls.lock().unwrap();
        assert!(calls[0].prompt.contains("Generate exactly 3 interview questions"));
        assert!(calls[0].prompt.contains("\"name\": \"Jane Doe\""));
        assert_eq!(calls[0].params, GenerationParams::default());
    }

    #[tokio::test]
    async fn test_zero_questions_skips_model() {
        let (model, calls) = runtime_replying("[]").await;
        let questions = gen_questions(&sample_resume(), 0, &model).await.unwrap();
        assert!(questions.is_empty());
        assert_eq!(call_count(&calls), 0);
    }

    #[test]
    fn test_number_questions_handles_mixed_items() {
        let items = vec![
            json!("What is a lifetime?"),
            json!(42),
            json!({"question": "Explain Arc vs Rc"}),
        ];

        let questions = number_questions(items, 5);

        assert_eq!(
            questions,
            vec![
                Question {
                    id: 1,
                    question: "What is a lifetime?".to_string(),
                    focus: String::new(),
                },
                Question {
                    id: 2,
                    question: "Explain Arc vs Rc".to_string(),
                    focus: String::new(),
                },
            ]
        );
    }
}
