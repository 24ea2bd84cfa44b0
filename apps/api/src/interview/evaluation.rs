//! Answer evaluation.

use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;
use crate::interview::models::Evaluation;
use crate::interview::prompts::EVALUATION_PROMPT;
use crate::llm_client::json::extract_json;
use crate::llm_client::prompts::render;
use crate::llm_client::{GenerationParams, ModelRuntime};

const EVALUATION_TEMPERATURE: f32 = 0.2;

/// Scores `answer`. Unparseable model output yields `Evaluation::fallback()`,
/// which callers cannot tell apart from a genuine score.
pub async fn evaluate(
    question: &str,
    answer: &str,
    model: &ModelRuntime,
) -> Result<Evaluation, AppError> {
    let prompt = render(
        EVALUATION_PROMPT,
        &[("question", question), ("answer", answer)],
    );
    let response = model
        .generate(
            &prompt,
            GenerationParams::with_temperature(EVALUATION_TEMPERATURE),
        )
        .await?;

    Ok(parse_evaluation(&response))
}

fn parse_evaluation(response: &str) -> Evaluation {
    match extract_json(response) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!("Evaluation object has unexpected shape ({e}), using default scores");
            Evaluation::fallback()
        }),
        Ok(_) => {
            warn!("Evaluation output is not a JSON object, using default scores");
            Evaluation::fallback()
        }
        Err(e) => {
            warn!("Evaluation output unusable ({e}), using default scores");
            Evaluation::fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::runtime_replying;

    #[tokio::test]
    async fn test_model_scores_are_returned() {
        let (model, calls) = runtime_replying(
            r#"{
  "technical_accuracy": 22,
  "completeness": 18,
  "practical_knowledge": 20,
  "communication": 21,
  "total_score": 81,
  "feedback": "Clear and accurate."
}"#,
        )
        .await;

        let eval = evaluate("What is a trait?", "A shared interface.", &model)
            .await
            .unwrap();

        assert_eq!(eval.total_score, 81.0);
        assert_eq!(eval.technical_accuracy, 22);
        assert_eq!(eval.feedback, "Clear and accurate.");
        let calls = calls.lock().unwrap();
        assert!((calls[0].params.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(calls[0].params.max_tokens, 800);
    }

    #[tokio::test]
    async fn test_unparseable_output_uses_default() {
        let (model, _calls) = runtime_replying("The answer was fine, I'd say 7/10.").await;
        let eval = evaluate("Q", "Some answer text", &model).await.unwrap();
        assert_eq!(eval, Evaluation::fallback());
    }

    #[test]
    fn test_array_output_uses_default() {
        assert_eq!(parse_evaluation("[1, 2, 3]"), Evaluation::fallback());
    }

    #[test]
    fn test_truncated_object_uses_default() {
        let eval = parse_evaluation(r#"{"technical_accuracy": 20, "completeness": 1"#);
        assert_eq!(eval.total_score, 40.0);
    }
}
