//! Follow-up question generation.

use tracing::debug;

use crate::errors::AppError;
use crate::interview::prompts::FOLLOWUP_PROMPT;
use crate::llm_client::prompts::render;
use crate::llm_client::{GenerationParams, ModelRuntime};

/// Returned for near-empty answers instead of spending a generation.
pub const CANNED_FOLLOWUP: &str = "Could you explain more?";

const MIN_ANSWER_CHARS: usize = 10;
const FOLLOWUP_MAX_TOKENS: u32 = 100;

pub async fn gen_followup(
    question: &str,
    answer: &str,
    model: &ModelRuntime,
) -> Result<String, AppError> {
    if answer.trim().chars().count() < MIN_ANSWER_CHARS {
        debug!("Answer too short for a generated follow-up");
        return Ok(CANNED_FOLLOWUP.to_string());
    }

    let prompt = render(FOLLOWUP_PROMPT, &[("question", question), ("answer", answer)]);
    let followup = model
        .generate(&prompt, GenerationParams::with_max_tokens(FOLLOWUP_MAX_TOKENS))
        .await?;
    Ok(followup)
}
