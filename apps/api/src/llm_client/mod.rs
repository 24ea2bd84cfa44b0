/// Model client: the single point of entry for all language model calls.
///
/// ARCHITECTURAL RULE: No other module may talk to the inference server directly.
/// All generations MUST go through `ModelRuntime`, which owns the backend for the
/// life of the process and serializes access to it.
///
/// The backend is a llama.cpp-compatible `/completion` server hosting an
/// instruction-tuned causal model (Phi-3 mini by default). Prompts are wrapped in
/// the Phi-3 chat template here, not by the server.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub mod json;
pub mod prompts;

use prompts::{format_chat_prompt, strip_chat_markers, END_TAG};

pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const WARM_UP_PROMPT: &str = "Hello";
const WARM_UP_MAX_TOKENS: u32 = 5;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Inference server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Model runtime has been shut down")]
    ShutDown,
}

/// Sampling settings for a single generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl GenerationParams {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            ..Self::default()
        }
    }

    pub fn with_max_tokens(max_tokens: u32) -> Self {
        Self {
            max_tokens,
            ..Self::default()
        }
    }
}

/// A text-continuation backend. Implement this to swap inference engines
/// without touching the domain code.
///
/// `prompt` already carries the chat template; the returned text is the raw
/// decoded continuation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// llama.cpp server backend
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    stop: Vec<&'a str>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: String,
    #[serde(default)]
    tokens_predicted: u32,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: ServerErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// Talks to a llama.cpp `llama-server` (or anything speaking its `/completion` API).
/// One blocking request per generation; no retry and no streaming.
#[derive(Clone)]
pub struct LlamaServerClient {
    client: Client,
    completion_url: String,
}

impl LlamaServerClient {
    /// `timeout` of `None` lets a generation run for as long as the server takes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            completion_url: format!("{}/completion", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl TextGenerator for LlamaServerClient {
    async fn complete(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        let request_body = CompletionRequest {
            prompt,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            stop: vec![END_TAG],
            stream: false,
        };

        let response = self
            .client
            .post(&self.completion_url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ServerError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: CompletionResponse = response.json().await?;
        debug!(
            "Completion finished: tokens_predicted={}, max_tokens={}, temperature={}",
            completion.tokens_predicted, params.max_tokens, params.temperature
        );

        Ok(completion.content)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Runtime lifecycle
// ────────────────────────────────────────────────────────────────────────────

/// Owns the loaded model for the life of the process.
///
/// Sequential decoding cannot share the model between requests, so every
/// generation takes the lock; waiting callers are served in FIFO order.
pub struct ModelRuntime {
    model_name: String,
    generator: Mutex<Box<dyn TextGenerator>>,
    closed: AtomicBool,
}

impl ModelRuntime {
    /// Takes ownership of the backend and, if `warm_up` is set, runs one short
    /// generation so the first real request does not pay the load cost.
    pub async fn start(
        model_name: impl Into<String>,
        generator: Box<dyn TextGenerator>,
        warm_up: bool,
    ) -> Result<Self, LlmError> {
        let runtime = Self {
            model_name: model_name.into(),
            generator: Mutex::new(generator),
            closed: AtomicBool::new(false),
        };

        if warm_up {
            info!("Warming up model {}", runtime.model_name);
            runtime
                .generate(
                    WARM_UP_PROMPT,
                    GenerationParams::with_max_tokens(WARM_UP_MAX_TOKENS),
                )
                .await?;
        }

        Ok(runtime)
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn is_running(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Generates a completion for free-text instructions and returns the
    /// assistant reply with the chat wrapper stripped.
    pub async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        if !self.is_running() {
            return Err(LlmError::ShutDown);
        }

        let generator = self.generator.lock().await;
        // Shutdown may have happened while this call was queued.
        if !self.is_running() {
            return Err(LlmError::ShutDown);
        }

        let raw = generator
            .complete(&format_chat_prompt(prompt), params)
            .await?;
        Ok(strip_chat_markers(&raw))
    }

    /// Stops accepting generations. Calls already holding the lock finish.
    pub fn shutdown(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            info!("Model runtime for {} shut down", self.model_name);
        }
    }
}
