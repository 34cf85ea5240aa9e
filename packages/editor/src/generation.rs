//! # Text Generation Contract
//!
//! Request and response shapes of the chat-completion endpoint behind
//! [`crate::TextGenerator`], plus the prompt and response conventions the
//! orchestrator uses.

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;

pub const DEFAULT_MODEL: &str = "gpt-4";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub n: u32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub messages: Vec<ChatMessage>,
}

impl CompletionRequest {
    /// A single user message with the default sampling settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.2,
            n: 1,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompletionChoice {
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl CompletionResponse {
    pub fn from_json(body: &str) -> Result<Self, GenerationError> {
        serde_json::from_str(body).map_err(|err| GenerationError::Transport(err.to_string()))
    }

    /// The first choice's content, or the reported error
    pub fn into_result(self) -> Result<String, GenerationError> {
        if let Some(error) = self.error {
            let code = error.code.map(|code| match code {
                serde_json::Value::String(code) => code,
                other => other.to_string(),
            });
            return Err(GenerationError::Api {
                message: error.message,
                code,
            });
        }

        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(GenerationError::EmptyResponse)
    }
}

/// Prompt asking for a rewrite of a whole variant in the shape of
/// `template`
pub fn variant_prompt(prompt: &str, template: &str) -> String {
    format!(
        "{}. Put the response in the following structure {{{}}}, make sure to change all text to be something relevant.",
        prompt, template
    )
}

/// Generated text as written into a single element
pub fn clean_generated_text(text: &str) -> String {
    text.trim().replace('"', "")
}
