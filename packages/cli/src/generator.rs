//! Chat-completion client for the `--generate` flags of `copy`.

use anyhow::{anyhow, Result};
use blockshelf_editor::{CompletionRequest, CompletionResponse, GenerationError, TextGenerator};
use futures::future::BoxFuture;
use reqwest::Client;
use std::env;
use tracing::debug;

pub const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

pub struct CompletionClient {
    client: Client,
    url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    /// Client for the public endpoint, keyed by `OPENAI_API_KEY`
    pub fn from_env() -> Result<Self> {
        match env::var(API_KEY_VAR) {
            Ok(key) if !key.is_empty() => Ok(Self::new(COMPLETIONS_URL, key)),
            _ => Err(anyhow!("{} is not set", API_KEY_VAR)),
        }
    }

    #[tracing::instrument(skip(self, prompt))]
    async fn request(&self, prompt: &str) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest::new(prompt))
            .send()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GenerationError::Transport(err.to_string()))?;
        debug!(status = status.as_u16(), bytes = body.len(), "Completion response");

        // Error responses carry an `error` object, which `into_result` reports
        CompletionResponse::from_json(&body)?.into_result()
    }
}

impl TextGenerator for CompletionClient {
    fn complete<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        Box::pin(self.request(prompt))
    }
}
