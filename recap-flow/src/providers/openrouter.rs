use async_trait::async_trait;
use rig::prelude::*;
use rig::{agent::Agent, completion::Prompt, providers::openrouter};
use serde_json::json;
use tracing::debug;

use crate::error::{RecapError, Result};
use crate::llm::{CompletionRequest, LanguageModel};

/// [`LanguageModel`] backed by OpenRouter chat completions.
///
/// A fresh agent is built per request, so each call carries its own preamble,
/// model and sampling settings.
pub struct OpenRouterModel {
    api_key: Option<String>,
}

impl OpenRouterModel {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }

    fn agent(&self, request: &CompletionRequest) -> Result<Agent<openrouter::CompletionModel>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RecapError::NotConfigured("OPENROUTER_API_KEY"))?;

        let client = openrouter::Client::new(api_key);
        let mut builder = client
            .agent(&request.model)
            .preamble(&request.preamble)
            .temperature(request.temperature);

        if let Some(max_tokens) = request.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if request.json_output {
            builder = builder.additional_params(json!({
                "response_format": { "type": "json_object" }
            }));
        }

        Ok(builder.build())
    }
}

#[async_trait]
impl LanguageModel for OpenRouterModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let agent = self.agent(&request)?;
        debug!(model = %request.model, json_output = request.json_output, "Requesting completion");

        agent
            .prompt(request.message)
            .await
            .map_err(|e| RecapError::upstream("OpenRouter", format!("completion failed: {e}")))
    }
}
