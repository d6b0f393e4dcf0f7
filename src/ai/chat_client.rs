// External dependencies
use anyhow::{Context, Result};
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

// Internal dependencies
use crate::ai::prompt::PromptBuilder;
use crate::ai::response::{
    CompletionRequest, CompletionResponse, MISSING_KEY_REPLIES, UNAVAILABLE_MESSAGE,
};
use crate::config::Settings;
use crate::context::Exchange;
use crate::utils::{choose, RandomSource};

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct ChatClient {
    endpoint: Url,
    api_key: Option<String>,
    model_name: String,
    max_tokens: u32,
    timeout: Duration,
    prompt_builder: PromptBuilder,
    random: Arc<dyn RandomSource>,
}

// ============================================================================
// Client Implementation
// ============================================================================

impl ChatClient {
    pub fn new(
        settings: &Settings,
        api_key: Option<String>,
        random: Arc<dyn RandomSource>,
    ) -> Result<Self> {
        let endpoint = Url::parse(&settings.providers.ai_url).context("Invalid AI provider URL")?;

        Ok(Self {
            endpoint,
            api_key,
            model_name: settings.providers.ai_model.clone(),
            max_tokens: settings.providers.max_tokens,
            timeout: Duration::from_secs(settings.providers.ai_timeout_secs),
            prompt_builder: PromptBuilder::new(),
            random,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Sends `user_input` with `history` as context and returns the reply.
    /// Never fails; problems come back as a readable reply.
    pub async fn chat(&self, user_input: &str, history: &[Exchange]) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return choose(self.random.as_ref(), MISSING_KEY_REPLIES).to_string();
        };

        match self.complete(user_input, history, api_key).await {
            Ok(Some(reply)) => reply,
            Ok(None) => UNAVAILABLE_MESSAGE.to_string(),
            Err(e) => {
                warn!("AI request failed: {e:#}");
                format!("AI service error: {e:#}")
            }
        }
    }

    /// `Ok(None)` when the provider answered with a non-200 status.
    async fn complete(
        &self,
        user_input: &str,
        history: &[Exchange],
        api_key: &str,
    ) -> Result<Option<String>> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        let messages = self.prompt_builder.build_messages(user_input, history);
        let request = CompletionRequest {
            model: &self.model_name,
            messages: &messages,
            max_tokens: self.max_tokens,
        };

        debug!(
            "Sending {} messages to {} ({} from history)",
            messages.len(),
            self.model_name,
            history.len() * 2
        );

        let response = client
            .post(self.endpoint.clone())
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach AI service")?;

        if response.status() != StatusCode::OK {
            debug!("AI service returned {}", response.status());
            return Ok(None);
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .context("Failed to parse AI response")?;

        let reply = completion
            .into_first_content()
            .ok_or_else(|| anyhow::anyhow!("AI response had no choices"))?;

        info!("Received AI reply of {} chars", reply.len());
        Ok(Some(reply))
    }
}
