//! OpenAI-compatible chat completions client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{RecommendationRequest, Recommender};
use crate::config::LeaveCalConfig;
use crate::error::{LeaveCalError, LeaveCalResult};

/// Environment variable holding the model-access key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Whether a non-empty model-access key is present in the environment.
pub fn openai_key_present() -> bool {
    api_key_from_env().is_some()
}

fn api_key_from_env() -> Option<String> {
    std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty())
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct OpenAiRecommender {
    client: Client,
    /// Not validated until a request is made.
    api_key: Option<String>,
    api_base: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiRecommender {
    /// Build a client from config, reading the key from `OPENAI_API_KEY`.
    pub fn from_config(config: &LeaveCalConfig) -> LeaveCalResult<Self> {
        Self::new(config, api_key_from_env())
    }

    pub fn new(config: &LeaveCalConfig, api_key: Option<String>) -> LeaveCalResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(OpenAiRecommender {
            client,
            api_key,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

impl Recommender for OpenAiRecommender {
    async fn recommend(&self, request: &RecommendationRequest) -> LeaveCalResult<String> {
        let api_key = self.api_key.as_deref().ok_or(LeaveCalError::MissingApiKey)?;
        let prompt = request.prompt();

        let body = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(
            model = %self.model,
            holidays = request.holiday_dates().len(),
            extra_days = request.extra_days,
            "requesting vacation recommendation"
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(LeaveCalError::ModelApi {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        parse_advice(&text)
    }
}

/// Pull the first choice's message out of a chat completions body.
fn parse_advice(body: &str) -> LeaveCalResult<String> {
    let response: ChatResponse =
        serde_json::from_str(body).map_err(|_| LeaveCalError::EmptyResponse)?;

    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .ok_or(LeaveCalError::EmptyResponse)
}

/// The API's own error message when the body carries one, else the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
