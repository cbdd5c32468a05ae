//! Claude Messages client.
//!
//! Every tutor call is one system prompt plus one user prompt, answered by a
//! single JSON object, so that is the only shape this client offers.

use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Error)]
pub enum ClaudeApiError {
    #[error("could not reach Claude: {0}")]
    Transport(String),
    #[error("Claude did not answer in time")]
    Timeout,
    #[error("Claude answered {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Claude is rate limiting this key")]
    RateLimited,
    #[error("Claude rejected the API key")]
    Unauthorized,
    #[error("unusable reply from Claude: {0}")]
    MalformedReply(String),
    #[error("no Anthropic API key configured")]
    MissingApiKey,
}

impl ClaudeApiError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout | Self::RateLimited => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized,
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            s => Self::Status {
                status: s.as_u16(),
                body,
            },
        }
    }
}

impl From<reqwest::Error> for ClaudeApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e.to_string())
        }
    }
}

#[derive(Serialize)]
struct Turn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Turn<'a>; 1],
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    fn into_text(self) -> Option<String> {
        self.content.into_iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text),
            ContentBlock::Other => None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClaudeApiClient {
    http: Client,
    api_key: String,
    model: String,
}

impl ClaudeApiClient {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    pub fn new(api_key: String, model: Option<String>) -> Result<Self, ClaudeApiError> {
        if api_key.trim().is_empty() {
            return Err(ClaudeApiError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .user_agent(concat!("translation-gateway/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask once and decode the answer as `T`. Transient failures are retried.
    pub async fn reply_json<T: DeserializeOwned>(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<T, ClaudeApiError> {
        let body = MessagesRequest {
            model: &self.model,
            max_tokens,
            system,
            messages: [Turn {
                role: "user",
                content: prompt,
            }],
        };

        let text = (|| self.post_once(&body))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(500))
                    .with_max_delay(Duration::from_secs(10))
                    .with_max_times(3)
                    .with_jitter(),
            )
            .when(ClaudeApiError::is_transient)
            .notify(|e, wait| {
                tracing::warn!(wait_ms = wait.as_millis() as u64, "retrying Claude call: {}", e)
            })
            .await?;

        decode_reply(&text)
    }

    async fn post_once(&self, body: &MessagesRequest<'_>) -> Result<String, ClaudeApiError> {
        let res = self
            .http
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(body)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(ClaudeApiError::from_status(status, body));
        }

        res.json::<MessagesResponse>()
            .await
            .map_err(|e| ClaudeApiError::MalformedReply(e.to_string()))?
            .into_text()
            .ok_or_else(|| ClaudeApiError::MalformedReply("no text block".to_string()))
    }
}

pub(crate) fn decode_reply<T: DeserializeOwned>(text: &str) -> Result<T, ClaudeApiError> {
    let json = strip_code_fence(text);
    if json.is_empty() {
        return Err(ClaudeApiError::MalformedReply("empty reply".to_string()));
    }

    serde_json::from_str(json).map_err(|e| {
        tracing::error!(
            error = %e,
            reply = %json.chars().take(200).collect::<String>(),
            "Claude reply is not the expected JSON"
        );
        ClaudeApiError::MalformedReply(e.to_string())
    })
}

// Body of the first ``` fence, or the whole text when there is none
fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(open) = text.find("```") else {
        return text;
    };

    let after = &text[open + 3..];
    let after = after.strip_prefix("json").unwrap_or(after);
    let body = after.split_once('\n').map_or(after, |(_, rest)| rest);

    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => text,
    }
}
