use crate::prompts::compose_prompt;
use crate::settings::Settings;
use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Selected text plus the instruction to apply to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub text: String,
    pub instruction: String,
}

impl RewriteRequest {
    pub fn new(text: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            instruction: instruction.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Blocking client for the chat-completions rewriting API.
pub struct RewriteClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
}

impl RewriteClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent("quick-rewriter")
            .build()?;
        Ok(Self {
            client,
            api_key: settings
                .has_api_key()
                .then(|| settings.api_key.trim().to_string()),
            api_url: settings.api_url.clone(),
            model: settings.model.clone(),
        })
    }

    /// Body posted for `req`.
    pub fn build_body<'a>(&'a self, req: &RewriteRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: compose_prompt(&req.text, &req.instruction),
            }],
        }
    }

    /// Send one request and return the rewritten text. No retries.
    pub fn rewrite(&self, req: &RewriteRequest) -> Result<String> {
        let Some(api_key) = &self.api_key else {
            anyhow::bail!("OpenRouter API key missing. Set it in Settings.");
        };

        tracing::debug!(model = %self.model, chars = req.text.len(), "sending rewrite request");
        let resp = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&self.build_body(req))
            .send()
            .context("request to rewriting API failed")?;

        let status = resp.status();
        let body = resp.text().context("failed to read API response")?;
        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            tracing::warn!(%status, "rewrite request rejected: {detail}");
            anyhow::bail!("API error {}: {}", status.as_u16(), detail);
        }

        parse_response(&body)
    }
}

/// Extract the first choice's content from a chat-completions response body.
pub fn parse_response(body: &str) -> Result<String> {
    let data: ChatResponse =
        serde_json::from_str(body).context("malformed response from OpenRouter")?;
    let Some(choice) = data.choices.into_iter().next() else {
        anyhow::bail!("No choices returned from OpenRouter.");
    };
    match choice.message.and_then(|m| m.content) {
        Some(content) if !content.is_empty() => Ok(content),
        _ => anyhow::bail!("Empty response content from OpenRouter."),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_response;

    #[test]
    fn parse_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"a"}},{"message":{"content":"b"}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "a");
    }

    #[test]
    fn parse_rejects_empty_shapes() {
        let err = parse_response(r#"{"choices":[]}"#).unwrap_err();
        assert!(err.to_string().contains("No choices"));
        let err = parse_response(r#"{"choices":[{"message":{"content":""}}]}"#).unwrap_err();
        assert!(err.to_string().contains("Empty response"));
        assert!(parse_response("not json").is_err());
    }
}
