use super::prompts;
use super::traits::ContentGenerator;
use crate::error::GenerationError;
use crate::persona::Persona;
use crate::social::Post;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REPLY_MAX_TOKENS: u32 = 500;
const THREAD_MAX_TOKENS: u32 = 1500;

/// OpenAI-compatible chat-completions generator.
///
/// `base_url` points at any compatible endpoint (`…/v1`), which also makes
/// the client testable against a local mock server.
pub struct OpenAiGenerator {
    base_url: String,
    model: String,
    /// Pre-computed `"Bearer <key>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: String,
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

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl OpenAiGenerator {
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: Option<&str>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            cached_auth_header: api_key.map(|k| format!("Bearer {k}")),
            client: build_client(),
        }
    }

    async fn chat(
        &self,
        system: String,
        user: String,
        temperature: f64,
        max_tokens: u32,
    ) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: user,
                },
            ],
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(auth) = &self.cached_auth_header {
            builder = builder.header("Authorization", auth);
        }

        let response = builder
            .send()
            .await
            .context("generation request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Request {
                generator: self.name().to_string(),
                message: format!("{status}: {body}"),
            }
            .into());
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("malformed generation response")?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationError::Empty {
                generator: self.name().to_string(),
            }
            .into());
        }

        Ok(content)
    }
}

#[async_trait]
impl ContentGenerator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn generate_reply(&self, post: &Post, persona: &Persona) -> anyhow::Result<String> {
        self.chat(
            prompts::system_prompt(persona),
            prompts::reply_prompt(post, persona),
            prompts::temperature_for(persona.tone),
            REPLY_MAX_TOKENS,
        )
        .await
    }

    async fn generate_thread(
        &self,
        post: &Post,
        persona: &Persona,
        len: usize,
    ) -> anyhow::Result<Vec<String>> {
        let raw = self
            .chat(
                prompts::system_prompt(persona),
                prompts::thread_prompt(post, persona, len),
                prompts::temperature_for(persona.tone),
                THREAD_MAX_TOKENS,
            )
            .await?;

        let segments: Vec<String> = raw
            .split("\n\n")
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(ToString::to_string)
            .take(len)
            .collect();

        if segments.is_empty() {
            anyhow::bail!("generation endpoint returned no thread segments");
        }

        Ok(segments)
    }
}
