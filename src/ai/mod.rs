// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Prompt dispatch against an OpenAI-compatible chat-completion endpoint.
//!
//! The system prompt embeds the current document plus the edit contract; the
//! model is trusted to perform the merge and return the full updated document
//! (merge-by-replacement). Responses flow through [`normalize`] before the
//! JSON parse, so fenced and unfenced output are treated alike.

pub mod normalize;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::Document;

pub use normalize::normalize;

/// Edit contract embedded in every system prompt. The wording is part of the
/// wire behavior: it is what turns a free-text completion into a structured
/// edit operation.
const EDIT_CONTRACT: &str = "You edit the JSON document of a travel tour. \
Apply the user's instructions to the current document: additions are appended \
at the logically matching place, removals and changes modify the document in \
place. Reply with the complete updated document as raw JSON only, with no \
explanations and no markdown formatting.";

pub fn system_prompt(document: &Document) -> String {
    format!(
        "{EDIT_CONTRACT}\n\nCurrent document:\n{}",
        document.to_pretty()
    )
}

#[derive(Debug)]
pub enum GenerationError {
    /// The request did not complete (connect failure, timeout, decode).
    Transport { detail: String },
    /// The service answered with a non-success status.
    Status { status: u16, body: String },
    /// The normalized response text failed to parse as JSON.
    MalformedResponse { detail: String },
}

impl GenerationError {
    /// Collapsed wording shown to the operator for every variant. The
    /// variants stay distinguishable in the type, not in the toast.
    pub const USER_MESSAGE: &'static str =
        "AI returned invalid JSON format or failed to generate";
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { detail } => write!(f, "AI request failed: {detail}"),
            Self::Status { status, body } => {
                write!(f, "AI service returned status {status}: {body}")
            }
            Self::MalformedResponse { detail } => {
                write!(f, "AI response is not valid JSON: {detail}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

/// One chat-completion backend. Implementations return the raw completion
/// text; normalization and parsing happen in [`generate`].
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError>;
}

/// Full dispatch pipeline: prompt assembly, one network call, normalization,
/// parse. No retries; the caller owns any retry policy.
pub async fn generate(
    backend: &dyn AiBackend,
    document: &Document,
    user_prompt: &str,
) -> Result<Document, GenerationError> {
    let raw = backend
        .complete(&system_prompt(document), user_prompt)
        .await?;
    parse_generation(&raw)
}

/// Normalizes raw completion text and parses it into a document.
pub fn parse_generation(raw: &str) -> Result<Document, GenerationError> {
    let cleaned = normalize(raw);
    Document::parse(&cleaned).map_err(|err| GenerationError::MalformedResponse {
        detail: err.to_string(),
    })
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Chat-completion client for a hosted endpoint.
pub struct HttpAi {
    client: reqwest::Client,
    url: String,
    api_key: String,
    model: String,
}

impl HttpAi {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }
}

#[async_trait]
impl AiBackend for HttpAi {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        };

        let response = self
            .client
            .post(&self.url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|err| GenerationError::Transport {
                detail: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse =
            response
                .json()
                .await
                .map_err(|err| GenerationError::Transport {
                    detail: err.to_string(),
                })?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GenerationError::MalformedResponse {
                detail: "response contained no choices".to_owned(),
            })
    }
}

/// Offline backend used by `--demo`: answers with the document embedded in
/// the system prompt, wrapped in a fence so the whole pipeline is exercised.
pub struct DemoAi;

#[async_trait]
impl AiBackend for DemoAi {
    async fn complete(
        &self,
        system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, GenerationError> {
        let document = system_prompt
            .split_once("Current document:\n")
            .map(|(_, tail)| tail.trim())
            .unwrap_or("null");
        Ok(format!("```json\n{document}\n```"))
    }
}
