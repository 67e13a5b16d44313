//! Natural-language risk summary from an OpenAI compatible completion API.
//!
//! In its default, dependent form the adapter waits for the other sources and
//! feeds their payloads to the model as context.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use scout_common::config::Provider;
use scout_common::target::Target;

use crate::outcome::{FailureKind, Outcome};
use crate::report::ScanReport;
use crate::source::{Phase, ScanContext, SourceAdapter};

use super::http;

pub const NAME: &str = "ai_analysis";
const CONTEXT_CHARS_PER_SOURCE: usize = 4_000;
const SYSTEM_PROMPT: &str = "You are a penetration tester writing a short, factual risk \
assessment. Only use the reconnaissance data provided; say so when data is missing.";

pub struct AnalysisAdapter {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    phase: Phase,
    timeout: Duration,
}

impl AnalysisAdapter {
    pub fn new(
        provider: Provider,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> reqwest::Result<Self> {
        Ok(Self {
            client: http::build_client(timeout)?,
            api_key: api_key.into(),
            base_url: provider.base_url().to_string(),
            model: model.into(),
            phase: Phase::Dependent,
            timeout,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Runs alongside the other sources with a target-only prompt.
    pub fn independent(mut self) -> Self {
        self.phase = Phase::Independent;
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[async_trait]
impl SourceAdapter for AnalysisAdapter {
    fn name(&self) -> &str {
        NAME
    }

    fn phase(&self) -> Phase {
        self.phase
    }

    fn default_timeout(&self) -> Duration {
        self.timeout
    }

    async fn invoke(&self, ctx: &ScanContext) -> Outcome {
        let prompt = compose_prompt(&ctx.target, ctx.prior.as_deref());
        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt,
                },
            ],
            temperature: 0.2,
        };

        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        debug!(source = NAME, model = %self.model, "prompt of {} chars", prompt.len());
        let request = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return http::classify(NAME, e),
        };

        match http::read_body(NAME, response).await {
            Ok((status, body)) if status.is_success() => extract_completion(&body),
            Ok((status, body)) => http::bad_status(NAME, status, &body),
            Err(outcome) => outcome,
        }
    }
}

/// Builds the user prompt: the question, then whatever the other sources found.
pub fn compose_prompt(target: &Target, prior: Option<&ScanReport>) -> String {
    let mut prompt = format!(
        "What are the security risks for the site {}?",
        target.url()
    );

    let Some(report) = prior else {
        return prompt;
    };

    prompt.push_str("\n\nReconnaissance results gathered so far:\n");
    for (name, outcome) in report.iter() {
        match outcome {
            Outcome::Success { payload } => {
                prompt.push_str(&format!("\n### {name}\n"));
                prompt.push_str(clip(payload, CONTEXT_CHARS_PER_SOURCE));
                prompt.push('\n');
            }
            Outcome::Failure { kind, .. } => {
                prompt.push_str(&format!("\n### {name}\nunavailable ({kind})\n"));
            }
        }
    }
    prompt
}

fn clip(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => &text[..cut],
        None => text,
    }
}

pub fn extract_completion(body: &str) -> Outcome {
    let response: ChatResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => {
            return Outcome::failure(
                FailureKind::MalformedResponse,
                format!("unexpected completion body: {e}"),
            );
        }
    };

    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    if text.is_empty() {
        Outcome::failure(FailureKind::NoData, "model returned an empty completion")
    } else {
        Outcome::success(text)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
