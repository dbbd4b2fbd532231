// src/classify/openai.rs
use crate::classify::models::ChangeResult;
use crate::classify::verdict::{parse_verdict, NO_CHANGE_SENTINEL};
use crate::config::Config;
use crate::detect::{differ, signals};
use crate::monitor::Classifier;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const MAX_HINTS: usize = 10;

const SYSTEM_PROMPT: &str = "\
You compare two versions of a competitor's public pricing page and decide \
whether anything meaningful changed. Detect only these change kinds: \
price_change, tier_change, feature_change, copy_change. Ignore whitespace \
and formatting, footer and legal text, navigation, tracking artifacts, and \
timestamps. Prefer false negatives: when in doubt, report no change. \
Respond with exactly NO_CHANGE when no qualifying change is found. \
Otherwise respond with a single JSON object and nothing else: \
{\"kind\": \"...\", \"summary\": \"<one sentence, at most 30 words>\", \
\"old_value\": \"...\", \"new_value\": \"...\", \
\"plan\": \"<plan name or Unknown>\", \"confidence_score\": <0.0 to 1.0>}";

#[derive(Debug)]
pub enum ClassifierError {
    Config(String),
    Network(String),
    Api(String),
    EmptyResponse,
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::Config(msg) => write!(f, "Config error: {msg}"),
            ClassifierError::Network(msg) => write!(f, "Network error: {msg}"),
            ClassifierError::Api(msg) => write!(f, "OpenAI API error: {msg}"),
            ClassifierError::EmptyResponse => write!(f, "OpenAI returned no message content"),
        }
    }
}

impl Error for ClassifierError {}

pub struct OpenAiClassifier {
    api_key: String,
    model: String,
    client: Client,
    min_confidence: f64,
    max_context_chars: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiClassifier {
    pub fn from_env(config: &Config) -> Result<Self, ClassifierError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ClassifierError::Config("OPENAI_API_KEY environment variable not set".into())
        })?;
        let model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        Ok(Self {
            api_key,
            model,
            client,
            min_confidence: config.min_confidence,
            max_context_chars: config.max_context_chars,
        })
    }

    fn request_verdict(&self, old_text: &str, new_text: &str) -> Result<String, ClassifierError> {
        let diff = differ::compare(old_text, new_text);
        if !diff.has_changes {
            return Ok(NO_CHANGE_SENTINEL.to_string());
        }

        let user_prompt = build_user_prompt(&diff, self.max_context_chars);

        let payload = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: &user_prompt,
                },
            ],
            temperature: 0.0,
        };

        let resp = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| ClassifierError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClassifierError::Api(format!("HTTP {status}: {body}")));
        }

        let chat: ChatResponse = resp
            .json()
            .map_err(|e| ClassifierError::Api(format!("bad response shape: {e}")))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ClassifierError::EmptyResponse)
    }
}

impl Classifier for OpenAiClassifier {
    /// Any transport or API failure degrades to None: a classification
    /// failure must never abort the rest of the check cycle, and is not
    /// retried within the run.
    fn classify(&self, old_text: &str, new_text: &str) -> Option<ChangeResult> {
        match self.request_verdict(old_text, new_text) {
            Ok(raw) => parse_verdict(&raw, self.min_confidence),
            Err(e) => {
                eprintln!("⚠️ Classification call failed: {e}");
                None
            }
        }
    }
}

/// Pricing-relevant excerpts lead, then the bounded diff context.
fn build_user_prompt(diff: &differ::DiffResult, max_context_chars: usize) -> String {
    let mut prompt = String::new();

    let hints = signals::extract_hints(&diff.added, &diff.removed);
    if !hints.is_empty() {
        prompt.push_str("Pricing-relevant excerpts from the diff:\n");
        for hint in hints.iter().take(MAX_HINTS) {
            prompt.push_str("* ");
            prompt.push_str(hint);
            prompt.push('\n');
        }
        prompt.push('\n');
    }

    prompt.push_str(&differ::context_from_diff(diff, max_context_chars));
    prompt
}
