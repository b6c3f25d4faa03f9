//! Client for the text completion endpoint behind `/ask`.

use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::AiSettings;
use crate::error::BotError;

pub const MESSAGE_LIMIT: usize = 2000;
pub const CHUNK_LIMIT: usize = 1900;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Text(String),
    /// The endpoint answered with something we could not read.
    Raw(String),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, question: &str) -> Result<Completion, BotError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

pub struct GeminiClient {
    http: reqwest::Client,
    settings: AiSettings,
}

impl GeminiClient {
    pub fn new(settings: AiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.settings.endpoint, self.settings.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiClient {
    async fn complete(&self, question: &str) -> Result<Completion, BotError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: question }],
            }],
        };

        let response = self
            .http
            .post(self.url())
            .header("x-goog-api-key", self.settings.api_key.as_str())
            .json(&request)
            .send()
            .await
            .map_err(|e| BotError::Ai(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BotError::Ai(e.to_string()))?;

        debug!("AI endpoint answered {} with {} bytes", status, body.len());
        Ok(parse_completion(&body))
    }
}

pub fn parse_completion(body: &str) -> Completion {
    let text = serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|response| response.candidates.into_iter().next())
        .and_then(|candidate| candidate.content.parts.into_iter().find_map(|part| part.text));

    match text {
        Some(text) => Completion::Text(text),
        None => Completion::Raw(body.to_string()),
    }
}

pub fn answer_header(question: &str) -> String {
    format!("❓ **Question:**\n> {}\n\n🤖 **Answer:**\n", question)
}

/// Splits an answer into messages; only the first carries the header.
pub fn split_answer(question: &str, answer: &str) -> Vec<String> {
    let header = answer_header(question);
    if header.chars().count() + answer.chars().count() <= MESSAGE_LIMIT {
        return vec![format!("{}{}", header, answer)];
    }

    let chars: Vec<char> = answer.chars().collect();
    let mut messages: Vec<String> = chars
        .chunks(CHUNK_LIMIT)
        .map(|chunk| chunk.iter().collect())
        .collect();
    match messages.first_mut() {
        Some(first) => first.insert_str(0, &header),
        None => messages.push(header),
    }
    messages
}

pub fn raw_response_message(body: &str) -> String {
    let prefix = "Sorry, I couldn't get a response from the AI. Here is the raw response:\n```json\n";
    let suffix = "\n```";
    let room = MESSAGE_LIMIT - prefix.chars().count() - suffix.chars().count();
    let shown: String = body.chars().take(room).collect();
    format!("{}{}{}", prefix, shown, suffix)
}
