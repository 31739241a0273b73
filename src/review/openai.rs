//! OpenAI chat completions backend.
//!
//! POST {endpoint}/chat/completions with bearer auth; a system message
//! carries the reviewer role, the prompt goes in the user message.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ReviewError;

const SYSTEM_PROMPT: &str = "You are an expert code reviewer.";
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Serialize)]
struct Request {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: MessageResponse,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    /// Null for some models mid-reasoning; treated as an empty reply.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

pub async fn complete(
    http: &Client,
    endpoint: &str,
    api_key: &str,
    model: &str,
    prompt: &str,
) -> Result<String, ReviewError> {
    let url = format!("{}/chat/completions", endpoint);

    let request = Request {
        model: model.to_string(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: prompt.to_string(),
            },
        ],
        temperature: TEMPERATURE,
    };

    let response = http
        .post(&url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(ReviewError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let reply: Response = response.json().await?;
    reply
        .choices
        .first()
        .and_then(|choice| choice.message.content.clone())
        .ok_or(ReviewError::EmptyReply)
}
