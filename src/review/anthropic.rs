//! Anthropic messages API backend.
//!
//! POST {endpoint}/messages with `x-api-key` and `anthropic-version`
//! headers; the reply text is the first content block.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ReviewError;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;

#[derive(Debug, Serialize)]
struct Request {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct Response {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: String,
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
    let url = format!("{}/messages", endpoint);

    let request = Request {
        model: model.to_string(),
        max_tokens: MAX_TOKENS,
        messages: vec![Message {
            role: "user".to_string(),
            content: prompt.to_string(),
        }],
    };

    let response = http
        .post(&url)
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
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
        .content
        .first()
        .map(|block| block.text.clone())
        .ok_or(ReviewError::EmptyReply)
}
