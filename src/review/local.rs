//! Local backend over the Ollama generate API.
//!
//! POST {endpoint}/api/generate; no credential, the reply text is the
//! `response` field.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::ReviewError;

#[derive(Debug, Serialize)]
struct Request {
    model: String,
    prompt: String,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    response: String,
}

pub async fn complete(
    http: &Client,
    endpoint: &str,
    model: &str,
    prompt: &str,
) -> Result<String, ReviewError> {
    let url = format!("{}/api/generate", endpoint);

    let request = Request {
        model: model.to_string(),
        prompt: prompt.to_string(),
        stream: false,
    };

    let response = http
        .post(&url)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ReviewError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    let reply: Response = response.json().await?;
    Ok(reply.response)
}
