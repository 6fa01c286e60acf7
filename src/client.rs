use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use anyhow::{Result, anyhow};

use crate::command::Command;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

#[derive(Serialize)]
struct SendTextRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct SendTextResponse {
    status: Option<String>,
    response: Option<String>,
    message: Option<String>,
}

/// Whatever the server answered to a move. Only `status`/`message` are surfaced.
#[derive(Debug, Clone)]
pub struct MoveReply {
    pub status: Option<String>,
    pub message: Option<String>,
    pub raw: serde_json::Value,
}

impl MoveReply {
    fn from_value(raw: serde_json::Value) -> Self {
        let field = |name: &str| raw.get(name).and_then(|v| v.as_str()).map(str::to_string);
        Self {
            status: field("status"),
            message: field("message"),
            raw,
        }
    }
}

/// Logical outcome of `/api/send_text`, distinct from a transport failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextReply {
    Success(String),
    Failure(String),
}

#[derive(Clone)]
pub struct RobotClient {
    client: Client,
    base_url: String,
}

impl RobotClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fire a single move request. Any JSON body counts as delivered, whatever the status code.
    pub async fn send_command(&self, command: Command) -> Result<MoveReply> {
        let url = format!("{}/move/{}", self.base_url, command.direction());

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| anyhow!("Move request returned a non-JSON body ({}): {}", status, e))?;

        Ok(MoveReply::from_value(body))
    }

    pub async fn send_text(&self, text: &str) -> Result<TextReply> {
        let url = format!("{}/api/send_text", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&SendTextRequest { text })
            .send()
            .await?;

        let reply: SendTextResponse = response.json().await?;

        if reply.status.as_deref() == Some("success") {
            Ok(TextReply::Success(reply.response.unwrap_or_default()))
        } else {
            Ok(TextReply::Failure(
                reply.message.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
