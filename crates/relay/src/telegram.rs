//! Delivery through the Telegram Bot API `sendMessage` method.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{config::TelegramConfig, Result};

pub const PARSE_MODE: &str = "Markdown";

/// Result of sending one message to one chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn deliver(&self, receiver: &str, text: &str) -> DeliveryOutcome;
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    description: Option<String>,
}

pub struct TelegramClient {
    client: Client,
    endpoint: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, &config.api_url, &config.bot_token))
    }

    pub fn with_client(client: Client, api_url: &str, bot_token: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), bot_token),
        }
    }
}

#[async_trait]
impl Notifier for TelegramClient {
    async fn deliver(&self, receiver: &str, text: &str) -> DeliveryOutcome {
        let body = SendMessage {
            chat_id: receiver,
            text,
            parse_mode: PARSE_MODE,
        };

        let response = match self.client.post(&self.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                // Strip the URL: it carries the bot token.
                return DeliveryOutcome::Failed {
                    reason: e.without_url().to_string(),
                };
            }
        };

        let status = response.status();
        if status.as_u16() < 300 {
            debug!("Telegram accepted message for {}", receiver);
            return DeliveryOutcome::Sent;
        }

        // Reading the body to the end releases the connection.
        let reason = match response.json::<ApiError>().await {
            Ok(ApiError { description: Some(description) }) => {
                format!("HTTP {}: {}", status.as_u16(), description)
            }
            _ => format!("HTTP {}", status.as_u16()),
        };
        DeliveryOutcome::Failed { reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{matchers, Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(&TelegramConfig {
            bot_token: "123:abc".to_string(),
            api_url: server.uri(),
            timeout: Duration::from_secs(5),
            escape_markdown: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_deliver_success() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/bot123:abc/sendMessage"))
            .and(matchers::body_json(serde_json::json!({
                "chat_id": "-1001",
                "text": "hello",
                "parse_mode": "Markdown"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true}"#))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).deliver("-1001", "hello").await;
        assert_eq!(outcome, DeliveryOutcome::Sent);
    }

    #[tokio::test]
    async fn test_deliver_server_error() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Error"))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = client_for(&server).deliver("-1001", "hello").await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Failed {
                reason: "HTTP 500".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_deliver_reports_api_description() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
            ))
            .mount(&server)
            .await;

        let outcome = client_for(&server).deliver("nobody", "hello").await;
        assert_eq!(
            outcome,
            DeliveryOutcome::Failed {
                reason: "HTTP 400: Bad Request: chat not found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_redirect_status_is_failure() {
        let server = MockServer::start().await;
        Mock::given(matchers::method("POST"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let outcome = client_for(&server).deliver("-1001", "hello").await;
        assert!(!outcome.is_sent());
    }

    #[tokio::test]
    async fn test_network_error_does_not_leak_token() {
        let client = TelegramClient::with_client(Client::new(), "http://127.0.0.1:1", "secret-token");
        match client.deliver("-1001", "hello").await {
            DeliveryOutcome::Failed { reason } => assert!(!reason.contains("secret-token")),
            DeliveryOutcome::Sent => panic!("delivery to a closed port succeeded"),
        }
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = TelegramClient::with_client(Client::new(), "https://api.telegram.org/", "t");
        assert_eq!(client.endpoint, "https://api.telegram.org/bott/sendMessage");
    }
}
