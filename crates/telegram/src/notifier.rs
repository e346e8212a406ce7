use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use common::{Error, Notifier, Result};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends alerts to a single Telegram chat through the Bot API.
///
/// Without both a token and a chat id every call is a logged no-op.
pub struct TelegramNotifier {
    http: Client,
    credentials: Option<(String, String)>,
    api_base: String,
}

impl TelegramNotifier {
    pub fn new(http: Client, token: Option<String>, chat_id: Option<String>) -> Self {
        let credentials = match (token, chat_id) {
            (Some(t), Some(c)) if !t.trim().is_empty() && !c.trim().is_empty() => Some((t, c)),
            _ => None,
        };
        Self {
            http,
            credentials,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.credentials.is_some()
    }

    /// POST `sendMessage` and drain the response.
    async fn send_message(&self, token: &str, chat_id: &str, text: &str) -> Result<()> {
        let url = format!("{}/bot{token}/sendMessage", self.api_base);

        let resp = self
            .http
            .post(&url)
            .form(&[("chat_id", chat_id), ("text", text)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Http(format!("HTTP {status}: {body}")));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) {
        let Some((token, chat_id)) = &self.credentials else {
            info!(alert = %message, "Telegram not configured; alert not sent");
            return;
        };

        match self.send_message(token, chat_id, message).await {
            Ok(()) => debug!("Telegram alert delivered"),
            Err(e) => warn!(error = %e, "Failed to send Telegram alert"),
        }
    }
}
