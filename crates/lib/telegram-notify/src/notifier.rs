//! Notification sending routine.

/// Telegram Bot API base URL.
const API_BASE: &str = "https://api.telegram.org";

/// Bound on a single notification post, so a slow endpoint cannot stall the
/// caller's loop.
const SEND_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Errors returned while building a notifier.
#[derive(Debug, thiserror::Error)]
pub enum NewError {
    /// HTTP client construction error.
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// A Telegram chat notification sender.
#[derive(Debug)]
pub struct Notifier {
    /// HTTP client used for Bot API calls.
    http: reqwest::Client,

    /// Bot API token.
    token: crate::BotToken,

    /// Destination chat identifier.
    chat_id: String,
}

impl Notifier {
    /// Create a notifier for the given bot token and destination chat.
    pub fn new(token: crate::BotToken, chat_id: String) -> Result<Self, NewError> {
        let http = reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?;
        Ok(Self {
            http,
            token,
            chat_id,
        })
    }

    /// Post a Markdown-formatted message to the destination chat.
    ///
    /// Delivery is best-effort: the response status is observed for
    /// diagnostics only, failures are not retried and never propagate to the
    /// caller.
    pub async fn send(&self, text: &str) {
        let url = send_message_url(API_BASE, &self.token);
        let form = [
            ("chat_id", self.chat_id.as_str()),
            ("text", text),
            ("parse_mode", "Markdown"),
            ("disable_web_page_preview", "true"),
        ];
        match self.http.post(url).form(&form).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(status = %response.status(), "notification delivered");
            }
            Ok(response) => {
                tracing::warn!(status = %response.status(), "notification rejected by the chat API");
            }
            Err(error) => {
                tracing::warn!(%error, "notification delivery failed");
            }
        }
    }
}

/// The `sendMessage` endpoint URL for the given API base and token.
fn send_message_url(base: &str, token: &crate::BotToken) -> String {
    format!("{base}/bot{}/sendMessage", token.as_str())
}
