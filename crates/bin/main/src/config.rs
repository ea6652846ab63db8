//! Environment-based configuration.

use std::time::Duration;

/// Default IDLE wait timeout (seconds) when not specified in the environment.
const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 120;

/// Default mailbox when not specified in the environment.
const DEFAULT_MAILBOX: &str = "INBOX";

/// Fully resolved runtime configuration.
#[derive(Debug)]
pub struct Config {
    /// IMAP server hostname.
    pub imap_server: String,

    /// IMAP port.
    pub imap_port: u16,

    /// TLS mode for the IMAP connection.
    pub imap_tls_mode: imap_session::TlsMode,

    /// Mailbox to watch.
    pub imap_mailbox: String,

    /// The monitored account identity, also the IMAP username.
    pub email_account: String,

    /// Password for IMAP authentication.
    pub email_password: imap_session::Password,

    /// Telegram bot API token.
    pub telegram_bot_token: telegram_notify::BotToken,

    /// Destination Telegram chat identifier.
    pub telegram_chat_id: String,

    /// Bound on a single IDLE wait before it is re-armed.
    pub idle_timeout: Duration,
}

/// Read the configuration from the process environment.
pub fn from_env() -> color_eyre::eyre::Result<Config> {
    let imap_server: String = envfury::must("IMAP_SERVER")?;
    let imap_tls_mode = envfury::maybe("IMAP_TLS_MODE")?.unwrap_or(imap_session::TlsMode::Implicit);
    let imap_port = envfury::maybe("IMAP_PORT")?.unwrap_or_else(|| imap_tls_mode.default_port());
    let imap_mailbox =
        envfury::maybe("IMAP_MAILBOX")?.unwrap_or_else(|| DEFAULT_MAILBOX.to_string());
    let email_account: String = envfury::must("EMAIL_ACCOUNT")?;
    let email_password: String = envfury::must("EMAIL_PASSWORD")?;
    let telegram_bot_token: String = envfury::must("TELEGRAM_BOT_TOKEN")?;
    let telegram_chat_id: String = envfury::must("TELEGRAM_CHAT_ID")?;
    let idle_timeout_secs =
        envfury::maybe("IDLE_TIMEOUT_SECS")?.unwrap_or(DEFAULT_IDLE_TIMEOUT_SECS);

    Ok(Config {
        imap_server,
        imap_port,
        imap_tls_mode,
        imap_mailbox,
        email_account,
        email_password: imap_session::Password::from(email_password),
        telegram_bot_token: telegram_notify::BotToken::from(telegram_bot_token),
        telegram_chat_id,
        idle_timeout: Duration::from_secs(idle_timeout_secs),
    })
}
