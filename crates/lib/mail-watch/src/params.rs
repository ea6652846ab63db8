//! Watch settings.

/// Mailbox watch settings.
#[derive(Debug, Clone)]
pub struct WatchParams {
    /// The monitored account identity, included in notifications.
    pub account: String,

    /// Bound on a single IDLE wait before it is re-armed.
    pub idle_timeout: std::time::Duration,
}
