//! Per-candidate processing pipeline.

/// Longest body preview included in a notification, in characters.
pub const PREVIEW_LIMIT: usize = 350;

/// Unseen mail older than this window is not notified.
pub const FRESHNESS_WINDOW_HOURS: i64 = 2;

/// Errors that fail a single candidate message.
///
/// These never abort a batch; the detector logs them and moves on to the
/// next candidate.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The fetched message carries no arrival timestamp.
    #[error("message has no internal date")]
    MissingArrivalTime,

    /// The message content could not be parsed.
    #[error("message content is not parseable")]
    Unparsable,
}

/// Process candidates in ascending UID order, notifying each accepted one.
///
/// Per-message failures are logged and skipped; the batch always runs to
/// completion.
pub async fn process_batch<F, Fut>(
    mut candidates: Vec<crate::Candidate>,
    watermark: &mut crate::Watermark,
    now: chrono::DateTime<chrono::Utc>,
    account: &str,
    notify: &mut F,
) where
    F: FnMut(String) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    candidates.sort_by_key(|candidate| candidate.uid);
    for candidate in candidates {
        let uid = candidate.uid;
        match process_candidate(&candidate, watermark, now, account) {
            Ok(Some(notification)) => notify(notification).await,
            Ok(None) => {}
            Err(error) => {
                tracing::error!(uid, %error, "error processing message");
            }
        }
    }
}

/// Run one candidate through the gates and compose its notification.
///
/// `Ok(None)` means the candidate was skipped: already covered by the
/// watermark, or outside the freshness window.
fn process_candidate(
    candidate: &crate::Candidate,
    watermark: &mut crate::Watermark,
    now: chrono::DateTime<chrono::Utc>,
    account: &str,
) -> Result<Option<String>, ProcessError> {
    if watermark.is_processed(candidate.uid) {
        return Ok(None);
    }

    let arrived_at = candidate
        .arrived_at
        .ok_or(ProcessError::MissingArrivalTime)?
        .with_timezone(&chrono::Utc);
    let age = now.signed_duration_since(arrived_at);
    if age > chrono::Duration::hours(FRESHNESS_WINDOW_HOURS) {
        tracing::debug!(
            uid = candidate.uid,
            "skipping message outside the freshness window"
        );
        return Ok(None);
    }

    // The watermark covers this message from here on, decoded or not.
    watermark.advance(candidate.uid);
    tracing::info!(uid = candidate.uid, "new mail");

    let message = mail_parser::MessageParser::default()
        .parse(&candidate.body)
        .ok_or(ProcessError::Unparsable)?;
    Ok(Some(compose_notification(account, &message)))
}

/// Compose the fixed-template notification text for an accepted message.
fn compose_notification(account: &str, message: &mail_parser::Message<'_>) -> String {
    let sender = sender_display(message);
    let subject = message.subject().unwrap_or("(no subject)");
    let body = mail_preview::body_preview(message);

    let truncated = body.chars().count() > PREVIEW_LIMIT;
    let preview: String = body.chars().take(PREVIEW_LIMIT).collect();

    let sender = markdown_escape::escape(&sender);
    let subject = markdown_escape::escape(subject);
    let mut preview = markdown_escape::escape(&preview);
    if truncated {
        // Appended after escaping; the ellipsis stays literal.
        preview.push_str("...");
    }

    format!(
        "*New email received for {account}*\n*From*: {sender}\n*Subject*: {subject}\n*Body Preview*: {preview}"
    )
}

/// Human-readable sender identity from the From header.
fn sender_display(message: &mail_parser::Message<'_>) -> String {
    let Some(from) = message.from().and_then(|address| address.first()) else {
        return "unknown sender".to_string();
    };
    match (from.name(), from.address()) {
        (Some(name), Some(address)) => format!("{name} <{address}>"),
        (Some(name), None) => name.to_string(),
        (None, Some(address)) => address.to_string(),
        (None, None) => "unknown sender".to_string(),
    }
}
