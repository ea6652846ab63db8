//! Watermark-based new-mail detection routine.

use futures::TryStreamExt;

/// Errors returned by a detector pass.
///
/// These are session-level failures; per-message problems are handled inside
/// the batch and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),
}

/// Query the mailbox for unseen messages above the watermark and notify each
/// qualifying one.
pub async fn check_new_mail<S, F, Fut>(
    session: &mut async_imap::Session<S>,
    watermark: &mut crate::Watermark,
    params: &crate::WatchParams,
    notify: &mut F,
) -> Result<(), CheckError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
    F: FnMut(String) -> Fut + Send,
    Fut: std::future::Future<Output = ()> + Send,
{
    let query = format!("UNSEEN UID {}:*", watermark.value().saturating_add(1));
    let uids = session.uid_search(&query).await?;
    if uids.is_empty() {
        return Ok(());
    }

    let uid_set = uids
        .iter()
        .map(|uid| uid.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let fetch_stream = session
        .uid_fetch(&uid_set, "(BODY.PEEK[] INTERNALDATE)")
        .await?;
    let fetches: Vec<_> = fetch_stream.try_collect().await?;

    let mut candidates = Vec::with_capacity(fetches.len());
    for fetch in &fetches {
        let Some(uid) = fetch.uid else {
            tracing::error!("fetched message carries no UID, skipping");
            continue;
        };
        let Some(body) = fetch.body() else {
            tracing::error!(uid, "fetched message carries no body, skipping");
            continue;
        };
        candidates.push(crate::Candidate {
            uid,
            body: body.to_vec(),
            arrived_at: fetch.internal_date(),
        });
    }

    crate::process_batch(
        candidates,
        watermark,
        chrono::Utc::now(),
        &params.account,
        notify,
    )
    .await;

    Ok(())
}
