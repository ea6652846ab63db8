//! IMAP IDLE watch loop.

/// Errors returned by the watch loop.
///
/// The session is already logged out (best effort) by the time one of these
/// is returned.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// IMAP protocol error.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// New-mail check error.
    #[error("new mail check error: {0}")]
    Check(#[from] crate::CheckError),
}

/// Watch the selected mailbox and notify for each new message.
///
/// Runs the initial catch-up scan, then blocks in IDLE waits until the
/// server signals a change, a failure ends the session, or the operator
/// interrupts the process. Every exit path, normal or not, terminates any
/// in-flight IDLE and logs out of the session.
pub async fn watch_mailbox<S, F, Fut>(
    mut session: async_imap::Session<S>,
    params: &crate::WatchParams,
    mut notify: F,
) -> Result<(), WatchError>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
    F: FnMut(String) -> Fut + Send,
    Fut: std::future::Future<Output = ()> + Send,
{
    let mut watermark = match initial_watermark(&mut session).await {
        Ok(watermark) => watermark,
        Err(error) => {
            close(session).await;
            return Err(error.into());
        }
    };
    tracing::info!(
        account = %params.account,
        watermark = watermark.value(),
        "starting watermark established"
    );

    if let Err(error) = crate::check_new_mail(&mut session, &mut watermark, params, &mut notify).await
    {
        close(session).await;
        return Err(error.into());
    }

    let supports_idle = match session.capabilities().await {
        Ok(capabilities) => capabilities.has_str("IDLE"),
        Err(error) => {
            close(session).await;
            return Err(error.into());
        }
    };
    if !supports_idle {
        tracing::info!("server does not support IDLE, exiting after the initial scan");
        close(session).await;
        return Ok(());
    }
    tracing::info!("server supports IDLE, waiting for new messages");

    loop {
        let mut idle_handle = session.idle();
        if let Err(error) = idle_handle.init().await {
            abort_idle(idle_handle).await;
            return Err(error.into());
        }

        let waited = {
            let (idle_wait, _stop) = idle_handle.wait_with_timeout(params.idle_timeout);
            tokio::select! {
                response = idle_wait => Some(response),
                _ = tokio::signal::ctrl_c() => None,
            }
        };

        let Some(response) = waited else {
            tracing::info!("interrupt received, closing the session");
            abort_idle(idle_handle).await;
            return Ok(());
        };

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                abort_idle(idle_handle).await;
                return Err(error.into());
            }
        };

        session = match idle_handle.done().await {
            Ok(session) => session,
            Err(error) => return Err(error.into()),
        };

        match response {
            async_imap::extensions::idle::IdleResponse::NewData(_) => {
                tracing::debug!("idle notified of new data");
                if let Err(error) =
                    crate::check_new_mail(&mut session, &mut watermark, params, &mut notify).await
                {
                    close(session).await;
                    return Err(error.into());
                }
            }
            async_imap::extensions::idle::IdleResponse::Timeout => {
                tracing::debug!("idle timeout elapsed, re-issuing IDLE");
            }
            async_imap::extensions::idle::IdleResponse::ManualInterrupt => {
                tracing::debug!("idle interrupted, re-issuing IDLE");
            }
        }
    }
}

/// The highest UID currently present in the mailbox, 0 when empty.
async fn initial_watermark<S>(
    session: &mut async_imap::Session<S>,
) -> Result<crate::Watermark, async_imap::error::Error>
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    let uids = session.uid_search("ALL").await?;
    Ok(crate::Watermark::new(
        uids.into_iter().max().unwrap_or(0),
    ))
}

/// Terminate an in-flight IDLE and log out.
async fn abort_idle<S>(idle_handle: async_imap::extensions::idle::Handle<S>)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    match idle_handle.done().await {
        Ok(session) => close(session).await,
        Err(error) => tracing::debug!(%error, "failed to terminate IDLE cleanly"),
    }
}

/// Log out of the session, tolerating failures.
async fn close<S>(mut session: async_imap::Session<S>)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin + Send + std::fmt::Debug,
{
    if let Err(error) = session.logout().await {
        tracing::debug!(%error, "logout failed");
    }
}
