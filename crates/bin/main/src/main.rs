//! Main entrypoint.

mod config;

#[tokio::main]
async fn main() -> color_eyre::eyre::Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt::init();

    let config = config::from_env()?;

    tracing::info!(
        imap_server = %config.imap_server,
        imap_port = config.imap_port,
        imap_mailbox = %config.imap_mailbox,
        account = %config.email_account,
        "starting mailgram"
    );

    let notifier =
        telegram_notify::Notifier::new(config.telegram_bot_token, config.telegram_chat_id)?;

    let session = imap_session::establish(imap_session::Params {
        host: &config.imap_server,
        port: config.imap_port,
        tls_mode: config.imap_tls_mode,
        tls_server_name: &config.imap_server,
        username: &config.email_account,
        password: &config.email_password,
        mailbox: &config.imap_mailbox,
    })
    .await?;

    let params = mail_watch::WatchParams {
        account: config.email_account,
        idle_timeout: config.idle_timeout,
    };

    let notifier_ref = &notifier;
    let result = mail_watch::watch_mailbox(session, &params, |text: String| async move {
        notifier_ref.send(&text).await;
    })
    .await;

    // Wait-loop failures end the process gracefully; restarting is the
    // supervisor's job.
    if let Err(error) = result {
        tracing::error!(%error, "mailbox watch ended with an error");
    }

    Ok(())
}
