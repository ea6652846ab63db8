//! IMAP connect, login and folder selection routine.

/// The TLS stream type used for IMAP connections.
pub type TlsStream = tokio_rustls::client::TlsStream<tokio::net::TcpStream>;

/// The established IMAP session type.
pub type Session = async_imap::Session<TlsStream>;

/// Errors returned while establishing a session.
///
/// Everything here is fatal: there is no session to recover.
#[derive(Debug, thiserror::Error)]
pub enum EstablishError {
    /// Network I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to load system root certificates.
    #[error("failed to load system root certificates: {0}")]
    RootCerts(#[from] rustls_native_certs::Error),

    /// Invalid DNS name for TLS verification.
    #[error("invalid DNS name: {0}")]
    InvalidDnsName(String),

    /// IMAP protocol error during connection setup.
    #[error("IMAP error: {0}")]
    Imap(#[from] async_imap::error::Error),

    /// The server did not send the expected greeting.
    #[error("IMAP server sent no greeting")]
    MissingGreeting,

    /// Login failed.
    #[error("login: {0}")]
    Login(#[source] async_imap::error::Error),

    /// Mailbox selection failed.
    #[error("mailbox selection: {0}")]
    Select(#[source] async_imap::error::Error),
}

/// Connect to the IMAP server, authenticate and select the mailbox.
pub async fn establish(params: crate::Params<'_>) -> Result<Session, EstablishError> {
    let crate::Params {
        host,
        port,
        tls_mode,
        tls_server_name,
        username,
        password,
        mailbox,
    } = params;

    tracing::debug!(
        imap_host = %host,
        imap_port = port,
        imap_tls_mode = ?tls_mode,
        "connecting to the IMAP server"
    );

    let tcp_stream = tokio::net::TcpStream::connect((host, port)).await?;
    let mut root_store = rustls::RootCertStore::empty();
    let rustls_native_certs::CertificateResult { certs, errors, .. } =
        rustls_native_certs::load_native_certs();
    if let Some(err) = errors.into_iter().next() {
        return Err(EstablishError::RootCerts(err));
    }
    let _ = root_store.add_parsable_certificates(certs);
    let config = rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let tls_connector = tokio_rustls::TlsConnector::from(std::sync::Arc::new(config));
    let server_name = rustls::pki_types::ServerName::try_from(tls_server_name.to_string())
        .map_err(|_| EstablishError::InvalidDnsName(tls_server_name.to_string()))?;

    let client = match tls_mode {
        crate::TlsMode::Implicit => {
            let tls_stream = tls_connector.connect(server_name, tcp_stream).await?;
            let mut client = async_imap::Client::new(tls_stream);
            client
                .read_response()
                .await
                .ok_or(EstablishError::MissingGreeting)??;
            client
        }
        crate::TlsMode::StartTls => {
            let mut client = async_imap::Client::new(tcp_stream);
            client
                .read_response()
                .await
                .ok_or(EstablishError::MissingGreeting)??;
            client.run_command_and_check_ok("STARTTLS", None).await?;
            let tcp_stream = client.into_inner();
            let tls_stream = tls_connector.connect(server_name, tcp_stream).await?;
            async_imap::Client::new(tls_stream)
        }
    };

    let mut session = client
        .login(username, password.as_str())
        .await
        .map_err(|(err, _client)| err)
        .map_err(EstablishError::Login)?;

    let selected = session
        .select(mailbox)
        .await
        .map_err(EstablishError::Select)?;
    tracing::info!(
        imap_mailbox = %mailbox,
        messages = selected.exists,
        "mailbox selected"
    );

    Ok(session)
}
