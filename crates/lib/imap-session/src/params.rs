//! Session parameters.

/// How to secure the IMAP connection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TlsMode {
    /// Implicit TLS (usually port 993).
    Implicit,

    /// Start with plaintext and upgrade using STARTTLS (usually port 143).
    StartTls,
}

impl TlsMode {
    /// Default IMAP port for this TLS mode.
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Implicit => 993,
            Self::StartTls => 143,
        }
    }
}

/// Error parsing a TLS mode value.
#[derive(Debug, thiserror::Error)]
#[error("unknown TLS mode {0:?}, expected \"implicit\" or \"starttls\"")]
pub struct TlsModeParseError(String);

impl std::str::FromStr for TlsMode {
    type Err = TlsModeParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("implicit") {
            Ok(Self::Implicit)
        } else if value.eq_ignore_ascii_case("starttls") || value.eq_ignore_ascii_case("start_tls")
        {
            Ok(Self::StartTls)
        } else {
            Err(TlsModeParseError(value.to_string()))
        }
    }
}

/// Configuration required to establish an IMAP session.
#[derive(Clone, Debug)]
pub struct Params<'a> {
    /// IMAP server hostname.
    pub host: &'a str,

    /// IMAP server port.
    pub port: u16,

    /// TLS mode for the connection.
    pub tls_mode: TlsMode,

    /// TLS server name (SNI).
    pub tls_server_name: &'a str,

    /// Username for authentication.
    pub username: &'a str,

    /// Password for authentication.
    pub password: &'a crate::Password,

    /// Mailbox to select (usually `INBOX`).
    pub mailbox: &'a str,
}
