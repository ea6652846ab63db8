//! Bot token wrapper type.

/// Wrapper for the sensitive bot API token.
#[derive(Clone, Eq, PartialEq)]
pub struct BotToken(String);

impl BotToken {
    /// Create a new token wrapper.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Expose the inner token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BotToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for BotToken {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Debug for BotToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BotToken(***redacted***)")
    }
}
