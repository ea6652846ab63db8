//! Candidate message data.

/// A message returned by the unseen query, not yet confirmed eligible.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Server-assigned message UID.
    pub uid: u32,

    /// Raw message content.
    pub body: Vec<u8>,

    /// Server-recorded arrival time (INTERNALDATE).
    pub arrived_at: Option<chrono::DateTime<chrono::FixedOffset>>,
}
