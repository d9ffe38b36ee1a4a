use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type shared by the simulation core and the cluster runtime.
///
/// Impossible collision geometry is deliberately *not* represented here: the
/// physics kernel reports "no contact" through a negative sentinel time, and
/// callers filter it out as a normal outcome.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid user or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed simulation input; reported before any distributed
    /// computation starts.
    #[error("malformed input: {0}")]
    InputFormat(String),

    /// Numerical pathology (e.g., degenerate contact normal).
    #[error("numerical error: {0}")]
    Numeric(String),

    /// Failed to encode or decode a wire frame.
    #[error("codec error: {0}")]
    Codec(String),

    /// A peer spoke an incompatible wire version.
    #[error("unsupported wire version {found} (expected {expected})")]
    WireVersion { found: u8, expected: u8 },

    /// A peer sent a message that violates the round protocol.
    #[error("protocol violation: {0}")]
    Protocol(String),

    /// A peer did not respond within the round timeout.
    #[error("peer at rank {rank} unavailable: {reason}")]
    PeerUnavailable { rank: usize, reason: String },

    /// Propagated I/O errors from reporting.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::InputFormat("expected 5 header fields".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("malformed input"));
        assert!(msg.contains("header"));
    }

    #[test]
    fn peer_unavailable_names_the_rank() {
        let e = Error::PeerUnavailable {
            rank: 3,
            reason: "timed out".to_string(),
        };
        assert!(format!("{e}").contains("rank 3"));
    }
}
