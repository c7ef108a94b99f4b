//! Dispatcher error types

use contracts::DecodeError;
use thiserror::Error;

/// Errors that abort a dispatch run
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Inbound buffer failed to decode. The producer is trusted, so this is
    /// a protocol-contract violation, not a recoverable runtime condition.
    #[error("envelope decode failed after {envelopes_dispatched} envelopes: {source}")]
    Decode {
        envelopes_dispatched: u64,
        #[source]
        source: DecodeError,
    },
}

impl DispatchError {
    pub(crate) fn decode(envelopes_dispatched: u64, source: DecodeError) -> Self {
        Self::Decode {
            envelopes_dispatched,
            source,
        }
    }
}
