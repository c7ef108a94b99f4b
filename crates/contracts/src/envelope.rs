//! Envelope - one versioned unit of routed binary data.

use bytes::Bytes;

/// Version-0 envelope body.
///
/// `route` identifies the stream for sink selection only; `payload` is opaque
/// to the dispatcher and handed to matching sinks unmodified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeV0 {
    /// Route identifier chosen by the producer (e.g. a table or event name)
    pub route: String,
    /// Opaque payload bytes, shared read-only across all matching sinks
    pub payload: Bytes,
}

/// Versioned envelope union.
///
/// The wire discriminant selects the variant; only version 0 is defined.
/// A decoded envelope is immutable for the remainder of its dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    V0(EnvelopeV0),
}

impl Envelope {
    /// Construct a version-0 envelope
    pub fn v0(route: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self::V0(EnvelopeV0 {
            route: route.into(),
            payload: payload.into(),
        })
    }

    /// Route identifier of the active variant
    pub fn route(&self) -> &str {
        match self {
            Self::V0(v0) => &v0.route,
        }
    }

    /// Payload bytes of the active variant
    pub fn payload(&self) -> &Bytes {
        match self {
            Self::V0(v0) => &v0.payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_v0() {
        let env = Envelope::v0("transfer", vec![1u8, 2, 3]);
        assert_eq!(env.route(), "transfer");
        assert_eq!(env.payload().as_ref(), &[1, 2, 3]);
    }

    #[test]
    fn test_payload_is_shared_not_copied() {
        let env = Envelope::v0("t", vec![0u8; 64]);
        let a = env.payload().clone();
        let b = env.payload().clone();
        // Bytes clones share the same backing storage
        assert_eq!(a.as_ptr(), b.as_ptr());
    }
}
