//! # Codec
//!
//! Versioned envelope wire codec.
//!
//! Wire layout (version 0), matching the producer's binary convention:
//!
//! ```text
//! [discriminant: varuint32][route_len: varuint32][route: UTF-8]
//! [payload_len: varuint32][payload bytes]
//! ```
//!
//! Length prefixes and the variant discriminant are unsigned LEB128
//! (`varuint32`, at most 5 bytes). Decoding is a pure function and total:
//! every input yields either a valid `Envelope` or a specific `DecodeError`.

mod varint;
mod wire;

pub use wire::{decode, encode};

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{DecodeError, Envelope};

    #[test]
    fn test_round_trip_v0() {
        let env = Envelope::v0("transfer", b"payload-bytes".to_vec());
        let bytes = encode(&env);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, env);
    }

    #[test]
    fn test_round_trip_empty_route_and_payload() {
        let env = Envelope::v0("", Vec::new());
        let decoded = decode(&encode(&env)).unwrap();
        assert_eq!(decoded.route(), "");
        assert!(decoded.payload().is_empty());
    }

    #[test]
    fn test_round_trip_large_payload() {
        // Payload long enough to need a multi-byte length prefix
        let env = Envelope::v0("blocks", vec![0xabu8; 300]);
        let decoded = decode(&encode(&env)).unwrap();
        assert_eq!(decoded.payload().len(), 300);
    }

    #[test]
    fn test_unknown_discriminant() {
        let mut bytes = encode(&Envelope::v0("t", vec![1]));
        bytes[0] = 1; // discriminant 1 is not defined
        assert_eq!(decode(&bytes), Err(DecodeError::UnknownVersion(1)));
    }

    #[test]
    fn test_truncation_at_every_boundary_is_malformed() {
        let full = encode(&Envelope::v0("transfer", b"data".to_vec()));
        for len in 0..full.len() {
            let err = decode(&full[..len]).unwrap_err();
            assert!(
                matches!(err, DecodeError::MalformedEnvelope { .. }),
                "prefix of {len} bytes: {err}"
            );
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut bytes = encode(&Envelope::v0("t", vec![9]));
        bytes.push(0);
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_invalid_utf8_route_rejected() {
        // discriminant 0, route_len 1, one invalid UTF-8 byte, empty payload
        let bytes = [0u8, 1, 0xff, 0];
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::MalformedEnvelope { .. })
        ));
    }

    #[test]
    fn test_declared_length_past_end_of_buffer() {
        // route_len claims 200 bytes but only 2 follow
        let bytes = [0u8, 200, b'a', b'b'];
        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::MalformedEnvelope { .. })
        ));
    }
}
